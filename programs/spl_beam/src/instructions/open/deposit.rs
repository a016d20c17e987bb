// spl_beam/instructions/open/deposit.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use sunrise_core::{cpi::accounts::MintGsol, program::SunriseCore, state::CoreState};

// local dependencies
use crate::{
    state::{BeamState, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::{
        core::{beam_seeds, mint_gsol},
        pool::{deposit_sol, DepositSolAccounts, SplStakePool, StakePool},
    },
};

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(
        has_one = sunrise_state,
        has_one = stake_pool,
        seeds = [STATE_SEED, sunrise_state.key().as_ref(), stake_pool.key().as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,

    #[account(
        mut,
        has_one = gsol_mint,
    )]
    pub sunrise_state: Box<Account<'info, CoreState>>,

    #[account(
        mut,
        has_one = pool_mint,
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        token::mint = gsol_mint,
    )]
    pub mint_gsol_to: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub pool_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), VAULT_AUTHORITY_SEED],
        bump = state.vault_authority_bump,
    )]
    pub vault_authority: AccountInfo<'info>,

    #[account(
        mut,
        token::mint = pool_mint,
        token::authority = vault_authority,
    )]
    pub pool_token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Checked by the stake pool program
    pub stake_pool_withdraw_authority: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub reserve_stake_account: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub manager_fee_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Checked by the core program
    pub gsol_mint_authority: UncheckedAccount<'info>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,

    pub stake_pool_program: Program<'info, SplStakePool>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>, // pool token program

    pub gsol_token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Deposit>, lamports: u64) -> Result<()> {
    deposit_sol(
        DepositSolAccounts {
            stake_pool_program: &ctx.accounts.stake_pool_program.to_account_info(),
            stake_pool: &ctx.accounts.stake_pool.to_account_info(),
            stake_pool_withdraw_authority: &ctx.accounts.stake_pool_withdraw_authority,
            reserve_stake_account: &ctx.accounts.reserve_stake_account,
            depositor: &ctx.accounts.depositor,
            pool_token_vault: &ctx.accounts.pool_token_vault.to_account_info(),
            manager_fee_account: &ctx.accounts.manager_fee_account,
            pool_mint: &ctx.accounts.pool_mint.to_account_info(),
            system_program: &ctx.accounts.system_program,
            token_program: &ctx.accounts.token_program,
        },
        lamports,
    )?;

    // gSOL is minted 1:1 against the deposited lamports
    let sunrise_state = ctx.accounts.sunrise_state.key();
    let stake_pool = ctx.accounts.stake_pool.key();
    let bump = [ctx.accounts.state.bump];
    let seeds = beam_seeds(&sunrise_state, &stake_pool, &bump);

    mint_gsol(
        &ctx.accounts.sunrise_program,
        MintGsol {
            state: ctx.accounts.sunrise_state.to_account_info(),
            beam: ctx.accounts.state.to_account_info(),
            gsol_mint: ctx.accounts.gsol_mint.to_account_info(),
            gsol_mint_authority: ctx.accounts.gsol_mint_authority.to_account_info(),
            mint_gsol_to: ctx.accounts.mint_gsol_to.to_account_info(),
            instructions_sysvar: ctx.accounts.instructions_sysvar.to_account_info(),
            token_program: ctx.accounts.gsol_token_program.to_account_info(),
        },
        &[&seeds[..]],
        lamports,
    )
}
