// spl_beam/instructions/open/deposit_stake.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use sunrise_core::{cpi::accounts::MintGsol, program::SunriseCore, state::CoreState};

// local dependencies
use crate::{
    state::{BeamState, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::{
        core::{beam_seeds, mint_gsol},
        pool::{deposit_stake, DepositStakeAccounts, SplStakePool, StakePool},
        stake::{delegated_stake, NativeStakeProgram},
    },
};

#[derive(Accounts)]
pub struct DepositStake<'info> {
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
    pub stake_owner: Signer<'info>,

    /// CHECK: Must be a delegated stake account, checked in the handler
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

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
    #[account(mut)]
    pub validator_list: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    pub stake_pool_deposit_authority: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    pub stake_pool_withdraw_authority: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub reserve_stake_account: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub validator_stake_account: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub manager_fee_account: UncheckedAccount<'info>,

    pub clock: Sysvar<'info, Clock>,

    /// CHECK: Address is checked against the stake history sysvar
    #[account(address = sysvar::stake_history::ID)]
    pub stake_history: UncheckedAccount<'info>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Checked by the core program
    pub gsol_mint_authority: UncheckedAccount<'info>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,

    pub stake_pool_program: Program<'info, SplStakePool>,

    pub native_stake_program: Program<'info, NativeStakeProgram>,

    pub token_program: Interface<'info, TokenInterface>, // pool token program

    pub gsol_token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<DepositStake>) -> Result<()> {
    // Only active stake backs gSOL
    let amount = delegated_stake(&ctx.accounts.stake_account)?;

    deposit_stake(DepositStakeAccounts {
        stake_pool_program: &ctx.accounts.stake_pool_program.to_account_info(),
        stake_pool: &ctx.accounts.stake_pool.to_account_info(),
        validator_list: &ctx.accounts.validator_list,
        stake_pool_deposit_authority: &ctx.accounts.stake_pool_deposit_authority,
        stake_pool_withdraw_authority: &ctx.accounts.stake_pool_withdraw_authority,
        stake_account: &ctx.accounts.stake_account,
        stake_owner: &ctx.accounts.stake_owner,
        validator_stake_account: &ctx.accounts.validator_stake_account,
        reserve_stake_account: &ctx.accounts.reserve_stake_account,
        pool_token_vault: &ctx.accounts.pool_token_vault.to_account_info(),
        manager_fee_account: &ctx.accounts.manager_fee_account,
        pool_mint: &ctx.accounts.pool_mint.to_account_info(),
        clock: &ctx.accounts.clock.to_account_info(),
        stake_history: &ctx.accounts.stake_history,
        token_program: &ctx.accounts.token_program,
        native_stake_program: &ctx.accounts.native_stake_program.to_account_info(),
    })?;

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
        amount,
    )
}
