// spl_beam/instructions/open/withdraw_stake.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use sunrise_core::{cpi::accounts::BurnGsol, program::SunriseCore, state::CoreState};

// local dependencies
use crate::{
    state::{BeamState, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::{
        core::{beam_seeds, burn_gsol},
        pool::{
            pool_tokens_from_lamports, withdraw_stake, SplStakePool, StakePool,
            WithdrawStakeAccounts,
        },
        stake::NativeStakeProgram,
    },
};

#[derive(Accounts)]
pub struct WithdrawStake<'info> {
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
    pub withdrawer: Signer<'info>,

    #[account(
        mut,
        token::mint = gsol_mint,
        token::authority = withdrawer,
    )]
    pub gsol_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Uninitialized stake account, initialized by the stake pool program
    #[account(mut)]
    pub new_stake_account: UncheckedAccount<'info>,

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
    pub validator_list: UncheckedAccount<'info>,

    /// CHECK: Either a validator stake account of the pool or its reserve, checked by the stake pool program
    #[account(mut)]
    pub stake_account_to_split: UncheckedAccount<'info>,

    /// CHECK: Checked by the stake pool program
    #[account(mut)]
    pub manager_fee_account: UncheckedAccount<'info>,

    pub clock: Sysvar<'info, Clock>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,

    pub stake_pool_program: Program<'info, SplStakePool>,

    pub native_stake_program: Program<'info, NativeStakeProgram>,

    pub token_program: Interface<'info, TokenInterface>, // pool token program

    pub gsol_token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<WithdrawStake>, lamports: u64) -> Result<()> {
    let state_key = ctx.accounts.state.key();
    let vault_authority_seeds: &[&[&[u8]]] = &[&[
        state_key.as_ref(),
        VAULT_AUTHORITY_SEED,
        &[ctx.accounts.state.vault_authority_bump],
    ]];

    let pool_tokens = pool_tokens_from_lamports(&ctx.accounts.stake_pool, lamports)?;

    // The new stake account belongs to the withdrawer
    withdraw_stake(
        WithdrawStakeAccounts {
            stake_pool_program: &ctx.accounts.stake_pool_program.to_account_info(),
            stake_pool: &ctx.accounts.stake_pool.to_account_info(),
            validator_list: &ctx.accounts.validator_list,
            stake_pool_withdraw_authority: &ctx.accounts.stake_pool_withdraw_authority,
            stake_account_to_split: &ctx.accounts.stake_account_to_split,
            new_stake_account: &ctx.accounts.new_stake_account,
            new_stake_authority: &ctx.accounts.withdrawer,
            vault_authority: &ctx.accounts.vault_authority,
            pool_token_vault: &ctx.accounts.pool_token_vault.to_account_info(),
            manager_fee_account: &ctx.accounts.manager_fee_account,
            pool_mint: &ctx.accounts.pool_mint.to_account_info(),
            clock: &ctx.accounts.clock.to_account_info(),
            token_program: &ctx.accounts.token_program,
            native_stake_program: &ctx.accounts.native_stake_program.to_account_info(),
        },
        pool_tokens,
        vault_authority_seeds,
    )?;

    let sunrise_state = ctx.accounts.sunrise_state.key();
    let stake_pool = ctx.accounts.stake_pool.key();
    let bump = [ctx.accounts.state.bump];
    let seeds = beam_seeds(&sunrise_state, &stake_pool, &bump);

    burn_gsol(
        &ctx.accounts.sunrise_program,
        BurnGsol {
            state: ctx.accounts.sunrise_state.to_account_info(),
            beam: ctx.accounts.state.to_account_info(),
            gsol_mint: ctx.accounts.gsol_mint.to_account_info(),
            burn_gsol_from_owner: ctx.accounts.withdrawer.to_account_info(),
            burn_gsol_from: ctx.accounts.gsol_token_account.to_account_info(),
            instructions_sysvar: ctx.accounts.instructions_sysvar.to_account_info(),
            token_program: ctx.accounts.gsol_token_program.to_account_info(),
        },
        &[&seeds[..]],
        lamports,
    )
}
