// spl_beam/instructions/crank/extract_yield.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use sunrise_core::{
    cpi::accounts::ExtractYield as CoreExtractYield,
    program::SunriseCore,
    state::{CoreState, EpochReport},
};

// local dependencies
use crate::{
    errors::SplBeamError,
    state::{BeamState, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::{
        core::{beam_seeds, extract_yield},
        pool::{
            extractable_yield, pool_tokens_from_lamports, withdraw_sol, SplStakePool, StakePool,
            WithdrawSolAccounts,
        },
        stake::NativeStakeProgram,
    },
};

#[derive(Accounts)]
pub struct ExtractYield<'info> {
    #[account(
        has_one = sunrise_state,
        has_one = stake_pool,
        seeds = [STATE_SEED, sunrise_state.key().as_ref(), stake_pool.key().as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,

    #[account(has_one = yield_account)]
    pub sunrise_state: Box<Account<'info, CoreState>>,

    #[account(
        mut,
        has_one = pool_mint,
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// CHECK: Matches the yield account of the core state
    #[account(mut)]
    pub yield_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub epoch_report: Box<Account<'info, EpochReport>>,

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

    pub clock: Sysvar<'info, Clock>,

    /// CHECK: Address is checked against the stake history sysvar
    #[account(address = sysvar::stake_history::ID)]
    pub stake_history: UncheckedAccount<'info>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,

    pub stake_pool_program: Program<'info, SplStakePool>,

    pub native_stake_program: Program<'info, NativeStakeProgram>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<ExtractYield>) -> Result<()> {
    let beam = ctx.accounts.state.key();
    let current_epoch = ctx.accounts.clock.epoch;

    // Bounded by what was reported this epoch and by what the vault still holds
    let reported = ctx
        .accounts
        .sunrise_state
        .find_beam_index(&beam)
        .and_then(|slot| ctx.accounts.epoch_report.beam_epoch_details.get(slot))
        .filter(|details| details.is_current(current_epoch))
        .map_or(0, |details| details.extractable_yield);
    let partial_gsol_supply = ctx
        .accounts
        .sunrise_state
        .get_beam_details(&beam)
        .map_or(0, |details| details.partial_gsol_supply);
    let available = extractable_yield(
        &ctx.accounts.stake_pool,
        ctx.accounts.pool_token_vault.amount,
        partial_gsol_supply,
    )?;

    let amount = reported.min(available);
    require!(amount > 0, SplBeamError::InsufficientYieldToExtract);

    let pool_tokens = pool_tokens_from_lamports(&ctx.accounts.stake_pool, amount)?;

    let state_key = ctx.accounts.state.key();
    let vault_authority_seeds: &[&[&[u8]]] = &[&[
        state_key.as_ref(),
        VAULT_AUTHORITY_SEED,
        &[ctx.accounts.state.vault_authority_bump],
    ]];

    let lamports_before = ctx.accounts.yield_account.lamports();

    withdraw_sol(
        WithdrawSolAccounts {
            stake_pool_program: &ctx.accounts.stake_pool_program.to_account_info(),
            stake_pool: &ctx.accounts.stake_pool.to_account_info(),
            stake_pool_withdraw_authority: &ctx.accounts.stake_pool_withdraw_authority,
            vault_authority: &ctx.accounts.vault_authority,
            pool_token_vault: &ctx.accounts.pool_token_vault.to_account_info(),
            reserve_stake_account: &ctx.accounts.reserve_stake_account,
            lamports_to: &ctx.accounts.yield_account,
            manager_fee_account: &ctx.accounts.manager_fee_account,
            pool_mint: &ctx.accounts.pool_mint.to_account_info(),
            clock: &ctx.accounts.clock.to_account_info(),
            stake_history: &ctx.accounts.stake_history,
            native_stake_program: &ctx.accounts.native_stake_program.to_account_info(),
            token_program: &ctx.accounts.token_program,
        },
        pool_tokens,
        vault_authority_seeds,
    )?;

    // Record what actually arrived, after the pool's fee
    let extracted = ctx
        .accounts
        .yield_account
        .lamports()
        .checked_sub(lamports_before)
        .ok_or(SplBeamError::CalculationFailure)?;

    let sunrise_state = ctx.accounts.sunrise_state.key();
    let stake_pool = ctx.accounts.stake_pool.key();
    let bump = [ctx.accounts.state.bump];
    let seeds = beam_seeds(&sunrise_state, &stake_pool, &bump);

    extract_yield(
        &ctx.accounts.sunrise_program,
        CoreExtractYield {
            state: ctx.accounts.sunrise_state.to_account_info(),
            beam: ctx.accounts.state.to_account_info(),
            epoch_report: ctx.accounts.epoch_report.to_account_info(),
            instructions_sysvar: ctx.accounts.instructions_sysvar.to_account_info(),
        },
        &[&seeds[..]],
        extracted,
    )
}
