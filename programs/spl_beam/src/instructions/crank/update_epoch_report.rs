// spl_beam/instructions/crank/update_epoch_report.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount};
use sunrise_core::{
    cpi::accounts::UpdateEpochReport as CoreUpdateEpochReport,
    program::SunriseCore,
    state::CoreState,
};

// local dependencies
use crate::{
    state::{BeamState, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::{
        core::{beam_seeds, update_epoch_report},
        pool::{extractable_yield, fee_amount, StakePool},
    },
};

#[derive(Accounts)]
pub struct UpdateEpochReport<'info> {
    #[account(
        has_one = sunrise_state,
        has_one = stake_pool,
        seeds = [STATE_SEED, sunrise_state.key().as_ref(), stake_pool.key().as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,

    #[account(has_one = gsol_mint)]
    pub sunrise_state: Box<Account<'info, CoreState>>,

    pub stake_pool: Box<Account<'info, StakePool>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), VAULT_AUTHORITY_SEED],
        bump = state.vault_authority_bump,
    )]
    pub vault_authority: AccountInfo<'info>,

    #[account(
        token::mint = stake_pool.pool_mint,
        token::authority = vault_authority,
    )]
    pub pool_token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Checked by the core program
    #[account(mut)]
    pub epoch_report: UncheckedAccount<'info>,

    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,
}

pub fn handler(ctx: Context<UpdateEpochReport>) -> Result<()> {
    let beam = ctx.accounts.state.key();
    let partial_gsol_supply = ctx
        .accounts
        .sunrise_state
        .get_beam_details(&beam)
        .map_or(0, |details| details.partial_gsol_supply);

    let gross = extractable_yield(
        &ctx.accounts.stake_pool,
        ctx.accounts.pool_token_vault.amount,
        partial_gsol_supply,
    )?;
    // Yield leaves the pool through a sol withdrawal, so report it net of that fee
    let fee = fee_amount(&ctx.accounts.stake_pool.sol_withdrawal_fee, gross)?;
    let net = gross.saturating_sub(fee);

    let epoch = Clock::get()?.epoch;

    let sunrise_state = ctx.accounts.sunrise_state.key();
    let stake_pool = ctx.accounts.stake_pool.key();
    let bump = [ctx.accounts.state.bump];
    let seeds = beam_seeds(&sunrise_state, &stake_pool, &bump);

    update_epoch_report(
        &ctx.accounts.sunrise_program,
        CoreUpdateEpochReport {
            state: ctx.accounts.sunrise_state.to_account_info(),
            beam: ctx.accounts.state.to_account_info(),
            epoch_report: ctx.accounts.epoch_report.to_account_info(),
            gsol_mint: ctx.accounts.gsol_mint.to_account_info(),
            instructions_sysvar: ctx.accounts.instructions_sysvar.to_account_info(),
        },
        &[&seeds[..]],
        epoch,
        net,
    )
}
