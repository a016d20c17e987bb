// sunrise_core/instructions/beam/extract_yield.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};

// local dependencies
use crate::{
    errors::CoreError,
    state::{CoreState, EpochReport, EPOCH_REPORT_SEED},
    utils::cpi::check_calling_beam,
};

#[derive(Accounts)]
pub struct ExtractYield<'info> {
    pub state: Box<Account<'info, CoreState>>,

    pub beam: Signer<'info>,

    #[account(
        mut,
        seeds = [state.key().as_ref(), EPOCH_REPORT_SEED],
        bump = state.epoch_report_bump,
        has_one = state @ CoreError::IncorrectBeamEpochReport,
    )]
    pub epoch_report: Box<Account<'info, EpochReport>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,
}

// Funds are moved to the yield account by the beam itself, this only does the bookkeeping
pub fn handler(ctx: Context<ExtractYield>, amount: u64) -> Result<()> {
    let slot = check_calling_beam(
        &ctx.accounts.state,
        &ctx.accounts.beam.to_account_info(),
        &ctx.accounts.instructions_sysvar.to_account_info(),
    )?;

    let current_epoch = Clock::get()?.epoch;
    ctx.accounts
        .epoch_report
        .record_extraction(slot, current_epoch, amount)?;

    emit!(YieldExtracted {
        state: ctx.accounts.state.key(),
        beam: ctx.accounts.beam.key(),
        epoch: current_epoch,
        amount,
    });

    Ok(())
}

#[event]
pub struct YieldExtracted {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub epoch: u64,
    pub amount: u64,
}
