// sunrise_core/instructions/beam/update_epoch_report.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::Mint;

// local dependencies
use crate::{
    errors::CoreError,
    state::{CoreState, EpochReport, EPOCH_REPORT_SEED},
    utils::cpi::check_calling_beam,
};

#[derive(Accounts)]
pub struct UpdateEpochReport<'info> {
    #[account(has_one = gsol_mint)]
    pub state: Box<Account<'info, CoreState>>,

    pub beam: Signer<'info>,

    #[account(
        mut,
        seeds = [state.key().as_ref(), EPOCH_REPORT_SEED],
        bump = state.epoch_report_bump,
        has_one = state @ CoreError::IncorrectBeamEpochReport,
    )]
    pub epoch_report: Box<Account<'info, EpochReport>>,

    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<UpdateEpochReport>, epoch: u64, extractable_yield: u64) -> Result<()> {
    let slot = check_calling_beam(
        &ctx.accounts.state,
        &ctx.accounts.beam.to_account_info(),
        &ctx.accounts.instructions_sysvar.to_account_info(),
    )?;

    require_eq!(
        ctx.accounts.epoch_report.beam_epoch_details.len(),
        ctx.accounts.state.capacity(),
        CoreError::IncorrectBeamEpochReportCount
    );

    let current_epoch = Clock::get()?.epoch;
    let supply = ctx.accounts.gsol_mint.supply;
    ctx.accounts
        .epoch_report
        .record_update(slot, epoch, current_epoch, extractable_yield, supply)?;

    emit!(EpochReportUpdated {
        state: ctx.accounts.state.key(),
        beam: ctx.accounts.beam.key(),
        epoch: current_epoch,
        extractable_yield,
        gsol_supply: supply,
    });

    Ok(())
}

#[event]
pub struct EpochReportUpdated {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub epoch: u64,
    pub extractable_yield: u64,
    pub gsol_supply: u64,
}
