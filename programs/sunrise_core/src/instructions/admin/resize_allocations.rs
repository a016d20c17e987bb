// sunrise_core/instructions/admin/resize_allocations.rs

// external dependencies
use anchor_lang::prelude::*;

// local dependencies
use crate::{
    errors::CoreError,
    state::{CoreState, EpochReport, EPOCH_REPORT_SEED},
};

#[derive(Accounts)]
#[instruction(additional_beams: u8)]
pub struct ResizeAllocations<'info> {
    pub update_authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
        realloc = CoreState::size(state.allocations.len() + additional_beams as usize),
        realloc::payer = payer,
        realloc::zero = false,
    )]
    pub state: Account<'info, CoreState>,

    #[account(
        mut,
        seeds = [state.key().as_ref(), EPOCH_REPORT_SEED],
        bump = state.epoch_report_bump,
        has_one = state @ CoreError::IncorrectBeamEpochReport,
        realloc = EpochReport::size(state.allocations.len() + additional_beams as usize),
        realloc::payer = payer,
        realloc::zero = false,
    )]
    pub epoch_report: Account<'info, EpochReport>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<ResizeAllocations>, additional_beams: u8) -> Result<()> {
    // Both accounts were grown by the constraints, fill the new room with empty slots
    ctx.accounts
        .state
        .extend_capacity(additional_beams as usize)?;

    let capacity = ctx.accounts.state.capacity();
    ctx.accounts.epoch_report.resize(capacity);

    Ok(())
}
