// sunrise_core/instructions/admin/remove_beam.rs

// external dependencies
use anchor_lang::prelude::*;

// local dependencies
use crate::{
    errors::CoreError,
    state::{CoreState, EpochReport, EPOCH_REPORT_SEED},
};

#[derive(Accounts)]
pub struct RemoveBeam<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
    )]
    pub state: Account<'info, CoreState>,

    #[account(
        mut,
        seeds = [state.key().as_ref(), EPOCH_REPORT_SEED],
        bump = state.epoch_report_bump,
        has_one = state @ CoreError::IncorrectBeamEpochReport,
    )]
    pub epoch_report: Account<'info, EpochReport>,
}

pub fn handler(ctx: Context<RemoveBeam>, beam: Pubkey) -> Result<()> {
    // The slot is left in place as an empty entry so other beams keep their index
    let slot = ctx.accounts.state.remove_beam(&beam)?;
    ctx.accounts.epoch_report.clear_slot(slot);

    emit!(BeamRemoved {
        state: ctx.accounts.state.key(),
        beam,
        slot: slot as u8,
    });

    Ok(())
}

#[event]
pub struct BeamRemoved {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub slot: u8,
}
