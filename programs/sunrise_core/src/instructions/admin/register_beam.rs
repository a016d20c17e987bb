// sunrise_core/instructions/admin/register_beam.rs

// external dependencies
use anchor_lang::prelude::*;

// local dependencies
use crate::state::{BeamDetails, CoreState};

#[derive(Accounts)]
pub struct RegisterBeam<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
    )]
    pub state: Account<'info, CoreState>,

    /// CHECK: The account the beam program signs CPIs with, it is only recorded
    pub beam_account: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<RegisterBeam>) -> Result<()> {
    let beam = ctx.accounts.beam_account.key();

    // New beams start with a zero allocation
    let slot = ctx.accounts.state.add_beam(BeamDetails::new(beam))?;

    emit!(BeamRegistered {
        state: ctx.accounts.state.key(),
        beam,
        slot: slot as u8,
    });

    Ok(())
}

#[event]
pub struct BeamRegistered {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub slot: u8,
}
