// spl_beam/instructions/admin/update.rs

use anchor_lang::prelude::*;

use crate::state::{BeamState, BeamStateInput, STATE_SEED};

#[derive(Accounts)]
pub struct Update<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
        seeds = [STATE_SEED, state.sunrise_state.as_ref(), state.stake_pool.as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,
}

pub fn handler(ctx: Context<Update>, input: BeamStateInput) -> Result<()> {
    ctx.accounts.state.update(input);

    Ok(())
}
