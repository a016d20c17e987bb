// sunrise_core/instructions/admin/set_draining_mode.rs

use anchor_lang::prelude::*;

use crate::state::CoreState;

#[derive(Accounts)]
pub struct SetDrainingMode<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
    )]
    pub state: Account<'info, CoreState>,
}

pub fn handler(ctx: Context<SetDrainingMode>, beam: Pubkey, draining_mode: bool) -> Result<()> {
    ctx.accounts.state.set_draining_mode(&beam, draining_mode)?;

    emit!(DrainingModeSet {
        state: ctx.accounts.state.key(),
        beam,
        draining_mode,
    });

    Ok(())
}

#[event]
pub struct DrainingModeSet {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub draining_mode: bool,
}
