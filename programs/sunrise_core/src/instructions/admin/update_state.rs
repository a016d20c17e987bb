// sunrise_core/instructions/admin/update_state.rs

use anchor_lang::prelude::*;

use crate::state::{CoreState, UpdateStateInput};

#[derive(Accounts)]
pub struct UpdateState<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
    )]
    pub state: Account<'info, CoreState>,
}

pub fn handler(ctx: Context<UpdateState>, input: UpdateStateInput) -> Result<()> {
    ctx.accounts.state.update(input);

    Ok(())
}
