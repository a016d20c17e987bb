// sunrise_core/instructions/admin/update_allocations.rs

// external dependencies
use anchor_lang::prelude::*;

// local dependencies
use crate::state::{AllocationUpdate, CoreState};

#[derive(Accounts)]
pub struct UpdateAllocations<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        mut,
        has_one = update_authority,
    )]
    pub state: Account<'info, CoreState>,
}

pub fn handler(ctx: Context<UpdateAllocations>, new_allocations: Vec<AllocationUpdate>) -> Result<()> {
    ctx.accounts.state.update_allocations(&new_allocations)?;

    emit!(AllocationsUpdated {
        state: ctx.accounts.state.key(),
        updates: new_allocations,
    });

    Ok(())
}

#[event]
pub struct AllocationsUpdated {
    pub state: Pubkey,
    pub updates: Vec<AllocationUpdate>,
}
