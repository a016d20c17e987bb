// sunrise_core/instructions/beam/transfer_gsol.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};

// local dependencies
use crate::{state::CoreState, utils::cpi::check_calling_beam};

#[derive(Accounts)]
pub struct TransferGsol<'info> {
    #[account(mut)]
    pub state: Box<Account<'info, CoreState>>,

    pub beam: Signer<'info>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<TransferGsol>, recipient_beam: Pubkey, amount: u64) -> Result<()> {
    check_calling_beam(
        &ctx.accounts.state,
        &ctx.accounts.beam.to_account_info(),
        &ctx.accounts.instructions_sysvar.to_account_info(),
    )?;

    // Only the attribution moves, no tokens change hands
    let beam = ctx.accounts.beam.key();
    ctx.accounts
        .state
        .record_transfer(&beam, &recipient_beam, amount)?;

    emit!(GsolTransferred {
        state: ctx.accounts.state.key(),
        from_beam: beam,
        to_beam: recipient_beam,
        amount,
    });

    Ok(())
}

#[event]
pub struct GsolTransferred {
    pub state: Pubkey,
    pub from_beam: Pubkey,
    pub to_beam: Pubkey,
    pub amount: u64,
}
