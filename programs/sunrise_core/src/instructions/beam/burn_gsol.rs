// sunrise_core/instructions/beam/burn_gsol.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

// local dependencies
use crate::{
    state::CoreState,
    utils::{cpi::check_calling_beam, token::burn_tokens},
};

// Account order is relied upon by beam programs, do not reorder.
#[derive(Accounts)]
pub struct BurnGsol<'info> {
    #[account(
        mut,
        has_one = gsol_mint,
    )]
    pub state: Box<Account<'info, CoreState>>,

    pub beam: Signer<'info>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    pub burn_gsol_from_owner: Signer<'info>,

    #[account(
        mut,
        token::mint = gsol_mint,
        token::authority = burn_gsol_from_owner,
    )]
    pub burn_gsol_from: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<BurnGsol>, amount: u64) -> Result<()> {
    check_calling_beam(
        &ctx.accounts.state,
        &ctx.accounts.beam.to_account_info(),
        &ctx.accounts.instructions_sysvar.to_account_info(),
    )?;

    let beam = ctx.accounts.beam.key();
    ctx.accounts.state.record_burn(&beam, amount)?;

    burn_tokens(
        &ctx.accounts.burn_gsol_from,                      // from
        amount,                                            // amount
        &ctx.accounts.gsol_mint,                           // mint
        &ctx.accounts.burn_gsol_from_owner.to_account_info(), // owner
        &ctx.accounts.token_program,                       // token program
    )?;

    emit!(GsolBurned {
        state: ctx.accounts.state.key(),
        beam,
        from: ctx.accounts.burn_gsol_from.key(),
        amount,
    });

    Ok(())
}

#[event]
pub struct GsolBurned {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub from: Pubkey,
    pub amount: u64,
}
