// sunrise_core/instructions/admin/export_mint_authority.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenInterface};

// local dependencies
use crate::{
    state::{CoreState, GSOL_MINT_AUTHORITY_SEED},
    utils::token::set_mint_authority,
};

#[derive(Accounts)]
pub struct ExportMintAuthority<'info> {
    pub update_authority: Signer<'info>,

    #[account(
        has_one = update_authority,
        has_one = gsol_mint,
    )]
    pub state: Account<'info, CoreState>,

    #[account(mut)]
    pub gsol_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), GSOL_MINT_AUTHORITY_SEED],
        bump = state.gsol_mint_authority_bump,
    )]
    pub gsol_mint_authority: AccountInfo<'info>,

    /// CHECK: Any account may become the new mint authority
    pub new_authority: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<ExportMintAuthority>) -> Result<()> {
    let state_key = ctx.accounts.state.key();
    let authority_seeds: &[&[&[u8]]] = &[&[
        state_key.as_ref(),
        GSOL_MINT_AUTHORITY_SEED,
        &[ctx.accounts.state.gsol_mint_authority_bump],
    ]];

    set_mint_authority(
        &ctx.accounts.gsol_mint,                // mint
        &ctx.accounts.gsol_mint_authority,      // current authority
        authority_seeds,                        // authority seeds
        ctx.accounts.new_authority.key,         // new authority
        &ctx.accounts.token_program,            // token program
    )
}
