// sunrise_core/instructions/beam/mint_gsol.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

// local dependencies
use crate::{
    state::{CoreState, GSOL_MINT_AUTHORITY_SEED},
    utils::{cpi::check_calling_beam, token::mint_tokens},
};

// Account order is relied upon by beam programs, do not reorder.
#[derive(Accounts)]
pub struct MintGsol<'info> {
    #[account(
        mut,
        has_one = gsol_mint,
    )]
    pub state: Box<Account<'info, CoreState>>,

    pub beam: Signer<'info>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), GSOL_MINT_AUTHORITY_SEED],
        bump = state.gsol_mint_authority_bump,
    )]
    pub gsol_mint_authority: AccountInfo<'info>,

    #[account(
        mut,
        token::mint = gsol_mint,
    )]
    pub mint_gsol_to: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<MintGsol>, amount: u64) -> Result<()> {
    // Only a registered beam, signing from within its own program, may mint
    check_calling_beam(
        &ctx.accounts.state,
        &ctx.accounts.beam.to_account_info(),
        &ctx.accounts.instructions_sysvar.to_account_info(),
    )?;

    let beam = ctx.accounts.beam.key();
    let supply = ctx.accounts.gsol_mint.supply;
    ctx.accounts.state.record_mint(&beam, amount, supply)?;

    let state_key = ctx.accounts.state.key();
    let authority_seeds: &[&[&[u8]]] = &[&[
        state_key.as_ref(),
        GSOL_MINT_AUTHORITY_SEED,
        &[ctx.accounts.state.gsol_mint_authority_bump],
    ]];

    mint_tokens(
        &ctx.accounts.mint_gsol_to,        // to
        amount,                            // amount
        &ctx.accounts.gsol_mint,           // mint
        &ctx.accounts.gsol_mint_authority, // authority
        authority_seeds,                   // authority seeds
        &ctx.accounts.token_program,       // token program
    )?;

    emit!(GsolMinted {
        state: state_key,
        beam,
        to: ctx.accounts.mint_gsol_to.key(),
        amount,
    });

    Ok(())
}

#[event]
pub struct GsolMinted {
    pub state: Pubkey,
    pub beam: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}
