// spl_beam/instructions/admin/initialize.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};
use sunrise_core::state::CoreState;

// local dependencies
use crate::{
    state::{BeamState, BeamStateInput, STATE_SEED, VAULT_AUTHORITY_SEED},
    utils::pool::StakePool,
};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = BeamState::SIZE,
        seeds = [STATE_SEED, sunrise_state.key().as_ref(), stake_pool.key().as_ref()],
        bump
    )]
    pub state: Box<Account<'info, BeamState>>,

    pub sunrise_state: Box<Account<'info, CoreState>>,

    pub stake_pool: Box<Account<'info, StakePool>>,

    #[account(address = stake_pool.pool_mint)]
    pub pool_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), VAULT_AUTHORITY_SEED],
        bump,
    )]
    pub vault_authority: AccountInfo<'info>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = pool_mint,
        associated_token::authority = vault_authority,
    )]
    pub pool_token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, input: BeamStateInput) -> Result<()> {
    ctx.accounts.state.set_inner(BeamState {
        update_authority: input.update_authority,
        stake_pool: ctx.accounts.stake_pool.key(),
        sunrise_state: ctx.accounts.sunrise_state.key(),
        vault_authority_bump: ctx.bumps.vault_authority,
        treasury: input.treasury,
        bump: ctx.bumps.state,
    });

    Ok(())
}
