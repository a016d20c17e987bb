// spl_beam/instructions/open/burn.rs

// external dependencies
use anchor_lang::{prelude::*, solana_program::sysvar};
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use sunrise_core::{cpi::accounts::BurnGsol, program::SunriseCore, state::CoreState};

// local dependencies
use crate::{
    state::{BeamState, STATE_SEED},
    utils::{
        core::{beam_seeds, burn_gsol},
        pool::StakePool,
    },
};

#[derive(Accounts)]
pub struct Burn<'info> {
    #[account(
        has_one = sunrise_state,
        has_one = stake_pool,
        seeds = [STATE_SEED, sunrise_state.key().as_ref(), stake_pool.key().as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,

    #[account(
        mut,
        has_one = gsol_mint,
    )]
    pub sunrise_state: Box<Account<'info, CoreState>>,

    pub stake_pool: Box<Account<'info, StakePool>>,

    pub burner: Signer<'info>,

    #[account(
        mut,
        token::mint = gsol_mint,
        token::authority = burner,
    )]
    pub gsol_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub gsol_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Address is checked against the instructions sysvar
    #[account(address = sysvar::instructions::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,

    pub sunrise_program: Program<'info, SunriseCore>,

    pub token_program: Interface<'info, TokenInterface>,
}

// Burns gSOL without redeeming the backing stake, the value left behind becomes yield
pub fn handler(ctx: Context<Burn>, lamports: u64) -> Result<()> {
    let sunrise_state = ctx.accounts.sunrise_state.key();
    let stake_pool = ctx.accounts.stake_pool.key();
    let bump = [ctx.accounts.state.bump];
    let seeds = beam_seeds(&sunrise_state, &stake_pool, &bump);

    burn_gsol(
        &ctx.accounts.sunrise_program,
        BurnGsol {
            state: ctx.accounts.sunrise_state.to_account_info(),
            beam: ctx.accounts.state.to_account_info(),
            gsol_mint: ctx.accounts.gsol_mint.to_account_info(),
            burn_gsol_from_owner: ctx.accounts.burner.to_account_info(),
            burn_gsol_from: ctx.accounts.gsol_token_account.to_account_info(),
            instructions_sysvar: ctx.accounts.instructions_sysvar.to_account_info(),
            token_program: ctx.accounts.token_program.to_account_info(),
        },
        &[&seeds[..]],
        lamports,
    )
}
