// sunrise_core/instructions/admin/register_state.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

// local dependencies
use crate::{
    constants::MAX_BEAM_CAPACITY,
    errors::CoreError,
    state::{CoreState, EpochReport, RegisterStateInput, EPOCH_REPORT_SEED, GSOL_MINT_AUTHORITY_SEED},
};

#[derive(Accounts)]
#[instruction(input: RegisterStateInput)]
pub struct RegisterState<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = CoreState::size(input.initial_capacity as usize),
    )]
    pub state: Account<'info, CoreState>,

    #[account(
        init,
        payer = payer,
        space = EpochReport::size(input.initial_capacity as usize),
        seeds = [state.key().as_ref(), EPOCH_REPORT_SEED],
        bump,
    )]
    pub epoch_report: Account<'info, EpochReport>,

    pub gsol_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [state.key().as_ref(), GSOL_MINT_AUTHORITY_SEED],
        bump,
    )]
    pub gsol_mint_authority: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RegisterState>, input: RegisterStateInput) -> Result<()> {
    require!(
        input.initial_capacity as usize <= MAX_BEAM_CAPACITY,
        CoreError::WouldExceedBeamCapacity
    );

    let capacity = input.initial_capacity as usize;
    let state_key = ctx.accounts.state.key();

    // Any supply minted before this state existed is not backed by beams
    ctx.accounts.state.register(
        input,
        ctx.accounts.gsol_mint.key(),
        ctx.accounts.gsol_mint.supply,
        ctx.bumps.gsol_mint_authority,
        ctx.bumps.epoch_report,
    );
    ctx.accounts.epoch_report.register(state_key, capacity);

    Ok(())
}
