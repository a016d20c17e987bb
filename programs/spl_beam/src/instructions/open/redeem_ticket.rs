// spl_beam/instructions/open/redeem_ticket.rs

// external dependencies
use anchor_lang::{
    prelude::*,
    solana_program::sysvar,
    system_program::{transfer, Transfer},
};

// local dependencies
use crate::{
    errors::SplBeamError,
    state::{BeamState, ProxyTicket, STATE_SEED, TICKET_SEED, VAULT_AUTHORITY_SEED},
    utils::stake::{underlying_claim, withdraw, NativeStakeProgram},
};

// Permissionless, the lamports can only go to the ticket's beneficiary
#[derive(Accounts)]
pub struct RedeemTicket<'info> {
    #[account(
        has_one = treasury,
        seeds = [STATE_SEED, state.sunrise_state.as_ref(), state.stake_pool.as_ref()],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, BeamState>>,

    #[account(
        mut,
        close = beneficiary,
        has_one = beneficiary,
        has_one = stake_account,
        constraint = ticket.beam == state.key(),
        seeds = [TICKET_SEED, stake_account.key().as_ref()],
        bump = ticket.bump,
    )]
    pub ticket: Box<Account<'info, ProxyTicket>>,

    /// CHECK: Matches the ticket's beneficiary
    #[account(mut)]
    pub beneficiary: UncheckedAccount<'info>,

    /// CHECK: Matches the beam's treasury
    #[account(mut)]
    pub treasury: UncheckedAccount<'info>,

    /// CHECK: Matches the ticket, its authority is checked in the handler
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        mut,
        seeds = [state.key().as_ref(), VAULT_AUTHORITY_SEED],
        bump = state.vault_authority_bump,
    )]
    pub vault_authority: AccountInfo<'info>,

    pub clock: Sysvar<'info, Clock>,

    /// CHECK: Address is checked against the stake history sysvar
    #[account(address = sysvar::stake_history::ID)]
    pub stake_history: UncheckedAccount<'info>,

    pub native_stake_program: Program<'info, NativeStakeProgram>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RedeemTicket>) -> Result<()> {
    let current_epoch = ctx.accounts.clock.epoch;
    require!(
        ctx.accounts.ticket.is_unlocked(current_epoch),
        SplBeamError::DelayedUnstakeTicketsNotYetClaimable
    );

    let claim = underlying_claim(
        &ctx.accounts.stake_account,
        &ctx.accounts.stake_history,
        ctx.accounts.vault_authority.key,
        current_epoch,
    )?;
    require!(
        claim.is_cooled_down(),
        SplBeamError::DelayedUnstakeTicketsNotYetClaimable
    );
    let settlement = ctx.accounts.ticket.settle(current_epoch, &[claim])?;

    let state_key = ctx.accounts.state.key();
    let vault_authority_seeds: &[&[&[u8]]] = &[&[
        state_key.as_ref(),
        VAULT_AUTHORITY_SEED,
        &[ctx.accounts.state.vault_authority_bump],
    ]];

    // Empty the stake account into the vault authority, then pay out from there
    withdraw(
        &ctx.accounts.stake_account,           // stake account
        &ctx.accounts.vault_authority,         // withdraw authority
        &ctx.accounts.vault_authority,         // to
        &ctx.accounts.clock.to_account_info(), // clock
        &ctx.accounts.stake_history,           // stake history
        claim.lamports,                        // lamports
        vault_authority_seeds,                 // authority seeds
    )?;

    transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_authority.to_account_info(),
                to: ctx.accounts.beneficiary.to_account_info(),
            },
            vault_authority_seeds,
        ),
        settlement.to_beneficiary,
    )?;

    if settlement.to_treasury > 0 {
        transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault_authority.to_account_info(),
                    to: ctx.accounts.treasury.to_account_info(),
                },
                vault_authority_seeds,
            ),
            settlement.to_treasury,
        )?;
    }

    emit!(TicketRedeemed {
        beam: state_key,
        ticket: ctx.accounts.ticket.key(),
        beneficiary: ctx.accounts.beneficiary.key(),
        lamports: settlement.to_beneficiary,
        surplus: settlement.to_treasury,
    });

    Ok(())
}

#[event]
pub struct TicketRedeemed {
    pub beam: Pubkey,
    pub ticket: Pubkey,
    pub beneficiary: Pubkey,
    pub lamports: u64,
    pub surplus: u64,
}
