// spl_beam/lib.rs - top-level program file

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

use instructions::*;
use state::BeamStateInput;

#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    // Required fields
    name: "Sunrise SPL Stake Pool Beam",
    project_url: "https://www.sunrisestake.com/",
    contacts: "email:security@sunrisestake.com",
    // Optional Fields
    preferred_languages: "en",
    source_code: "https://github.com/sunrise-stake/sunrise-beams/tree/main/programs/spl_beam"
}

declare_id!("EUZfY4LePXSZVMvRuiVzbxazw9yBDYU99DpGJKCthxbS");

#[program]
pub mod spl_beam {
    use super::*;

    // Admin instructions

    pub fn initialize(ctx: Context<Initialize>, input: BeamStateInput) -> Result<()> {
        instructions::admin::initialize::handler(ctx, input)
    }

    pub fn update(ctx: Context<Update>, input: BeamStateInput) -> Result<()> {
        instructions::admin::update::handler(ctx, input)
    }

    // Open instructions

    pub fn deposit(ctx: Context<Deposit>, lamports: u64) -> Result<()> {
        instructions::open::deposit::handler(ctx, lamports)
    }

    pub fn deposit_stake(ctx: Context<DepositStake>) -> Result<()> {
        instructions::open::deposit_stake::handler(ctx)
    }

    pub fn withdraw(ctx: Context<Withdraw>, lamports: u64) -> Result<()> {
        instructions::open::withdraw::handler(ctx, lamports)
    }

    pub fn withdraw_stake(ctx: Context<WithdrawStake>, lamports: u64) -> Result<()> {
        instructions::open::withdraw_stake::handler(ctx, lamports)
    }

    pub fn burn(ctx: Context<Burn>, lamports: u64) -> Result<()> {
        instructions::open::burn::handler(ctx, lamports)
    }

    pub fn order_withdrawal(ctx: Context<OrderWithdrawal>, lamports: u64) -> Result<()> {
        instructions::open::order_withdrawal::handler(ctx, lamports)
    }

    pub fn redeem_ticket(ctx: Context<RedeemTicket>) -> Result<()> {
        instructions::open::redeem_ticket::handler(ctx)
    }

    // Crank instructions

    pub fn update_epoch_report(ctx: Context<UpdateEpochReport>) -> Result<()> {
        instructions::crank::update_epoch_report::handler(ctx)
    }

    pub fn extract_yield(ctx: Context<ExtractYield>) -> Result<()> {
        instructions::crank::extract_yield::handler(ctx)
    }
}
