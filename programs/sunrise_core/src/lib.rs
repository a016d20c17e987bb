// sunrise_core/lib.rs - top-level program file

pub mod constants;
pub mod errors;
pub mod instructions;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

use instructions::*;
use state::{AllocationUpdate, RegisterStateInput, UpdateStateInput};

#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    // Required fields
    name: "Sunrise Core Program",
    project_url: "https://www.sunrisestake.com/",
    contacts: "email:security@sunrisestake.com",
    // Optional Fields
    preferred_languages: "en",
    source_code: "https://github.com/sunrise-stake/sunrise-beams/tree/main/programs/sunrise_core"
}

declare_id!("suncPB4RR39bMwnRhCym6ZLKqMfnFG83vjzVVuXNhCq");

#[program]
pub mod sunrise_core {
    use super::*;

    // Admin instructions

    pub fn register_state(ctx: Context<RegisterState>, input: RegisterStateInput) -> Result<()> {
        instructions::admin::register_state::handler(ctx, input)
    }

    pub fn update_state(ctx: Context<UpdateState>, input: UpdateStateInput) -> Result<()> {
        instructions::admin::update_state::handler(ctx, input)
    }

    pub fn register_beam(ctx: Context<RegisterBeam>) -> Result<()> {
        instructions::admin::register_beam::handler(ctx)
    }

    pub fn resize_allocations(ctx: Context<ResizeAllocations>, additional_beams: u8) -> Result<()> {
        instructions::admin::resize_allocations::handler(ctx, additional_beams)
    }

    pub fn update_allocations(
        ctx: Context<UpdateAllocations>,
        new_allocations: Vec<AllocationUpdate>,
    ) -> Result<()> {
        instructions::admin::update_allocations::handler(ctx, new_allocations)
    }

    pub fn remove_beam(ctx: Context<RemoveBeam>, beam: Pubkey) -> Result<()> {
        instructions::admin::remove_beam::handler(ctx, beam)
    }

    pub fn set_draining_mode(
        ctx: Context<SetDrainingMode>,
        beam: Pubkey,
        draining_mode: bool,
    ) -> Result<()> {
        instructions::admin::set_draining_mode::handler(ctx, beam, draining_mode)
    }

    pub fn export_mint_authority(ctx: Context<ExportMintAuthority>) -> Result<()> {
        instructions::admin::export_mint_authority::handler(ctx)
    }

    // Beam instructions (CPI only, signed by a registered beam)

    pub fn mint_gsol(ctx: Context<MintGsol>, amount: u64) -> Result<()> {
        instructions::beam::mint_gsol::handler(ctx, amount)
    }

    pub fn burn_gsol(ctx: Context<BurnGsol>, amount: u64) -> Result<()> {
        instructions::beam::burn_gsol::handler(ctx, amount)
    }

    pub fn transfer_gsol(
        ctx: Context<TransferGsol>,
        recipient_beam: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::beam::transfer_gsol::handler(ctx, recipient_beam, amount)
    }

    pub fn update_epoch_report(
        ctx: Context<UpdateEpochReport>,
        epoch: u64,
        extractable_yield: u64,
    ) -> Result<()> {
        instructions::beam::update_epoch_report::handler(ctx, epoch, extractable_yield)
    }

    pub fn extract_yield(ctx: Context<ExtractYield>, amount: u64) -> Result<()> {
        instructions::beam::extract_yield::handler(ctx, amount)
    }
}
