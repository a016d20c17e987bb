// spl_beam/utils/core.rs

// external dependencies
use anchor_lang::prelude::*;
use sunrise_core::cpi::accounts::{BurnGsol, ExtractYield, MintGsol, UpdateEpochReport};

// local dependencies
use crate::state::STATE_SEED;

/// Seeds of the beam state PDA, the key the core knows this beam by.
pub fn beam_seeds<'a>(sunrise_state: &'a Pubkey, stake_pool: &'a Pubkey, bump: &'a [u8]) -> [&'a [u8]; 4] {
    [STATE_SEED, sunrise_state.as_ref(), stake_pool.as_ref(), bump]
}

pub fn mint_gsol<'info>(
    core_program: &AccountInfo<'info>,
    accounts: MintGsol<'info>,
    beam_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    sunrise_core::cpi::mint_gsol(
        CpiContext::new_with_signer(core_program.clone(), accounts, beam_seeds),
        amount,
    )
}

pub fn burn_gsol<'info>(
    core_program: &AccountInfo<'info>,
    accounts: BurnGsol<'info>,
    beam_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    sunrise_core::cpi::burn_gsol(
        CpiContext::new_with_signer(core_program.clone(), accounts, beam_seeds),
        amount,
    )
}

pub fn update_epoch_report<'info>(
    core_program: &AccountInfo<'info>,
    accounts: UpdateEpochReport<'info>,
    beam_seeds: &[&[&[u8]]],
    epoch: u64,
    extractable_yield: u64,
) -> Result<()> {
    sunrise_core::cpi::update_epoch_report(
        CpiContext::new_with_signer(core_program.clone(), accounts, beam_seeds),
        epoch,
        extractable_yield,
    )
}

pub fn extract_yield<'info>(
    core_program: &AccountInfo<'info>,
    accounts: ExtractYield<'info>,
    beam_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    sunrise_core::cpi::extract_yield(
        CpiContext::new_with_signer(core_program.clone(), accounts, beam_seeds),
        amount,
    )
}
