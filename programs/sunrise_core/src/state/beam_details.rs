// sunrise_core/state/beam_details.rs

use anchor_lang::prelude::*;

use crate::{constants::ONE_HUNDRED_PERCENT, errors::CoreError};

/// One slot of the beam registry. A default value marks a free slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeamDetails {
    pub key: Pubkey,              // signer the beam program uses for CPIs into this program
    pub allocation: u8,           // percentage of the effective supply this beam backs
    pub partial_gsol_supply: u64, // gSOL minted minus burned through this beam
    pub draining_mode: bool,      // no new mints while set, burns are still allowed
}

impl BeamDetails {
    pub const SIZE: usize = 32 + // key
        1 + // allocation
        8 + // partial_gsol_supply
        1; // draining_mode

    pub fn new(key: Pubkey) -> Self {
        Self {
            key,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key == Pubkey::default()
    }

    /// Upper bound of gSOL this beam may back given the current effective supply.
    /// An empty pool has no proportional constraint, so the requested amount is the window.
    pub fn mint_window(&self, effective_supply: u64, amount: u64) -> std::result::Result<u64, CoreError> {
        if effective_supply == 0 {
            return Ok(amount);
        }

        let window = (effective_supply as u128)
            .checked_mul(self.allocation.into())
            .ok_or(CoreError::Overflow)?
            / u128::from(ONE_HUNDRED_PERCENT);

        u64::try_from(window).map_err(|_| CoreError::Overflow)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationUpdate {
    pub beam: Pubkey,
    pub new_allocation: u8,
}
