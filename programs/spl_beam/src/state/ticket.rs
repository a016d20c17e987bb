// spl_beam/state/ticket.rs

use anchor_lang::prelude::*;

use crate::errors::SplBeamError;

#[constant]
pub const TICKET_SEED: &[u8] = b"ticket";

/// Claim on a deactivating stake account split out of the pool on behalf of `beneficiary`.
#[account]
#[derive(Debug, Default)]
pub struct ProxyTicket {
    pub sunrise_state: Pubkey,
    pub beam: Pubkey,
    pub stake_account: Pubkey, // underlying delayed-unstake position, withdrawable by the vault authority
    pub beneficiary: Pubkey,
    pub lamports: u64,      // owed to the beneficiary on redemption
    pub unlock_epoch: u64,  // first epoch in which the ticket can be redeemed
    pub bump: u8,
}

/// Balance of one underlying stake account at redemption time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnderlyingClaim {
    pub lamports: u64,     // total balance
    pub withdrawable: u64, // portion the stake program releases this epoch
}

impl UnderlyingClaim {
    /// Nothing is held back by the stake program's cooldown
    pub fn is_cooled_down(&self) -> bool {
        self.withdrawable >= self.lamports
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    pub to_beneficiary: u64,
    pub to_treasury: u64,
}

impl ProxyTicket {
    pub const SIZE: usize = 8 + // discriminator
        32 + // sunrise_state
        32 + // beam
        32 + // stake_account
        32 + // beneficiary
        8 + // lamports
        8 + // unlock_epoch
        1; // bump

    pub fn is_unlocked(&self, current_epoch: u64) -> bool {
        current_epoch >= self.unlock_epoch
    }

    /// Splits the matched underlying balances between the beneficiary and the treasury.
    /// Either everything is released or nothing is.
    pub fn settle(
        &self,
        current_epoch: u64,
        claims: &[UnderlyingClaim],
    ) -> std::result::Result<Settlement, SplBeamError> {
        if !self.is_unlocked(current_epoch) {
            return Err(SplBeamError::DelayedUnstakeTicketsNotYetClaimable);
        }

        let (available, withdrawable) = claims.iter().try_fold((0u64, 0u64), |(a, w), claim| {
            Some((a.checked_add(claim.lamports)?, w.checked_add(claim.withdrawable)?))
        })
        .ok_or(SplBeamError::CalculationFailure)?;

        if self.lamports > available {
            return Err(SplBeamError::TooManyTicketsClaimed);
        }
        if withdrawable < available {
            return Err(SplBeamError::RemainingUnclaimableTicketAmount);
        }

        Ok(Settlement {
            to_beneficiary: self.lamports,
            to_treasury: available - self.lamports,
        })
    }
}
