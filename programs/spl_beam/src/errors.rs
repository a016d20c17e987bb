// spl_beam/errors.rs

use anchor_lang::prelude::*;

// Codes are matched by clients, append only.
#[error_code]
pub enum SplBeamError {
    #[msg("The stake account is not delegated")]
    NotDelegated,
    #[msg("An error occurred during calculation")]
    CalculationFailure,
    #[msg("This feature is unimplemented for this beam")]
    Unimplemented,
    #[msg("The yield stake account cannot yet be claimed")]
    YieldStakeAccountNotCooledDown,
    #[msg("There is no yield to extract")]
    InsufficientYieldToExtract,
    #[msg("Delayed unstake tickets are not yet claimable")]
    DelayedUnstakeTicketsNotYetClaimable,
    #[msg("The ticket claims more lamports than the underlying stake holds")]
    TooManyTicketsClaimed,
    #[msg("The underlying stake still holds lamports that cannot be withdrawn")]
    RemainingUnclaimableTicketAmount,
    #[msg("The stake account is not owned by the beam's vault authority")]
    InvalidStakeAuthority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(u32::from(SplBeamError::NotDelegated), 6000);
        assert_eq!(u32::from(SplBeamError::CalculationFailure), 6001);
        assert_eq!(u32::from(SplBeamError::Unimplemented), 6002);
        assert_eq!(u32::from(SplBeamError::YieldStakeAccountNotCooledDown), 6003);
        assert_eq!(u32::from(SplBeamError::InsufficientYieldToExtract), 6004);
        assert_eq!(u32::from(SplBeamError::DelayedUnstakeTicketsNotYetClaimable), 6005);
        assert_eq!(u32::from(SplBeamError::InvalidStakeAuthority), 6008);
    }
}
