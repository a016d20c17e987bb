//! Error types for the Sunrise client
//!
//! Failures fall in two tiers:
//! - [`PreconditionError`]: detected locally before anything is submitted
//! - [`LedgerRejection`]: a coded failure returned by one of the on-chain programs
//!
//! Neither tier is retried automatically. Both usually mean the caller's view of the
//! chain is out of date and must be refreshed before recomputing.

use solana_sdk::pubkey::Pubkey;
use spl_beam::errors::SplBeamError;
use sunrise_core::errors::CoreError;
use thiserror::Error;

use crate::beams::BeamCapability;
use crate::config::ConfigError;

/// Anchor numbers custom program errors from this offset
pub const ERROR_CODE_OFFSET: u32 = 6000;

const CORE_ERRORS: [CoreError; 16] = [
    CoreError::InvalidParameter,
    CoreError::MintWindowExceeded,
    CoreError::BurnWindowExceeded,
    CoreError::WouldExceedBeamCapacity,
    CoreError::DuplicateBeamEntry,
    CoreError::NoSpaceInAllocations,
    CoreError::UnidentifiedBeam,
    CoreError::UnidentifiedCallingProgram,
    CoreError::NonZeroAllocation,
    CoreError::IncorrectBeamEpochReportCount,
    CoreError::IncorrectBeamEpochReportEpoch,
    CoreError::IncorrectBeamEpochReport,
    CoreError::EpochReportAlreadyUpdated,
    CoreError::EpochReportNotUpToDate,
    CoreError::Overflow,
    CoreError::BeamDraining,
];

const SPL_BEAM_ERRORS: [SplBeamError; 9] = [
    SplBeamError::NotDelegated,
    SplBeamError::CalculationFailure,
    SplBeamError::Unimplemented,
    SplBeamError::YieldStakeAccountNotCooledDown,
    SplBeamError::InsufficientYieldToExtract,
    SplBeamError::DelayedUnstakeTicketsNotYetClaimable,
    SplBeamError::TooManyTicketsClaimed,
    SplBeamError::RemainingUnclaimableTicketAmount,
    SplBeamError::InvalidStakeAuthority,
];

/// Raised before any mutation is submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no beam supports {0:?}")]
    NoCapableBeam(BeamCapability),

    #[error("inadequate beam capacity: {missing} of {requested} lamports could not be placed")]
    InadequateCapacity { requested: u64, missing: u64 },

    #[error("beam {beam} does not support {capability:?}")]
    CapabilityNotSupported {
        beam: Pubkey,
        capability: BeamCapability,
    },

    #[error("beam {beam} does not implement {operation}")]
    OperationNotSupported {
        beam: Pubkey,
        operation: &'static str,
    },

    #[error("stale snapshot: generation {found}, expected {expected}")]
    StaleSnapshot { expected: u64, found: u64 },

    #[error("account {0} does not exist")]
    AccountNotFound(Pubkey),

    #[error("stake account {0} is not delegated")]
    StakeNotDelegated(Pubkey),

    #[error("amount must be greater than zero")]
    ZeroAmount,
}

/// A coded failure returned by an on-chain program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} (code {code}) from program {program_id}, instruction {instruction_index}")]
pub struct LedgerRejection {
    /// Program the error originated in, which for CPI failures is the inner program
    pub program_id: Pubkey,
    pub code: u32,
    pub name: String,
    pub instruction_index: u8,
}

impl LedgerRejection {
    pub fn new(program_id: Pubkey, code: u32, instruction_index: u8) -> Self {
        Self {
            program_id,
            code,
            name: error_name(&program_id, code),
            instruction_index,
        }
    }

    pub fn is_core_error(&self, error: CoreError) -> bool {
        self.program_id == sunrise_core::ID && self.code == u32::from(error)
    }

    pub fn is_spl_beam_error(&self, error: SplBeamError) -> bool {
        self.program_id == spl_beam::ID && self.code == u32::from(error)
    }
}

/// Resolves the variant name of a custom error code for the programs in this workspace
pub fn error_name(program_id: &Pubkey, code: u32) -> String {
    let name = if *program_id == sunrise_core::ID {
        CORE_ERRORS
            .iter()
            .find(|e| u32::from(**e) == code)
            .map(|e| format!("{e:?}"))
    } else if *program_id == spl_beam::ID {
        SPL_BEAM_ERRORS
            .iter()
            .find(|e| u32::from(**e) == code)
            .map(|e| format!("{e:?}"))
    } else {
        None
    };

    name.unwrap_or_else(|| format!("Custom({code})"))
}

/// Root error type for the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("rejected by ledger: {0}")]
    Ledger(#[from] LedgerRejection),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode {account}: {reason}")]
    Decode { account: Pubkey, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(account: Pubkey, reason: impl ToString) -> Self {
        Self::Decode {
            account,
            reason: reason.to_string(),
        }
    }

    /// Only transport failures may be retried as-is, everything else needs a fresh read first
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn rejection(&self) -> Option<&LedgerRejection> {
        match self {
            ClientError::Ledger(rejection) => Some(rejection),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_per_program() {
        assert_eq!(error_name(&sunrise_core::ID, 6004), "DuplicateBeamEntry");
        assert_eq!(error_name(&sunrise_core::ID, 6015), "BeamDraining");
        assert_eq!(error_name(&spl_beam::ID, 6000), "NotDelegated");
        assert_eq!(error_name(&spl_beam::ID, 6004), "InsufficientYieldToExtract");
        assert_eq!(
            error_name(&spl_beam::ID, 6005),
            "DelayedUnstakeTicketsNotYetClaimable"
        );
        assert_eq!(error_name(&Pubkey::new_unique(), 6004), "Custom(6004)");
    }

    #[test]
    fn same_code_differs_by_program() {
        let core = LedgerRejection::new(sunrise_core::ID, 6001, 0);
        let beam = LedgerRejection::new(spl_beam::ID, 6001, 0);

        assert!(core.is_core_error(CoreError::MintWindowExceeded));
        assert!(!beam.is_core_error(CoreError::MintWindowExceeded));
        assert!(beam.is_spl_beam_error(SplBeamError::CalculationFailure));
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(ClientError::transport("timeout").is_retryable());
        assert!(!ClientError::from(PreconditionError::ZeroAmount).is_retryable());
        assert!(!ClientError::from(LedgerRejection::new(sunrise_core::ID, 6000, 0)).is_retryable());
    }
}
