// sunrise_core/errors.rs

use anchor_lang::prelude::*;

// Codes are matched by clients, only append new variants.
#[error_code]
pub enum CoreError {
    #[msg("Invariant violated by parameter input.")]
    InvalidParameter,
    #[msg("This beam does not support minting this amount.")]
    MintWindowExceeded,
    #[msg("This beam does not support burning this amount.")]
    BurnWindowExceeded,
    #[msg("Can't exceed the beam capacity of this state.")]
    WouldExceedBeamCapacity,
    #[msg("Tried to register an already-registered beam.")]
    DuplicateBeamEntry,
    #[msg("No space in allocations for new entry.")]
    NoSpaceInAllocations,
    #[msg("Not a valid beam that this program recognizes.")]
    UnidentifiedBeam,
    #[msg("CPI isn't directly being made by the beam program.")]
    UnidentifiedCallingProgram,
    #[msg("Can't remove a beam with a non-zero allocation.")]
    NonZeroAllocation,
    #[msg("Epoch report does not hold one entry per beam slot.")]
    IncorrectBeamEpochReportCount,
    #[msg("Beam epoch report is not for the current epoch.")]
    IncorrectBeamEpochReportEpoch,
    #[msg("Epoch report does not belong to this state.")]
    IncorrectBeamEpochReport,
    #[msg("Epoch report already updated.")]
    EpochReportAlreadyUpdated,
    #[msg("Epoch report not up to date.")]
    EpochReportNotUpToDate,
    #[msg("Overflow.")]
    Overflow,
    #[msg("Beam is draining and does not accept deposits.")]
    BeamDraining,
}
