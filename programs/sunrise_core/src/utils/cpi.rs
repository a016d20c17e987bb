// sunrise_core/utils/cpi.rs

// external dependencies
use anchor_lang::{
    prelude::*,
    solana_program::sysvar::instructions::get_instruction_relative,
};

// local dependencies
use crate::{errors::CoreError, state::CoreState};

/// Program id of the top-level instruction that is currently executing.
pub fn get_cpi_program_id(instructions_sysvar: &AccountInfo) -> Result<Pubkey> {
    let current_ix = get_instruction_relative(0, instructions_sysvar)?;
    Ok(current_ix.program_id)
}

/// Resolves the slot of the signing beam, checking that the calling program owns
/// the beam account and that the beam is registered.
pub fn checked_find_beam_idx(
    state: &CoreState,
    beam: &AccountInfo,
    cpi_program_id: &Pubkey,
) -> std::result::Result<usize, CoreError> {
    if beam.owner != cpi_program_id {
        return Err(CoreError::UnidentifiedCallingProgram);
    }

    state
        .find_beam_index(beam.key)
        .ok_or(CoreError::UnidentifiedBeam)
}

pub fn check_calling_beam(
    state: &CoreState,
    beam: &AccountInfo,
    instructions_sysvar: &AccountInfo,
) -> Result<usize> {
    let cpi_program = get_cpi_program_id(instructions_sysvar)?;
    Ok(checked_find_beam_idx(state, beam, &cpi_program)?)
}
