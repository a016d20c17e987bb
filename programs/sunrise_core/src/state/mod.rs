// sunrise_core/state/mod.rs

pub mod beam_details;
pub mod core_state;
pub mod epoch_report;

pub use beam_details::*;
pub use core_state::*;
pub use epoch_report::*;

use anchor_lang::prelude::*;

#[constant]
pub const GSOL_MINT_AUTHORITY_SEED: &[u8] = b"gsol_mint_authority";
