// spl_beam/state/mod.rs

pub mod beam_state;
pub mod ticket;

pub use beam_state::*;
pub use ticket::*;

use anchor_lang::prelude::*;

#[constant]
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
