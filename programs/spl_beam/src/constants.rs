// spl_beam/constants.rs

use anchor_lang::prelude::*;
use solana_program::pubkey;

pub const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

pub const SPL_STAKE_POOL_PROGRAM: Pubkey = pubkey!("SPoo1Ku8WFXoNDMHPsrGSTSG1Y47rzgn41SLUNakuHy");

// Bytes allocated for a native stake account (StakeStateV2::size_of)
pub const STAKE_ACCOUNT_SIZE: usize = 200;
