// sunrise_core/constants.rs

pub const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

// Allocations are whole percentages of the effective gSOL supply
pub const ONE_HUNDRED_PERCENT: u8 = 100;

// Hard cap on beam slots, resizes beyond it are rejected
pub const MAX_BEAM_CAPACITY: usize = 64;
