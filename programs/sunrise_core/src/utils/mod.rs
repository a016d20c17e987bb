// sunrise_core/utils/mod.rs

pub mod cpi;
pub mod token;
