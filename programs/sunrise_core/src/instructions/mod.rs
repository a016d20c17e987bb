// sunrise_core/instructions/mod.rs

pub mod admin;
pub mod beam;

pub use admin::*;
pub use beam::*;
