// spl_beam/instructions/mod.rs

pub mod admin;
pub mod crank;
pub mod open;

pub use admin::*;
pub use crank::*;
pub use open::*;
