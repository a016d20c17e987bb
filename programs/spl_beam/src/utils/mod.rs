// spl_beam/utils/mod.rs

pub mod core;
pub mod pool;
pub mod stake;
