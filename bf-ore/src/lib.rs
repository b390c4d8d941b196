//! Odds and ends shared by the `bf` crates.

pub mod assert;
pub mod env;
pub mod hash;
