//! Client components

pub mod avatar;

pub use avatar::*;
