//!
//! Data types shared across the federation boundary
//!

pub mod ap;
