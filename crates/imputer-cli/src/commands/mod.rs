//! CLI command implementations.

pub mod fit;
pub mod inspect;
pub mod transform;
