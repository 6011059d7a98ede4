//! # Arena Common
//!
//! Common types, utilities, and shared abstractions for the Arena backdrop.
//!
//! This crate provides foundational types used across all Arena subsystems:
//! - Colors with hex parsing and brightness/blend helpers
//! - The error taxonomy shared by the stage engines
//! - An injectable random source
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod random;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::random::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_exports() {
        let sky = Color::from_hex("#1a2a3a").expect("valid hex");
        assert_eq!(sky.lighten(30), Color::rgb(0x38, 0x48, 0x58));

        let err = StageError::not_found("scene", "volcano");
        assert!(err.is_not_found());

        let mut rng = SeededRandom::with_seed(7);
        assert!(rng.next_f32() < 1.0);
    }
}
