//! Core domain types for the SMASH dilepton tooling.
//!
//! Holds the block-context and table model produced by the OSCAR parser,
//! the error taxonomy, kinematic formulas, column storage types, particle
//! name lookup, number formatting and the command-line settings.

pub mod dtypes;
pub mod error;
pub mod formatting;
pub mod kinematics;
pub mod models;
pub mod pdg;
pub mod settings;

pub use error::{OscarError, Result};
