//! Data ingestion layer for the SMASH dilepton tooling.
//!
//! Parses block-structured OSCAR output into flat tables, merges lepton
//! pairs into dilepton candidates, enriches them with parent ids and
//! normalized weights, and bins them into histograms.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod histogram;
pub mod reader;

pub use oscar_core as core;
