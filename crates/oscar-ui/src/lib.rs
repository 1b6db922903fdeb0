//! Terminal UI layer for the SMASH dilepton tooling.
//!
//! Provides themes, the histogram bar-chart view, the per-parent summary
//! table, and the application event loop built on top of [`ratatui`].

pub mod app;
pub mod histogram_view;
pub mod summary_view;
pub mod themes;

pub use oscar_data as data;
