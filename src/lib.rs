//! Shield loadout optimizer: finds the shield generator and booster combination that keeps a
//! ship's shields up longest against a given damage profile.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod optimizer;
pub mod parallel;
pub mod report;
pub mod survivability;

pub use data::DataCatalog;
pub use error::{ConfigError, Error, Result};
pub use optimizer::{compute, compute_with_hooks, SearchOptions, SearchOutcome, TestCase, TestResult};
