// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # pynam-observability
//!
//! Logging infrastructure for PyNAM.
//!
//! The library crates only emit `tracing` events; this crate installs the
//! subscriber that renders them, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log files in a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known PyNAM crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "pynam",
    "pynam-config",
    "pynam-binam",
    "pynam-network",
];

/// Convert a crate name to the module path used as `tracing` target
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
