//! # valuerank - pick, rank and sync your top values
//!
//! valuerank walks a person through choosing up to ten personal values from
//! a fixed catalog, ordering them, and saving the ranking as a named list.
//! Saves work offline: a write that cannot reach the list store is queued
//! locally and replayed once the connection returns.
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize a new project
//! valuerank init
//!
//! # Pick values and reorder them
//! valuerank pick Family
//! valuerank pick "Mental Health"
//! valuerank move selected 2 selected 1
//!
//! # Save and reload
//! valuerank save "Spring 2026" --user alice
//! valuerank lists --user alice
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: The values a user can pick from
//! - [`reorder`]: Moving values between and within groups
//! - [`controller`]: The live board and its backup
//! - [`storage`]: Local key/value storage and the board backup
//! - [`sync`]: Saving with retry, the offline queue and replay
//! - [`remote`]: Where saved lists live
//! - [`server`]: HTTP surface for saved lists

/// The static catalog of values.
pub mod catalog;

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.valuerank.toml` configuration files and project discovery.
pub mod config;

pub mod controller;

/// Error types and result aliases.
///
/// Defines `RankError` enum and `Result<T>` type alias.
pub mod error;

pub mod logging;

/// Data models for valuerank.
///
/// Includes `Board`, `GroupId`, `ValueItem` and `PriorityList`.
pub mod model;

pub mod remote;

/// Board reordering rules.
pub mod reorder;

/// HTTP server for saved lists.
pub mod server;

/// Local persistence.
pub mod storage;

pub mod sync;

/// Input validation utilities.
///
/// Validates user ids, list ids and list names.
pub mod validation;
