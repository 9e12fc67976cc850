// patrol/src/lib.rs
//! # Payload Patrol CLI
//!
//! This crate provides the command-line front end for `patrol-core`: scanning
//! JSON documents from files or stdin, scoring sentiment and normalising text.
//! The binary in `main.rs` only parses arguments, sets up logging and maps
//! command outcomes to exit codes; everything else lives here so it can be
//! exercised from tests.

pub mod cli;
pub mod commands;
pub mod logger;

pub use commands::dispatch;
