// discovery/src/lib.rs
//! # Discovery CLI Application
//!
//! Command-line front end for `discovery-core`: analyze transcripts or audio,
//! serve variant requests against the result cache, and run the redactor or
//! auditor on their own.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
