//! # dnsver-cli
//!
//! Command-line front end for DNS software fingerprinting.
//!
//! ## Commands
//!
//! - **scan**: classify every address of an input file, appending NDJSON results
//! - **probe**: classify a single address
//! - **collect**: dump raw probe signatures of one address for training corpora
//! - **plan**: plan provisioning images from a software manifest

pub mod cli;
pub mod config;

pub use cli::run;
