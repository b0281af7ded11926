//! Dump Session Tests
//!
//! End-to-end tests through the public `vardump` facade:
//! - protocol: event sequences for representative graphs
//! - capabilities: optional contract parts gated per writer
//! - properties: randomized cyclic graphs (proptest)
//! - writers: rendered text, JSON and HTML output
//! - failures: error propagation and stop() policy
//! - config: `vardump.toml` driven dumps

#[path = "../common/mod.rs"]
mod common;

mod config;
mod properties;
mod protocol;
mod writers;
