//! Core types and trait definitions for the Reel studio portfolio.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod principal;
pub mod project;
pub mod repository;
pub mod settings;
pub mod slug;
pub mod store;
pub mod whitelist;

pub use error::{Error, Result};
