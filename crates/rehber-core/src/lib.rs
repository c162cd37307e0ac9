//! Core types and trait definitions for the Rehber contact directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the [`repository`] traits; the
//! [`service::ContactService`] facade sits on top of them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod filter;
pub mod memory;
pub mod report;
pub mod repository;
pub mod service;

pub use error::{Error, ErrorKind, Result};

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod tests;
