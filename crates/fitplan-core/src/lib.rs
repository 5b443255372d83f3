//! Core types and trait definitions for the fitplan assignment engine.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain model, the [`store::PlanStore`] abstraction, the plan drawing
//! algorithm and the [`planner::Planner`] facade that ties them together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod catalog;
pub mod error;
pub mod planner;
pub mod schedule;
pub mod stats;
pub mod store;
pub mod user;

pub use error::{Error, Result};
