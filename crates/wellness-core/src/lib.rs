//! Core types and trait definitions for the Spring into Wellness challenge.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the domain records, the [`store::WellnessStore`] abstraction and
//! the pure rules (streaks, tiers, team scoring, the optimistic daily board)
//! that the service layer composes.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod admin;
pub mod board;
pub mod clock;
pub mod error;
pub mod log;
pub mod store;
pub mod streak;
pub mod team;
pub mod tier;
pub mod user;

pub use error::{Error, Result, StoreError, StoreErrorKind};
