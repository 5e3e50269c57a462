//! Test utilities for Skirm development.
//!
//! The centerpiece is [`MockEngine`], a small in-memory implementation
//! of [`GameEngine`](skirm_core::GameEngine) with real legality rules:
//! enough simulation to exercise the decision loop, the auction's
//! re-validation path, and the staleness contract, without any game
//! server.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod mock;

pub use mock::MockEngine;
