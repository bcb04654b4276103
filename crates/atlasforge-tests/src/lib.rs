//! AtlasForge End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the atlas pipeline:
//!
//! - Build: layout + sheet or tiles -> atlas image and index
//! - Readiness: marker writes and missing-sprite planning
//! - **Determinism**: byte-identical output across repeated builds
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p atlasforge-tests
//! ```
//!
//! The `cli` test drives the built `atlasforge` binary, so build the
//! workspace first.

pub mod determinism;
pub mod fixtures;
