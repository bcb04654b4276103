//! AtlasForge CLI library.
//!
//! This crate provides the command implementations behind the `atlasforge`
//! binary: atlas builds, readiness checks, missing-sprite planning, and raw
//! tile normalization.

pub mod commands;
