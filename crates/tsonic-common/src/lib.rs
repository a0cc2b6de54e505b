//! Common types for the tsonic C# backend.
//!
//! This crate provides the foundational pieces shared by the IR model and
//! the emitter:
//! - Emit-time diagnostics (`EmitError`, ICE codes)
//! - Centralized limits and thresholds

pub mod diagnostics;
pub use diagnostics::{EmitError, Severity};

pub mod limits;
