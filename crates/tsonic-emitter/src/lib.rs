//! The tsonic C# backend: lowers proof-annotated IR modules into
//! deterministic C# compilation units.
//!
//! Pipeline: per module, the orchestrator builds a root
//! [`emit_context::EmitterContext`], the lowering passes translate IR
//! declarations/statements/expressions into the Backend AST
//! ([`cs_ast`]), and the [`printer`] serializes each compilation unit
//! to text. Same IR in, byte-identical file map out — independent of
//! host locale, time, and scheduling.

pub mod cs_ast;
pub mod emit_context;
pub mod lowering;
pub mod naming;
pub mod orchestrator;
pub mod printer;
pub mod source_writer;

pub use emit_context::{EmitterContext, EmitterOptions, ModuleMapEntry};
pub use orchestrator::{emit_program, EmitResult};
