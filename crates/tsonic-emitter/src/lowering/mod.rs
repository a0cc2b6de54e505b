//! Lowering passes: IR constructs to Backend AST nodes.
//!
//! Each pass takes the emitter context `&mut` and returns `Result`;
//! scope entry/exit is explicit via `EmitterContext::enter_scope` /
//! `leave_scope`. No pass writes text: everything goes through the
//! Backend AST and the printer.

pub mod declarations;
pub mod expressions;
pub mod expressions_literals;
pub mod functions;
pub mod generators;
pub mod patterns;
pub mod statements;
pub mod truthiness;
pub mod types;

/// Fully-qualified runtime symbols the emitted code links against.
pub mod runtime {
    pub const UNION: &str = "global::Tsonic.Runtime.Union";
    pub const ARRAY_HELPERS_SLICE: &str = "global::Tsonic.Runtime.ArrayHelpers.Slice";
    pub const ITERATOR_RESULT: &str = "global::Tsonic.Runtime.IteratorResult";
    pub const OPERATORS_TYPEOF: &str = "global::Tsonic.Runtime.Operators.TypeOf";
    pub const MODULE_CONTAINER_ATTRIBUTE: &str = "global::Tsonic.Internal.ModuleContainerAttribute";
    pub const ENUMERATOR: &str = "global::System.Collections.Generic.IEnumerator";
    pub const ASYNC_ENUMERATOR: &str = "global::System.Collections.Generic.IAsyncEnumerator";
    pub const TASK: &str = "global::System.Threading.Tasks.Task";
    pub const DICTIONARY: &str = "global::System.Collections.Generic.Dictionary";
    pub const EXCEPTION: &str = "global::System.Exception";
    pub const FUNC: &str = "global::System.Func";
    pub const ACTION: &str = "global::System.Action";
}
