//! Emit-time diagnostics.
//!
//! The backend's error taxonomy is structural: surface-language errors are
//! caught upstream by the validator (TSN7xxx codes), so every malformed
//! construct that reaches the backend is an internal compiler error. ICEs
//! carry stable TSN9xxx codes so golden tests and bug reports can name them.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Internal compiler error: an invariant of the backend or of the
    /// frontend contract was violated. Fatal for the offending module.
    Ice,
    /// A module-level condition the orchestrator records and skips past
    /// without aborting sibling modules.
    Error,
}

/// Stable codes for internal compiler errors.
///
/// 90xx: printer/AST shape violations
/// 91xx: expression lowering
/// 92xx: pattern lowering
/// 93xx: declaration lowering
/// 94xx: type lowering
/// 95xx: generator lowering
pub mod ice_codes {
    /// An IR node kind reached a lowering that cannot represent it.
    pub const UNSUPPORTED_NODE: u32 = 9001;
    /// A member kind is invalid for its containing declaration.
    pub const INVALID_MEMBER: u32 = 9002;

    /// An arrow or function expression in a static context has no
    /// inferable signature and no annotation.
    pub const UNINFERABLE_FUNCTION_TYPE: u32 = 9101;
    /// An object literal arrived without the contextual nominal type the
    /// validator guarantees.
    pub const MISSING_OBJECT_LITERAL_TYPE: u32 = 9102;
    /// An empty array literal arrived without a contextual array type.
    pub const MISSING_ARRAY_LITERAL_TYPE: u32 = 9103;

    /// Object rest destructuring arrived without the synthesized shape
    /// (`restShapeMembers` / `restSynthTypeName`) the frontend must attach.
    pub const MISSING_REST_SHAPE: u32 = 9201;
    /// A rest element appeared before the end of an array pattern.
    pub const REST_NOT_LAST: u32 = 9202;

    /// An enum member initializer is not an integral constant.
    pub const NON_INTEGRAL_ENUM_MEMBER: u32 = 9301;
    /// An import specifier could not be bound to a namespace or CLR member.
    pub const UNRESOLVED_IMPORT: u32 = 9302;

    /// Type alias resolution re-entered a name already on the resolution
    /// path.
    pub const ALIAS_CYCLE: u32 = 9401;
    /// A function type has more parameters than the widest CLR
    /// `Func<..>`/`Action<..>` delegate.
    pub const DELEGATE_ARITY: u32 = 9402;

    /// A `yield` was encountered outside a generator body.
    pub const YIELD_OUTSIDE_GENERATOR: u32 = 9501;
}

/// An error produced while lowering or emitting a module.
///
/// Carries a stable numeric code (rendered `TSN{code}`), the module the
/// error was raised in, and a message naming the offending construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitError {
    pub severity: Severity,
    pub code: u32,
    pub module: String,
    pub message: String,
}

impl EmitError {
    pub fn ice(code: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Ice,
            code,
            module: String::new(),
            message: message.into(),
        }
    }

    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            module: String::new(),
            message: message.into(),
        }
    }

    /// Attach the module path the error was raised in. The orchestrator
    /// calls this once when collecting per-module results.
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        if self.module.is_empty() {
            self.module = module.into();
        }
        self
    }

    pub fn code_string(&self) -> String {
        format!("TSN{}", self.code)
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "TSN{}: {}", self.code, self.message)
        } else {
            write!(f, "TSN{}: {} ({})", self.code, self.message, self.module)
        }
    }
}

impl std::error::Error for EmitError {}
