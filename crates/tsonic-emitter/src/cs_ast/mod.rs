//! The Backend C# AST.
//!
//! A closed, tagged syntax model for C# compilation units, used as the sole
//! intermediate form between lowering and printing. Nodes are immutable
//! once constructed and every container's child order is the emitted
//! order. Only `Lambda` may embed statements in expression position, and
//! only `Is`, switch-expression arms, and case pattern labels carry
//! `CsPattern` nodes.

pub mod expr;
pub mod stmt;
pub mod types;

pub use expr::{
    CsAssignOp, CsBinaryOp, CsExpr, CsInterpolationPart, CsLambdaBody, CsLambdaParam, CsPattern,
    CsPostfixOp, CsPrefixOp, CsSwitchExpressionArm,
};
pub use stmt::{CsCatchClause, CsStmt, CsSwitchLabel, CsSwitchSection};
pub use types::{CsPredefinedType, CsType};

use bitflags::bitflags;

bitflags! {
    /// Declaration and member modifiers, printed in canonical order.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const INTERNAL = 1 << 1;
        const PROTECTED = 1 << 2;
        const PRIVATE = 1 << 3;
        const STATIC = 1 << 4;
        const READONLY = 1 << 5;
        const SEALED = 1 << 6;
        const ABSTRACT = 1 << 7;
        const VIRTUAL = 1 << 8;
        const OVERRIDE = 1 << 9;
        const ASYNC = 1 << 10;
        const REQUIRED = 1 << 11;
        const PARTIAL = 1 << 12;
        const CONST = 1 << 13;
    }
}

impl Modifiers {
    /// Modifier keywords in C#'s canonical declaration order.
    pub fn keywords(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.contains(Modifiers::PUBLIC) {
            out.push("public");
        }
        if self.contains(Modifiers::INTERNAL) {
            out.push("internal");
        }
        if self.contains(Modifiers::PROTECTED) {
            out.push("protected");
        }
        if self.contains(Modifiers::PRIVATE) {
            out.push("private");
        }
        if self.contains(Modifiers::STATIC) {
            out.push("static");
        }
        if self.contains(Modifiers::ABSTRACT) {
            out.push("abstract");
        }
        if self.contains(Modifiers::SEALED) {
            out.push("sealed");
        }
        if self.contains(Modifiers::VIRTUAL) {
            out.push("virtual");
        }
        if self.contains(Modifiers::OVERRIDE) {
            out.push("override");
        }
        if self.contains(Modifiers::READONLY) {
            out.push("readonly");
        }
        if self.contains(Modifiers::CONST) {
            out.push("const");
        }
        if self.contains(Modifiers::REQUIRED) {
            out.push("required");
        }
        if self.contains(Modifiers::ASYNC) {
            out.push("async");
        }
        if self.contains(Modifiers::PARTIAL) {
            out.push("partial");
        }
        out
    }
}

/// One emitted `.cs` file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsCompilationUnit {
    /// Header comment lines, emitted verbatim before the usings.
    pub header: Option<String>,
    /// `using` directive targets, emitted in the stored order (the
    /// orchestrator sorts them before construction).
    pub usings: Vec<String>,
    pub namespace: CsNamespace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsNamespace {
    pub name: String,
    pub members: Vec<CsNamespaceMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsNamespaceMember {
    Type(CsTypeDeclaration),
    Comment(String),
    BlankLine,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsTypeKind {
    Class,
    Struct,
    Interface,
    Enum,
}

impl CsTypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CsTypeKind::Class => "class",
            CsTypeKind::Struct => "struct",
            CsTypeKind::Interface => "interface",
            CsTypeKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsTypeDeclaration {
    pub kind: CsTypeKind,
    /// Attribute text without brackets, fully qualified
    /// (e.g. `global::Tsonic.Internal.ModuleContainerAttribute`).
    pub attributes: Vec<String>,
    pub modifiers: Modifiers,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub base_types: Vec<CsType>,
    pub constraints: Vec<CsTypeParameterConstraint>,
    pub members: Vec<CsMember>,
}

impl CsTypeDeclaration {
    pub fn new(kind: CsTypeKind, modifiers: Modifiers, name: impl Into<String>) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            modifiers,
            name: name.into(),
            type_parameters: Vec::new(),
            base_types: Vec::new(),
            constraints: Vec::new(),
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsTypeParameterConstraint {
    pub parameter: String,
    pub bounds: Vec<CsType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsMember {
    Field(CsField),
    Property(CsProperty),
    Method(CsMethod),
    Constructor(CsConstructor),
    NestedType(CsTypeDeclaration),
    Delegate(CsDelegate),
    EnumMember { name: String, value: Option<CsExpr> },
    Comment(String),
    BlankLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsField {
    pub modifiers: Modifiers,
    pub ty: CsType,
    pub name: String,
    pub initializer: Option<CsExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsProperty {
    pub modifiers: Modifiers,
    pub ty: CsType,
    pub name: String,
    pub accessors: CsAccessors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsAccessors {
    /// `{ get; }` / `{ get; set; }` / `{ get; init; }`
    Auto { setter: CsAutoSetter },
    /// Bodied accessors; either may be absent.
    Bodied {
        getter: Option<Vec<CsStmt>>,
        setter: Option<Vec<CsStmt>>,
    },
    /// `=> expr;`
    ExpressionBodied(CsExpr),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsAutoSetter {
    None,
    Set,
    Init,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsMethod {
    pub modifiers: Modifiers,
    /// `None` only for implicit-typed local functions is not allowed; a
    /// method always has a return type (use `void`).
    pub return_type: CsType,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<CsParameter>,
    pub constraints: Vec<CsTypeParameterConstraint>,
    /// `None` for interface signatures and abstract methods.
    pub body: Option<Vec<CsStmt>>,
}

impl CsMethod {
    pub fn new(modifiers: Modifiers, return_type: CsType, name: impl Into<String>) -> Self {
        Self {
            modifiers,
            return_type,
            name: name.into(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            constraints: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsParameter {
    /// `params` / `ref` / `out` keyword, if any.
    pub modifier: Option<&'static str>,
    pub ty: CsType,
    pub name: String,
    pub default: Option<CsExpr>,
}

impl CsParameter {
    pub fn new(ty: CsType, name: impl Into<String>) -> Self {
        Self {
            modifier: None,
            ty,
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: CsExpr) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsConstructor {
    pub modifiers: Modifiers,
    /// The declaring type's name.
    pub name: String,
    pub parameters: Vec<CsParameter>,
    /// `: base(...)` / `: this(...)`
    pub initializer: Option<(CsConstructorInitializerKind, Vec<CsExpr>)>,
    pub body: Vec<CsStmt>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsConstructorInitializerKind {
    Base,
    This,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsDelegate {
    pub modifiers: Modifiers,
    pub return_type: CsType,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<CsParameter>,
}
