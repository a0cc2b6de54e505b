//! IR expressions.
//!
//! Every expression carries an optional `inferredType` from the checker.
//! Most lowerings degrade gracefully when it is absent; boolean-context
//! lowering falls back to the runtime-truthiness switch.

use serde::{Deserialize, Serialize};

use crate::pattern::IrPattern;
use crate::stmt::IrStatement;
use crate::types::IrType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrExpr {
    #[serde(flatten)]
    pub kind: IrExprKind,
    #[serde(default)]
    pub inferred_type: Option<IrType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrExprKind {
    #[serde(rename_all = "camelCase")]
    NumberLiteral { value: f64 },
    #[serde(rename_all = "camelCase")]
    StringLiteral { value: String },
    #[serde(rename_all = "camelCase")]
    BooleanLiteral { value: bool },
    NullLiteral,
    UndefinedLiteral,
    #[serde(rename_all = "camelCase")]
    Identifier { name: String },
    This,
    Super,
    #[serde(rename_all = "camelCase")]
    TemplateLiteral { parts: Vec<IrTemplatePart> },
    #[serde(rename_all = "camelCase")]
    ArrayLiteral { elements: Vec<IrExpr> },
    /// Object literals require a contextual nominal type from the
    /// frontend; `typeName` names it (a local type or a moduleMap entry).
    #[serde(rename_all = "camelCase")]
    ObjectLiteral {
        type_name: Option<String>,
        properties: Vec<IrObjectProperty>,
    },
    #[serde(rename_all = "camelCase")]
    Member {
        object: Box<IrExpr>,
        property: String,
        #[serde(default)]
        optional: bool,
    },
    #[serde(rename_all = "camelCase")]
    Index {
        object: Box<IrExpr>,
        index: Box<IrExpr>,
        #[serde(default)]
        optional: bool,
    },
    #[serde(rename_all = "camelCase")]
    Call {
        callee: Box<IrExpr>,
        arguments: Vec<IrExpr>,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        #[serde(default)]
        optional: bool,
    },
    #[serde(rename_all = "camelCase")]
    New {
        callee: Box<IrExpr>,
        arguments: Vec<IrExpr>,
        #[serde(default)]
        type_arguments: Vec<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    Unary {
        op: IrUnaryOp,
        operand: Box<IrExpr>,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        op: IrUpdateOp,
        #[serde(default)]
        prefix: bool,
        operand: Box<IrExpr>,
    },
    #[serde(rename_all = "camelCase")]
    Binary {
        op: IrBinaryOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    #[serde(rename_all = "camelCase")]
    Logical {
        op: IrLogicalOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    #[serde(rename_all = "camelCase")]
    Assignment {
        target: IrAssignTarget,
        op: IrAssignOp,
        value: Box<IrExpr>,
    },
    #[serde(rename_all = "camelCase")]
    Conditional {
        condition: Box<IrExpr>,
        consequent: Box<IrExpr>,
        alternate: Box<IrExpr>,
    },
    /// Arrow functions and function expressions.
    #[serde(rename_all = "camelCase")]
    Function {
        #[serde(default)]
        name: Option<String>,
        parameters: Vec<crate::decl::IrParameter>,
        body: IrFunctionBody,
        #[serde(default)]
        is_arrow: bool,
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        return_type: Option<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    TypeOf { operand: Box<IrExpr> },
    #[serde(rename_all = "camelCase")]
    Await { operand: Box<IrExpr> },
    #[serde(rename_all = "camelCase")]
    Yield {
        #[serde(default)]
        argument: Option<Box<IrExpr>>,
        #[serde(default)]
        delegate: bool,
    },
    /// `new Array(n)` / `Array(n)` admitted by the validator when the
    /// element type is locally inferable.
    #[serde(rename_all = "camelCase")]
    ArrayConstructor {
        length: Box<IrExpr>,
        #[serde(default)]
        element_type: Option<IrType>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrTemplatePart {
    #[serde(rename_all = "camelCase")]
    Text { text: String },
    #[serde(rename_all = "camelCase")]
    Expression { expression: IrExpr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrObjectProperty {
    pub name: String,
    pub value: IrExpr,
}

/// Assignment left-hand sides: either a plain expression target or a
/// destructuring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrAssignTarget {
    #[serde(rename_all = "camelCase")]
    Expression { expression: Box<IrExpr> },
    #[serde(rename_all = "camelCase")]
    Pattern { pattern: IrPattern },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IrFunctionBody {
    Block(Vec<IrStatement>),
    Expression(Box<IrExpr>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrUnaryOp {
    Not,
    Minus,
    Plus,
    BitNot,
    Void,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrUpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equals,
    NotEquals,
    InstanceOf,
    In,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrLogicalOp {
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrAssignOp {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    CoalesceAssign,
}

impl IrExpr {
    pub fn new(kind: IrExprKind) -> Self {
        Self {
            kind,
            inferred_type: None,
        }
    }

    pub fn with_type(kind: IrExprKind, ty: IrType) -> Self {
        Self {
            kind,
            inferred_type: Some(ty),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(IrExprKind::Identifier { name: name.into() })
    }

    pub fn number(value: f64) -> Self {
        Self::with_type(IrExprKind::NumberLiteral { value }, IrType::Number)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::with_type(
            IrExprKind::StringLiteral {
                value: value.into(),
            },
            IrType::String,
        )
    }

    pub fn boolean(value: bool) -> Self {
        Self::with_type(IrExprKind::BooleanLiteral { value }, IrType::Boolean)
    }

    pub fn null() -> Self {
        Self::new(IrExprKind::NullLiteral)
    }

    pub fn member(object: IrExpr, property: impl Into<String>) -> Self {
        Self::new(IrExprKind::Member {
            object: Box::new(object),
            property: property.into(),
            optional: false,
        })
    }

    pub fn index(object: IrExpr, index: IrExpr) -> Self {
        Self::new(IrExprKind::Index {
            object: Box::new(object),
            index: Box::new(index),
            optional: false,
        })
    }

    pub fn call(callee: IrExpr, arguments: Vec<IrExpr>) -> Self {
        Self::new(IrExprKind::Call {
            callee: Box::new(callee),
            arguments,
            type_arguments: Vec::new(),
            optional: false,
        })
    }

    pub fn binary(left: IrExpr, op: IrBinaryOp, right: IrExpr) -> Self {
        Self::new(IrExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(left: IrExpr, op: IrLogicalOp, right: IrExpr) -> Self {
        Self::new(IrExprKind::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(target: IrExpr, value: IrExpr) -> Self {
        Self::new(IrExprKind::Assignment {
            target: IrAssignTarget::Expression {
                expression: Box::new(target),
            },
            op: IrAssignOp::Assign,
            value: Box::new(value),
        })
    }

    pub fn yield_expr(argument: Option<IrExpr>) -> Self {
        Self::new(IrExprKind::Yield {
            argument: argument.map(Box::new),
            delegate: false,
        })
    }

    /// A literal in the boolean-folding sense: its truthiness is decidable
    /// at lowering time without evaluating anything.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            IrExprKind::NumberLiteral { .. }
                | IrExprKind::StringLiteral { .. }
                | IrExprKind::BooleanLiteral { .. }
                | IrExprKind::NullLiteral
                | IrExprKind::UndefinedLiteral
        )
    }
}
