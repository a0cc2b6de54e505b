//! C# expression and pattern syntax.
//!
//! Expressions are a closed tagged set with builder constructors; lowering
//! assembles trees from these and hands them to the printer, which owns
//! all parenthesization decisions.

use super::stmt::CsStmt;
use super::types::CsType;

#[derive(Debug, Clone, PartialEq)]
pub enum CsExpr {
    /// Opaque literal text (numeric, string, `true`, `null`, ...). The
    /// lowering that constructs it is responsible for escaping.
    Literal(String),
    Identifier(String),
    Parenthesized(Box<CsExpr>),
    MemberAccess {
        receiver: Box<CsExpr>,
        name: String,
        conditional: bool,
    },
    ElementAccess {
        receiver: Box<CsExpr>,
        arguments: Vec<CsExpr>,
        conditional: bool,
    },
    Invocation {
        callee: Box<CsExpr>,
        type_arguments: Vec<CsType>,
        arguments: Vec<CsExpr>,
    },
    ObjectCreation {
        ty: CsType,
        arguments: Vec<CsExpr>,
        initializer: Option<Vec<(String, CsExpr)>>,
    },
    ArrayCreation {
        element_type: Option<CsType>,
        length: Option<Box<CsExpr>>,
        initializer: Option<Vec<CsExpr>>,
    },
    StackAllocArrayCreation {
        element_type: CsType,
        length: Box<CsExpr>,
    },
    Assignment {
        target: Box<CsExpr>,
        op: CsAssignOp,
        value: Box<CsExpr>,
    },
    Binary {
        op: CsBinaryOp,
        left: Box<CsExpr>,
        right: Box<CsExpr>,
    },
    PrefixUnary {
        op: CsPrefixOp,
        operand: Box<CsExpr>,
    },
    PostfixUnary {
        op: CsPostfixOp,
        operand: Box<CsExpr>,
    },
    Conditional {
        condition: Box<CsExpr>,
        when_true: Box<CsExpr>,
        when_false: Box<CsExpr>,
    },
    Cast {
        ty: CsType,
        operand: Box<CsExpr>,
    },
    As {
        operand: Box<CsExpr>,
        ty: CsType,
    },
    Is {
        operand: Box<CsExpr>,
        pattern: CsPattern,
    },
    Default(Option<CsType>),
    Await(Box<CsExpr>),
    Lambda {
        parameters: Vec<CsLambdaParam>,
        body: CsLambdaBody,
        is_async: bool,
    },
    InterpolatedString(Vec<CsInterpolationPart>),
    Throw(Box<CsExpr>),
    /// `expr!`
    SuppressNullableWarning(Box<CsExpr>),
    Typeof(CsType),
    SwitchExpression {
        operand: Box<CsExpr>,
        arms: Vec<CsSwitchExpressionArm>,
    },
    /// Opaque escape hatch; see `CsType::Raw`.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsSwitchExpressionArm {
    pub pattern: CsPattern,
    pub when_clause: Option<CsExpr>,
    pub result: CsExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsLambdaParam {
    pub name: String,
    pub ty: Option<CsType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsLambdaBody {
    Expression(Box<CsExpr>),
    Block(Vec<CsStmt>),
}

/// Patterns appear only under `Is`, switch-expression arms, and case
/// pattern labels.
#[derive(Debug, Clone, PartialEq)]
pub enum CsPattern {
    Type(CsType),
    Declaration { ty: CsType, designator: String },
    Var(String),
    Constant(Box<CsExpr>),
    Discard,
    Not(Box<CsPattern>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsAssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Coalesce,
}

impl CsAssignOp {
    pub fn text(self) -> &'static str {
        match self {
            CsAssignOp::Assign => "=",
            CsAssignOp::Add => "+=",
            CsAssignOp::Subtract => "-=",
            CsAssignOp::Multiply => "*=",
            CsAssignOp::Divide => "/=",
            CsAssignOp::Remainder => "%=",
            CsAssignOp::Coalesce => "??=",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    LogicalAnd,
    LogicalOr,
    Coalesce,
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
}

impl CsBinaryOp {
    pub fn text(self) -> &'static str {
        match self {
            CsBinaryOp::Add => "+",
            CsBinaryOp::Subtract => "-",
            CsBinaryOp::Multiply => "*",
            CsBinaryOp::Divide => "/",
            CsBinaryOp::Remainder => "%",
            CsBinaryOp::LogicalAnd => "&&",
            CsBinaryOp::LogicalOr => "||",
            CsBinaryOp::Coalesce => "??",
            CsBinaryOp::BitAnd => "&",
            CsBinaryOp::BitOr => "|",
            CsBinaryOp::BitXor => "^",
            CsBinaryOp::ShiftLeft => "<<",
            CsBinaryOp::ShiftRight => ">>",
            CsBinaryOp::Less => "<",
            CsBinaryOp::LessEqual => "<=",
            CsBinaryOp::Greater => ">",
            CsBinaryOp::GreaterEqual => ">=",
            CsBinaryOp::Equals => "==",
            CsBinaryOp::NotEquals => "!=",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsPrefixOp {
    Not,
    Minus,
    Plus,
    BitNot,
    Increment,
    Decrement,
}

impl CsPrefixOp {
    pub fn text(self) -> &'static str {
        match self {
            CsPrefixOp::Not => "!",
            CsPrefixOp::Minus => "-",
            CsPrefixOp::Plus => "+",
            CsPrefixOp::BitNot => "~",
            CsPrefixOp::Increment => "++",
            CsPrefixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsPostfixOp {
    Increment,
    Decrement,
}

impl CsPostfixOp {
    pub fn text(self) -> &'static str {
        match self {
            CsPostfixOp::Increment => "++",
            CsPostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsInterpolationPart {
    /// Verbatim text; the constructor is responsible for `{`/`}` escaping.
    Text(String),
    Expression {
        expression: CsExpr,
        format: Option<String>,
    },
}

impl CsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        CsExpr::Identifier(name.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        CsExpr::Literal(text.into())
    }

    pub fn null() -> Self {
        CsExpr::Literal("null".to_string())
    }

    pub fn bool(value: bool) -> Self {
        let text = if value { "true" } else { "false" };
        CsExpr::Literal(text.to_string())
    }

    pub fn int(value: i64) -> Self {
        CsExpr::Literal(value.to_string())
    }

    pub fn member(receiver: CsExpr, name: impl Into<String>) -> Self {
        CsExpr::MemberAccess {
            receiver: Box::new(receiver),
            name: name.into(),
            conditional: false,
        }
    }

    pub fn conditional_member(receiver: CsExpr, name: impl Into<String>) -> Self {
        CsExpr::MemberAccess {
            receiver: Box::new(receiver),
            name: name.into(),
            conditional: true,
        }
    }

    pub fn element(receiver: CsExpr, index: CsExpr) -> Self {
        CsExpr::ElementAccess {
            receiver: Box::new(receiver),
            arguments: vec![index],
            conditional: false,
        }
    }

    pub fn call(callee: CsExpr, arguments: Vec<CsExpr>) -> Self {
        CsExpr::Invocation {
            callee: Box::new(callee),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    pub fn call_generic(callee: CsExpr, type_arguments: Vec<CsType>, arguments: Vec<CsExpr>) -> Self {
        CsExpr::Invocation {
            callee: Box::new(callee),
            type_arguments,
            arguments,
        }
    }

    pub fn new_object(ty: CsType, arguments: Vec<CsExpr>) -> Self {
        CsExpr::ObjectCreation {
            ty,
            arguments,
            initializer: None,
        }
    }

    pub fn assign(target: CsExpr, value: CsExpr) -> Self {
        CsExpr::Assignment {
            target: Box::new(target),
            op: CsAssignOp::Assign,
            value: Box::new(value),
        }
    }

    pub fn binary(left: CsExpr, op: CsBinaryOp, right: CsExpr) -> Self {
        CsExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: CsExpr) -> Self {
        CsExpr::PrefixUnary {
            op: CsPrefixOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn cast(ty: CsType, operand: CsExpr) -> Self {
        CsExpr::Cast {
            ty,
            operand: Box::new(operand),
        }
    }

    pub fn is_pattern(operand: CsExpr, pattern: CsPattern) -> Self {
        CsExpr::Is {
            operand: Box::new(operand),
            pattern,
        }
    }

    pub fn parens(inner: CsExpr) -> Self {
        CsExpr::Parenthesized(Box::new(inner))
    }

    pub fn default_of(ty: Option<CsType>) -> Self {
        CsExpr::Default(ty)
    }

    pub fn lambda0(body: CsLambdaBody) -> Self {
        CsExpr::Lambda {
            parameters: Vec::new(),
            body,
            is_async: false,
        }
    }

    /// Primary expressions can be member-access receivers without wrapping.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            CsExpr::Literal(_)
                | CsExpr::Identifier(_)
                | CsExpr::Parenthesized(_)
                | CsExpr::MemberAccess { .. }
                | CsExpr::ElementAccess { .. }
                | CsExpr::Invocation { .. }
                | CsExpr::ObjectCreation { .. }
                | CsExpr::ArrayCreation { .. }
                | CsExpr::InterpolatedString(_)
                | CsExpr::Default(_)
                | CsExpr::Typeof(_)
                | CsExpr::SuppressNullableWarning(_)
                | CsExpr::Raw(_)
        )
    }
}
