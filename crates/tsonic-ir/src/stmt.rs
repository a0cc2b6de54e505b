//! IR statements.

use serde::{Deserialize, Serialize};

use crate::decl::IrDeclaration;
use crate::expr::IrExpr;
use crate::pattern::IrPattern;
use crate::types::IrType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrStatement {
    #[serde(rename_all = "camelCase")]
    VariableDeclaration {
        #[serde(rename = "declarationKind")]
        kind: IrVariableKind,
        declarations: Vec<IrVariableDeclarator>,
    },
    #[serde(rename_all = "camelCase")]
    Expression { expression: IrExpr },
    #[serde(rename_all = "camelCase")]
    Block { statements: Vec<IrStatement> },
    #[serde(rename_all = "camelCase")]
    If {
        condition: IrExpr,
        then_branch: Box<IrStatement>,
        #[serde(default)]
        else_branch: Option<Box<IrStatement>>,
    },
    #[serde(rename_all = "camelCase")]
    While {
        condition: IrExpr,
        body: Box<IrStatement>,
    },
    #[serde(rename_all = "camelCase")]
    DoWhile {
        body: Box<IrStatement>,
        condition: IrExpr,
    },
    #[serde(rename_all = "camelCase")]
    For {
        #[serde(default)]
        initializer: Option<Box<IrStatement>>,
        #[serde(default)]
        condition: Option<IrExpr>,
        #[serde(default)]
        update: Option<IrExpr>,
        body: Box<IrStatement>,
    },
    #[serde(rename_all = "camelCase")]
    ForOf {
        pattern: IrPattern,
        iterable: IrExpr,
        body: Box<IrStatement>,
    },
    #[serde(rename_all = "camelCase")]
    ForIn {
        pattern: IrPattern,
        object: IrExpr,
        body: Box<IrStatement>,
    },
    #[serde(rename_all = "camelCase")]
    Switch {
        discriminant: IrExpr,
        cases: Vec<IrSwitchCase>,
    },
    #[serde(rename_all = "camelCase")]
    Try {
        block: Vec<IrStatement>,
        #[serde(default)]
        catch: Option<IrCatchClause>,
        #[serde(default)]
        finally: Option<Vec<IrStatement>>,
    },
    #[serde(rename_all = "camelCase")]
    Throw { expression: IrExpr },
    #[serde(rename_all = "camelCase")]
    Return {
        #[serde(default)]
        expression: Option<IrExpr>,
    },
    Break,
    Continue,
    Empty,
    #[serde(rename_all = "camelCase")]
    Declaration { declaration: IrDeclaration },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrVariableKind {
    Const,
    Let,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrVariableDeclarator {
    pub pattern: IrPattern,
    #[serde(default)]
    pub initializer: Option<IrExpr>,
    #[serde(rename = "declaredType", default)]
    pub declared_type: Option<IrType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrSwitchCase {
    /// `None` for the `default` clause.
    #[serde(default)]
    pub test: Option<IrExpr>,
    pub statements: Vec<IrStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrCatchClause {
    #[serde(default)]
    pub parameter: Option<String>,
    pub body: Vec<IrStatement>,
}

impl IrStatement {
    pub fn expr(expression: IrExpr) -> Self {
        IrStatement::Expression { expression }
    }

    pub fn ret(expression: Option<IrExpr>) -> Self {
        IrStatement::Return { expression }
    }

    pub fn block(statements: Vec<IrStatement>) -> Self {
        IrStatement::Block { statements }
    }

    pub fn const_decl(pattern: IrPattern, initializer: IrExpr) -> Self {
        IrStatement::VariableDeclaration {
            kind: IrVariableKind::Const,
            declarations: vec![IrVariableDeclarator {
                pattern,
                initializer: Some(initializer),
                declared_type: None,
            }],
        }
    }

    pub fn let_decl(pattern: IrPattern, initializer: Option<IrExpr>) -> Self {
        IrStatement::VariableDeclaration {
            kind: IrVariableKind::Let,
            declarations: vec![IrVariableDeclarator {
                pattern,
                initializer,
                declared_type: None,
            }],
        }
    }
}
