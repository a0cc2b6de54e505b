//! Destructuring patterns.
//!
//! Patterns appear in variable declarations, parameters, `for-of` heads,
//! and assignment targets. Object rest properties carry a frontend-
//! synthesized shape (`restShapeMembers` + `restSynthTypeName`); lowering
//! treats their absence as a frontend contract violation.

use serde::{Deserialize, Serialize};

use crate::expr::IrExpr;
use crate::types::{IrPropertySignature, IrType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrPattern {
    #[serde(rename_all = "camelCase")]
    Identifier {
        name: String,
        #[serde(rename = "type", default)]
        ty: Option<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        /// `None` entries are holes: the index advances, nothing binds.
        elements: Vec<Option<IrArrayPatternElement>>,
    },
    #[serde(rename_all = "camelCase")]
    Object {
        properties: Vec<IrObjectPatternProperty>,
        #[serde(default)]
        rest: Option<IrObjectRest>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrArrayPatternElement {
    pub pattern: IrPattern,
    #[serde(default)]
    pub default: Option<IrExpr>,
    #[serde(default)]
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrObjectPatternProperty {
    /// The property read off the right-hand side.
    pub property: String,
    /// What it binds to (an identifier or a nested pattern).
    pub pattern: IrPattern,
    #[serde(default)]
    pub default: Option<IrExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrObjectRest {
    pub name: String,
    #[serde(default)]
    pub shape_members: Option<Vec<IrPropertySignature>>,
    #[serde(default)]
    pub synth_type_name: Option<String>,
}

impl IrPattern {
    pub fn ident(name: impl Into<String>) -> Self {
        IrPattern::Identifier {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed_ident(name: impl Into<String>, ty: IrType) -> Self {
        IrPattern::Identifier {
            name: name.into(),
            ty: Some(ty),
        }
    }

    /// Whether this is a plain identifier binding (no expansion needed).
    pub fn is_identifier(&self) -> bool {
        matches!(self, IrPattern::Identifier { .. })
    }

    /// The bound identifier name, when this is a plain identifier.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            IrPattern::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Maximum nesting depth, used by a debug backstop in pattern lowering.
    pub fn depth(&self) -> u32 {
        match self {
            IrPattern::Identifier { .. } => 1,
            IrPattern::Array { elements } => {
                1 + elements
                    .iter()
                    .flatten()
                    .map(|e| e.pattern.depth())
                    .max()
                    .unwrap_or(0)
            }
            IrPattern::Object { properties, .. } => {
                1 + properties
                    .iter()
                    .map(|p| p.pattern.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}
