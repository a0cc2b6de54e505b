//! IR types.
//!
//! Types arrive fully resolved from the checker except for aliases, which
//! the backend resolves through the per-module local-type table. Reference
//! types may carry a `resolvedClrType` naming the CLR type the checker
//! bound the reference to; the backend coerces CLR primitive references
//! back to IR primitives before deciding nullability or truthiness.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrType {
    Boolean,
    Number,
    Int,
    String,
    Char,
    Void,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    #[serde(rename_all = "camelCase")]
    Literal { value: IrLiteralValue },
    #[serde(rename_all = "camelCase")]
    Reference {
        name: String,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        #[serde(default)]
        resolved_clr_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Union {
        types: Vec<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        element: Box<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    Dictionary {
        key: Box<IrType>,
        value: Box<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    Function {
        parameters: Vec<IrType>,
        return_type: Box<IrType>,
    },
    #[serde(rename_all = "camelCase")]
    TypeParameter {
        name: String,
    },
    /// A structural object type: alias bodies and frontend-synthesized
    /// shapes (object-rest results, anonymous object literals).
    #[serde(rename_all = "camelCase")]
    Object {
        members: Vec<IrPropertySignature>,
    },
}

impl IrType {
    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, IrType::Null | IrType::Undefined)
    }

    /// Primitive in the C# value-type sense: maps to a predefined keyword.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            IrType::Boolean | IrType::Number | IrType::Int | IrType::String | IrType::Char
        )
    }

    /// The base primitive of a literal type, if any.
    pub fn literal_base(&self) -> Option<IrType> {
        match self {
            IrType::Literal { value } => Some(match value {
                IrLiteralValue::String(_) => IrType::String,
                IrLiteralValue::Number(_) => IrType::Number,
                IrLiteralValue::Boolean(_) => IrType::Boolean,
            }),
            _ => None,
        }
    }

    /// Generator yield/return/next type arguments, when this is a
    /// `Generator<Y, R, N>` or `AsyncGenerator<Y, R, N>` reference.
    pub fn generator_arguments(&self) -> Option<(&IrType, &IrType, &IrType)> {
        if let IrType::Reference {
            name,
            type_arguments,
            ..
        } = self
            && (name == "Generator" || name == "AsyncGenerator")
            && type_arguments.len() == 3
        {
            return Some((&type_arguments[0], &type_arguments[1], &type_arguments[2]));
        }
        None
    }

    /// Unwrap a `Promise<T>` reference to `T`.
    pub fn unwrap_promise(&self) -> &IrType {
        if let IrType::Reference {
            name,
            type_arguments,
            ..
        } = self
            && name == "Promise"
            && type_arguments.len() == 1
        {
            return &type_arguments[0];
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IrLiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// One member of a structural object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrPropertySignature {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

/// What a module-local type name resolves to.
///
/// Seeded from the module's top-level declarations by the orchestrator and
/// from `moduleMap` entries for external modules (including the synthetic
/// `__tsonic_anonymous_types` entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LocalTypeInfo {
    Interface,
    Class,
    #[serde(rename_all = "camelCase")]
    TypeAlias {
        #[serde(default)]
        type_parameters: Vec<String>,
        #[serde(rename = "type")]
        ty: IrType,
    },
    Enum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_round_trips_through_json() {
        let ty = IrType::Union {
            types: vec![IrType::String, IrType::Null],
        };
        let json = serde_json::to_string(&ty).expect("serialize");
        let back: IrType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(ty, back);
    }

    #[test]
    fn literal_base_of_number_literal() {
        let ty = IrType::Literal {
            value: IrLiteralValue::Number(3.0),
        };
        assert_eq!(ty.literal_base(), Some(IrType::Number));
    }

    #[test]
    fn generator_arguments_require_three() {
        let ty = IrType::Reference {
            name: "Generator".to_string(),
            type_arguments: vec![IrType::Number, IrType::Void, IrType::Number],
            resolved_clr_type: None,
        };
        let (y, r, n) = ty.generator_arguments().expect("generator type");
        assert_eq!(y, &IrType::Number);
        assert_eq!(r, &IrType::Void);
        assert_eq!(n, &IrType::Number);
    }
}
