//! IR declarations: functions, classes, interfaces, type aliases, enums.

use serde::{Deserialize, Serialize};

use crate::expr::IrExpr;
use crate::pattern::IrPattern;
use crate::stmt::IrStatement;
use crate::types::IrType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrDeclaration {
    Function(IrFunction),
    Class(IrClass),
    Interface(IrInterface),
    TypeAlias(IrTypeAlias),
    Enum(IrEnum),
}

impl IrDeclaration {
    pub fn name(&self) -> &str {
        match self {
            IrDeclaration::Function(f) => &f.name,
            IrDeclaration::Class(c) => &c.name,
            IrDeclaration::Interface(i) => &i.name,
            IrDeclaration::TypeAlias(a) => &a.name,
            IrDeclaration::Enum(e) => &e.name,
        }
    }

    pub fn is_exported(&self) -> bool {
        match self {
            IrDeclaration::Function(f) => f.exported,
            IrDeclaration::Class(c) => c.exported,
            IrDeclaration::Interface(i) => i.exported,
            IrDeclaration::TypeAlias(a) => a.exported,
            IrDeclaration::Enum(e) => e.exported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrFunction {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    pub parameters: Vec<IrParameter>,
    #[serde(default)]
    pub return_type: Option<IrType>,
    pub body: Vec<IrStatement>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
    #[serde(default)]
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrTypeParameter {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<IrType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrParameter {
    pub pattern: IrPattern,
    #[serde(rename = "type", default)]
    pub ty: Option<IrType>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<IrExpr>,
    #[serde(default)]
    pub rest: bool,
}

impl IrParameter {
    pub fn named(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            pattern: IrPattern::ident(name),
            ty: Some(ty),
            optional: false,
            default: None,
            rest: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrClass {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    #[serde(default)]
    pub extends: Option<IrType>,
    #[serde(default)]
    pub implements: Vec<IrType>,
    pub members: Vec<IrClassMember>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub exported: bool,
    /// Set when the class realizes a structural `this`-return interface;
    /// the emitter wires the CRTP self-type constraint, the validator has
    /// already checked the shape.
    #[serde(default)]
    pub self_type_parameter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrClassMember {
    #[serde(rename_all = "camelCase")]
    Field {
        name: String,
        #[serde(rename = "type", default)]
        ty: Option<IrType>,
        #[serde(default)]
        initializer: Option<IrExpr>,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        is_readonly: bool,
        #[serde(default)]
        visibility: IrVisibility,
    },
    #[serde(rename_all = "camelCase")]
    Method {
        name: String,
        #[serde(default)]
        type_parameters: Vec<IrTypeParameter>,
        parameters: Vec<IrParameter>,
        #[serde(default)]
        return_type: Option<IrType>,
        body: Vec<IrStatement>,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        is_generator: bool,
        #[serde(default)]
        is_abstract: bool,
        #[serde(default)]
        visibility: IrVisibility,
    },
    #[serde(rename_all = "camelCase")]
    Constructor {
        parameters: Vec<IrParameter>,
        body: Vec<IrStatement>,
        #[serde(default)]
        visibility: IrVisibility,
    },
    #[serde(rename_all = "camelCase")]
    Getter {
        name: String,
        #[serde(default)]
        return_type: Option<IrType>,
        body: Vec<IrStatement>,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        visibility: IrVisibility,
    },
    #[serde(rename_all = "camelCase")]
    Setter {
        name: String,
        parameter: IrParameter,
        body: Vec<IrStatement>,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        visibility: IrVisibility,
    },
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrVisibility {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrInterface {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    #[serde(default)]
    pub extends: Vec<IrType>,
    pub members: Vec<IrInterfaceMember>,
    #[serde(default)]
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrInterfaceMember {
    #[serde(rename_all = "camelCase")]
    Property {
        name: String,
        #[serde(rename = "type")]
        ty: IrType,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        readonly: bool,
    },
    #[serde(rename_all = "camelCase")]
    Method {
        name: String,
        #[serde(default)]
        type_parameters: Vec<IrTypeParameter>,
        parameters: Vec<IrParameter>,
        #[serde(default)]
        return_type: Option<IrType>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrTypeAlias {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    #[serde(rename = "type")]
    pub ty: IrType,
    /// Emit the structural alias as a struct instead of a sealed class.
    #[serde(default)]
    pub as_struct: bool,
    #[serde(default)]
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEnum {
    pub name: String,
    pub members: Vec<IrEnumMember>,
    #[serde(default)]
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEnumMember {
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
}
