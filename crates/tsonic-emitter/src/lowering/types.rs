//! IR type lowering.
//!
//! Primitives map to predefined keywords, unions are shaped into
//! nullability / runtime `Union<..>` / `object`, references resolve
//! through the local-type table with transitive alias resolution, and
//! CLR primitive reference types are coerced back to IR primitives
//! before any nullability decision is made.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_common::limits::{MAX_DELEGATE_PARAMS, MAX_UNION_ARITY, MIN_UNION_ARITY};
use tsonic_ir::{IrType, LocalTypeInfo};

use crate::cs_ast::CsType;
use crate::emit_context::{EmitterContext, ImportBinding};
use crate::lowering::runtime;

/// Suffix appended to structural alias class names.
pub const ALIAS_SUFFIX: &str = "__Alias";

pub fn lower_type(ctx: &EmitterContext, ty: &IrType) -> Result<CsType, EmitError> {
    let mut visited = FxHashSet::default();
    lower_type_inner(ctx, ty, &mut visited)
}

fn lower_type_inner(
    ctx: &EmitterContext,
    ty: &IrType,
    visited: &mut FxHashSet<String>,
) -> Result<CsType, EmitError> {
    let ty = coerce_clr_primitive(ty);
    match &ty {
        IrType::Boolean => Ok(CsType::bool()),
        IrType::Number => Ok(CsType::double()),
        IrType::Int => Ok(CsType::int()),
        IrType::String => Ok(CsType::string()),
        IrType::Char => Ok(CsType::char()),
        IrType::Void | IrType::Never => Ok(CsType::void()),
        IrType::Null | IrType::Undefined => Ok(CsType::nullable(CsType::object())),
        IrType::Any | IrType::Unknown => Ok(CsType::nullable(CsType::object())),
        IrType::Literal { .. } => {
            let base = ty.literal_base().unwrap_or(IrType::Any);
            lower_type_inner(ctx, &base, visited)
        }
        IrType::Reference {
            name,
            type_arguments,
            ..
        } => lower_reference(ctx, name, type_arguments, visited),
        IrType::Union { types } => lower_union(ctx, types, visited),
        IrType::Array { element } => {
            Ok(CsType::array(lower_type_inner(ctx, element, visited)?))
        }
        IrType::Dictionary { key, value } => Ok(CsType::generic(
            runtime::DICTIONARY,
            vec![
                lower_type_inner(ctx, key, visited)?,
                lower_type_inner(ctx, value, visited)?,
            ],
        )),
        IrType::Function {
            parameters,
            return_type,
        } => lower_function_type(ctx, parameters, return_type, visited),
        IrType::TypeParameter { name } => Ok(CsType::named(
            ctx.lookup_type_parameter(name).unwrap_or(name.as_str()),
        )),
        // Inline structural types only reach type position through
        // frontend-synthesized names; a bare one erases to object.
        IrType::Object { .. } => Ok(CsType::object()),
    }
}

/// References carrying a `resolvedClrType` naming a CLR primitive are
/// folded back to the IR primitive, preventing nullability and boxing
/// miscompiles downstream.
pub fn coerce_clr_primitive(ty: &IrType) -> IrType {
    if let IrType::Reference {
        resolved_clr_type: Some(clr),
        ..
    } = ty
    {
        match clr.as_str() {
            "System.Boolean" => return IrType::Boolean,
            "System.Int32" => return IrType::Int,
            "System.Double" => return IrType::Number,
            "System.Char" => return IrType::Char,
            "System.String" => return IrType::String,
            _ => {}
        }
    }
    ty.clone()
}

fn lower_reference(
    ctx: &EmitterContext,
    name: &str,
    type_arguments: &[IrType],
    visited: &mut FxHashSet<String>,
) -> Result<CsType, EmitError> {
    if let Some(mapped) = ctx.lookup_type_parameter(name) {
        return Ok(CsType::named(mapped));
    }

    if let Some(info) = ctx.lookup_local_type(name) {
        match info {
            LocalTypeInfo::TypeAlias {
                type_parameters,
                ty,
            } => {
                if matches!(ty, IrType::Object { .. }) {
                    // Structural aliases are realized as generated
                    // classes; references target the class directly.
                    let mut args = Vec::with_capacity(type_arguments.len());
                    for argument in type_arguments {
                        args.push(lower_type_inner(ctx, argument, visited)?);
                    }
                    return Ok(CsType::generic(format!("{name}{ALIAS_SUFFIX}"), args));
                }
                if !visited.insert(name.to_string()) {
                    return Err(EmitError::ice(
                        ice_codes::ALIAS_CYCLE,
                        format!("type alias cycle through '{name}'"),
                    ));
                }
                let substituted = substitute_type_parameters(ty, type_parameters, type_arguments);
                let lowered = lower_type_inner(ctx, &substituted, visited)?;
                visited.remove(name);
                return Ok(lowered);
            }
            LocalTypeInfo::Interface | LocalTypeInfo::Class | LocalTypeInfo::Enum => {
                let mut args = Vec::with_capacity(type_arguments.len());
                for argument in type_arguments {
                    args.push(lower_type_inner(ctx, argument, visited)?);
                }
                return Ok(CsType::generic(name, args));
            }
        }
    }

    // Imported types qualify through their source namespace.
    let qualified = match ctx.lookup_import(name) {
        Some(ImportBinding::Type { namespace, name }) => {
            format!("global::{namespace}.{name}")
        }
        _ => name.to_string(),
    };
    let mut args = Vec::with_capacity(type_arguments.len());
    for argument in type_arguments {
        args.push(lower_type_inner(ctx, argument, visited)?);
    }
    Ok(CsType::generic(qualified, args))
}

fn lower_function_type(
    ctx: &EmitterContext,
    parameters: &[IrType],
    return_type: &IrType,
    visited: &mut FxHashSet<String>,
) -> Result<CsType, EmitError> {
    // The widest CLR delegates stop at 16 parameters; wider signatures
    // have no Func/Action representation.
    if parameters.len() > MAX_DELEGATE_PARAMS {
        return Err(EmitError::ice(
            ice_codes::DELEGATE_ARITY,
            format!(
                "function type with {} parameters exceeds the {MAX_DELEGATE_PARAMS}-parameter delegate limit",
                parameters.len()
            ),
        ));
    }
    let mut args = Vec::with_capacity(parameters.len() + 1);
    for parameter in parameters {
        args.push(lower_type_inner(ctx, parameter, visited)?);
    }
    let ret = lower_type_inner(ctx, return_type, visited)?;
    if ret.is_void() {
        Ok(CsType::generic(runtime::ACTION, args))
    } else {
        args.push(ret);
        Ok(CsType::generic(runtime::FUNC, args))
    }
}

/// Analysis of a union's arms after flattening and CLR coercion.
pub struct UnionArms {
    /// Non-nullish arms in source order, deduplicated.
    pub arms: Vec<IrType>,
    pub has_nullish: bool,
}

pub fn split_union_arms(types: &[IrType]) -> UnionArms {
    let mut arms: Vec<IrType> = Vec::new();
    let mut has_nullish = false;
    let mut stack: SmallVec<[&IrType; 8]> = types.iter().rev().collect();
    while let Some(ty) = stack.pop() {
        if let IrType::Union { types } = ty {
            for inner in types.iter().rev() {
                stack.push(inner);
            }
            continue;
        }
        let coerced = coerce_clr_primitive(ty);
        if coerced.is_nullish() {
            has_nullish = true;
        } else if !arms.contains(&coerced) {
            arms.push(coerced);
        }
    }
    UnionArms { arms, has_nullish }
}

/// When every arm is a literal (or the base primitive itself) over one
/// base primitive, the union collapses to that primitive.
pub fn literal_collapse(arms: &[IrType]) -> Option<IrType> {
    let mut base: Option<IrType> = None;
    for arm in arms {
        let arm_base = match arm {
            IrType::Literal { .. } => arm.literal_base()?,
            IrType::Boolean | IrType::Number | IrType::Int | IrType::String | IrType::Char => {
                arm.clone()
            }
            _ => return None,
        };
        match &base {
            None => base = Some(arm_base),
            Some(existing) if *existing == arm_base => {}
            Some(_) => return None,
        }
    }
    // A single-arm "union" is shaped by the nullable path instead.
    if arms.iter().any(|a| matches!(a, IrType::Literal { .. })) {
        base
    } else {
        None
    }
}

fn lower_union(
    ctx: &EmitterContext,
    types: &[IrType],
    visited: &mut FxHashSet<String>,
) -> Result<CsType, EmitError> {
    let UnionArms { arms, has_nullish } = split_union_arms(types);

    let lowered = if arms.is_empty() {
        CsType::nullable(CsType::object())
    } else if arms.len() == 1 {
        let inner = lower_type_inner(ctx, &arms[0], visited)?;
        if has_nullish {
            CsType::nullable(inner)
        } else {
            inner
        }
    } else if let Some(base) = literal_collapse(&arms) {
        let inner = lower_type_inner(ctx, &base, visited)?;
        if has_nullish {
            CsType::nullable(inner)
        } else {
            inner
        }
    } else if (MIN_UNION_ARITY..=MAX_UNION_ARITY).contains(&arms.len()) {
        let mut args = Vec::with_capacity(arms.len());
        for arm in &arms {
            args.push(lower_type_inner(ctx, arm, visited)?);
        }
        let union = CsType::generic(runtime::UNION, args);
        if has_nullish {
            CsType::nullable(union)
        } else {
            union
        }
    } else {
        let obj = CsType::object();
        if has_nullish {
            CsType::nullable(obj)
        } else {
            obj
        }
    };
    Ok(lowered)
}

/// Substitute a generic alias's type parameters with the reference's
/// arguments.
pub fn substitute_type_parameters(
    ty: &IrType,
    parameters: &[String],
    arguments: &[IrType],
) -> IrType {
    if parameters.is_empty() || arguments.is_empty() {
        return ty.clone();
    }
    let map: FxHashMap<&str, &IrType> = parameters
        .iter()
        .map(String::as_str)
        .zip(arguments.iter())
        .collect();
    substitute(ty, &map)
}

fn substitute(ty: &IrType, map: &FxHashMap<&str, &IrType>) -> IrType {
    match ty {
        IrType::TypeParameter { name } => map.get(name.as_str()).map_or_else(
            || ty.clone(),
            |replacement| (*replacement).clone(),
        ),
        IrType::Reference {
            name,
            type_arguments,
            resolved_clr_type,
        } => {
            if type_arguments.is_empty()
                && let Some(replacement) = map.get(name.as_str())
            {
                return (*replacement).clone();
            }
            IrType::Reference {
                name: name.clone(),
                type_arguments: type_arguments.iter().map(|a| substitute(a, map)).collect(),
                resolved_clr_type: resolved_clr_type.clone(),
            }
        }
        IrType::Union { types } => IrType::Union {
            types: types.iter().map(|t| substitute(t, map)).collect(),
        },
        IrType::Array { element } => IrType::Array {
            element: Box::new(substitute(element, map)),
        },
        IrType::Dictionary { key, value } => IrType::Dictionary {
            key: Box::new(substitute(key, map)),
            value: Box::new(substitute(value, map)),
        },
        IrType::Function {
            parameters,
            return_type,
        } => IrType::Function {
            parameters: parameters.iter().map(|p| substitute(p, map)).collect(),
            return_type: Box::new(substitute(return_type, map)),
        },
        IrType::Object { members } => IrType::Object {
            members: members
                .iter()
                .map(|m| tsonic_ir::IrPropertySignature {
                    name: m.name.clone(),
                    ty: substitute(&m.ty, map),
                    optional: m.optional,
                    readonly: m.readonly,
                })
                .collect(),
        },
        _ => ty.clone(),
    }
}

/// The element type of an array-typed expression, after alias and CLR
/// coercion. Used by destructuring to type extracted elements.
pub fn array_element_type(ctx: &EmitterContext, ty: &IrType) -> Option<IrType> {
    match resolve_surface(ctx, ty, 0) {
        IrType::Array { element } => Some((*element).clone()),
        _ => None,
    }
}

/// Resolve aliases at the surface of a type without lowering it, bounded
/// by a small depth so alias cycles cannot loop.
pub fn resolve_surface(ctx: &EmitterContext, ty: &IrType, depth: u32) -> IrType {
    if depth > 16 {
        return ty.clone();
    }
    let ty = coerce_clr_primitive(ty);
    if let IrType::Reference {
        name,
        type_arguments,
        ..
    } = &ty
        && let Some(LocalTypeInfo::TypeAlias {
            type_parameters,
            ty: aliased,
        }) = ctx.lookup_local_type(name)
        && !matches!(aliased, IrType::Object { .. })
    {
        let substituted = substitute_type_parameters(aliased, type_parameters, type_arguments);
        return resolve_surface(ctx, &substituted, depth + 1);
    }
    ty
}

#[cfg(test)]
#[path = "../tests/type_lowering.rs"]
mod tests;
