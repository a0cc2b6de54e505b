//! Function signature composition and body lowering.
//!
//! Shared by top-level functions, class methods, constructors, and
//! local functions. The caller owns scope entry; this module declares
//! parameters, shapes return types (unwrapping `Promise<T>` for async),
//! and injects destructuring prologues.

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_ir::{IrFunction, IrParameter, IrType, IrTypeParameter};

use crate::cs_ast::{
    CsMethod, CsParameter, CsStmt, CsType, CsTypeParameterConstraint, Modifiers,
};
use crate::emit_context::EmitterContext;
use crate::lowering::expressions::lower_expr;
use crate::lowering::types::lower_type;
use crate::lowering::{patterns, runtime, statements};

pub(crate) struct FunctionSignature {
    pub type_parameters: Vec<String>,
    pub constraints: Vec<CsTypeParameterConstraint>,
    pub parameters: Vec<CsParameter>,
    pub return_type: CsType,
    /// Destructuring statements that must open the body.
    pub prologue: Vec<CsStmt>,
    /// The IR-level return type after async unwrapping, for the
    /// context's return-type slot.
    pub ir_return: Option<IrType>,
}

/// Lower type parameters, parameters, and the return type of a function
/// shape. Must run inside the scope the body will use.
pub(crate) fn lower_signature(
    ctx: &mut EmitterContext,
    type_parameters: &[IrTypeParameter],
    parameters: &[IrParameter],
    return_type: Option<&IrType>,
    is_async: bool,
) -> Result<FunctionSignature, EmitError> {
    let mut emitted_type_params = Vec::with_capacity(type_parameters.len());
    let mut constraints = Vec::new();
    for tp in type_parameters {
        let emitted = ctx.declare_type_parameter(&tp.name);
        if let Some(constraint) = &tp.constraint {
            ctx.set_type_param_constraint(&emitted, constraint.clone());
            constraints.push(CsTypeParameterConstraint {
                parameter: emitted.clone(),
                bounds: vec![lower_type(ctx, constraint)?],
            });
        }
        emitted_type_params.push(emitted);
    }

    let mut lowered_params = Vec::with_capacity(parameters.len());
    let mut prologue = Vec::new();
    for (index, parameter) in parameters.iter().enumerate() {
        lowered_params.push(lower_parameter(ctx, parameter, index, &mut prologue)?);
    }

    let ir_return = return_type.map(|ty| {
        if is_async {
            ty.unwrap_promise().clone()
        } else {
            ty.clone()
        }
    });
    let return_type = match (&ir_return, is_async) {
        (Some(ty), false) => lower_type(ctx, ty)?,
        (Some(ty), true) => {
            let inner = lower_type(ctx, ty)?;
            if inner.is_void() {
                CsType::named(runtime::TASK)
            } else {
                CsType::generic(runtime::TASK, vec![inner])
            }
        }
        (None, false) => CsType::void(),
        (None, true) => CsType::named(runtime::TASK),
    };

    Ok(FunctionSignature {
        type_parameters: emitted_type_params,
        constraints,
        parameters: lowered_params,
        return_type,
        prologue,
        ir_return,
    })
}

fn lower_parameter(
    ctx: &mut EmitterContext,
    parameter: &IrParameter,
    index: usize,
    prologue: &mut Vec<CsStmt>,
) -> Result<CsParameter, EmitError> {
    let base_ty = match &parameter.ty {
        Some(ty) => lower_type(ctx, ty)?,
        None => CsType::nullable(CsType::object()),
    };

    if parameter.rest {
        let Some(name) = parameter.pattern.identifier_name() else {
            return Err(EmitError::ice(
                ice_codes::UNSUPPORTED_NODE,
                "rest parameter binds a nested pattern",
            ));
        };
        let emitted = ctx.declare_local(name);
        let element = match &parameter.ty {
            // Rest parameter types arrive as arrays; fall back to the
            // lowered type as the element when they do not.
            Some(IrType::Array { element }) => lower_type(ctx, element)?,
            _ => base_ty,
        };
        let mut lowered = CsParameter::new(CsType::array(element), emitted);
        lowered.modifier = Some("params");
        return Ok(lowered);
    }

    match parameter.pattern.identifier_name() {
        Some(name) => {
            let emitted = ctx.declare_local(name);
            let ty = if parameter.optional && parameter.default.is_none() {
                CsType::nullable(base_ty)
            } else {
                base_ty
            };
            let mut lowered = CsParameter::new(ty, emitted);
            if let Some(default) = &parameter.default {
                lowered = lowered.with_default(lower_expr(ctx, default)?);
            } else if parameter.optional {
                lowered = lowered.with_default(crate::cs_ast::CsExpr::Default(None));
            }
            Ok(lowered)
        }
        None => {
            // Complex parameters keep a synthetic name in the signature;
            // the destructuring opens the body.
            let synthetic = ctx.reserve_name(&format!("__param{index}"));
            prologue.extend(patterns::lower_parameter_pattern(
                ctx,
                &parameter.pattern,
                &synthetic,
                parameter.ty.as_ref(),
            )?);
            Ok(CsParameter::new(base_ty, synthetic))
        }
    }
}

/// Lower a non-generator function into a method shell with the given
/// modifiers. The caller places it (namespace container, class, or
/// statement position).
pub(crate) fn lower_function_to_method(
    ctx: &mut EmitterContext,
    function: &IrFunction,
    mut modifiers: Modifiers,
) -> Result<CsMethod, EmitError> {
    debug_assert!(!function.is_generator, "generators lower separately");
    let snapshot = ctx.enter_scope();
    ctx.reset_declaration_state();
    ctx.is_async = function.is_async;
    // A fresh function body is never a generator frame.
    ctx.generator_exchange_var = None;
    ctx.generator_iterator_fn = None;
    ctx.generator_return_value_var = None;

    let signature = lower_signature(
        ctx,
        &function.type_parameters,
        &function.parameters,
        function.return_type.as_ref(),
        function.is_async,
    )?;
    ctx.return_type = signature.ir_return.clone();

    let mut body = signature.prologue;
    body.extend(statements::lower_statements(ctx, &function.body)?);
    ctx.leave_scope(snapshot);

    if function.is_async {
        modifiers |= Modifiers::ASYNC;
    }
    let mut method = CsMethod::new(modifiers, signature.return_type, function.name.clone());
    method.type_parameters = signature.type_parameters;
    method.constraints = signature.constraints;
    method.parameters = signature.parameters;
    method.body = Some(body);
    Ok(method)
}

/// Nested function declarations lower to local functions.
pub(crate) fn lower_local_function(
    ctx: &mut EmitterContext,
    function: &IrFunction,
) -> Result<CsMethod, EmitError> {
    if function.is_generator {
        return Err(EmitError::ice(
            ice_codes::UNSUPPORTED_NODE,
            "generator local functions are not part of the supported subset",
        ));
    }
    ctx.reserve_name(&function.name);
    let snapshot = ctx.enter_scope();
    ctx.is_async = function.is_async;
    ctx.generator_exchange_var = None;
    ctx.generator_iterator_fn = None;
    ctx.generator_return_value_var = None;

    let signature = lower_signature(
        ctx,
        &function.type_parameters,
        &function.parameters,
        function.return_type.as_ref(),
        function.is_async,
    )?;
    ctx.return_type = signature.ir_return.clone();

    let mut body = signature.prologue;
    body.extend(statements::lower_statements(ctx, &function.body)?);
    ctx.leave_scope(snapshot);

    let modifiers = if function.is_async {
        Modifiers::ASYNC
    } else {
        Modifiers::default()
    };
    let mut method = CsMethod::new(modifiers, signature.return_type, function.name.clone());
    method.type_parameters = signature.type_parameters;
    method.constraints = signature.constraints;
    method.parameters = signature.parameters;
    method.body = Some(body);
    Ok(method)
}
