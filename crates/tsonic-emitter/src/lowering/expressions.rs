//! IR expression lowering.
//!
//! One lowering per IR expression kind. Special cases run first
//! (destructuring assignments, optional chains, import-bound
//! identifiers), then the generic structural mapping. `yield` never
//! reaches this module: generator statement lowering rewrites it before
//! expressions are visited, so encountering one here is an ICE.

use tracing::trace;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_ir::{
    IrAssignOp, IrAssignTarget, IrBinaryOp, IrExpr, IrExprKind, IrFunctionBody, IrLogicalOp,
    IrParameter, IrTemplatePart, IrType, IrUnaryOp, IrUpdateOp,
};

use crate::cs_ast::{
    CsAssignOp, CsBinaryOp, CsExpr, CsInterpolationPart, CsLambdaBody, CsLambdaParam, CsPattern,
    CsPostfixOp, CsPrefixOp, CsStmt, CsType,
};
use crate::emit_context::{EmitterContext, ImportBinding};
use crate::lowering::expressions_literals::{
    int_literal_text, interpolated_text, number_literal_text, string_literal_text,
};
use crate::lowering::runtime;
use crate::lowering::truthiness::lower_condition;
use crate::lowering::types::{
    array_element_type, lower_type, resolve_surface, ALIAS_SUFFIX,
};
use crate::lowering::{patterns, statements};

pub fn lower_expr(ctx: &mut EmitterContext, expr: &IrExpr) -> Result<CsExpr, EmitError> {
    match &expr.kind {
        IrExprKind::NumberLiteral { value } => Ok(CsExpr::literal(number_literal_text(*value))),
        IrExprKind::StringLiteral { value } => Ok(CsExpr::literal(string_literal_text(value))),
        IrExprKind::BooleanLiteral { value } => Ok(CsExpr::bool(*value)),
        IrExprKind::NullLiteral | IrExprKind::UndefinedLiteral => Ok(CsExpr::null()),
        IrExprKind::Identifier { name } => Ok(lower_identifier(ctx, name)),
        IrExprKind::This => Ok(CsExpr::literal("this")),
        IrExprKind::Super => Ok(CsExpr::literal("base")),
        IrExprKind::TemplateLiteral { parts } => lower_template(ctx, parts),
        IrExprKind::ArrayLiteral { elements } => lower_array_literal(ctx, expr, elements),
        IrExprKind::ObjectLiteral {
            type_name,
            properties,
        } => lower_object_literal(ctx, expr, type_name.as_deref(), properties),
        IrExprKind::Member {
            object,
            property,
            optional,
        } => {
            let receiver = lower_expr(ctx, object)?;
            Ok(CsExpr::MemberAccess {
                receiver: Box::new(receiver),
                name: property.clone(),
                conditional: *optional,
            })
        }
        IrExprKind::Index {
            object,
            index,
            optional,
        } => {
            let receiver = lower_expr(ctx, object)?;
            let index = lower_index(ctx, index)?;
            Ok(CsExpr::ElementAccess {
                receiver: Box::new(receiver),
                arguments: vec![index],
                conditional: *optional,
            })
        }
        IrExprKind::Call {
            callee,
            arguments,
            type_arguments,
            optional,
        } => lower_call(ctx, callee, arguments, type_arguments, *optional),
        IrExprKind::New {
            callee,
            arguments,
            type_arguments,
        } => lower_new(ctx, callee, arguments, type_arguments),
        IrExprKind::Unary { op, operand } => lower_unary(ctx, *op, operand),
        IrExprKind::Update {
            op,
            prefix,
            operand,
        } => {
            let operand = lower_expr(ctx, operand)?;
            Ok(if *prefix {
                CsExpr::PrefixUnary {
                    op: match op {
                        IrUpdateOp::Increment => CsPrefixOp::Increment,
                        IrUpdateOp::Decrement => CsPrefixOp::Decrement,
                    },
                    operand: Box::new(operand),
                }
            } else {
                CsExpr::PostfixUnary {
                    op: match op {
                        IrUpdateOp::Increment => CsPostfixOp::Increment,
                        IrUpdateOp::Decrement => CsPostfixOp::Decrement,
                    },
                    operand: Box::new(operand),
                }
            })
        }
        IrExprKind::Binary { op, left, right } => lower_binary(ctx, *op, left, right),
        IrExprKind::Logical { op, left, right } => match op {
            IrLogicalOp::Coalesce => {
                let left = lower_expr(ctx, left)?;
                let right = lower_expr(ctx, right)?;
                Ok(CsExpr::binary(left, CsBinaryOp::Coalesce, right))
            }
            // Logical and/or evaluate in boolean context.
            IrLogicalOp::And => {
                let left = lower_condition(ctx, left)?;
                let right = lower_condition(ctx, right)?;
                Ok(CsExpr::binary(left, CsBinaryOp::LogicalAnd, right))
            }
            IrLogicalOp::Or => {
                let left = lower_condition(ctx, left)?;
                let right = lower_condition(ctx, right)?;
                Ok(CsExpr::binary(left, CsBinaryOp::LogicalOr, right))
            }
        },
        IrExprKind::Assignment { target, op, value } => lower_assignment(ctx, target, *op, value),
        IrExprKind::Conditional {
            condition,
            consequent,
            alternate,
        } => {
            let condition = lower_condition(ctx, condition)?;
            let when_true = lower_expr(ctx, consequent)?;
            let when_false = lower_expr(ctx, alternate)?;
            Ok(CsExpr::Conditional {
                condition: Box::new(condition),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
            })
        }
        IrExprKind::Function {
            parameters,
            body,
            is_async,
            ..
        } => lower_function_expr(ctx, parameters, body, *is_async),
        IrExprKind::TypeOf { operand } => {
            let operand = lower_expr(ctx, operand)?;
            Ok(CsExpr::call(
                CsExpr::ident(runtime::OPERATORS_TYPEOF),
                vec![operand],
            ))
        }
        IrExprKind::Await { operand } => {
            let operand = lower_expr(ctx, operand)?;
            Ok(CsExpr::Await(Box::new(operand)))
        }
        IrExprKind::Yield { .. } => Err(EmitError::ice(
            ice_codes::YIELD_OUTSIDE_GENERATOR,
            "yield reached expression lowering outside a generator statement position",
        )),
        IrExprKind::ArrayConstructor {
            length,
            element_type,
        } => lower_array_constructor(ctx, expr, length, element_type.as_ref()),
    }
}

fn lower_identifier(ctx: &EmitterContext, name: &str) -> CsExpr {
    if let Some(emitted) = ctx.lookup_local(name) {
        return CsExpr::Identifier(emitted.to_string());
    }
    match ctx.lookup_import(name) {
        Some(ImportBinding::ModuleValue {
            namespace,
            class_name,
            member,
        }) => CsExpr::member(
            CsExpr::ident(format!("global::{namespace}.{class_name}")),
            member.clone(),
        ),
        // Flattened CLR value imports bind through the declaring type.
        Some(ImportBinding::ClrValue {
            declaring_type,
            member,
        }) => CsExpr::member(
            CsExpr::ident(format!("global::{declaring_type}")),
            member.clone(),
        ),
        _ => CsExpr::Identifier(name.to_string()),
    }
}

fn lower_template(
    ctx: &mut EmitterContext,
    parts: &[IrTemplatePart],
) -> Result<CsExpr, EmitError> {
    let mut lowered = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            IrTemplatePart::Text { text } => {
                lowered.push(CsInterpolationPart::Text(interpolated_text(text)));
            }
            IrTemplatePart::Expression { expression } => {
                lowered.push(CsInterpolationPart::Expression {
                    expression: lower_expr(ctx, expression)?,
                    format: None,
                });
            }
        }
    }
    Ok(CsExpr::InterpolatedString(lowered))
}

fn lower_array_literal(
    ctx: &mut EmitterContext,
    expr: &IrExpr,
    elements: &[IrExpr],
) -> Result<CsExpr, EmitError> {
    let element_type = expr
        .inferred_type
        .as_ref()
        .and_then(|t| array_element_type(ctx, t))
        .map(|t| lower_type(ctx, &t))
        .transpose()?;

    if elements.is_empty() && element_type.is_none() {
        // The validator guarantees empty literals a contextual type.
        return Err(EmitError::ice(
            ice_codes::MISSING_ARRAY_LITERAL_TYPE,
            "empty array literal without a contextual array type",
        ));
    }

    let mut lowered = Vec::with_capacity(elements.len());
    for element in elements {
        lowered.push(lower_expr(ctx, element)?);
    }
    Ok(CsExpr::ArrayCreation {
        element_type,
        length: None,
        initializer: Some(lowered),
    })
}

fn lower_object_literal(
    ctx: &mut EmitterContext,
    expr: &IrExpr,
    type_name: Option<&str>,
    properties: &[tsonic_ir::IrObjectProperty],
) -> Result<CsExpr, EmitError> {
    let ty = match type_name {
        Some(name) => {
            // Structural aliases are realized as generated classes.
            match ctx.lookup_local_type(name) {
                Some(tsonic_ir::LocalTypeInfo::TypeAlias { ty, .. })
                    if matches!(ty, IrType::Object { .. }) =>
                {
                    CsType::named(format!("{name}{ALIAS_SUFFIX}"))
                }
                _ => CsType::named(name),
            }
        }
        None => match expr.inferred_type.as_ref() {
            Some(ty @ IrType::Reference { .. }) => lower_type(ctx, ty)?,
            _ => {
                return Err(EmitError::ice(
                    ice_codes::MISSING_OBJECT_LITERAL_TYPE,
                    "object literal without a contextual nominal type",
                ));
            }
        },
    };

    let mut assignments = Vec::with_capacity(properties.len());
    for property in properties {
        assignments.push((property.name.clone(), lower_expr(ctx, &property.value)?));
    }
    Ok(CsExpr::ObjectCreation {
        ty,
        arguments: Vec::new(),
        initializer: Some(assignments),
    })
}

/// Element indices must be `int`. Integral literals print as int
/// literals, proven-integer loop counters pass through, and everything
/// else gets a cast.
pub(crate) fn lower_index(ctx: &mut EmitterContext, index: &IrExpr) -> Result<CsExpr, EmitError> {
    if let IrExprKind::NumberLiteral { value } = &index.kind
        && value.fract() == 0.0
        && value.is_finite()
    {
        return Ok(CsExpr::literal(int_literal_text(*value as i64)));
    }
    if let IrExprKind::Identifier { name } = &index.kind {
        let emitted = ctx.lookup_local(name).unwrap_or(name.as_str()).to_string();
        if ctx.is_int_loop_var(&emitted) {
            return Ok(CsExpr::Identifier(emitted));
        }
    }
    let lowered = lower_expr(ctx, index)?;
    let is_int = index
        .inferred_type
        .as_ref()
        .map(|t| resolve_surface(ctx, t, 0))
        .is_some_and(|t| matches!(t, IrType::Int));
    if is_int {
        Ok(lowered)
    } else {
        Ok(CsExpr::cast(CsType::int(), lowered))
    }
}

fn lower_call(
    ctx: &mut EmitterContext,
    callee: &IrExpr,
    arguments: &[IrExpr],
    type_arguments: &[IrType],
    optional: bool,
) -> Result<CsExpr, EmitError> {
    let mut lowered_args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        lowered_args.push(lower_expr(ctx, argument)?);
    }
    let mut lowered_type_args = Vec::with_capacity(type_arguments.len());
    for argument in type_arguments {
        lowered_type_args.push(lower_type(ctx, argument)?);
    }

    let callee_cs = lower_expr(ctx, callee)?;

    // `foo?.()` lowers through a conditional Invoke.
    if optional {
        trace!("optional-chain call");
        return Ok(CsExpr::Invocation {
            callee: Box::new(CsExpr::conditional_member(callee_cs, "Invoke")),
            type_arguments: lowered_type_args,
            arguments: lowered_args,
        });
    }

    Ok(CsExpr::Invocation {
        callee: Box::new(callee_cs),
        type_arguments: lowered_type_args,
        arguments: lowered_args,
    })
}

fn lower_new(
    ctx: &mut EmitterContext,
    callee: &IrExpr,
    arguments: &[IrExpr],
    type_arguments: &[IrType],
) -> Result<CsExpr, EmitError> {
    let mut lowered_args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        lowered_args.push(lower_expr(ctx, argument)?);
    }

    let ty = match &callee.kind {
        IrExprKind::Identifier { name } => {
            let reference = IrType::Reference {
                name: name.clone(),
                type_arguments: type_arguments.to_vec(),
                resolved_clr_type: None,
            };
            lower_type(ctx, &reference)?
        }
        IrExprKind::Member { .. } => {
            let rendered = crate::printer::print_expression(&lower_expr(ctx, callee)?, 4);
            let mut args = Vec::with_capacity(type_arguments.len());
            for argument in type_arguments {
                args.push(lower_type(ctx, argument)?);
            }
            CsType::generic(rendered, args)
        }
        _ => {
            return Err(EmitError::ice(
                ice_codes::UNSUPPORTED_NODE,
                "new-expression callee is neither an identifier nor a member path",
            ));
        }
    };
    Ok(CsExpr::new_object(ty, lowered_args))
}

fn lower_unary(
    ctx: &mut EmitterContext,
    op: IrUnaryOp,
    operand: &IrExpr,
) -> Result<CsExpr, EmitError> {
    match op {
        // `!x` negates the boolean-context lowering of x.
        IrUnaryOp::Not => Ok(CsExpr::not(lower_condition(ctx, operand)?)),
        IrUnaryOp::Minus => Ok(CsExpr::PrefixUnary {
            op: CsPrefixOp::Minus,
            operand: Box::new(lower_expr(ctx, operand)?),
        }),
        IrUnaryOp::Plus => Ok(CsExpr::PrefixUnary {
            op: CsPrefixOp::Plus,
            operand: Box::new(lower_expr(ctx, operand)?),
        }),
        IrUnaryOp::BitNot => Ok(CsExpr::PrefixUnary {
            op: CsPrefixOp::BitNot,
            operand: Box::new(lower_expr(ctx, operand)?),
        }),
        // `void e` for effect; the validator admits it only over
        // side-effect-free operands, so the value is simply null.
        IrUnaryOp::Void => Ok(CsExpr::null()),
    }
}

fn lower_binary(
    ctx: &mut EmitterContext,
    op: IrBinaryOp,
    left: &IrExpr,
    right: &IrExpr,
) -> Result<CsExpr, EmitError> {
    match op {
        IrBinaryOp::InstanceOf => {
            let operand = lower_expr(ctx, left)?;
            let ty = match &right.kind {
                IrExprKind::Identifier { name } => lower_type(
                    ctx,
                    &IrType::Reference {
                        name: name.clone(),
                        type_arguments: vec![],
                        resolved_clr_type: None,
                    },
                )?,
                _ => {
                    return Err(EmitError::ice(
                        ice_codes::UNSUPPORTED_NODE,
                        "instanceof right-hand side is not a type identifier",
                    ));
                }
            };
            Ok(CsExpr::is_pattern(operand, CsPattern::Type(ty)))
        }
        IrBinaryOp::In => {
            // Dictionary membership: `k in d` → `d.ContainsKey(k)`.
            let key = lower_expr(ctx, left)?;
            let object = lower_expr(ctx, right)?;
            Ok(CsExpr::call(
                CsExpr::member(object, "ContainsKey"),
                vec![key],
            ))
        }
        _ => {
            let cs_op = match op {
                IrBinaryOp::Add => CsBinaryOp::Add,
                IrBinaryOp::Subtract => CsBinaryOp::Subtract,
                IrBinaryOp::Multiply => CsBinaryOp::Multiply,
                IrBinaryOp::Divide => CsBinaryOp::Divide,
                IrBinaryOp::Remainder => CsBinaryOp::Remainder,
                IrBinaryOp::BitAnd => CsBinaryOp::BitAnd,
                IrBinaryOp::BitOr => CsBinaryOp::BitOr,
                IrBinaryOp::BitXor => CsBinaryOp::BitXor,
                IrBinaryOp::ShiftLeft => CsBinaryOp::ShiftLeft,
                IrBinaryOp::ShiftRight => CsBinaryOp::ShiftRight,
                IrBinaryOp::Less => CsBinaryOp::Less,
                IrBinaryOp::LessEqual => CsBinaryOp::LessEqual,
                IrBinaryOp::Greater => CsBinaryOp::Greater,
                IrBinaryOp::GreaterEqual => CsBinaryOp::GreaterEqual,
                IrBinaryOp::Equals => CsBinaryOp::Equals,
                IrBinaryOp::NotEquals => CsBinaryOp::NotEquals,
                IrBinaryOp::InstanceOf | IrBinaryOp::In => unreachable!(),
            };
            let left = lower_expr(ctx, left)?;
            let right = lower_expr(ctx, right)?;
            Ok(CsExpr::binary(left, cs_op, right))
        }
    }
}

fn lower_assignment(
    ctx: &mut EmitterContext,
    target: &IrAssignTarget,
    op: IrAssignOp,
    value: &IrExpr,
) -> Result<CsExpr, EmitError> {
    match target {
        IrAssignTarget::Expression { expression } => {
            let target = lower_expr(ctx, expression)?;
            let value = lower_expr(ctx, value)?;
            let cs_op = match op {
                IrAssignOp::Assign => CsAssignOp::Assign,
                IrAssignOp::AddAssign => CsAssignOp::Add,
                IrAssignOp::SubtractAssign => CsAssignOp::Subtract,
                IrAssignOp::MultiplyAssign => CsAssignOp::Multiply,
                IrAssignOp::DivideAssign => CsAssignOp::Divide,
                IrAssignOp::RemainderAssign => CsAssignOp::Remainder,
                IrAssignOp::CoalesceAssign => CsAssignOp::Coalesce,
            };
            Ok(CsExpr::Assignment {
                target: Box::new(target),
                op: cs_op,
                value: Box::new(value),
            })
        }
        // Destructuring assignment preserves the JS result value; see
        // pattern lowering for the lambda-wrapped form.
        IrAssignTarget::Pattern { pattern } => {
            patterns::lower_assignment_destructuring(ctx, pattern, value)
        }
    }
}

fn lower_function_expr(
    ctx: &mut EmitterContext,
    parameters: &[IrParameter],
    body: &IrFunctionBody,
    is_async: bool,
) -> Result<CsExpr, EmitError> {
    let snapshot = ctx.enter_scope();
    ctx.is_async = is_async;
    // A lambda body is never part of the enclosing generator frame.
    ctx.generator_exchange_var = None;
    ctx.generator_iterator_fn = None;
    ctx.generator_return_value_var = None;

    let mut lambda_params = Vec::with_capacity(parameters.len());
    let mut prologue: Vec<CsStmt> = Vec::new();
    for (index, parameter) in parameters.iter().enumerate() {
        match parameter.pattern.identifier_name() {
            Some(name) => {
                let emitted = ctx.declare_local(name);
                lambda_params.push(CsLambdaParam {
                    name: emitted,
                    ty: None,
                });
            }
            None => {
                let synthetic = ctx.reserve_name(&format!("__param{index}"));
                let element_ty = parameter.ty.clone();
                prologue.extend(patterns::lower_parameter_pattern(
                    ctx,
                    &parameter.pattern,
                    &synthetic,
                    element_ty.as_ref(),
                )?);
                lambda_params.push(CsLambdaParam {
                    name: synthetic,
                    ty: None,
                });
            }
        }
    }

    let lowered_body = match body {
        IrFunctionBody::Expression(expr) => {
            if prologue.is_empty() {
                CsLambdaBody::Expression(Box::new(lower_expr(ctx, expr)?))
            } else {
                let mut statements = prologue;
                statements.push(CsStmt::ret(Some(lower_expr(ctx, expr)?)));
                CsLambdaBody::Block(statements)
            }
        }
        IrFunctionBody::Block(body_statements) => {
            let mut statements = prologue;
            statements.extend(statements::lower_statements(ctx, body_statements)?);
            CsLambdaBody::Block(statements)
        }
    };

    ctx.leave_scope(snapshot);
    Ok(CsExpr::Lambda {
        parameters: lambda_params,
        body: lowered_body,
        is_async,
    })
}

fn lower_array_constructor(
    ctx: &mut EmitterContext,
    expr: &IrExpr,
    length: &IrExpr,
    element_type: Option<&IrType>,
) -> Result<CsExpr, EmitError> {
    let element = match element_type {
        Some(ty) => lower_type(ctx, ty)?,
        None => expr
            .inferred_type
            .as_ref()
            .and_then(|t| array_element_type(ctx, t))
            .map(|t| lower_type(ctx, &t))
            .transpose()?
            .unwrap_or_else(CsType::double),
    };
    let length = lower_index(ctx, length)?;
    Ok(CsExpr::ArrayCreation {
        element_type: Some(element),
        length: Some(Box::new(length)),
        initializer: None,
    })
}
