//! Generator lowering.
//!
//! A generator function lowers into three pieces: a mutable exchange
//! carrier (`{fn}_exchange`) alternating caller input and iterator
//! output, an inner iterator local function whose body is the user's
//! body with each `yield` rewritten through the exchange, and a wrapper
//! class (`{fn}_Generator`) exposing the bidirectional `next`,
//! `@return`, and `@throw` protocol over the underlying enumerator.
//! There are no coroutines on either side; the wrapper is a plain state
//! machine (Pending=0, Running=1, Done=2) that latches Done at most
//! once.

use tracing::debug;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_ir::{
    IrAssignTarget, IrExpr, IrExprKind, IrFunction, IrStatement, IrType,
};

use crate::cs_ast::{
    CsAccessors, CsBinaryOp, CsConstructor, CsExpr, CsField, CsMember, CsMethod, CsParameter,
    CsPattern, CsProperty, CsStmt, CsType, CsTypeDeclaration, CsTypeKind, Modifiers,
};
use crate::emit_context::EmitterContext;
use crate::lowering::expressions::lower_expr;
use crate::lowering::types::lower_type;
use crate::lowering::{functions, runtime, statements};

/// Everything a generator function lowers to. The caller decides where
/// the support types land (namespace members or nested types).
pub struct GeneratorLowering {
    pub exchange: CsTypeDeclaration,
    pub wrapper: CsTypeDeclaration,
    pub entry: CsMethod,
}

struct GeneratorShape {
    yield_ty: CsType,
    return_ty: CsType,
    next_ty: CsType,
    has_return_value: bool,
    is_async: bool,
    exchange_name: String,
    wrapper_name: String,
}

pub fn lower_generator_function(
    ctx: &mut EmitterContext,
    function: &IrFunction,
    modifiers: Modifiers,
) -> Result<GeneratorLowering, EmitError> {
    debug!(name = %function.name, "lowering generator");

    let (yield_ir, return_ir, next_ir) = match function
        .return_type
        .as_ref()
        .and_then(IrType::generator_arguments)
    {
        Some((y, r, n)) => (y.clone(), r.clone(), n.clone()),
        None => (IrType::Any, IrType::Void, IrType::Any),
    };

    let shape = GeneratorShape {
        yield_ty: lower_type(ctx, &yield_ir)?,
        return_ty: lower_type(ctx, &return_ir)?,
        next_ty: lower_type(ctx, &next_ir)?,
        has_return_value: !matches!(return_ir, IrType::Void | IrType::Undefined),
        is_async: function.is_async,
        exchange_name: format!("{}_exchange", function.name),
        wrapper_name: format!("{}_Generator", function.name),
    };

    let exchange = build_exchange_type(&shape);
    let wrapper = build_wrapper_type(&shape);
    let entry = build_entry_method(ctx, function, &shape, modifiers)?;

    Ok(GeneratorLowering {
        exchange,
        wrapper,
        entry,
    })
}

/// `public sealed class g_exchange { public N? Input; public Y Output; }`
fn build_exchange_type(shape: &GeneratorShape) -> CsTypeDeclaration {
    let mut decl = CsTypeDeclaration::new(
        CsTypeKind::Class,
        Modifiers::PUBLIC | Modifiers::SEALED,
        shape.exchange_name.clone(),
    );
    decl.members.push(CsMember::Field(CsField {
        modifiers: Modifiers::PUBLIC,
        ty: CsType::nullable(shape.next_ty.clone()),
        name: "Input".to_string(),
        initializer: None,
    }));
    decl.members.push(CsMember::Field(CsField {
        modifiers: Modifiers::PUBLIC,
        ty: shape.yield_ty.clone(),
        name: "Output".to_string(),
        initializer: Some(CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(
            None,
        )))),
    }));
    decl
}

fn enumerator_type(shape: &GeneratorShape) -> CsType {
    let iface = if shape.is_async {
        runtime::ASYNC_ENUMERATOR
    } else {
        runtime::ENUMERATOR
    };
    CsType::generic(iface, vec![CsType::named(&shape.exchange_name)])
}

fn iterator_result_type(shape: &GeneratorShape) -> CsType {
    CsType::generic(runtime::ITERATOR_RESULT, vec![shape.yield_ty.clone()])
}

/// Operation return type: plain for sync generators, `Task<..>` for
/// async ones.
fn operation_return_type(shape: &GeneratorShape) -> CsType {
    let result = iterator_result_type(shape);
    if shape.is_async {
        CsType::generic(runtime::TASK, vec![result])
    } else {
        result
    }
}

fn terminal_result(shape: &GeneratorShape) -> CsExpr {
    CsExpr::new_object(
        iterator_result_type(shape),
        vec![
            CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(None))),
            CsExpr::bool(true),
        ],
    )
}

fn state_is_done() -> CsExpr {
    CsExpr::binary(
        CsExpr::ident("__state"),
        CsBinaryOp::Equals,
        CsExpr::int(2),
    )
}

fn set_state(value: i64) -> CsStmt {
    CsStmt::expr(CsExpr::assign(CsExpr::ident("__state"), CsExpr::int(value)))
}

fn build_wrapper_type(shape: &GeneratorShape) -> CsTypeDeclaration {
    let mut decl = CsTypeDeclaration::new(
        CsTypeKind::Class,
        Modifiers::PUBLIC | Modifiers::SEALED,
        shape.wrapper_name.clone(),
    );

    decl.members.push(CsMember::Field(CsField {
        modifiers: Modifiers::PRIVATE | Modifiers::READONLY,
        ty: enumerator_type(shape),
        name: "__enumerator".to_string(),
        initializer: None,
    }));
    decl.members.push(CsMember::Field(CsField {
        modifiers: Modifiers::PRIVATE | Modifiers::READONLY,
        ty: CsType::named(&shape.exchange_name),
        name: "__exchange".to_string(),
        initializer: None,
    }));
    // 0 = pending, 1 = running, 2 = done
    decl.members.push(CsMember::Field(CsField {
        modifiers: Modifiers::PRIVATE,
        ty: CsType::int(),
        name: "__state".to_string(),
        initializer: None,
    }));
    if shape.has_return_value {
        decl.members.push(CsMember::Field(CsField {
            modifiers: Modifiers::PRIVATE | Modifiers::READONLY,
            ty: CsType::generic(runtime::FUNC, vec![shape.return_ty.clone()]),
            name: "__returnValueFn".to_string(),
            initializer: None,
        }));
        decl.members.push(CsMember::Field(CsField {
            modifiers: Modifiers::PRIVATE,
            ty: shape.return_ty.clone(),
            name: "__capturedReturn".to_string(),
            initializer: Some(CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(
                None,
            )))),
        }));
        decl.members.push(CsMember::Field(CsField {
            modifiers: Modifiers::PRIVATE,
            ty: CsType::bool(),
            name: "__hasCapturedReturn".to_string(),
            initializer: None,
        }));
    }

    decl.members
        .push(CsMember::Constructor(build_wrapper_constructor(shape)));
    decl.members.push(CsMember::Method(build_next_method(shape)));
    decl.members
        .push(CsMember::Method(build_return_method(shape)));
    decl.members
        .push(CsMember::Method(build_throw_method(shape)));

    if shape.has_return_value {
        decl.members.push(CsMember::Property(CsProperty {
            modifiers: Modifiers::PUBLIC,
            ty: shape.return_ty.clone(),
            name: "returnValue".to_string(),
            accessors: CsAccessors::ExpressionBodied(CsExpr::Conditional {
                condition: Box::new(CsExpr::ident("__hasCapturedReturn")),
                when_true: Box::new(CsExpr::ident("__capturedReturn")),
                when_false: Box::new(CsExpr::call(CsExpr::ident("__returnValueFn"), vec![])),
            }),
        }));
    }
    decl
}

fn build_wrapper_constructor(shape: &GeneratorShape) -> CsConstructor {
    let mut parameters = vec![
        CsParameter::new(enumerator_type(shape), "enumerator"),
        CsParameter::new(CsType::named(&shape.exchange_name), "exchange"),
    ];
    let mut body = vec![
        CsStmt::expr(CsExpr::assign(
            CsExpr::ident("__enumerator"),
            CsExpr::ident("enumerator"),
        )),
        CsStmt::expr(CsExpr::assign(
            CsExpr::ident("__exchange"),
            CsExpr::ident("exchange"),
        )),
    ];
    if shape.has_return_value {
        parameters.push(CsParameter::new(
            CsType::generic(runtime::FUNC, vec![shape.return_ty.clone()]),
            "returnValueFn",
        ));
        body.push(CsStmt::expr(CsExpr::assign(
            CsExpr::ident("__returnValueFn"),
            CsExpr::ident("returnValueFn"),
        )));
    }
    CsConstructor {
        modifiers: Modifiers::PUBLIC,
        name: shape.wrapper_name.clone(),
        parameters,
        initializer: None,
        body,
    }
}

/// `next` advances the enumerator once; Done latches terminally.
fn build_next_method(shape: &GeneratorShape) -> CsMethod {
    let move_next = if shape.is_async {
        CsExpr::Await(Box::new(CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "MoveNextAsync"),
            vec![],
        )))
    } else {
        CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "MoveNext"),
            vec![],
        )
    };

    let body = vec![
        CsStmt::If {
            condition: state_is_done(),
            then_branch: Box::new(CsStmt::Block(vec![CsStmt::ret(Some(terminal_result(
                shape,
            )))])),
            else_branch: None,
        },
        set_state(1),
        CsStmt::expr(CsExpr::assign(
            CsExpr::member(CsExpr::ident("__exchange"), "Input"),
            CsExpr::ident("value"),
        )),
        CsStmt::If {
            condition: move_next,
            then_branch: Box::new(CsStmt::Block(vec![CsStmt::ret(Some(CsExpr::new_object(
                iterator_result_type(shape),
                vec![
                    CsExpr::member(CsExpr::ident("__exchange"), "Output"),
                    CsExpr::bool(false),
                ],
            )))])),
            else_branch: None,
        },
        set_state(2),
        CsStmt::ret(Some(terminal_result(shape))),
    ];

    let mut modifiers = Modifiers::PUBLIC;
    if shape.is_async {
        modifiers |= Modifiers::ASYNC;
    }
    let mut method = CsMethod::new(modifiers, operation_return_type(shape), "next");
    method.parameters = vec![
        CsParameter::new(CsType::nullable(shape.next_ty.clone()), "value")
            .with_default(CsExpr::Default(None)),
    ];
    method.body = Some(body);
    method
}

/// `@return` latches Done, captures the supplied value, and disposes.
fn build_return_method(shape: &GeneratorShape) -> CsMethod {
    let dispose = if shape.is_async {
        CsStmt::expr(CsExpr::Await(Box::new(CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "DisposeAsync"),
            vec![],
        ))))
    } else {
        CsStmt::expr(CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "Dispose"),
            vec![],
        ))
    };

    let mut not_done = vec![set_state(2)];
    if shape.has_return_value {
        not_done.push(CsStmt::expr(CsExpr::assign(
            CsExpr::ident("__capturedReturn"),
            CsExpr::ident("value"),
        )));
        not_done.push(CsStmt::expr(CsExpr::assign(
            CsExpr::ident("__hasCapturedReturn"),
            CsExpr::bool(true),
        )));
    }
    not_done.push(dispose);

    let body = vec![
        CsStmt::If {
            condition: CsExpr::not(CsExpr::parens(state_is_done())),
            then_branch: Box::new(CsStmt::Block(not_done)),
            else_branch: None,
        },
        CsStmt::ret(Some(terminal_result(shape))),
    ];

    let mut modifiers = Modifiers::PUBLIC;
    if shape.is_async {
        modifiers |= Modifiers::ASYNC;
    }
    let mut method = CsMethod::new(modifiers, operation_return_type(shape), "return");
    if shape.has_return_value {
        method.parameters = vec![
            CsParameter::new(shape.return_ty.clone(), "value")
                .with_default(CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(
                    None,
                )))),
        ];
    }
    method.body = Some(body);
    method
}

/// `@throw` latches Done, disposes, then rethrows the supplied value
/// (wrapping non-exceptions). Once Done it is terminal like the others.
fn build_throw_method(shape: &GeneratorShape) -> CsMethod {
    let dispose = if shape.is_async {
        CsStmt::expr(CsExpr::Await(Box::new(CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "DisposeAsync"),
            vec![],
        ))))
    } else {
        CsStmt::expr(CsExpr::call(
            CsExpr::member(CsExpr::ident("__enumerator"), "Dispose"),
            vec![],
        ))
    };

    let body = vec![
        CsStmt::If {
            condition: state_is_done(),
            then_branch: Box::new(CsStmt::Block(vec![CsStmt::ret(Some(terminal_result(
                shape,
            )))])),
            else_branch: None,
        },
        set_state(2),
        dispose,
        CsStmt::If {
            condition: CsExpr::is_pattern(
                CsExpr::ident("e"),
                CsPattern::Declaration {
                    ty: CsType::named(runtime::EXCEPTION),
                    designator: "__ex".to_string(),
                },
            ),
            then_branch: Box::new(CsStmt::Block(vec![CsStmt::Throw(Some(CsExpr::ident(
                "__ex",
            )))])),
            else_branch: None,
        },
        CsStmt::Throw(Some(CsExpr::new_object(
            CsType::named(runtime::EXCEPTION),
            vec![CsExpr::binary(
                CsExpr::call(CsExpr::member(CsExpr::ident("e"), "ToString"), vec![]),
                CsBinaryOp::Coalesce,
                CsExpr::literal("\"Unknown error\""),
            )],
        ))),
    ];

    let mut modifiers = Modifiers::PUBLIC;
    if shape.is_async {
        modifiers |= Modifiers::ASYNC;
    }
    let mut method = CsMethod::new(modifiers, operation_return_type(shape), "throw");
    method.parameters = vec![CsParameter::new(CsType::object(), "e")];
    method.body = Some(body);
    method
}

/// The public entry point: construct the exchange, define the inner
/// iterator, hand both to a new wrapper.
fn build_entry_method(
    ctx: &mut EmitterContext,
    function: &IrFunction,
    shape: &GeneratorShape,
    modifiers: Modifiers,
) -> Result<CsMethod, EmitError> {
    let snapshot = ctx.enter_scope();
    ctx.reset_declaration_state();
    ctx.is_async = false;

    let signature = functions::lower_signature(
        ctx,
        &function.type_parameters,
        &function.parameters,
        None,
        false,
    )?;

    let exchange_var = ctx.reserve_name("exchange");
    let iterator_fn = ctx.reserve_name("__iterator");
    let return_value_var = if shape.has_return_value {
        Some(ctx.reserve_name("__returnValue"))
    } else {
        None
    };

    let mut body: Vec<CsStmt> = signature.prologue;
    body.push(CsStmt::var(
        exchange_var.clone(),
        CsExpr::new_object(CsType::named(&shape.exchange_name), vec![]),
    ));
    if let Some(return_value_var) = &return_value_var {
        body.push(CsStmt::local(
            shape.return_ty.clone(),
            return_value_var.clone(),
            Some(CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(
                None,
            )))),
        ));
    }

    // Inner iterator: the user's body with yields rewritten through the
    // exchange.
    let iterator_body = {
        let snapshot = ctx.enter_scope();
        ctx.is_async = shape.is_async;
        ctx.generator_exchange_var = Some(exchange_var.clone());
        ctx.generator_iterator_fn = Some(iterator_fn.clone());
        ctx.generator_return_value_var = return_value_var.clone();
        let lowered = statements::lower_statements(ctx, &function.body)?;
        ctx.leave_scope(snapshot);
        lowered
    };

    let mut iterator = CsMethod::new(
        if shape.is_async {
            Modifiers::ASYNC
        } else {
            Modifiers::default()
        },
        enumerator_type(shape),
        iterator_fn.clone(),
    );
    iterator.body = Some(iterator_body);
    body.push(CsStmt::LocalFunction(Box::new(iterator)));

    let mut wrapper_args = vec![
        CsExpr::call(CsExpr::ident(iterator_fn), vec![]),
        CsExpr::ident(exchange_var),
    ];
    if let Some(return_value_var) = return_value_var {
        wrapper_args.push(CsExpr::lambda0(crate::cs_ast::CsLambdaBody::Expression(
            Box::new(CsExpr::ident(return_value_var)),
        )));
    }
    body.push(CsStmt::ret(Some(CsExpr::new_object(
        CsType::named(&shape.wrapper_name),
        wrapper_args,
    ))));

    ctx.leave_scope(snapshot);

    let mut entry = CsMethod::new(
        modifiers,
        CsType::named(&shape.wrapper_name),
        function.name.clone(),
    );
    entry.type_parameters = signature.type_parameters;
    entry.constraints = signature.constraints;
    entry.parameters = signature.parameters;
    entry.body = Some(body);
    Ok(entry)
}

// =========================================================================
// Yield statement protocol
// =========================================================================

/// Rewrite generator-frame statements (`yield`, `yield*`, `return`).
/// Returns `None` when the statement has no generator-specific shape, or
/// when no generator frame is active.
pub fn try_lower_generator_statement(
    ctx: &mut EmitterContext,
    statement: &IrStatement,
) -> Result<Option<Vec<CsStmt>>, EmitError> {
    if ctx.generator_exchange_var.is_none() {
        return Ok(None);
    }

    match statement {
        IrStatement::Expression { expression } => match &expression.kind {
            IrExprKind::Yield { argument, delegate } => {
                let lowered = lower_yield(ctx, argument.as_deref(), *delegate, None)?;
                Ok(Some(lowered))
            }
            IrExprKind::Assignment {
                target: IrAssignTarget::Expression { expression: target },
                op: tsonic_ir::IrAssignOp::Assign,
                value,
            } if matches!(value.kind, IrExprKind::Yield { .. }) => {
                let IrExprKind::Yield { argument, delegate } = &value.kind else {
                    unreachable!()
                };
                let target = lower_expr(ctx, target)?;
                let lowered =
                    lower_yield(ctx, argument.as_deref(), *delegate, Some(YieldSink::Assign(target)))?;
                Ok(Some(lowered))
            }
            _ => Ok(None),
        },
        IrStatement::VariableDeclaration { declarations, .. }
            if declarations.len() == 1
                && declarations[0]
                    .initializer
                    .as_ref()
                    .is_some_and(|init| matches!(init.kind, IrExprKind::Yield { .. })) =>
        {
            let declarator = &declarations[0];
            let Some(name) = declarator.pattern.identifier_name() else {
                return Err(EmitError::ice(
                    ice_codes::UNSUPPORTED_NODE,
                    "destructuring a yield result is not part of the supported subset",
                ));
            };
            let Some(initializer) = declarator.initializer.as_ref() else {
                return Ok(None);
            };
            let IrExprKind::Yield { argument, delegate } = &initializer.kind else {
                return Ok(None);
            };
            let declared = declarator.declared_type.clone();
            let name = name.to_string();
            let argument = argument.clone();
            let delegate = *delegate;
            let lowered = lower_yield(
                ctx,
                argument.as_deref(),
                delegate,
                Some(YieldSink::Declare {
                    name,
                    ty: declared,
                }),
            )?;
            Ok(Some(lowered))
        }
        IrStatement::Return { expression } => {
            let mut out = Vec::new();
            if let Some(expression) = expression {
                match ctx.generator_return_value_var.clone() {
                    Some(return_var) => {
                        let value = lower_expr(ctx, expression)?;
                        out.push(CsStmt::expr(CsExpr::assign(
                            CsExpr::Identifier(return_var),
                            value,
                        )));
                    }
                    None => {
                        // `return <expr>` in a void-returning generator
                        // still evaluates the operand.
                        out.push(CsStmt::expr(lower_expr(ctx, expression)?));
                    }
                }
            }
            out.push(CsStmt::YieldBreak);
            Ok(Some(out))
        }
        _ => Ok(None),
    }
}

enum YieldSink {
    /// `target = exchange.Input ?? default;`
    Assign(CsExpr),
    /// `T name = exchange.Input ?? default;`
    Declare { name: String, ty: Option<IrType> },
}

fn lower_yield(
    ctx: &mut EmitterContext,
    argument: Option<&IrExpr>,
    delegate: bool,
    sink: Option<YieldSink>,
) -> Result<Vec<CsStmt>, EmitError> {
    let Some(exchange) = ctx.generator_exchange_var.clone() else {
        return Err(EmitError::ice(
            ice_codes::YIELD_OUTSIDE_GENERATOR,
            "yield outside an active generator frame",
        ));
    };

    if delegate {
        return lower_yield_delegation(ctx, argument, sink, &exchange);
    }

    let mut out = Vec::new();
    let output = match argument {
        Some(argument) => lower_expr(ctx, argument)?,
        None => CsExpr::SuppressNullableWarning(Box::new(CsExpr::Default(None))),
    };
    out.push(CsStmt::expr(CsExpr::assign(
        CsExpr::member(CsExpr::ident(exchange.clone()), "Output"),
        output,
    )));
    out.push(CsStmt::YieldReturn(CsExpr::ident(exchange.clone())));
    push_input_sink(ctx, &mut out, sink, &exchange)?;
    Ok(out)
}

/// `yield* inner`: drive the delegated wrapper through another exchange,
/// forwarding caller input on each resumption.
fn lower_yield_delegation(
    ctx: &mut EmitterContext,
    argument: Option<&IrExpr>,
    sink: Option<YieldSink>,
    exchange: &str,
) -> Result<Vec<CsStmt>, EmitError> {
    let Some(argument) = argument else {
        return Err(EmitError::ice(
            ice_codes::UNSUPPORTED_NODE,
            "yield* requires a delegated generator expression",
        ));
    };
    let inner = lower_expr(ctx, argument)?;
    let gen_var = ctx.alloc_temp("gen");
    let res_var = ctx.alloc_temp("res");

    let mut out = vec![
        CsStmt::var(gen_var.clone(), inner),
        CsStmt::var(
            res_var.clone(),
            CsExpr::call(CsExpr::member(CsExpr::ident(gen_var.clone()), "next"), vec![]),
        ),
    ];
    let loop_body = vec![
        CsStmt::expr(CsExpr::assign(
            CsExpr::member(CsExpr::ident(exchange), "Output"),
            CsExpr::member(CsExpr::ident(res_var.clone()), "value"),
        )),
        CsStmt::YieldReturn(CsExpr::ident(exchange)),
        CsStmt::expr(CsExpr::assign(
            CsExpr::Identifier(res_var.clone()),
            CsExpr::call(
                CsExpr::member(CsExpr::ident(gen_var), "next"),
                vec![CsExpr::member(CsExpr::ident(exchange), "Input")],
            ),
        )),
    ];
    out.push(CsStmt::While {
        condition: CsExpr::not(CsExpr::member(CsExpr::ident(res_var.clone()), "done")),
        body: Box::new(CsStmt::Block(loop_body)),
    });
    // The delegated generator's final value feeds the sink.
    match sink {
        Some(YieldSink::Assign(target)) => {
            out.push(CsStmt::expr(CsExpr::assign(
                target,
                CsExpr::member(CsExpr::ident(res_var), "value"),
            )));
        }
        Some(YieldSink::Declare { name, ty }) => {
            let cs_ty = match &ty {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::Var,
            };
            let emitted = ctx.declare_local(&name);
            out.push(CsStmt::local(
                cs_ty,
                emitted,
                Some(CsExpr::member(CsExpr::ident(res_var), "value")),
            ));
        }
        None => {}
    }
    Ok(out)
}

fn push_input_sink(
    ctx: &mut EmitterContext,
    out: &mut Vec<CsStmt>,
    sink: Option<YieldSink>,
    exchange: &str,
) -> Result<(), EmitError> {
    let input = CsExpr::binary(
        CsExpr::member(CsExpr::ident(exchange), "Input"),
        CsBinaryOp::Coalesce,
        CsExpr::Default(None),
    );
    match sink {
        Some(YieldSink::Assign(target)) => {
            out.push(CsStmt::expr(CsExpr::assign(target, input)));
        }
        Some(YieldSink::Declare { name, ty }) => {
            let cs_ty = match &ty {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::Var,
            };
            let emitted = ctx.declare_local(&name);
            out.push(CsStmt::local(cs_ty, emitted, Some(input)));
        }
        None => {}
    }
    Ok(())
}
