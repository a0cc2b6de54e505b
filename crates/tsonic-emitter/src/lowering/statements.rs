//! IR statement lowering.
//!
//! One IR statement may expand to several C# statements (destructuring,
//! generator yields). Control-flow bodies always lower to blocks so the
//! printed shape is uniform. Generator statement rewriting runs first;
//! see the generators module for the yield protocol.

use tracing::trace;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_ir::{
    IrAssignOp, IrAssignTarget, IrBinaryOp, IrDeclaration, IrExpr, IrExprKind, IrPattern,
    IrStatement, IrSwitchCase, IrType, IrUpdateOp, IrVariableDeclarator,
};

use crate::cs_ast::{
    CsCatchClause, CsExpr, CsStmt, CsSwitchLabel, CsSwitchSection, CsType,
};
use crate::emit_context::EmitterContext;
use crate::lowering::expressions::lower_expr;
use crate::lowering::truthiness::lower_condition;
use crate::lowering::types::{array_element_type, lower_type, resolve_surface};
use crate::lowering::{functions, generators, patterns, runtime};

pub fn lower_statements(
    ctx: &mut EmitterContext,
    statements: &[IrStatement],
) -> Result<Vec<CsStmt>, EmitError> {
    let mut out = Vec::with_capacity(statements.len());
    for statement in statements {
        out.extend(lower_statement(ctx, statement)?);
    }
    Ok(out)
}

pub fn lower_statement(
    ctx: &mut EmitterContext,
    statement: &IrStatement,
) -> Result<Vec<CsStmt>, EmitError> {
    // Generator bodies rewrite yields and returns through the exchange.
    if let Some(lowered) = generators::try_lower_generator_statement(ctx, statement)? {
        return Ok(lowered);
    }

    match statement {
        IrStatement::VariableDeclaration { declarations, .. } => {
            let mut out = Vec::new();
            for declarator in declarations {
                out.extend(lower_variable_declarator(ctx, declarator)?);
            }
            Ok(out)
        }
        IrStatement::Expression { expression } => {
            Ok(vec![CsStmt::expr(lower_expr(ctx, expression)?)])
        }
        IrStatement::Block { statements } => {
            let snapshot = ctx.enter_scope();
            let lowered = lower_statements(ctx, statements)?;
            ctx.leave_scope(snapshot);
            Ok(vec![CsStmt::Block(lowered)])
        }
        IrStatement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition = lower_condition(ctx, condition)?;
            let then_branch = lower_body(ctx, then_branch)?;
            let else_branch = match else_branch {
                Some(else_branch) => {
                    if let IrStatement::If { .. } = &**else_branch {
                        // Keep else-if chains flat.
                        let chain = lower_statement(ctx, else_branch)?;
                        debug_assert_eq!(chain.len(), 1);
                        chain.into_iter().next().map(Box::new)
                    } else {
                        Some(Box::new(lower_body(ctx, else_branch)?))
                    }
                }
                None => None,
            };
            Ok(vec![CsStmt::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch,
            }])
        }
        IrStatement::While { condition, body } => {
            let condition = lower_condition(ctx, condition)?;
            let body = lower_body(ctx, body)?;
            Ok(vec![CsStmt::While {
                condition,
                body: Box::new(body),
            }])
        }
        IrStatement::DoWhile { body, condition } => {
            let body = lower_body(ctx, body)?;
            let condition = lower_condition(ctx, condition)?;
            Ok(vec![CsStmt::DoWhile {
                body: Box::new(body),
                condition,
            }])
        }
        IrStatement::For {
            initializer,
            condition,
            update,
            body,
        } => lower_for(ctx, initializer.as_deref(), condition.as_ref(), update.as_ref(), body),
        IrStatement::ForOf {
            pattern,
            iterable,
            body,
        } => lower_for_of(ctx, pattern, iterable, body),
        IrStatement::ForIn {
            pattern,
            object,
            body,
        } => lower_for_in(ctx, pattern, object, body),
        IrStatement::Switch {
            discriminant,
            cases,
        } => lower_switch(ctx, discriminant, cases),
        IrStatement::Try {
            block,
            catch,
            finally,
        } => {
            let snapshot = ctx.enter_scope();
            let block = lower_statements(ctx, block)?;
            ctx.leave_scope(snapshot);

            let mut catches = Vec::new();
            if let Some(catch) = catch {
                let snapshot = ctx.enter_scope();
                let identifier = catch
                    .parameter
                    .as_deref()
                    .map(|name| ctx.declare_local(name));
                let body = lower_statements(ctx, &catch.body)?;
                ctx.leave_scope(snapshot);
                catches.push(CsCatchClause {
                    ty: Some(CsType::named(runtime::EXCEPTION)),
                    identifier,
                    block: body,
                });
            }

            let finally = match finally {
                Some(statements) => {
                    let snapshot = ctx.enter_scope();
                    let lowered = lower_statements(ctx, statements)?;
                    ctx.leave_scope(snapshot);
                    Some(lowered)
                }
                None => None,
            };
            Ok(vec![CsStmt::Try {
                block,
                catches,
                finally,
            }])
        }
        IrStatement::Throw { expression } => {
            Ok(vec![CsStmt::Throw(Some(lower_expr(ctx, expression)?))])
        }
        IrStatement::Return { expression } => {
            let expression = expression
                .as_ref()
                .map(|e| lower_expr(ctx, e))
                .transpose()?;
            Ok(vec![CsStmt::Return(expression)])
        }
        IrStatement::Break => Ok(vec![CsStmt::Break]),
        IrStatement::Continue => Ok(vec![CsStmt::Continue]),
        IrStatement::Empty => Ok(vec![CsStmt::Empty]),
        IrStatement::Declaration { declaration } => match declaration {
            IrDeclaration::Function(function) => Ok(vec![CsStmt::LocalFunction(Box::new(
                functions::lower_local_function(ctx, function)?,
            ))]),
            other => Err(EmitError::ice(
                ice_codes::UNSUPPORTED_NODE,
                format!(
                    "declaration '{}' is not valid in statement position",
                    other.name()
                ),
            )),
        },
    }
}

/// Lower a control-flow body into a block, opening a scope around it.
pub(crate) fn lower_body(
    ctx: &mut EmitterContext,
    body: &IrStatement,
) -> Result<CsStmt, EmitError> {
    let snapshot = ctx.enter_scope();
    let lowered = match body {
        IrStatement::Block { statements } => CsStmt::Block(lower_statements(ctx, statements)?),
        other => CsStmt::Block(lower_statement(ctx, other)?),
    };
    ctx.leave_scope(snapshot);
    Ok(lowered)
}

fn lower_variable_declarator(
    ctx: &mut EmitterContext,
    declarator: &IrVariableDeclarator,
) -> Result<Vec<CsStmt>, EmitError> {
    match &declarator.pattern {
        IrPattern::Identifier { name, ty } => {
            let declared = declarator
                .declared_type
                .as_ref()
                .or(ty.as_ref())
                .cloned()
                .or_else(|| {
                    declarator
                        .initializer
                        .as_ref()
                        .and_then(|init| init.inferred_type.clone())
                });
            let cs_ty = match (&declared, &declarator.initializer) {
                (Some(ty), _) => lower_type(ctx, ty)?,
                (None, Some(_)) => CsType::Var,
                // `var` requires an initializer; an untyped bare `let`
                // falls back to a nullable object slot.
                (None, None) => CsType::nullable(CsType::object()),
            };
            let initializer = declarator
                .initializer
                .as_ref()
                .map(|init| lower_expr(ctx, init))
                .transpose()?;
            let emitted = ctx.declare_local(name);
            Ok(vec![CsStmt::local(cs_ty, emitted, initializer)])
        }
        pattern => {
            let Some(initializer) = &declarator.initializer else {
                return Err(EmitError::ice(
                    ice_codes::UNSUPPORTED_NODE,
                    "destructuring declaration without an initializer",
                ));
            };
            patterns::lower_declaration_destructuring(
                ctx,
                pattern,
                initializer,
                declarator.declared_type.as_ref(),
            )
        }
    }
}

/// The canonical integer-counter heuristic from the proof pass:
/// `for (let i = <int literal>; i < n; i++)` (also `<=`, `++i`,
/// `i += 1`, `i = i + 1`) declares `int i` and records it so indexing
/// skips the double→int cast.
fn is_ident(kind: &IrExprKind, name: &str) -> bool {
    matches!(kind, IrExprKind::Identifier { name: n } if n == name)
}

fn is_one(kind: &IrExprKind) -> bool {
    matches!(kind, IrExprKind::NumberLiteral { value } if *value == 1.0)
}

fn canonical_int_counter(
    initializer: Option<&IrStatement>,
    condition: Option<&IrExpr>,
    update: Option<&IrExpr>,
) -> Option<(String, i64)> {
    let IrStatement::VariableDeclaration { declarations, .. } = initializer? else {
        return None;
    };
    let [declarator] = declarations.as_slice() else {
        return None;
    };
    let name = declarator.pattern.identifier_name()?;
    let IrExprKind::NumberLiteral { value } = &declarator.initializer.as_ref()?.kind else {
        return None;
    };
    if value.fract() != 0.0 || !value.is_finite() {
        return None;
    }

    let IrExprKind::Binary { op, left, .. } = &condition?.kind else {
        return None;
    };
    if !matches!(op, IrBinaryOp::Less | IrBinaryOp::LessEqual) {
        return None;
    }
    if !is_ident(&left.kind, name) {
        return None;
    }

    let update_matches = match &update?.kind {
        IrExprKind::Update {
            op: IrUpdateOp::Increment,
            operand,
            ..
        } => is_ident(&operand.kind, name),
        IrExprKind::Assignment { target, op, value } => {
            let IrAssignTarget::Expression { expression } = target else {
                return None;
            };
            if !is_ident(&expression.kind, name) {
                return None;
            }
            match op {
                // i += 1
                IrAssignOp::AddAssign => is_one(&value.kind),
                // i = i + 1
                IrAssignOp::Assign => matches!(
                    &value.kind,
                    IrExprKind::Binary {
                        op: IrBinaryOp::Add,
                        left,
                        right,
                    } if is_ident(&left.kind, name) && is_one(&right.kind)
                ),
                _ => false,
            }
        }
        _ => return None,
    };
    if !update_matches {
        return None;
    }
    Some((name.to_string(), *value as i64))
}

fn lower_for(
    ctx: &mut EmitterContext,
    initializer: Option<&IrStatement>,
    condition: Option<&IrExpr>,
    update: Option<&IrExpr>,
    body: &IrStatement,
) -> Result<Vec<CsStmt>, EmitError> {
    let snapshot = ctx.enter_scope();

    let lowered_init: Option<Box<CsStmt>>;
    if let Some((counter, start)) = canonical_int_counter(initializer, condition, update) {
        trace!(counter = %counter, "canonical int loop counter");
        let emitted = ctx.declare_local(&counter);
        ctx.mark_int_loop_var(emitted.clone());
        lowered_init = Some(Box::new(CsStmt::local(
            CsType::int(),
            emitted,
            Some(CsExpr::literal(start.to_string())),
        )));
    } else {
        lowered_init = match initializer {
            Some(statement) => {
                let mut lowered = lower_statement(ctx, statement)?;
                if lowered.len() != 1 {
                    return Err(EmitError::ice(
                        ice_codes::UNSUPPORTED_NODE,
                        "for-initializer expanded to multiple statements",
                    ));
                }
                Some(Box::new(lowered.remove(0)))
            }
            None => None,
        };
    }

    let condition = condition.map(|c| lower_condition(ctx, c)).transpose()?;
    let incrementors = match update {
        Some(update) => vec![lower_expr(ctx, update)?],
        None => Vec::new(),
    };
    let body = lower_body(ctx, body)?;
    ctx.leave_scope(snapshot);

    Ok(vec![CsStmt::For {
        initializer: lowered_init,
        condition,
        incrementors,
        body: Box::new(body),
    }])
}

fn lower_for_of(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    iterable: &IrExpr,
    body: &IrStatement,
) -> Result<Vec<CsStmt>, EmitError> {
    let element_ty = iterable
        .inferred_type
        .as_ref()
        .and_then(|t| array_element_type(ctx, t));
    let expression = lower_expr(ctx, iterable)?;

    let snapshot = ctx.enter_scope();
    let lowered = match pattern.identifier_name() {
        Some(name) => {
            let cs_ty = match &element_ty {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::Var,
            };
            let emitted = ctx.declare_local(name);
            let body = lower_body(ctx, body)?;
            CsStmt::Foreach {
                ty: cs_ty,
                identifier: emitted,
                expression,
                body: Box::new(body),
                is_await: false,
            }
        }
        None => {
            // Complex heads iterate into a synthetic item, then expand
            // the destructuring at the top of the loop body.
            let item = ctx.alloc_temp("item");
            let mut statements = patterns::lower_parameter_pattern(
                ctx,
                pattern,
                &item,
                element_ty.as_ref(),
            )?;
            match lower_body(ctx, body)? {
                CsStmt::Block(body_statements) => statements.extend(body_statements),
                other => statements.push(other),
            }
            CsStmt::Foreach {
                ty: CsType::Var,
                identifier: item,
                expression,
                body: Box::new(CsStmt::Block(statements)),
                is_await: false,
            }
        }
    };
    ctx.leave_scope(snapshot);
    Ok(vec![lowered])
}

fn lower_for_in(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    object: &IrExpr,
    body: &IrStatement,
) -> Result<Vec<CsStmt>, EmitError> {
    let Some(name) = pattern.identifier_name() else {
        return Err(EmitError::ice(
            ice_codes::UNSUPPORTED_NODE,
            "for-in head must bind a plain identifier",
        ));
    };
    // for-in enumerates keys; the validator restricts it to dictionary
    // receivers.
    let keys = CsExpr::member(lower_expr(ctx, object)?, "Keys");
    let snapshot = ctx.enter_scope();
    let key_ty = object
        .inferred_type
        .as_ref()
        .map(|t| resolve_surface(ctx, t, 0));
    let cs_ty = match key_ty {
        Some(IrType::Dictionary { key, .. }) => lower_type(ctx, &key)?,
        _ => CsType::string(),
    };
    let emitted = ctx.declare_local(name);
    let body = lower_body(ctx, body)?;
    ctx.leave_scope(snapshot);
    Ok(vec![CsStmt::Foreach {
        ty: cs_ty,
        identifier: emitted,
        expression: keys,
        body: Box::new(body),
        is_await: false,
    }])
}

fn lower_switch(
    ctx: &mut EmitterContext,
    discriminant: &IrExpr,
    cases: &[IrSwitchCase],
) -> Result<Vec<CsStmt>, EmitError> {
    let expression = lower_expr(ctx, discriminant)?;
    let mut sections: Vec<CsSwitchSection> = Vec::new();
    let mut pending_labels: Vec<CsSwitchLabel> = Vec::new();

    for case in cases {
        let label = match &case.test {
            Some(test) => CsSwitchLabel::Case(lower_expr(ctx, test)?),
            None => CsSwitchLabel::Default,
        };
        pending_labels.push(label);
        if case.statements.is_empty() {
            // Label-only cases share the next non-empty body.
            continue;
        }
        let snapshot = ctx.enter_scope();
        let mut statements = lower_statements(ctx, &case.statements)?;
        ctx.leave_scope(snapshot);
        if !ends_control_flow(statements.last()) {
            statements.push(CsStmt::Break);
        }
        sections.push(CsSwitchSection {
            labels: std::mem::take(&mut pending_labels),
            statements,
        });
    }
    if !pending_labels.is_empty() {
        sections.push(CsSwitchSection {
            labels: pending_labels,
            statements: vec![CsStmt::Break],
        });
    }
    Ok(vec![CsStmt::Switch {
        expression,
        sections,
    }])
}

fn ends_control_flow(stmt: Option<&CsStmt>) -> bool {
    matches!(
        stmt,
        Some(
            CsStmt::Break
                | CsStmt::Continue
                | CsStmt::Return(_)
                | CsStmt::Throw(_)
                | CsStmt::YieldBreak
        )
    )
}
