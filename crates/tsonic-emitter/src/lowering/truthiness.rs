//! Boolean-context lowering.
//!
//! Maps JS truthiness onto a valid C# boolean condition. The decision
//! table is closed over the IR type kind and applied in order: literal
//! folding, boolean passthrough, runtime-truthiness fallback for
//! missing/any/unknown, union dispatch, the non-primitive runtime
//! switch, and finally the per-primitive rules. Every non-literal
//! operand evaluates exactly once; anything that must be inspected
//! twice is bound through an `is`-pattern variable first.

use tracing::trace;

use tsonic_common::diagnostics::EmitError;
use tsonic_common::limits::MAX_UNION_ARITY;
use tsonic_ir::{IrBinaryOp, IrExpr, IrExprKind, IrLogicalOp, IrType, IrUnaryOp};

use crate::cs_ast::{CsBinaryOp, CsExpr, CsPattern, CsSwitchExpressionArm, CsType};
use crate::emit_context::EmitterContext;
use crate::lowering::expressions::lower_expr;
use crate::lowering::types::{literal_collapse, lower_type, resolve_surface, split_union_arms};
use crate::lowering::runtime;

/// Lower an IR expression into a C# condition preserving JS truthiness.
pub fn lower_condition(ctx: &mut EmitterContext, expr: &IrExpr) -> Result<CsExpr, EmitError> {
    // Logical operators recurse per operand and combine with the C#
    // operator; parenthesization is the printer's problem.
    match &expr.kind {
        IrExprKind::Logical {
            op: IrLogicalOp::And,
            left,
            right,
        } => {
            let left = lower_condition(ctx, left)?;
            let right = lower_condition(ctx, right)?;
            return Ok(CsExpr::binary(left, CsBinaryOp::LogicalAnd, right));
        }
        IrExprKind::Logical {
            op: IrLogicalOp::Or,
            left,
            right,
        } => {
            let left = lower_condition(ctx, left)?;
            let right = lower_condition(ctx, right)?;
            return Ok(CsExpr::binary(left, CsBinaryOp::LogicalOr, right));
        }
        IrExprKind::Unary {
            op: IrUnaryOp::Not,
            operand,
        } => {
            return Ok(CsExpr::not(lower_condition(ctx, operand)?));
        }
        _ => {}
    }

    // Rule 1: literals resolve at lowering time.
    if let Some(folded) = fold_literal(expr) {
        return Ok(CsExpr::bool(folded));
    }

    // Rule 2: already-boolean expressions pass through.
    if is_boolean_shaped(ctx, expr) {
        return lower_expr(ctx, expr);
    }

    // Rule 3: no usable type information.
    let Some(ty) = expr
        .inferred_type
        .as_ref()
        .map(|t| resolve_surface(ctx, t, 0))
    else {
        trace!("truthiness fallback: missing inferred type");
        let operand = lower_expr(ctx, expr)?;
        return Ok(runtime_truthiness_switch(ctx, operand));
    };

    match &ty {
        IrType::Any | IrType::Unknown => {
            let operand = lower_expr(ctx, expr)?;
            Ok(runtime_truthiness_switch(ctx, operand))
        }
        IrType::Null | IrType::Undefined => Ok(CsExpr::bool(false)),
        IrType::Union { types } => lower_union_condition(ctx, expr, types),
        IrType::Boolean => lower_expr(ctx, expr),
        IrType::String | IrType::Int | IrType::Char | IrType::Number | IrType::Literal { .. } => {
            let operand = lower_expr(ctx, expr)?;
            let base = ty.literal_base().unwrap_or(ty.clone());
            Ok(primitive_condition(ctx, operand, &base))
        }
        // Rule 5: non-primitive, non-union. Never `!= null`, which
        // miscompiles boxed value types.
        _ => {
            let operand = lower_expr(ctx, expr)?;
            Ok(runtime_truthiness_switch(ctx, operand))
        }
    }
}

fn fold_literal(expr: &IrExpr) -> Option<bool> {
    match &expr.kind {
        IrExprKind::NumberLiteral { value } => Some(*value != 0.0 && !value.is_nan()),
        IrExprKind::StringLiteral { value } => Some(!value.is_empty()),
        IrExprKind::BooleanLiteral { value } => Some(*value),
        IrExprKind::NullLiteral | IrExprKind::UndefinedLiteral => Some(false),
        _ => None,
    }
}

fn is_boolean_shaped(ctx: &EmitterContext, expr: &IrExpr) -> bool {
    match &expr.kind {
        IrExprKind::Binary { op, .. } => matches!(
            op,
            IrBinaryOp::Less
                | IrBinaryOp::LessEqual
                | IrBinaryOp::Greater
                | IrBinaryOp::GreaterEqual
                | IrBinaryOp::Equals
                | IrBinaryOp::NotEquals
                | IrBinaryOp::InstanceOf
                | IrBinaryOp::In
        ),
        _ => expr
            .inferred_type
            .as_ref()
            .map(|t| resolve_surface(ctx, t, 0))
            .is_some_and(|t| matches!(t, IrType::Boolean)),
    }
}

/// Apply the per-primitive truthiness rule to an already-lowered operand
/// that is safe to mention the number of times the rule requires.
fn primitive_condition(ctx: &mut EmitterContext, operand: CsExpr, base: &IrType) -> CsExpr {
    match base {
        IrType::Boolean => operand,
        // The receiver is the predefined type keyword, never escaped.
        IrType::String => CsExpr::not(CsExpr::call(
            CsExpr::member(CsExpr::literal("string"), "IsNullOrEmpty"),
            vec![operand],
        )),
        IrType::Int => CsExpr::binary(operand, CsBinaryOp::NotEquals, CsExpr::int(0)),
        IrType::Char => CsExpr::binary(
            operand,
            CsBinaryOp::NotEquals,
            CsExpr::literal("'\\0'"),
        ),
        IrType::Number => number_condition(ctx, operand),
        IrType::Null | IrType::Undefined => CsExpr::bool(false),
        _ => runtime_truthiness_switch(ctx, operand),
    }
}

/// `(x is double __tsonic_truthy_num_n && __tsonic_truthy_num_n != 0 &&
/// !double.IsNaN(__tsonic_truthy_num_n))` — the pattern variable makes
/// the operand evaluate once.
fn number_condition(ctx: &mut EmitterContext, operand: CsExpr) -> CsExpr {
    let temp = ctx.alloc_suffixed_temp("__tsonic_truthy_num");
    let is_match = CsExpr::is_pattern(
        operand,
        CsPattern::Declaration {
            ty: CsType::double(),
            designator: temp.clone(),
        },
    );
    let nonzero = CsExpr::binary(
        CsExpr::ident(temp.clone()),
        CsBinaryOp::NotEquals,
        CsExpr::int(0),
    );
    let not_nan = CsExpr::not(CsExpr::call(
        CsExpr::member(CsExpr::literal("double"), "IsNaN"),
        vec![CsExpr::ident(temp)],
    ));
    CsExpr::parens(CsExpr::binary(
        CsExpr::binary(is_match, CsBinaryOp::LogicalAnd, nonzero),
        CsBinaryOp::LogicalAnd,
        not_nan,
    ))
}

fn lower_union_condition(
    ctx: &mut EmitterContext,
    expr: &IrExpr,
    types: &[IrType],
) -> Result<CsExpr, EmitError> {
    let arms = split_union_arms(types);

    if arms.arms.is_empty() {
        return Ok(CsExpr::bool(false));
    }

    // Nullish + one non-nullish arm: match the value and recurse.
    if arms.arms.len() == 1 {
        let arm = &arms.arms[0];
        let operand = lower_expr(ctx, expr)?;
        if !arms.has_nullish {
            return Ok(primitive_condition(ctx, operand, arm));
        }
        let arm_cs = lower_type(ctx, arm)?;
        let temp = ctx.alloc_temp("v");
        let is_match = CsExpr::is_pattern(
            operand,
            CsPattern::Declaration {
                ty: arm_cs.without_nullable().clone(),
                designator: temp.clone(),
            },
        );
        let value_cond = primitive_condition(ctx, CsExpr::ident(temp), arm);
        return Ok(CsExpr::binary(
            is_match,
            CsBinaryOp::LogicalAnd,
            value_cond,
        ));
    }

    // Literal arms over one base primitive collapse to the base rule,
    // under a nullable is-match when nullish members are present.
    if let Some(base) = literal_collapse(&arms.arms) {
        let operand = lower_expr(ctx, expr)?;
        if !arms.has_nullish {
            return Ok(primitive_condition(ctx, operand, &base));
        }
        let base_cs = lower_type(ctx, &base)?;
        let temp = ctx.alloc_temp("v");
        let is_match = CsExpr::is_pattern(
            operand,
            CsPattern::Declaration {
                ty: base_cs,
                designator: temp.clone(),
            },
        );
        let value_cond = primitive_condition(ctx, CsExpr::ident(temp), &base);
        return Ok(CsExpr::binary(
            is_match,
            CsBinaryOp::LogicalAnd,
            value_cond,
        ));
    }

    // Runtime Union<T1..Tn>: bind, then inspect variant by variant.
    if arms.arms.len() <= MAX_UNION_ARITY {
        let operand = lower_expr(ctx, expr)?;
        let mut cs_args = Vec::with_capacity(arms.arms.len());
        for arm in &arms.arms {
            cs_args.push(lower_type(ctx, arm)?);
        }
        let union_ty = CsType::generic(runtime::UNION, cs_args);
        let temp = ctx.alloc_temp("u");
        let is_match = CsExpr::is_pattern(
            operand,
            CsPattern::Declaration {
                ty: union_ty,
                designator: temp.clone(),
            },
        );

        // u.Is1() ? truthy(u.As1()) : ... : truthy(u.AsN())
        let variant_condition = |ctx: &mut EmitterContext, index: usize, arm: &IrType| {
            let value = CsExpr::call(
                CsExpr::member(CsExpr::ident(temp.clone()), format!("As{}", index + 1)),
                vec![],
            );
            truthiness_of_union_variant(ctx, value, arm)
        };
        let last_index = arms.arms.len() - 1;
        let mut chain = variant_condition(ctx, last_index, &arms.arms[last_index]);
        for index in (0..last_index).rev() {
            let test = CsExpr::call(
                CsExpr::member(CsExpr::ident(temp.clone()), format!("Is{}", index + 1)),
                vec![],
            );
            let cond = variant_condition(ctx, index, &arms.arms[index]);
            chain = CsExpr::Conditional {
                condition: Box::new(test),
                when_true: Box::new(cond),
                when_false: Box::new(chain),
            };
        }
        return Ok(CsExpr::binary(
            is_match,
            CsBinaryOp::LogicalAnd,
            CsExpr::parens(chain),
        ));
    }

    // Beyond the runtime union width, fall through to the switch.
    let operand = lower_expr(ctx, expr)?;
    Ok(runtime_truthiness_switch(ctx, operand))
}

fn truthiness_of_union_variant(ctx: &mut EmitterContext, value: CsExpr, arm: &IrType) -> CsExpr {
    match arm {
        IrType::Boolean
        | IrType::String
        | IrType::Int
        | IrType::Char
        | IrType::Number
        | IrType::Literal { .. } => {
            let base = arm.literal_base().unwrap_or_else(|| arm.clone());
            primitive_condition(ctx, value, &base)
        }
        _ => runtime_truthiness_switch(ctx, value),
    }
}

/// The runtime-truthiness fallback: pattern-bind into `object __truthy{n}`
/// and dispatch over the CLR primitive tower with a `_ => true` catchall.
pub fn runtime_truthiness_switch(ctx: &mut EmitterContext, operand: CsExpr) -> CsExpr {
    let temp = ctx.alloc_temp("truthy");
    let is_match = CsExpr::is_pattern(
        operand,
        CsPattern::Declaration {
            ty: CsType::object(),
            designator: temp.clone(),
        },
    );

    let nonzero = |name: &str| {
        CsExpr::binary(
            CsExpr::ident(name),
            CsBinaryOp::NotEquals,
            CsExpr::int(0),
        )
    };
    let arm = |ty: CsType, designator: &str, result: CsExpr| CsSwitchExpressionArm {
        pattern: CsPattern::Declaration {
            ty,
            designator: designator.to_string(),
        },
        when_clause: None,
        result,
    };

    let half_ty = CsType::named("global::System.Half");
    let half_nonzero = CsExpr::binary(
        CsExpr::ident("__f16"),
        CsBinaryOp::NotEquals,
        CsExpr::cast(half_ty.clone(), CsExpr::int(0)),
    );
    let half_not_nan = CsExpr::not(CsExpr::call(
        CsExpr::member(CsExpr::ident("global::System.Half"), "IsNaN"),
        vec![CsExpr::ident("__f16")],
    ));
    let float_cond = CsExpr::binary(
        nonzero("__f32"),
        CsBinaryOp::LogicalAnd,
        CsExpr::not(CsExpr::call(
            CsExpr::member(CsExpr::literal("float"), "IsNaN"),
            vec![CsExpr::ident("__f32")],
        )),
    );
    let double_cond = CsExpr::binary(
        nonzero("__f64"),
        CsBinaryOp::LogicalAnd,
        CsExpr::not(CsExpr::call(
            CsExpr::member(CsExpr::literal("double"), "IsNaN"),
            vec![CsExpr::ident("__f64")],
        )),
    );

    let arms = vec![
        arm(CsType::bool(), "__b", CsExpr::ident("__b")),
        arm(
            CsType::string(),
            "__s",
            CsExpr::binary(
                CsExpr::member(CsExpr::ident("__s"), "Length"),
                CsBinaryOp::NotEquals,
                CsExpr::int(0),
            ),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::SByte),
            "__i8",
            nonzero("__i8"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::Byte),
            "__u8",
            nonzero("__u8"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::Short),
            "__i16",
            nonzero("__i16"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::UShort),
            "__u16",
            nonzero("__u16"),
        ),
        arm(CsType::int(), "__i32", nonzero("__i32")),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::UInt),
            "__u32",
            nonzero("__u32"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::Long),
            "__i64",
            nonzero("__i64"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::ULong),
            "__u64",
            nonzero("__u64"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::NInt),
            "__n",
            nonzero("__n"),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::NUInt),
            "__un",
            nonzero("__un"),
        ),
        arm(
            CsType::named("global::System.Int128"),
            "__i128",
            nonzero("__i128"),
        ),
        arm(
            CsType::named("global::System.UInt128"),
            "__u128",
            nonzero("__u128"),
        ),
        arm(
            half_ty,
            "__f16",
            CsExpr::binary(half_nonzero, CsBinaryOp::LogicalAnd, half_not_nan),
        ),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::Float),
            "__f32",
            float_cond,
        ),
        arm(CsType::double(), "__f64", double_cond),
        arm(
            CsType::Predefined(crate::cs_ast::CsPredefinedType::Decimal),
            "__m",
            nonzero("__m"),
        ),
        arm(
            CsType::char(),
            "__c",
            CsExpr::binary(
                CsExpr::ident("__c"),
                CsBinaryOp::NotEquals,
                CsExpr::literal("'\\0'"),
            ),
        ),
        CsSwitchExpressionArm {
            pattern: CsPattern::Discard,
            when_clause: None,
            result: CsExpr::bool(true),
        },
    ];

    let switch = CsExpr::SwitchExpression {
        operand: Box::new(CsExpr::ident(temp)),
        arms,
    };
    CsExpr::binary(is_match, CsBinaryOp::LogicalAnd, switch)
}
