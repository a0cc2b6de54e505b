//! Boolean-context lowering: the truthiness decision table.

use std::sync::Arc;

use tsonic_emitter::lowering::truthiness::lower_condition;
use tsonic_emitter::printer::print_expression;
use tsonic_emitter::{EmitterContext, EmitterOptions};
use tsonic_ir::{IrBinaryOp, IrExpr, IrExprKind, IrLiteralValue, IrLogicalOp, IrType};

fn ctx() -> EmitterContext {
    EmitterContext::new(Arc::new(EmitterOptions::new("App")))
}

fn typed_ident(name: &str, ty: IrType) -> IrExpr {
    IrExpr::with_type(
        IrExprKind::Identifier {
            name: name.to_string(),
        },
        ty,
    )
}

fn lower(expr: &IrExpr) -> String {
    let mut ctx = ctx();
    print_expression(&lower_condition(&mut ctx, expr).expect("condition lowers"), 4)
}

#[test]
fn literals_fold_at_lowering_time() {
    assert_eq!(lower(&IrExpr::number(0.0)), "false");
    assert_eq!(lower(&IrExpr::number(2.0)), "true");
    assert_eq!(lower(&IrExpr::string("")), "false");
    assert_eq!(lower(&IrExpr::string("x")), "true");
    assert_eq!(lower(&IrExpr::boolean(true)), "true");
    assert_eq!(lower(&IrExpr::null()), "false");
}

#[test]
fn booleans_pass_through() {
    assert_eq!(lower(&typed_ident("flag", IrType::Boolean)), "flag");
}

#[test]
fn comparisons_pass_through() {
    let cmp = IrExpr::binary(
        typed_ident("a", IrType::Number),
        IrBinaryOp::Less,
        typed_ident("b", IrType::Number),
    );
    assert_eq!(lower(&cmp), "a < b");
}

#[test]
fn string_rule_uses_is_null_or_empty() {
    assert_eq!(
        lower(&typed_ident("x", IrType::String)),
        "!string.IsNullOrEmpty(x)"
    );
}

#[test]
fn int_rule_compares_to_zero() {
    assert_eq!(lower(&typed_ident("x", IrType::Int)), "x != 0");
}

#[test]
fn char_rule_compares_to_nul() {
    assert_eq!(lower(&typed_ident("c", IrType::Char)), "c != '\\0'");
}

#[test]
fn number_rule_binds_a_pattern_variable() {
    assert_eq!(
        lower(&typed_ident("x", IrType::Number)),
        "(x is double __tsonic_truthy_num_1 && __tsonic_truthy_num_1 != 0 && \
         !double.IsNaN(__tsonic_truthy_num_1))"
    );
}

#[test]
fn missing_type_falls_back_to_runtime_switch() {
    let out = lower(&IrExpr::ident("mystery"));
    assert!(out.contains("mystery is object __truthy0"));
    assert!(out.contains("__truthy0 switch"));
    assert!(out.contains("bool __b => __b"));
    assert!(out.contains("string __s => __s.Length != 0"));
    assert!(out.contains("double __f64 => __f64 != 0 && !double.IsNaN(__f64)"));
    assert!(out.contains("char __c => __c != '\\0'"));
    assert!(out.contains("_ => true"));
    // Never the boxed-value-type miscompiling null check.
    assert!(!out.contains("mystery != null"));
}

#[test]
fn runtime_switch_covers_the_numeric_tower() {
    let out = lower(&typed_ident("x", IrType::Unknown));
    for needle in [
        "sbyte", "byte", "short", "ushort", "uint", "long", "ulong", "nint", "nuint",
        "global::System.Int128", "global::System.UInt128", "global::System.Half", "float",
        "decimal",
    ] {
        assert!(out.contains(needle), "missing {needle} in: {out}");
    }
}

#[test]
fn non_primitive_reference_uses_runtime_switch() {
    let ty = IrType::Reference {
        name: "Widget".to_string(),
        type_arguments: vec![],
        resolved_clr_type: None,
    };
    let out = lower(&typed_ident("w", ty));
    assert!(out.contains("w is object __truthy0"));
    assert!(!out.contains("w != null"));
}

#[test]
fn nullable_single_arm_union_matches_then_recurses() {
    let ty = IrType::Union {
        types: vec![IrType::String, IrType::Null],
    };
    let out = lower(&typed_ident("s", ty));
    assert_eq!(out, "s is string __v0 && !string.IsNullOrEmpty(__v0)");
}

#[test]
fn literal_union_applies_base_primitive_rule() {
    let lit = |s: &str| IrType::Literal {
        value: IrLiteralValue::String(s.to_string()),
    };
    let ty = IrType::Union {
        types: vec![lit("a"), lit("b")],
    };
    assert_eq!(lower(&typed_ident("s", ty)), "!string.IsNullOrEmpty(s)");
}

#[test]
fn runtime_union_dispatches_through_is_as_chain() {
    let ty = IrType::Union {
        types: vec![IrType::String, IrType::Number],
    };
    let out = lower(&typed_ident("u", ty));
    assert!(out.contains("u is global::Tsonic.Runtime.Union<string, double> __u0"));
    assert!(out.contains("__u0.Is1()"));
    assert!(out.contains("__u0.As1()"));
    assert!(out.contains("__u0.As2()"));
    // Last variant is the chain's fallback, so no Is2 test is emitted.
    assert!(!out.contains("Is2()"));
}

#[test]
fn wide_union_falls_back_to_runtime_switch() {
    let arms: Vec<IrType> = (0..9)
        .map(|i| IrType::Reference {
            name: format!("T{i}"),
            type_arguments: vec![],
            resolved_clr_type: None,
        })
        .collect();
    let out = lower(&typed_ident("u", IrType::Union { types: arms }));
    assert!(out.contains("__truthy0 switch"));
}

#[test]
fn logical_operators_recurse_per_operand() {
    let expr = IrExpr::logical(
        typed_ident("s", IrType::String),
        IrLogicalOp::And,
        typed_ident("n", IrType::Int),
    );
    assert_eq!(lower(&expr), "!string.IsNullOrEmpty(s) && n != 0");
}

#[test]
fn not_negates_the_condition() {
    let expr = IrExpr::new(IrExprKind::Unary {
        op: tsonic_ir::IrUnaryOp::Not,
        operand: Box::new(typed_ident("s", IrType::String)),
    });
    assert_eq!(lower(&expr), "!!string.IsNullOrEmpty(s)");
}

#[test]
fn operands_evaluate_exactly_once() {
    // A call operand must appear exactly once in the lowered text.
    let call = IrExpr::with_type(
        IrExprKind::Call {
            callee: Box::new(IrExpr::ident("f")),
            arguments: vec![],
            type_arguments: vec![],
            optional: false,
        },
        IrType::Number,
    );
    let out = lower(&call);
    assert_eq!(out.matches("f()").count(), 1, "double evaluation in: {out}");

    let call = IrExpr::new(IrExprKind::Call {
        callee: Box::new(IrExpr::ident("g")),
        arguments: vec![],
        type_arguments: vec![],
        optional: false,
    });
    let out = lower(&call);
    assert_eq!(out.matches("g()").count(), 1, "double evaluation in: {out}");
}
