//! Printer rendering: precedence, escaping, interpolation, layout.

use tsonic_emitter::cs_ast::{
    CsBinaryOp, CsExpr, CsInterpolationPart, CsLambdaBody, CsLambdaParam, CsPattern, CsPrefixOp,
    CsStmt, CsType,
};
use tsonic_emitter::printer::{print_expression, print_statement, print_type};

fn expr(e: &CsExpr) -> String {
    print_expression(e, 4)
}

#[test]
fn binary_children_wrap_only_on_lower_precedence() {
    // (a + b) * c needs parens on the left child.
    let sum = CsExpr::binary(CsExpr::ident("a"), CsBinaryOp::Add, CsExpr::ident("b"));
    let product = CsExpr::binary(sum, CsBinaryOp::Multiply, CsExpr::ident("c"));
    assert_eq!(expr(&product), "(a + b) * c");

    // a + b * c does not.
    let product = CsExpr::binary(CsExpr::ident("b"), CsBinaryOp::Multiply, CsExpr::ident("c"));
    let sum = CsExpr::binary(CsExpr::ident("a"), CsBinaryOp::Add, product);
    assert_eq!(expr(&sum), "a + b * c");
}

#[test]
fn same_precedence_right_operand_wraps_for_left_associative_ops() {
    // a - (b - c) keeps the parens; (a - b) - c drops them.
    let inner = CsExpr::binary(CsExpr::ident("b"), CsBinaryOp::Subtract, CsExpr::ident("c"));
    let outer = CsExpr::binary(CsExpr::ident("a"), CsBinaryOp::Subtract, inner);
    assert_eq!(expr(&outer), "a - (b - c)");

    let inner = CsExpr::binary(CsExpr::ident("a"), CsBinaryOp::Subtract, CsExpr::ident("b"));
    let outer = CsExpr::binary(inner, CsBinaryOp::Subtract, CsExpr::ident("c"));
    assert_eq!(expr(&outer), "a - b - c");
}

#[test]
fn assignment_right_operand_stays_bare() {
    let inner = CsExpr::assign(CsExpr::ident("b"), CsExpr::ident("c"));
    let outer = CsExpr::assign(CsExpr::ident("a"), inner);
    assert_eq!(expr(&outer), "a = b = c");
}

#[test]
fn logical_mix_parenthesizes_or_under_and() {
    let or = CsExpr::binary(CsExpr::ident("a"), CsBinaryOp::LogicalOr, CsExpr::ident("b"));
    let and = CsExpr::binary(or, CsBinaryOp::LogicalAnd, CsExpr::ident("c"));
    assert_eq!(expr(&and), "(a || b) && c");
}

#[test]
fn cast_of_negative_operand_wraps() {
    let negated = CsExpr::PrefixUnary {
        op: CsPrefixOp::Minus,
        operand: Box::new(CsExpr::ident("x")),
    };
    let cast = CsExpr::cast(CsType::int(), negated);
    assert_eq!(expr(&cast), "(int)(-x)");
}

#[test]
fn member_access_on_non_primary_wraps_receiver() {
    let cast = CsExpr::cast(CsType::named("Foo"), CsExpr::ident("x"));
    let access = CsExpr::member(cast, "Bar");
    assert_eq!(expr(&access), "((Foo)x).Bar");
}

#[test]
fn conditional_member_access_uses_question_dot() {
    let access = CsExpr::conditional_member(CsExpr::ident("a"), "b");
    assert_eq!(expr(&access), "a?.b");
}

#[test]
fn reserved_identifiers_are_escaped() {
    assert_eq!(expr(&CsExpr::ident("class")), "@class");
    let access = CsExpr::member(CsExpr::ident("a"), "event");
    assert_eq!(expr(&access), "a.@event");
}

#[test]
fn global_qualified_names_pass_through() {
    let call = CsExpr::call(
        CsExpr::ident("global::Tsonic.Runtime.ArrayHelpers.Slice"),
        vec![CsExpr::ident("xs"), CsExpr::literal("1")],
    );
    assert_eq!(expr(&call), "global::Tsonic.Runtime.ArrayHelpers.Slice(xs, 1)");
}

#[test]
fn interpolation_with_colon_is_wrapped() {
    let ternary = CsExpr::Conditional {
        condition: Box::new(CsExpr::ident("b")),
        when_true: Box::new(CsExpr::literal("1")),
        when_false: Box::new(CsExpr::literal("2")),
    };
    let interpolated = CsExpr::InterpolatedString(vec![
        CsInterpolationPart::Text("v=".to_string()),
        CsInterpolationPart::Expression {
            expression: ternary,
            format: None,
        },
    ]);
    assert_eq!(expr(&interpolated), "$\"v={(b ? 1 : 2)}\"");
}

#[test]
fn interpolation_without_colon_stays_bare() {
    let interpolated = CsExpr::InterpolatedString(vec![
        CsInterpolationPart::Text("v=".to_string()),
        CsInterpolationPart::Expression {
            expression: CsExpr::ident("x"),
            format: None,
        },
    ]);
    assert_eq!(expr(&interpolated), "$\"v={x}\"");
}

#[test]
fn single_parameter_lambda_emits_bare() {
    let lambda = CsExpr::Lambda {
        parameters: vec![CsLambdaParam {
            name: "x".to_string(),
            ty: None,
        }],
        body: CsLambdaBody::Expression(Box::new(CsExpr::ident("x"))),
        is_async: false,
    };
    assert_eq!(expr(&lambda), "x => x");
}

#[test]
fn annotated_lambda_parameters_are_parenthesized() {
    let lambda = CsExpr::Lambda {
        parameters: vec![CsLambdaParam {
            name: "x".to_string(),
            ty: Some(CsType::double()),
        }],
        body: CsLambdaBody::Expression(Box::new(CsExpr::ident("x"))),
        is_async: false,
    };
    assert_eq!(expr(&lambda), "(double x) => x");
}

#[test]
fn iife_cast_shape_round_trips() {
    // ((Func<double>)(() => { return x; }))()
    let lambda = CsExpr::lambda0(CsLambdaBody::Block(vec![CsStmt::ret(Some(CsExpr::ident(
        "x",
    )))]));
    let cast = CsExpr::cast(
        CsType::generic("global::System.Func", vec![CsType::double()]),
        CsExpr::parens(lambda),
    );
    let call = CsExpr::call(CsExpr::parens(cast), vec![]);
    let printed = expr(&call);
    assert!(printed.starts_with("((global::System.Func<double>)(() =>"));
    assert!(printed.ends_with("}))()"));
}

#[test]
fn is_pattern_prints_declaration_designator() {
    let is = CsExpr::is_pattern(
        CsExpr::ident("x"),
        CsPattern::Declaration {
            ty: CsType::double(),
            designator: "t".to_string(),
        },
    );
    assert_eq!(expr(&is), "x is double t");
}

#[test]
fn nullable_and_array_types_print() {
    assert_eq!(print_type(&CsType::nullable(CsType::string())), "string?");
    assert_eq!(print_type(&CsType::array(CsType::double())), "double[]");
    assert_eq!(
        print_type(&CsType::generic(
            "global::Tsonic.Runtime.Union",
            vec![CsType::string(), CsType::double()]
        )),
        "global::Tsonic.Runtime.Union<string, double>"
    );
}

#[test]
fn statements_nest_with_four_space_indent() {
    let stmt = CsStmt::If {
        condition: CsExpr::ident("flag"),
        then_branch: Box::new(CsStmt::Block(vec![CsStmt::ret(None)])),
        else_branch: None,
    };
    assert_eq!(print_statement(&stmt, 4), "if (flag)\n{\n    return;\n}\n");
}

#[test]
fn two_space_indent_is_respected() {
    let stmt = CsStmt::Block(vec![CsStmt::Break]);
    assert_eq!(print_statement(&stmt, 2), "{\n  break;\n}\n");
}

#[test]
fn foreach_prints_type_and_in() {
    let stmt = CsStmt::Foreach {
        ty: CsType::string(),
        identifier: "item".to_string(),
        expression: CsExpr::ident("items"),
        body: Box::new(CsStmt::Block(vec![])),
        is_await: false,
    };
    assert_eq!(
        print_statement(&stmt, 4),
        "foreach (string item in items)\n{\n}\n"
    );
}

#[test]
fn printing_is_deterministic() {
    let stmt = CsStmt::While {
        condition: CsExpr::bool(true),
        body: Box::new(CsStmt::Block(vec![CsStmt::Continue])),
    };
    assert_eq!(print_statement(&stmt, 4), print_statement(&stmt, 4));
}
