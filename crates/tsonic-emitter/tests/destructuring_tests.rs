//! Destructuring lowering: locals, rests, defaults, objects, and the
//! assignment-expression form.

use std::sync::Arc;

use tsonic_emitter::lowering::patterns::{
    lower_assignment_destructuring, lower_declaration_destructuring, lower_parameter_pattern,
};
use tsonic_emitter::printer::{print_expression, print_statement};
use tsonic_emitter::{EmitterContext, EmitterOptions};
use tsonic_ir::{
    IrArrayPatternElement, IrExpr, IrExprKind, IrObjectPatternProperty, IrObjectRest, IrPattern,
    IrPropertySignature, IrType,
};

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

fn number_array(name: &str) -> IrExpr {
    typed_ident(
        name,
        IrType::Array {
            element: Box::new(IrType::Number),
        },
    )
}

fn string_array(name: &str) -> IrExpr {
    typed_ident(
        name,
        IrType::Array {
            element: Box::new(IrType::String),
        },
    )
}

fn element(pattern: IrPattern) -> Option<IrArrayPatternElement> {
    Some(IrArrayPatternElement {
        pattern,
        default: None,
        rest: false,
    })
}

fn print_all(stmts: &[tsonic_emitter::cs_ast::CsStmt]) -> String {
    stmts.iter().map(|s| print_statement(s, 4)).collect()
}

#[test]
fn array_pattern_extracts_by_index() {
    // const [a, b] = arr; with arr: number[]
    let pattern = IrPattern::Array {
        elements: vec![element(IrPattern::ident("a")), element(IrPattern::ident("b"))],
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(&mut ctx, &pattern, &number_array("arr"), None)
        .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("var __arr0 = arr;"));
    assert!(out.contains("double a = __arr0[0];"));
    assert!(out.contains("double b = __arr0[1];"));
}

#[test]
fn holes_advance_the_index_without_binding() {
    // const [, second] = arr;
    let pattern = IrPattern::Array {
        elements: vec![None, element(IrPattern::ident("second"))],
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(&mut ctx, &pattern, &number_array("arr"), None)
        .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("double second = __arr0[1];"));
    assert!(!out.contains("__arr0[0]"));
}

#[test]
fn rest_element_slices_through_the_runtime() {
    // const [first, ...rest] = items; with items: string[]
    let pattern = IrPattern::Array {
        elements: vec![
            element(IrPattern::ident("first")),
            Some(IrArrayPatternElement {
                pattern: IrPattern::ident("rest"),
                default: None,
                rest: true,
            }),
        ],
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(&mut ctx, &pattern, &string_array("items"), None)
        .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("string first = __arr0[0];"));
    assert!(out.contains(
        "string[] rest = global::Tsonic.Runtime.ArrayHelpers.Slice(__arr0, 1);"
    ));
}

#[test]
fn defaults_apply_with_coalesce() {
    let pattern = IrPattern::Array {
        elements: vec![Some(IrArrayPatternElement {
            pattern: IrPattern::ident("a"),
            default: Some(IrExpr::number(5.0)),
            rest: false,
        })],
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(&mut ctx, &pattern, &number_array("arr"), None)
        .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("double a = __arr0[0] ?? 5.0;"));
}

#[test]
fn nested_patterns_allocate_fresh_temps() {
    // const [[x]] = grid; with grid: number[][]
    let inner = IrPattern::Array {
        elements: vec![element(IrPattern::ident("x"))],
    };
    let pattern = IrPattern::Array {
        elements: vec![element(inner)],
    };
    let grid = typed_ident(
        "grid",
        IrType::Array {
            element: Box::new(IrType::Array {
                element: Box::new(IrType::Number),
            }),
        },
    );
    let mut ctx = ctx();
    let stmts =
        lower_declaration_destructuring(&mut ctx, &pattern, &grid, None).expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("var __arr0 = grid;"));
    assert!(out.contains("var __arr1 = __arr0[0];"));
    assert!(out.contains("double x = __arr1[0];"));
}

fn point_type() -> IrType {
    IrType::Object {
        members: vec![
            IrPropertySignature {
                name: "x".to_string(),
                ty: IrType::Number,
                optional: false,
                readonly: false,
            },
            IrPropertySignature {
                name: "y".to_string(),
                ty: IrType::Number,
                optional: false,
                readonly: false,
            },
        ],
    }
}

#[test]
fn object_pattern_reads_properties() {
    // const { x, y } = p;
    let pattern = IrPattern::Object {
        properties: vec![
            IrObjectPatternProperty {
                property: "x".to_string(),
                pattern: IrPattern::ident("x"),
                default: None,
            },
            IrObjectPatternProperty {
                property: "y".to_string(),
                pattern: IrPattern::ident("y"),
                default: None,
            },
        ],
        rest: None,
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(
        &mut ctx,
        &pattern,
        &typed_ident("p", point_type()),
        None,
    )
    .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("var __obj0 = p;"));
    assert!(out.contains("double x = __obj0.x;"));
    assert!(out.contains("double y = __obj0.y;"));
}

#[test]
fn object_rest_requires_the_synthesized_shape() {
    let pattern = IrPattern::Object {
        properties: vec![IrObjectPatternProperty {
            property: "x".to_string(),
            pattern: IrPattern::ident("x"),
            default: None,
        }],
        rest: Some(IrObjectRest {
            name: "others".to_string(),
            shape_members: None,
            synth_type_name: None,
        }),
    };
    let mut ctx = ctx();
    let err = lower_declaration_destructuring(
        &mut ctx,
        &pattern,
        &typed_ident("p", point_type()),
        None,
    )
    .expect_err("missing shape is a frontend contract violation");
    assert_eq!(err.code, 9201);
}

#[test]
fn object_rest_builds_the_synthetic_type() {
    let pattern = IrPattern::Object {
        properties: vec![IrObjectPatternProperty {
            property: "x".to_string(),
            pattern: IrPattern::ident("x"),
            default: None,
        }],
        rest: Some(IrObjectRest {
            name: "others".to_string(),
            shape_members: Some(vec![IrPropertySignature {
                name: "y".to_string(),
                ty: IrType::Number,
                optional: false,
                readonly: false,
            }]),
            synth_type_name: Some("__PointRest1".to_string()),
        }),
    };
    let mut ctx = ctx();
    let stmts = lower_declaration_destructuring(
        &mut ctx,
        &pattern,
        &typed_ident("p", point_type()),
        None,
    )
    .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("__PointRest1 others = new __PointRest1 { y = __obj0.y };"));
}

#[test]
fn assignment_form_returns_the_rhs_value() {
    // [a, b] = arr as an expression.
    let pattern = IrPattern::Array {
        elements: vec![element(IrPattern::ident("a")), element(IrPattern::ident("b"))],
    };
    let mut ctx = ctx();
    ctx.declare_local("a");
    ctx.declare_local("b");
    let expr = lower_assignment_destructuring(&mut ctx, &pattern, &number_array("arr"))
        .expect("lowers");
    let out = print_expression(&expr, 4);
    assert!(out.starts_with("((global::System.Func<double[]>)(("));
    assert!(out.contains("double[] __assign0 = arr;"));
    assert!(out.contains("a = __arr1[0];"));
    assert!(out.contains("b = __arr1[1];"));
    assert!(out.contains("return __assign0;"));
    assert!(out.ends_with("}))()"));
}

#[test]
fn parameter_patterns_expand_from_the_synthetic_name() {
    let pattern = IrPattern::Object {
        properties: vec![IrObjectPatternProperty {
            property: "x".to_string(),
            pattern: IrPattern::ident("x"),
            default: None,
        }],
        rest: None,
    };
    let mut ctx = ctx();
    let stmts = lower_parameter_pattern(&mut ctx, &pattern, "__param0", Some(&point_type()))
        .expect("lowers");
    let out = print_all(&stmts);
    assert!(out.contains("var __obj0 = __param0;"));
    assert!(out.contains("double x = __obj0.x;"));
}

#[test]
fn temp_names_never_collide_within_one_body() {
    let pattern_a = IrPattern::Array {
        elements: vec![element(IrPattern::ident("a"))],
    };
    let pattern_b = IrPattern::Array {
        elements: vec![element(IrPattern::ident("b"))],
    };
    let mut ctx = ctx();
    let first = lower_declaration_destructuring(&mut ctx, &pattern_a, &number_array("xs"), None)
        .expect("lowers");
    let second = lower_declaration_destructuring(&mut ctx, &pattern_b, &number_array("ys"), None)
        .expect("lowers");
    let out_first = print_all(&first);
    let out_second = print_all(&second);
    assert!(out_first.contains("__arr0"));
    assert!(out_second.contains("__arr1"));
    assert!(!out_second.contains("__arr0"));
}
