use super::*;
use crate::emit_context::EmitterOptions;
use crate::printer::print_type;
use std::sync::Arc;

fn ctx() -> EmitterContext {
    EmitterContext::new(Arc::new(EmitterOptions::new("App")))
}

fn lower(ty: &IrType) -> String {
    print_type(&lower_type(&ctx(), ty).expect("type lowers"))
}

#[test]
fn primitives_map_to_keywords() {
    assert_eq!(lower(&IrType::Boolean), "bool");
    assert_eq!(lower(&IrType::Number), "double");
    assert_eq!(lower(&IrType::Int), "int");
    assert_eq!(lower(&IrType::String), "string");
    assert_eq!(lower(&IrType::Char), "char");
    assert_eq!(lower(&IrType::Void), "void");
}

#[test]
fn nullable_union_shapes_to_suffix() {
    let ty = IrType::Union {
        types: vec![IrType::String, IrType::Null],
    };
    assert_eq!(lower(&ty), "string?");

    let ty = IrType::Union {
        types: vec![IrType::Undefined, IrType::Number, IrType::Null],
    };
    assert_eq!(lower(&ty), "double?");
}

#[test]
fn literal_union_collapses_to_base_primitive() {
    let lit = |s: &str| IrType::Literal {
        value: tsonic_ir::IrLiteralValue::String(s.to_string()),
    };
    let ty = IrType::Union {
        types: vec![lit("a"), lit("b")],
    };
    assert_eq!(lower(&ty), "string");

    let ty = IrType::Union {
        types: vec![lit("a"), lit("b"), IrType::Null],
    };
    assert_eq!(lower(&ty), "string?");
}

#[test]
fn small_unions_use_runtime_union() {
    let ty = IrType::Union {
        types: vec![IrType::String, IrType::Number],
    };
    assert_eq!(lower(&ty), "global::Tsonic.Runtime.Union<string, double>");
}

#[test]
fn wide_unions_erase_to_object() {
    let arms: Vec<IrType> = (0..9)
        .map(|i| IrType::Reference {
            name: format!("T{i}"),
            type_arguments: vec![],
            resolved_clr_type: None,
        })
        .collect();
    let ty = IrType::Union { types: arms };
    assert_eq!(lower(&ty), "object");
}

#[test]
fn clr_primitive_references_are_coerced() {
    let ty = IrType::Reference {
        name: "Boolean".to_string(),
        type_arguments: vec![],
        resolved_clr_type: Some("System.Boolean".to_string()),
    };
    assert_eq!(lower(&ty), "bool");

    // Coercion happens before nullability shaping.
    let ty = IrType::Union {
        types: vec![
            IrType::Reference {
                name: "Int32".to_string(),
                type_arguments: vec![],
                resolved_clr_type: Some("System.Int32".to_string()),
            },
            IrType::Null,
        ],
    };
    assert_eq!(lower(&ty), "int?");
}

#[test]
fn function_types_reify_to_func_and_action() {
    let ty = IrType::Function {
        parameters: vec![IrType::Number, IrType::String],
        return_type: Box::new(IrType::Boolean),
    };
    assert_eq!(lower(&ty), "global::System.Func<double, string, bool>");

    let ty = IrType::Function {
        parameters: vec![IrType::Number],
        return_type: Box::new(IrType::Void),
    };
    assert_eq!(lower(&ty), "global::System.Action<double>");
}

#[test]
fn function_types_beyond_delegate_arity_are_an_ice() {
    let ty = IrType::Function {
        parameters: vec![IrType::Number; 17],
        return_type: Box::new(IrType::Void),
    };
    let err = lower_type(&ctx(), &ty).expect_err("no 17-parameter delegate exists");
    assert_eq!(
        err.code,
        tsonic_common::diagnostics::ice_codes::DELEGATE_ARITY
    );

    // 16 parameters is the widest representable delegate.
    let ty = IrType::Function {
        parameters: vec![IrType::Number; 16],
        return_type: Box::new(IrType::Void),
    };
    assert!(lower_type(&ctx(), &ty).is_ok());
}

#[test]
fn dictionary_types_use_generic_dictionary() {
    let ty = IrType::Dictionary {
        key: Box::new(IrType::String),
        value: Box::new(IrType::Number),
    };
    assert_eq!(
        lower(&ty),
        "global::System.Collections.Generic.Dictionary<string, double>"
    );
}

#[test]
fn alias_resolution_follows_chain() {
    let mut ctx = ctx();
    ctx.insert_local_type(
        "Id",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec![],
            ty: IrType::Reference {
                name: "Id2".to_string(),
                type_arguments: vec![],
                resolved_clr_type: None,
            },
        },
    );
    ctx.insert_local_type(
        "Id2",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec![],
            ty: IrType::String,
        },
    );
    let ty = IrType::Reference {
        name: "Id".to_string(),
        type_arguments: vec![],
        resolved_clr_type: None,
    };
    assert_eq!(print_type(&lower_type(&ctx, &ty).expect("lowers")), "string");
}

#[test]
fn alias_cycle_is_an_ice() {
    let mut ctx = ctx();
    ctx.insert_local_type(
        "A",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec![],
            ty: IrType::Reference {
                name: "B".to_string(),
                type_arguments: vec![],
                resolved_clr_type: None,
            },
        },
    );
    ctx.insert_local_type(
        "B",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec![],
            ty: IrType::Reference {
                name: "A".to_string(),
                type_arguments: vec![],
                resolved_clr_type: None,
            },
        },
    );
    let ty = IrType::Reference {
        name: "A".to_string(),
        type_arguments: vec![],
        resolved_clr_type: None,
    };
    let err = lower_type(&ctx, &ty).expect_err("cycle detected");
    assert_eq!(err.code, tsonic_common::diagnostics::ice_codes::ALIAS_CYCLE);
}

#[test]
fn structural_alias_reference_targets_generated_class() {
    let mut ctx = ctx();
    ctx.insert_local_type(
        "Point",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec![],
            ty: IrType::Object { members: vec![] },
        },
    );
    let ty = IrType::Reference {
        name: "Point".to_string(),
        type_arguments: vec![],
        resolved_clr_type: None,
    };
    assert_eq!(
        print_type(&lower_type(&ctx, &ty).expect("lowers")),
        "Point__Alias"
    );
}

#[test]
fn generic_alias_substitutes_arguments() {
    let mut ctx = ctx();
    ctx.insert_local_type(
        "Boxed",
        LocalTypeInfo::TypeAlias {
            type_parameters: vec!["T".to_string()],
            ty: IrType::Array {
                element: Box::new(IrType::TypeParameter {
                    name: "T".to_string(),
                }),
            },
        },
    );
    let ty = IrType::Reference {
        name: "Boxed".to_string(),
        type_arguments: vec![IrType::Number],
        resolved_clr_type: None,
    };
    assert_eq!(print_type(&lower_type(&ctx, &ty).expect("lowers")), "double[]");
}

#[test]
fn type_parameters_map_through_context() {
    let mut ctx = ctx();
    ctx.declare_type_parameter("T");
    let snap = ctx.enter_scope();
    let renamed = ctx.declare_type_parameter("T");
    assert_eq!(renamed, "T1");
    let ty = IrType::TypeParameter {
        name: "T".to_string(),
    };
    assert_eq!(print_type(&lower_type(&ctx, &ty).expect("lowers")), "T1");
    ctx.leave_scope(snap);
}
