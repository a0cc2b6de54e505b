//! Declaration lowering: classes, interfaces, aliases, enums.

use std::sync::Arc;

use tsonic_emitter::lowering::declarations::{
    lower_class, lower_enum, lower_interface, lower_type_alias,
};
use tsonic_emitter::cs_ast::CsNamespaceMember;
use tsonic_emitter::printer::print_type_declaration;
use tsonic_emitter::{EmitterContext, EmitterOptions};
use tsonic_ir::{
    IrClass, IrClassMember, IrEnum, IrEnumMember, IrExpr, IrInterface, IrInterfaceMember,
    IrParameter, IrPattern, IrPropertySignature, IrStatement, IrType, IrTypeAlias,
    IrTypeParameter, IrVisibility,
};

fn ctx() -> EmitterContext {
    EmitterContext::new(Arc::new(EmitterOptions::new("App")))
}

#[test]
fn class_lowering_produces_members_in_order() {
    let class = IrClass {
        name: "Point".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![
            IrClassMember::Field {
                name: "x".to_string(),
                ty: Some(IrType::Number),
                initializer: None,
                is_static: false,
                is_readonly: false,
                visibility: IrVisibility::Public,
            },
            IrClassMember::Constructor {
                parameters: vec![IrParameter::named("x", IrType::Number)],
                body: vec![IrStatement::expr(IrExpr::assign(
                    IrExpr::member(
                        IrExpr::new(tsonic_ir::IrExprKind::This),
                        "x",
                    ),
                    IrExpr::ident("x"),
                ))],
                visibility: IrVisibility::Public,
            },
            IrClassMember::Method {
                name: "norm".to_string(),
                type_parameters: vec![],
                parameters: vec![],
                return_type: Some(IrType::Number),
                body: vec![IrStatement::ret(Some(IrExpr::member(
                    IrExpr::new(tsonic_ir::IrExprKind::This),
                    "x",
                )))],
                is_static: false,
                is_async: false,
                is_generator: false,
                is_abstract: false,
                visibility: IrVisibility::Public,
            },
        ],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.contains("public class Point"));
    assert!(out.contains("public double x;"));
    assert!(out.contains("public Point(double x)"));
    assert!(out.contains("this.x = x;"));
    assert!(out.contains("public double norm()"));
    assert!(out.contains("return this.x;"));

    let x_field = out.find("public double x;").expect("field");
    let ctor = out.find("public Point(").expect("ctor");
    let method = out.find("public double norm()").expect("method");
    assert!(x_field < ctor && ctor < method);
}

#[test]
fn leading_super_call_becomes_base_initializer() {
    let class = IrClass {
        name: "Derived".to_string(),
        type_parameters: vec![],
        extends: Some(IrType::Reference {
            name: "Base".to_string(),
            type_arguments: vec![],
            resolved_clr_type: None,
        }),
        implements: vec![],
        members: vec![IrClassMember::Constructor {
            parameters: vec![IrParameter::named("n", IrType::Number)],
            body: vec![IrStatement::expr(IrExpr::call(
                IrExpr::new(tsonic_ir::IrExprKind::Super),
                vec![IrExpr::ident("n")],
            ))],
            visibility: IrVisibility::Public,
        }],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.contains("public class Derived : Base"));
    assert!(out.contains("public Derived(double n) : base(n)"));
}

#[test]
fn duplicate_implements_arms_are_deduplicated() {
    let iface = IrType::Reference {
        name: "IShape".to_string(),
        type_arguments: vec![],
        resolved_clr_type: None,
    };
    let class = IrClass {
        name: "Square".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![iface.clone(), iface],
        members: vec![],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert_eq!(out.matches("IShape").count(), 1);
}

#[test]
fn getter_setter_pairs_merge_into_one_property() {
    let class = IrClass {
        name: "Box".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![
            IrClassMember::Field {
                name: "__size".to_string(),
                ty: Some(IrType::Number),
                initializer: None,
                is_static: false,
                is_readonly: false,
                visibility: IrVisibility::Private,
            },
            IrClassMember::Getter {
                name: "size".to_string(),
                return_type: Some(IrType::Number),
                body: vec![IrStatement::ret(Some(IrExpr::member(
                    IrExpr::new(tsonic_ir::IrExprKind::This),
                    "__size",
                )))],
                is_static: false,
                visibility: IrVisibility::Public,
            },
            IrClassMember::Setter {
                name: "size".to_string(),
                parameter: IrParameter::named("value", IrType::Number),
                body: vec![IrStatement::expr(IrExpr::assign(
                    IrExpr::member(
                        IrExpr::new(tsonic_ir::IrExprKind::This),
                        "__size",
                    ),
                    IrExpr::ident("value"),
                ))],
                is_static: false,
                visibility: IrVisibility::Public,
            },
        ],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert_eq!(out.matches("public double size").count(), 1);
    assert!(out.contains("get"));
    assert!(out.contains("set"));
    assert!(out.contains("return this.__size;"));
}

#[test]
fn self_type_constraint_is_wired() {
    let class = IrClass {
        name: "Builder".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_abstract: false,
        exported: true,
        self_type_parameter: Some("TSelf".to_string()),
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.contains("public class Builder<TSelf> where TSelf : Builder<TSelf>"));
}

#[test]
fn non_exported_types_emit_internal() {
    let class = IrClass {
        name: "Hidden".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_abstract: false,
        exported: false,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.starts_with("internal class Hidden"));
}

#[test]
fn public_local_types_override_internal() {
    let class = IrClass {
        name: "Shared".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![],
        is_abstract: false,
        exported: false,
        self_type_parameter: None,
    };
    let mut options = EmitterOptions::new("App");
    options.public_local_types.insert("Shared".to_string());
    let mut ctx = EmitterContext::new(Arc::new(options));
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.starts_with("public class Shared"));
}

#[test]
fn interface_members_are_signatures() {
    let interface = IrInterface {
        name: "IShape".to_string(),
        type_parameters: vec![],
        extends: vec![],
        members: vec![
            IrInterfaceMember::Property {
                name: "area".to_string(),
                ty: IrType::Number,
                optional: false,
                readonly: true,
            },
            IrInterfaceMember::Property {
                name: "label".to_string(),
                ty: IrType::String,
                optional: true,
                readonly: false,
            },
            IrInterfaceMember::Method {
                name: "scale".to_string(),
                type_parameters: vec![],
                parameters: vec![IrParameter::named("factor", IrType::Number)],
                return_type: Some(IrType::Void),
            },
        ],
        exported: true,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_interface(&mut ctx, &interface).expect("lowers"), 4);
    assert!(out.contains("public interface IShape"));
    assert!(out.contains("double area { get; }"));
    assert!(out.contains("string? label { get; set; }"));
    assert!(out.contains("void scale(double factor);"));
}

#[test]
fn structural_alias_becomes_a_sealed_class() {
    let alias = IrTypeAlias {
        name: "Point".to_string(),
        type_parameters: vec![],
        ty: IrType::Object {
            members: vec![
                IrPropertySignature {
                    name: "x".to_string(),
                    ty: IrType::Number,
                    optional: false,
                    readonly: true,
                },
                IrPropertySignature {
                    name: "tag".to_string(),
                    ty: IrType::String,
                    optional: true,
                    readonly: false,
                },
            ],
        },
        as_struct: false,
        exported: true,
    };
    let mut ctx = ctx();
    let member = lower_type_alias(&mut ctx, &alias).expect("lowers");
    let CsNamespaceMember::Type(decl) = member else {
        panic!("expected a type declaration");
    };
    let out = print_type_declaration(&decl, 4);
    assert!(out.contains("public sealed class Point__Alias"));
    assert!(out.contains("public required double x { get; init; }"));
    assert!(out.contains("public string? tag { get; set; }"));
}

#[test]
fn non_structural_alias_survives_as_a_comment() {
    let alias = IrTypeAlias {
        name: "Id".to_string(),
        type_parameters: vec![],
        ty: IrType::String,
        as_struct: false,
        exported: true,
    };
    let mut ctx = ctx();
    let member = lower_type_alias(&mut ctx, &alias).expect("lowers");
    let CsNamespaceMember::Comment(text) = member else {
        panic!("expected a comment");
    };
    assert_eq!(text, "type Id = string");
}

#[test]
fn enums_keep_explicit_values() {
    let decl = IrEnum {
        name: "Color".to_string(),
        members: vec![
            IrEnumMember {
                name: "Red".to_string(),
                value: None,
            },
            IrEnumMember {
                name: "Green".to_string(),
                value: Some(4.0),
            },
        ],
        exported: true,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_enum(&mut ctx, &decl).expect("lowers"), 4);
    assert!(out.contains("public enum Color"));
    assert!(out.contains("Red,"));
    assert!(out.contains("Green = 4"));
}

#[test]
fn non_integral_enum_member_is_an_ice() {
    let decl = IrEnum {
        name: "Bad".to_string(),
        members: vec![IrEnumMember {
            name: "Half".to_string(),
            value: Some(0.5),
        }],
        exported: true,
    };
    let mut ctx = ctx();
    let err = lower_enum(&mut ctx, &decl).expect_err("non-integral value");
    assert_eq!(err.code, 9301);
}

#[test]
fn generic_class_declares_type_parameters_with_constraints() {
    let class = IrClass {
        name: "Container".to_string(),
        type_parameters: vec![IrTypeParameter {
            name: "T".to_string(),
            constraint: Some(IrType::Reference {
                name: "IShape".to_string(),
                type_arguments: vec![],
                resolved_clr_type: None,
            }),
        }],
        extends: None,
        implements: vec![],
        members: vec![IrClassMember::Field {
            name: "item".to_string(),
            ty: Some(IrType::TypeParameter {
                name: "T".to_string(),
            }),
            initializer: None,
            is_static: false,
            is_readonly: false,
            visibility: IrVisibility::Public,
        }],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.contains("public class Container<T> where T : IShape"));
    assert!(out.contains("public T item;"));
}

#[test]
fn parameter_destructuring_keeps_synthetic_signature_names() {
    let class = IrClass {
        name: "Reader".to_string(),
        type_parameters: vec![],
        extends: None,
        implements: vec![],
        members: vec![IrClassMember::Method {
            name: "consume".to_string(),
            type_parameters: vec![],
            parameters: vec![IrParameter {
                pattern: IrPattern::Object {
                    properties: vec![tsonic_ir::IrObjectPatternProperty {
                        property: "x".to_string(),
                        pattern: IrPattern::ident("x"),
                        default: None,
                    }],
                    rest: None,
                },
                ty: Some(IrType::Object {
                    members: vec![IrPropertySignature {
                        name: "x".to_string(),
                        ty: IrType::Number,
                        optional: false,
                        readonly: false,
                    }],
                }),
                optional: false,
                default: None,
                rest: false,
            }],
            return_type: Some(IrType::Number),
            body: vec![IrStatement::ret(Some(IrExpr::ident("x")))],
            is_static: false,
            is_async: false,
            is_generator: false,
            is_abstract: false,
            visibility: IrVisibility::Public,
        }],
        is_abstract: false,
        exported: true,
        self_type_parameter: None,
    };
    let mut ctx = ctx();
    let out = print_type_declaration(&lower_class(&mut ctx, &class).expect("lowers"), 4);
    assert!(out.contains("__param0"));
    assert!(out.contains("var __obj0 = __param0;"));
    assert!(out.contains("double x = __obj0.x;"));
}
