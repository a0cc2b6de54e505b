//! Declaration lowering: modules, classes, interfaces, type aliases,
//! enums, functions, and imports.
//!
//! A static-container module collects its top-level values and
//! functions as static members of a class named after the module,
//! marked with the `ModuleContainer` attribute; regular modules place
//! their type declarations directly in the namespace. Non-exported
//! members emit `internal` (not `private`) so sibling namespace-level
//! types can still reach them.

use indexmap::IndexMap;
use tracing::debug;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_ir::{
    IrClass, IrClassMember, IrDeclaration, IrEnum, IrFunction, IrImport, IrInterface,
    IrInterfaceMember, IrModule, IrPattern, IrStatement, IrType, IrTypeAlias, IrVisibility,
    LocalTypeInfo,
};

use crate::cs_ast::{
    CsAccessors, CsAutoSetter, CsConstructor, CsConstructorInitializerKind, CsExpr, CsField,
    CsMember, CsMethod, CsNamespaceMember, CsProperty, CsStmt, CsType, CsTypeDeclaration,
    CsTypeKind, CsTypeParameterConstraint, Modifiers,
};
use crate::emit_context::{EmitterContext, ImportBinding};
use crate::lowering::types::{lower_type, ALIAS_SUFFIX};
use crate::lowering::{functions, generators, patterns, runtime, statements};
use crate::printer::print_type;

/// Everything a module lowers to, ready for unit assembly.
pub struct LoweredModule {
    pub members: Vec<CsNamespaceMember>,
    pub usings: Vec<String>,
    pub used_module_container: bool,
}

pub fn lower_module(ctx: &mut EmitterContext, module: &IrModule) -> Result<LoweredModule, EmitError> {
    debug!(path = %module.file_path, "lowering module");

    ctx.seed_local_types(collect_local_types(&module.body));
    let usings = bind_imports(ctx, &module.imports);

    if module.is_static_container {
        lower_static_container(ctx, module, usings)
    } else {
        lower_regular_module(ctx, module, usings)
    }
}

/// Prepopulate the local-type table from the module's top-level
/// declarations, in declaration order.
fn collect_local_types(body: &[IrStatement]) -> IndexMap<String, LocalTypeInfo> {
    let mut out = IndexMap::new();
    for statement in body {
        let IrStatement::Declaration { declaration } = statement else {
            continue;
        };
        match declaration {
            IrDeclaration::Interface(interface) => {
                out.insert(interface.name.clone(), LocalTypeInfo::Interface);
            }
            IrDeclaration::Class(class) => {
                out.insert(class.name.clone(), LocalTypeInfo::Class);
            }
            IrDeclaration::Enum(decl) => {
                out.insert(decl.name.clone(), LocalTypeInfo::Enum);
            }
            IrDeclaration::TypeAlias(alias) => {
                out.insert(
                    alias.name.clone(),
                    LocalTypeInfo::TypeAlias {
                        type_parameters: alias
                            .type_parameters
                            .iter()
                            .map(|tp| tp.name.clone())
                            .collect(),
                        ty: alias.ty.clone(),
                    },
                );
            }
            IrDeclaration::Function(_) => {}
        }
    }
    out
}

/// Register import bindings and collect the `using` directives they
/// induce. Local imports yield namespace usings; CLR flattened values
/// bind through their declaring type and induce no using at all.
fn bind_imports(ctx: &mut EmitterContext, imports: &[IrImport]) -> Vec<String> {
    let mut usings = Vec::new();
    for import in imports {
        let entry = ctx.options.module_map_entry(&import.source).cloned();
        for specifier in &import.specifiers {
            let local = specifier.local_name().to_string();
            if let Some(clr) = &specifier.clr_value {
                ctx.bind_import(
                    local,
                    ImportBinding::ClrValue {
                        declaring_type: clr.declaring_clr_type.clone(),
                        member: clr.member_name.clone(),
                    },
                );
                continue;
            }
            let Some(namespace) = import.resolved_namespace.clone() else {
                continue;
            };
            // A specifier naming one of the source module's types binds
            // as a type; anything else binds through the container.
            let is_type = entry
                .as_ref()
                .is_some_and(|e| e.local_types.contains_key(&specifier.name));
            match (&import.resolved_class_name, is_type) {
                (Some(class_name), false) => {
                    ctx.bind_import(
                        local,
                        ImportBinding::ModuleValue {
                            namespace: namespace.clone(),
                            class_name: class_name.clone(),
                            member: specifier.name.clone(),
                        },
                    );
                }
                _ => {
                    ctx.bind_import(
                        local,
                        ImportBinding::Type {
                            namespace: namespace.clone(),
                            name: specifier.name.clone(),
                        },
                    );
                }
            }
        }
        if let Some(namespace) = &import.resolved_namespace {
            if import.is_local || import.is_clr {
                usings.push(namespace.clone());
            }
        }
    }
    usings
}

fn type_visibility(ctx: &EmitterContext, name: &str, exported: bool) -> Modifiers {
    if exported || ctx.is_public_local_type(name) {
        Modifiers::PUBLIC
    } else {
        Modifiers::INTERNAL
    }
}

fn member_visibility(exported: bool) -> Modifiers {
    if exported {
        Modifiers::PUBLIC
    } else {
        Modifiers::INTERNAL
    }
}

// =========================================================================
// Static container modules
// =========================================================================

fn lower_static_container(
    ctx: &mut EmitterContext,
    module: &IrModule,
    usings: Vec<String>,
) -> Result<LoweredModule, EmitError> {
    ctx.is_static = true;

    let mut fields: Vec<CsMember> = Vec::new();
    let mut ctor_statements: Vec<CsStmt> = Vec::new();
    let mut methods: Vec<CsMember> = Vec::new();
    let mut trailing_members: Vec<CsNamespaceMember> = Vec::new();

    for statement in &module.body {
        match statement {
            IrStatement::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    lower_container_variable(
                        ctx,
                        module,
                        declarator,
                        &mut fields,
                        &mut ctor_statements,
                    )?;
                }
            }
            IrStatement::Declaration { declaration } => match declaration {
                IrDeclaration::Function(function) => {
                    let modifiers = member_visibility(function.exported) | Modifiers::STATIC;
                    if function.is_generator {
                        let lowered =
                            generators::lower_generator_function(ctx, function, modifiers)?;
                        methods.push(CsMember::Method(lowered.entry));
                        trailing_members.push(CsNamespaceMember::Type(lowered.exchange));
                        trailing_members.push(CsNamespaceMember::Type(lowered.wrapper));
                    } else {
                        methods.push(CsMember::Method(functions::lower_function_to_method(
                            ctx, function, modifiers,
                        )?));
                    }
                }
                other => {
                    trailing_members.push(lower_type_level_declaration(ctx, other)?);
                }
            },
            // Loose top-level statements run during module
            // initialization.
            other => {
                ctx.reset_declaration_state();
                ctor_statements.extend(statements::lower_statement(ctx, other)?);
            }
        }
    }

    let mut container = CsTypeDeclaration::new(
        CsTypeKind::Class,
        Modifiers::PUBLIC | Modifiers::STATIC,
        module.class_name.clone(),
    );
    container
        .attributes
        .push(runtime::MODULE_CONTAINER_ATTRIBUTE.to_string());
    container.members = fields;
    if !ctor_statements.is_empty() {
        container.members.push(CsMember::Constructor(CsConstructor {
            modifiers: Modifiers::STATIC,
            name: module.class_name.clone(),
            parameters: Vec::new(),
            initializer: None,
            body: ctor_statements,
        }));
    }
    container.members.extend(methods);

    let mut members = vec![CsNamespaceMember::Type(container)];
    members.extend(trailing_members);
    Ok(LoweredModule {
        members,
        usings,
        used_module_container: true,
    })
}

/// Top-level `const`/`let` in a static container: a `static readonly`
/// field (assigned in the static constructor) per binding.
fn lower_container_variable(
    ctx: &mut EmitterContext,
    module: &IrModule,
    declarator: &tsonic_ir::IrVariableDeclarator,
    fields: &mut Vec<CsMember>,
    ctor_statements: &mut Vec<CsStmt>,
) -> Result<(), EmitError> {
    ctx.reset_declaration_state();
    match &declarator.pattern {
        IrPattern::Identifier { name, ty } => {
            let exported = module.exports.iter().any(|e| e == name);
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
            // A function expression in a static context must have an
            // inferable signature: object-typed slots cannot hold a
            // lambda.
            if declared.is_none()
                && declarator
                    .initializer
                    .as_ref()
                    .is_some_and(|init| matches!(init.kind, tsonic_ir::IrExprKind::Function { .. }))
            {
                return Err(EmitError::ice(
                    ice_codes::UNINFERABLE_FUNCTION_TYPE,
                    format!("function expression bound to '{name}' has no inferable type"),
                ));
            }
            // Static contexts may not use `var`; missing types fall back
            // to a nullable object slot.
            let cs_ty = match &declared {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::nullable(CsType::object()),
            };
            fields.push(CsMember::Field(CsField {
                modifiers: member_visibility(exported) | Modifiers::STATIC | Modifiers::READONLY,
                ty: cs_ty,
                name: name.clone(),
                initializer: None,
            }));
            if let Some(initializer) = &declarator.initializer {
                let value = super::expressions::lower_expr(ctx, initializer)?;
                ctor_statements.push(CsStmt::expr(CsExpr::assign(
                    CsExpr::Identifier(name.clone()),
                    value,
                )));
            }
            Ok(())
        }
        pattern => {
            let Some(initializer) = &declarator.initializer else {
                return Err(EmitError::ice(
                    ice_codes::UNSUPPORTED_NODE,
                    "destructuring container field without an initializer",
                ));
            };
            let (new_fields, init_statements) = patterns::lower_static_field_destructuring(
                ctx,
                pattern,
                initializer,
                declarator.declared_type.as_ref(),
            )?;
            for (ty, name) in new_fields {
                let exported = module.exports.iter().any(|e| e == &name);
                fields.push(CsMember::Field(CsField {
                    modifiers: member_visibility(exported)
                        | Modifiers::STATIC
                        | Modifiers::READONLY,
                    ty,
                    name,
                    initializer: None,
                }));
            }
            ctor_statements.extend(init_statements);
            Ok(())
        }
    }
}

// =========================================================================
// Regular modules
// =========================================================================

fn lower_regular_module(
    ctx: &mut EmitterContext,
    module: &IrModule,
    usings: Vec<String>,
) -> Result<LoweredModule, EmitError> {
    let mut members = Vec::new();
    for statement in &module.body {
        match statement {
            IrStatement::Declaration { declaration } => match declaration {
                IrDeclaration::Function(_) => {
                    return Err(EmitError::ice(
                        ice_codes::INVALID_MEMBER,
                        "top-level function in a module not marked as a static container",
                    ));
                }
                other => members.push(lower_type_level_declaration(ctx, other)?),
            },
            IrStatement::Empty => {}
            _ => {
                return Err(EmitError::ice(
                    ice_codes::INVALID_MEMBER,
                    "top-level statement in a module not marked as a static container",
                ));
            }
        }
    }
    Ok(LoweredModule {
        members,
        usings,
        used_module_container: false,
    })
}

fn lower_type_level_declaration(
    ctx: &mut EmitterContext,
    declaration: &IrDeclaration,
) -> Result<CsNamespaceMember, EmitError> {
    match declaration {
        IrDeclaration::Class(class) => Ok(CsNamespaceMember::Type(lower_class(ctx, class)?)),
        IrDeclaration::Interface(interface) => {
            Ok(CsNamespaceMember::Type(lower_interface(ctx, interface)?))
        }
        IrDeclaration::TypeAlias(alias) => lower_type_alias(ctx, alias),
        IrDeclaration::Enum(decl) => Ok(CsNamespaceMember::Type(lower_enum(ctx, decl)?)),
        IrDeclaration::Function(_) => Err(EmitError::ice(
            ice_codes::INVALID_MEMBER,
            "function declaration in type-level position",
        )),
    }
}

// =========================================================================
// Classes
// =========================================================================

fn visibility_modifiers(visibility: IrVisibility) -> Modifiers {
    match visibility {
        IrVisibility::Public => Modifiers::PUBLIC,
        IrVisibility::Protected => Modifiers::PROTECTED,
        IrVisibility::Private => Modifiers::PRIVATE,
    }
}

pub fn lower_class(
    ctx: &mut EmitterContext,
    class: &IrClass,
) -> Result<CsTypeDeclaration, EmitError> {
    let snapshot = ctx.enter_scope();
    ctx.is_static = false;

    let mut modifiers = type_visibility(ctx, &class.name, class.exported);
    if class.is_abstract {
        modifiers |= Modifiers::ABSTRACT;
    }
    let mut decl = CsTypeDeclaration::new(CsTypeKind::Class, modifiers, class.name.clone());

    for tp in &class.type_parameters {
        decl.type_parameters.push(ctx.declare_type_parameter(&tp.name));
    }
    // Structural this-return interfaces arrive as a CRTP self-type; the
    // emitter only wires the constraint.
    if let Some(self_tp) = &class.self_type_parameter {
        let emitted = ctx.declare_type_parameter(self_tp);
        decl.constraints.push(CsTypeParameterConstraint {
            parameter: emitted.clone(),
            bounds: vec![CsType::generic(
                class.name.clone(),
                vec![CsType::named(emitted.clone())],
            )],
        });
        decl.type_parameters.push(emitted);
    }
    for tp in &class.type_parameters {
        if let Some(constraint) = &tp.constraint {
            let emitted = ctx
                .lookup_type_parameter(&tp.name)
                .unwrap_or(tp.name.as_str())
                .to_string();
            decl.constraints.push(CsTypeParameterConstraint {
                parameter: emitted,
                bounds: vec![lower_type(ctx, constraint)?],
            });
        }
    }

    if let Some(extends) = &class.extends {
        decl.base_types.push(lower_type(ctx, extends)?);
    }
    // Deduplicate implements arms by printed form, preserving order.
    let mut seen = Vec::new();
    for implements in &class.implements {
        let lowered = lower_type(ctx, implements)?;
        let printed = print_type(&lowered);
        if !seen.contains(&printed) {
            seen.push(printed);
            decl.base_types.push(lowered);
        }
    }

    for member in &class.members {
        lower_class_member(ctx, member, &mut decl)?;
    }

    ctx.leave_scope(snapshot);
    Ok(decl)
}

fn lower_class_member(
    ctx: &mut EmitterContext,
    member: &IrClassMember,
    decl: &mut CsTypeDeclaration,
) -> Result<(), EmitError> {
    match member {
        IrClassMember::Field {
            name,
            ty,
            initializer,
            is_static,
            is_readonly,
            visibility,
        } => {
            ctx.reset_declaration_state();
            let cs_ty = match ty {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::nullable(CsType::object()),
            };
            let mut modifiers = visibility_modifiers(*visibility);
            if *is_static {
                modifiers |= Modifiers::STATIC;
            }
            if *is_readonly {
                modifiers |= Modifiers::READONLY;
            }
            let initializer = initializer
                .as_ref()
                .map(|init| super::expressions::lower_expr(ctx, init))
                .transpose()?;
            decl.members.push(CsMember::Field(CsField {
                modifiers,
                ty: cs_ty,
                name: name.clone(),
                initializer,
            }));
        }
        IrClassMember::Method {
            name,
            type_parameters,
            parameters,
            return_type,
            body,
            is_static,
            is_async,
            is_generator,
            is_abstract,
            visibility,
        } => {
            let mut modifiers = visibility_modifiers(*visibility);
            if *is_static {
                modifiers |= Modifiers::STATIC;
            }
            if *is_abstract {
                modifiers |= Modifiers::ABSTRACT;
            }
            let function = IrFunction {
                name: name.clone(),
                type_parameters: type_parameters.clone(),
                parameters: parameters.clone(),
                return_type: return_type.clone(),
                body: body.clone(),
                is_async: *is_async,
                is_generator: *is_generator,
                exported: false,
            };
            if *is_generator {
                let lowered = generators::lower_generator_function(ctx, &function, modifiers)?;
                decl.members.push(CsMember::Method(lowered.entry));
                decl.members.push(CsMember::NestedType(lowered.exchange));
                decl.members.push(CsMember::NestedType(lowered.wrapper));
            } else if *is_abstract {
                let snapshot = ctx.enter_scope();
                let signature = functions::lower_signature(
                    ctx,
                    type_parameters,
                    parameters,
                    return_type.as_ref(),
                    *is_async,
                )?;
                ctx.leave_scope(snapshot);
                let mut method = CsMethod::new(modifiers, signature.return_type, name.clone());
                method.type_parameters = signature.type_parameters;
                method.constraints = signature.constraints;
                method.parameters = signature.parameters;
                decl.members.push(CsMember::Method(method));
            } else {
                decl.members.push(CsMember::Method(
                    functions::lower_function_to_method(ctx, &function, modifiers)?,
                ));
            }
        }
        IrClassMember::Constructor {
            parameters,
            body,
            visibility,
        } => {
            let snapshot = ctx.enter_scope();
            ctx.reset_declaration_state();
            let signature = functions::lower_signature(ctx, &[], parameters, None, false)?;
            let mut statements = signature.prologue;
            let mut initializer = None;

            // A leading super(...) call becomes the base initializer.
            let mut body_statements = body.as_slice();
            if let Some(IrStatement::Expression { expression }) = body_statements.first()
                && let tsonic_ir::IrExprKind::Call {
                    callee, arguments, ..
                } = &expression.kind
                && matches!(callee.kind, tsonic_ir::IrExprKind::Super)
            {
                let mut lowered_args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    lowered_args.push(super::expressions::lower_expr(ctx, argument)?);
                }
                initializer = Some((CsConstructorInitializerKind::Base, lowered_args));
                body_statements = &body_statements[1..];
            }

            statements.extend(statements::lower_statements(ctx, body_statements)?);
            ctx.leave_scope(snapshot);

            decl.members.push(CsMember::Constructor(CsConstructor {
                modifiers: visibility_modifiers(*visibility),
                name: decl.name.clone(),
                parameters: signature.parameters,
                initializer,
                body: statements,
            }));
        }
        IrClassMember::Getter {
            name,
            return_type,
            body,
            is_static,
            visibility,
        } => {
            let snapshot = ctx.enter_scope();
            ctx.reset_declaration_state();
            let ty = match return_type {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::nullable(CsType::object()),
            };
            let getter = statements::lower_statements(ctx, body)?;
            ctx.leave_scope(snapshot);
            let mut modifiers = visibility_modifiers(*visibility);
            if *is_static {
                modifiers |= Modifiers::STATIC;
            }
            upsert_property(decl, modifiers, ty, name, Some(getter), None);
        }
        IrClassMember::Setter {
            name,
            parameter,
            body,
            is_static,
            visibility,
        } => {
            let snapshot = ctx.enter_scope();
            ctx.reset_declaration_state();
            let ty = match &parameter.ty {
                Some(ty) => lower_type(ctx, ty)?,
                None => CsType::nullable(CsType::object()),
            };
            // The accessor parameter becomes C#'s implicit `value`;
            // differently-named parameters get an alias local.
            let mut setter = Vec::new();
            if let Some(param_name) = parameter.pattern.identifier_name()
                && param_name != "value"
            {
                let emitted = ctx.declare_local(param_name);
                setter.push(CsStmt::var(emitted, CsExpr::ident("value")));
            }
            setter.extend(statements::lower_statements(ctx, body)?);
            ctx.leave_scope(snapshot);
            let mut modifiers = visibility_modifiers(*visibility);
            if *is_static {
                modifiers |= Modifiers::STATIC;
            }
            upsert_property(decl, modifiers, ty, name, None, Some(setter));
        }
    }
    Ok(())
}

/// Merge getter/setter pairs into a single property, keyed by name.
fn upsert_property(
    decl: &mut CsTypeDeclaration,
    modifiers: Modifiers,
    ty: CsType,
    name: &str,
    getter: Option<Vec<CsStmt>>,
    setter: Option<Vec<CsStmt>>,
) {
    for member in decl.members.iter_mut() {
        if let CsMember::Property(property) = member
            && property.name == name
            && let CsAccessors::Bodied {
                getter: existing_getter,
                setter: existing_setter,
            } = &mut property.accessors
        {
            if getter.is_some() {
                *existing_getter = getter;
            } else if setter.is_some() {
                *existing_setter = setter;
            }
            return;
        }
    }
    decl.members.push(CsMember::Property(CsProperty {
        modifiers,
        ty,
        name: name.to_string(),
        accessors: CsAccessors::Bodied { getter, setter },
    }));
}

// =========================================================================
// Interfaces
// =========================================================================

pub fn lower_interface(
    ctx: &mut EmitterContext,
    interface: &IrInterface,
) -> Result<CsTypeDeclaration, EmitError> {
    let snapshot = ctx.enter_scope();
    let modifiers = type_visibility(ctx, &interface.name, interface.exported);
    let mut decl = CsTypeDeclaration::new(CsTypeKind::Interface, modifiers, interface.name.clone());

    for tp in &interface.type_parameters {
        decl.type_parameters.push(ctx.declare_type_parameter(&tp.name));
        if let Some(constraint) = &tp.constraint {
            let emitted = decl.type_parameters.last().cloned().unwrap_or_default();
            decl.constraints.push(CsTypeParameterConstraint {
                parameter: emitted,
                bounds: vec![lower_type(ctx, constraint)?],
            });
        }
    }
    for extends in &interface.extends {
        decl.base_types.push(lower_type(ctx, extends)?);
    }

    for member in &interface.members {
        match member {
            IrInterfaceMember::Property {
                name,
                ty,
                optional,
                readonly,
            } => {
                let mut cs_ty = lower_type(ctx, ty)?;
                if *optional {
                    cs_ty = CsType::nullable(cs_ty);
                }
                decl.members.push(CsMember::Property(CsProperty {
                    modifiers: Modifiers::default(),
                    ty: cs_ty,
                    name: name.clone(),
                    accessors: CsAccessors::Auto {
                        setter: if *readonly {
                            CsAutoSetter::None
                        } else {
                            CsAutoSetter::Set
                        },
                    },
                }));
            }
            IrInterfaceMember::Method {
                name,
                type_parameters,
                parameters,
                return_type,
            } => {
                let snapshot = ctx.enter_scope();
                let signature = functions::lower_signature(
                    ctx,
                    type_parameters,
                    parameters,
                    return_type.as_ref(),
                    false,
                )?;
                ctx.leave_scope(snapshot);
                let mut method =
                    CsMethod::new(Modifiers::default(), signature.return_type, name.clone());
                method.type_parameters = signature.type_parameters;
                method.constraints = signature.constraints;
                method.parameters = signature.parameters;
                decl.members.push(CsMember::Method(method));
            }
        }
    }

    ctx.leave_scope(snapshot);
    Ok(decl)
}

// =========================================================================
// Type aliases
// =========================================================================

/// Structural aliases realize as generated `__Alias` classes (or
/// structs when flagged); anything else survives only as a comment.
pub fn lower_type_alias(
    ctx: &mut EmitterContext,
    alias: &IrTypeAlias,
) -> Result<CsNamespaceMember, EmitError> {
    let IrType::Object { members } = &alias.ty else {
        let lowered = lower_type(ctx, &alias.ty)?;
        return Ok(CsNamespaceMember::Comment(format!(
            "type {} = {}",
            alias.name,
            print_type(&lowered)
        )));
    };

    let snapshot = ctx.enter_scope();
    let kind = if alias.as_struct {
        CsTypeKind::Struct
    } else {
        CsTypeKind::Class
    };
    let mut modifiers = type_visibility(ctx, &alias.name, alias.exported);
    if !alias.as_struct {
        modifiers |= Modifiers::SEALED;
    }
    let mut decl =
        CsTypeDeclaration::new(kind, modifiers, format!("{}{ALIAS_SUFFIX}", alias.name));
    for tp in &alias.type_parameters {
        decl.type_parameters.push(ctx.declare_type_parameter(&tp.name));
    }

    for member in members {
        let mut ty = lower_type(ctx, &member.ty)?;
        if member.optional {
            ty = CsType::nullable(ty);
        }
        let mut property_modifiers = Modifiers::PUBLIC;
        if !member.optional {
            property_modifiers |= Modifiers::REQUIRED;
        }
        decl.members.push(CsMember::Property(CsProperty {
            modifiers: property_modifiers,
            ty,
            name: member.name.clone(),
            accessors: CsAccessors::Auto {
                setter: if member.readonly {
                    CsAutoSetter::Init
                } else {
                    CsAutoSetter::Set
                },
            },
        }));
    }

    ctx.leave_scope(snapshot);
    Ok(CsNamespaceMember::Type(decl))
}

// =========================================================================
// Enums
// =========================================================================

pub fn lower_enum(ctx: &mut EmitterContext, decl: &IrEnum) -> Result<CsTypeDeclaration, EmitError> {
    let modifiers = type_visibility(ctx, &decl.name, decl.exported);
    let mut lowered = CsTypeDeclaration::new(CsTypeKind::Enum, modifiers, decl.name.clone());
    for member in &decl.members {
        let value = match member.value {
            Some(value) => {
                if value.fract() != 0.0 || !value.is_finite() {
                    return Err(EmitError::ice(
                        ice_codes::NON_INTEGRAL_ENUM_MEMBER,
                        format!("enum member '{}' has a non-integral value", member.name),
                    ));
                }
                Some(CsExpr::literal((value as i64).to_string()))
            }
            None => None,
        };
        lowered.members.push(CsMember::EnumMember {
            name: member.name.clone(),
            value,
        });
    }
    Ok(lowered)
}
