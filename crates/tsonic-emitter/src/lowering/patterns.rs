//! Destructuring pattern lowering.
//!
//! Patterns are expanded into temp-then-extract statement sequences:
//! `__arr{n}`/`__obj{n}` temps hold the right-hand side once, elements
//! extract by index or property, rest elements slice through the
//! runtime helper, and defaults apply with `??`. The same expansion
//! drives local declarations, parameter prologues, static fields
//! (assigning in the static constructor), and assignment expressions
//! (which preserve the JS result value through `__assign{n}`).

use tracing::trace;

use tsonic_common::diagnostics::{ice_codes, EmitError};
use tsonic_common::limits::MAX_PATTERN_DEPTH;
use tsonic_ir::{
    IrExpr, IrObjectRest, IrPattern, IrType, LocalTypeInfo,
};

use crate::cs_ast::{CsBinaryOp, CsExpr, CsLambdaBody, CsStmt, CsType};
use crate::emit_context::EmitterContext;
use crate::lowering::expressions::lower_expr;
use crate::lowering::runtime;
use crate::lowering::types::{
    array_element_type, lower_type, resolve_surface, substitute_type_parameters,
};

/// How extracted bindings are realized.
enum BindMode {
    /// `ElemType name = value;` declaring new locals.
    Declare,
    /// `name = value;` assigning existing locals (assignment context).
    Assign,
    /// `name = value;` assigning static fields, collecting field
    /// declarations on the side.
    StaticField,
}

struct PatternExpander<'a> {
    ctx: &'a mut EmitterContext,
    mode: BindMode,
    statements: Vec<CsStmt>,
    /// Fields produced in `StaticField` mode.
    fields: Vec<(CsType, String)>,
}

/// Lower a destructuring local declaration (`const [a, b] = expr;`).
pub fn lower_declaration_destructuring(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    initializer: &IrExpr,
    declared_type: Option<&IrType>,
) -> Result<Vec<CsStmt>, EmitError> {
    debug_assert!(pattern.depth() <= MAX_PATTERN_DEPTH);
    let source_ty = declared_type.cloned().or_else(|| initializer.inferred_type.clone());
    let init = lower_expr(ctx, initializer)?;
    let mut expander = PatternExpander {
        ctx,
        mode: BindMode::Declare,
        statements: Vec::new(),
        fields: Vec::new(),
    };
    expander.expand(pattern, init, source_ty.as_ref())?;
    Ok(expander.statements)
}

/// Lower a destructuring parameter: the signature keeps the synthetic
/// name, the returned statements open the body.
pub fn lower_parameter_pattern(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    synthetic_name: &str,
    parameter_ty: Option<&IrType>,
) -> Result<Vec<CsStmt>, EmitError> {
    let mut expander = PatternExpander {
        ctx,
        mode: BindMode::Declare,
        statements: Vec::new(),
        fields: Vec::new(),
    };
    expander.expand(pattern, CsExpr::ident(synthetic_name), parameter_ty)?;
    Ok(expander.statements)
}

/// Lower a top-level destructuring declaration in a static container:
/// one static field per binding plus the static-constructor statements
/// that populate them.
pub fn lower_static_field_destructuring(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    initializer: &IrExpr,
    declared_type: Option<&IrType>,
) -> Result<(Vec<(CsType, String)>, Vec<CsStmt>), EmitError> {
    let source_ty = declared_type.cloned().or_else(|| initializer.inferred_type.clone());
    let init = lower_expr(ctx, initializer)?;
    let mut expander = PatternExpander {
        ctx,
        mode: BindMode::StaticField,
        statements: Vec::new(),
        fields: Vec::new(),
    };
    expander.expand(pattern, init, source_ty.as_ref())?;
    Ok((expander.fields, expander.statements))
}

/// Lower `[a, b] = rhs` in expression position. JS yields the RHS value,
/// so the expansion runs inside an immediately-invoked lambda that
/// returns `__assign{n}`.
pub fn lower_assignment_destructuring(
    ctx: &mut EmitterContext,
    pattern: &IrPattern,
    value: &IrExpr,
) -> Result<CsExpr, EmitError> {
    let value_ty = value.inferred_type.clone();
    let result_ty = match value_ty.as_ref() {
        Some(ty) => lower_type(ctx, ty)?,
        None => CsType::nullable(CsType::object()),
    };
    let rhs = lower_expr(ctx, value)?;

    let assign_temp = ctx.alloc_temp("assign");
    let mut statements = vec![CsStmt::local(
        result_ty.clone(),
        assign_temp.clone(),
        Some(rhs),
    )];

    let mut expander = PatternExpander {
        ctx,
        mode: BindMode::Assign,
        statements: Vec::new(),
        fields: Vec::new(),
    };
    expander.expand(pattern, CsExpr::ident(assign_temp.clone()), value_ty.as_ref())?;
    statements.extend(expander.statements);
    statements.push(CsStmt::ret(Some(CsExpr::ident(assign_temp))));

    let func_ty = CsType::generic(runtime::FUNC, vec![result_ty]);
    let lambda = CsExpr::lambda0(CsLambdaBody::Block(statements));
    Ok(CsExpr::call(
        CsExpr::parens(CsExpr::cast(func_ty, CsExpr::parens(lambda))),
        vec![],
    ))
}

impl PatternExpander<'_> {
    fn expand(
        &mut self,
        pattern: &IrPattern,
        source: CsExpr,
        source_ty: Option<&IrType>,
    ) -> Result<(), EmitError> {
        match pattern {
            IrPattern::Identifier { name, ty } => {
                let ty = ty.clone().or_else(|| source_ty.cloned());
                self.bind(name, ty.as_ref(), source)
            }
            IrPattern::Array { elements } => self.expand_array(elements, source, source_ty),
            IrPattern::Object { properties, rest } => {
                self.expand_object(properties, rest.as_ref(), source, source_ty)
            }
        }
    }

    fn expand_array(
        &mut self,
        elements: &[Option<tsonic_ir::IrArrayPatternElement>],
        source: CsExpr,
        source_ty: Option<&IrType>,
    ) -> Result<(), EmitError> {
        let temp = self.ctx.alloc_temp("arr");
        self.statements
            .push(CsStmt::var(temp.clone(), source));
        let element_ty = source_ty.and_then(|t| array_element_type(self.ctx, t));

        let mut index: usize = 0;
        let mut seen_rest = false;
        for element in elements {
            let Some(element) = element else {
                // Hole: the index advances, nothing binds.
                index += 1;
                continue;
            };
            if seen_rest {
                // Elements after a rest are discarded.
                trace!("discarding array pattern element after rest");
                continue;
            }
            if element.rest {
                seen_rest = true;
                let Some(name) = element.pattern.identifier_name() else {
                    return Err(EmitError::ice(
                        ice_codes::UNSUPPORTED_NODE,
                        "rest element binds a nested pattern",
                    ));
                };
                let rest_value = CsExpr::call(
                    CsExpr::ident(runtime::ARRAY_HELPERS_SLICE),
                    vec![
                        CsExpr::ident(temp.clone()),
                        CsExpr::literal(index.to_string()),
                    ],
                );
                let rest_ty = element_ty.clone().map(|e| IrType::Array {
                    element: Box::new(e),
                });
                self.bind(name, rest_ty.as_ref(), rest_value)?;
                continue;
            }

            let mut value = CsExpr::element(
                CsExpr::ident(temp.clone()),
                CsExpr::literal(index.to_string()),
            );
            if let Some(default) = &element.default {
                let default = lower_expr(self.ctx, default)?;
                value = CsExpr::binary(value, CsBinaryOp::Coalesce, default);
            }
            match &element.pattern {
                IrPattern::Identifier { name, ty } => {
                    let ty = ty.clone().or_else(|| element_ty.clone());
                    self.bind(name, ty.as_ref(), value)?;
                }
                nested => self.expand(nested, value, element_ty.as_ref())?,
            }
            index += 1;
        }
        Ok(())
    }

    fn expand_object(
        &mut self,
        properties: &[tsonic_ir::IrObjectPatternProperty],
        rest: Option<&IrObjectRest>,
        source: CsExpr,
        source_ty: Option<&IrType>,
    ) -> Result<(), EmitError> {
        let temp = self.ctx.alloc_temp("obj");
        self.statements
            .push(CsStmt::var(temp.clone(), source));

        for property in properties {
            let prop_ty = source_ty.and_then(|t| property_type(self.ctx, t, &property.property));
            let mut value = CsExpr::member(CsExpr::ident(temp.clone()), property.property.clone());
            if let Some(default) = &property.default {
                let default = lower_expr(self.ctx, default)?;
                value = CsExpr::binary(value, CsBinaryOp::Coalesce, default);
            }
            match &property.pattern {
                IrPattern::Identifier { name, ty } => {
                    let ty = ty.clone().or(prop_ty);
                    self.bind(name, ty.as_ref(), value)?;
                }
                nested => self.expand(nested, value, prop_ty.as_ref())?,
            }
        }

        if let Some(rest) = rest {
            // The frontend must synthesize the rest shape; its absence is
            // a contract violation, never a silent placeholder.
            let (Some(members), Some(synth_name)) =
                (rest.shape_members.as_ref(), rest.synth_type_name.as_deref())
            else {
                return Err(EmitError::ice(
                    ice_codes::MISSING_REST_SHAPE,
                    format!(
                        "object rest '{}' lacks restShapeMembers/restSynthTypeName",
                        rest.name
                    ),
                ));
            };
            let assignments: Vec<(String, CsExpr)> = members
                .iter()
                .map(|member| {
                    (
                        member.name.clone(),
                        CsExpr::member(CsExpr::ident(temp.clone()), member.name.clone()),
                    )
                })
                .collect();
            let value = CsExpr::ObjectCreation {
                ty: CsType::named(synth_name),
                arguments: Vec::new(),
                initializer: Some(assignments),
            };
            let rest_ty = IrType::Reference {
                name: synth_name.to_string(),
                type_arguments: vec![],
                resolved_clr_type: None,
            };
            self.bind(&rest.name, Some(&rest_ty), value)?;
        }
        Ok(())
    }

    fn bind(
        &mut self,
        ir_name: &str,
        ty: Option<&IrType>,
        value: CsExpr,
    ) -> Result<(), EmitError> {
        match self.mode {
            BindMode::Declare => {
                let cs_ty = match ty {
                    Some(ty) => lower_type(self.ctx, ty)?,
                    None => CsType::Var,
                };
                let emitted = self.ctx.declare_local(ir_name);
                self.statements.push(CsStmt::local(cs_ty, emitted, Some(value)));
            }
            BindMode::Assign => {
                let emitted = self
                    .ctx
                    .lookup_local(ir_name)
                    .unwrap_or(ir_name)
                    .to_string();
                self.statements
                    .push(CsStmt::expr(CsExpr::assign(CsExpr::Identifier(emitted), value)));
            }
            BindMode::StaticField => {
                // Static contexts may not use `var`; missing types fall
                // back to object.
                let cs_ty = match ty {
                    Some(ty) => lower_type(self.ctx, ty)?,
                    None => CsType::nullable(CsType::object()),
                };
                self.fields.push((cs_ty, ir_name.to_string()));
                self.statements.push(CsStmt::expr(CsExpr::assign(
                    CsExpr::Identifier(ir_name.to_string()),
                    value,
                )));
            }
        }
        Ok(())
    }
}

/// The declared type of a property on a structural type, following
/// structural aliases (including frontend-synthesized anonymous types).
pub(crate) fn property_type(
    ctx: &EmitterContext,
    ty: &IrType,
    property: &str,
) -> Option<IrType> {
    let surface = resolve_surface(ctx, ty, 0);
    match &surface {
        IrType::Object { members } => members
            .iter()
            .find(|m| m.name == property)
            .map(|m| m.ty.clone()),
        IrType::Reference {
            name,
            type_arguments,
            ..
        } => match ctx.lookup_local_type(name)? {
            LocalTypeInfo::TypeAlias {
                type_parameters,
                ty: aliased,
            } if matches!(aliased, IrType::Object { .. }) => {
                let substituted =
                    substitute_type_parameters(aliased, type_parameters, type_arguments);
                if let IrType::Object { members } = substituted {
                    members
                        .iter()
                        .find(|m| m.name == property)
                        .map(|m| m.ty.clone())
                } else {
                    None
                }
            }
            _ => None,
        },
        _ => None,
    }
}
