//! Deterministic rendering of the Backend AST to C# source text.
//!
//! One entry point per node category. Same input always yields byte-
//! identical output, independent of host locale, time, or randomness.
//! All parenthesization decisions live in `expressions.rs`; all
//! identifier escaping goes through [`crate::naming`].

mod expressions;
mod statements;
mod types;

use crate::cs_ast::{
    CsAccessors, CsAutoSetter, CsCompilationUnit, CsConstructor, CsConstructorInitializerKind,
    CsDelegate, CsExpr, CsField, CsMember, CsMethod, CsNamespace, CsNamespaceMember, CsParameter,
    CsProperty, CsStmt, CsTypeDeclaration, CsTypeKind, CsTypeParameterConstraint,
};
use crate::naming::escape_identifier;
use crate::source_writer::SourceWriter;

/// Render a full compilation unit.
pub fn print_compilation_unit(unit: &CsCompilationUnit, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    printer.emit_compilation_unit(unit);
    printer.finish()
}

/// Render a single expression (tests and interpolation re-rendering).
pub fn print_expression(expr: &CsExpr, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    printer.emit_expr(expr);
    printer.finish()
}

/// Render a single statement at indent level zero.
pub fn print_statement(stmt: &CsStmt, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    printer.emit_stmt(stmt);
    printer.finish()
}

/// Render a single type.
pub fn print_type(ty: &crate::cs_ast::CsType) -> String {
    let mut printer = Printer::new(4);
    printer.emit_type(ty);
    printer.finish()
}

/// Render a member at indent level zero.
pub fn print_member(member: &CsMember, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    printer.emit_member(member, false);
    printer.finish()
}

/// Render a type declaration at indent level zero.
pub fn print_type_declaration(decl: &CsTypeDeclaration, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    printer.emit_type_declaration(decl);
    printer.finish()
}

pub(crate) struct Printer {
    pub(crate) writer: SourceWriter,
    indent_width: usize,
}

impl Printer {
    pub(crate) fn new(indent_width: usize) -> Self {
        Self {
            writer: SourceWriter::new(indent_width),
            indent_width,
        }
    }

    pub(crate) fn indent_width(&self) -> usize {
        self.indent_width
    }

    pub(crate) fn finish(self) -> String {
        self.writer.finish()
    }

    // =========================================================================
    // Compilation units and namespaces
    // =========================================================================

    fn emit_compilation_unit(&mut self, unit: &CsCompilationUnit) {
        if let Some(header) = &unit.header {
            for line in header.lines() {
                self.writer.line(line);
            }
            self.writer.blank_line();
        }
        if !unit.usings.is_empty() {
            for using in &unit.usings {
                self.writer.write("using ");
                self.writer.write(&crate::naming::escape_qualified_name(using));
                self.writer.line(";");
            }
            self.writer.blank_line();
        }
        self.emit_namespace(&unit.namespace);
    }

    fn emit_namespace(&mut self, ns: &CsNamespace) {
        self.writer.write("namespace ");
        self.writer
            .write(&crate::naming::escape_qualified_name(&ns.name));
        self.writer.write_line();
        self.writer.line("{");
        self.writer.increase_indent();
        let mut first = true;
        for member in &ns.members {
            match member {
                CsNamespaceMember::Type(decl) => {
                    if !first {
                        self.writer.blank_line();
                    }
                    self.emit_type_declaration(decl);
                }
                CsNamespaceMember::Comment(text) => {
                    if !first {
                        self.writer.blank_line();
                    }
                    for line in text.lines() {
                        self.writer.write("// ");
                        self.writer.line(line);
                    }
                }
                CsNamespaceMember::BlankLine => self.writer.blank_line(),
            }
            first = false;
        }
        self.writer.decrease_indent();
        self.writer.line("}");
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    pub(crate) fn emit_type_declaration(&mut self, decl: &CsTypeDeclaration) {
        for attribute in &decl.attributes {
            self.writer.write("[");
            self.writer
                .write(&crate::naming::escape_qualified_name(attribute));
            self.writer.line("]");
        }
        for keyword in decl.modifiers.keywords() {
            self.writer.write(keyword);
            self.writer.write_space();
        }
        self.writer.write(decl.kind.keyword());
        self.writer.write_space();
        self.writer.write(&escape_identifier(&decl.name));
        self.emit_type_parameter_list(&decl.type_parameters);
        if !decl.base_types.is_empty() {
            self.writer.write(" : ");
            for (i, base) in decl.base_types.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                self.emit_type(base);
            }
        }
        self.emit_constraints(&decl.constraints);
        self.writer.write_line();
        self.writer.line("{");
        self.writer.increase_indent();
        if decl.kind == CsTypeKind::Enum {
            self.emit_enum_members(&decl.members);
        } else {
            let mut first = true;
            for member in &decl.members {
                if !first && !matches!(member, CsMember::BlankLine) {
                    self.writer.blank_line();
                }
                self.emit_member(member, decl.kind == CsTypeKind::Interface);
                first = false;
            }
        }
        self.writer.decrease_indent();
        self.writer.line("}");
    }

    fn emit_enum_members(&mut self, members: &[CsMember]) {
        let count = members.len();
        for (i, member) in members.iter().enumerate() {
            match member {
                CsMember::EnumMember { name, value } => {
                    self.writer.write(&escape_identifier(name));
                    if let Some(value) = value {
                        self.writer.write(" = ");
                        self.emit_expr(value);
                    }
                    if i + 1 < count {
                        self.writer.write(",");
                    }
                    self.writer.write_line();
                }
                CsMember::Comment(text) => {
                    for line in text.lines() {
                        self.writer.write("// ");
                        self.writer.line(line);
                    }
                }
                CsMember::BlankLine => self.writer.blank_line(),
                // Lowering never places other member kinds inside enums.
                _ => {}
            }
        }
    }

    fn emit_type_parameter_list(&mut self, type_parameters: &[String]) {
        if type_parameters.is_empty() {
            return;
        }
        self.writer.write("<");
        for (i, tp) in type_parameters.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.writer.write(&escape_identifier(tp));
        }
        self.writer.write(">");
    }

    fn emit_constraints(&mut self, constraints: &[CsTypeParameterConstraint]) {
        for constraint in constraints {
            self.writer.write(" where ");
            self.writer.write(&escape_identifier(&constraint.parameter));
            self.writer.write(" : ");
            for (i, bound) in constraint.bounds.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                self.emit_type(bound);
            }
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub(crate) fn emit_member(&mut self, member: &CsMember, in_interface: bool) {
        match member {
            CsMember::Field(field) => self.emit_field(field),
            CsMember::Property(property) => self.emit_property(property, in_interface),
            CsMember::Method(method) => self.emit_method(method),
            CsMember::Constructor(ctor) => self.emit_constructor(ctor),
            CsMember::NestedType(decl) => self.emit_type_declaration(decl),
            CsMember::Delegate(delegate) => self.emit_delegate(delegate),
            CsMember::EnumMember { name, value } => {
                // Only reachable through enum declarations, handled there;
                // keep a sane fallback for direct member printing.
                self.writer.write(&escape_identifier(name));
                if let Some(value) = value {
                    self.writer.write(" = ");
                    self.emit_expr(value);
                }
                self.writer.write_line();
            }
            CsMember::Comment(text) => {
                for line in text.lines() {
                    self.writer.write("// ");
                    self.writer.line(line);
                }
            }
            CsMember::BlankLine => self.writer.blank_line(),
        }
    }

    fn emit_modifiers(&mut self, modifiers: crate::cs_ast::Modifiers) {
        for keyword in modifiers.keywords() {
            self.writer.write(keyword);
            self.writer.write_space();
        }
    }

    fn emit_field(&mut self, field: &CsField) {
        self.emit_modifiers(field.modifiers);
        self.emit_type(&field.ty);
        self.writer.write_space();
        self.writer.write(&escape_identifier(&field.name));
        if let Some(initializer) = &field.initializer {
            self.writer.write(" = ");
            self.emit_expr(initializer);
        }
        self.writer.line(";");
    }

    fn emit_property(&mut self, property: &CsProperty, in_interface: bool) {
        self.emit_modifiers(property.modifiers);
        self.emit_type(&property.ty);
        self.writer.write_space();
        self.writer.write(&escape_identifier(&property.name));
        match &property.accessors {
            CsAccessors::Auto { setter } => {
                match setter {
                    CsAutoSetter::None => self.writer.write(" { get; }"),
                    CsAutoSetter::Set => self.writer.write(" { get; set; }"),
                    CsAutoSetter::Init => self.writer.write(" { get; init; }"),
                }
                self.writer.write_line();
            }
            CsAccessors::ExpressionBodied(expr) => {
                self.writer.write(" => ");
                self.emit_expr(expr);
                self.writer.line(";");
            }
            CsAccessors::Bodied { getter, setter } => {
                self.writer.write_line();
                self.writer.line("{");
                self.writer.increase_indent();
                if let Some(body) = getter {
                    if in_interface {
                        self.writer.line("get;");
                    } else {
                        self.writer.line("get");
                        self.emit_brace_block(body);
                    }
                }
                if let Some(body) = setter {
                    if in_interface {
                        self.writer.line("set;");
                    } else {
                        self.writer.line("set");
                        self.emit_brace_block(body);
                    }
                }
                self.writer.decrease_indent();
                self.writer.line("}");
            }
        }
    }

    fn emit_method(&mut self, method: &CsMethod) {
        self.emit_modifiers(method.modifiers);
        self.emit_type(&method.return_type);
        self.writer.write_space();
        self.writer.write(&escape_identifier(&method.name));
        self.emit_type_parameter_list(&method.type_parameters);
        self.emit_parameter_list(&method.parameters);
        self.emit_constraints(&method.constraints);
        match &method.body {
            Some(body) => {
                self.writer.write_line();
                self.emit_brace_block(body);
            }
            None => self.writer.line(";"),
        }
    }

    fn emit_constructor(&mut self, ctor: &CsConstructor) {
        self.emit_modifiers(ctor.modifiers);
        self.writer.write(&escape_identifier(&ctor.name));
        self.emit_parameter_list(&ctor.parameters);
        if let Some((kind, arguments)) = &ctor.initializer {
            self.writer.write(match kind {
                CsConstructorInitializerKind::Base => " : base(",
                CsConstructorInitializerKind::This => " : this(",
            });
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                self.emit_expr(argument);
            }
            self.writer.write(")");
        }
        self.writer.write_line();
        self.emit_brace_block(&ctor.body);
    }

    fn emit_delegate(&mut self, delegate: &CsDelegate) {
        self.emit_modifiers(delegate.modifiers);
        self.writer.write("delegate ");
        self.emit_type(&delegate.return_type);
        self.writer.write_space();
        self.writer.write(&escape_identifier(&delegate.name));
        self.emit_type_parameter_list(&delegate.type_parameters);
        self.emit_parameter_list(&delegate.parameters);
        self.writer.line(";");
    }

    pub(crate) fn emit_parameter_list(&mut self, parameters: &[CsParameter]) {
        self.writer.write("(");
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_parameter(parameter);
        }
        self.writer.write(")");
    }

    fn emit_parameter(&mut self, parameter: &CsParameter) {
        if let Some(modifier) = parameter.modifier {
            self.writer.write(modifier);
            self.writer.write_space();
        }
        self.emit_type(&parameter.ty);
        self.writer.write_space();
        self.writer.write(&escape_identifier(&parameter.name));
        if let Some(default) = &parameter.default {
            self.writer.write(" = ");
            self.emit_expr(default);
        }
    }

    /// `{` ... `}` with the statements indented one level.
    pub(crate) fn emit_brace_block(&mut self, statements: &[CsStmt]) {
        self.writer.line("{");
        self.writer.increase_indent();
        for statement in statements {
            self.emit_stmt(statement);
        }
        self.writer.decrease_indent();
        self.writer.line("}");
    }
}
