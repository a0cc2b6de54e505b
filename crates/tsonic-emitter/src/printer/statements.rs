//! Statement rendering.
//!
//! Every statement is emitted at the current indentation and ends its
//! line; nested blocks concatenate cleanly because indentation is
//! materialized lazily by the writer.

use super::Printer;
use crate::cs_ast::{CsCatchClause, CsStmt, CsSwitchLabel, CsSwitchSection};
use crate::naming::escape_identifier;

impl Printer {
    pub(crate) fn emit_stmt(&mut self, stmt: &CsStmt) {
        match stmt {
            CsStmt::Block(statements) => self.emit_brace_block(statements),
            CsStmt::LocalDeclaration {
                ty,
                name,
                initializer,
            } => {
                self.emit_type(ty);
                self.writer.write_space();
                self.writer.write(&escape_identifier(name));
                if let Some(initializer) = initializer {
                    self.writer.write(" = ");
                    self.emit_expr(initializer);
                }
                self.writer.line(";");
            }
            CsStmt::LocalFunction(method) => {
                for keyword in method.modifiers.keywords() {
                    self.writer.write(keyword);
                    self.writer.write_space();
                }
                self.emit_type(&method.return_type);
                self.writer.write_space();
                self.writer.write(&escape_identifier(&method.name));
                self.emit_parameter_list(&method.parameters);
                match &method.body {
                    Some(body) => {
                        self.writer.write_line();
                        self.emit_brace_block(body);
                    }
                    None => self.writer.line(";"),
                }
            }
            CsStmt::Expression(expr) => {
                self.emit_expr(expr);
                self.writer.line(";");
            }
            CsStmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.writer.write("if (");
                self.emit_expr(condition);
                self.writer.write(")");
                self.writer.write_line();
                self.emit_embedded(then_branch);
                if let Some(else_branch) = else_branch {
                    if let CsStmt::If { .. } = &**else_branch {
                        self.writer.write("else ");
                        self.emit_stmt(else_branch);
                    } else {
                        self.writer.line("else");
                        self.emit_embedded(else_branch);
                    }
                }
            }
            CsStmt::While { condition, body } => {
                self.writer.write("while (");
                self.emit_expr(condition);
                self.writer.write(")");
                self.writer.write_line();
                self.emit_embedded(body);
            }
            CsStmt::DoWhile { body, condition } => {
                self.writer.line("do");
                self.emit_embedded(body);
                self.writer.write("while (");
                self.emit_expr(condition);
                self.writer.line(");");
            }
            CsStmt::For {
                initializer,
                condition,
                incrementors,
                body,
            } => {
                self.writer.write("for (");
                if let Some(initializer) = initializer {
                    self.emit_for_initializer(initializer);
                }
                self.writer.write("; ");
                if let Some(condition) = condition {
                    self.emit_expr(condition);
                }
                self.writer.write("; ");
                for (i, incrementor) in incrementors.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.emit_expr(incrementor);
                }
                self.writer.write(")");
                self.writer.write_line();
                self.emit_embedded(body);
            }
            CsStmt::Foreach {
                ty,
                identifier,
                expression,
                body,
                is_await,
            } => {
                if *is_await {
                    self.writer.write("await ");
                }
                self.writer.write("foreach (");
                self.emit_type(ty);
                self.writer.write_space();
                self.writer.write(&escape_identifier(identifier));
                self.writer.write(" in ");
                self.emit_expr(expression);
                self.writer.write(")");
                self.writer.write_line();
                self.emit_embedded(body);
            }
            CsStmt::Switch {
                expression,
                sections,
            } => {
                self.writer.write("switch (");
                self.emit_expr(expression);
                self.writer.write(")");
                self.writer.write_line();
                self.writer.line("{");
                self.writer.increase_indent();
                for section in sections {
                    self.emit_switch_section(section);
                }
                self.writer.decrease_indent();
                self.writer.line("}");
            }
            CsStmt::Try {
                block,
                catches,
                finally,
            } => {
                self.writer.line("try");
                self.emit_brace_block(block);
                for catch in catches {
                    self.emit_catch(catch);
                }
                if let Some(finally) = finally {
                    self.writer.line("finally");
                    self.emit_brace_block(finally);
                }
            }
            CsStmt::Throw(expr) => {
                match expr {
                    Some(expr) => {
                        self.writer.write("throw ");
                        self.emit_expr(expr);
                        self.writer.line(";");
                    }
                    None => self.writer.line("throw;"),
                }
            }
            CsStmt::Return(expr) => {
                match expr {
                    Some(expr) => {
                        self.writer.write("return ");
                        self.emit_expr(expr);
                        self.writer.line(";");
                    }
                    None => self.writer.line("return;"),
                }
            }
            CsStmt::Break => self.writer.line("break;"),
            CsStmt::Continue => self.writer.line("continue;"),
            CsStmt::Empty => self.writer.line(";"),
            CsStmt::YieldReturn(expr) => {
                self.writer.write("yield return ");
                self.emit_expr(expr);
                self.writer.line(";");
            }
            CsStmt::YieldBreak => self.writer.line("yield break;"),
        }
    }

    /// Control-flow bodies: blocks print as braces, single statements
    /// print indented on their own line.
    fn emit_embedded(&mut self, stmt: &CsStmt) {
        if let CsStmt::Block(statements) = stmt {
            self.emit_brace_block(statements);
        } else {
            self.writer.increase_indent();
            self.emit_stmt(stmt);
            self.writer.decrease_indent();
        }
    }

    /// `for` initializers print inline without the trailing semicolon.
    fn emit_for_initializer(&mut self, stmt: &CsStmt) {
        match stmt {
            CsStmt::LocalDeclaration {
                ty,
                name,
                initializer,
            } => {
                self.emit_type(ty);
                self.writer.write_space();
                self.writer.write(&escape_identifier(name));
                if let Some(initializer) = initializer {
                    self.writer.write(" = ");
                    self.emit_expr(initializer);
                }
            }
            CsStmt::Expression(expr) => self.emit_expr(expr),
            // Lowering only seeds for-initializers with the two shapes
            // above.
            other => {
                debug_assert!(false, "invalid for initializer: {other:?}");
            }
        }
    }

    fn emit_switch_section(&mut self, section: &CsSwitchSection) {
        for label in &section.labels {
            match label {
                CsSwitchLabel::Case(expr) => {
                    self.writer.write("case ");
                    self.emit_expr(expr);
                    self.writer.line(":");
                }
                CsSwitchLabel::CasePattern {
                    pattern,
                    when_clause,
                } => {
                    self.writer.write("case ");
                    self.emit_pattern(pattern);
                    if let Some(when_clause) = when_clause {
                        self.writer.write(" when ");
                        self.emit_expr(when_clause);
                    }
                    self.writer.line(":");
                }
                CsSwitchLabel::Default => self.writer.line("default:"),
            }
        }
        self.writer.increase_indent();
        for statement in &section.statements {
            self.emit_stmt(statement);
        }
        self.writer.decrease_indent();
    }

    fn emit_catch(&mut self, catch: &CsCatchClause) {
        match (&catch.ty, &catch.identifier) {
            (Some(ty), Some(identifier)) => {
                self.writer.write("catch (");
                self.emit_type(ty);
                self.writer.write_space();
                self.writer.write(&escape_identifier(identifier));
                self.writer.write(")");
                self.writer.write_line();
            }
            (Some(ty), None) => {
                self.writer.write("catch (");
                self.emit_type(ty);
                self.writer.write(")");
                self.writer.write_line();
            }
            _ => self.writer.line("catch"),
        }
        self.emit_brace_block(&catch.block);
    }
}
