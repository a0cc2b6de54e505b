//! Expression rendering with precedence-correct parenthesization.
//!
//! Children are wrapped iff their precedence is strictly lower than the
//! position's minimum; same-precedence right operands of left-associative
//! operators are wrapped, same-precedence right operands of assignment
//! are not. `throw` expressions are never parenthesized (the grammar
//! forbids it); lowering only places them in the positions that admit
//! them.

use super::Printer;
use crate::cs_ast::{
    CsBinaryOp, CsExpr, CsInterpolationPart, CsLambdaBody, CsPattern, CsPrefixOp,
};
use crate::naming::escape_identifier;

pub(crate) const PREC_ASSIGNMENT: u8 = 1;
pub(crate) const PREC_TERNARY: u8 = 2;
pub(crate) const PREC_COALESCE: u8 = 3;
pub(crate) const PREC_LOGICAL_OR: u8 = 4;
pub(crate) const PREC_LOGICAL_AND: u8 = 5;
pub(crate) const PREC_BIT_OR: u8 = 6;
pub(crate) const PREC_BIT_XOR: u8 = 7;
pub(crate) const PREC_BIT_AND: u8 = 8;
pub(crate) const PREC_EQUALITY: u8 = 9;
pub(crate) const PREC_RELATIONAL: u8 = 10;
pub(crate) const PREC_SHIFT: u8 = 11;
pub(crate) const PREC_ADDITIVE: u8 = 12;
pub(crate) const PREC_MULTIPLICATIVE: u8 = 13;
pub(crate) const PREC_UNARY: u8 = 14;
pub(crate) const PREC_POSTFIX: u8 = 15;
pub(crate) const PREC_PRIMARY: u8 = 16;

pub(crate) fn binary_precedence(op: CsBinaryOp) -> u8 {
    match op {
        CsBinaryOp::Coalesce => PREC_COALESCE,
        CsBinaryOp::LogicalOr => PREC_LOGICAL_OR,
        CsBinaryOp::LogicalAnd => PREC_LOGICAL_AND,
        CsBinaryOp::BitOr => PREC_BIT_OR,
        CsBinaryOp::BitXor => PREC_BIT_XOR,
        CsBinaryOp::BitAnd => PREC_BIT_AND,
        CsBinaryOp::Equals | CsBinaryOp::NotEquals => PREC_EQUALITY,
        CsBinaryOp::Less
        | CsBinaryOp::LessEqual
        | CsBinaryOp::Greater
        | CsBinaryOp::GreaterEqual => PREC_RELATIONAL,
        CsBinaryOp::ShiftLeft | CsBinaryOp::ShiftRight => PREC_SHIFT,
        CsBinaryOp::Add | CsBinaryOp::Subtract => PREC_ADDITIVE,
        CsBinaryOp::Multiply | CsBinaryOp::Divide | CsBinaryOp::Remainder => PREC_MULTIPLICATIVE,
    }
}

pub(crate) fn precedence(expr: &CsExpr) -> u8 {
    match expr {
        // Lambdas and throw expressions sit below everything; assignment
        // right-hand sides admit them without parens.
        CsExpr::Lambda { .. } | CsExpr::Throw(_) => PREC_ASSIGNMENT,
        CsExpr::Assignment { .. } => PREC_ASSIGNMENT,
        CsExpr::Conditional { .. } | CsExpr::SwitchExpression { .. } => PREC_TERNARY,
        CsExpr::Binary { op, .. } => binary_precedence(*op),
        CsExpr::Is { .. } | CsExpr::As { .. } => PREC_RELATIONAL,
        CsExpr::PrefixUnary { .. } | CsExpr::Cast { .. } | CsExpr::Await(_) => PREC_UNARY,
        CsExpr::PostfixUnary { .. } | CsExpr::SuppressNullableWarning(_) => PREC_POSTFIX,
        _ => PREC_PRIMARY,
    }
}

impl Printer {
    pub(crate) fn emit_expr(&mut self, expr: &CsExpr) {
        self.emit_expr_min(expr, 0);
    }

    /// Emit `expr`, wrapping in parentheses when its precedence falls
    /// below `min`.
    pub(crate) fn emit_expr_min(&mut self, expr: &CsExpr, min: u8) {
        // A parenthesized `throw` is not grammatical C#.
        if matches!(expr, CsExpr::Throw(_)) {
            self.emit_expr_raw(expr);
            return;
        }
        if precedence(expr) < min {
            self.writer.write("(");
            self.emit_expr_raw(expr);
            self.writer.write(")");
        } else {
            self.emit_expr_raw(expr);
        }
    }

    fn emit_receiver(&mut self, receiver: &CsExpr) {
        if receiver.is_primary() {
            self.emit_expr_raw(receiver);
        } else {
            self.writer.write("(");
            self.emit_expr_raw(receiver);
            self.writer.write(")");
        }
    }

    fn emit_expr_raw(&mut self, expr: &CsExpr) {
        match expr {
            CsExpr::Literal(text) | CsExpr::Raw(text) => self.writer.write(text),
            CsExpr::Identifier(name) => {
                self.writer
                    .write(&crate::naming::escape_qualified_name(name));
            }
            CsExpr::Parenthesized(inner) => {
                self.writer.write("(");
                self.emit_expr_raw(inner);
                self.writer.write(")");
            }
            CsExpr::MemberAccess {
                receiver,
                name,
                conditional,
            } => {
                self.emit_receiver(receiver);
                self.writer.write(if *conditional { "?." } else { "." });
                self.writer.write(&escape_identifier(name));
            }
            CsExpr::ElementAccess {
                receiver,
                arguments,
                conditional,
            } => {
                self.emit_receiver(receiver);
                if *conditional {
                    self.writer.write("?");
                }
                self.writer.write("[");
                self.emit_argument_list(arguments);
                self.writer.write("]");
            }
            CsExpr::Invocation {
                callee,
                type_arguments,
                arguments,
            } => {
                self.emit_receiver(callee);
                if !type_arguments.is_empty() {
                    self.writer.write("<");
                    for (i, argument) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            self.writer.write(", ");
                        }
                        self.emit_type(argument);
                    }
                    self.writer.write(">");
                }
                self.writer.write("(");
                self.emit_argument_list(arguments);
                self.writer.write(")");
            }
            CsExpr::ObjectCreation {
                ty,
                arguments,
                initializer,
            } => {
                self.writer.write("new ");
                self.emit_type(ty);
                if !arguments.is_empty() || initializer.is_none() {
                    self.writer.write("(");
                    self.emit_argument_list(arguments);
                    self.writer.write(")");
                }
                if let Some(assignments) = initializer {
                    if assignments.is_empty() {
                        self.writer.write(" { }");
                    } else {
                        self.writer.write(" { ");
                        for (i, (name, value)) in assignments.iter().enumerate() {
                            if i > 0 {
                                self.writer.write(", ");
                            }
                            self.writer.write(&escape_identifier(name));
                            self.writer.write(" = ");
                            self.emit_expr_min(value, 0);
                        }
                        self.writer.write(" }");
                    }
                }
            }
            CsExpr::ArrayCreation {
                element_type,
                length,
                initializer,
            } => {
                self.writer.write("new");
                match element_type {
                    Some(element) => {
                        self.writer.write_space();
                        self.emit_type(element);
                        self.writer.write("[");
                        if let Some(length) = length {
                            self.emit_expr_min(length, 0);
                        }
                        self.writer.write("]");
                    }
                    None => self.writer.write("[]"),
                }
                if let Some(elements) = initializer {
                    if elements.is_empty() {
                        self.writer.write(" { }");
                    } else {
                        self.writer.write(" { ");
                        self.emit_argument_list(elements);
                        self.writer.write(" }");
                    }
                }
            }
            CsExpr::StackAllocArrayCreation {
                element_type,
                length,
            } => {
                self.writer.write("stackalloc ");
                self.emit_type(element_type);
                self.writer.write("[");
                self.emit_expr_min(length, 0);
                self.writer.write("]");
            }
            CsExpr::Assignment { target, op, value } => {
                self.emit_expr_min(target, PREC_ASSIGNMENT + 1);
                self.writer.write_space();
                self.writer.write(op.text());
                self.writer.write_space();
                // Right-associative: same-precedence right operands stay
                // bare.
                self.emit_expr_min(value, PREC_ASSIGNMENT);
            }
            CsExpr::Binary { op, left, right } => {
                let prec = binary_precedence(*op);
                self.emit_expr_min(left, prec);
                self.writer.write_space();
                self.writer.write(op.text());
                self.writer.write_space();
                if matches!(&**right, CsExpr::Throw(_)) && *op == CsBinaryOp::Coalesce {
                    self.emit_expr_raw(right);
                } else {
                    self.emit_expr_min(right, prec + 1);
                }
            }
            CsExpr::PrefixUnary { op, operand } => {
                self.writer.write(op.text());
                // `- -x` must not fuse into `--x`.
                if matches!(
                    (op, &**operand),
                    (
                        CsPrefixOp::Minus,
                        CsExpr::PrefixUnary {
                            op: CsPrefixOp::Minus | CsPrefixOp::Decrement,
                            ..
                        }
                    ) | (
                        CsPrefixOp::Plus,
                        CsExpr::PrefixUnary {
                            op: CsPrefixOp::Plus | CsPrefixOp::Increment,
                            ..
                        }
                    )
                ) {
                    self.writer.write("(");
                    self.emit_expr_raw(operand);
                    self.writer.write(")");
                } else {
                    self.emit_expr_min(operand, PREC_UNARY);
                }
            }
            CsExpr::PostfixUnary { op, operand } => {
                self.emit_expr_min(operand, PREC_POSTFIX);
                self.writer.write(op.text());
            }
            CsExpr::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_expr_min(condition, PREC_TERNARY + 1);
                self.writer.write(" ? ");
                self.emit_expr_min(when_true, PREC_TERNARY);
                self.writer.write(" : ");
                self.emit_expr_min(when_false, PREC_TERNARY);
            }
            CsExpr::Cast { ty, operand } => {
                self.writer.write("(");
                self.emit_type(ty);
                self.writer.write(")");
                // Cast operands that begin with a sign are wrapped so the
                // cast cannot reparse as arithmetic.
                if starts_with_sign(operand) {
                    self.writer.write("(");
                    self.emit_expr_raw(operand);
                    self.writer.write(")");
                } else {
                    self.emit_expr_min(operand, PREC_UNARY);
                }
            }
            CsExpr::As { operand, ty } => {
                self.emit_expr_min(operand, PREC_RELATIONAL);
                self.writer.write(" as ");
                self.emit_type(ty);
            }
            CsExpr::Is { operand, pattern } => {
                self.emit_expr_min(operand, PREC_RELATIONAL);
                self.writer.write(" is ");
                self.emit_pattern(pattern);
            }
            CsExpr::Default(ty) => match ty {
                Some(ty) => {
                    self.writer.write("default(");
                    self.emit_type(ty);
                    self.writer.write(")");
                }
                None => self.writer.write("default"),
            },
            CsExpr::Await(operand) => {
                self.writer.write("await ");
                self.emit_expr_min(operand, PREC_UNARY);
            }
            CsExpr::Lambda {
                parameters,
                body,
                is_async,
            } => {
                if *is_async {
                    self.writer.write("async ");
                }
                if parameters.len() == 1 && parameters[0].ty.is_none() {
                    self.writer.write(&escape_identifier(&parameters[0].name));
                } else {
                    self.writer.write("(");
                    for (i, parameter) in parameters.iter().enumerate() {
                        if i > 0 {
                            self.writer.write(", ");
                        }
                        if let Some(ty) = &parameter.ty {
                            self.emit_type(ty);
                            self.writer.write_space();
                        }
                        self.writer.write(&escape_identifier(&parameter.name));
                    }
                    self.writer.write(")");
                }
                self.writer.write(" =>");
                match body {
                    CsLambdaBody::Expression(expr) => {
                        self.writer.write_space();
                        self.emit_expr_min(expr, 0);
                    }
                    CsLambdaBody::Block(statements) => {
                        self.writer.write_line();
                        self.writer.line("{");
                        self.writer.increase_indent();
                        for statement in statements {
                            self.emit_stmt(statement);
                        }
                        self.writer.decrease_indent();
                        self.writer.write("}");
                    }
                }
            }
            CsExpr::InterpolatedString(parts) => self.emit_interpolated_string(parts),
            CsExpr::Throw(operand) => {
                self.writer.write("throw ");
                self.emit_expr_min(operand, PREC_COALESCE);
            }
            CsExpr::SuppressNullableWarning(operand) => {
                self.emit_expr_min(operand, PREC_POSTFIX);
                self.writer.write("!");
            }
            CsExpr::Typeof(ty) => {
                self.writer.write("typeof(");
                self.emit_type(ty);
                self.writer.write(")");
            }
            CsExpr::SwitchExpression { operand, arms } => {
                self.emit_expr_min(operand, PREC_POSTFIX);
                self.writer.write(" switch");
                self.writer.write_line();
                self.writer.line("{");
                self.writer.increase_indent();
                for (i, arm) in arms.iter().enumerate() {
                    self.emit_pattern(&arm.pattern);
                    if let Some(when_clause) = &arm.when_clause {
                        self.writer.write(" when ");
                        self.emit_expr_min(when_clause, 0);
                    }
                    self.writer.write(" => ");
                    self.emit_expr_min(&arm.result, 0);
                    if i + 1 < arms.len() {
                        self.writer.write(",");
                    }
                    self.writer.write_line();
                }
                self.writer.decrease_indent();
                self.writer.write("}");
            }
        }
    }

    fn emit_argument_list(&mut self, arguments: &[CsExpr]) {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_expr_min(argument, 0);
        }
    }

    pub(crate) fn emit_pattern(&mut self, pattern: &CsPattern) {
        match pattern {
            CsPattern::Type(ty) => self.emit_type(ty),
            CsPattern::Declaration { ty, designator } => {
                self.emit_type(ty);
                self.writer.write_space();
                self.writer.write(&escape_identifier(designator));
            }
            CsPattern::Var(designator) => {
                self.writer.write("var ");
                self.writer.write(&escape_identifier(designator));
            }
            CsPattern::Constant(expr) => self.emit_expr_min(expr, PREC_PRIMARY),
            CsPattern::Discard => self.writer.write("_"),
            CsPattern::Not(inner) => {
                self.writer.write("not ");
                self.emit_pattern(inner);
            }
        }
    }

    /// Interpolated strings: text parts verbatim, expression parts in
    /// `{...}`. Expression text containing `:` is wrapped in parentheses
    /// so it cannot misparse as a format clause.
    fn emit_interpolated_string(&mut self, parts: &[CsInterpolationPart]) {
        self.writer.write("$\"");
        for part in parts {
            match part {
                CsInterpolationPart::Text(text) => self.writer.write(text),
                CsInterpolationPart::Expression { expression, format } => {
                    self.writer.write("{");
                    let rendered = {
                        let mut sub = Printer::new(self.indent_width());
                        for _ in 0..self.writer.indent_level() {
                            sub.writer.increase_indent();
                        }
                        sub.emit_expr(expression);
                        sub.finish()
                    };
                    if format.is_none() && memchr::memchr(b':', rendered.as_bytes()).is_some() {
                        self.writer.write("(");
                        self.writer.write(&rendered);
                        self.writer.write(")");
                    } else {
                        self.writer.write(&rendered);
                    }
                    if let Some(format) = format {
                        self.writer.write(":");
                        self.writer.write(format);
                    }
                    self.writer.write("}");
                }
            }
        }
        self.writer.write("\"");
    }
}

fn starts_with_sign(expr: &CsExpr) -> bool {
    match expr {
        CsExpr::PrefixUnary { op, .. } => matches!(
            op,
            CsPrefixOp::Minus | CsPrefixOp::Plus | CsPrefixOp::Decrement | CsPrefixOp::Increment
        ),
        CsExpr::Literal(text) => text.starts_with('-') || text.starts_with('+'),
        _ => false,
    }
}
