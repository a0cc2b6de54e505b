//! Literal text construction: numeric literals, string escaping, and
//! interpolated-string text parts.

/// Render an IR number as a C# `double` literal, adding a suffix where
/// needed so integral values stay in floating point.
pub fn number_literal_text(value: f64) -> String {
    if value.is_nan() {
        return "double.NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "double.PositiveInfinity".to_string()
        } else {
            "double.NegativeInfinity".to_string()
        };
    }
    let repr = format!("{value}");
    if repr.contains('.') || repr.contains('e') || repr.contains('E') {
        repr
    } else {
        format!("{repr}.0")
    }
}

/// Render an integral index literal (array sizes, element indices).
pub fn int_literal_text(value: i64) -> String {
    value.to_string()
}

/// Escape a string for a regular C# string literal.
pub fn string_literal_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    push_escaped(&mut out, value, false);
    out.push('"');
    out
}

/// Escape text for the literal part of an interpolated string: the usual
/// string escapes plus doubled braces.
pub fn interpolated_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    push_escaped(&mut out, value, true);
    out
}

fn push_escaped(out: &mut String, value: &str, escape_braces: bool) {
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '{' if escape_braces => out.push_str("{{"),
            '}' if escape_braces => out.push_str("}}"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_force_floating_point() {
        assert_eq!(number_literal_text(0.0), "0.0");
        assert_eq!(number_literal_text(42.0), "42.0");
        assert_eq!(number_literal_text(-3.0), "-3.0");
    }

    #[test]
    fn fractional_numbers_print_plainly() {
        assert_eq!(number_literal_text(3.14159), "3.14159");
        assert_eq!(number_literal_text(0.5), "0.5");
    }

    #[test]
    fn non_finite_numbers_use_double_statics() {
        assert_eq!(number_literal_text(f64::NAN), "double.NaN");
        assert_eq!(number_literal_text(f64::INFINITY), "double.PositiveInfinity");
        assert_eq!(
            number_literal_text(f64::NEG_INFINITY),
            "double.NegativeInfinity"
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(string_literal_text("a\"b"), r#""a\"b""#);
        assert_eq!(string_literal_text("a\\b"), r#""a\\b""#);
        assert_eq!(string_literal_text("a\nb"), r#""a\nb""#);
        assert_eq!(string_literal_text("a\tb"), r#""a\tb""#);
    }

    #[test]
    fn interpolated_text_doubles_braces() {
        assert_eq!(interpolated_text("a{b}c"), "a{{b}}c");
        assert_eq!(interpolated_text("say \"hi\""), "say \\\"hi\\\"");
    }
}
