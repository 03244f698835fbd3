//! ODE right-hand sides as canonical `SymExpr`.
//!
//! Parsing is done by `RustedSciThe` (`parse_expr::parse_expression_func`); its `Expr` tree is
//! then lowered into the expanded canonical form. Before the text is handed over it is
//! rewritten into the subset the `RustedSciThe` parser reads unambiguously:
//! - `**` becomes `^`
//! - numbers are written as plain decimals (`2.5e-3` -> `0.0025`)
//! - every minus sign becomes an explicit `(0-1)` factor (`a - b` -> `a+(0-1)*b`,
//!   `x^-2` -> `x^((0-1)*2)`), so `-x^2` is `-(x^2)` and subtractions stay left-associative
//! - a product is split at its first `/`, so every further `/` of the same product is written
//!   as `*1/` (`a/b/c` -> `a/b*1/c`)
//!
//! Functions are those the `RustedSciThe` parser knows; `exp` and `ln` are lowered, anything
//! else is reported as unsupported.
use super::error::OdeTopoError;
use super::symbolic::SymExpr;
use RustedSciThe::symbolic::parse_expr::parse_expression_func;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::debug;

const NEG_ONE: &str = "(0-1)";

/// state of one parenthesis level
#[derive(Default)]
struct Frame {
    /// the current product already has a `/`
    divided: bool,
    /// the parenthesis closes a negated operand of `/` or `^`
    closes_negation: bool,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// end of the numeric literal starting at `start`, exponent included
fn number_end(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    if i < chars.len() && matches!(chars[i], 'e' | 'E') {
        let mut j = i + 1;
        if j < chars.len() && matches!(chars[j], '+' | '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// rewrites the text for the `RustedSciThe` parser, see the module doc
pub fn prepare_text(input: &str) -> Result<String, OdeTopoError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(OdeTopoError::parse(input, "empty expression"));
    }
    if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
        return Err(OdeTopoError::parse(input, format!("unexpected character '{}'", c)));
    }
    let chars: Vec<char> = text
        .replace("**", "^")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(chars.len() + 16);
    let mut frames = vec![Frame::default()];
    let mut negate_next = false;
    let mut prev: Option<char> = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if is_name_char(c) && !c.is_ascii_digit() => {
                let end = (i..chars.len()).find(|&j| !is_name_char(chars[j])).unwrap_or(chars.len());
                out.extend(&chars[i..end]);
                // a function call keeps the negation open until its ')'
                if negate_next && chars.get(end) != Some(&'(') {
                    out.push(')');
                    negate_next = false;
                }
                i = end;
                prev = Some('x');
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let end = number_end(&chars, i);
                let literal: String = chars[i..end].iter().collect();
                let value: f64 = literal.parse().map_err(|_| {
                    OdeTopoError::parse(input, format!("invalid number '{}'", literal))
                })?;
                out.push_str(&value.to_string());
                if negate_next {
                    out.push(')');
                    negate_next = false;
                }
                i = end;
                prev = Some('0');
                continue;
            }
            '(' => {
                frames.push(Frame {
                    divided: false,
                    closes_negation: negate_next,
                });
                negate_next = false;
                out.push('(');
            }
            ')' => {
                if frames.len() == 1 {
                    return Err(OdeTopoError::parse(input, "unbalanced ')'"));
                }
                out.push(')');
                if frames.pop().is_some_and(|f| f.closes_negation) {
                    out.push(')');
                }
            }
            '*' => {
                if let Some(frame) = frames.last_mut() {
                    frame.divided = false;
                }
                out.push('*');
            }
            '/' => {
                if let Some(frame) = frames.last_mut() {
                    if frame.divided {
                        out.push_str("*1/");
                    } else {
                        frame.divided = true;
                        out.push('/');
                    }
                }
            }
            '-' if matches!(prev, Some('/') | Some('^')) => {
                if negate_next {
                    return Err(OdeTopoError::parse(input, "repeated sign after an operator"));
                }
                out.push('(');
                out.push_str(NEG_ONE);
                out.push('*');
                negate_next = true;
            }
            '+' if matches!(prev, Some('/') | Some('^')) => {}
            '+' | '-' => {
                if let Some(frame) = frames.last_mut() {
                    frame.divided = false;
                }
                let unary = matches!(prev, None | Some('(') | Some('*') | Some('+') | Some('-'));
                match (c, unary) {
                    ('+', true) => {}
                    ('+', false) => out.push('+'),
                    (_, true) => {
                        out.push_str(NEG_ONE);
                        out.push('*');
                    }
                    (_, false) => {
                        out.push('+');
                        out.push_str(NEG_ONE);
                        out.push('*');
                    }
                }
            }
            '^' => out.push('^'),
            other => {
                return Err(OdeTopoError::parse(input, format!("unexpected character '{}'", other)));
            }
        }
        prev = Some(c);
        i += 1;
    }
    if frames.len() != 1 || negate_next {
        return Err(OdeTopoError::parse(input, "expected ')' or an operand"));
    }
    Ok(out)
}

/// canonical form of a `RustedSciThe` expression
pub fn lower(expr: &Expr, input: &str) -> Result<SymExpr, OdeTopoError> {
    #[allow(unreachable_patterns)]
    let lowered = match expr {
        Expr::Var(name) => SymExpr::symbol(name),
        Expr::Const(value) => SymExpr::constant(*value),
        Expr::Add(lhs, rhs) => lower(lhs, input)?.add(&lower(rhs, input)?),
        Expr::Sub(lhs, rhs) => lower(lhs, input)?.sub(&lower(rhs, input)?),
        Expr::Mul(lhs, rhs) => lower(lhs, input)?.mul(&lower(rhs, input)?),
        Expr::Div(lhs, rhs) => {
            let divisor = lower(rhs, input)?;
            if divisor.is_zero() {
                return Err(OdeTopoError::parse(input, "division by zero"));
            }
            lower(lhs, input)?.div(&divisor)
        }
        Expr::Pow(base, exponent) => {
            let base = lower(base, input)?;
            let exponent = lower(exponent, input)?;
            if base.is_zero() && exponent.as_constant().is_some_and(|n| n < 0.0) {
                return Err(OdeTopoError::parse(input, "division by zero"));
            }
            base.pow(&exponent)
        }
        Expr::Exp(arg) => SymExpr::exp(lower(arg, input)?),
        Expr::Ln(arg) => SymExpr::ln(lower(arg, input)?),
        other => {
            return Err(OdeTopoError::parse(
                input,
                format!("unsupported function in '{}'", other),
            ));
        }
    };
    Ok(lowered)
}

/// parses and expands an expression such as `"ka*A*B/(1+C**2) - 2*kd*D"`
pub fn parse_expression(input: &str) -> Result<SymExpr, OdeTopoError> {
    let text = prepare_text(input)?;
    debug!("'{}' -> '{}'", input, text);
    let expr = parse_expression_func(0, &text).map_err(|e| OdeTopoError::parse(input, e))?;
    lower(&expr, input)
}

/// parses every expression of a vector, stopping at the first failure
pub fn parse_vector_expression(inputs: &[String]) -> Result<Vec<SymExpr>, OdeTopoError> {
    inputs.iter().map(|s| parse_expression(s)).collect()
}
