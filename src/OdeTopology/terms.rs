//! Term splitting and propensity extraction.
//!
//! Both work on the canonical tree: the additive terms of an expanded expression are simply
//! the operands of its top-level sum, and the propensity of a term is its monomial with the
//! numeric coefficient set to 1.
use super::error::OdeTopoError;
use super::normalizer::ParsingMemo;
use super::symbolic::{Monomial, SymExpr, format_term};
use log::debug;

/// one additive term of an expanded expression: coefficient * core
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub core: Monomial,
}

impl Term {
    pub fn as_expr(&self) -> SymExpr {
        SymExpr::from_term(self.core.clone(), self.coefficient)
    }

    /// a term that is a bare number (no symbols)
    pub fn is_constant(&self) -> bool {
        self.core.is_one()
    }

    /// the term stripped of its numeric coefficient
    pub fn propensity(&self) -> Result<SymExpr, OdeTopoError> {
        if self.is_constant() {
            return Err(OdeTopoError::MalformedTerm(self.signed_text(true)));
        }
        Ok(SymExpr::from_term(self.core.clone(), 1.0))
    }

    /// term text with its sign, e.g. `-m*rm`; a positive leading term has no sign
    pub fn signed_text(&self, first: bool) -> String {
        let body = format_term(&self.core, self.coefficient.abs());
        if self.coefficient < 0.0 {
            format!("-{}", body)
        } else if first {
            body
        } else {
            format!("+{}", body)
        }
    }
}

/// top-level additive terms in display order; the zero expression has none
pub fn split_terms(expr: &SymExpr) -> Vec<Term> {
    expr.terms()
        .into_iter()
        .map(|(core, coefficient)| Term {
            coefficient,
            core: core.clone(),
        })
        .collect()
}

/// sign-prefixed text of every additive term: `"kp*m - P*rp"` -> `["-P*rp", "+kp*m"]`
pub fn term_strings(expr: &SymExpr) -> Vec<String> {
    split_terms(expr)
        .iter()
        .enumerate()
        .map(|(i, t)| t.signed_text(i == 0))
        .collect()
}

/// appends to `prop` every propensity of `expr` not yet counted in this run
pub fn extract_propensities(
    expr: &SymExpr,
    memo: &mut ParsingMemo,
    prop: &mut Vec<SymExpr>,
) -> Result<(), OdeTopoError> {
    for term in split_terms(expr) {
        if let Some(p) = memo.admit(term.propensity()?) {
            debug!("new propensity: {}", p);
            prop.push(p);
        }
    }
    Ok(())
}
