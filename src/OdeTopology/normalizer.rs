//! Expression normalizer and the per-conversion deduplication memo.
//!
//! `ParsingMemo` lives exactly as long as one top-level conversion: it is created by the
//! topology emitter and handed down by `&mut` to the propensity extractor.
//!
//! The conversion pipeline works on parsed terms and only calls `ParsingMemo::admit`.
//! `clean_term` and `ParsingMemo::normalize` are the text-level entry for callers that hold raw
//! term strings cut out of a larger expression: they strip the stray operators left around
//! the term, parse it and record it in the memo.
use super::error::OdeTopoError;
use super::expr_parser::parse_expression;
use super::symbolic::SymExpr;
use log::debug;
use std::collections::BTreeSet;

/// set of canonical expressions already emitted as propensities during one conversion
#[derive(Debug, Clone, Default)]
pub struct ParsingMemo {
    seen: BTreeSet<SymExpr>,
}

impl ParsingMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// records `expr`; returns `None` if it was already counted in this run
    pub fn admit(&mut self, expr: SymExpr) -> Option<SymExpr> {
        if self.seen.contains(&expr) {
            debug!("already counted: {}", expr);
            return None;
        }
        self.seen.insert(expr.clone());
        Some(expr)
    }

    /// cleans a raw term text, parses it and passes it through `admit`
    pub fn normalize(&mut self, raw: &str) -> Result<Option<SymExpr>, OdeTopoError> {
        let cleaned = clean_term(raw)?;
        let expr = parse_expression(&cleaned)?;
        Ok(self.admit(expr))
    }

    pub fn contains(&self, expr: &SymExpr) -> bool {
        self.seen.contains(expr)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

/// strips stray multiplication/division operators left around a term:
/// `"*k*A*"` -> `"k*A"`, `"/x"` -> `"1/x"`, `"k/"` -> `"k"`, `"k*/x"` -> `"k/x"`
pub fn clean_term(raw: &str) -> Result<String, OdeTopoError> {
    let mut text = raw.trim_matches('*').trim().replace("*/", "/");
    if text.starts_with('/') {
        text.insert(0, '1');
    }
    if text.ends_with('/') {
        text = text.trim_matches('/').to_string();
    }
    let text = text.trim_matches('*').trim();
    if text.is_empty() {
        return Err(OdeTopoError::MalformedTerm(raw.to_string()));
    }
    Ok(text.to_string())
}
