//! # Canonical symbolic expressions
//!
//! Every expression is kept in expanded canonical form: a sum of monomials, each monomial
//! being a product of atoms raised to numeric exponents and carrying a numeric coefficient.
//! Atoms are symbols, "groups" (sums that could not be distributed, e.g. denominators like
//! `(C**2 + 1)`), function applications and powers with symbolic exponents.
//!
//! Because the form is canonical, two expressions are structurally equal exactly when their
//! `SymExpr` values are equal, so the type can be used as a key of ordered sets and maps.
//! Sums of products are distributed on multiplication, so `expand` is never a separate step.
//! A group keeps the sum exactly as written after expansion: `1/(3*B + 3)` is not rescaled to
//! `(1/3)/(B + 1)`, so coefficients of the outer term stay the coefficients of the ODE.
//!
//! Terms are ordered like sympy prints them: lexicographically descending exponent vectors over
//! the sorted atoms, so `A**2*k` comes before `A*k` and `km` before `m*rm`.
//!
//! Expressions come from and go back to `RustedSciThe` expressions, which do the parsing and
//! the numerical evaluation.
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// largest integer power of a sum that is expanded term by term
const MAX_EXPANDED_POWER: f64 = 32.0;
/// relative size below which a sum of two coefficients is treated as exact cancellation
const CANCELLATION_TOL: f64 = 1e-12;

/// f64 with a total order so it can be stored inside ordered maps
#[derive(Clone, Copy, Debug)]
pub struct Num(pub f64);

impl Num {
    pub fn new(value: f64) -> Self {
        if value == 0.0 { Num(0.0) } else { Num(value) }
    }
    /// exponents are snapped to 12 decimals so that 0.1 + 0.2 and 0.3 compare equal
    fn exponent(value: f64) -> Self {
        Num::new((value * 1e12).round() / 1e12)
    }
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Num {}
impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Num {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = if self.0 == 0.0 { 0.0 } else { self.0 };
        let b = if other.0 == 0.0 { 0.0 } else { other.0 };
        a.total_cmp(&b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Exp,
    Ln,
}

impl Func {
    pub fn name(&self) -> &'static str {
        match self {
            Func::Exp => "exp",
            Func::Ln => "ln",
        }
    }
}

/// irreducible factor of a monomial
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Atom {
    Symbol(String),
    /// multi-term sum kept as a single factor, numeric content untouched
    Group(Box<SymExpr>),
    Func(Func, Box<SymExpr>),
    /// base ** exponent where the exponent is not a number
    Power(Box<SymExpr>, Box<SymExpr>),
}

impl Atom {
    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Atom::Symbol(name) => {
                out.insert(name.clone());
            }
            Atom::Group(inner) | Atom::Func(_, inner) => inner.collect_symbols(out),
            Atom::Power(base, exp) => {
                base.collect_symbols(out);
                exp.collect_symbols(out);
            }
        }
    }

    fn to_rusted(&self) -> Expr {
        match self {
            Atom::Symbol(name) => Expr::Var(name.clone()),
            Atom::Group(inner) => inner.to_rusted(),
            Atom::Func(Func::Exp, arg) => Expr::Exp(Box::new(arg.to_rusted())),
            Atom::Func(Func::Ln, arg) => Expr::Ln(Box::new(arg.to_rusted())),
            Atom::Power(base, exp) => {
                Expr::Pow(Box::new(base.to_rusted()), Box::new(exp.to_rusted()))
            }
        }
    }

    /// text of the atom as it appears in front of `**`
    fn base_text(&self) -> String {
        match self {
            Atom::Symbol(name) => name.clone(),
            Atom::Group(inner) => format!("({})", inner),
            Atom::Func(func, arg) => format!("{}({})", func.name(), arg),
            Atom::Power(base, exp) => format!("(({})**({}))", base, exp),
        }
    }

    fn factor_text(&self, exponent: f64) -> String {
        if exponent == 1.0 {
            self.base_text()
        } else {
            format!("{}**{}", self.base_text(), fmt_num(exponent))
        }
    }
}

/// product of atoms with non-zero exponents; the empty product is 1
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Monomial {
    factors: BTreeMap<Atom, Num>,
}

/// descending exponent vectors: for the first atom where two monomials differ the one with
/// the larger exponent comes first; the empty monomial (the constant) comes last
impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.factors.iter();
        let mut b = other.factors.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (Some((x, ex)), Some((y, ey))) => match x.cmp(y).then_with(|| ey.cmp(ex)) {
                    Ordering::Equal => continue,
                    unequal => return unequal,
                },
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Monomial {
    pub fn one() -> Self {
        Monomial::default()
    }

    pub fn from_atom(atom: Atom, exponent: f64) -> Self {
        let mut factors = BTreeMap::new();
        let exponent = Num::exponent(exponent);
        if exponent.value() != 0.0 {
            factors.insert(atom, exponent);
        }
        Monomial { factors }
    }

    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> impl Iterator<Item = (&Atom, f64)> {
        self.factors.iter().map(|(atom, e)| (atom, e.value()))
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut factors = self.factors.clone();
        for (atom, e) in &other.factors {
            let sum = Num::exponent(factors.get(atom).map_or(0.0, |x| x.value()) + e.value());
            if sum.value() == 0.0 {
                factors.remove(atom);
            } else {
                factors.insert(atom.clone(), sum);
            }
        }
        Monomial { factors }
    }

    pub fn powf(&self, n: f64) -> Monomial {
        let factors = self
            .factors
            .iter()
            .map(|(atom, e)| (atom.clone(), Num::exponent(e.value() * n)))
            .filter(|(_, e)| e.value() != 0.0)
            .collect();
        Monomial { factors }
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        for atom in self.factors.keys() {
            atom.collect_symbols(out);
        }
    }

    fn product_to_rusted(factors: Vec<Expr>) -> Option<Expr> {
        factors
            .into_iter()
            .reduce(|acc, f| Expr::Mul(Box::new(acc), Box::new(f)))
    }

    /// coefficient * monomial as a RustedSciThe expression, negative powers as a division
    fn term_to_rusted(&self, coefficient: f64) -> Expr {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        if coefficient != 1.0 || self.is_one() {
            numerator.push(Expr::Const(coefficient));
        }
        for (atom, e) in &self.factors {
            let e = e.value();
            let target = if e > 0.0 { &mut numerator } else { &mut denominator };
            let e = e.abs();
            if e == 1.0 {
                target.push(atom.to_rusted());
            } else {
                target.push(Expr::Pow(Box::new(atom.to_rusted()), Box::new(Expr::Const(e))));
            }
        }
        let num = Monomial::product_to_rusted(numerator).unwrap_or(Expr::Const(1.0));
        match Monomial::product_to_rusted(denominator) {
            Some(den) => Expr::Div(Box::new(num), Box::new(den)),
            None => num,
        }
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_term(self, 1.0))
    }
}

/// renders `coefficient * monomial` for a non-negative coefficient, sympy style:
/// `2*x`, `A*B*ka/(C**2 + 1)`, `1/x`, `x**2/(y*z)`
pub fn format_term(monomial: &Monomial, coefficient: f64) -> String {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for (atom, e) in monomial.factors() {
        if e > 0.0 {
            numerator.push(atom.factor_text(e));
        } else {
            denominator.push(atom.factor_text(-e));
        }
    }
    let mut head = Vec::new();
    if coefficient != 1.0 || numerator.is_empty() {
        head.push(fmt_num(coefficient));
    }
    head.extend(numerator);
    let mut text = head.join("*");
    match denominator.len() {
        0 => {}
        1 => {
            text.push('/');
            text.push_str(&denominator[0]);
        }
        _ => text.push_str(&format!("/({})", denominator.join("*"))),
    }
    text
}

/// integers without fraction part, everything else in shortest form
pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Python-float-like formatting used in reaction lines: `1.0`, `2.5`
pub fn py_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// expression in canonical expanded form: monomial -> non-zero coefficient
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SymExpr {
    terms: BTreeMap<Monomial, Num>,
}

impl SymExpr {
    pub fn zero() -> Self {
        SymExpr::default()
    }

    pub fn constant(value: f64) -> Self {
        SymExpr::from_term(Monomial::one(), value)
    }

    pub fn symbol(name: &str) -> Self {
        SymExpr::from_term(Monomial::from_atom(Atom::Symbol(name.to_string()), 1.0), 1.0)
    }

    pub fn from_term(monomial: Monomial, coefficient: f64) -> Self {
        let mut expr = SymExpr::zero();
        expr.add_term(monomial, coefficient);
        expr
    }

    fn from_atom(atom: Atom, exponent: f64, coefficient: f64) -> Self {
        SymExpr::from_term(Monomial::from_atom(atom, exponent), coefficient)
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        let existing = self.terms.get(&monomial).map_or(0.0, |c| c.value());
        let sum = existing + coefficient;
        if sum == 0.0 || sum.abs() <= CANCELLATION_TOL * existing.abs().max(coefficient.abs()) {
            self.terms.remove(&monomial);
        } else {
            self.terms.insert(monomial, Num::new(sum));
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// the numeric value if the expression contains no symbols at all
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| c.value()),
            _ => None,
        }
    }

    /// the single (monomial, coefficient) pair of a one-term expression
    pub fn as_single_term(&self) -> Option<(&Monomial, f64)> {
        if self.terms.len() == 1 {
            self.terms.iter().next().map(|(m, c)| (m, c.value()))
        } else {
            None
        }
    }

    /// additive terms in display order, the constant term last
    pub fn terms(&self) -> Vec<(&Monomial, f64)> {
        self.terms.iter().map(|(m, c)| (m, c.value())).collect()
    }

    pub fn add(&self, other: &SymExpr) -> SymExpr {
        let mut result = self.clone();
        for (m, c) in &other.terms {
            result.add_term(m.clone(), c.value());
        }
        result
    }

    pub fn neg(&self) -> SymExpr {
        self.scale(-1.0)
    }

    pub fn sub(&self, other: &SymExpr) -> SymExpr {
        self.add(&other.neg())
    }

    pub fn scale(&self, factor: f64) -> SymExpr {
        let mut result = SymExpr::zero();
        for (m, c) in &self.terms {
            result.add_term(m.clone(), c.value() * factor);
        }
        result
    }

    pub fn mul(&self, other: &SymExpr) -> SymExpr {
        let mut result = SymExpr::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                result.add_term(m1.mul(m2), c1.value() * c2.value());
            }
        }
        result
    }

    /// self / other; the caller guarantees `other` is not zero
    pub fn div(&self, other: &SymExpr) -> SymExpr {
        self.mul(&other.powf(-1.0))
    }

    pub fn pow(&self, exponent: &SymExpr) -> SymExpr {
        match exponent.as_constant() {
            Some(n) => self.powf(n),
            None => SymExpr::from_atom(
                Atom::Power(Box::new(self.clone()), Box::new(exponent.clone())),
                1.0,
                1.0,
            ),
        }
    }

    pub fn powf(&self, n: f64) -> SymExpr {
        if n == 0.0 {
            return SymExpr::constant(1.0);
        }
        if n == 1.0 {
            return self.clone();
        }
        let integer = n.fract() == 0.0;
        if let Some((monomial, c)) = self.as_single_term() {
            if c > 0.0 || integer {
                return SymExpr::from_term(monomial.powf(n), c.powf(n));
            }
        }
        if self.is_zero() {
            return SymExpr::zero();
        }
        if integer && n > 0.0 && n <= MAX_EXPANDED_POWER && self.len() > 1 {
            let mut result = self.clone();
            for _ in 1..(n as usize) {
                result = result.mul(self);
            }
            return result;
        }
        SymExpr::from_atom(Atom::Group(Box::new(self.clone())), n, 1.0)
    }

    pub fn exp(arg: SymExpr) -> SymExpr {
        match arg.as_constant() {
            Some(c) => SymExpr::constant(c.exp()),
            None => SymExpr::from_atom(Atom::Func(Func::Exp, Box::new(arg)), 1.0, 1.0),
        }
    }

    pub fn ln(arg: SymExpr) -> SymExpr {
        match arg.as_constant() {
            Some(c) if c > 0.0 => SymExpr::constant(c.ln()),
            _ => SymExpr::from_atom(Atom::Func(Func::Ln, Box::new(arg)), 1.0, 1.0),
        }
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        for m in self.terms.keys() {
            m.collect_symbols(out);
        }
    }

    /// all symbol names the expression depends on
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    /// same monomials with coefficients equal up to a relative tolerance
    pub fn approx_eq(&self, other: &SymExpr, tol: f64) -> bool {
        self.terms.len() == other.terms.len()
            && self.terms.iter().all(|(m, c)| match other.terms.get(m) {
                Some(d) => {
                    let (a, b) = (c.value(), d.value());
                    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
                }
                None => false,
            })
    }

    pub fn to_rusted(&self) -> Expr {
        let mut acc: Option<Expr> = None;
        for (m, c) in self.terms() {
            acc = Some(match acc {
                None => m.term_to_rusted(c),
                Some(prev) if c < 0.0 => Expr::Sub(Box::new(prev), Box::new(m.term_to_rusted(-c))),
                Some(prev) => Expr::Add(Box::new(prev), Box::new(m.term_to_rusted(c))),
            });
        }
        acc.unwrap_or(Expr::Const(0.0))
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.terms();
        if terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (m, c)) in terms.iter().enumerate() {
            let body = format_term(m, c.abs());
            match (i, *c < 0.0) {
                (0, true) => write!(f, "-{}", body)?,
                (0, false) => write!(f, "{}", body)?,
                (_, true) => write!(f, " - {}", body)?,
                (_, false) => write!(f, " + {}", body)?,
            }
        }
        Ok(())
    }
}

impl Serialize for SymExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
