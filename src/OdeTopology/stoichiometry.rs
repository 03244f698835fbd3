//! # Stoichiometry solver
//!
//! For every species i and propensity j the coefficient `M[i][j]` is the sum of the numeric
//! quotients `term / propensity_j` over the additive terms of the i-th ODE. Quotients that
//! still contain symbols do not match the propensity and contribute nothing.
//!
//! The result satisfies `sum_j M[i][j] * w_j == dx_i/dt` after expansion; `reconstruct` and
//! `reproduces` check exactly that.
use super::error::OdeTopoError;
use super::expr_parser::parse_vector_expression;
use super::normalizer::ParsingMemo;
use super::symbolic::{SymExpr, fmt_num};
use super::terms::{Term, extract_propensities, split_terms};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{info, warn};
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table, row};

/// result of dividing one term by one propensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quotient {
    Numeric(f64),
    NotApplicable,
}

pub fn term_quotient(term: &Term, propensity: &SymExpr) -> Quotient {
    match term.as_expr().div(propensity).as_constant() {
        Some(value) => Quotient::Numeric(value),
        None => Quotient::NotApplicable,
    }
}

/// stoichiometric matrix (species x propensities) and the propensity vector
#[derive(Debug, Clone)]
pub struct StoichData {
    pub stoich: DMatrix<f64>,
    pub propensities: Vec<SymExpr>,
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// builds the propensity vector and the stoichiometric matrix of already expanded ODEs
pub fn get_prop_stoich(
    odes: &[SymExpr],
    memo: &mut ParsingMemo,
) -> Result<StoichData, OdeTopoError> {
    let mut propensities = Vec::new();
    for ode in odes {
        extract_propensities(ode, memo, &mut propensities)?;
    }
    info!(
        "{} propensities extracted from {} ODEs",
        propensities.len(),
        odes.len()
    );

    let mut stoich: DMatrix<f64> = DMatrix::zeros(odes.len(), propensities.len());
    for (i, ode) in odes.iter().enumerate() {
        let terms = split_terms(ode);
        for (j, w) in propensities.iter().enumerate() {
            for term in &terms {
                if let Quotient::Numeric(value) = term_quotient(term, w) {
                    stoich[(i, j)] += value;
                }
            }
        }
    }
    let data = StoichData {
        stoich,
        propensities,
    };
    if !data.reproduces(odes) {
        warn!("stoichiometric matrix times propensity vector does not reproduce the ODEs");
    }
    Ok(data)
}

/// parses the ODE strings and solves them with a fresh memo
pub fn prop_stoich_from_strings(dxdt: &[String]) -> Result<(Vec<SymExpr>, StoichData), OdeTopoError> {
    let odes = parse_vector_expression(dxdt)?;
    let mut memo = ParsingMemo::new();
    let data = get_prop_stoich(&odes, &mut memo)?;
    Ok((odes, data))
}

impl StoichData {
    pub fn n_species(&self) -> usize {
        self.stoich.nrows()
    }

    pub fn n_reactions(&self) -> usize {
        self.stoich.ncols()
    }

    /// copy of the matrix rounded for display
    pub fn rounded(&self, decimals: u32) -> DMatrix<f64> {
        self.stoich.map(|v| round_to(v, decimals))
    }

    pub fn matrix_rows(&self, decimals: u32) -> Vec<Vec<f64>> {
        let m = self.rounded(decimals);
        m.row_iter().map(|r| r.iter().copied().collect()).collect()
    }

    /// sum_j M[i][j] * w_j for every species
    pub fn reconstruct(&self) -> Vec<SymExpr> {
        (0..self.n_species())
            .map(|i| {
                self.propensities
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| self.stoich[(i, *j)] != 0.0)
                    .fold(SymExpr::zero(), |acc, (j, w)| {
                        acc.add(&w.scale(self.stoich[(i, j)]))
                    })
            })
            .collect()
    }

    pub fn reproduces(&self, odes: &[SymExpr]) -> bool {
        let rebuilt = self.reconstruct();
        rebuilt.len() == odes.len()
            && rebuilt
                .iter()
                .zip(odes.iter())
                .all(|(a, b)| a.approx_eq(b, 1e-9))
    }

    /// reconstructed right-hand sides as RustedSciThe expressions
    pub fn to_rusted_odes(&self) -> Vec<Expr> {
        self.reconstruct().iter().map(|e| e.to_rusted()).collect()
    }

    /// prints reconstructed ODEs, the stoichiometric matrix and the propensity vector
    pub fn pretty_print(&self, species: &[String], decimals: u32) {
        let label = |i: usize| {
            species
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("x{}", i))
        };

        let mut odes_table = Table::new();
        odes_table.add_row(row!["Species", "M * w"]);
        for (i, rhs) in self.reconstruct().iter().enumerate() {
            odes_table.add_row(row![format!("d{}/dt", label(i)), rhs.to_string()]);
        }
        println!("\nReconstructed ODEs:");
        odes_table.printstd();

        let mut matrix_table = Table::new();
        let mut header = vec![Cell::new("")];
        header.extend((0..self.n_reactions()).map(|j| Cell::new(&format!("w{}", j))));
        matrix_table.add_row(Row::new(header));
        let rounded = self.rounded(decimals);
        for i in 0..self.n_species() {
            let mut cells = vec![Cell::new(&label(i))];
            cells.extend(
                (0..self.n_reactions()).map(|j| Cell::new(&fmt_num(rounded[(i, j)]))),
            );
            matrix_table.add_row(Row::new(cells));
        }
        println!("\nStoichiometric matrix:");
        matrix_table.printstd();

        let mut prop_table = Table::new();
        prop_table.add_row(row!["Column", "Propensity"]);
        for (j, w) in self.propensities.iter().enumerate() {
            prop_table.add_row(row![format!("w{}", j), w.to_string()]);
        }
        println!("\nPropensity vector:");
        prop_table.printstd();
    }
}

/// console report of the stoichiometric matrix and propensity vector of an ODE system
pub fn print_stoich_prop(
    species: &[String],
    dxdt: &[String],
    decimals: u32,
) -> Result<StoichData, OdeTopoError> {
    let (_, data) = prop_stoich_from_strings(dxdt)?;
    data.pretty_print(species, decimals);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OdeTopology::expr_parser::parse_expression;
    use approx::assert_relative_eq;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quotient_matches_only_same_core() {
        let term = &split_terms(&parse_expression("-2*k*A*B").unwrap())[0];
        let w = parse_expression("A*B*k").unwrap();
        assert_eq!(term_quotient(term, &w), Quotient::Numeric(-2.0));
        let other = parse_expression("A*k").unwrap();
        assert_eq!(term_quotient(term, &other), Quotient::NotApplicable);
    }

    #[test]
    fn test_gene_expression_matrix() {
        let (_, data) = prop_stoich_from_strings(&strings(&["km - m*rm", "kp*m - P*rp"])).unwrap();
        let props: Vec<String> = data.propensities.iter().map(|p| p.to_string()).collect();
        assert_eq!(props, vec!["km", "m*rm", "P*rp", "kp*m"]);
        assert_eq!(data.matrix_rows(3), vec![
            vec![1.0, -1.0, 0.0, 0.0],
            vec![0.0, 0.0, -1.0, 1.0],
        ]);
    }

    #[test]
    fn test_repeated_terms_are_summed() {
        // 2*k*A written as two separate contributions
        let (odes, data) = prop_stoich_from_strings(&strings(&["-k*A - k*A", "k*A"])).unwrap();
        assert_eq!(data.n_reactions(), 1);
        assert_relative_eq!(data.stoich[(0, 0)], -2.0);
        assert_relative_eq!(data.stoich[(1, 0)], 1.0);
        assert!(data.reproduces(&odes));
    }

    #[test]
    fn test_reconstruction_with_rational_terms() {
        let dxdt = strings(&[
            "-ka*A*B/(1+C**2) + kf1/(1+B**2)",
            "-ka*A*B/(1+C**2)",
            "-kc*C + kf2",
            "ka*A*B/(1+C**2) - kf2",
        ]);
        let (odes, data) = prop_stoich_from_strings(&dxdt).unwrap();
        assert_eq!(data.n_species(), 4);
        assert_eq!(data.n_reactions(), 4);
        assert!(data.reproduces(&odes));
        for (rebuilt, ode) in data.reconstruct().iter().zip(odes.iter()) {
            assert_eq!(rebuilt.to_string(), ode.to_string());
        }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(1.0 / 3.0, 3), 0.333);
        assert_eq!(round_to(-0.0001, 3), 0.0);
        assert!(round_to(-0.0001, 3).is_sign_positive());
    }

    #[test]
    fn test_constant_term_is_fatal() {
        let result = prop_stoich_from_strings(&strings(&["k*A - 5"]));
        assert!(matches!(result, Err(OdeTopoError::MalformedTerm(_))));
    }
}
