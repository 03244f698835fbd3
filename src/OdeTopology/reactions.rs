//! Reaction renderer: one reaction record per column of the stoichiometric matrix.
use super::symbolic::{SymExpr, py_float};
use nalgebra::DMatrix;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// text of an empty reaction side
pub const EMPTY_SIDE: &str = "0 NONE";

/// reaction recovered from one stoichiometric column
#[derive(Debug, Clone, Serialize)]
pub struct ReactionRecord {
    /// species with negative coefficient in the column
    pub reactants: Vec<(String, f64)>,
    /// species with positive coefficient in the column
    pub products: Vec<(String, f64)>,
    pub propensity: SymExpr,
    /// species the propensity depends on, in species order
    pub species_params: Vec<String>,
    /// symbols of the propensity that are not species
    pub rate_constants: BTreeSet<String>,
}

fn render_side(side: &[(String, f64)]) -> String {
    if side.is_empty() {
        return EMPTY_SIDE.to_string();
    }
    side.iter()
        .map(|(name, c)| format!("{} {}", py_float(c.abs()), name))
        .collect::<Vec<_>>()
        .join(" + ")
}

impl ReactionRecord {
    pub fn reactant_side(&self) -> String {
        render_side(&self.reactants)
    }

    pub fn product_side(&self) -> String {
        render_side(&self.products)
    }
}

impl fmt::Display for ReactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {}, 1 ::::: lambda {} : {}",
            self.reactant_side(),
            self.product_side(),
            self.species_params.join(","),
            self.propensity
        )
    }
}

/// turns (stoichiometric matrix, species, propensity vector) into reaction records and the
/// set of rate-constant symbols used by all propensities
pub fn grab_rxn_ksn(
    stoich: &DMatrix<f64>,
    species: &[String],
    propensities: &[SymExpr],
) -> (Vec<ReactionRecord>, BTreeSet<String>) {
    let mut reactions = Vec::with_capacity(propensities.len());
    let mut ksn = BTreeSet::new();
    for (j, w) in propensities.iter().enumerate() {
        let mut reactants = Vec::new();
        let mut products = Vec::new();
        for (i, name) in species.iter().enumerate() {
            let c = stoich[(i, j)];
            if c < 0.0 {
                reactants.push((name.clone(), c));
            } else if c > 0.0 {
                products.push((name.clone(), c));
            }
        }
        let free = w.free_symbols();
        let species_params: Vec<String> = species
            .iter()
            .filter(|s| free.contains(s.as_str()))
            .cloned()
            .collect();
        let rate_constants: BTreeSet<String> = free
            .into_iter()
            .filter(|s| !species.contains(s))
            .collect();
        ksn.extend(rate_constants.iter().cloned());
        reactions.push(ReactionRecord {
            reactants,
            products,
            propensity: w.clone(),
            species_params,
            rate_constants,
        });
    }
    (reactions, ksn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OdeTopology::expr_parser::parse_expression;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_gene_expression() {
        let species = names(&["m", "P"]);
        let props: Vec<SymExpr> = ["km", "m*rm", "P*rp", "kp*m"]
            .iter()
            .map(|s| parse_expression(s).unwrap())
            .collect();
        let stoich = DMatrix::from_row_slice(2, 4, &[1.0, -1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 1.0]);
        let (reactions, ksn) = grab_rxn_ksn(&stoich, &species, &props);
        let lines: Vec<String> = reactions.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "0 NONE => 1.0 m, 1 ::::: lambda  : km",
                "1.0 m => 0 NONE, 1 ::::: lambda m : m*rm",
                "1.0 P => 0 NONE, 1 ::::: lambda P : P*rp",
                "0 NONE => 1.0 P, 1 ::::: lambda m : kp*m",
            ]
        );
        assert_eq!(
            ksn,
            names(&["km", "kp", "rm", "rp"]).into_iter().collect::<BTreeSet<String>>()
        );
    }

    #[test]
    fn test_multi_species_sides() {
        let species = names(&["A", "B", "C"]);
        let props = vec![parse_expression("k*A**2*B").unwrap()];
        let stoich = DMatrix::from_row_slice(3, 1, &[-2.0, -1.0, 1.5]);
        let (reactions, ksn) = grab_rxn_ksn(&stoich, &species, &props);
        assert_eq!(reactions[0].reactant_side(), "2.0 A + 1.0 B");
        assert_eq!(reactions[0].product_side(), "1.5 C");
        assert_eq!(reactions[0].species_params, names(&["A", "B"]));
        assert_eq!(
            reactions[0].to_string(),
            "2.0 A + 1.0 B => 1.5 C, 1 ::::: lambda A,B : A**2*B*k"
        );
        assert!(ksn.contains("k"));
    }

    #[test]
    fn test_empty_sides_use_sentinel() {
        let species = names(&["X"]);
        let props = vec![parse_expression("k").unwrap()];
        let stoich = DMatrix::from_row_slice(1, 1, &[0.0]);
        let (reactions, _) = grab_rxn_ksn(&stoich, &species, &props);
        assert_eq!(reactions[0].reactant_side(), EMPTY_SIDE);
        assert_eq!(reactions[0].product_side(), EMPTY_SIDE);
    }
}
