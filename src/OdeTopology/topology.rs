//! # Topology emitter
//!
//! Runs the whole conversion (parse ODEs -> propensities and stoichiometric matrix ->
//! reaction records) and writes the BioSANS topology block:
//! ```text
//! Function_Definitions:
//! km = 0.1
//! rm = type actual value
//! m_ini = type actual value
//!
//! #REACTIONS
//! 0 NONE => 1.0 m, 1 ::::: lambda  : km
//! 1.0 m => 0 NONE, 1 ::::: lambda m : m*rm
//!
//! @CONCENTRATION
//! m , m_ini
//! NONE, 1
//! ```
use super::error::OdeTopoError;
use super::expr_parser::parse_vector_expression;
use super::normalizer::ParsingMemo;
use super::ode_file::load_ode_file;
use super::reactions::{ReactionRecord, grab_rxn_ksn};
use super::sinks::{ConsoleSink, TextSink};
use super::stoichiometry::{StoichData, get_prop_stoich};
use crate::settings::ConverterSettings;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{info, warn};
use serde_json::json;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// everything produced by one conversion
#[derive(Debug, Clone)]
pub struct TopologyReport {
    pub species: Vec<String>,
    pub stoich_data: StoichData,
    pub reactions: Vec<ReactionRecord>,
    pub rate_constants: BTreeSet<String>,
    pub x_ini: HashMap<String, String>,
    pub k_rc: HashMap<String, String>,
    /// emitted topology text, line by line
    pub lines: Vec<String>,
    round_decimals: u32,
}

impl TopologyReport {
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OdeTopoError> {
        fs::write(path, self.text())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, OdeTopoError> {
        let value = json!({
            "species": self.species,
            "stoichiometric_matrix": self.stoich_data.matrix_rows(self.round_decimals),
            "propensities": self.stoich_data.propensities,
            "reactions": self.reactions,
            "rate_constants": self.rate_constants,
            "initial_concentrations": self.x_ini,
            "rate_constant_values": self.k_rc,
            "topology": self.lines,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// reconstructed ODE right-hand sides for RustedSciThe with every rate constant whose
    /// value is a number substituted
    pub fn rusted_odes_with_constants(&self) -> Vec<Expr> {
        let mut known = Vec::new();
        for k in &self.rate_constants {
            if let Some(v) = self.k_rc.get(k) {
                match v.parse::<f64>() {
                    Ok(value) => known.push((k.clone(), value)),
                    Err(_) => warn!("rate constant {} = '{}' is not a number, kept symbolic", k, v),
                }
            }
        }
        self.stoich_data
            .to_rusted_odes()
            .into_iter()
            .map(|ode| {
                known
                    .iter()
                    .fold(ode, |acc, (k, value)| acc.set_variable(k, *value))
            })
            .collect()
    }
}

/// converter with its settings; the free functions below use the default settings
#[derive(Debug, Clone, Default)]
pub struct OdeConverter {
    pub settings: ConverterSettings,
}

fn validate_species(species: &[String], dxdt: &[String]) -> Result<(), OdeTopoError> {
    if species.len() != dxdt.len() {
        return Err(OdeTopoError::LengthMismatch {
            species: species.len(),
            equations: dxdt.len(),
        });
    }
    let mut seen = HashSet::new();
    for s in species {
        if !seen.insert(s.as_str()) {
            return Err(OdeTopoError::DuplicateSpecies(s.clone()));
        }
    }
    Ok(())
}

fn emit_lines(lines: &[String], sink: &mut dyn TextSink) -> Result<(), OdeTopoError> {
    for line in lines {
        sink.insert_line(line)?;
    }
    sink.flush()
}

impl OdeConverter {
    pub fn new(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    fn value_or_placeholder<'a>(&'a self, map: &'a HashMap<String, String>, key: &str) -> &'a str {
        map.get(key)
            .map(|v| v.as_str())
            .unwrap_or(self.settings.placeholder.as_str())
    }

    /// converts species and their ODEs into the topology text; lines go to `sink`, or to
    /// the console when no sink is given
    pub fn transform_to_rxn(
        &self,
        species: &[String],
        dxdt: &[String],
        x_ini: Option<&HashMap<String, String>>,
        k_rc: Option<&HashMap<String, String>>,
        sink: Option<&mut dyn TextSink>,
    ) -> Result<TopologyReport, OdeTopoError> {
        let species: Vec<String> = species.iter().map(|s| s.trim().to_string()).collect();
        validate_species(&species, dxdt)?;
        let x_ini = x_ini.cloned().unwrap_or_default();
        let k_rc = k_rc.cloned().unwrap_or_default();

        let odes = parse_vector_expression(dxdt)?;
        let mut memo = ParsingMemo::new();
        let stoich_data = get_prop_stoich(&odes, &mut memo)?;
        let rounded = stoich_data.rounded(self.settings.round_decimals);
        let (reactions, rate_constants) =
            grab_rxn_ksn(&rounded, &species, &stoich_data.propensities);
        info!(
            "{} species, {} reactions, {} rate constants",
            species.len(),
            reactions.len(),
            rate_constants.len()
        );

        let mut lines = vec!["Function_Definitions:".to_string()];
        for k in &rate_constants {
            lines.push(format!("{} = {}", k, self.value_or_placeholder(&k_rc, k)));
        }
        for s in &species {
            lines.push(format!("{}_ini = {}", s, self.value_or_placeholder(&x_ini, s)));
        }
        lines.push(String::new());
        lines.push("#REACTIONS".to_string());
        lines.extend(reactions.iter().map(|r| r.to_string()));
        lines.push(String::new());
        lines.push("@CONCENTRATION".to_string());
        for s in &species {
            lines.push(format!("{} , {}_ini", s, s));
        }
        lines.push("NONE, 1".to_string());

        match sink {
            Some(sink) => emit_lines(&lines, sink)?,
            None => emit_lines(&lines, &mut ConsoleSink)?,
        }

        Ok(TopologyReport {
            species,
            stoich_data,
            reactions,
            rate_constants,
            x_ini,
            k_rc,
            lines,
            round_decimals: self.settings.round_decimals,
        })
    }

    /// reads an ODE declaration file and converts it
    pub fn odedxdt_to_topo<P: AsRef<Path>>(
        &self,
        path: P,
        sink: Option<&mut dyn TextSink>,
    ) -> Result<TopologyReport, OdeTopoError> {
        let task = load_ode_file(path)?;
        self.transform_to_rxn(
            &task.species,
            &task.dxdt,
            Some(&task.x_ini),
            Some(&task.k_rc),
            sink,
        )
    }
}

pub fn transform_to_rxn(
    species: &[String],
    dxdt: &[String],
    x_ini: Option<&HashMap<String, String>>,
    k_rc: Option<&HashMap<String, String>>,
    sink: Option<&mut dyn TextSink>,
) -> Result<TopologyReport, OdeTopoError> {
    OdeConverter::default().transform_to_rxn(species, dxdt, x_ini, k_rc, sink)
}

pub fn odedxdt_to_topo<P: AsRef<Path>>(
    path: P,
    sink: Option<&mut dyn TextSink>,
) -> Result<TopologyReport, OdeTopoError> {
    OdeConverter::default().odedxdt_to_topo(path, sink)
}
