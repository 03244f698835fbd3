/// eng
/// The module takes a system of kinetic ODEs (one right-hand side per species, written as an algebraic
/// expression over species and rate-constant symbols) and recovers the reaction network behind it:
/// 1) the propensity vector - distinct rate laws, i.e. the additive terms of the ODEs stripped of their numeric coefficients
/// 2) the stoichiometric matrix - species x propensities, so that M * w reproduces the ODEs
/// 3) the list of reactions in BioSANS topology format, together with the set of rate constants
///
/// The conversion is available directly from vectors of strings or from an ODE declaration file
/// with ODE_DECLARATIONS:, INI_CONCENTRATIONS: and RATE_CONSTANTS: sections.
///
/// # Examples
/// ```
/// use OdeTopo::OdeTopology::topology::transform_to_rxn;
/// use OdeTopo::OdeTopology::sinks::BufferSink;
/// let species: Vec<String> = vec!["m".to_string(), "P".to_string()];
/// let dxdt: Vec<String> = vec!["km - m*rm".to_string(), "kp*m - P*rp".to_string()];
/// let mut sink = BufferSink::new();
/// let report = transform_to_rxn(&species, &dxdt, None, None, Some(&mut sink)).unwrap();
/// assert!(sink.lines.contains(&"0 NONE => 1.0 m, 1 ::::: lambda  : km".to_string()));
/// assert_eq!(report.reactions.len(), 4);
/// ```
pub mod topology;

/// canonical expanded symbolic expressions: arithmetic, structural equality, display and
/// conversion to RustedSciThe
pub mod symbolic;
/// RustedSciThe parsing of algebraic expressions, lowered into canonical symbolic expressions
pub mod expr_parser;
/// cleaning of raw term text and the per-conversion deduplication memo
pub mod normalizer;
/// additive terms of an expression and propensity extraction
pub mod terms;
/// stoichiometric matrix and propensity vector
pub mod stoichiometry;
/// reaction records and their text lines
pub mod reactions;
/// ODE declaration file parser
pub mod ode_file;
/// line sinks for the emitted text
pub mod sinks;
pub mod error;

mod symbolic_tests;
