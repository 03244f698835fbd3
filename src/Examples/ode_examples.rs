use crate::OdeTopology::error::OdeTopoError;
use crate::OdeTopology::sinks::BufferSink;
use crate::OdeTopology::stoichiometry::print_stoich_prop;
use crate::OdeTopology::topology::{OdeConverter, transform_to_rxn};
use crate::settings::ConverterSettings;
use log::error;
use std::collections::HashMap;
use std::io::Write;

/// writes `text` into a temporary file, converts it and returns the JSON report
fn convert_text_file(text: &str) -> Result<String, OdeTopoError> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{}", text)?;
    let converter = OdeConverter::new(ConverterSettings::default());
    let mut sink = BufferSink::new();
    let report = converter.odedxdt_to_topo(file.path(), Some(&mut sink))?;
    print!("{}", sink.text());
    report.to_json()
}

pub fn ode_examples(task: usize) {
    match task {
        0 => {
            // gene expression: mRNA m and protein P
            let species: Vec<String> = vec!["m".to_string(), "P".to_string()];
            let dxdt: Vec<String> = vec!["km - m*rm".to_string(), "kp*m - P*rp".to_string()];
            if let Err(e) = transform_to_rxn(&species, &dxdt, None, None, None) {
                error!("{}", e);
            }
        }
        1 => {
            // STOICHIOMETRIC MATRIX AND PROPENSITY VECTOR
            let species: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
            let dxdt: Vec<String> = [
                "-ka*A*B/(1+C**2) + kf1/(1+B**2)",
                "-ka*A*B/(1+C**2)",
                "-kc*C + kf2",
                "ka*A*B/(1+C**2) - kf2",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            match print_stoich_prop(&species, &dxdt, 4) {
                Ok(data) => println!(
                    "{} species, {} propensities",
                    data.n_species(),
                    data.n_reactions()
                ),
                Err(e) => error!("{}", e),
            }
        }
        2 => {
            // conversion of an ODE declaration file
            let text = "ODE_DECLARATIONS:
A = -ka*A*B/(1+C**2) + kf1/(1+B**2)
B = -ka*A*B/(1+C**2)
C = -kc*C + kf2
D = ka*A*B/(1+C**2) - kf2

INI_CONCENTRATIONS:
A = 100
B = 200
C = 150
D = 0

RATE_CONSTANTS:
ka = 0.02
kf1 = 0.2
kc = 0.03
kf2 = 0.01
";
            let result = convert_text_file(text);
            match result {
                Ok(json) => println!("\nJSON report:\n{}", json),
                Err(e) => error!("{}", e),
            }
        }
        3 => {
            // reconstructed ODEs as RustedSciThe expressions with known constants substituted
            let species: Vec<String> = vec!["m".to_string(), "P".to_string()];
            let dxdt: Vec<String> = vec!["km - m*rm".to_string(), "kp*m - P*rp".to_string()];
            let k_rc: HashMap<String, String> = [("km", "0.1"), ("rm", "0.05"), ("kp", "2.0"), ("rp", "0.01")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let mut sink = BufferSink::new();
            match transform_to_rxn(&species, &dxdt, None, Some(&k_rc), Some(&mut sink)) {
                Ok(report) => {
                    let odes = report.rusted_odes_with_constants();
                    for (s, ode) in species.iter().zip(odes.iter()) {
                        println!("d{}/dt = {}", s, ode);
                    }
                    let dm = odes[0].clone().lambdify_owned(vec!["m"]);
                    println!("dm/dt at m = 1: {}", dm(vec![1.0]));
                }
                Err(e) => error!("{}", e),
            }
        }
        _ => {
            println!("no such example: {}", task);
        }
    }
}
