use super::cli_main::prompt;
use crate::OdeTopology::error::OdeTopoError;
use crate::OdeTopology::sinks::{OutputSink, TextSink};
use crate::OdeTopology::topology::OdeConverter;
use crate::settings::ConverterSettings;
use log::{error, info};
use std::fs;

/// asks for the ODE file, an optional topology output file and an optional JSON report file
pub fn ode_file_menu(settings: &ConverterSettings) {
    if let Err(e) = run_ode_file_dialog(settings) {
        error!("{}", e);
    }
}

fn run_ode_file_dialog(settings: &ConverterSettings) -> Result<(), OdeTopoError> {
    println!("\n=== ODE -> reaction topology ===");
    let input = prompt("Path to ODE declaration file: ")?;
    if input.is_empty() {
        println!("No file given.");
        return Ok(());
    }
    let output = prompt("Topology output file (empty for console): ")?;
    let json = prompt("JSON report file (empty to skip): ")?;

    let converter = OdeConverter::new(settings.clone());
    let mut sink = OutputSink::from_path(Some(output.as_str()))?;
    let report = converter.odedxdt_to_topo(&input, Some(&mut sink))?;
    sink.flush()?;
    if !output.is_empty() {
        info!("topology written to '{}'", output);
    }

    report
        .stoich_data
        .pretty_print(&report.species, settings.print_decimals);

    if !json.is_empty() {
        fs::write(&json, report.to_json()?)?;
        info!("JSON report written to '{}'", json);
    }
    Ok(())
}
