//! Parser of the ODE declaration file.
//!
//! ```text
//! ODE_DECLARATIONS:
//! A = -ka*A*B/(1+C**2) + kf1/(1+B**2)
//! B = -ka*A*B/(1+C**2)
//!
//! INI_CONCENTRATIONS:
//! A = 100
//! B = 200
//!
//! RATE_CONSTANTS:
//! ka = 0.02
//! kf1 = 0.2
//! ```
//! Lines belong to the section opened by the last tag line; tags are matched by exact
//! equality of the trimmed line. Sections may come in any order, be empty or be missing.
//! Lines before the first tag are ignored. A line needs an `=` and a non-empty name; the value
//! may be empty (`A =`), an empty ODE is then rejected when it is parsed.
use super::error::OdeTopoError;
use log::{info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// state of the section parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeFileSection {
    None,
    OdeDeclarations,
    IniConcentrations,
    RateConstants,
}

impl OdeFileSection {
    /// the section opened by a tag line, if the line is a tag
    pub fn from_tag(line: &str) -> Option<Self> {
        match line.trim() {
            "ODE_DECLARATIONS:" => Some(OdeFileSection::OdeDeclarations),
            "INI_CONCENTRATIONS:" => Some(OdeFileSection::IniConcentrations),
            "RATE_CONSTANTS:" => Some(OdeFileSection::RateConstants),
            _ => None,
        }
    }
}

/// content of an ODE declaration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdeTask {
    pub species: Vec<String>,
    pub dxdt: Vec<String>,
    /// initial concentrations as written in the file
    pub x_ini: HashMap<String, String>,
    /// rate constants as written in the file
    pub k_rc: HashMap<String, String>,
}

pub fn parse_ode_text(text: &str) -> Result<OdeTask, OdeTopoError> {
    let assignment = Regex::new(r"^\s*([^=]+?)\s*=\s*(.*?)\s*$")?;
    let mut task = OdeTask::default();
    let mut state = OdeFileSection::None;
    for (n, line) in text.lines().enumerate() {
        if let Some(section) = OdeFileSection::from_tag(line) {
            state = section;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if state == OdeFileSection::None {
            warn!("line {} is outside of any section, ignored: '{}'", n + 1, line);
            continue;
        }
        let malformed = || OdeTopoError::MalformedLine {
            line_no: n + 1,
            line: line.to_string(),
        };
        let caps = assignment.captures(line).ok_or_else(malformed)?;
        let name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let value = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        if name.is_empty() {
            return Err(malformed());
        }
        match state {
            OdeFileSection::OdeDeclarations => {
                task.species.push(name);
                task.dxdt.push(value);
            }
            OdeFileSection::IniConcentrations => {
                task.x_ini.insert(name, value);
            }
            OdeFileSection::RateConstants => {
                task.k_rc.insert(name, value);
            }
            OdeFileSection::None => {}
        }
    }
    Ok(task)
}

/// reads the whole file and parses it
pub fn load_ode_file<P: AsRef<Path>>(path: P) -> Result<OdeTask, OdeTopoError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let task = parse_ode_text(&text)?;
    info!(
        "'{}': {} ODEs, {} initial values, {} rate constants",
        path.display(),
        task.species.len(),
        task.x_ini.len(),
        task.k_rc.len()
    );
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL: &str = "ODE_DECLARATIONS:
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

    #[test]
    fn test_parse_full_file() {
        let task = parse_ode_text(FULL).unwrap();
        assert_eq!(task.species, vec!["A", "B", "C", "D"]);
        assert_eq!(task.dxdt[2], "-kc*C + kf2");
        assert_eq!(task.x_ini["B"], "200");
        assert_eq!(task.k_rc["kf2"], "0.01");
        assert_eq!(task.k_rc.len(), 4);
    }

    #[test]
    fn test_sections_in_any_order_and_missing() {
        let text = "RATE_CONSTANTS:\nk = 2\n  ODE_DECLARATIONS:  \nX = -k*X\n";
        let task = parse_ode_text(text).unwrap();
        assert_eq!(task.species, vec!["X"]);
        assert_eq!(task.dxdt, vec!["-k*X"]);
        assert_eq!(task.k_rc["k"], "2");
        assert!(task.x_ini.is_empty());
    }

    #[test]
    fn test_lines_before_tags_are_ignored() {
        let text = "X = -k*X\nsome comment\nODE_DECLARATIONS:\nY = k*X\n";
        let task = parse_ode_text(text).unwrap();
        assert_eq!(task.species, vec!["Y"]);
    }

    #[test]
    fn test_split_on_first_equal_sign_only() {
        let task = parse_ode_text("INI_CONCENTRATIONS:\nA = x = 1\n").unwrap();
        assert_eq!(task.x_ini["A"], "x = 1");
    }

    #[test]
    fn test_malformed_line() {
        let err = parse_ode_text("ODE_DECLARATIONS:\nA -k*A\n").unwrap_err();
        assert!(matches!(err, OdeTopoError::MalformedLine { line_no: 2, .. }));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let task =
            parse_ode_text("ODE_DECLARATIONS:\nA = -k*A\nINI_CONCENTRATIONS:\nA =\n").unwrap();
        assert_eq!(task.x_ini["A"], "");
        let err = parse_ode_text("RATE_CONSTANTS:\n = 0.1\n").unwrap_err();
        assert!(matches!(err, OdeTopoError::MalformedLine { line_no: 2, .. }));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let task = parse_ode_text("ode_declarations:\nA = -k*A\n").unwrap();
        assert!(task.species.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", FULL).unwrap();
        let task = load_ode_file(temp_file.path()).unwrap();
        assert_eq!(task.species.len(), 4);
        assert!(matches!(
            load_ode_file("no/such/file.txt"),
            Err(OdeTopoError::Io(_))
        ));
    }
}
