use super::cli_main::get_user_input;
use crate::Examples::ode_examples::ode_examples;
use log::error;
use std::io::{self, Write};

fn show_examples_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n=== Examples ===")?;
    writeln!(out, "1. Gene expression topology")?;
    writeln!(out, "2. Stoichiometric matrix and propensity vector")?;
    writeln!(out, "3. ODE declaration file with JSON report")?;
    writeln!(out, "4. Export to RustedSciThe")?;
    writeln!(out, "0. Back to main menu")?;
    write!(out, "Enter your choice: ")?;
    out.flush()
}

pub fn examples_menu() {
    loop {
        let choice = match show_examples_menu(&mut io::stdout()).and_then(|_| get_user_input()) {
            Ok(choice) => choice,
            Err(e) => {
                error!("cannot read input: {}", e);
                break;
            }
        };
        match choice.trim() {
            "1" => ode_examples(0),
            "2" => ode_examples(1),
            "3" => ode_examples(2),
            "4" => ode_examples(3),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_menu_lists_every_example() {
        let mut out = Vec::new();
        show_examples_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for item in ["1. ", "2. ", "3. ", "4. ", "0. Back"] {
            assert!(text.contains(item), "missing {}", item);
        }
        assert!(text.ends_with("Enter your choice: "));
    }
}
