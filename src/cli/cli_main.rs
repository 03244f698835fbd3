use super::cli_examples::examples_menu;
use super::cli_ode::ode_file_menu;
use crate::settings::ConverterSettings;
use log::error;
use std::io::{self, BufRead, Write};

pub fn run_interactive_menu(settings: &ConverterSettings) {
    loop {
        let choice = match show_main_menu(&mut io::stdout()).and_then(|_| get_user_input()) {
            Ok(choice) => choice,
            Err(e) => {
                error!("cannot read input: {}", e);
                break;
            }
        };

        match choice.trim() {
            "1" => ode_file_menu(settings),
            "2" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "\x1b[34m\n Welcome to OdeTopo: kinetic ODEs -> stoichiometric matrix,\n
    propensity vector and reaction topology \n \x1b[0m"
    )?;
    writeln!(out, "\x1b[33m1. Convert ODE declaration file\x1b[0m")?;
    writeln!(out, "\x1b[33m2. Examples\x1b[0m")?;
    writeln!(out, "\x1b[33m0. Exit\x1b[0m")?;
    write!(out, "\x1b[36mEnter your choice: \x1b[0m")?;
    out.flush()
}

/// one line of `reader`; an empty read (closed input) is reported as an error so menus stop
pub(crate) fn read_user_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut input = String::new();
    let n = reader.read_line(&mut input)?;
    if n == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(input)
}

pub(crate) fn get_user_input() -> io::Result<String> {
    read_user_line(&mut io::stdin().lock())
}

/// prints `prompt` and reads the answer
pub(crate) fn prompt(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    Ok(get_user_input()?.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// writer whose flush always fails
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_main_menu_is_written_and_flushed() {
        let mut out = Vec::new();
        show_main_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. Convert ODE declaration file"));
        assert!(text.ends_with("Enter your choice: \x1b[0m"));
    }

    #[test]
    fn test_flush_error_is_returned() {
        let err = show_main_menu(&mut BrokenPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = io::Cursor::new("2\n");
        assert_eq!(read_user_line(&mut input).unwrap(), "2\n");
        let err = read_user_line(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
