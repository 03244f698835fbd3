pub mod cli_examples;
pub mod cli_main;
/// conversion of ODE declaration files from the menu
pub mod cli_ode;
