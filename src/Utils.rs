/// logger setup for the command line application
pub mod logging;
