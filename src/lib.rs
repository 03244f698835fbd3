#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod OdeTopology;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
