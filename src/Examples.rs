/// worked conversions of ODE systems into reaction topologies
pub mod ode_examples;
