//! The command line front of sprout and the settings it runs with

// The basic CLI for running the decomposer over files
pub(crate) mod cli;
pub mod settings;
