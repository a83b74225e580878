#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod entropy;
pub mod error;
pub mod gcloud;
pub mod logging;
pub mod paths;
pub mod progress;
pub mod terminal;
pub mod wizard;

#[cfg(test)]
mod testing;
