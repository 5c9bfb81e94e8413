#![deny(unsafe_code)]

//! CLI library components for the form generator.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
