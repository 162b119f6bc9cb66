//! Feasibility-study case builder
//!
//! Layers, innermost first: `domain` (records and derived-value rules), `application`
//! (store and session services), `infrastructure` (filesystem and wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
