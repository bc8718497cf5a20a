//! Workflow wrapper around Cloud Custodian: compile policies with their
//! execution modes, validate them, and optionally hand them to the engine.

pub mod cli;
pub mod commands;
pub mod domain;
pub mod services;
