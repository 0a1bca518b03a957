//! TeamTalk SDK installer library
//!
//! Downloads the TeamTalk 5 SDK for the running platform and installs its
//! Python bindings into a project's `implementation` package.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
