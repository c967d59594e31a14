//! Shared utilities for the nestri CLI commands.

pub mod args;
pub mod paths;
