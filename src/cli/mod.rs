//! Command-line interface module
//!
//! This module contains the implementations for the CLI subcommands.

pub mod resolve;
pub mod scan;

use std::path::PathBuf;

use crate::error::Result;

/// Write output to file or stdout
pub fn write_output(content: &str, output_path: Option<&PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, content)?;
            Ok(())
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
