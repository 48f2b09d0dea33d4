use std::path::Path;

use crate::error::{Error, Result};
use crate::scanner;

/// Run the scan subcommand: per-file declaration tables, before any
/// consolidation.
pub fn scan(input_path: &Path, format: &str) -> Result<()> {
    let (tables, versions) = scanner::scan_dir(input_path)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&tables)
                .map_err(|e| Error::internal(format!("failed to serialize tables: {e}")))?;
            println!("{}", json);
        }
        "text" => {
            for table in &tables {
                println!(
                    "{} ({}): {} enums, {} structs, {} handles, {} methods, {} callbacks",
                    table.file,
                    table.interface,
                    table.enums.len(),
                    table.structs.len(),
                    table.handles.len(),
                    table.methods.len(),
                    table.callbacks.len(),
                );
            }
            println!("{} version macros", versions.len());
        }
        other => {
            return Err(Error::internal(format!("unknown output format: {other}")));
        }
    }
    Ok(())
}
