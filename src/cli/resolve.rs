use std::path::{Path, PathBuf};

use crate::analysis::ExpansionConfig;
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;

pub struct ResolveArgs {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub format: String,
    pub max_input_fields: usize,
    pub max_callback_fields: usize,
}

/// Run the resolve subcommand: the full pipeline, emitting the resolved
/// model or its summary.
pub fn resolve(args: &ResolveArgs) -> Result<()> {
    let pipeline = Pipeline::new(ExpansionConfig {
        max_input_fields: args.max_input_fields,
        max_callback_fields: args.max_callback_fields,
    });
    let resolved = pipeline.run(Path::new(&args.input_path))?;

    let content = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&resolved)
            .map_err(|e| Error::internal(format!("failed to serialize model: {e}")))?,
        "summary" => resolved.summary(),
        other => {
            return Err(Error::internal(format!("unknown output format: {other}")));
        }
    };
    super::write_output(&content, args.output_path.as_ref())
}
