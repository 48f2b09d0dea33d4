//! Eosgen: declaration scanner and binding model resolver for the EOS SDK
//! C headers.
//!
//! This library scans the declarative macro surface of the SDK headers
//! (enums, structs, functions, callbacks, handle typedefs, version macros),
//! consolidates the per-file tables into one global model, and classifies
//! every struct and field so a code emitter can render bindings from the
//! resolved facts alone.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod model;
pub mod names;
pub mod pipeline;
pub mod scanner;

pub use analysis::ExpansionConfig;
pub use error::{Error, ModelDiagnostic, Result};
pub use model::{Model, ResolvedModel, StructFacts};
pub use pipeline::Pipeline;
