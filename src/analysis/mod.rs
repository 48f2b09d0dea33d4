//! Whole-model analysis passes, run in a fixed order over the scanned
//! declarations: consolidation, role classification, conversion
//! requirements, expansion, then per-field roles.

pub mod consolidate;
pub mod expansion;
pub mod field_roles;
pub mod requirements;
pub mod roles;

pub use consolidate::consolidate;
pub use expansion::ExpansionConfig;
