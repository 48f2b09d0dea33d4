//! Expansion policy: which structs flatten into call signatures instead of
//! becoming boxed types.
//!
//! The thresholds trade fewer generated types against less reusable code;
//! any value yields a correct model.

use log::debug;

use crate::model::types::is_version_stamp;
use crate::model::{FieldType, Model, StructDecl, StructRoles};

/// Field-count thresholds for both expansion forms. Zero disables a form.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionConfig {
    pub max_input_fields: usize,
    pub max_callback_fields: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            max_input_fields: 3,
            max_callback_fields: 3,
        }
    }
}

/// Decide per struct whether it flattens. Indexed by `StructId`.
pub fn decide(model: &Model, roles: &[StructRoles], config: &ExpansionConfig) -> Vec<bool> {
    model
        .structs()
        .map(|(id, decl)| {
            let expanded = decide_one(decl, &roles[id.0 as usize], config);
            if expanded {
                debug!("struct `{}` expands into call signatures", decl.name);
            }
            expanded
        })
        .collect()
}

fn decide_one(decl: &StructDecl, roles: &StructRoles, config: &ExpansionConfig) -> bool {
    let count = eligible_field_count(decl);

    // Flatten into call arguments: pure input side.
    let input_pure = !roles.output && !roles.internal && !roles.internal_of_array;
    if config.max_input_fields > 0 && count <= config.max_input_fields && input_pure {
        return true;
    }

    // Flatten into a callback payload: pure output side.
    let output_pure = !roles.input && !roles.internal && !roles.internal_of_array;
    config.max_callback_fields > 0 && count <= config.max_callback_fields && output_pure
}

/// The version stamp is filled in by generated glue, never by a caller, so
/// it does not count against the threshold.
fn eligible_field_count(decl: &StructDecl) -> usize {
    decl.fields
        .iter()
        .filter(|f| match &f.ty {
            FieldType::Plain(raw) => !is_version_stamp(raw, &f.name),
            FieldType::Union(_) => true,
        })
        .count()
}
