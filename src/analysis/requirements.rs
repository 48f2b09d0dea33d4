//! Conversion-capability derivation: roles in, bidirectional flags out.

use crate::model::types::{decay, is_struct_array_field};
use crate::model::{FieldType, Model, Requirements, StructRoles};

/// Derive the four capability flags per struct, then run one propagation
/// pass through nesting: a container inherits from its members, never the
/// other way around.
pub fn derive(model: &Model, roles: &[StructRoles]) -> Vec<Requirements> {
    let direct: Vec<Requirements> = roles.iter().map(direct_requirements).collect();

    let mut derived = direct.clone();
    for (id, decl) in model.structs() {
        for field in &decl.fields {
            let FieldType::Plain(raw) = &field.ty else {
                continue;
            };
            let Some(member) = model.struct_id(decay(raw)) else {
                continue;
            };
            if is_struct_array_field(raw, &field.name) {
                let member_roles = roles[member.0 as usize];
                let slot = &mut derived[id.0 as usize];
                if member_roles.output || member_roles.out_arg {
                    slot.convert_from = true;
                    slot.factory_from = true;
                }
                if member_roles.input {
                    // The per-element write-back never needs the reusable
                    // buffer the element itself would carry.
                    slot.convert_to = true;
                }
            } else {
                derived[id.0 as usize].merge(direct[member.0 as usize]);
            }
        }
    }
    derived
}

fn direct_requirements(roles: &StructRoles) -> Requirements {
    let mut req = Requirements::default();
    if roles.output || roles.out_arg {
        req.convert_from = true;
        req.factory_from = true;
    }
    if roles.input {
        req.convert_to = true;
        req.owns_buffer = true;
    }
    req
}
