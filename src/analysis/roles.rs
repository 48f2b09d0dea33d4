//! Struct role classification over the fully consolidated tables.
//!
//! Every struct is checked against the whole method/callback surface, both
//! handle-owned and unhandled; a hit found only through the unhandled
//! buckets is logged since it usually marks a modeling gap.

use log::{debug, warn};

use crate::error::ModelDiagnostic;
use crate::model::types::{decay, is_struct_array_field};
use crate::model::{FieldType, Model, StructRoles};

/// Classify every struct in the model. The result is indexed by `StructId`.
pub fn classify(model: &Model, diagnostics: &mut Vec<ModelDiagnostic>) -> Vec<StructRoles> {
    let mut all = Vec::with_capacity(model.struct_count());
    for (_, decl) in model.structs() {
        let roles = classify_one(model, &decl.name);
        if roles.is_empty() {
            debug!("struct `{}` has no detected role", decl.name);
            diagnostics.push(ModelDiagnostic::EmptyRoleSet {
                strukt: decl.name.clone(),
            });
        }
        all.push(roles);
    }
    all
}

fn classify_one(model: &Model, name: &str) -> StructRoles {
    StructRoles {
        input: is_input(model, name),
        output: is_output(model, name),
        out_arg: is_out_arg(model, name),
        internal: is_internal(model, name),
        internal_of_array: is_internal_of_array(model, name),
    }
}

/// Non-`Out` argument of a non-release method.
fn is_input(model: &Model, name: &str) -> bool {
    for (_, handle) in model.handles() {
        for method in handle.methods.values() {
            if method.is_release() {
                continue;
            }
            if method
                .args
                .iter()
                .any(|a| decay(&a.ty) == name && !a.name.starts_with("Out"))
            {
                return true;
            }
        }
    }
    for method in model.unhandled_methods.values() {
        if method.is_release() {
            continue;
        }
        if method
            .args
            .iter()
            .any(|a| decay(&a.ty) == name && !a.name.starts_with("Out"))
        {
            warn!("struct `{name}` is an input only through unhandled method {}", method.name);
            return true;
        }
    }
    false
}

/// Method return type, or callback payload type.
fn is_output(model: &Model, name: &str) -> bool {
    for (_, handle) in model.handles() {
        if handle.methods.values().any(|m| decay(&m.ret) == name) {
            return true;
        }
        if handle.callbacks.values().any(|cb| decay(&cb.arg.ty) == name) {
            return true;
        }
    }
    for method in model.unhandled_methods.values() {
        if decay(&method.ret) == name {
            warn!("struct `{name}` is an output only through unhandled method {}", method.name);
            return true;
        }
    }
    for cb in model.unhandled_callbacks.values() {
        if decay(&cb.arg.ty) == name {
            warn!("struct `{name}` is an output only through unhandled callback {}", cb.name);
            return true;
        }
    }
    false
}

/// Argument the callee populates, marked by the `Out` name prefix.
fn is_out_arg(model: &Model, name: &str) -> bool {
    let hit = |args: &[crate::model::Arg]| {
        args.iter()
            .any(|a| decay(&a.ty) == name && a.name.starts_with("Out"))
    };
    for (_, handle) in model.handles() {
        if handle.methods.values().any(|m| hit(&m.args)) {
            return true;
        }
    }
    for method in model.unhandled_methods.values() {
        if hit(&method.args) {
            warn!("struct `{name}` is an out-argument only through unhandled method {}", method.name);
            return true;
        }
    }
    false
}

/// Plain (non-array) field of another struct.
fn is_internal(model: &Model, name: &str) -> bool {
    for (_, decl) in model.structs() {
        for field in &decl.fields {
            if let FieldType::Plain(raw) = &field.ty {
                if !is_struct_array_field(raw, &field.name) && decay(raw) == name {
                    return true;
                }
            }
        }
    }
    false
}

/// Element type of a struct-array field.
fn is_internal_of_array(model: &Model, name: &str) -> bool {
    for (_, decl) in model.structs() {
        for field in &decl.fields {
            if let FieldType::Plain(raw) = &field.ty {
                if is_struct_array_field(raw, &field.name) && decay(raw) == name {
                    return true;
                }
            }
        }
    }
    false
}
