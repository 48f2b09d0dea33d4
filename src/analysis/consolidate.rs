//! Global consolidation: merge every per-file table into one model and
//! migrate each method, callback and enum to its owner.
//!
//! The steps run in fixed order over the union of all per-file tables;
//! each completes before the next starts, so ownership never depends on
//! scan order and re-running on the same input reproduces the same
//! assignment.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::ModelDiagnostic;
use crate::model::types::decay;
use crate::model::{CallbackDecl, HandleDecl, MethodDecl, Model, VersionRegistry};
use crate::names;
use crate::scanner::FileTable;

/// Per-enum ownership overrides for enums declared in the common header,
/// which carries declarations for several interfaces at once. An empty key
/// means the enum is shared and stays unowned.
static COMMON_ENUM_OWNERS: &[(&str, &str)] = &[
    ("EOS_UI_EKeyCombination", "ui"),
    ("EOS_UI_EInputStateButtonFlags", "ui"),
    ("EOS_EResult", ""),
    ("EOS_ELoginStatus", ""),
    ("EOS_EExternalAccountType", ""),
    ("EOS_EExternalCredentialType", ""),
    ("EOS_EAttributeType", ""),
    ("EOS_EComparisonOp", ""),
];

/// Consolidate all scanned tables into one resolved [`Model`].
pub fn consolidate(
    tables: &[FileTable],
    versions: VersionRegistry,
    diagnostics: &mut Vec<ModelDiagnostic>,
) -> Model {
    let mut model = Model::with_versions(versions);

    // Handle and struct names must be globally known before any ownership
    // decision; collisions are an input invariant, not guarded.
    for table in tables {
        for handle in &table.handles {
            model.insert_handle(HandleDecl::new(handle));
        }
    }
    for table in tables {
        for decl in &table.structs {
            model.insert_struct(decl.clone());
        }
    }

    // Free callbacks pool; handle ownership claims from it, the rest is
    // filed as unhandled.
    let mut callback_pool: BTreeMap<String, CallbackDecl> = tables
        .iter()
        .flat_map(|t| t.callbacks.iter())
        .map(|cb| (cb.name.clone(), cb.clone()))
        .collect();

    for table in tables {
        for method in &table.methods {
            if let Some(interface) = accessor_interface_name(&method.name) {
                debug!("accessor {} -> interface {interface}", method.name);
                model.interfaces.insert(interface, method.clone());
                continue;
            }

            let owner = claim_method(&mut model, method, &mut callback_pool);

            if method.is_release() {
                model
                    .release_methods
                    .insert(method.name.clone(), method.clone());
                continue;
            }

            if owner.is_none() {
                // Free functions with no handle receiver are legitimate for
                // a few entry points, otherwise a modeling gap.
                debug!("unhandled method {}", method.name);
                model
                    .unhandled_methods
                    .insert(method.name.clone(), method.clone());
            }
        }
    }

    assign_enums(&mut model, tables, diagnostics);

    for (name, cb) in callback_pool {
        debug!("unhandled callback {name}");
        model.unhandled_callbacks.insert(name, cb);
    }

    check_interfaces(&model, tables, diagnostics);

    model
}

/// Derive the interface name from an accessor method, if it is one.
///
/// The name is the inner part of the `Get...Interface` token; every receiver
/// token before it is boilerplate. `Foo_GetBarInterface` yields `Bar`.
pub fn accessor_interface_name(method_name: &str) -> Option<String> {
    if !method_name.contains("_Get") || !method_name.ends_with("Interface") {
        return None;
    }
    method_name
        .split('_')
        .filter_map(|tok| tok.strip_prefix("Get"))
        .filter_map(|tok| tok.strip_suffix("Interface"))
        .find(|inner| !inner.is_empty())
        .map(str::to_string)
}

/// Move a method into the handle named by its first handle-typed argument.
/// First match wins and a method moves at most once. A claimed non-release
/// method drags its callback argument's declaration along.
fn claim_method(
    model: &mut Model,
    method: &MethodDecl,
    callback_pool: &mut BTreeMap<String, CallbackDecl>,
) -> Option<String> {
    let mut owner = None;
    let mut callback_ty = None;
    for arg in &method.args {
        let decayed = decay(&arg.ty);
        if owner.is_none() && model.handle_id(decayed).is_some() {
            owner = Some(decayed.to_string());
        }
        if decayed.ends_with("Callback") || decayed.ends_with("CallbackV2") {
            callback_ty = Some(decayed.to_string());
        }
    }

    let owner_name = owner?;
    let id = model.handle_id(&owner_name).expect("owner just matched");
    model
        .handle_mut(id)
        .methods
        .insert(method.name.clone(), method.clone());
    debug!("method {} -> handle {owner_name}", method.name);

    if !method.is_release() {
        if let Some(cb_name) = callback_ty {
            if let Some(cb) = callback_pool.remove(&cb_name) {
                model.handle_mut(id).callbacks.insert(cb_name, cb);
            }
        }
    }
    Some(owner_name)
}

/// Step 5: enums go to the handle of the interface their file belongs to,
/// with per-enum overrides for the shared common header.
fn assign_enums(model: &mut Model, tables: &[FileTable], diagnostics: &mut Vec<ModelDiagnostic>) {
    for table in tables {
        let mut missing_owner = 0usize;
        for decl in &table.enums {
            let key = enum_owner_key(&table.interface, &decl.name);
            let Some(key) = key else {
                model.unhandled_enums.push(decl.clone());
                continue;
            };
            let class = names::interface_class_name(&key);
            let owned = model.interfaces.contains_key(&class);
            let handle_id = model.handle_id(&format!("EOS_H{class}"));
            match (owned, handle_id) {
                (true, Some(id)) => model.handle_mut(id).enums.push(decl.clone()),
                (true, None) => {
                    missing_owner += 1;
                    model.unhandled_enums.push(decl.clone());
                }
                (false, _) => model.unhandled_enums.push(decl.clone()),
            }
        }
        if missing_owner > 0 {
            let interface = names::interface_class_name(&table.interface);
            warn!("{missing_owner} enums of `{interface}` have no handle to live on");
            diagnostics.push(ModelDiagnostic::EnumOwnerMissing {
                interface,
                count: missing_owner,
            });
        }
    }
}

fn enum_owner_key(file_interface: &str, enum_name: &str) -> Option<String> {
    if file_interface == "common" {
        let key = COMMON_ENUM_OWNERS
            .iter()
            .find(|(name, _)| *name == enum_name)
            .map(|(_, key)| *key)
            .unwrap_or("");
        return (!key.is_empty()).then(|| key.to_string());
    }
    Some(file_interface.to_string())
}

/// Accessor-derived interface names must match a scanned file's interface;
/// a mismatch is logged and collected, and processing continues.
fn check_interfaces(model: &Model, tables: &[FileTable], diagnostics: &mut Vec<ModelDiagnostic>) {
    for name in model.interfaces.keys() {
        let matched = tables
            .iter()
            .any(|t| names::interface_class_name(&t.interface) == *name);
        if !matched {
            warn!("interface `{name}` matches no scanned file");
            diagnostics.push(ModelDiagnostic::UnmatchedInterface {
                interface: name.clone(),
            });
        }
    }
}
