//! Per-field classification: version stamps, count/array pairs, client
//! data, handles, unions and their discriminants.
//!
//! Count/array pairing works on name similarity alone; the grammar offers
//! nothing better. Zero or several equally good candidates are reported,
//! never guessed.

use std::cmp::min;
use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Error, ModelDiagnostic, Result};
use crate::model::types::{
    decay, is_client_data, is_handle_type, is_opaque_buffer, is_pointer, is_requested_channel,
    is_struct_array_field, is_version_stamp,
};
use crate::model::{FieldRole, FieldRoleEntry, FieldType, Model, StructDecl, VersionRegistry};

/// Resolve field roles for every struct. Indexed by `StructId`.
pub fn resolve(
    model: &Model,
    diagnostics: &mut Vec<ModelDiagnostic>,
) -> Result<Vec<Vec<FieldRoleEntry>>> {
    let mut all = Vec::with_capacity(model.struct_count());
    for (_, decl) in model.structs() {
        all.push(resolve_struct(model, decl, diagnostics)?);
    }
    Ok(all)
}

/// Fields skipped entirely: deprecated by suffix, or on the fixed list of
/// fields the bindings never surface.
pub fn is_deprecated_field(name: &str) -> bool {
    name.ends_with("_DEPRECATED")
        || matches!(
            name,
            "Reserved"
                | "ReadFileDataCallback"
                | "FileTransferProgressCallback"
                | "WriteFileDataCallback"
                | "PlatformSpecificOptions"
                | "SystemSpecificOptions"
                | "InitOptions"
                | "IntegratedPlatformOptionsContainerHandle"
                | "SystemMemoryMonitorReport"
        )
}

fn resolve_struct(
    model: &Model,
    decl: &StructDecl,
    diagnostics: &mut Vec<ModelDiagnostic>,
) -> Result<Vec<FieldRoleEntry>> {
    let field_names: Vec<&str> = decl.fields.iter().map(|f| f.name.as_str()).collect();

    // Pre-pass: pair every array-like field with its count sibling and
    // collect union discriminants, so those siblings are excluded from
    // independent classification below.
    let mut count_fields: BTreeSet<String> = BTreeSet::new();
    let mut pairings: BTreeMap<String, Option<String>> = BTreeMap::new();
    let mut discriminants: BTreeSet<String> = BTreeSet::new();

    for field in &decl.fields {
        if is_deprecated_field(&field.name) {
            continue;
        }
        match &field.ty {
            FieldType::Union(_) => {
                let sibling = format!("{}Type", field.name);
                if decl.has_field(&sibling) {
                    discriminants.insert(sibling);
                } else {
                    diagnostics.push(ModelDiagnostic::UnresolvedDiscriminant {
                        strukt: decl.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
            FieldType::Plain(raw) => {
                if is_struct_array_field(raw, &field.name) || is_array_field(model, raw, &field.name)
                {
                    let paired =
                        pair_count_field(&decl.name, &field.name, &field_names, diagnostics);
                    if let Some(count) = &paired {
                        count_fields.insert(count.clone());
                    }
                    pairings.insert(field.name.clone(), paired);
                }
            }
        }
    }

    let mut entries = Vec::with_capacity(decl.fields.len());
    for field in &decl.fields {
        let role = if is_deprecated_field(&field.name) {
            FieldRole::Deprecated
        } else if count_fields.contains(&field.name) {
            FieldRole::Count
        } else if discriminants.contains(&field.name) {
            FieldRole::Discriminant
        } else {
            match &field.ty {
                FieldType::Union(_) => FieldRole::Union {
                    discriminant: decl
                        .has_field(&format!("{}Type", field.name))
                        .then(|| format!("{}Type", field.name)),
                },
                FieldType::Plain(raw) => {
                    plain_field_role(model, decl, raw, &field.name, &pairings)?
                }
            }
        };
        entries.push(FieldRoleEntry {
            field: field.name.clone(),
            role,
        });
    }
    Ok(entries)
}

fn plain_field_role(
    model: &Model,
    decl: &StructDecl,
    raw: &str,
    field: &str,
    pairings: &BTreeMap<String, Option<String>>,
) -> Result<FieldRole> {
    if is_version_stamp(raw, field) {
        return Ok(FieldRole::Version {
            latest_macro: resolve_latest_macro(&decl.name, &model.versions)?,
        });
    }
    if is_requested_channel(raw, field) {
        // Optional channel: a nullable scalar, not an array.
        return Ok(FieldRole::Scalar);
    }
    if is_struct_array_field(raw, field) {
        return Ok(FieldRole::StructArray {
            element: decay(raw).to_string(),
            count_field: pairings.get(field).cloned().flatten(),
        });
    }
    if model.is_struct_type(decay(raw)) {
        return Ok(FieldRole::InternalStruct);
    }
    if is_handle_type(raw) {
        return Ok(FieldRole::Handle);
    }
    if is_client_data(raw, field) {
        return Ok(FieldRole::ClientData);
    }
    if is_array_field(model, raw, field) {
        return Ok(FieldRole::Array {
            count_field: pairings.get(field).cloned().flatten(),
        });
    }
    Ok(FieldRole::Scalar)
}

/// A count-paired data pointer: any pointer type that is not a string or
/// opaque buffer, not the optional-channel exception, and not a struct or
/// struct-array field.
fn is_array_field(model: &Model, raw: &str, field: &str) -> bool {
    if is_struct_array_field(raw, field)
        || is_requested_channel(raw, field)
        || is_opaque_buffer(raw)
        || is_handle_type(raw)
        || model.is_struct_type(decay(raw))
    {
        return false;
    }
    is_pointer(raw)
}

/// Pair an array field with its count sibling by token similarity.
///
/// Candidates carry a count-like suffix; both names are snake-tokenized and
/// compared on up to the first two tokens with plural suffixes stripped. A
/// full match wins outright; a sole partial overlap is accepted as
/// fallback; anything else is reported as ambiguous.
fn pair_count_field(
    strukt: &str,
    field: &str,
    fields: &[&str],
    diagnostics: &mut Vec<ModelDiagnostic>,
) -> Option<String> {
    let target: Vec<String> = crate::names::snake_tokens(field)
        .into_iter()
        .map(|t| strip_array_plural(&t))
        .collect();

    let mut partial: Vec<String> = Vec::new();
    for candidate in fields {
        if *candidate == field || !has_count_suffix(candidate) {
            continue;
        }
        let tokens = crate::names::snake_tokens(candidate);
        let limit = min(2, min(tokens.len(), target.len()));
        let mut similar = 0;
        for i in 0..limit {
            if strip_count_plural(&tokens[i]) == target[i] {
                similar += 1;
            } else {
                break;
            }
        }
        if limit > 0 && similar >= limit {
            return Some((*candidate).to_string());
        }
        if similar > 0 {
            partial.push((*candidate).to_string());
        }
    }

    if partial.len() == 1 {
        debug!(
            "count pairing fallback for {strukt}.{field}: sole partial candidate {}",
            partial[0]
        );
        return partial.pop();
    }

    diagnostics.push(ModelDiagnostic::AmbiguousCountPairing {
        strukt: strukt.to_string(),
        field: field.to_string(),
        candidates: partial,
    });
    None
}

fn has_count_suffix(name: &str) -> bool {
    name.ends_with("Count")
        || name.ends_with("Size")
        || name.ends_with("Length")
        || name.ends_with("LengthBytes")
        || name.ends_with("SizeBytes")
}

fn strip_count_plural(token: &str) -> &str {
    let t = token.strip_suffix('s').unwrap_or(token);
    t.strip_suffix('y').unwrap_or(t)
}

fn strip_array_plural(token: &str) -> String {
    let t = token.strip_suffix("ies").unwrap_or(token);
    t.strip_suffix('s').unwrap_or(t).to_string()
}

/// Resolve the latest-version macro a struct's version stamp is filled
/// with. The fallback chain is fixed; generated code depends on trying it
/// in exactly this order.
pub fn resolve_latest_macro(struct_name: &str, versions: &VersionRegistry) -> Result<String> {
    let upper = struct_name.to_uppercase();
    let trimmed = struct_name
        .strip_suffix("Options")
        .unwrap_or(struct_name)
        .to_uppercase();
    let candidates = [
        format!("{upper}_API_LATEST"),
        format!("{trimmed}_API_LATEST"),
        format!("{upper}OPTIONS_API_LATEST"),
        format!("{upper}_OPTIONS_API_LATEST"),
    ];
    for candidate in candidates {
        if versions.contains(&candidate) {
            return Ok(candidate);
        }
    }

    // Exceptions that never match any naming pattern, consulted only once
    // the chain is exhausted.
    match struct_name {
        "EOS_UserInfo" | "EOS_UserInfo_CopyUserInfoOptions" => {
            Ok("EOS_USERINFO_COPYUSERINFO_API_LATEST".to_string())
        }
        "EOS_SessionSearch_SetMaxResultsOptions" => {
            Ok("EOS_SESSIONSEARCH_SETMAXSEARCHRESULTS_API_LATEST".to_string())
        }
        _ => Err(Error::lookup(
            struct_name,
            "no *_API_LATEST macro matches any fallback pattern",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_suffixes() {
        assert!(has_count_suffix("FileCount"));
        assert!(has_count_suffix("DataLengthBytes"));
        assert!(has_count_suffix("AllocationSize"));
        assert!(!has_count_suffix("Files"));
    }

    #[test]
    fn test_plural_stripping_meets_in_the_middle() {
        // "Entries" and "EntryCount" normalize to the same stem.
        assert_eq!(strip_array_plural("entries"), "entr");
        assert_eq!(strip_count_plural("entry"), "entr");
        assert_eq!(strip_array_plural("records"), "record");
        assert_eq!(strip_count_plural("record"), "record");
    }

    #[test]
    fn test_exact_pairing_wins() {
        let mut diagnostics = Vec::new();
        let fields = ["Files", "FileCount", "Unrelated"];
        let paired = pair_count_field("S", "Files", &fields, &mut diagnostics);
        assert_eq!(paired, Some("FileCount".to_string()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_version_macro_fallback_chain() {
        let mut versions = VersionRegistry::default();
        versions.register("EOS_LOBBY_CREATELOBBY_API_LATEST");
        assert_eq!(
            resolve_latest_macro("EOS_Lobby_CreateLobbyOptions", &versions).unwrap(),
            "EOS_LOBBY_CREATELOBBY_API_LATEST"
        );

        versions.register("EOS_LOBBY_JOINLOBBYOPTIONS_API_LATEST");
        assert_eq!(
            resolve_latest_macro("EOS_Lobby_JoinLobby", &versions).unwrap(),
            "EOS_LOBBY_JOINLOBBYOPTIONS_API_LATEST"
        );

        assert!(resolve_latest_macro("EOS_Nowhere_Options", &versions).is_err());
    }

    #[test]
    fn test_special_case_macros() {
        let versions = VersionRegistry::default();
        assert_eq!(
            resolve_latest_macro("EOS_UserInfo", &versions).unwrap(),
            "EOS_USERINFO_COPYUSERINFO_API_LATEST"
        );
        assert_eq!(
            resolve_latest_macro("EOS_SessionSearch_SetMaxResultsOptions", &versions).unwrap(),
            "EOS_SESSIONSEARCH_SETMAXSEARCHRESULTS_API_LATEST"
        );
    }

    #[test]
    fn test_registered_macro_beats_the_special_case() {
        let mut versions = VersionRegistry::default();
        versions.register("EOS_USERINFO_API_LATEST");
        assert_eq!(
            resolve_latest_macro("EOS_UserInfo", &versions).unwrap(),
            "EOS_USERINFO_API_LATEST"
        );
    }
}
