//! Per-field role resolution: version stamps, count/array pairing, unions
//! and their discriminants, and the fixed special cases.

use eosgen::analysis::{consolidate, field_roles};
use eosgen::error::{Error, ModelDiagnostic};
use eosgen::model::{FieldRole, FieldRoleEntry, Model};
use eosgen::scanner::Scanner;

fn build(files: &[(&str, &str)]) -> (Model, Vec<Vec<FieldRoleEntry>>, Vec<ModelDiagnostic>) {
    let mut scanner = Scanner::new();
    let tables: Vec<_> = files
        .iter()
        .map(|(name, text)| scanner.scan_file(name, text).unwrap())
        .collect();
    let mut diagnostics = Vec::new();
    let model = consolidate(&tables, scanner.into_versions(), &mut diagnostics);
    let resolved = field_roles::resolve(&model, &mut diagnostics).unwrap();
    (model, resolved, diagnostics)
}

fn role_of<'a>(
    model: &Model,
    resolved: &'a [Vec<FieldRoleEntry>],
    strukt: &str,
    field: &str,
) -> &'a FieldRole {
    let id = model.struct_id(strukt).unwrap();
    &resolved[id.0 as usize]
        .iter()
        .find(|e| e.field == field)
        .unwrap()
        .role
}

const PRESENCE: &str = "\
#define EOS_PRESENCE_DATARECORD_API_LATEST 2
#define EOS_PRESENCEMODIFICATION_SETDATA_API_LATEST 1
EOS_STRUCT(EOS_Presence_DataRecord, (
\tint32_t ApiVersion;
\tconst char* Key;
\tconst char* Value;
));
EOS_STRUCT(EOS_PresenceModification_SetDataOptions, (
\tint32_t ApiVersion;
\tuint32_t RecordsCount;
\tconst EOS_Presence_DataRecord* Records;
));
";

#[test]
fn test_count_and_struct_array_pairing() {
    let (model, resolved, diagnostics) = build(&[("eos_presence_types.h", PRESENCE)]);
    let opts = "EOS_PresenceModification_SetDataOptions";

    assert_eq!(role_of(&model, &resolved, opts, "RecordsCount"), &FieldRole::Count);
    assert_eq!(
        role_of(&model, &resolved, opts, "Records"),
        &FieldRole::StructArray {
            element: "EOS_Presence_DataRecord".to_string(),
            count_field: Some("RecordsCount".to_string()),
        }
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_version_stamp_macro_resolution() {
    let (model, resolved, _) = build(&[("eos_presence_types.h", PRESENCE)]);

    // Direct uppercase, then the Options-stripped form.
    assert_eq!(
        role_of(&model, &resolved, "EOS_Presence_DataRecord", "ApiVersion"),
        &FieldRole::Version {
            latest_macro: "EOS_PRESENCE_DATARECORD_API_LATEST".to_string()
        }
    );
    assert_eq!(
        role_of(
            &model,
            &resolved,
            "EOS_PresenceModification_SetDataOptions",
            "ApiVersion"
        ),
        &FieldRole::Version {
            latest_macro: "EOS_PRESENCEMODIFICATION_SETDATA_API_LATEST".to_string()
        }
    );
}

#[test]
fn test_missing_version_macro_halts() {
    let text = "\
EOS_STRUCT(EOS_Nowhere_Options, (
\tint32_t ApiVersion;
));
";
    let mut scanner = Scanner::new();
    let tables = vec![scanner.scan_file("eos_nowhere_types.h", text).unwrap()];
    let mut diagnostics = Vec::new();
    let model = consolidate(&tables, scanner.into_versions(), &mut diagnostics);
    let err = field_roles::resolve(&model, &mut diagnostics).unwrap_err();
    assert!(matches!(err, Error::Lookup { .. }));
}

#[test]
fn test_union_with_discriminant() {
    let text = "\
#define EOS_LOBBY_ATTRIBUTEDATA_API_LATEST 1
EOS_STRUCT(EOS_Lobby_AttributeData, (
\tint32_t ApiVersion;
\tconst char* Key;
\tunion
\t{
\t\tint64_t AsInt64;
\t\tdouble AsDouble;
\t} Value;
\tEOS_ELobbyAttributeType ValueType;
));
";
    let (model, resolved, diagnostics) = build(&[("eos_lobby_types.h", text)]);
    assert_eq!(
        role_of(&model, &resolved, "EOS_Lobby_AttributeData", "Value"),
        &FieldRole::Union {
            discriminant: Some("ValueType".to_string())
        }
    );
    // The discriminant is claimed by the union and never enumerated on its
    // own.
    assert_eq!(
        role_of(&model, &resolved, "EOS_Lobby_AttributeData", "ValueType"),
        &FieldRole::Discriminant
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_union_without_discriminant_is_diagnosed() {
    let text = "\
EOS_STRUCT(EOS_Thing_Event, (
\tunion
\t{
\t\tint64_t AsInt64;
\t} Payload;
));
";
    let (model, resolved, diagnostics) = build(&[("eos_thing_types.h", text)]);
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_Event", "Payload"),
        &FieldRole::Union { discriminant: None }
    );
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        ModelDiagnostic::UnresolvedDiscriminant { strukt, field }
            if strukt == "EOS_Thing_Event" && field == "Payload"
    )));
}

#[test]
fn test_ambiguous_count_pairing_is_reported_not_guessed() {
    let text = "\
EOS_STRUCT(EOS_Thing_Batch, (
\tuint32_t DataCount;
\tuint32_t DataSize;
\tconst uint64_t* DataRecords;
));
";
    let (model, resolved, diagnostics) = build(&[("eos_thing_types.h", text)]);
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_Batch", "DataRecords"),
        &FieldRole::Array { count_field: None }
    );
    // Neither candidate is consumed as a count.
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_Batch", "DataCount"),
        &FieldRole::Scalar
    );
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_Batch", "DataSize"),
        &FieldRole::Scalar
    );
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        ModelDiagnostic::AmbiguousCountPairing { strukt, field, candidates }
            if strukt == "EOS_Thing_Batch" && field == "DataRecords" && candidates.len() == 2
    )));
}

#[test]
fn test_sole_partial_candidate_is_accepted() {
    let text = "\
EOS_STRUCT(EOS_Thing_List, (
\tuint32_t DataCount;
\tconst uint64_t* DataRecords;
));
";
    let (model, resolved, diagnostics) = build(&[("eos_thing_types.h", text)]);
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_List", "DataRecords"),
        &FieldRole::Array {
            count_field: Some("DataCount".to_string())
        }
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_special_case_fields() {
    let text = "\
EOS_STRUCT(EOS_P2P_SendPacketOptions, (
\tvoid* ClientData;
\tEOS_HLobby LobbyHandle;
\tconst uint8_t* RequestedChannel;
\tconst char* Message;
\tconst void* Data;
\tuint32_t Reserved;
\tint32_t OldField_DEPRECATED;
));
";
    let (model, resolved, _) = build(&[("eos_p2p_types.h", text)]);
    let s = "EOS_P2P_SendPacketOptions";
    assert_eq!(role_of(&model, &resolved, s, "ClientData"), &FieldRole::ClientData);
    assert_eq!(role_of(&model, &resolved, s, "LobbyHandle"), &FieldRole::Handle);
    // The optional channel is a nullable scalar, never count-paired.
    assert_eq!(role_of(&model, &resolved, s, "RequestedChannel"), &FieldRole::Scalar);
    // Strings and opaque buffers are not arrays either.
    assert_eq!(role_of(&model, &resolved, s, "Message"), &FieldRole::Scalar);
    assert_eq!(role_of(&model, &resolved, s, "Data"), &FieldRole::Scalar);
    assert_eq!(role_of(&model, &resolved, s, "Reserved"), &FieldRole::Deprecated);
    assert_eq!(
        role_of(&model, &resolved, s, "OldField_DEPRECATED"),
        &FieldRole::Deprecated
    );
}

#[test]
fn test_plain_nested_struct_field() {
    let text = "\
#define EOS_THING_INNER_API_LATEST 1
EOS_STRUCT(EOS_Thing_Inner, (
\tint32_t ApiVersion;
));
EOS_STRUCT(EOS_Thing_Outer, (
\tEOS_Thing_Inner Template;
));
";
    let (model, resolved, _) = build(&[("eos_thing_types.h", text)]);
    assert_eq!(
        role_of(&model, &resolved, "EOS_Thing_Outer", "Template"),
        &FieldRole::InternalStruct
    );
}
