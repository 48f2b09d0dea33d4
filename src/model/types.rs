//! Raw C type text and the predicates the classifiers build on.
//!
//! Types stay as the source spelled them; everything downstream compares
//! decayed forms.

/// Struct-pointer fields that are arrays of structs rather than a single
/// nested struct. Pointer arity alone cannot tell "one" from "many" in this
/// dialect, so the distinction is a fixed (type, field) allow-list.
pub static STRUCT_ARRAY_FIELDS: &[(&str, &[&str])] = &[
    ("const EOS_Stats_IngestData*", &["Stats"]),
    ("const EOS_PresenceModification_DataRecordId*", &["Records"]),
    ("const EOS_Presence_DataRecord*", &["Records"]),
    ("const EOS_Leaderboards_UserScoresQueryStatInfo*", &["StatInfo"]),
    ("const EOS_Ecom_CheckoutEntry*", &["Entries"]),
    ("const EOS_AntiCheatCommon_RegisterEventParamDef*", &["ParamDefs"]),
    ("const EOS_AntiCheatCommon_LogEventParamPair*", &["Params"]),
];

/// Strip `const` qualification and pointer/reference decoration.
pub fn decay(ty: &str) -> &str {
    let mut t = ty.trim();
    if let Some(rest) = t.strip_prefix("const ") {
        t = rest.trim_start();
    }
    while let Some(rest) = t.strip_suffix('*').or_else(|| t.strip_suffix('&')) {
        t = rest.trim_end();
    }
    t.trim()
}

/// True for a raw pointer-typed field.
pub fn is_pointer(ty: &str) -> bool {
    ty.trim_end().ends_with('*')
}

/// Opaque handle types: the `EOS_H` prefix plus the one typedef that behaves
/// like a handle without carrying it.
pub fn is_handle_type(ty: &str) -> bool {
    ty.starts_with("EOS_H") || ty == "EOS_ContinuanceToken"
}

/// String and opaque-buffer pointers, which are never count-paired arrays.
pub fn is_opaque_buffer(ty: &str) -> bool {
    matches!(ty, "const char*" | "const void*" | "void*")
}

/// The untyped caller-context pointer threaded through async calls.
pub fn is_client_data(ty: &str, field: &str) -> bool {
    ty == "void*" && field == "ClientData"
}

/// The version stamp every options struct opens with.
pub fn is_version_stamp(ty: &str, field: &str) -> bool {
    ty == "int32_t" && field == "ApiVersion"
}

/// Optional-channel pointer: a byte pointer used as a nullable scalar.
pub fn is_requested_channel(ty: &str, field: &str) -> bool {
    ty == "const uint8_t*" && field == "RequestedChannel"
}

/// True if (type, field) names an element-of-array struct field.
pub fn is_struct_array_field(ty: &str, field: &str) -> bool {
    STRUCT_ARRAY_FIELDS
        .iter()
        .any(|(t, fields)| *t == ty && fields.contains(&field))
}
