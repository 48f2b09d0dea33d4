//! Fixed tables the emission stage consumes.
//!
//! These come straight from the SDK surface and are validated on every run:
//! a duplicate key with a disagreeing value is a modeling defect to report,
//! never something to resolve by last-write-wins.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Error, ModelDiagnostic, Result};

/// Default value a generated callback returns when the script side does not
/// answer, keyed by callback return type.
pub static CALLBACK_RETURN_DEFAULTS: &[(&str, &str)] = &[
    (
        "EOS_EIntegratedPlatformPreLogoutAction",
        "EOS_IPLA_ProcessLogoutImmediately",
    ),
    ("EOS_PlayerDataStorage_EReadResult", "EOS_RR_ContinueReading"),
    ("EOS_PlayerDataStorage_EWriteResult", "EOS_WR_ContinueWriting"),
    ("EOS_TitleStorage_EReadResult", "EOS_TS_RR_ContinueReading"),
];

/// Buffer-size macro for methods that return a string through an
/// out/in-out argument pair, keyed by method name.
pub static STRING_BUFFER_MACROS: &[(&str, &str)] = &[
    (
        "EOS_Connect_GetProductUserIdMapping",
        "EOS_CONNECT_EXTERNAL_ACCOUNT_ID_MAX_LENGTH",
    ),
    (
        "EOS_Ecom_CopyLastRedeemedEntitlementByIndex",
        "EOS_ECOM_ENTITLEMENTID_MAX_LENGTH",
    ),
    (
        "EOS_Ecom_Transaction_GetTransactionId",
        "EOS_ECOM_TRANSACTIONID_MAXIMUM_LENGTH",
    ),
    ("EOS_Lobby_GetInviteIdByIndex", "EOS_LOBBY_INVITEID_MAX_LENGTH"),
    ("EOS_Lobby_GetRTCRoomName", "256"),
    (
        "EOS_Lobby_GetConnectString",
        "EOS_LOBBY_GETCONNECTSTRING_BUFFER_SIZE",
    ),
    (
        "EOS_Lobby_ParseConnectString",
        "EOS_LOBBY_PARSECONNECTSTRING_BUFFER_SIZE",
    ),
    (
        "EOS_PlayerDataStorageFileTransferRequest_GetFilename",
        "EOS_PLAYERDATASTORAGE_FILENAME_MAX_LENGTH_BYTES",
    ),
    (
        "EOS_Presence_GetJoinInfo",
        "EOS_PRESENCEMODIFICATION_JOININFO_MAX_LENGTH",
    ),
    ("EOS_Platform_GetActiveCountryCode", "EOS_COUNTRYCODE_MAX_LENGTH"),
    ("EOS_Platform_GetActiveLocaleCode", "EOS_LOCALECODE_MAX_LENGTH"),
    (
        "EOS_Platform_GetOverrideCountryCode",
        "EOS_COUNTRYCODE_MAX_LENGTH",
    ),
    ("EOS_Platform_GetOverrideLocaleCode", "EOS_LOCALECODE_MAX_LENGTH"),
    ("EOS_Sessions_GetInviteIdByIndex", "EOS_LOBBY_INVITEID_MAX_LENGTH"),
    (
        "EOS_TitleStorageFileTransferRequest_GetFilename",
        "EOS_TITLESTORAGE_FILENAME_MAX_LENGTH_BYTES",
    ),
];

static RETURN_DEFAULTS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CALLBACK_RETURN_DEFAULTS.iter().copied().collect());

static BUFFER_MACROS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STRING_BUFFER_MACROS.iter().copied().collect());

/// Default value for a callback return type, if the type has one.
pub fn callback_return_default(return_type: &str) -> Option<&'static str> {
    RETURN_DEFAULTS.get(return_type).copied()
}

/// Buffer-size macro for a string-returning method. A miss means the
/// generated marshalling glue would be wrong, so the run halts.
pub fn string_buffer_macro(method_name: &str) -> Result<&'static str> {
    BUFFER_MACROS.get(method_name).copied().ok_or_else(|| {
        Error::lookup(method_name, "no string buffer-size macro registered")
    })
}

/// Scan the fixed tables for key collisions with disagreeing values.
pub fn validate_tables() -> Vec<ModelDiagnostic> {
    let mut diagnostics = Vec::new();
    collisions(CALLBACK_RETURN_DEFAULTS, &mut diagnostics);
    collisions(STRING_BUFFER_MACROS, &mut diagnostics);
    diagnostics
}

fn collisions(table: &[(&str, &str)], diagnostics: &mut Vec<ModelDiagnostic>) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (key, value) in table {
        match seen.get(key) {
            Some(first) if first != value => {
                diagnostics.push(ModelDiagnostic::DuplicateDefaultKey {
                    key: (*key).to_string(),
                    first: (*first).to_string(),
                    second: (*value).to_string(),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(key, value);
            }
        }
    }
}
