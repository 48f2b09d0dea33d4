//! Consolidation tests: per-file tables merged into one model with every
//! method, callback and enum migrated to its owner.

use eosgen::analysis::consolidate;
use eosgen::error::ModelDiagnostic;
use eosgen::model::Model;
use eosgen::scanner::{FileTable, Scanner};

const LOBBY_TYPES: &str = "\
#define EOS_LOBBY_CREATELOBBY_API_LATEST 1
typedef struct EOS_LobbyHandle* EOS_HLobby;
typedef struct EOS_LobbyDetailsHandle* EOS_HLobbyDetails;
EOS_ENUM(EOS_ELobbyType,
\tEOS_LT_Public = 0,
\tEOS_LT_Private = 1
);
EOS_STRUCT(EOS_Lobby_CreateLobbyOptions, (
\tint32_t ApiVersion;
\tuint32_t MaxLobbyMembers;
));
EOS_STRUCT(EOS_Lobby_CreateLobbyCallbackInfo, (
\tEOS_EResult ResultCode;
\tvoid* ClientData;
));
EOS_DECLARE_CALLBACK(EOS_Lobby_OnCreateLobbyCallback, const EOS_Lobby_CreateLobbyCallbackInfo* Data);
";

const LOBBY: &str = "\
EOS_DECLARE_FUNC(void) EOS_Lobby_CreateLobby(EOS_HLobby Handle, const EOS_Lobby_CreateLobbyOptions* Options, void* ClientData, const EOS_Lobby_OnCreateLobbyCallback CompletionDelegate);
EOS_DECLARE_FUNC(void) EOS_LobbyDetails_Release(EOS_HLobbyDetails LobbyDetailsHandle);
EOS_DECLARE_FUNC(void) EOS_Shutdown(void);
";

const PLATFORM: &str = "\
typedef struct EOS_PlatformHandle* EOS_HPlatform;
EOS_DECLARE_FUNC(EOS_HLobby) EOS_Platform_GetLobbyInterface(EOS_HPlatform Handle);
";

fn build_model(files: &[(&str, &str)]) -> (Model, Vec<ModelDiagnostic>) {
    let mut scanner = Scanner::new();
    let tables: Vec<FileTable> = files
        .iter()
        .map(|(name, text)| scanner.scan_file(name, text).unwrap())
        .collect();
    let mut diagnostics = Vec::new();
    let model = consolidate(&tables, scanner.into_versions(), &mut diagnostics);
    (model, diagnostics)
}

fn lobby_fixture() -> (Model, Vec<ModelDiagnostic>) {
    build_model(&[
        ("eos_lobby_types.h", LOBBY_TYPES),
        ("eos_lobby.h", LOBBY),
        ("eos_platform.h", PLATFORM),
    ])
}

#[test]
fn test_version_registry_is_carried_into_the_model() {
    let (model, _) = lobby_fixture();
    assert!(model.versions.contains("EOS_LOBBY_CREATELOBBY_API_LATEST"));
    assert_eq!(model.versions.len(), 1);
}

#[test]
fn test_method_migrates_to_first_handle_argument() {
    let (model, _) = lobby_fixture();
    let id = model.handle_id("EOS_HLobby").unwrap();
    let lobby = model.handle(id);
    assert!(lobby.methods.contains_key("EOS_Lobby_CreateLobby"));
    assert!(!model.unhandled_methods.contains_key("EOS_Lobby_CreateLobby"));
}

#[test]
fn test_claimed_method_drags_its_callback_along() {
    let (model, _) = lobby_fixture();
    let lobby = model.handle(model.handle_id("EOS_HLobby").unwrap());
    assert!(lobby
        .callbacks
        .contains_key("EOS_Lobby_OnCreateLobbyCallback"));
    assert!(!model
        .unhandled_callbacks
        .contains_key("EOS_Lobby_OnCreateLobbyCallback"));
}

#[test]
fn test_release_methods_register_globally_and_on_the_handle() {
    let (model, _) = lobby_fixture();
    assert!(model.release_methods.contains_key("EOS_LobbyDetails_Release"));
    // The release method also lives on its receiver handle.
    let details = model.handle(model.handle_id("EOS_HLobbyDetails").unwrap());
    assert!(details.methods.contains_key("EOS_LobbyDetails_Release"));
    // And it can be looked up by the struct name it frees.
    assert!(model.release_method_for("EOS_LobbyDetails").is_ok());
    assert!(model.release_method_for("EOS_Nothing").is_err());
}

#[test]
fn test_accessor_becomes_interface_not_method() {
    let (model, diagnostics) = lobby_fixture();
    assert!(model.interfaces.contains_key("Lobby"));
    let platform = model.handle(model.handle_id("EOS_HPlatform").unwrap());
    assert!(!platform.methods.contains_key("EOS_Platform_GetLobbyInterface"));
    // "Lobby" maps to a scanned file, so nothing is unmatched.
    assert!(!diagnostics
        .iter()
        .any(|d| matches!(d, ModelDiagnostic::UnmatchedInterface { .. })));
}

#[test]
fn test_receiverless_function_files_as_unhandled() {
    let (model, _) = lobby_fixture();
    assert!(model.unhandled_methods.contains_key("EOS_Shutdown"));
}

#[test]
fn test_enum_migrates_to_its_interface_handle() {
    let (model, _) = lobby_fixture();
    let lobby = model.handle(model.handle_id("EOS_HLobby").unwrap());
    assert_eq!(lobby.enums.len(), 1);
    assert_eq!(lobby.enums[0].name, "EOS_ELobbyType");
    assert!(model.unhandled_enums.is_empty());
}

#[test]
fn test_enum_without_accessor_stays_unhandled() {
    // No platform file, so no Lobby interface is registered.
    let (model, _) = build_model(&[("eos_lobby_types.h", LOBBY_TYPES)]);
    assert!(model
        .unhandled_enums
        .iter()
        .any(|e| e.name == "EOS_ELobbyType"));
}

#[test]
fn test_interface_with_known_key_but_no_handle_is_diagnosed() {
    // An accessor and an enum-bearing file for an interface whose handle
    // typedef is missing entirely.
    let types = "\
EOS_ENUM(EOS_EMetricsAccountIdType,
\tEOS_MAIT_Epic = 0
);
";
    let platform = "\
typedef struct EOS_PlatformHandle* EOS_HPlatform;
EOS_DECLARE_FUNC(void*) EOS_Platform_GetMetricsInterface(EOS_HPlatform Handle);
";
    let (model, diagnostics) = build_model(&[
        ("eos_metrics_types.h", types),
        ("eos_platform.h", platform),
    ]);
    assert!(model
        .unhandled_enums
        .iter()
        .any(|e| e.name == "EOS_EMetricsAccountIdType"));
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        ModelDiagnostic::EnumOwnerMissing { interface, count: 1 } if interface == "Metrics"
    )));
}

#[test]
fn test_no_argument_accessor_is_still_extracted() {
    let text = "EOS_DECLARE_FUNC(void*) Foo_GetBarInterface(void);\n";
    let (model, _) = build_model(&[("eos_foo.h", text)]);
    assert!(model.interfaces.contains_key("Bar"));
    assert!(model.unhandled_methods.is_empty());
}

#[test]
fn test_unmatched_interface_is_diagnosed() {
    let platform = "\
typedef struct EOS_PlatformHandle* EOS_HPlatform;
EOS_DECLARE_FUNC(void*) EOS_Platform_GetGhostInterface(EOS_HPlatform Handle);
";
    let (_, diagnostics) = build_model(&[("eos_platform.h", platform)]);
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        ModelDiagnostic::UnmatchedInterface { interface } if interface == "Ghost"
    )));
}

#[test]
fn test_consolidation_is_deterministic() {
    let (first, _) = lobby_fixture();
    let (second, _) = lobby_fixture();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
