//! Bespoke parsers for the three headers the general grammar cannot read.
//!
//! The result-code table and the two UI tables declare their members through
//! value macros, one per line, so these are plain line matchers.

use log::debug;

use crate::error::Result;
use crate::model::EnumDecl;

pub const RESULT_FILE: &str = "eos_result.h";
pub const UI_KEYS_FILE: &str = "eos_ui_keys.h";
pub const UI_BUTTONS_FILE: &str = "eos_ui_buttons.h";

pub fn is_special_file(file_name: &str) -> bool {
    matches!(file_name, RESULT_FILE | UI_KEYS_FILE | UI_BUTTONS_FILE)
}

/// Parse a special file if `file_name` is one, returning the interface key
/// the resulting enum belongs to. The reader closure keeps file I/O out of
/// the parsers themselves.
pub fn parse_special_file(
    file_name: &str,
    read: impl FnOnce() -> Result<String>,
) -> Result<Option<(String, EnumDecl)>> {
    let parsed = match file_name {
        RESULT_FILE => Some(("common".to_string(), parse_result_codes(&read()?))),
        UI_KEYS_FILE => Some(("ui".to_string(), parse_key_combinations(&read()?))),
        UI_BUTTONS_FILE => Some(("ui".to_string(), parse_input_button_flags(&read()?))),
        _ => None,
    };
    if let Some((interface, decl)) = &parsed {
        debug!(
            "{}: {} members of {} -> {}",
            file_name,
            decl.members.len(),
            decl.name,
            interface
        );
    }
    Ok(parsed)
}

/// `EOS_RESULT_VALUE(EOS_Success, 0)` lines → members of `EOS_EResult`.
pub fn parse_result_codes(text: &str) -> EnumDecl {
    let mut decl = EnumDecl::new("EOS_EResult");
    for line in text.lines() {
        if !line.starts_with("EOS_RESULT_VALUE") {
            continue;
        }
        if let Some(member) = line
            .split_once('(')
            .and_then(|(_, rest)| rest.split(", ").next())
        {
            decl.push_member(member.trim());
        }
    }
    decl
}

/// `EOS_UI_KEY_CONSTANT(EOS_UIK_, Shift, ...)` lines: the first two macro
/// arguments concatenated form the member name.
fn parse_ui_value_lines(text: &str, enum_name: &str) -> EnumDecl {
    let mut decl = EnumDecl::new(enum_name);
    for line in text.lines() {
        if !line.starts_with("EOS_UI_KEY_") {
            continue;
        }
        let inner = line
            .split_once('(')
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.rsplit_once(')').map(|(inner, _)| inner));
        let Some(inner) = inner else { continue };
        let parts: Vec<&str> = inner.split(", ").collect();
        if parts.len() >= 2 {
            decl.push_member(format!("{}{}", parts[0], parts[1]));
        }
    }
    decl
}

pub fn parse_key_combinations(text: &str) -> EnumDecl {
    parse_ui_value_lines(text, "EOS_UI_EKeyCombination")
}

pub fn parse_input_button_flags(text: &str) -> EnumDecl {
    parse_ui_value_lines(text, "EOS_UI_EInputStateButtonFlags")
}
