//! Name derivation helpers used as classification inputs.
//!
//! Header file names carry the interface an enum belongs to, and field name
//! tokens drive count/array pairing. Both derivations follow fixed tables;
//! none of this is general case conversion.

/// Derive the lower-case interface key from a header file name.
///
/// `eos_types.h` is the platform header despite its name.
pub fn interface_key_from_file(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    if base == "eos_types.h" {
        return "platform".to_string();
    }
    let mut key = base
        .strip_suffix("_types.h")
        .or_else(|| base.strip_suffix(".h"))
        .unwrap_or(base)
        .to_string();
    key = key.replace("_sdk", "_platform");
    key.strip_prefix("eos_").map(str::to_string).unwrap_or(key)
}

/// Convert an interface key into its exported class name.
///
/// Compound lower-case tokens and acronyms use a fixed casing table; anything
/// else is simply capitalized.
pub fn interface_class_name(key: &str) -> String {
    key.split('_')
        .filter(|tok| !tok.is_empty())
        .map(|tok| match tok {
            "rtc" => "RTC".to_string(),
            "p2p" => "P2P".to_string(),
            "ui" => "UI".to_string(),
            "kws" => "KWS".to_string(),
            "sdk" => "Platform".to_string(),
            "userinfo" => "UserInfo".to_string(),
            "playerdatastorage" => "PlayerDataStorage".to_string(),
            "titlestorage" => "TitleStorage".to_string(),
            "anticheatserver" => "AntiCheatServer".to_string(),
            "anticheatclient" => "AntiCheatClient".to_string(),
            "progressionsnapshot" => "ProgressionSnapshot".to_string(),
            "custominvites" => "CustomInvites".to_string(),
            "integratedplatform" => "IntegratedPlatform".to_string(),
            other => capitalize(other),
        })
        .collect()
}

fn capitalize(tok: &str) -> String {
    let mut chars = tok.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower a PascalCase field name to snake_case.
///
/// The replacement list repairs acronyms the naive split mangles; pairing
/// depends on these exact repairs.
pub fn to_snake_case(text: &str) -> String {
    let mut snake = String::with_capacity(text.len() + 4);
    for ch in text.chars() {
        if ch.is_uppercase() {
            snake.push('_');
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    let mut out = snake.trim_start_matches('_').to_string();
    for (from, to) in [
        ("u_r_i", "uri"),
        ("b_is", "is"),
        ("r_t_c", "rtc"),
        ("u_i_", "ui_"),
        ("k_w_s", "kws"),
        ("p2_p_", "p2p_"),
        ("n_a_t", "nat"),
    ] {
        out = out.replace(from, to);
    }
    out
}

/// Underscore-delimited tokens of a field name, lowered via [`to_snake_case`].
pub fn snake_tokens(text: &str) -> Vec<String> {
    to_snake_case(text)
        .split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
