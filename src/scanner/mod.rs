//! Declaration scanner: one header file in, raw per-file tables out.
//!
//! The input is a constrained macro dialect, not general C: enum blocks,
//! struct blocks with optional embedded unions, function and callback
//! declaration macros, opaque-handle typedefs and version macros. Nothing
//! here looks across files; the only shared state is the version-macro
//! registry.

pub mod special;

use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{
    Arg, CallbackDecl, EnumDecl, FieldDecl, FieldType, MethodDecl, StructDecl, UnionArm,
    VersionRegistry,
};
use crate::names;

/// Prelude headers that declare nothing the model needs.
pub const PRELUDE_FILES: &[&str] = &[
    "eos_base.h",
    "eos_platform_prereqs.h",
    "eos_version.h",
    "eos_init.h",
];

/// Declarations the SDK ships but has deprecated in place.
const SKIPPED_METHODS: &[&str] = &["EOS_Achievements_AddNotifyAchievementsUnlocked"];

static VERSION_MACRO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#define\s+(EOS_\w*_API_LATEST)\b").unwrap());

/// Raw tables scanned from a single header file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileTable {
    /// Interface key derived from the file name (`lobby`, `platform`, ...).
    pub interface: String,
    pub file: String,
    pub enums: Vec<EnumDecl>,
    pub structs: Vec<StructDecl>,
    /// Handle type names; sub-tables exist only after consolidation.
    pub handles: Vec<String>,
    pub methods: Vec<MethodDecl>,
    pub callbacks: Vec<CallbackDecl>,
}

impl FileTable {
    fn new(file: &str) -> Self {
        FileTable {
            interface: names::interface_key_from_file(file),
            file: file.to_string(),
            ..Default::default()
        }
    }
}

/// Line-driven scanner. Whole files are read before scanning; the version
/// registry is the only state carried across files.
#[derive(Debug, Default)]
pub struct Scanner {
    versions: VersionRegistry,
}

impl Scanner {
    pub fn new() -> Self {
        Scanner::default()
    }

    pub fn versions(&self) -> &VersionRegistry {
        &self.versions
    }

    pub fn into_versions(self) -> VersionRegistry {
        self.versions
    }

    /// Scan one header file's text into its raw tables.
    pub fn scan_file(&mut self, file_name: &str, text: &str) -> Result<FileTable> {
        let mut table = FileTable::new(file_name);
        let lines: Vec<&str> = text.lines().collect();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if let Some(caps) = VERSION_MACRO_RE.captures(line) {
                self.versions.register(&caps[1]);
                i += 1;
                continue;
            }

            if line.contains("typedef struct ") && line.contains("Handle*") {
                table.handles.push(parse_handle_typedef(file_name, i, line)?);
                i += 1;
                continue;
            }

            if line.starts_with("EOS_ENUM(") {
                i = parse_enum_block(file_name, &lines, i, &mut table)?;
                continue;
            }

            if line.starts_with("EOS_DECLARE_FUNC") {
                if let Some(method) = parse_method(file_name, i, line)? {
                    table.methods.push(method);
                }
                i += 1;
                continue;
            }

            if line.starts_with("EOS_DECLARE_CALLBACK") {
                table.callbacks.push(parse_callback(file_name, i, line)?);
                i += 1;
                continue;
            }

            if line.starts_with("EOS_STRUCT") {
                i = parse_struct_block(file_name, &lines, i, &mut table)?;
                continue;
            }

            i += 1;
        }

        debug!(
            "{}: {} enums, {} structs, {} handles, {} methods, {} callbacks",
            file_name,
            table.enums.len(),
            table.structs.len(),
            table.handles.len(),
            table.methods.len(),
            table.callbacks.len(),
        );
        Ok(table)
    }
}

/// Scan every header in a directory. Subdirectories, deprecated headers and
/// the prelude list are skipped; the three special-cased files go through
/// their bespoke line matchers instead of the general grammar.
pub fn scan_dir(dir: &Path) -> Result<(Vec<FileTable>, VersionRegistry)> {
    let mut scanner = Scanner::new();
    let mut tables: Vec<FileTable> = Vec::new();

    let mut entries: Vec<_> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();

    for file_name in &entries {
        if file_name.contains("deprecated")
            || PRELUDE_FILES.contains(&file_name.as_str())
            || special::is_special_file(file_name)
        {
            continue;
        }
        let text = fs::read_to_string(dir.join(file_name))?;
        tables.push(scanner.scan_file(file_name, &text)?);
    }

    for file_name in &entries {
        if let Some((interface, enum_decl)) = special::parse_special_file(file_name, || {
            fs::read_to_string(dir.join(file_name)).map_err(Error::from)
        })? {
            if let Some(t) = tables.iter_mut().find(|t| t.interface == interface) {
                t.enums.push(enum_decl);
            } else {
                let mut t = FileTable::new(file_name);
                t.interface = interface;
                t.enums.push(enum_decl);
                tables.push(t);
            }
        }
    }

    Ok((tables, scanner.into_versions()))
}

fn parse_handle_typedef(file: &str, line_no: usize, line: &str) -> Result<String> {
    let rest = line
        .split_once("* ")
        .map(|(_, rest)| rest)
        .ok_or_else(|| Error::structural(file, line_no + 1, "unsplittable handle typedef"))?;
    let name = rest.split(';').next().unwrap_or("").trim();
    if name.is_empty() {
        return Err(Error::structural(file, line_no + 1, "handle typedef without a name"));
    }
    Ok(name.to_string())
}

/// Collect enum members until the `");"` terminator, skipping blank,
/// comment and continuation lines and stripping explicit values.
fn parse_enum_block(
    file: &str,
    lines: &[&str],
    start: usize,
    table: &mut FileTable,
) -> Result<usize> {
    let head = lines[start];
    let name = head
        .split_once('(')
        .and_then(|(_, rest)| rest.split(',').next())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::structural(file, start + 1, "unsplittable enum head"))?;
    let mut decl = EnumDecl::new(name);

    let mut i = start + 1;
    loop {
        let line = lines.get(i).ok_or_else(|| {
            Error::structural(file, start + 1, format!("unterminated enum block `{name}`"))
        })?;
        if line.starts_with(");") {
            break;
        }
        let member = line
            .trim_start_matches('\t')
            .trim_end()
            .trim_end_matches(',');
        if member.is_empty() || member.starts_with([' ', '/', '*']) {
            i += 1;
            continue;
        }
        decl.push_member(member.split(" = ").next().unwrap_or(member).trim());
        i += 1;
    }

    table.enums.push(decl);
    Ok(i + 1)
}

/// `EOS_DECLARE_FUNC(Ret) Name(args);` — return type from the macro head,
/// comma-split arguments, lone `void` dropped.
fn parse_method(file: &str, line_no: usize, line: &str) -> Result<Option<MethodDecl>> {
    let after_macro = line
        .strip_prefix("EOS_DECLARE_FUNC(")
        .ok_or_else(|| Error::structural(file, line_no + 1, "unsplittable function macro"))?;
    let (ret, rest) = after_macro
        .split_once(')')
        .ok_or_else(|| Error::structural(file, line_no + 1, "unterminated return type"))?;
    let rest = rest.trim_start();
    let (name, rest) = rest
        .split_once('(')
        .ok_or_else(|| Error::structural(file, line_no + 1, "function without argument list"))?;
    let name = name.trim();
    if SKIPPED_METHODS.contains(&name) {
        return Ok(None);
    }
    let args_text = rest
        .rsplit_once(')')
        .map(|(args, _)| args)
        .ok_or_else(|| Error::structural(file, line_no + 1, "unterminated argument list"))?;

    let mut args = Vec::new();
    for piece in args_text.split(", ") {
        let piece = piece.trim();
        if piece.is_empty() || piece == "void" {
            continue;
        }
        let (ty, arg_name) = piece.rsplit_once(' ').ok_or_else(|| {
            Error::structural(
                file,
                line_no + 1,
                format!("argument `{piece}` of `{name}` has no (type, name) shape"),
            )
        })?;
        args.push(Arg {
            ty: ty.to_string(),
            name: arg_name.to_string(),
        });
    }

    Ok(Some(MethodDecl {
        name: name.to_string(),
        ret: ret.trim().to_string(),
        args,
    }))
}

/// Both callback macro variants. The final (type, name) pair is always the
/// single input-data argument; `RETVALUE` carries the return type first.
fn parse_callback(file: &str, line_no: usize, line: &str) -> Result<CallbackDecl> {
    let has_return = line.starts_with("EOS_DECLARE_CALLBACK_RETVALUE");
    let inner = line
        .split_once('(')
        .map(|(_, rest)| rest)
        .and_then(|rest| rest.rsplit_once(')').map(|(inner, _)| inner))
        .ok_or_else(|| Error::structural(file, line_no + 1, "unsplittable callback macro"))?;

    let parts: Vec<&str> = inner.split(", ").collect();
    let min_parts = if has_return { 3 } else { 2 };
    if parts.len() < min_parts {
        return Err(Error::structural(
            file,
            line_no + 1,
            "callback macro with too few arguments",
        ));
    }
    let name = if has_return { parts[1] } else { parts[0] };
    let last = parts[parts.len() - 1].trim();
    let (ty, arg_name) = last.rsplit_once(' ').ok_or_else(|| {
        Error::structural(
            file,
            line_no + 1,
            format!("callback `{name}` data argument has no (type, name) shape"),
        )
    })?;

    Ok(CallbackDecl {
        name: name.trim().to_string(),
        ret: has_return.then(|| parts[0].trim().to_string()),
        arg: Arg {
            ty: ty.to_string(),
            name: arg_name.to_string(),
        },
    })
}

/// Scan struct fields until the `"));"` terminator, desugaring embedded
/// `union { ... } Field;` blocks into ordered arm lists.
fn parse_struct_block(
    file: &str,
    lines: &[&str],
    start: usize,
    table: &mut FileTable,
) -> Result<usize> {
    let head = lines[start];
    let name = head
        .split_once('(')
        .and_then(|(_, rest)| rest.split(',').next())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::structural(file, start + 1, "unsplittable struct head"))?;
    let mut decl = StructDecl::new(name);

    let mut i = start + 1;
    loop {
        let raw = lines.get(i).ok_or_else(|| {
            Error::structural(file, start + 1, format!("unterminated struct block `{name}`"))
        })?;
        if raw.starts_with("));") {
            break;
        }
        let line = raw.trim_start_matches('\t').trim_end();
        if line.is_empty() || line.starts_with(['/', '*', ' ']) {
            i += 1;
            continue;
        }
        let line = line.split(';').next().unwrap_or(line);

        if line.starts_with("union") {
            i = parse_union_field(file, lines, i, name, &mut decl)?;
            continue;
        }

        let (ty, field_name) = line.rsplit_once(' ').ok_or_else(|| {
            Error::structural(
                file,
                i + 1,
                format!("field `{line}` of `{name}` has no (type, name) shape"),
            )
        })?;
        decl.fields.push(FieldDecl {
            name: field_name.to_string(),
            ty: FieldType::Plain(ty.to_string()),
        });
        i += 1;
    }

    table.structs.push(decl);
    Ok(i + 1)
}

/// An embedded anonymous union: arms between `union {` and the closing
/// brace, the enclosing field name on the closing-brace line.
fn parse_union_field(
    file: &str,
    lines: &[&str],
    start: usize,
    struct_name: &str,
    decl: &mut StructDecl,
) -> Result<usize> {
    let mut arms = Vec::new();
    // Skip the `union` line and its opening brace.
    let mut i = start + 2;
    loop {
        let raw = lines.get(i).ok_or_else(|| {
            Error::structural(
                file,
                start + 1,
                format!("unterminated union block in `{struct_name}`"),
            )
        })?;
        if raw.trim_start_matches('\t').starts_with('}') {
            break;
        }
        let line = raw.trim_start_matches('\t').trim_end();
        if line.is_empty() || line.starts_with(['/', '*', ' ']) {
            i += 1;
            continue;
        }
        let line = line.split(';').next().unwrap_or(line);
        let (ty, arm) = line.rsplit_once(' ').ok_or_else(|| {
            Error::structural(
                file,
                i + 1,
                format!("union arm `{line}` in `{struct_name}` has no (type, name) shape"),
            )
        })?;
        arms.push(UnionArm {
            ty: ty.to_string(),
            arm: arm.to_string(),
        });
        i += 1;
    }

    let field_name = lines[i]
        .trim_start_matches('\t')
        .trim_start_matches('}')
        .trim()
        .trim_end_matches(';')
        .to_string();
    if field_name.is_empty() {
        return Err(Error::structural(
            file,
            i + 1,
            format!("union in `{struct_name}` closes without a field name"),
        ));
    }
    decl.fields.push(FieldDecl {
        name: field_name,
        ty: FieldType::Union(arms),
    });
    Ok(i + 1)
}
