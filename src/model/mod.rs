//! Declaration model and the consolidated global tables.
//!
//! The scanner produces per-file declarations; consolidation interns structs
//! and handles into dense tables addressed by [`StructId`]/[`HandleId`] so
//! cross-struct references (nested-in, array-element-of) are ids, never
//! embedded values, and role scans over cyclic struct graphs stay flat.

pub mod defaults;
pub mod types;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{Error, ModelDiagnostic, Result};

/// An enum declaration: member order is meaningful, explicit values are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        EnumDecl {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Append a member, keeping declaration order and dropping duplicates.
    pub fn push_member(&mut self, member: impl Into<String>) {
        let member = member.into();
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }
}

/// One payload arm of a desugared anonymous union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionArm {
    pub ty: String,
    pub arm: String,
}

/// A field's type: raw C text, or the arm list of an embedded union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Plain(String),
    Union(Vec<UnionArm>),
}

impl FieldType {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            FieldType::Plain(raw) => Some(raw),
            FieldType::Union(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
}

/// A struct declaration. Field order equals source declaration order; the
/// native layout depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        StructDecl {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDecl {
    pub name: String,
    pub ret: String,
    pub args: Vec<Arg>,
}

impl MethodDecl {
    pub fn is_release(&self) -> bool {
        self.name.ends_with("_Release")
    }
}

/// A callback declaration: one input-data argument, optional return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackDecl {
    pub name: String,
    pub ret: Option<String>,
    pub arg: Arg,
}

/// An opaque resource. Sub-tables are empty at scan time and populated by
/// consolidation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HandleDecl {
    pub name: String,
    pub methods: BTreeMap<String, MethodDecl>,
    pub callbacks: BTreeMap<String, CallbackDecl>,
    pub enums: Vec<EnumDecl>,
}

impl HandleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        HandleDecl {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Interned struct reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StructId(pub u32);

/// Interned handle reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HandleId(pub u32);

/// Registry of `*_API_LATEST` version macros, shared across all files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VersionRegistry {
    macros: BTreeSet<String>,
}

impl VersionRegistry {
    pub fn register(&mut self, name: impl Into<String>) {
        self.macros.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// The consolidated global tables every later phase reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Model {
    structs: Vec<StructDecl>,
    #[serde(skip)]
    struct_index: HashMap<String, StructId>,
    handles: Vec<HandleDecl>,
    #[serde(skip)]
    handle_index: HashMap<String, HandleId>,
    /// Interface name → its accessor method.
    pub interfaces: BTreeMap<String, MethodDecl>,
    /// `<X>_Release` methods keyed by method name.
    pub release_methods: BTreeMap<String, MethodDecl>,
    pub unhandled_methods: BTreeMap<String, MethodDecl>,
    pub unhandled_callbacks: BTreeMap<String, CallbackDecl>,
    pub unhandled_enums: Vec<EnumDecl>,
    pub versions: VersionRegistry,
}

impl Model {
    /// An empty model carrying the scanned version registry.
    pub fn with_versions(versions: VersionRegistry) -> Self {
        Model {
            versions,
            ..Default::default()
        }
    }

    pub fn insert_struct(&mut self, decl: StructDecl) -> StructId {
        let id = StructId(self.structs.len() as u32);
        self.struct_index.insert(decl.name.clone(), id);
        self.structs.push(decl);
        id
    }

    pub fn insert_handle(&mut self, decl: HandleDecl) -> HandleId {
        let id = HandleId(self.handles.len() as u32);
        self.handle_index.insert(decl.name.clone(), id);
        self.handles.push(decl);
        id
    }

    pub fn struct_id(&self, name: &str) -> Option<StructId> {
        self.struct_index.get(name).copied()
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    pub fn structs(&self) -> impl Iterator<Item = (StructId, &StructDecl)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(i, s)| (StructId(i as u32), s))
    }

    pub fn is_struct_type(&self, decayed: &str) -> bool {
        self.struct_index.contains_key(decayed)
    }

    pub fn handle_id(&self, name: &str) -> Option<HandleId> {
        self.handle_index.get(name).copied()
    }

    pub fn handle(&self, id: HandleId) -> &HandleDecl {
        &self.handles[id.0 as usize]
    }

    pub fn handle_mut(&mut self, id: HandleId) -> &mut HandleDecl {
        &mut self.handles[id.0 as usize]
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn handles(&self) -> impl Iterator<Item = (HandleId, &HandleDecl)> {
        self.handles
            .iter()
            .enumerate()
            .map(|(i, h)| (HandleId(i as u32), h))
    }

    /// The release method a renderer must call to free an out-argument of
    /// `struct_name`. Missing registration halts the run.
    pub fn release_method_for(&self, struct_name: &str) -> Result<&MethodDecl> {
        let expected = format!("{struct_name}_Release");
        self.release_methods.get(&expected).ok_or_else(|| {
            Error::lookup(expected, "no release method registered for struct")
        })
    }
}

/// Usage roles of one struct across the whole consolidated surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StructRoles {
    /// Non-`Out` argument of a non-release method.
    pub input: bool,
    /// Method return type or callback payload.
    pub output: bool,
    /// Argument the callee populates (`Out`-prefixed name).
    pub out_arg: bool,
    /// Plain field of another struct.
    pub internal: bool,
    /// Element type of a struct-array field.
    pub internal_of_array: bool,
}

impl StructRoles {
    pub fn is_empty(&self) -> bool {
        !(self.input || self.output || self.out_arg || self.internal || self.internal_of_array)
    }
}

/// Bidirectional conversion capabilities a struct's wrapper must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    /// Populate the wrapper from a native value.
    pub convert_from: bool,
    /// Construct a fresh wrapper from a native value.
    pub factory_from: bool,
    /// Write the wrapper back into a native value.
    pub convert_to: bool,
    /// Keep a reusable native buffer alive inside the wrapper.
    pub owns_buffer: bool,
}

impl Requirements {
    pub fn merge(&mut self, other: Requirements) {
        self.convert_from |= other.convert_from;
        self.factory_from |= other.factory_from;
        self.convert_to |= other.convert_to;
        self.owns_buffer |= other.owns_buffer;
    }
}

/// Per-field classification inside one struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role")]
pub enum FieldRole {
    /// `int32_t ApiVersion`, stamped with the resolved latest-version macro.
    Version { latest_macro: String },
    /// Length sibling of exactly one array field; never a data field itself.
    Count,
    /// Count-paired data pointer. `count_field` is `None` when pairing was
    /// reported ambiguous.
    Array { count_field: Option<String> },
    /// Count-paired pointer to an array of structs.
    StructArray {
        element: String,
        count_field: Option<String>,
    },
    /// Single nested struct.
    InternalStruct,
    /// Untyped caller-context pointer.
    ClientData,
    /// Opaque handle value.
    Handle,
    /// Desugared union; the discriminant sibling is excluded from
    /// independent enumeration.
    Union { discriminant: Option<String> },
    /// Discriminant sibling of a union field.
    Discriminant,
    /// Deprecated or explicitly skipped; never rendered.
    Deprecated,
    Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRoleEntry {
    pub field: String,
    pub role: FieldRole,
}

/// Everything derived about one struct.
#[derive(Debug, Clone, Serialize)]
pub struct StructFacts {
    pub name: String,
    pub roles: StructRoles,
    pub requirements: Requirements,
    /// Flattened into call arguments or a callback payload instead of boxed.
    pub expanded: bool,
    pub field_roles: Vec<FieldRoleEntry>,
}

/// The full contract toward the emission stage: consolidated tables plus all
/// derived annotations and the collected non-halting diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedModel {
    pub model: Model,
    pub facts: Vec<StructFacts>,
    pub diagnostics: Vec<ModelDiagnostic>,
}

impl ResolvedModel {
    pub fn facts_for(&self, struct_name: &str) -> Option<&StructFacts> {
        let id = self.model.struct_id(struct_name)?;
        self.facts.get(id.0 as usize)
    }

    /// End-of-run summary: table counts plus the list of unresolved names.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} structs, {} handles, {} interfaces, {} release methods\n",
            self.model.struct_count(),
            self.model.handle_count(),
            self.model.interfaces.len(),
            self.model.release_methods.len(),
        ));
        out.push_str(&format!(
            "unhandled: {} methods, {} callbacks, {} enums\n",
            self.model.unhandled_methods.len(),
            self.model.unhandled_callbacks.len(),
            self.model.unhandled_enums.len(),
        ));
        let expanded = self.facts.iter().filter(|f| f.expanded).count();
        out.push_str(&format!("expanded structs: {expanded}\n"));
        if self.diagnostics.is_empty() {
            out.push_str("no unresolved names\n");
        } else {
            out.push_str(&format!("{} unresolved:\n", self.diagnostics.len()));
            for diag in &self.diagnostics {
                out.push_str(&format!("  {diag}\n"));
            }
        }
        out
    }
}
