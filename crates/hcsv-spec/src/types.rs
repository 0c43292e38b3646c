/*!
# Spec Row Types

Typed vocabulary of a column specification: the closed set of declared types,
the storage each one maps to, column roles, and the decoded `ColumnSpec`.

## Spec File Layout

Every spec file starts with the header row `name,headerstring,type,hasindex,finaltype`.
Each following row declares one column of the target hcsv format.
*/

use serde::Serialize;
use std::fmt;

/// Literal header row every spec file must start with
pub const SPEC_HEADER: &str = "name,headerstring,type,hasindex,finaltype";

/// Field names of the spec header, in order
pub const SPEC_HEADER_FIELDS: &[&str] = &["name", "headerstring", "type", "hasindex", "finaltype"];

/// Separator joining multi-component index keys unless a clause overrides it
pub const DEFAULT_INDEX_SEPARATOR: &str = ":";

/// Raw index spec meaning "no participation"
pub const NO_INDEX: &str = "noindex";

/// Raw classifier meaning "plain visible column"
pub const NO_CLASSIFIER: &str = "none";

/// Sub-field suffixes materialized next to a datetime column
pub const DATETIME_AUX_SUFFIXES: &[&str] = &["hhmmss", "mmm", "zz"];

// ================================================================================================
// Declared & Storage Types
// ================================================================================================

/// Column type as written in the `type` field of a spec row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclaredType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float64")]
    Float64,
    /// `yyyymmdd` integer date
    #[serde(rename = "yyyymmdd")]
    Date8,
    /// `yyyy_mm_dd` text date, stored as `yyyymmdd`
    #[serde(rename = "yyyy_mm_dd")]
    Date8Text,
    /// `YYYY_MM_DD_HH_MM_SS_mmm_zz`, stored as `yyyymmdd` plus sub-fields
    #[serde(rename = "YYYY_MM_DD_HH_MM_SS_mmm_zz")]
    DateTimeMillisZone,
}

impl DeclaredType {
    pub const ALL: [DeclaredType; 7] = [
        DeclaredType::String,
        DeclaredType::Bool,
        DeclaredType::Int64,
        DeclaredType::Float64,
        DeclaredType::Date8,
        DeclaredType::Date8Text,
        DeclaredType::DateTimeMillisZone,
    ];

    pub fn from_spec_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.spec_name() == name)
    }

    pub fn spec_name(self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Bool => "bool",
            DeclaredType::Int64 => "int64",
            DeclaredType::Float64 => "float64",
            DeclaredType::Date8 => "yyyymmdd",
            DeclaredType::Date8Text => "yyyy_mm_dd",
            DeclaredType::DateTimeMillisZone => "YYYY_MM_DD_HH_MM_SS_mmm_zz",
        }
    }

    pub fn storage(self) -> StorageType {
        let repr = match self {
            DeclaredType::String => ValueRepr::String,
            DeclaredType::Bool => ValueRepr::Bool,
            DeclaredType::Int64
            | DeclaredType::Date8
            | DeclaredType::Date8Text
            | DeclaredType::DateTimeMillisZone => ValueRepr::Int64,
            DeclaredType::Float64 => ValueRepr::Float64,
        };

        StorageType {
            repr,
            aux_fields: self == DeclaredType::DateTimeMillisZone,
        }
    }

    /// Emitted parsers need numeric conversion helpers for this type
    pub fn needs_numeric_conversion(self) -> bool {
        self != DeclaredType::String
    }

    /// Emitted parsers trim raw bytes for this type (unless the column is a header/footer)
    pub fn needs_byte_trim(self) -> bool {
        matches!(
            self,
            DeclaredType::Float64 | DeclaredType::Date8Text | DeclaredType::DateTimeMillisZone
        )
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec_name())
    }
}

/// In-memory representation of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueRepr {
    String,
    Bool,
    Int64,
    Float64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StorageType {
    pub repr: ValueRepr,

    /// hour-minute-second, millisecond and zone sub-fields are materialized too
    pub aux_fields: bool,
}

/// Key representation of a resolved index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    String,
    Int64,
}

impl KeyType {
    pub fn for_storage(storage: StorageType) -> Self {
        match storage.repr {
            ValueRepr::Int64 => KeyType::Int64,
            ValueRepr::String | ValueRepr::Bool | ValueRepr::Float64 => KeyType::String,
        }
    }
}

// ================================================================================================
// Column Roles
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Visible,
    Hidden,
    Header,
    Footer,
}

impl Role {
    /// Everything but `Visible` is left out of the default output projection
    pub fn is_hidden(self) -> bool {
        self != Role::Visible
    }

    /// Header and footer rows are never field-parsed from data lines
    pub fn is_section(self) -> bool {
        matches!(self, Role::Header | Role::Footer)
    }
}

// ================================================================================================
// Column Spec
// ================================================================================================

/// Auxiliary sub-field declared in a classifier as `key:type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraAttribute {
    pub name: String,
    pub ty: String,
}

/// Line-edge facts a streaming row parser needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundaryFlags {
    pub first_visible: bool,
    pub last_visible: bool,
    pub last_overall: bool,
}

/// One decoded spec row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    /// Unique identifier, also the base of generated member names
    pub name: String,

    /// External header text
    pub display_name: String,

    pub declared_type: DeclaredType,
    pub storage: StorageType,

    /// Unparsed `hasindex` field (defaults to `noindex`)
    pub raw_index_spec: String,

    /// Unparsed `finaltype` field (defaults to `none`)
    pub raw_classifier: String,

    pub role: Role,

    /// Footer carries the data row count
    pub footer_count: bool,

    pub extra_attributes: Vec<ExtraAttribute>,

    /// File-level attribute instead of a per-row column
    pub is_per_file: bool,

    /// Per-file attribute usable as a sort key across loaded files
    pub sortable: bool,

    /// 1-based spec file line the column was declared on
    pub line: usize,

    pub boundary: BoundaryFlags,
}

impl ColumnSpec {
    /// Names of the datetime sub-fields materialized alongside this column
    pub fn aux_field_names(&self) -> Vec<String> {
        if !self.storage.aux_fields {
            return Vec::new();
        }

        DATETIME_AUX_SUFFIXES
            .iter()
            .map(|suffix| format!("{}_{}", self.name, suffix))
            .collect()
    }

    pub fn declares_index(&self) -> bool {
        !matches!(self.raw_index_spec.as_str(), "" | NO_INDEX | NO_CLASSIFIER)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
