/*!
# Spec Row Decoder

Turns one raw spec line into a normalized `ColumnSpec`.

A row has five comma-delimited fields, `name,headerstring,type,hasindex,finaltype`.
The fifth field consumes the remainder of the line. Empty fields fall back to
`string`, `noindex` and `none` respectively.

## Classifier Grammar (`finaltype`)

Tokens separated by `/`, each optionally `key:value`:
- `hidden` marks the column hidden
- `header[:..]` and `footer[:rowcount]` mark section rows (implicitly hidden)
- `instance`, only as the whole classifier, marks a per-file attribute
- any other `key:type` adds an auxiliary sub-field named `<column>_<key>`
*/

use crate::{
    errors::{SpecError, SpecResult},
    types::{
        BoundaryFlags, ColumnSpec, DeclaredType, ExtraAttribute, Role, NO_CLASSIFIER, NO_INDEX,
        SPEC_HEADER_FIELDS,
    },
};
use tracing::debug;

/// Classifier marking a file-level attribute
pub const INSTANCE_CLASSIFIER: &str = "instance";

/// Index spec marking a per-file attribute as a sort key
pub const SORT_INDEX_SPEC: &str = "sort";

const DEFAULT_TYPE: &str = "string";

/// A decoded row together with the schema-wide helpers its type calls for
#[derive(Debug, Clone)]
pub struct DecodedRow {
    pub column: ColumnSpec,
    pub needs_numeric_conversion: bool,
    pub needs_byte_trim: bool,
}

/// Decode one data line of a spec file.
///
/// Row defects come back as the recoverable `SpecError::MalformedRow`;
/// an unknown declared type is fatal.
pub fn decode_row(line: usize, text: &str) -> SpecResult<DecodedRow> {
    let fields: Vec<&str> = text.splitn(SPEC_HEADER_FIELDS.len(), ',').collect();
    if fields.len() < SPEC_HEADER_FIELDS.len() {
        return Err(SpecError::malformed(
            line,
            format!(
                "expected {} fields, found {}",
                SPEC_HEADER_FIELDS.len(),
                fields.len()
            ),
        ));
    }

    let name = fields[0].trim();
    if name.is_empty() {
        return Err(SpecError::malformed(line, "column name is empty"));
    }

    let display_name = or_default(fields[1].trim(), name);
    let type_name = or_default(fields[2].trim(), DEFAULT_TYPE);
    let declared_type =
        DeclaredType::from_spec_name(type_name).ok_or_else(|| SpecError::UnknownType {
            column: name.to_string(),
            ty: type_name.to_string(),
        })?;
    let raw_index_spec = or_default(fields[3].trim(), NO_INDEX);
    let raw_classifier = or_default(trim_final_field(fields[4]), NO_CLASSIFIER);

    let classifier = Classifier::parse(line, name, raw_classifier)?;

    let column = ColumnSpec {
        name: name.to_string(),
        display_name: display_name.to_string(),
        declared_type,
        storage: declared_type.storage(),
        raw_index_spec: raw_index_spec.to_string(),
        raw_classifier: raw_classifier.to_string(),
        role: classifier.role,
        footer_count: classifier.footer_count,
        extra_attributes: classifier.extra_attributes,
        is_per_file: classifier.per_file,
        sortable: classifier.per_file && raw_index_spec == SORT_INDEX_SPEC,
        line,
        boundary: BoundaryFlags::default(),
    };

    debug!(
        line,
        name = %column.name,
        ty = %column.declared_type,
        role = ?column.role,
        per_file = column.is_per_file,
        "Decoded spec row"
    );

    Ok(DecodedRow {
        needs_numeric_conversion: declared_type.needs_numeric_conversion(),
        // header/footer rows are never field-parsed from data lines
        needs_byte_trim: declared_type.needs_byte_trim() && !column.role.is_section(),
        column,
    })
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

// The last field runs to the end of the line and may drag stray control characters along.
fn trim_final_field(field: &str) -> &str {
    field.trim_end_matches(|c: char| c.is_control()).trim()
}

// ================================================================================================
// Classifier
// ================================================================================================

#[derive(Debug)]
struct Classifier {
    role: Role,
    footer_count: bool,
    extra_attributes: Vec<ExtraAttribute>,
    per_file: bool,
}

impl Classifier {
    fn parse(line: usize, column: &str, raw: &str) -> SpecResult<Self> {
        let mut classifier = Classifier {
            role: Role::Visible,
            footer_count: false,
            extra_attributes: Vec::new(),
            per_file: false,
        };

        match raw {
            NO_CLASSIFIER => return Ok(classifier),
            INSTANCE_CLASSIFIER => {
                classifier.per_file = true;
                return Ok(classifier);
            }
            _ => {}
        }

        for token in raw.split('/') {
            let token = token.trim();
            let (key, value) = match token.split_once(':') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (token, None),
            };

            match (key, value) {
                ("hidden", None) => classifier.assign(line, Role::Hidden)?,
                ("header", _) => classifier.assign(line, Role::Header)?,
                ("footer", value) => {
                    classifier.assign(line, Role::Footer)?;
                    if value == Some("rowcount") {
                        classifier.footer_count = true;
                    }
                }
                (INSTANCE_CLASSIFIER, _) => {
                    return Err(SpecError::malformed(
                        line,
                        "'instance' must be the whole classifier",
                    ));
                }
                (_, None) => {
                    return Err(SpecError::malformed(
                        line,
                        format!("classifier token '{token}' is not key:type"),
                    ));
                }
                (key, Some(ty)) if key.is_empty() || ty.is_empty() => {
                    return Err(SpecError::malformed(
                        line,
                        format!("classifier token '{token}' needs both key and type"),
                    ));
                }
                (key, Some(ty)) => classifier.extra_attributes.push(ExtraAttribute {
                    name: format!("{column}_{key}"),
                    ty: ty.to_string(),
                }),
            }
        }

        Ok(classifier)
    }

    fn assign(&mut self, line: usize, role: Role) -> SpecResult<()> {
        match (self.role, role) {
            (Role::Header, Role::Footer) | (Role::Footer, Role::Header) => Err(
                SpecError::malformed(line, "a column cannot be both header and footer"),
            ),
            // section roles already imply hidden
            (current, Role::Hidden) if current.is_section() => Ok(()),
            _ => {
                self.role = role;
                Ok(())
            }
        }
    }
}

// ================================================================================================
// Tests
// ================================================================================================
