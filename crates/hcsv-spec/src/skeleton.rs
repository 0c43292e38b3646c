/*!
# Spec Skeletons

Bootstraps a spec file from the header line of an existing hcsv file. Every
column becomes one `string`, unindexed, visible row whose member name is a
sanitized form of the header text. The result still needs hand-editing: at
least one favorite index must be declared before it compiles.
*/

use crate::{
    errors::{SpecError, SpecResult},
    types::SPEC_HEADER_FIELDS,
};
use std::{collections::HashSet, io};
use tracing::warn;

/// One generated spec row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonColumn {
    pub member: String,
    pub header: String,
}

/// Turn arbitrary header text into a member name.
pub fn member_name(header: &str) -> String {
    let mut cleaned = String::with_capacity(header.len());
    for c in header.chars() {
        match c {
            '.' | '/' | '-' | '&' => cleaned.push('_'),
            '"' | '[' | ']' | '(' | ')' | ' ' => {}
            '%' => cleaned.push_str("Pct"),
            '$' => cleaned.push_str("USD"),
            '#' => cleaned.push_str("Num"),
            c => cleaned.push(c),
        }
    }

    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Parse a header line (quoted headers allowed) into skeleton rows.
pub fn skeleton_columns(header_line: &str) -> SpecResult<Vec<SkeletonColumn>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(header_line.as_bytes());

    let record = match reader.records().next() {
        Some(record) => record?,
        None => return Err(SpecError::InvalidSkeletonColumn(String::new())),
    };

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(record.len());
    for header in record.iter() {
        let member = member_name(header);
        if member.is_empty() {
            return Err(SpecError::InvalidSkeletonColumn(header.to_string()));
        }
        if !seen.insert(member.clone()) {
            warn!(member = %member, header, "Skeleton member name repeats; rename before compiling");
        }
        columns.push(SkeletonColumn {
            member,
            header: header.to_string(),
        });
    }

    Ok(columns)
}

/// Write a spec skeleton for `header_line` to `out`, returning the number of column rows.
pub fn write_skeleton<W: io::Write>(header_line: &str, out: W) -> SpecResult<usize> {
    let columns = skeleton_columns(header_line)?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(SPEC_HEADER_FIELDS)?;
    for column in &columns {
        writer.write_record([column.member.as_str(), column.header.as_str(), "", "", ""])?;
    }
    writer.flush()?;

    Ok(columns.len())
}

/// Spec skeleton for `header_line` as text.
pub fn render_skeleton(header_line: &str) -> SpecResult<String> {
    let mut buf = Vec::new();
    write_skeleton(header_line, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
