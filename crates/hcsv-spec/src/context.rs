/*!
# Compilation Context

State owned by a single compilation run: the ordered per-row and per-file
column lists, bad-row counters, and the schema-wide helper requirements.
Nothing here is shared between runs.
*/

use crate::{
    config::CompileConfig,
    decoder::{decode_row, DecodedRow},
    errors::{SpecError, SpecResult},
    source::LineSource,
    types::{ColumnSpec, SPEC_HEADER},
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// Shortest non-blank line that can still be a spec row
const MIN_ROW_LEN: usize = 3;

/// What happened to each line of the spec file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecCounters {
    /// Rows decoded and kept
    pub read: usize,

    /// Rows skipped as malformed
    pub bad: usize,

    pub empty: usize,
    pub comment: usize,

    /// Index specs on rows that cannot participate in indexing
    pub ignored_index_clauses: usize,
}

/// Support code the emitter must generate, derived from the whole schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HelperFlags {
    pub numeric_conversion: bool,
    pub byte_trim: bool,

    /// Some index is int64-keyed, so an integer-keyed removal path is needed
    pub int64_key_removal: bool,
}

#[derive(Debug)]
pub struct CompilationContext {
    config: CompileConfig,
    rows: Vec<ColumnSpec>,
    per_file: Vec<ColumnSpec>,
    names: HashSet<String>,
    counters: SpecCounters,
    helpers: HelperFlags,
    line_no: usize,
    seen_header: bool,
}

impl CompilationContext {
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            per_file: Vec::new(),
            names: HashSet::new(),
            counters: SpecCounters::default(),
            helpers: HelperFlags::default(),
            line_no: 0,
            seen_header: false,
        }
    }

    /// Consume every line of `source`, then apply the strict-mode check.
    pub fn ingest<S: LineSource>(&mut self, source: &mut S) -> SpecResult<()> {
        while let Some(line) = source.next_line()? {
            self.ingest_line(&line)?;
        }

        if self.config.strict && self.counters.bad > 0 {
            return Err(SpecError::BadRowsInStrictMode {
                count: self.counters.bad,
            });
        }

        Ok(())
    }

    /// Classify one line and, for data lines, decode and append it.
    pub fn ingest_line(&mut self, text: &str) -> SpecResult<()> {
        self.line_no += 1;
        let line = self.line_no;
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.counters.empty += 1;
            return Ok(());
        }
        if trimmed.starts_with('#') {
            self.counters.comment += 1;
            return Ok(());
        }
        if trimmed.len() < MIN_ROW_LEN {
            self.counters.bad += 1;
            warn!(line, text = trimmed, "Skipping short spec line");
            return Ok(());
        }

        if trimmed.starts_with(SPEC_HEADER) {
            if self.seen_header {
                self.counters.bad += 1;
                warn!(line, "Skipping repeated spec header");
            }
            self.seen_header = true;
            return Ok(());
        }
        if !self.seen_header {
            return Err(SpecError::MissingSpecHeader {
                expected: SPEC_HEADER.to_string(),
                found: trimmed.to_string(),
            });
        }

        match decode_row(line, text) {
            Ok(decoded) => self.append(decoded),
            Err(err) if err.is_recoverable() => {
                self.counters.bad += 1;
                warn!(%err, "Skipping bad spec row");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn append(&mut self, decoded: DecodedRow) -> SpecResult<()> {
        let DecodedRow {
            column,
            needs_numeric_conversion,
            needs_byte_trim,
        } = decoded;

        if !self.names.insert(column.name.clone()) {
            return Err(SpecError::DuplicateColumn(column.name));
        }

        self.helpers.numeric_conversion |= needs_numeric_conversion;
        self.helpers.byte_trim |= needs_byte_trim;
        self.counters.read += 1;

        if column.is_per_file {
            if column.declares_index() && !column.sortable {
                self.counters.ignored_index_clauses += 1;
                warn!(
                    name = %column.name,
                    spec = %column.raw_index_spec,
                    "Per-file attributes only accept 'sort'; index spec ignored"
                );
            }
            self.per_file.push(column);
        } else {
            self.rows.push(column);
        }

        Ok(())
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn rows(&self) -> &[ColumnSpec] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [ColumnSpec] {
        &mut self.rows
    }

    pub fn per_file(&self) -> &[ColumnSpec] {
        &self.per_file
    }

    pub fn counters(&self) -> SpecCounters {
        self.counters
    }

    pub fn counters_mut(&mut self) -> &mut SpecCounters {
        &mut self.counters
    }

    pub fn helpers(&self) -> HelperFlags {
        self.helpers
    }

    pub fn helpers_mut(&mut self) -> &mut HelperFlags {
        &mut self.helpers
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Vec<ColumnSpec>, Vec<ColumnSpec>, SpecCounters, HelperFlags) {
        (self.rows, self.per_file, self.counters, self.helpers)
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TextSource;

    fn ingest(text: &str, config: CompileConfig) -> SpecResult<CompilationContext> {
        let mut ctx = CompilationContext::new(config);
        ctx.ingest(&mut TextSource::new(text))?;
        Ok(ctx)
    }

    #[test]
    fn test_rows_split_between_row_and_per_file_lists() {
        let ctx = ingest(
            "name,headerstring,type,hasindex,finaltype\n\
             ID,Id,int64,*index,\n\
             SOURCE,Source,string,sort,instance\n\
             NAME,Name,,,\n",
            CompileConfig::default(),
        )
        .unwrap();

        let names: Vec<&str> = ctx.rows().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "NAME"]);
        assert_eq!(ctx.per_file().len(), 1);
        assert_eq!(ctx.counters().read, 3);
        assert!(ctx.helpers().numeric_conversion);
        assert!(!ctx.helpers().byte_trim);
    }

    #[test]
    fn test_counters() {
        let ctx = ingest(
            "# leading comment\n\
             name,headerstring,type,hasindex,finaltype\n\
             \n\
             # another comment\n\
             ab\n\
             ID,Id,int64,*index,\n\
             BROKEN,Broken\n\
             name,headerstring,type,hasindex,finaltype\n",
            CompileConfig::default(),
        )
        .unwrap();

        assert_eq!(
            ctx.counters(),
            SpecCounters {
                read: 1,
                bad: 3,
                empty: 1,
                comment: 2,
                ignored_index_clauses: 0,
            }
        );
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let err = ingest("ID,Id,int64,*index,\n", CompileConfig::default()).unwrap_err();
        assert!(matches!(err, SpecError::MissingSpecHeader { .. }));
    }

    #[test]
    fn test_duplicate_names_across_lists_are_fatal() {
        let err = ingest(
            "name,headerstring,type,hasindex,finaltype\n\
             ID,Id,int64,*index,\n\
             ID,Id2,string,,instance\n",
            CompileConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::DuplicateColumn(name) if name == "ID"));
    }

    #[test]
    fn test_strict_mode_rejects_bad_rows() {
        let text = "name,headerstring,type,hasindex,finaltype\n\
                    ID,Id,int64,*index,\n\
                    BROKEN\n";

        assert!(ingest(text, CompileConfig::default()).is_ok());

        let strict = CompileConfig {
            strict: true,
            ..Default::default()
        };
        let err = ingest(text, strict).unwrap_err();
        assert!(matches!(err, SpecError::BadRowsInStrictMode { count: 1 }));
    }

    #[test]
    fn test_per_file_index_spec_other_than_sort_is_ignored() {
        let ctx = ingest(
            "name,headerstring,type,hasindex,finaltype\n\
             ID,Id,int64,*index,\n\
             BATCH,Batch,string,index,instance\n",
            CompileConfig::default(),
        )
        .unwrap();

        assert_eq!(ctx.counters().ignored_index_clauses, 1);
        assert!(!ctx.per_file()[0].sortable);
    }
}
