/*!
# Schema Assembly

`CompiledSchema` is the one value handed to a code emitter. It is assembled
once per compilation run and exposes read-only views only.

```text
LineSource ─▶ CompilationContext::ingest ─▶ compile_indexes ─▶ analyze_boundaries ─▶ CompiledSchema
```
*/

use crate::{
    boundary::{analyze_boundaries, Boundaries, FieldEdge},
    config::{CompileConfig, HeaderStyle},
    context::{CompilationContext, HelperFlags, SpecCounters},
    errors::SpecResult,
    index_compiler::{compile_indexes, IndexDefinition},
    source::{LineSource, ReaderSource, TextSource},
    types::{ColumnSpec, Role},
};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSchema {
    /// Per-row columns of every role, in declaration order
    columns: Vec<ColumnSpec>,

    per_file: Vec<ColumnSpec>,

    indexes: BTreeMap<String, IndexDefinition>,
    favorite: String,

    boundaries: Boundaries,
    helpers: HelperFlags,
    counters: SpecCounters,
    header_style: HeaderStyle,
}

/// Compile spec text held in memory.
pub fn compile_spec_str(text: &str, config: CompileConfig) -> SpecResult<CompiledSchema> {
    compile_spec_source(&mut TextSource::new(text), config)
}

/// Compile the spec file at `path`.
pub fn compile_spec_file<P: AsRef<Path>>(
    path: P,
    config: CompileConfig,
) -> SpecResult<CompiledSchema> {
    compile_spec_source(&mut ReaderSource::open(path)?, config)
}

/// Compile whatever `source` yields, one line at a time.
pub fn compile_spec_source<S: LineSource>(
    source: &mut S,
    config: CompileConfig,
) -> SpecResult<CompiledSchema> {
    let mut ctx = CompilationContext::new(config);
    ctx.ingest(source)?;
    CompiledSchema::assemble(ctx)
}

impl CompiledSchema {
    fn assemble(mut ctx: CompilationContext) -> SpecResult<Self> {
        let compiled = compile_indexes(&mut ctx)?;
        let boundaries = analyze_boundaries(&mut ctx);
        let header_style = ctx.config().header_style;
        let (columns, per_file, counters, helpers) = ctx.into_parts();

        info!(
            columns = columns.len(),
            per_file = per_file.len(),
            indexes = compiled.indexes.len(),
            favorite = %compiled.favorite,
            read = counters.read,
            bad = counters.bad,
            empty = counters.empty,
            comment = counters.comment,
            ignored_index_clauses = counters.ignored_index_clauses,
            "Compiled spec"
        );

        Ok(Self {
            columns,
            per_file,
            indexes: compiled.indexes,
            favorite: compiled.favorite,
            boundaries,
            helpers,
            counters,
            header_style,
        })
    }

    // ============================================================================================
    // Column views
    // ============================================================================================

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .chain(&self.per_file)
            .find(|c| c.name == name)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| !c.role.is_hidden())
    }

    /// Hidden, header and footer columns
    pub fn hidden_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.role.is_hidden())
    }

    pub fn header_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.role == Role::Header)
    }

    pub fn footer_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.role == Role::Footer)
    }

    /// Columns present on every data line, visible or hidden
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| !c.role.is_section())
    }

    pub fn per_file(&self) -> &[ColumnSpec] {
        &self.per_file
    }

    pub fn sortable_per_file(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.per_file.iter().filter(|c| c.sortable)
    }

    // ============================================================================================
    // Indexes
    // ============================================================================================

    /// Index definitions in name order
    pub fn indexes(&self) -> &BTreeMap<String, IndexDefinition> {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.get(name)
    }

    pub fn favorite_name(&self) -> &str {
        &self.favorite
    }

    pub fn favorite_index(&self) -> &IndexDefinition {
        // assembly only succeeds once the favorite resolves to a compiled index
        &self.indexes[&self.favorite]
    }

    // ============================================================================================
    // Line edges
    // ============================================================================================

    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    pub fn has_hidden_suffix(&self) -> bool {
        self.boundaries.has_hidden_suffix()
    }

    /// Field termination for the per-row column at `position`; `None` for
    /// header/footer rows, which never appear on data lines.
    pub fn field_edge(&self, position: usize) -> Option<FieldEdge> {
        let column = self.columns.get(position)?;
        if column.role.is_section() {
            return None;
        }
        Some(self.boundaries.edge_at(position))
    }

    // ============================================================================================
    // Derived facts
    // ============================================================================================

    pub fn helpers(&self) -> HelperFlags {
        self.helpers
    }

    pub fn counters(&self) -> SpecCounters {
        self.counters
    }

    pub fn header_style(&self) -> HeaderStyle {
        self.header_style
    }

    /// Header row of a target file, as the emitted writer produces it
    pub fn header_line(&self, style: HeaderStyle) -> String {
        let mut line = String::new();
        for column in self.visible_columns() {
            if !column.boundary.first_visible {
                line.push(',');
            }
            line.push_str(match style {
                HeaderStyle::Internal => &column.name,
                HeaderStyle::External => &column.display_name,
            });
        }
        line
    }

    pub fn default_header_line(&self) -> String {
        self.header_line(self.header_style)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
