/*!
# Index Compiler

Resolves every row's `hasindex` field into named index definitions and the
single favorite index used for sorted output.

## Grammar

- `noindex`, `none` or empty: no participation
- `index` / `*index`: single-column index named after the column
- `index(NAME=POSITION=SEPARATOR)` clauses, back to back, each optionally
  preceded by `*`: the column fills slot `POSITION` of index `NAME`

Runs once over the complete row list, since a composite index may draw
components from anywhere in the file. The first `*` encountered in
row-then-clause order wins the favorite designation.
*/

use crate::{
    context::CompilationContext,
    errors::{SpecError, SpecResult},
    types::{ColumnSpec, KeyType, StorageType, NO_CLASSIFIER, NO_INDEX},
};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One parsed participation of a column in an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexClause {
    /// `index` or `*index`
    Shorthand { favorite: bool },

    /// `*?index(NAME=POSITION=SEPARATOR)`
    Longhand {
        name: String,
        position: usize,
        separator: Option<String>,
        favorite: bool,
    },
}

/// A fully resolved index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDefinition {
    pub name: String,

    /// Column names in key position order, gap-free
    pub components: Vec<String>,

    pub separator: String,
    pub key_type: KeyType,
    pub is_favorite: bool,
}

impl IndexDefinition {
    pub fn is_composite(&self) -> bool {
        self.components.len() > 1
    }

    /// Component column names, in key position order
    pub fn key_parts(&self) -> &[String] {
        &self.components
    }

    /// Key text for one row, given each component's rendered value in position order
    pub fn join_key<S: AsRef<str>>(&self, values: &[S]) -> String {
        values
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(self.separator.as_str())
    }
}

/// Output of the index compiler
#[derive(Debug, Clone)]
pub struct CompiledIndexes {
    pub indexes: BTreeMap<String, IndexDefinition>,
    pub favorite: String,
}

// ================================================================================================
// Clause Grammar
// ================================================================================================

pub struct IndexGrammar {
    whole: Regex,
    clause: Regex,
}

impl IndexGrammar {
    pub fn new() -> SpecResult<Self> {
        Ok(Self {
            whole: Regex::new(r"^(?:\*?index\([^()]*\))+$")?,
            clause: Regex::new(r"(\*?)index\(([^()]*)\)")?,
        })
    }

    /// Parse one row's raw index spec into clauses, in declaration order.
    pub fn parse(&self, column: &str, raw: &str) -> SpecResult<Vec<IndexClause>> {
        match raw {
            "" | NO_INDEX | NO_CLASSIFIER => Ok(Vec::new()),
            "index" => Ok(vec![IndexClause::Shorthand { favorite: false }]),
            "*index" => Ok(vec![IndexClause::Shorthand { favorite: true }]),
            _ if self.whole.is_match(raw) => self
                .clause
                .captures_iter(raw)
                .map(|caps| {
                    let favorite = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
                    let body = caps.get(2).map_or("", |m| m.as_str());
                    parse_longhand(column, raw, body, favorite)
                })
                .collect(),
            _ => Err(invalid_spec(
                column,
                raw,
                "expected 'index', '*index' or index(NAME=POSITION=SEPARATOR) clauses",
            )),
        }
    }
}

fn parse_longhand(column: &str, raw: &str, body: &str, favorite: bool) -> SpecResult<IndexClause> {
    let mut parts = body.splitn(3, '=');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(invalid_spec(column, raw, "index name is empty"));
    }

    let position_text = parts
        .next()
        .ok_or_else(|| invalid_spec(column, raw, format!("index '{name}' has no position")))?;
    let position = position_text.trim().parse::<usize>().map_err(|_| {
        invalid_spec(
            column,
            raw,
            format!("index '{name}' position '{position_text}' is not a non-negative integer"),
        )
    })?;

    let separator = parts
        .next()
        .filter(|sep| !sep.is_empty())
        .map(str::to_string);

    Ok(IndexClause::Longhand {
        name: name.to_string(),
        position,
        separator,
        favorite,
    })
}

fn invalid_spec(column: &str, raw: &str, reason: impl Into<String>) -> SpecError {
    SpecError::InvalidIndexSpec {
        column: column.to_string(),
        spec: raw.to_string(),
        reason: reason.into(),
    }
}

// ================================================================================================
// Resolution
// ================================================================================================

/// One claimed key position
#[derive(Debug)]
struct Slot {
    column: String,
    storage: StorageType,
    /// Which clause of the declaring row's index spec claimed it
    clause: usize,
}

#[derive(Debug)]
struct PendingIndex {
    name: String,
    slots: BTreeMap<usize, Slot>,
    separator: Option<String>,
}

impl PendingIndex {
    fn new(name: String) -> Self {
        Self {
            name,
            slots: BTreeMap::new(),
            separator: None,
        }
    }

    fn claim(
        &mut self,
        position: usize,
        column: &ColumnSpec,
        clause: usize,
        separator: Option<String>,
    ) -> SpecResult<()> {
        if let Some(found) = separator {
            let established = self.separator.get_or_insert_with(|| found.clone());
            if *established != found {
                return Err(SpecError::SeparatorConflict {
                    index: self.name.clone(),
                    established: established.clone(),
                    found,
                });
            }
        }

        if let Some(first) = self.slots.get(&position) {
            return Err(SpecError::DuplicateIndexPosition {
                index: self.name.clone(),
                position,
                first: first.column.clone(),
                second: column.name.clone(),
            });
        }
        self.slots.insert(
            position,
            Slot {
                column: column.name.clone(),
                storage: column.storage,
                clause,
            },
        );

        Ok(())
    }

    fn finish(self, default_separator: &str, is_favorite: bool) -> SpecResult<IndexDefinition> {
        let mut components = Vec::with_capacity(self.slots.len());
        let mut typed = Vec::with_capacity(self.slots.len());

        for (expected, (position, slot)) in self.slots.into_iter().enumerate() {
            if position != expected {
                return Err(SpecError::IndexGap {
                    index: self.name,
                    position: expected,
                });
            }
            components.push(slot.column);
            typed.push((slot.storage, slot.clause));
        }

        // only a lone component from a row's first clause keeps its storage type;
        // composite keys are always joined text
        let key_type = match typed.as_slice() {
            [(storage, 0)] => KeyType::for_storage(*storage),
            _ => KeyType::String,
        };

        Ok(IndexDefinition {
            name: self.name,
            components,
            separator: self
                .separator
                .unwrap_or_else(|| default_separator.to_string()),
            key_type,
            is_favorite,
        })
    }
}

/// Resolve all index definitions and the favorite index for the context's rows.
pub fn compile_indexes(ctx: &mut CompilationContext) -> SpecResult<CompiledIndexes> {
    let grammar = IndexGrammar::new()?;
    let mut pending: BTreeMap<String, PendingIndex> = BTreeMap::new();
    let mut favorite_name: Option<String> = None;
    let mut ignored = 0;

    for column in ctx.rows() {
        if column.role.is_section() {
            if column.declares_index() {
                ignored += 1;
                warn!(
                    name = %column.name,
                    spec = %column.raw_index_spec,
                    "Header/footer columns cannot be indexed; index spec ignored"
                );
            }
            continue;
        }

        for (clause_index, clause) in grammar
            .parse(&column.name, &column.raw_index_spec)?
            .into_iter()
            .enumerate()
        {
            let (name, position, separator, wants_favorite) = match clause {
                IndexClause::Shorthand { favorite } => (column.name.clone(), 0, None, favorite),
                IndexClause::Longhand {
                    name,
                    position,
                    separator,
                    favorite,
                } => (name, position, separator, favorite),
            };

            debug!(
                column = %column.name,
                index = %name,
                position,
                clause = clause_index,
                favorite = wants_favorite,
                "Index clause"
            );

            if wants_favorite && favorite_name.is_none() {
                favorite_name = Some(name.clone());
            }

            pending
                .entry(name.clone())
                .or_insert_with(|| PendingIndex::new(name))
                .claim(position, column, clause_index, separator)?;
        }
    }

    ctx.counters_mut().ignored_index_clauses += ignored;

    if pending.is_empty() {
        return Err(SpecError::NoIndexes);
    }
    let favorite = favorite_name.ok_or(SpecError::NoFavoriteIndex)?;

    let default_separator = ctx.config().default_separator.clone();
    let mut indexes = BTreeMap::new();
    for (name, index) in pending {
        let is_favorite = name == favorite;
        let definition = index.finish(&default_separator, is_favorite)?;
        if definition.key_type == KeyType::Int64 {
            ctx.helpers_mut().int64_key_removal = true;
        }
        indexes.insert(name, definition);
    }

    info!(
        indexes = indexes.len(),
        favorite = %favorite,
        "Resolved indexes"
    );

    Ok(CompiledIndexes { indexes, favorite })
}

// ================================================================================================
// Tests
// ================================================================================================
