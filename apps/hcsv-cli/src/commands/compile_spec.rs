use crate::{
    config::{CompileSettings, OutputFormat},
    error::CliResult,
};
use hcsv_spec::{compile_spec_file, CompiledSchema, KeyType};
use std::fmt;
use tracing::info;

pub fn execute(settings: CompileSettings) -> CliResult<()> {
    info!(
        spec = %settings.spec.display(),
        strict = settings.compile.strict,
        separator = %settings.compile.default_separator,
        header_style = %settings.compile.header_style,
        "Compiling spec"
    );

    let schema = compile_spec_file(&settings.spec, settings.compile)?;

    match settings.format {
        OutputFormat::Summary => print!("{}", Summary(&schema)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schema)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&schema)?),
    }

    Ok(())
}

/// Human-readable report of a compiled schema
pub struct Summary<'a>(pub &'a CompiledSchema);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        let counters = schema.counters();

        writeln!(
            f,
            "Columns: {} per-row ({} visible, {} hidden), {} per-file",
            schema.columns().len(),
            schema.visible_columns().count(),
            schema.hidden_columns().count(),
            schema.per_file().len()
        )?;
        writeln!(
            f,
            "Rows: {} read, {} bad, {} empty, {} comment, {} ignored index clauses",
            counters.read,
            counters.bad,
            counters.empty,
            counters.comment,
            counters.ignored_index_clauses
        )?;

        writeln!(f, "Indexes:")?;
        for index in schema.indexes().values() {
            let marker = if index.is_favorite { '*' } else { ' ' };
            let key = match index.key_type {
                KeyType::Int64 => "int64",
                KeyType::String => "string",
            };
            write!(f, "  {marker} {} [{}] key={key}", index.name, index.components.join(", "))?;
            if index.is_composite() {
                write!(f, " separator='{}'", index.separator)?;
            }
            writeln!(f)?;
        }

        let boundaries = schema.boundaries();
        let name_at = |position: Option<usize>| {
            position
                .and_then(|p| schema.columns().get(p))
                .map_or("-", |c| c.name.as_str())
        };
        writeln!(
            f,
            "Boundaries: first visible {}, last visible {}, last overall {}{}",
            name_at(boundaries.first_visible),
            name_at(boundaries.last_visible),
            name_at(boundaries.last_overall),
            if schema.has_hidden_suffix() {
                " (hidden suffix)"
            } else {
                ""
            }
        )?;

        let helpers = schema.helpers();
        let needed: Vec<&str> = [
            (helpers.numeric_conversion, "numeric conversion"),
            (helpers.byte_trim, "byte trim"),
            (helpers.int64_key_removal, "int64 key removal"),
        ]
        .into_iter()
        .filter_map(|(needed, name)| needed.then_some(name))
        .collect();
        writeln!(
            f,
            "Helpers: {}",
            if needed.is_empty() {
                "none".to_string()
            } else {
                needed.join(", ")
            }
        )?;

        let sortable: Vec<&str> = schema
            .sortable_per_file()
            .map(|c| c.name.as_str())
            .collect();
        if !sortable.is_empty() {
            writeln!(f, "Sortable per-file: {}", sortable.join(", "))?;
        }

        writeln!(f, "Header: {}", schema.default_header_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcsv_spec::{compile_spec_str, CompileConfig};

    #[test]
    fn test_summary() {
        let schema = compile_spec_str(
            "name,headerstring,type,hasindex,finaltype\n\
             ID,Id,int64,*index,\n\
             ACCT,Account,string,index(BYACCT=0=|),\n\
             DAY,Day,yyyymmdd,index(BYACCT=1),\n\
             NOTE,Note,string,,hidden\n\
             SOURCE,Source,string,sort,instance\n",
            CompileConfig::default(),
        )
        .unwrap();

        assert_eq!(
            Summary(&schema).to_string(),
            "Columns: 4 per-row (3 visible, 1 hidden), 1 per-file\n\
             Rows: 5 read, 0 bad, 0 empty, 0 comment, 0 ignored index clauses\n\
             Indexes:\n\
             \x20   BYACCT [ACCT, DAY] key=string separator='|'\n\
             \x20 * ID [ID] key=int64\n\
             Boundaries: first visible ID, last visible DAY, last overall NOTE (hidden suffix)\n\
             Helpers: numeric conversion, int64 key removal\n\
             Sortable per-file: SOURCE\n\
             Header: ID,ACCT,DAY\n"
        );
    }
}
