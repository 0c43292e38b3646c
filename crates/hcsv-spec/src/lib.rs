/*!
# hcsv Spec Compiler

Compiles a declarative column specification for **hcsv** (comma-separated,
unique headers, uniform column count, trim-valid cells, no quoting) into a
fully resolved `CompiledSchema` that a code emitter turns into row parsers,
indexes and writers.

## Spec Files

```text
# trades feed
name,headerstring,type,hasindex,finaltype
RUNDATE,Run Date,yyyy_mm_dd,,header:date
TRADEID,Trade Id,int64,*index,
ACCT,Account,string,index(BYACCT=0=|),
TRADEDATE,Trade Date,yyyymmdd,index(BYACCT=1),
NOTE,Note,string,,hidden
TOTAL,Total,int64,,footer:rowcount
SOURCE,Source,string,sort,instance
```

- `type`: `string`, `bool`, `int64`, `float64`, `yyyymmdd`, `yyyy_mm_dd`,
  `YYYY_MM_DD_HH_MM_SS_mmm_zz`
- `hasindex`: `noindex`, `index`, `*index` or `index(NAME=POSITION=SEPARATOR)` clauses;
  `*` marks the favorite (sort order) index, first one wins
- `finaltype`: `none`, `hidden`, `header[:..]`, `footer[:rowcount]`, `instance`,
  or `key:type` auxiliary sub-fields

## Pipeline

1. **Ingestion** (`context`): lines are classified, decoded (`decoder`) and
   appended to the per-row or per-file list of a `CompilationContext`
2. **Index compilation** (`index_compiler`): named, gap-free index definitions
   and the favorite index
3. **Boundary analysis** (`boundary`): first visible, last visible and last
   field on a data line
4. **Assembly** (`schema`): the immutable `CompiledSchema`

## Usage

```rust
use hcsv_spec::{compile_spec_str, CompileConfig, HeaderStyle, KeyType, SpecResult};

fn example() -> SpecResult<()> {
    let schema = compile_spec_str(
        "name,headerstring,type,hasindex,finaltype\n\
         ID,ID,int64,*index,none\n\
         NAME,NAME,string,noindex,none\n",
        CompileConfig::default(),
    )?;

    assert_eq!(schema.favorite_index().key_type, KeyType::Int64);
    assert_eq!(schema.header_line(HeaderStyle::Internal), "ID,NAME");
    Ok(())
}
```
*/

pub mod boundary;
pub mod config;
pub mod context;
pub mod decoder;
pub mod errors;
pub mod index_compiler;
pub mod schema;
pub mod skeleton;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use boundary::{Boundaries, FieldEdge};
pub use config::{CompileConfig, HeaderStyle};
pub use context::{CompilationContext, HelperFlags, SpecCounters};
pub use errors::{SpecError, SpecResult};
pub use index_compiler::{IndexClause, IndexDefinition};
pub use schema::{compile_spec_file, compile_spec_source, compile_spec_str, CompiledSchema};
pub use skeleton::{render_skeleton, write_skeleton};
pub use source::{LineSource, ReaderSource, TextSource};
pub use types::{
    ColumnSpec, DeclaredType, ExtraAttribute, KeyType, Role, StorageType, ValueRepr, SPEC_HEADER,
};
