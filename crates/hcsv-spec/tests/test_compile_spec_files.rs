use {
    hcsv_spec::{
        compile_spec_file, compile_spec_source, compile_spec_str, CompileConfig, FieldEdge,
        HeaderStyle, KeyType, ReaderSource, Role, SpecCounters, SpecError,
    },
    std::{fs, io::Write as _, path::PathBuf},
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_compile_trades_fixture() {
    let schema = compile_spec_file(fixture("trades.spec"), CompileConfig::default())
        .expect("Failed to compile trades.spec");

    assert_eq!(
        schema.counters(),
        SpecCounters {
            read: 12,
            bad: 0,
            empty: 1,
            comment: 3,
            ignored_index_clauses: 0,
        }
    );

    // indexes iterate in name order
    let names: Vec<&str> = schema.indexes().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["BYACCT", "BYDATE", "TRADEID"]);
    assert_eq!(schema.favorite_name(), "TRADEID");
    assert_eq!(
        schema.indexes().values().filter(|i| i.is_favorite).count(),
        1
    );

    let by_acct = schema.index("BYACCT").expect("BYACCT index");
    assert_eq!(by_acct.key_parts(), ["ACCT", "TRADEDATE"]);
    assert_eq!(by_acct.separator, "|");
    assert_eq!(by_acct.key_type, KeyType::String);
    // declared by the second clause on TRADEDATE's row
    assert_eq!(schema.index("BYDATE").map(|i| i.key_type), Some(KeyType::String));

    let book = schema.column("BOOK").expect("BOOK column");
    assert_eq!(book.role, Role::Hidden);
    assert_eq!(book.extra_attributes[0].name, "BOOK_desk");

    let loaded = schema.column("LOADED").expect("LOADED column");
    assert!(loaded.is_per_file);
    assert_eq!(
        loaded.aux_field_names(),
        vec!["LOADED_hhmmss", "LOADED_mmm", "LOADED_zz"]
    );

    assert_eq!(
        schema.sortable_per_file().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["SOURCE"]
    );

    let helpers = schema.helpers();
    assert!(helpers.numeric_conversion && helpers.byte_trim && helpers.int64_key_removal);
}

#[test]
fn test_trades_line_edges() {
    let schema = compile_spec_file(fixture("trades.spec"), CompileConfig::default())
        .expect("Failed to compile trades.spec");

    let boundaries = schema.boundaries();
    assert_eq!(boundaries.first_visible, Some(1)); // TRADEID
    assert_eq!(boundaries.last_visible, Some(6)); // PRICE
    assert_eq!(boundaries.last_overall, Some(8)); // BOOK
    assert_eq!(boundaries.last_data, Some(8));
    assert!(schema.has_hidden_suffix());

    let flagged: Vec<(&str, bool, bool, bool)> = schema
        .columns()
        .iter()
        .filter(|c| c.boundary != Default::default())
        .map(|c| {
            (
                c.name.as_str(),
                c.boundary.first_visible,
                c.boundary.last_visible,
                c.boundary.last_overall,
            )
        })
        .collect();
    assert_eq!(
        flagged,
        vec![
            ("TRADEID", true, false, false),
            ("PRICE", false, true, false),
            ("BOOK", false, false, true),
        ]
    );

    assert_eq!(schema.field_edge(6), Some(FieldEdge::FinalVisibleBeforeHidden));
    assert_eq!(schema.field_edge(7), Some(FieldEdge::Interior));
    assert_eq!(schema.field_edge(8), Some(FieldEdge::FinalHidden));

    assert_eq!(
        schema.header_line(HeaderStyle::External),
        "Trade Id,Account,Trade Date,Side,Quantity,Price"
    );
}

#[test]
fn test_composite_index_declared_out_of_order() {
    let schema = compile_spec_file(fixture("quotes.spec"), CompileConfig::default())
        .expect("Failed to compile quotes.spec");

    let quote = schema.favorite_index();
    assert_eq!(quote.name, "QUOTE");
    assert_eq!(quote.key_parts(), ["VENUE", "SYMBOL", "TS"]);
    assert_eq!(quote.separator, "@");
    assert_eq!(quote.key_type, KeyType::String);
    assert_eq!(quote.join_key(&["XNYS", "IBM", "20240102"]), "XNYS@IBM@20240102");

    assert!(!schema.helpers().int64_key_removal);
    assert!(!schema.has_hidden_suffix());
    assert_eq!(schema.field_edge(5), Some(FieldEdge::FinalNoHiddenSuffix));
}

#[test]
fn test_bad_rows_are_counted_or_fatal_in_strict_mode() {
    let schema = compile_spec_file(fixture("bad_rows.spec"), CompileConfig::default())
        .expect("Failed to compile bad_rows.spec");
    assert_eq!(schema.counters().read, 2);
    assert_eq!(schema.counters().bad, 4);
    assert!(schema.column("SHADOW").is_none());

    let strict = CompileConfig {
        strict: true,
        ..Default::default()
    };
    let err = compile_spec_file(fixture("bad_rows.spec"), strict).unwrap_err();
    assert!(matches!(err, SpecError::BadRowsInStrictMode { count: 4 }));
}

#[test]
fn test_crlf_spec_matches_lf_spec() {
    let crlf = compile_spec_file(fixture("crlf.spec"), CompileConfig::default())
        .expect("Failed to compile crlf.spec");
    let lf = compile_spec_str(
        "name,headerstring,type,hasindex,finaltype\nID,Id,int64,*index,\nNAME,Name,,,\n",
        CompileConfig::default(),
    )
    .expect("Failed to compile inline spec");

    assert_eq!(crlf, lf);
    assert_eq!(crlf.column("NAME").map(|c| c.raw_classifier.as_str()), Some("none"));
}

#[test]
fn test_compile_from_temp_file_and_reader() {
    let text = fs::read_to_string(fixture("trades.spec")).expect("Failed to read trades.spec");

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(text.as_bytes())
        .expect("Failed to write temp spec");

    let from_file = compile_spec_file(file.path(), CompileConfig::default())
        .expect("Failed to compile temp spec");
    let from_reader = compile_spec_source(
        &mut ReaderSource::new(text.as_bytes()),
        CompileConfig::default(),
    )
    .expect("Failed to compile from reader");
    let from_str =
        compile_spec_str(&text, CompileConfig::default()).expect("Failed to compile from str");

    assert_eq!(from_file, from_reader);
    assert_eq!(from_file, from_str);
}

#[test]
fn test_latin1_comment_is_skipped() {
    let spec = b"# caf\xE9 feed\n\
                 name,headerstring,type,hasindex,finaltype\n\
                 ID,Id,int64,*index,\n";

    let schema = compile_spec_source(&mut ReaderSource::new(&spec[..]), CompileConfig::default())
        .expect("Failed to compile spec with a Latin-1 comment");
    assert_eq!(schema.counters().comment, 1);
    assert_eq!(schema.counters().read, 1);
    assert_eq!(schema.favorite_name(), "ID");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = compile_spec_file(dir.path().join("absent.spec"), CompileConfig::default())
        .unwrap_err();
    assert!(matches!(err, SpecError::Io(_)));
}
