use hcsv_spec::{compile_spec_str, render_skeleton, CompileConfig, SpecError, SpecResult};

fn compile_rows(rows: &[&str]) -> SpecResult<hcsv_spec::CompiledSchema> {
    let mut text = String::from("name,headerstring,type,hasindex,finaltype\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    compile_spec_str(&text, CompileConfig::default())
}

fn assert_fatal(rows: &[&str], expected: fn(&SpecError) -> bool) {
    let err = compile_rows(rows).unwrap_err();
    assert!(expected(&err), "{rows:?} produced unexpected error: {err}");
    assert!(!err.is_recoverable());
}

#[test]
fn test_fatal_errors() {
    assert_fatal(&["ID,Id,int32,*index,"], |e| {
        matches!(e, SpecError::UnknownType { .. })
    });
    assert_fatal(&["ID,Id,int64,*index,", "ID,Again,string,,"], |e| {
        matches!(e, SpecError::DuplicateColumn(_))
    });
    assert_fatal(&["ID,Id,int64,*indx,"], |e| {
        matches!(e, SpecError::InvalidIndexSpec { .. })
    });
    assert_fatal(&["ID,Id,int64,,", "NAME,Name,string,noindex,"], |e| {
        matches!(e, SpecError::NoIndexes)
    });
    assert_fatal(&["ID,Id,int64,index,", "NAME,Name,string,index(N=0),"], |e| {
        matches!(e, SpecError::NoFavoriteIndex)
    });
    assert_fatal(&["A,A,string,*index(K=0),", "B,B,string,index(K=3),"], |e| {
        matches!(e, SpecError::IndexGap { position: 1, .. })
    });
    assert_fatal(&["A,A,string,*index(K=1),", "B,B,string,index(K=1),"], |e| {
        matches!(e, SpecError::DuplicateIndexPosition { position: 1, .. })
    });
    assert_fatal(&["A,A,string,*index(K=0=:),", "B,B,string,index(K=1=;),"], |e| {
        matches!(e, SpecError::SeparatorConflict { .. })
    });
}

#[test]
fn test_section_index_specs_do_not_count() {
    // header/footer index specs are ignored, leaving nothing to index
    let err = compile_rows(&["RUN,Run,yyyymmdd,*index,header", "N,N,int64,*index,footer"])
        .unwrap_err();
    assert!(matches!(err, SpecError::NoIndexes));
}

#[test]
fn test_rows_before_header_are_fatal() {
    let err = compile_spec_str(
        "ID,Id,int64,*index,\nname,headerstring,type,hasindex,finaltype\n",
        CompileConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SpecError::MissingSpecHeader { .. }));
}

#[test]
fn test_fresh_skeleton_has_no_favorite() {
    let skeleton = render_skeleton("Trade Id,Price").expect("Failed to render skeleton");
    let err = compile_spec_str(&skeleton, CompileConfig::default()).unwrap_err();
    assert!(matches!(err, SpecError::NoIndexes));
}
