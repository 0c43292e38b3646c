use crate::error::CliResult;
use hcsv_spec::write_skeleton;
use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};
use tracing::info;

pub fn execute(header_line: String, output: Option<PathBuf>) -> CliResult<()> {
    let columns = match &output {
        Some(path) => {
            if path.exists() {
                info!(path = %path.display(), "Overwriting existing spec file");
            }
            write_skeleton(&header_line, BufWriter::new(File::create(path)?))?
        }
        None => write_skeleton(&header_line, io::stdout().lock())?,
    };

    info!(
        columns,
        output = %output.as_ref().map_or("stdout".into(), |p| p.display().to_string()),
        "Wrote spec skeleton; declare a favorite index before compiling"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_writes_skeleton_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.spec");

        execute("Trade Id,Price".to_string(), Some(path.clone())).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,headerstring,type,hasindex,finaltype\n\
             Tradeid,Trade Id,,,\n\
             Price,Price,,,\n"
        );
    }
}
