//! Command line interface of the `a2ljson` binary
//!
//! The runner does not touch the process' stdio handles. Input, output and the diagnostic
//! stream are passed to [`run`], so that the binary and the tests can use different sinks.

use clap::{ArgGroup, Parser};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::{A2lError, A2lFile, Charset, Diagnostic, loader};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "a2ljson", version, about = "Convert a2l files to json and json back to a2l")]
#[command(group(ArgGroup::new("mode").required(true).args(["a2l", "json"])))]
pub struct Cli {
    /// Read a2l from PATH (or from stdin if PATH is omitted) and write json
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub a2l: Option<Option<PathBuf>>,

    /// Read json from stdin and write a2l
    #[arg(short, long)]
    pub json: bool,

    /// Write the output to PATH instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Encode the output with the charset NAME and prepend its byte order mark.
    /// Supported: UTF-8, UTF-16LE, UTF-16BE, UTF-32LE, UTF-32BE
    #[arg(short, long, value_name = "NAME")]
    pub charset: Option<String>,
}

/// Execute one conversion
///
/// Diagnostics from parsing a2l input are written to `diagnostics`, one per line; they never
/// end up in the converted output.
///
/// # Errors
///
/// An `A2lError` if the charset is unknown, if reading or writing fails, or if the json input is invalid.
pub fn run(
    cli: &Cli,
    input: &mut dyn Read,
    output: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> Result<(), A2lError> {
    // the charset is checked before any input is read
    let charset = cli.charset.as_deref().map(Charset::from_name).transpose()?;

    let text = if let Some(a2l_path) = &cli.a2l {
        let (a2l_file, found) = match a2l_path {
            Some(path) => crate::load(path)?,
            None => crate::Parser::new().parse(input)?,
        };
        write_diagnostics(&found, diagnostics)?;
        a2l_file.to_json()?
    } else {
        let mut data = Vec::new();
        input
            .read_to_end(&mut data)
            .map_err(|ioerror| A2lError::IoError { ioerror })?;
        A2lFile::from_json(&loader::decode_text(&data))?.write_to_string()
    };

    let bytes = match charset {
        Some(charset) => {
            debug!(%charset, "encoding output");
            charset.encode(&text)
        }
        None => text.into_bytes(),
    };

    if let Some(path) = &cli.output {
        std::fs::write(path, &bytes).map_err(|ioerror| A2lError::FileWriteError {
            filename: path.clone(),
            ioerror,
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "output written");
    } else {
        output
            .write_all(&bytes)
            .and_then(|()| output.flush())
            .map_err(|ioerror| A2lError::IoError { ioerror })?;
    }

    Ok(())
}

fn write_diagnostics(found: &[Diagnostic], sink: &mut dyn Write) -> Result<(), A2lError> {
    for diagnostic in found {
        writeln!(sink, "{diagnostic}").map_err(|ioerror| A2lError::IoError { ioerror })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const A2L_TEXT: &str = r#"
/begin PROJECT p ""
  /begin MODULE m ""
    /begin MEASUREMENT meas "" UBYTE NO_COMPU_METHOD 1 0 0 255
      MATRIX_DIM 7 8 10
    /end MEASUREMENT
  /end MODULE
/end PROJECT
"#;

    fn run_with(args: &[&str], input: &[u8]) -> (Result<(), A2lError>, Vec<u8>, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();
        let result = run(&cli, &mut Cursor::new(input), &mut output, &mut diagnostics);
        (result, output, String::from_utf8(diagnostics).unwrap())
    }

    #[test]
    fn arguments() {
        let cli = Cli::try_parse_from(["a2ljson", "--a2l"]).unwrap();
        assert_eq!(cli.a2l, Some(None));
        assert!(!cli.json);

        let cli = Cli::try_parse_from(["a2ljson", "--a2l", "in.a2l", "-o", "out.json"]).unwrap();
        assert_eq!(cli.a2l, Some(Some(PathBuf::from("in.a2l"))));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));

        let cli = Cli::try_parse_from(["a2ljson", "--json", "-c", "UTF-16"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.charset.as_deref(), Some("UTF-16"));

        // exactly one mode is required
        assert!(Cli::try_parse_from(["a2ljson"]).is_err());
        assert!(Cli::try_parse_from(["a2ljson", "--a2l", "--json"]).is_err());
    }

    #[test]
    fn a2l_to_json() {
        let (result, output, diagnostics) = run_with(&["a2ljson", "--a2l"], A2L_TEXT.as_bytes());
        assert!(result.is_ok());
        assert!(diagnostics.is_empty());
        let json = String::from_utf8(output).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains(r#""x_dim": 7"#));
        assert!(json.contains(r#""z_dim": 10"#));
    }

    #[test]
    fn json_to_a2l() {
        let (a2l_file, _) = crate::load_from_string(A2L_TEXT).unwrap();
        let json = a2l_file.to_json().unwrap();
        let (result, output, _) = run_with(&["a2ljson", "--json"], json.as_bytes());
        assert!(result.is_ok());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("MATRIX_DIM 7 8 10"));
        assert_eq!(text, a2l_file.write_to_string());

        let (result, output, _) = run_with(&["a2ljson", "--json"], b"{ \"project\": 1 }");
        assert!(matches!(result, Err(A2lError::SerializationError { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn diagnostics_are_separate() {
        let text = "/begin PROJECT p \"\" /begin MODULE m \"\" VENDOR_FLAG /end MODULE /end PROJECT";
        let (result, output, diagnostics) = run_with(&["a2ljson", "--a2l"], text.as_bytes());
        assert!(result.is_ok());
        assert_eq!(diagnostics.lines().count(), 1);
        assert!(diagnostics.contains("unknown keyword VENDOR_FLAG in MODULE"));
        let json = String::from_utf8(output).unwrap();
        assert!(!json.contains("unknown keyword"));
        assert!(json.contains("VENDOR_FLAG"));
    }

    #[test]
    fn charset_bom() {
        let (result, output, _) =
            run_with(&["a2ljson", "--a2l", "-c", "UTF-16BE"], A2L_TEXT.as_bytes());
        assert!(result.is_ok());
        assert_eq!(output[..2], [0xFE, 0xFF]);

        let (result, output, _) = run_with(&["a2ljson", "--a2l", "-c", "utf-8"], A2L_TEXT.as_bytes());
        assert!(result.is_ok());
        assert_eq!(output[..4], [0xEF, 0xBB, 0xBF, b'{']);

        // no BOM without a charset
        let (result, output, _) = run_with(&["a2ljson", "--a2l"], A2L_TEXT.as_bytes());
        assert!(result.is_ok());
        assert_eq!(output[0], b'{');
    }

    #[test]
    fn unknown_charset() {
        // the charset error wins, even though the input is not valid json
        let (result, output, _) = run_with(&["a2ljson", "--json", "-c", "EBCDIC"], b"not json");
        assert!(matches!(result, Err(A2lError::EncodingError { charset }) if charset == "EBCDIC"));
        assert!(output.is_empty());
    }

    #[test]
    fn files() {
        let dir = tempdir().unwrap();
        let a2l_path = dir.path().join("input.a2l");
        let json_path = dir.path().join("output.json");
        std::fs::write(&a2l_path, A2L_TEXT).unwrap();

        let cli = Cli {
            a2l: Some(Some(a2l_path)),
            output: Some(json_path.clone()),
            charset: Some("UTF-32LE".to_string()),
            ..Cli::default()
        };
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();
        run(&cli, &mut std::io::empty(), &mut output, &mut diagnostics).unwrap();
        assert!(output.is_empty());

        let data = std::fs::read(&json_path).unwrap();
        assert_eq!(data[..4], [0xFF, 0xFE, 0x00, 0x00]);
        let json = loader::decode_text(&data);
        let a2l_file = A2lFile::from_json(&json).unwrap();
        assert_eq!(a2l_file.project.module[0].measurement[0].name, "meas");

        let cli = Cli {
            a2l: Some(Some(dir.path().join("missing.a2l"))),
            ..Cli::default()
        };
        let result = run(&cli, &mut std::io::empty(), &mut output, &mut diagnostics);
        assert!(matches!(result, Err(A2lError::FileOpenError { .. })));
    }
}
