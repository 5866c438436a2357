//! a2ljson reads a2l files into a typed model and converts them to JSON and back.
//!
//! The input is parsed in three stages: the tokenizer splits the text into tokens, the
//! block parser arranges them in a tree of `/begin` ... `/end` blocks, and the builder
//! uses a schema table to convert the tree into the typed model.
//! Problems in the input never stop the parser. Instead they are collected as [`Diagnostic`]s,
//! which are returned together with the model and are also passed to an optional event handler.
//!
//! ```
//! let text = r#"
//! ASAP2_VERSION 1 71
//! /begin PROJECT p ""
//!   /begin MODULE m ""
//!     /begin MEASUREMENT speed "" UWORD NO_COMPU_METHOD 1 0 0 65535
//!       MATRIX_DIM 7 8 10
//!     /end MEASUREMENT
//!   /end MODULE
//! /end PROJECT
//! "#;
//! let (a2l_file, diagnostics) = a2ljson::load_from_string(text).unwrap();
//! assert!(diagnostics.is_empty());
//!
//! let json = a2ljson::to_json(&a2l_file).unwrap();
//! let restored = a2ljson::from_json(&json).unwrap();
//! assert_eq!(restored, a2l_file);
//! ```
//!
//! # Features
//!
//! - `cli`: the command line interface in [`cli`] and the `a2ljson` binary (enabled by default)

mod blockdata;
mod builder;
#[cfg(feature = "cli")]
pub mod cli;
mod diagnostic;
mod encoding;
mod itemlist;
mod json;
mod literal;
mod loader;
mod model;
mod parser;
mod specification;
mod tokenizer;
mod writer;

use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use diagnostic::{DiagnosticSink, HandlerFn};

// re-export for the crate user
pub use diagnostic::{Diagnostic, DiagnosticKind, HandlerError, Location, Severity};
pub use encoding::Charset;
pub use itemlist::ItemList;
pub use json::{from_json, to_json};
pub use model::*;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum A2lError {
    /// `IoError`: reading the input or writing the output failed
    #[error("I/O error: {ioerror}")]
    IoError { ioerror: std::io::Error },

    /// `FileOpenError`: An `IoError` that occurred while loading a file
    #[error("Failed to load {filename}: {ioerror}")]
    FileOpenError {
        filename: PathBuf,
        ioerror: std::io::Error,
    },

    /// `FileReadError`: An `IoError` that occurred while reading from a file
    #[error("Could not read from {filename}: {ioerror}")]
    FileReadError {
        filename: PathBuf,
        ioerror: std::io::Error,
    },

    /// `FileWriteError`: An `IoError` that occurred while writing to a file
    #[error("Could not write to {filename}: {ioerror}")]
    FileWriteError {
        filename: PathBuf,
        ioerror: std::io::Error,
    },

    /// `SerializationError`: the JSON text could not be created or is not a valid model
    #[error("JSON error: {serde_error}")]
    SerializationError {
        #[source]
        serde_error: serde_json::Error,
    },

    /// `EncodingError`: the requested output charset is not supported
    #[error("Unsupported charset \"{charset}\"")]
    EncodingError { charset: String },

    /// `EventHandlerError`: the event handler returned an error, which aborts the parse
    #[error("Parsing was aborted at \"{diagnostic}\": {source}")]
    EventHandlerError {
        diagnostic: Diagnostic,
        source: HandlerError,
    },
}

/// A reusable a2l parser
///
/// Without an event handler the parser simply collects all diagnostics. An event handler
/// sees each diagnostic as soon as it is found and can abort the parse by returning an error.
///
/// ```
/// let mut count = 0;
/// let mut parser = a2ljson::Parser::new();
/// parser.set_event_handler(|_diagnostic| {
///     count += 1;
///     Ok(())
/// });
/// let (_, diagnostics) = parser.parse_str("/begin PROJECT p \"\" /end PROJECT").unwrap();
/// drop(parser);
/// // the project has no MODULE
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(count, 1);
/// ```
#[derive(Default)]
pub struct Parser<'h> {
    handler: Option<Box<HandlerFn<'h>>>,
}

impl<'h> Parser<'h> {
    #[must_use]
    pub fn new() -> Self {
        Self { handler: None }
    }

    /// Set the function that receives each diagnostic while parsing
    ///
    /// Returning an error from the handler stops the parse with [`A2lError::EventHandlerError`].
    pub fn set_event_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Diagnostic) -> Result<(), HandlerError> + 'h,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Parse a2l text
    ///
    /// Returns the model together with all diagnostics in the order in which they were reported.
    ///
    /// # Errors
    ///
    /// [`A2lError::EventHandlerError`] if the event handler aborts the parse.
    pub fn parse_str(&mut self, text: &str) -> Result<(A2lFile, Vec<Diagnostic>), A2lError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut sink = DiagnosticSink::new(self.handler.as_deref_mut());

        let root = parser::parse_blocks(text, &mut sink)?;
        debug!(
            blocks = root.children.len(),
            diagnostics = sink.len(),
            "block structure complete"
        );
        let a2l_file = builder::build_file(root, &mut sink)?;
        let diagnostics = sink.into_diagnostics();
        debug!(
            modules = a2l_file.project.module.len(),
            diagnostics = diagnostics.len(),
            "parse complete"
        );

        Ok((a2l_file, diagnostics))
    }

    /// Read all data from the reader and parse it
    ///
    /// The input may be UTF-8, UTF-16 or UTF-32, with or without byte order mark. Data that is
    /// none of these is read as ISO-8859-1.
    ///
    /// # Errors
    ///
    /// [`A2lError::IoError`] if reading fails, or [`A2lError::EventHandlerError`] if the event
    /// handler aborts the parse.
    pub fn parse<R: Read>(&mut self, mut reader: R) -> Result<(A2lFile, Vec<Diagnostic>), A2lError> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|ioerror| A2lError::IoError { ioerror })?;
        let text = loader::decode_text(&data);
        self.parse_str(&text)
    }
}

/// Load an a2l file
///
/// # Example
///
/// ```no_run
/// # use a2ljson::A2lError;
/// let (a2l_file, diagnostics) = a2ljson::load("example.a2l")?;
/// for diagnostic in diagnostics {
///     eprintln!("{diagnostic}");
/// }
/// # Ok::<(), A2lError>(())
/// ```
///
/// # Errors
///
/// An `A2lError` if the file cannot be opened or read.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(A2lFile, Vec<Diagnostic>), A2lError> {
    let pathref = path.as_ref();
    let text = loader::load(pathref)?;
    debug!(path = %pathref.display(), chars = text.len(), "loaded file");
    Parser::new().parse_str(&text)
}

/// Load a2l data stored in a string
///
/// # Example
///
/// ```
/// # use a2ljson::A2lError;
/// let text = r#"
/// ASAP2_VERSION 1 71
/// /begin PROJECT new_project ""
///   /begin MODULE new_module ""
///   /end MODULE
/// /end PROJECT
/// "#;
/// let (a2l_file, diagnostics) = a2ljson::load_from_string(text)?;
/// assert!(diagnostics.is_empty());
/// assert_eq!(a2l_file.project.module[0].name, "new_module");
/// # Ok::<(), A2lError>(())
/// ```
///
/// # Errors
///
/// Problems in the text are reported as diagnostics, so this only fails if parsing is aborted.
pub fn load_from_string(text: &str) -> Result<(A2lFile, Vec<Diagnostic>), A2lError> {
    Parser::new().parse_str(text)
}

/// Create a new a2l file
///
/// The new file contains a `PROJECT` with one `MODULE`.
#[must_use]
pub fn new() -> A2lFile {
    let mut project = Project::new("new_project", "");
    project.module.push(Module::new("new_module", ""));
    let mut a2l_file = A2lFile::new(project);
    a2l_file.asap2_version = Some(Asap2Version {
        version_no: 1,
        upgrade_no: 71,
    });
    a2l_file
}

/// Generate the a2l text of the file
///
/// Children are written in the canonical order of the schema, two spaces per nesting level.
#[must_use]
pub fn write_a2l(a2l_file: &A2lFile) -> String {
    writer::write_a2l(a2l_file)
}

impl A2lFile {
    /// construct a string containing the whole a2l data of this `A2lFile` object
    #[must_use]
    pub fn write_to_string(&self) -> String {
        writer::write_a2l(self)
    }

    /// write this `A2lFile` object to the given file
    /// the banner will be placed inside a comment at the beginning of the file; `/*` and `*/` should not be part of the banner string
    ///
    /// # Errors
    ///
    /// [`A2lError::FileWriteError`] if writing the file fails.
    pub fn write<P: AsRef<Path>>(&self, path: P, banner: Option<&str>) -> Result<(), A2lError> {
        let mut outstr = String::new();
        if let Some(banner_text) = banner {
            outstr = format!("/* {banner_text} */\n");
        }
        outstr.push_str(&self.write_to_string());

        std::fs::write(&path, outstr).map_err(|ioerror| A2lError::FileWriteError {
            filename: path.as_ref().to_path_buf(),
            ioerror,
        })
    }

    /// serialize this `A2lFile` as pretty printed JSON
    ///
    /// # Errors
    ///
    /// [`A2lError::SerializationError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, A2lError> {
        json::to_json(self)
    }

    /// create an `A2lFile` from JSON text
    ///
    /// # Errors
    ///
    /// [`A2lError::SerializationError`] if the text is not valid JSON or does not describe a file.
    pub fn from_json(json: &str) -> Result<A2lFile, A2lError> {
        json::from_json(json)
    }
}

/*************************************************************************************************/
