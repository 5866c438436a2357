use std::fmt::Display;
use tracing::trace;

use crate::A2lError;

/// position of a token or block in the input text
///
/// Both line and column are 1-based; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// The recoverable problem classes. None of them stops the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// malformed tokens or unbalanced `/begin` / `/end`
    SyntaxError,
    /// wrong parameter count or type for a known keyword
    SchemaViolation,
    /// a keyword that is not part of the schema at this position; its content is kept as a `RawBlock`
    UnknownKeyword,
}

/// A single issue found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

/// error type that an event handler may return in order to abort the parse
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type HandlerFn<'h> = dyn FnMut(&Diagnostic) -> Result<(), HandlerError> + 'h;

// DiagnosticSink
// collects all diagnostics in the order they are reported and forwards each one to the
// event handler (if there is one) as soon as it is created
pub(crate) struct DiagnosticSink<'a, 'h> {
    diagnostics: Vec<Diagnostic>,
    handler: Option<&'a mut HandlerFn<'h>>,
}

impl Location {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

impl DiagnosticKind {
    /// unknown keywords are only warnings, everything else is an error
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::UnknownKeyword => Severity::Warning,
            DiagnosticKind::SyntaxError | DiagnosticKind::SchemaViolation => Severity::Error,
        }
    }
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::SyntaxError => f.write_str("syntax error"),
            DiagnosticKind::SchemaViolation => f.write_str("schema violation"),
            DiagnosticKind::UnknownKeyword => f.write_str("unknown keyword"),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({}): {}",
            self.location, self.severity, self.kind, self.message
        )
    }
}

impl<'a, 'h> DiagnosticSink<'a, 'h> {
    pub(crate) fn new(handler: Option<&'a mut HandlerFn<'h>>) -> Self {
        Self {
            diagnostics: Vec::new(),
            handler,
        }
    }

    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        location: Location,
        message: String,
    ) -> Result<(), A2lError> {
        let diagnostic = Diagnostic {
            kind,
            severity: kind.severity(),
            location,
            message,
        };
        trace!(%diagnostic, "reporting diagnostic");

        if let Some(handler) = self.handler.as_deref_mut() {
            if let Err(source) = handler(&diagnostic) {
                self.diagnostics.push(diagnostic.clone());
                return Err(A2lError::EventHandlerError { diagnostic, source });
            }
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    pub(crate) fn syntax_error(&mut self, location: Location, message: String) -> Result<(), A2lError> {
        self.report(DiagnosticKind::SyntaxError, location, message)
    }

    pub(crate) fn schema_violation(
        &mut self,
        location: Location,
        message: String,
    ) -> Result<(), A2lError> {
        self.report(DiagnosticKind::SchemaViolation, location, message)
    }

    pub(crate) fn unknown_keyword(
        &mut self,
        location: Location,
        message: String,
    ) -> Result<(), A2lError> {
        self.report(DiagnosticKind::UnknownKeyword, location, message)
    }

    pub(crate) fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
