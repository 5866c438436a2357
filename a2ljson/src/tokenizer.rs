use crate::A2lError;
use crate::diagnostic::{DiagnosticSink, Location};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum A2lTokenType {
    Identifier,
    Begin,
    End,
    String,
    Number,
    /// the unprocessed body of an A2ML block
    Verbatim,
}

#[derive(Debug, Clone)]
pub(crate) struct A2lToken<'a> {
    pub(crate) ttype: A2lTokenType,
    // for strings this is the raw text between the quotes, escapes are not resolved yet
    pub(crate) text: &'a str,
    pub(crate) startpos: usize,
    pub(crate) endpos: usize,
    pub(crate) location: Location,
}

// Tokenizer
// Converts the text of an a2l file to tokens on demand; the block parser pulls one token
// at a time, so that tokenizer diagnostics and parser diagnostics are reported in the
// order in which they occur in the input.
// During tokenization the text is treated as ASCII, even though it is actually UTF-8. This
// works because characters outside of basic ASCII can only occur in strings and comments.
pub(crate) struct Tokenizer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    // byte position of the first character of the current line
    line_start: usize,
    // cached column calculation: (byte position, column) on the current line
    column_cache: (usize, u32),
    separated: bool,
    prev_was_begin: bool,
    a2ml_pending: bool,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            column_cache: (0, 1),
            separated: true,
            prev_was_begin: false,
            a2ml_pending: false,
        }
    }

    // next_token()
    // Returns the next token, or None at the end of the input.
    // Malformed input is reported to the sink and skipped; an error is only returned if the
    // event handler asks to abort.
    pub(crate) fn next_token(
        &mut self,
        sink: &mut DiagnosticSink,
    ) -> Result<Option<A2lToken<'a>>, A2lError> {
        if self.a2ml_pending {
            self.a2ml_pending = false;
            return Ok(Some(self.a2ml_body()));
        }

        let datalen = self.bytes.len();
        while self.pos < datalen {
            let startpos = self.pos;
            let c = self.bytes[startpos];

            if c.is_ascii_whitespace() {
                let mut endpos = startpos;
                while endpos < datalen && self.bytes[endpos].is_ascii_whitespace() {
                    endpos += 1;
                }
                self.advance_to(endpos);
                self.separated = true;
            } else if c == b'/' {
                let rest = &self.bytes[startpos..];
                if rest.starts_with(b"/*") {
                    // block comment
                    self.separated = true;
                    if let Some(endpos) = find_comment_end(self.bytes, startpos + 2) {
                        self.advance_to(endpos);
                    } else {
                        let location = self.location_at(startpos);
                        sink.syntax_error(
                            location,
                            "block comment was not closed before the end of input".to_string(),
                        )?;
                        self.advance_to(datalen);
                    }
                } else if rest.starts_with(b"//") {
                    // line comment
                    self.separated = true;
                    let mut endpos = startpos;
                    while endpos < datalen && self.bytes[endpos] != b'\n' {
                        endpos += 1;
                    }
                    self.advance_to(endpos);
                } else if rest.starts_with(b"/begin") {
                    return self.make_token(A2lTokenType::Begin, startpos, startpos + 6, sink);
                } else if rest.starts_with(b"/end") {
                    return self.make_token(A2lTokenType::End, startpos, startpos + 4, sink);
                } else {
                    self.skip_invalid(startpos, sink)?;
                }
            } else if c == b'"' {
                if let Some(endpos) = find_string_end(self.bytes, startpos + 1) {
                    return self.make_token(A2lTokenType::String, startpos, endpos, sink);
                }
                let location = self.location_at(startpos);
                sink.syntax_error(
                    location,
                    "string was not closed before the end of input".to_string(),
                )?;
                self.skip_to_whitespace();
            } else if !c.is_ascii_digit() && is_identchar(c) {
                let mut endpos = startpos;
                while endpos < datalen && is_identchar(self.bytes[endpos]) {
                    endpos += 1;
                }
                return self.make_token(A2lTokenType::Identifier, startpos, endpos, sink);
            } else if c == b'-' || is_numchar(c) {
                // a number, in any format (integer, floating point or hexadecimal)
                let mut endpos = startpos + 1;
                while endpos < datalen && is_numchar(self.bytes[endpos]) {
                    endpos += 1;
                }
                if endpos < datalen && is_identchar(self.bytes[endpos]) {
                    // actually an identifier that starts with a digit; not standard compliant, but accepted
                    while endpos < datalen && is_identchar(self.bytes[endpos]) {
                        endpos += 1;
                    }
                    return self.make_token(A2lTokenType::Identifier, startpos, endpos, sink);
                }
                let number = &self.text[startpos..endpos];
                if number == "-" || number.eq_ignore_ascii_case("0x") {
                    let location = self.location_at(startpos);
                    sink.syntax_error(location, format!("invalid number \"{number}\""))?;
                    self.advance_to(endpos);
                    self.skip_to_whitespace();
                } else {
                    return self.make_token(A2lTokenType::Number, startpos, endpos, sink);
                }
            } else {
                self.skip_invalid(startpos, sink)?;
            }
        }

        Ok(None)
    }

    fn make_token(
        &mut self,
        ttype: A2lTokenType,
        startpos: usize,
        endpos: usize,
        sink: &mut DiagnosticSink,
    ) -> Result<Option<A2lToken<'a>>, A2lError> {
        let source = self.text;
        let location = self.location_at(startpos);
        let text = if ttype == A2lTokenType::String {
            &source[startpos + 1..endpos - 1]
        } else {
            &source[startpos..endpos]
        };
        if !self.separated {
            // the token is kept anyway
            sink.syntax_error(
                location,
                format!("missing whitespace before \"{}\"", &source[startpos..endpos]),
            )?;
        }
        self.advance_to(endpos);
        self.separated = false;

        if ttype == A2lTokenType::Identifier && self.prev_was_begin && text == "A2ML" {
            self.a2ml_pending = true;
        }
        self.prev_was_begin = ttype == A2lTokenType::Begin;

        Ok(Some(A2lToken {
            ttype,
            text,
            startpos,
            endpos,
            location,
        }))
    }

    // a2ml_body()
    // The content of an A2ML block can't be tokenized according to the rules of A2L, since it
    // is a different language. The text up to the closing "/end" is kept as a single token.
    fn a2ml_body(&mut self) -> A2lToken<'a> {
        let source = self.text;
        let bytes = self.bytes;
        let datalen = bytes.len();
        let startpos = self.pos;
        let mut pos = startpos;
        loop {
            // find the next '/', which could start "//", "/*" or "/end"
            while pos < datalen && bytes[pos] != b'/' {
                pos += 1;
            }
            let rest = &bytes[pos..];
            if rest.is_empty() || rest.starts_with(b"/end") {
                break;
            } else if rest.starts_with(b"//") {
                while pos < datalen && bytes[pos] != b'\n' {
                    pos += 1;
                }
            } else if rest.starts_with(b"/*") {
                pos = find_comment_end(bytes, pos + 2).unwrap_or(datalen);
            } else {
                // solitary '/', which is part of the A2ML text
                pos += 1;
            }
        }

        // trailing whitespace up to and including the last newline belongs to "/end A2ML"
        let mut endpos = pos;
        while endpos > startpos
            && bytes[endpos - 1].is_ascii_whitespace()
            && bytes[endpos - 1] != b'\n'
            && bytes[endpos - 1] != b'\r'
        {
            endpos -= 1;
        }
        if endpos > startpos && bytes[endpos - 1] == b'\n' {
            endpos -= 1;
            if endpos > startpos && bytes[endpos - 1] == b'\r' {
                endpos -= 1;
            }
        }

        let location = self.location_at(startpos);
        self.advance_to(endpos);
        self.separated = true;
        self.prev_was_begin = false;
        A2lToken {
            ttype: A2lTokenType::Verbatim,
            text: &source[startpos..endpos],
            startpos,
            endpos,
            location,
        }
    }

    // report a character that can't start any token, then skip to the next whitespace
    fn skip_invalid(&mut self, startpos: usize, sink: &mut DiagnosticSink) -> Result<(), A2lError> {
        let location = self.location_at(startpos);
        let character = self.text[startpos..].chars().next().unwrap_or_default();
        sink.syntax_error(location, format!("unexpected character '{character}'"))?;
        self.skip_to_whitespace();
        Ok(())
    }

    fn skip_to_whitespace(&mut self) {
        let mut endpos = self.pos;
        while endpos < self.bytes.len() && !self.bytes[endpos].is_ascii_whitespace() {
            endpos += 1;
        }
        self.advance_to(endpos);
    }

    // move the current position forward, keeping track of line starts
    fn advance_to(&mut self, endpos: usize) {
        for (offset, c) in self.bytes[self.pos..endpos].iter().enumerate() {
            if *c == b'\n' {
                self.line += 1;
                self.line_start = self.pos + offset + 1;
            }
        }
        self.pos = endpos;
    }

    // location_at()
    // Columns count characters, not bytes. Since positions are requested in increasing order,
    // the count continues from the previous request on the same line.
    fn location_at(&mut self, pos: usize) -> Location {
        let (mut cached_pos, mut column) = self.column_cache;
        if cached_pos < self.line_start || cached_pos > pos {
            cached_pos = self.line_start;
            column = 1;
        }
        let count = self.text[cached_pos..pos].chars().count();
        column += u32::try_from(count).unwrap_or(u32::MAX);
        self.column_cache = (pos, column);
        Location::new(self.line, column)
    }
}

// find_comment_end()
// returns the position after the "*/" that closes a block comment
fn find_comment_end(bytes: &[u8], startpos: usize) -> Option<usize> {
    bytes
        .get(startpos..)?
        .windows(2)
        .position(|pair| pair == b"*/")
        .map(|offset| startpos + offset + 2)
}

// find_string_end()
// returns the position after the closing quote of a string.
// A quote is escaped either by a backslash or by doubling it.
fn find_string_end(bytes: &[u8], startpos: usize) -> Option<usize> {
    let mut pos = startpos;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' if bytes.get(pos + 1) == Some(&b'"') => pos += 2,
            b'"' => return Some(pos + 1),
            _ => pos += 1,
        }
    }
    None
}

// is_identchar()
// is this char allowed in an identifier
pub(crate) fn is_identchar(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'.' || c == b'[' || c == b']' || c == b'_'
}

// is_numchar()
// in addition to decimal format, numbers can also be written as hex, or as floats with exponents
// this expands the set of allowable characters beyond is_ascii_hexdigit()
fn is_numchar(c: u8) -> bool {
    c.is_ascii_hexdigit() || c == b'x' || c == b'X' || c == b'.' || c == b'+' || c == b'-'
}

/*************************************************************************************************/
