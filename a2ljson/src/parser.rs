use crate::A2lError;
use crate::diagnostic::{DiagnosticSink, Location};
use crate::literal::decode_string;
use crate::model::RawValue;
use crate::specification::FILE_TAG;
use crate::tokenizer::{A2lToken, A2lTokenType, Tokenizer};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Param {
    pub(crate) value: RawValue,
    pub(crate) location: Location,
}

// GenericBlock
// One `/begin TAG ... /end TAG` block of the input, without any interpretation of its content.
// The whole file is represented by the implicit block A2L_FILE.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenericBlock {
    pub(crate) tag: String,
    pub(crate) location: Location,
    pub(crate) params: Vec<Param>,
    pub(crate) children: Vec<GenericBlock>,
    // number of parameters of the parent block that precede this block
    pub(crate) param_offset: usize,
}

struct BlockParser<'a> {
    tokenizer: Tokenizer<'a>,
    pushback: Option<A2lToken<'a>>,
    root: GenericBlock,
    // the currently open blocks, innermost last
    stack: Vec<GenericBlock>,
}

// parse_blocks()
// Build the block tree of the input text.
// The tokenizer is driven by the parser, so that syntax errors of both are reported in
// the order of their position in the input.
pub(crate) fn parse_blocks(text: &str, sink: &mut DiagnosticSink) -> Result<GenericBlock, A2lError> {
    let parser = BlockParser {
        tokenizer: Tokenizer::new(text),
        pushback: None,
        root: GenericBlock::new(FILE_TAG, Location::new(1, 1), 0),
        stack: Vec::new(),
    };
    parser.parse(sink)
}

impl GenericBlock {
    fn new(tag: &str, location: Location, param_offset: usize) -> Self {
        Self {
            tag: tag.to_string(),
            location,
            params: Vec::new(),
            children: Vec::new(),
            param_offset,
        }
    }
}

impl<'a> BlockParser<'a> {
    fn get_token(&mut self, sink: &mut DiagnosticSink) -> Result<Option<A2lToken<'a>>, A2lError> {
        if let Some(token) = self.pushback.take() {
            return Ok(Some(token));
        }
        self.tokenizer.next_token(sink)
    }

    fn undo_get_token(&mut self, token: A2lToken<'a>) {
        self.pushback = Some(token);
    }

    fn current(&mut self) -> &mut GenericBlock {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn parse(mut self, sink: &mut DiagnosticSink) -> Result<GenericBlock, A2lError> {
        while let Some(token) = self.get_token(sink)? {
            let value = match token.ttype {
                A2lTokenType::Begin => {
                    self.begin_block(&token, sink)?;
                    continue;
                }
                A2lTokenType::End => {
                    self.end_block(&token, sink)?;
                    continue;
                }
                A2lTokenType::Identifier => RawValue::Identifier(token.text.to_string()),
                A2lTokenType::String => RawValue::String(decode_string(token.text)),
                A2lTokenType::Number => RawValue::Number(token.text.to_string()),
                A2lTokenType::Verbatim => RawValue::Verbatim(token.text.to_string()),
            };
            self.current().params.push(Param {
                value,
                location: token.location,
            });
        }

        // end of input: every block that is still open gets closed implicitly
        while let Some(block) = self.stack.pop() {
            sink.syntax_error(
                block.location,
                format!("block {} was not closed before the end of input", block.tag),
            )?;
            self.current().children.push(block);
        }

        Ok(self.root)
    }

    fn begin_block(&mut self, begin: &A2lToken<'a>, sink: &mut DiagnosticSink) -> Result<(), A2lError> {
        match self.get_token(sink)? {
            Some(token) if token.ttype == A2lTokenType::Identifier => {
                let param_offset = self.current().params.len();
                self.stack
                    .push(GenericBlock::new(token.text, begin.location, param_offset));
            }
            Some(token) => {
                sink.syntax_error(
                    token.location,
                    format!("expected a keyword after /begin, found \"{}\"", token.text),
                )?;
                self.undo_get_token(token);
            }
            None => {
                sink.syntax_error(
                    begin.location,
                    "expected a keyword after /begin, found the end of input".to_string(),
                )?;
            }
        }
        Ok(())
    }

    fn end_block(&mut self, end: &A2lToken<'a>, sink: &mut DiagnosticSink) -> Result<(), A2lError> {
        let tag = match self.get_token(sink)? {
            Some(token) if token.ttype == A2lTokenType::Identifier => token.text,
            Some(token) => {
                sink.syntax_error(
                    token.location,
                    format!("expected a keyword after /end, found \"{}\"", token.text),
                )?;
                self.undo_get_token(token);
                return Ok(());
            }
            None => {
                sink.syntax_error(
                    end.location,
                    "expected a keyword after /end, found the end of input".to_string(),
                )?;
                return Ok(());
            }
        };

        let Some(position) = self.stack.iter().rposition(|block| block.tag == tag) else {
            sink.syntax_error(
                end.location,
                format!("/end {tag} does not match any open block"),
            )?;
            return Ok(());
        };

        if position + 1 < self.stack.len() {
            let inner: Vec<&str> = self.stack[position + 1..]
                .iter()
                .map(|block| block.tag.as_str())
                .collect();
            sink.syntax_error(
                end.location,
                format!(
                    "unbalanced block: /end {tag} while {} is still open",
                    inner.join(", ")
                ),
            )?;
        }
        // close the matching block, together with all unclosed blocks inside of it
        while self.stack.len() > position {
            if let Some(block) = self.stack.pop() {
                self.current().children.push(block);
            }
        }
        Ok(())
    }
}
