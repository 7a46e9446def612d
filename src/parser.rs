use crate::ast::{Comment, Node, Statement};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenType};
use crate::options::ParseOptions;
use crate::quoting::decode;
use log::{debug, trace};
use miette::{NamedSource, SourceSpan};

/// A block whose closing `}` has not been seen yet.
struct OpenBlock {
    statement: Statement,
    children: Vec<Node>,
    /// Line and span of the `{` itself, which may sit below the directive.
    line: usize,
    span: SourceSpan,
    ignored: bool,
}

/// A statement whose terminating `;` or `{` has not been seen yet.
struct PendingStatement {
    statement: Statement,
    span: SourceSpan,
}

/// A single-pass parser that turns the token stream into a directive tree.
///
/// Nesting is tracked with an explicit stack of open blocks rather than
/// recursion, so the depth of the input only costs heap memory and is capped
/// by [`ParseOptions::max_depth`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source_text: &'a str,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::with_options(source_text, ParseOptions::default())
    }

    pub fn with_options(source_text: &'a str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new_with_name(source_text, options.file_name.clone()),
            source_text,
            options,
        }
    }

    /// Consumes the whole input and returns the top-level nodes.
    pub fn parse_document(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut pending: Option<PendingStatement> = None;

        while let Some(token) = self.lexer.next() {
            let token = token?;
            let span = span_of(&token);
            match token.ttype {
                TokenType::Comment(text) => {
                    if self.options.comments {
                        current(&mut root, &mut stack).push(Node::Comment(Comment {
                            text,
                            line: Some(token.line),
                        }));
                    }
                }
                TokenType::Word(ref text) | TokenType::Quoted(ref text) => {
                    let value = decode(text, token.is_quoted());
                    match pending.as_mut() {
                        Some(in_progress) => in_progress.statement.args.push(value),
                        None => {
                            pending = Some(PendingStatement {
                                statement: Statement::new(value).at_line(token.line),
                                span,
                            });
                        }
                    }
                }
                TokenType::Semicolon => {
                    let Some(done) = pending.take() else {
                        return Err(ParseError::UnexpectedSemicolon {
                            line: token.line,
                            src: self.named_source(),
                            span,
                        });
                    };
                    if !self.options.is_ignored(&done.statement.directive) {
                        current(&mut root, &mut stack).push(Node::Statement(done.statement));
                    }
                }
                TokenType::LBrace => {
                    let Some(opener) = pending.take() else {
                        return Err(self.unexpected_brace('{', &token));
                    };
                    if stack.len() >= self.options.max_depth {
                        debug!(
                            "nesting limit of {} reached at line {}",
                            self.options.max_depth, token.line
                        );
                        return Err(ParseError::TooDeep {
                            line: token.line,
                            max_depth: self.options.max_depth,
                            src: self.named_source(),
                            span,
                        });
                    }
                    let ignored = stack.last().is_some_and(|open| open.ignored)
                        || self.options.is_ignored(&opener.statement.directive);
                    trace!(
                        "open block '{}' at line {}, depth {}",
                        opener.statement.directive,
                        token.line,
                        stack.len() + 1
                    );
                    stack.push(OpenBlock {
                        statement: opener.statement,
                        children: Vec::new(),
                        line: token.line,
                        span,
                        ignored,
                    });
                }
                TokenType::RBrace => {
                    if pending.is_some() {
                        return Err(self.unexpected_brace('}', &token));
                    }
                    let Some(closed) = stack.pop() else {
                        return Err(self.unexpected_brace('}', &token));
                    };
                    if !closed.ignored {
                        let mut statement = closed.statement;
                        statement.block = Some(closed.children);
                        current(&mut root, &mut stack).push(Node::Statement(statement));
                    }
                }
            }
        }

        if let Some(unfinished) = pending {
            return Err(ParseError::UnexpectedEof {
                line: unfinished.statement.line.unwrap_or(1),
                src: self.named_source(),
                span: unfinished.span,
            });
        }
        if let Some(unclosed) = stack.pop() {
            return Err(ParseError::UnclosedBlock {
                line: unclosed.line,
                src: self.named_source(),
                span: unclosed.span,
            });
        }

        debug!(
            "parsed {} top-level nodes from {}",
            root.len(),
            self.options.file_name
        );
        Ok(root)
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.options.file_name.clone(), self.source_text.to_string())
    }

    fn unexpected_brace(&self, brace: char, token: &Token) -> ParseError {
        ParseError::UnexpectedBrace {
            line: token.line,
            brace,
            src: self.named_source(),
            span: span_of(token),
        }
    }
}

/// The child list new nodes are appended to: the innermost open block, or
/// the root when no block is open.
fn current<'s>(root: &'s mut Vec<Node>, stack: &'s mut [OpenBlock]) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    }
}

fn span_of(token: &Token) -> SourceSpan {
    (token.pos_start, token.pos_end - token.pos_start).into()
}
