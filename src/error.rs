use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum NgxConfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Payload(#[from] PayloadError),
}

impl NgxConfError {
    /// The 1-based source line the error points at, when there is one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            NgxConfError::Parse(err) => Some(err.line()),
            NgxConfError::Build(_) | NgxConfError::Payload(_) => None,
        }
    }
}

impl From<LexError> for NgxConfError {
    fn from(err: LexError) -> Self {
        NgxConfError::Parse(ParseError::Lex(err))
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LexError {
    #[error("line {line}: unterminated quoted string")]
    #[diagnostic(
        code(lexer::unterminated_quote),
        help("Close the string with the same quote character that opened it.")
    )]
    UnterminatedQuote {
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("This quote is never closed")]
        span: SourceSpan,
    },
}

impl LexError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedQuote { line, .. } => *line,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error("line {line}: unexpected \"{brace}\"")]
    #[diagnostic(
        code(parser::unexpected_brace),
        help("Blocks open after a directive name and close only where a statement could start.")
    )]
    UnexpectedBrace {
        line: usize,
        brace: char,
        #[source_code]
        src: NamedSource<String>,
        #[label("Unexpected brace")]
        span: SourceSpan,
    },

    #[error("line {line}: unexpected \";\"")]
    #[diagnostic(
        code(parser::unexpected_semicolon),
        help("A \";\" must terminate a directive; empty statements are not allowed.")
    )]
    UnexpectedSemicolon {
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("No directive to terminate here")]
        span: SourceSpan,
    },

    #[error("line {line}: unexpected end of file, expecting \"}}\"")]
    #[diagnostic(
        code(parser::unclosed_block),
        help("This block is never closed. Add the missing \"}}\".")
    )]
    UnclosedBlock {
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("Block opened here")]
        span: SourceSpan,
    },

    #[error("line {line}: unexpected end of file, expecting \";\" or \"{{\"")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The last directive was never terminated.")
    )]
    UnexpectedEof {
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("Directive starts here")]
        span: SourceSpan,
    },

    #[error("line {line}: blocks nested deeper than {max_depth} levels")]
    #[diagnostic(
        code(parser::too_deep),
        help("Raise ParseOptions::max_depth if this nesting is intentional.")
    )]
    TooDeep {
        line: usize,
        max_depth: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("Nesting limit exceeded here")]
        span: SourceSpan,
    },
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(err) => err.line(),
            ParseError::UnexpectedBrace { line, .. }
            | ParseError::UnexpectedSemicolon { line, .. }
            | ParseError::UnclosedBlock { line, .. }
            | ParseError::UnexpectedEof { line, .. }
            | ParseError::TooDeep { line, .. } => *line,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("malformed node at {path}: {reason}")]
    #[diagnostic(
        code(builder::malformed_node),
        help("The reason names the rule the node at this path breaks.")
    )]
    MalformedNode { path: String, reason: String },

    #[error("blocks nested deeper than {max_depth} levels at {path}")]
    #[diagnostic(
        code(builder::too_deep),
        help("Raise BuildOptions::max_depth if this nesting is intentional.")
    )]
    TooDeep { path: String, max_depth: usize },
}

#[derive(Error, Debug, Diagnostic)]
pub enum PayloadError {
    #[error("invalid JSON payload: {0}")]
    #[diagnostic(code(payload::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML payload: {0}")]
    #[diagnostic(code(payload::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

// serde errors are not Clone; keep the message so the unified error stays Clone.
impl Clone for PayloadError {
    fn clone(&self) -> Self {
        match self {
            PayloadError::Json(err) => {
                PayloadError::Json(serde::de::Error::custom(err.to_string()))
            }
            PayloadError::Yaml(err) => {
                PayloadError::Yaml(serde::de::Error::custom(err.to_string()))
            }
        }
    }
}
