use crate::error::LexError;
use crate::options::DEFAULT_FILE_NAME;
use crate::quoting::{is_delimiter, is_quote, is_separator};
use miette::NamedSource;

/// Represents the different kinds of tokens that the lexer can produce.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenType {
    /// An unquoted word, exactly as written (backslash escapes included).
    Word(String),
    /// A quoted word, exactly as written, outer quote marks included.
    /// Use [`crate::quoting::decode`] to get its value.
    Quoted(String),
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Semicolon: `;`
    Semicolon,
    /// A `#` comment. Holds everything after the `#` up to the end of line.
    Comment(String),
}

/// A token with its type, source line and byte position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ttype: TokenType,
    pub line: usize,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, line: usize, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            line,
            pos_start,
            pos_end,
        }
    }

    /// The token's source text. Punctuation is rendered as itself and
    /// comments as their payload.
    pub fn text(&self) -> &str {
        match &self.ttype {
            TokenType::Word(text) | TokenType::Quoted(text) | TokenType::Comment(text) => text,
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::Semicolon => ";",
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self.ttype, TokenType::Quoted(_))
    }
}

/// Splits configuration text into tokens on demand.
///
/// The lexer is an iterator of `Result<Token, LexError>`; it stops after the
/// first error.
pub struct Lexer<'a> {
    input: &'a str,
    name: String,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
    line: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::new_with_name(input, DEFAULT_FILE_NAME.to_string())
    }

    pub fn new_with_name(input: &'a str, name: String) -> Self {
        Self {
            input,
            name,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            failed: false,
        }
    }

    /// Collects the whole token stream.
    pub fn lex(&mut self) -> Result<Vec<Token>, LexError> {
        self.by_ref().collect()
    }

    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_whitespace();
        let start_pos = self.position;
        let start_line = self.line;

        let ttype = match self.advance()? {
            '{' => TokenType::LBrace,
            '}' => TokenType::RBrace,
            ';' => TokenType::Semicolon,
            '#' => self.read_comment(),
            c if is_quote(c) => match self.read_quoted(c, start_pos) {
                Ok(ttype) => ttype,
                Err(err) => return Some(Err(err)),
            },
            c => self.read_word(c),
        };

        Some(Ok(Token::new(ttype, start_line, start_pos, self.position)))
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| is_separator(*c)) {
            self.advance();
        }
    }

    fn read_comment(&mut self) -> TokenType {
        let start = self.position;
        while self.peek().is_some_and(|c| *c != '\n') {
            self.advance();
        }
        TokenType::Comment(self.input[start..self.position].to_string())
    }

    fn read_quoted(&mut self, quote: char, start_pos: usize) -> Result<TokenType, LexError> {
        let start_line = self.line;
        while let Some(c) = self.advance() {
            if c == quote {
                return Ok(TokenType::Quoted(
                    self.input[start_pos..self.position].to_string(),
                ));
            }
            if c == '\\' {
                // Whatever follows is literal, including the quote itself.
                self.advance();
            }
        }
        Err(LexError::UnterminatedQuote {
            line: start_line,
            src: NamedSource::new(self.name.clone(), self.input.to_string()),
            span: (start_pos, 1).into(),
        })
    }

    fn read_word(&mut self, first_char: char) -> TokenType {
        let start = self.position - first_char.len_utf8();
        let mut escaped = first_char == '\\';
        while let Some(&c) = self.peek() {
            if escaped {
                if c == '\n' {
                    break;
                }
                escaped = false;
            } else if is_separator(c) || is_delimiter(c) {
                break;
            } else {
                escaped = c == '\\';
            }
            self.advance();
        }
        TokenType::Word(self.input[start..self.position].to_string())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let token = self.next_token();
        if matches!(token, Some(Err(_))) {
            self.failed = true;
        }
        token
    }
}
