use crate::ast::{strip_lines, Node};
use crate::builder;
use crate::error::{BuildError, LexError, NgxConfError, PayloadError};
use crate::lexer::{Lexer, Token};
use crate::options::{BuildOptions, ParseOptions};
use crate::parser::Parser;
use crate::serialization::{from_payload, to_payload, Directive};
use serde::{Serialize, Serializer};

/// The result of parsing one configuration file.
///
/// Owns the directive tree and converts it to the payload shape
/// (`{directive, args, line?, block?, comment?}`) for other tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfig {
    pub file_name: String,
    pub nodes: Vec<Node>,
}

impl Serialize for ParsedConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_payload().serialize(serializer)
    }
}

impl ParsedConfig {
    #[must_use]
    pub fn to_payload(&self) -> Vec<Directive> {
        to_payload(&self.nodes)
    }

    /// Serializes the tree into a pretty-printed JSON array.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the tree into a YAML sequence.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    /// Reads a tree back from its JSON payload form.
    ///
    /// # Errors
    /// Fails on invalid JSON, or with `MalformedNode` on entries that do
    /// not describe a valid node.
    pub fn from_json(file_name: &str, json: &str) -> Result<Self, NgxConfError> {
        let directives: Vec<Directive> = serde_json::from_str(json).map_err(PayloadError::from)?;
        Ok(Self {
            file_name: file_name.to_string(),
            nodes: from_payload(&directives)?,
        })
    }

    /// Renders the tree back to configuration text.
    ///
    /// # Errors
    /// See [`build`].
    pub fn build(&self, options: &BuildOptions) -> Result<String, BuildError> {
        builder::build(&self.nodes, options)
    }

    /// The tree with every `line` cleared, for comparing structure only.
    #[must_use]
    pub fn without_lines(&self) -> Vec<Node> {
        let mut nodes = self.nodes.clone();
        strip_lines(&mut nodes);
        nodes
    }
}

/// Parses the text of one configuration file.
///
/// `include` directives are kept as ordinary statements; loading the files
/// they name is up to the caller.
///
/// # Errors
///
/// Returns the first lexical or structural error found. Nothing is returned
/// for partially valid input.
pub fn parse(source: &str, options: &ParseOptions) -> Result<ParsedConfig, NgxConfError> {
    let mut parser = Parser::with_options(source, options.clone());
    let nodes = parser.parse_document()?;
    Ok(ParsedConfig {
        file_name: options.file_name.clone(),
        nodes,
    })
}

/// [`parse`] with default options.
///
/// # Errors
/// See [`parse`].
pub fn parse_str(source: &str) -> Result<ParsedConfig, NgxConfError> {
    parse(source, &ParseOptions::default())
}

/// Renders a directive tree as configuration text.
///
/// # Errors
///
/// Returns `MalformedNode` for a comment spanning several lines, and
/// `TooDeep` past
/// [`BuildOptions::max_depth`]. No text is produced in either case.
pub fn build(nodes: &[Node], options: &BuildOptions) -> Result<String, BuildError> {
    builder::build(nodes, options)
}

/// Renders a tree given in payload form.
///
/// # Errors
///
/// In addition to the errors of [`build`], an entry without a `directive`
/// and a `"#"` entry carrying `args` or a `block` are `MalformedNode`.
pub fn build_payload(directives: &[Directive], options: &BuildOptions) -> Result<String, BuildError> {
    let nodes = from_payload(directives)?;
    builder::build(&nodes, options)
}

/// Renders a tree given as a JSON payload array.
///
/// # Errors
/// Fails on invalid JSON or for the reasons listed on [`build_payload`].
pub fn build_json(json: &str, options: &BuildOptions) -> Result<String, NgxConfError> {
    let directives: Vec<Directive> = serde_json::from_str(json).map_err(PayloadError::from)?;
    Ok(build_payload(&directives, options)?)
}

/// Tokenizes a whole file at once.
///
/// # Errors
/// Fails on an unterminated quoted string.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Comment, Statement};

    #[test]
    fn test_parse_to_json() {
        let source = "events {\n    worker_connections 1024;\n}\n# done\n";
        let parsed = parse_str(source).unwrap();
        let json: serde_json::Value = serde_json::from_str(&parsed.to_json().unwrap()).unwrap();
        let expected = serde_json::json!([
            {
                "directive": "events",
                "args": [],
                "line": 1,
                "block": [
                    { "directive": "worker_connections", "args": ["1024"], "line": 2 }
                ]
            },
            { "directive": "#", "args": [], "line": 4, "comment": " done" }
        ]);
        assert_eq!(json, expected);
    }

    #[test]
    fn test_parse_to_yaml() {
        let parsed = parse_str("listen 80;").unwrap();
        let yaml = parsed.to_yaml().unwrap();
        assert!(yaml.starts_with("- directive: listen\n"));
        let restored: Vec<Directive> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, parsed.to_payload());
    }

    #[test]
    fn test_json_round_trip() {
        let parsed = parse_str("http { # web\n    listen 80;\n}\n").unwrap();
        let json = parsed.to_json().unwrap();
        let restored = ParsedConfig::from_json("nginx.conf", &json).unwrap();
        assert_eq!(restored, parsed);
    }

    #[test]
    fn test_build_json() {
        let json = r#"[{"directive": "return", "args": ["200", "foo bar baz"]}]"#;
        let built = build_json(json, &BuildOptions::default()).unwrap();
        assert_eq!(built, "return 200 'foo bar baz';");
    }

    #[test]
    fn test_build_json_rejects_bad_json() {
        let err = build_json("{ not json", &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, NgxConfError::Payload(PayloadError::Json(_))));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_without_lines() {
        let parsed = parse_str("a;\n# b\n").unwrap();
        assert_eq!(
            parsed.without_lines(),
            vec![Node::from(Statement::new("a")), Node::from(Comment::new(" b"))]
        );
    }

    #[test]
    fn test_lex_entry_point() {
        assert_eq!(lex("a b;").unwrap().len(), 3);
        assert!(lex("'a").is_err());
    }
}
