pub mod api;
pub mod ast;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod quoting;
mod serialization;

pub use api::{build, build_json, build_payload, lex, parse, parse_str, ParsedConfig};
pub use ast::{Comment, Node, Statement};
pub use error::{BuildError, LexError, NgxConfError, ParseError, PayloadError};
pub use options::{BuildOptions, ParseOptions};
pub use serialization::Directive;
