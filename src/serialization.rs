use crate::ast::{Comment, Node, Statement};
use crate::error::BuildError;
use serde::{Deserialize, Serialize};

/// Directive name that marks a payload entry as a comment.
pub const COMMENT_DIRECTIVE: &str = "#";

/// The flat, tool-friendly shape of a tree node:
/// `{directive, args, line?, block?, comment?}`.
///
/// Comments use `directive: "#"`, no `args` and the text in `comment`.
/// A missing or `null` `directive` leaves the entry undefined; the empty
/// string is a valid (quoted) directive name.
///
/// Because `"#"` marks comments, a statement whose name is literally `#`
/// (written `'#'` in a file) has no payload form: it reads back as a
/// comment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub directive: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Vec<Directive>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Directive {
    fn from_comment(comment: &Comment) -> Self {
        Directive {
            directive: Some(COMMENT_DIRECTIVE.to_string()),
            args: Vec::new(),
            line: comment.line,
            block: None,
            comment: Some(comment.text.clone()),
        }
    }

    fn from_statement(statement: &Statement, block: Option<Vec<Directive>>) -> Self {
        Directive {
            directive: Some(statement.directive.clone()),
            args: statement.args.clone(),
            line: statement.line,
            block,
            comment: None,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.directive.as_deref() == Some(COMMENT_DIRECTIVE)
    }
}

struct Level<'t, I, O> {
    children: std::iter::Enumerate<std::slice::Iter<'t, I>>,
    head: Option<O>,
    out: Vec<O>,
}

impl<'t, I, O> Level<'t, I, O> {
    fn new(children: &'t [I], head: Option<O>) -> Self {
        Self {
            children: children.iter().enumerate(),
            head,
            out: Vec::new(),
        }
    }
}

/// Converts a tree into its payload form. Never fails.
pub(crate) fn to_payload(nodes: &[Node]) -> Vec<Directive> {
    let mut stack: Vec<Level<'_, Node, Directive>> = vec![Level::new(nodes, None)];
    while let Some(level) = stack.last_mut() {
        match level.children.next() {
            Some((_, Node::Comment(comment))) => level.out.push(Directive::from_comment(comment)),
            Some((_, Node::Statement(statement))) => match &statement.block {
                None => level.out.push(Directive::from_statement(statement, None)),
                Some(block) => {
                    let head = Directive::from_statement(statement, Some(Vec::new()));
                    stack.push(Level::new(block, Some(head)));
                }
            },
            None => {
                let Some(done) = stack.pop() else { break };
                match (done.head, stack.last_mut()) {
                    (Some(mut head), Some(parent)) => {
                        head.block = Some(done.out);
                        parent.out.push(head);
                    }
                    _ => return done.out,
                }
            }
        }
    }
    Vec::new()
}

/// Converts a payload into a tree, rejecting entries that cannot be built.
pub(crate) fn from_payload(directives: &[Directive]) -> Result<Vec<Node>, BuildError> {
    let mut stack: Vec<Level<'_, Directive, Node>> = vec![Level::new(directives, None)];
    while let Some(level) = stack.last_mut() {
        match level.children.next() {
            Some((index, directive)) if directive.is_comment() => {
                if !directive.args.is_empty() {
                    return Err(malformed(&stack, index, "comment carries arguments"));
                }
                if directive.block.is_some() {
                    return Err(malformed(&stack, index, "comment owns a block"));
                }
                let comment = Comment {
                    text: directive.comment.clone().unwrap_or_default(),
                    line: directive.line,
                };
                level.out.push(Node::Comment(comment));
            }
            Some((index, directive)) => {
                let Some(name) = &directive.directive else {
                    return Err(malformed(&stack, index, "entry has no directive"));
                };
                let statement = Statement {
                    directive: name.clone(),
                    args: directive.args.clone(),
                    line: directive.line,
                    block: None,
                };
                match &directive.block {
                    None => level.out.push(Node::Statement(statement)),
                    Some(block) => stack.push(Level::new(block, Some(Node::Statement(statement)))),
                }
            }
            None => {
                let Some(done) = stack.pop() else { break };
                match (done.head, stack.last_mut()) {
                    (Some(Node::Statement(mut head)), Some(parent)) => {
                        head.block = Some(done.out);
                        parent.out.push(Node::Statement(head));
                    }
                    _ => return Ok(done.out),
                }
            }
        }
    }
    Ok(Vec::new())
}

fn malformed<I, O>(stack: &[Level<'_, I, O>], index: usize, reason: &str) -> BuildError
where
    O: HeadName,
{
    let mut parts: Vec<String> = stack
        .iter()
        .filter_map(|level| level.head.as_ref().map(|head| head.head_name().to_string()))
        .collect();
    parts.push(format!("#{index}"));
    BuildError::MalformedNode {
        path: parts.join(" > "),
        reason: reason.to_string(),
    }
}

trait HeadName {
    fn head_name(&self) -> &str;
}

impl HeadName for Node {
    fn head_name(&self) -> &str {
        match self {
            Node::Statement(statement) => &statement.directive,
            Node::Comment(_) => COMMENT_DIRECTIVE,
        }
    }
}
