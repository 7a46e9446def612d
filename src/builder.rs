use crate::ast::{Comment, Node, Statement};
use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::quoting::encode;
use log::debug;

/// One sibling sequence being emitted.
struct Frame<'t> {
    nodes: std::iter::Enumerate<std::slice::Iter<'t, Node>>,
    depth: usize,
    /// Directive that opened this block; empty for the root.
    directive: &'t str,
    /// Line a comment must sit on to be attached to the end of the previous
    /// output line instead of getting a line of its own.
    attach_line: Option<usize>,
}

/// Renders a directive tree as configuration text.
///
/// Siblings are joined by single newlines and the result carries no trailing
/// newline. Nothing is returned unless the whole tree renders.
pub fn build(nodes: &[Node], options: &BuildOptions) -> Result<String, BuildError> {
    let mut lines: Vec<String> = Vec::new();
    let mut stack = vec![Frame {
        nodes: nodes.iter().enumerate(),
        depth: 0,
        directive: "",
        attach_line: None,
    }];

    while let Some(frame) = stack.last_mut() {
        let depth = frame.depth;
        let Some((index, node)) = frame.nodes.next() else {
            stack.pop();
            if depth > 0 {
                lines.push(format!("{}}}", options.margin(depth - 1)));
            }
            continue;
        };
        let attach_line = frame.attach_line.take();

        match node {
            Node::Comment(comment) => {
                check_comment(comment).map_err(|reason| BuildError::MalformedNode {
                    path: node_path(&stack, index),
                    reason,
                })?;
                let attached = comment.line.is_some() && comment.line == attach_line;
                match lines.last_mut() {
                    Some(last) if attached => {
                        last.push_str(" #");
                        last.push_str(&comment.text);
                    }
                    _ => lines.push(format!("{}#{}", options.margin(depth), comment.text)),
                }
            }
            Node::Statement(statement) => {
                let head = render_head(statement);
                // A head spanning lines would move the statement's end off
                // its recorded line, so nothing may be attached to it.
                let single_line = !head.contains('\n');
                let next_attach = statement.line.filter(|_| single_line);

                match &statement.block {
                    None => {
                        lines.push(format!("{}{};", options.margin(depth), head));
                        if let Some(frame) = stack.last_mut() {
                            frame.attach_line = next_attach;
                        }
                    }
                    Some(block) => {
                        if depth >= options.max_depth {
                            debug!("nesting limit of {} reached while building", options.max_depth);
                            return Err(BuildError::TooDeep {
                                path: node_path(&stack, index),
                                max_depth: options.max_depth,
                            });
                        }
                        lines.push(format!("{}{} {{", options.margin(depth), head));
                        stack.push(Frame {
                            nodes: block.iter().enumerate(),
                            depth: depth + 1,
                            directive: &statement.directive,
                            attach_line: next_attach,
                        });
                    }
                }
            }
        }
    }

    debug!("built {} lines from {} top-level nodes", lines.len(), nodes.len());
    Ok(lines.join("\n"))
}

/// `directive arg1 arg2 ...` with every part minimally quoted.
fn render_head(statement: &Statement) -> String {
    let mut head = encode(&statement.directive);
    for arg in &statement.args {
        head.push(' ');
        head.push_str(&encode(arg));
    }
    head
}

fn check_comment(comment: &Comment) -> Result<(), String> {
    if comment.text.contains('\n') {
        return Err("comment text spans more than one line".to_string());
    }
    Ok(())
}

/// Human readable location of the `index`-th child of the innermost frame,
/// e.g. `http > server > #2`.
fn node_path(stack: &[Frame<'_>], index: usize) -> String {
    let mut parts: Vec<String> = stack
        .iter()
        .skip(1)
        .map(|frame| frame.directive.to_string())
        .collect();
    parts.push(format!("#{index}"));
    parts.join(" > ")
}
