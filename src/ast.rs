/// One entry of a block (or of the file root): either a directive statement
/// or a comment, kept in the order they appear in the source.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Node {
    Statement(Statement),
    Comment(Comment),
}

/// A directive such as `listen 80;` or `server { ... }`.
///
/// `block` is `None` for statements terminated by `;` and `Some` for
/// statements that open a `{ }` block, even when that block is empty.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Statement {
    pub directive: String,
    pub args: Vec<String>,
    pub line: Option<usize>,
    pub block: Option<Vec<Node>>,
}

/// A `#` comment. `text` is everything after the `#` up to the end of line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Comment {
    pub text: String,
    pub line: Option<usize>,
}

impl Statement {
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            args: Vec::new(),
            line: None,
            block: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: Vec<Node>) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            line: None,
        }
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl From<Statement> for Node {
    fn from(statement: Statement) -> Self {
        Node::Statement(statement)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl Node {
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Node::Statement(statement) => statement.line,
            Node::Comment(comment) => comment.line,
        }
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    /// The child block, for statements that own one.
    #[must_use]
    pub fn block(&self) -> Option<&[Node]> {
        match self {
            Node::Statement(statement) => statement.block.as_deref(),
            Node::Comment(_) => None,
        }
    }

    fn block_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Statement(statement) => statement.block.as_mut(),
            Node::Comment(_) => None,
        }
    }

    fn clear_line(&mut self) {
        match self {
            Node::Statement(statement) => statement.line = None,
            Node::Comment(comment) => comment.line = None,
        }
    }
}

/// Clears the line metadata of every node in the tree, in place.
///
/// Two trees that differ only in where their nodes sat in the source compare
/// equal after this.
pub fn strip_lines(nodes: &mut [Node]) {
    let mut pending: Vec<&mut Node> = nodes.iter_mut().collect();
    while let Some(node) = pending.pop() {
        node.clear_line();
        if let Some(block) = node.block_mut() {
            pending.extend(block.iter_mut());
        }
    }
}

/// Depth-first, in-order traversal of every node in the tree, paired with
/// its nesting depth (0 for the root sequence).
pub fn walk(nodes: &[Node]) -> Walk<'_> {
    Walk {
        stack: vec![(0, nodes.iter())],
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, std::slice::Iter<'a, Node>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, iter) = self.stack.last_mut()?;
            let depth = *depth;
            match iter.next() {
                Some(node) => {
                    if let Some(block) = node.block() {
                        self.stack.push((depth + 1, block.iter()));
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Statement::new("events")
                .at_line(1)
                .with_block(vec![Statement::new("worker_connections")
                    .arg("1024")
                    .at_line(2)
                    .into()])
                .into(),
            Comment::new("comment").at_line(4).into(),
            Statement::new("http").at_line(5).with_block(vec![]).into(),
        ]
    }

    #[test]
    fn test_walk_is_depth_first_in_order() {
        let tree = sample();
        let seen: Vec<(usize, Option<usize>)> =
            walk(&tree).map(|(depth, node)| (depth, node.line())).collect();
        assert_eq!(
            seen,
            vec![(0, Some(1)), (1, Some(2)), (0, Some(4)), (0, Some(5))]
        );
    }

    #[test]
    fn test_strip_lines_clears_nested_nodes() {
        let mut tree = sample();
        strip_lines(&mut tree);
        assert!(walk(&tree).all(|(_, node)| node.line().is_none()));
    }

    #[test]
    fn test_empty_block_is_distinct_from_no_block() {
        let leaf = Statement::new("events");
        let empty = Statement::new("events").with_block(vec![]);
        assert_ne!(leaf, empty);
        assert_eq!(Node::from(empty).block(), Some(&[][..]));
    }
}
