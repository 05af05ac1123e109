use std::fmt;
use std::path::{Path, PathBuf};

/// One node of a composition tree.
///
/// `outfile` is write-once: it is assigned by [`assign_names`](crate::assign_names) and read by
/// the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    outfile: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Concatenation of the children's audio, in order.
    Group(Vec<Node>),
    /// One utterance in one voice.
    Speech { speaker: String, text: String },
    /// A pre-recorded asset.
    SoundEffect { id: String },
    /// A preset or external program applied to the rendered `child`.
    SoundFilter { id: String, child: Box<Node> },
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Self::from_kind(NodeKind::Group(children))
    }

    pub fn speech(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Speech {
            speaker: speaker.into(),
            text: text.into(),
        })
    }

    pub fn sound_effect(id: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::SoundEffect { id: id.into() })
    }

    pub fn sound_filter(id: impl Into<String>, child: Node) -> Self {
        Self::from_kind(NodeKind::SoundFilter {
            id: id.into(),
            child: Box::new(child),
        })
    }

    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            outfile: None,
        }
    }

    /// Scratch artifact path, `None` until the tree has been named.
    pub fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }

    pub(crate) fn assign_outfile(&mut self, path: PathBuf) {
        debug_assert!(self.outfile.is_none(), "outfile assigned twice");
        self.outfile = Some(path);
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Direct children: every child of a group, the single child of a filter, nothing for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Group(children) => children.as_slice(),
            NodeKind::SoundFilter { child, .. } => std::slice::from_ref(&**child),
            NodeKind::Speech { .. } | NodeKind::SoundEffect { .. } => &[],
        }
    }

    /// All nodes of the subtree in pre-order, starting with `self`.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().iter().rev());
        }
        out
    }

    fn fmt_outfile(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outfile {
            Some(path) => write!(f, " -> {}", path.display()),
            None => Ok(()),
        }
    }

    /// Take the node's contents, leaving an empty group behind for `Drop`.
    pub(crate) fn into_kind(mut self) -> NodeKind {
        std::mem::replace(&mut self.kind, NodeKind::Group(Vec::new()))
    }
}

/// Drops descendants from a work list so deep filter chains do not recurse.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(&mut self.kind, &mut pending);
        while let Some(mut node) = pending.pop() {
            take_children(&mut node.kind, &mut pending);
        }
    }
}

fn take_children(kind: &mut NodeKind, out: &mut Vec<Node>) {
    match kind {
        NodeKind::Group(children) => out.append(children),
        NodeKind::SoundFilter { child, .. } => {
            out.push(std::mem::replace(&mut **child, Node::group(Vec::new())));
        }
        NodeKind::Speech { .. } | NodeKind::SoundEffect { .. } => {}
    }
}

enum Line<'a> {
    Open(&'a Node, usize),
    Close(usize),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![Line::Open(self, 0)];
        while let Some(line) = lines.pop() {
            let (node, depth) = match line {
                Line::Open(node, depth) => (node, depth),
                Line::Close(depth) => {
                    writeln!(f, "{})", "  ".repeat(depth))?;
                    continue;
                }
            };
            let pad = "  ".repeat(depth);
            match &node.kind {
                NodeKind::Group(_) => write!(f, "{pad}Group(")?,
                NodeKind::Speech { speaker, text } => write!(f, "{pad}Speech({speaker}, {text})")?,
                NodeKind::SoundEffect { id } => write!(f, "{pad}SoundEffect({id})")?,
                NodeKind::SoundFilter { id, .. } => write!(f, "{pad}SoundFilter({id},")?,
            }
            node.fmt_outfile(f)?;
            writeln!(f)?;
            if matches!(node.kind, NodeKind::Group(_) | NodeKind::SoundFilter { .. }) {
                lines.push(Line::Close(depth));
                lines.extend(node.children().iter().rev().map(|c| Line::Open(c, depth + 1)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preorder_visits_parent_before_children_left_to_right() {
        let tree = Node::group(vec![
            Node::speech("a", "one"),
            Node::sound_filter("1", Node::group(vec![Node::sound_effect("5")])),
            Node::speech("b", "two"),
        ]);
        let kinds: Vec<String> = tree
            .preorder()
            .iter()
            .map(|n| match &n.kind {
                NodeKind::Group(_) => "G".to_owned(),
                NodeKind::Speech { text, .. } => text.clone(),
                NodeKind::SoundEffect { id } => format!("E{id}"),
                NodeKind::SoundFilter { id, .. } => format!("F{id}"),
            })
            .collect();
        assert_eq!(kinds, vec!["G", "one", "F1", "G", "E5", "two"]);
    }

    #[test]
    fn display_nests_filters() {
        let tree = Node::group(vec![Node::sound_filter(
            "2",
            Node::speech("udisen", "hi"),
        )]);
        assert_eq!(
            tree.to_string(),
            "Group(\n  SoundFilter(2,\n    Speech(udisen, hi)\n  )\n)\n"
        );
    }

    #[test]
    fn deep_filter_chain_drops_without_recursing() {
        let mut node = Node::speech("a", "x");
        for _ in 0..50_000 {
            node = Node::sound_filter("1", node);
        }
        drop(node);
    }

    #[test]
    fn deep_filter_chain_display_closes_every_scope() {
        let depth = 2_000;
        let mut node = Node::speech("a", "x");
        for _ in 0..depth {
            node = Node::sound_filter("1", node);
        }
        let text = node.to_string();
        assert_eq!(text.lines().count(), 2 * depth + 1);
        assert!(text.starts_with("SoundFilter(1,\n  SoundFilter(1,\n"));
        assert!(text.ends_with("\n  )\n)\n"));
    }
}
