use crate::tree::node::{Node, NodeKind};

/// Normalize a subtree, returning the node that replaces it in its parent, or `None` when the
/// subtree carries nothing renderable.
///
/// - Speech text is trimmed; blank speech is dropped.
/// - Sound effects pass through.
/// - Groups keep their surviving children in order, are dropped when empty and dissolve into
///   their only child.
/// - Filters are dropped together with an empty body.
pub fn validate(node: Node) -> Option<Node> {
    validate_node(node, false)
}

/// Normalize the root of a composition.
///
/// The root is exempt from dissolving: the result is always a group, possibly with a single child
/// or with none at all.
pub fn validate_root(root: Node) -> Node {
    match validate_node(root, true) {
        Some(node) if node.is_group() => node,
        Some(node) => Node::group(vec![node]),
        None => Node::group(Vec::new()),
    }
}

/// Pending work for the post-order walk: a node to visit, or a parent waiting for the results
/// of its children.
enum Step {
    Visit(Node, bool),
    Group { len: usize, is_root: bool },
    Filter(String),
}

fn validate_node(node: Node, is_root: bool) -> Option<Node> {
    let mut steps = vec![Step::Visit(node, is_root)];
    // One entry per finished subtree, in document order.
    let mut done: Vec<Option<Node>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(node, is_root) => match node.into_kind() {
                NodeKind::Speech { speaker, text } => {
                    let text = text.trim();
                    done.push((!text.is_empty()).then(|| Node::speech(speaker, text)));
                }
                NodeKind::SoundEffect { id } => done.push(Some(Node::sound_effect(id))),
                NodeKind::Group(children) => {
                    steps.push(Step::Group {
                        len: children.len(),
                        is_root,
                    });
                    steps.extend(children.into_iter().rev().map(|c| Step::Visit(c, false)));
                }
                NodeKind::SoundFilter { id, child } => {
                    steps.push(Step::Filter(id));
                    steps.push(Step::Visit(*child, false));
                }
            },
            Step::Group { len, is_root } => {
                let mut kept: Vec<Node> = done
                    .split_off(done.len() - len)
                    .into_iter()
                    .flatten()
                    .collect();
                done.push(match kept.len() {
                    0 => None,
                    1 if !is_root => kept.pop(),
                    _ => Some(Node::group(kept)),
                });
            }
            Step::Filter(id) => match done.pop().flatten() {
                Some(child) => done.push(Some(Node::sound_filter(id, child))),
                None => {
                    tracing::debug!(filter = %id, "dropping filter with empty body");
                    done.push(None);
                }
            },
        }
    }
    done.pop().flatten()
}
