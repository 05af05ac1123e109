use crate::markup::lexer::RawToken;
use crate::tree::node::Node;

/// An open group: the root, or the body of a filter whose id is `filter`.
struct Frame {
    filter: Option<String>,
    children: Vec<Node>,
}

/// Deepest filter nesting kept by [`parse`]. Filter markers below this depth are ignored together
/// with their close markers, so their content joins the innermost kept scope.
pub const MAX_FILTER_DEPTH: usize = 256;

/// Build the raw composition tree for a token stream. The result is always a root group.
///
/// Filter scopes nest through an explicit stack, so nesting depth never grows the call stack.
/// Nesting is capped at [`MAX_FILTER_DEPTH`].
/// A close marker with no open filter closes the root itself; every token after that is
/// ignored. Scopes still open at the end of input keep the children they received.
pub fn parse(tokens: impl IntoIterator<Item = RawToken>) -> Node {
    let mut stack = vec![Frame {
        filter: None,
        children: Vec::new(),
    }];
    let mut root_children = None;
    let mut ignored = 0usize;
    // Open markers past MAX_FILTER_DEPTH still waiting for their close marker.
    let mut flattened = 0usize;
    let mut flattened_total = 0usize;

    for tok in tokens {
        if stack.is_empty() {
            ignored += 1;
            continue;
        }
        match tok {
            RawToken::CloseFilter if flattened > 0 => flattened -= 1,
            RawToken::CloseFilter => {
                if let Some(frame) = stack.pop() {
                    close_frame(&mut stack, frame, &mut root_children);
                }
            }
            RawToken::OpenFilter(_) if stack.len() > MAX_FILTER_DEPTH => {
                flattened += 1;
                flattened_total += 1;
            }
            RawToken::OpenFilter(id) => stack.push(Frame {
                filter: Some(id),
                children: Vec::new(),
            }),
            RawToken::Speech { speaker, text } => push_child(&mut stack, Node::speech(speaker, text)),
            RawToken::SoundEffect(id) => push_child(&mut stack, Node::sound_effect(id)),
        }
    }

    if flattened_total > 0 {
        tracing::warn!(
            flattened = flattened_total,
            max_depth = MAX_FILTER_DEPTH,
            "filters nested too deeply were ignored"
        );
    }
    if ignored > 0 {
        tracing::debug!(ignored, "tokens after an unmatched close marker were ignored");
    }

    while let Some(frame) = stack.pop() {
        close_frame(&mut stack, frame, &mut root_children);
    }
    Node::group(root_children.unwrap_or_default())
}

fn push_child(stack: &mut [Frame], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn close_frame(stack: &mut [Frame], frame: Frame, root_children: &mut Option<Vec<Node>>) {
    match frame.filter {
        Some(id) => push_child(stack, Node::sound_filter(id, Node::group(frame.children))),
        None => *root_children = Some(frame.children),
    }
}
