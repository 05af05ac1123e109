use std::path::{Path, PathBuf};

use crate::tree::node::{Node, NodeKind};

/// Extension of every scratch artifact.
pub const SCRATCH_EXT: &str = "wav";

/// Scratch path for the node numbered `id` inside `dir`.
pub fn scratch_path(dir: &Path, id: usize) -> PathBuf {
    dir.join(format!("{id:03}.{SCRATCH_EXT}"))
}

/// Assign scratch paths to `node` and its descendants in pre-order, starting at `next_id`.
///
/// Returns the first unused id.
pub fn assign_names(node: &mut Node, mut next_id: usize, dir: &Path) -> usize {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        node.assign_outfile(scratch_path(dir, next_id));
        next_id += 1;
        match &mut node.kind {
            NodeKind::Group(children) => stack.extend(children.iter_mut().rev()),
            NodeKind::SoundFilter { child, .. } => stack.push(&mut **child),
            NodeKind::Speech { .. } | NodeKind::SoundEffect { .. } => {}
        }
    }
    next_id
}
