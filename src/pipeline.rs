use std::path::Path;

use crate::markup::lexer::lex;
use crate::markup::parser::parse;
use crate::tree::naming::assign_names;
use crate::tree::node::Node;
use crate::tree::validate::validate_root;

/// Lex, parse and normalize `markup` into a composition tree whose root is always a group.
pub fn compose(markup: &str, default_speaker: &str) -> Node {
    validate_root(parse(lex(markup, default_speaker)))
}

/// [`compose`], then name every node inside `scratch_dir`.
pub fn compose_named(markup: &str, default_speaker: &str, scratch_dir: &Path) -> Node {
    let mut root = compose(markup, default_speaker);
    assign_names(&mut root, 0, scratch_dir);
    root
}
