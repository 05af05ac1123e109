pub mod naming;
pub mod node;
pub mod validate;
