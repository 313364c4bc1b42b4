mod atom;
mod header;
mod tree;

pub use header::AtomHeader;
pub use tree::{BoxNode, BoxTree, Siblings};

pub(crate) use atom::Atom;
pub(crate) use tree::TreeParser;
