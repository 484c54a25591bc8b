mod node;
mod tree;

pub use node::{BranchNode, LeafNode, Node};
pub use tree::{HoeffdingTreeClassifier, HoeffdingTreeConfig};
