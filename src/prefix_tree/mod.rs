//! A binary prefix tree for computing covering prefixes.
//!
//! Each address family has its own tree, a [PrefixTree], with one node per
//! bit of a prefix. [PrefixTrie] combines the trees for IPv4 and IPv6 behind
//! an interface that takes [inetnum::addr::Prefix]es.
mod af_tree;
mod iterators;
mod node;
mod trie;

pub use af_tree::PrefixTree;
pub use iterators::{LessSpecificsIter, PrefixesIter};
pub use node::{NodeId, TreeNode};
pub use trie::PrefixTrie;
