use crate::types::errors::TreeError;
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ NodeId --------------------------------------------------------

/// The index of a node in the node vec of a tree.
///
/// A tree never removes nodes, so an id stays valid for the lifetime of the
/// tree it was handed out by.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Copy, Clone, Default)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, for the zero-length prefix, is always the first node.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the id for the node at `index`, if the index fits.
    pub(crate) fn new(index: usize) -> Result<Self, TreeError> {
        u32::try_from(index)
            .map(NodeId)
            .map_err(|_| TreeError::TreeFull)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

//------------ TreeNode ------------------------------------------------------

/// A single node of the binary prefix tree.
///
/// A node exists for every prefix on the path to an inserted prefix. Only
/// the nodes for inserted prefixes are marked as present.
#[derive(Debug, Clone)]
pub struct TreeNode<AF: AddressFamily> {
    prefix: PrefixId<AF>,
    present: bool,
    children: [Option<NodeId>; 2],
}

impl<AF: AddressFamily> TreeNode<AF> {
    pub(crate) fn new(prefix: PrefixId<AF>) -> Self {
        Self {
            prefix,
            present: false,
            children: [None, None],
        }
    }

    pub fn prefix(&self) -> PrefixId<AF> {
        self.prefix
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Marks the node as present. Returns whether it was absent before.
    pub(crate) fn set_present(&mut self) -> bool {
        !std::mem::replace(&mut self.present, true)
    }

    /// The child for the next bit being `bit`.
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        if bit {
            self.children[1]
        } else {
            self.children[0]
        }
    }

    pub(crate) fn set_child(&mut self, bit: bool, id: NodeId) {
        if bit {
            self.children[1] = Some(id);
        } else {
            self.children[0] = Some(id);
        }
    }
}

impl<AF: AddressFamily> std::fmt::Display for TreeNode<AF> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} [{:?} {:?}]",
            self.prefix,
            if self.present { " *" } else { "" },
            self.children[0],
            self.children[1]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_bounds() {
        assert_eq!(NodeId::new(0), Ok(NodeId::ROOT));
        assert_eq!(NodeId::new(17).map(NodeId::index), Ok(17));
        assert_eq!(
            NodeId::new(u32::MAX as usize).map(NodeId::index),
            Ok(u32::MAX as usize)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn node_id_never_wraps() {
        // one past the last index would otherwise wrap around to the root
        assert_eq!(
            NodeId::new(u32::MAX as usize + 1),
            Err(TreeError::TreeFull)
        );
        assert_eq!(NodeId::new(usize::MAX), Err(TreeError::TreeFull));
    }
}
