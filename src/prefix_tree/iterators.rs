use super::af_tree::PrefixTree;
use super::node::NodeId;
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ LessSpecificsIter ---------------------------------------------

/// Walks down the tree along the bits of a search prefix, returning every
/// present node on the way. The search prefix itself is returned last, if
/// it is present.
pub struct LessSpecificsIter<'a, AF: AddressFamily> {
    tree: &'a PrefixTree<AF>,
    search_pfx: PrefixId<AF>,
    cur: Option<NodeId>,
    depth: u8,
}

impl<'a, AF: AddressFamily> LessSpecificsIter<'a, AF> {
    pub(crate) fn new(tree: &'a PrefixTree<AF>, search_pfx: PrefixId<AF>) -> Self {
        Self {
            tree,
            search_pfx,
            cur: Some(NodeId::ROOT),
            depth: 0,
        }
    }
}

impl<AF: AddressFamily> Iterator for LessSpecificsIter<'_, AF> {
    type Item = PrefixId<AF>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.tree.node(self.cur?)?;
            self.cur = if self.depth < self.search_pfx.get_len() {
                node.child(self.search_pfx.get_net().bit_at(self.depth))
            } else {
                None
            };
            self.depth += 1;
            if node.is_present() {
                return Some(node.prefix());
            }
        }
    }
}

//------------ PrefixesIter --------------------------------------------------

/// Depth-first walk over the present nodes of a tree, zero branch first.
///
/// With `skip_covered` set, the walk does not descend below a present node,
/// so only prefixes without a present less-specific are returned.
pub struct PrefixesIter<'a, AF: AddressFamily> {
    tree: &'a PrefixTree<AF>,
    stack: Vec<NodeId>,
    skip_covered: bool,
}

impl<'a, AF: AddressFamily> PrefixesIter<'a, AF> {
    pub(crate) fn new(tree: &'a PrefixTree<AF>, skip_covered: bool) -> Self {
        Self {
            tree,
            stack: vec![NodeId::ROOT],
            skip_covered,
        }
    }
}

impl<AF: AddressFamily> Iterator for PrefixesIter<'_, AF> {
    type Item = PrefixId<AF>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            if !(self.skip_covered && node.is_present()) {
                // one branch is pushed last, so it's visited first
                self.stack.extend(node.child(true));
                self.stack.extend(node.child(false));
            }
            if node.is_present() {
                return Some(node.prefix());
            }
        }
        None
    }
}
