use log::{debug, trace};

use super::iterators::{LessSpecificsIter, PrefixesIter};
use super::node::{NodeId, TreeNode};
use crate::types::errors::TreeError;
use crate::types::stats::TreeStats;
use crate::types::PrefixId;
use crate::AddressFamily;

//------------ PrefixTree ----------------------------------------------------

/// A binary prefix tree for a single address family.
///
/// The nodes live in a single vec and refer to their children by index.
/// Nodes are only ever added, never removed, so a tree is built once and
/// queried afterwards.
#[derive(Debug, Clone)]
pub struct PrefixTree<AF: AddressFamily> {
    nodes: Vec<TreeNode<AF>>,
    prefixes_len: usize,
}

impl<AF: AddressFamily> PrefixTree<AF> {
    pub fn new() -> Self {
        Self {
            nodes: vec![TreeNode::new(PrefixId::new(AF::zero(), 0))],
            prefixes_len: 0,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&TreeNode<AF>> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode<AF>, TreeError> {
        self.nodes.get_mut(id.index()).ok_or(TreeError::NodeNotFound)
    }

    /// Inserts a prefix into the tree.
    ///
    /// Returns whether the prefix was newly inserted, inserting a prefix
    /// that is already present is not an error.
    pub fn insert(&mut self, prefix: PrefixId<AF>) -> Result<bool, TreeError> {
        if prefix.get_len() > AF::BITS {
            return Err(TreeError::PrefixLengthInvalid);
        }
        let mut cur = NodeId::ROOT;
        for depth in 0..prefix.get_len() {
            let bit = prefix.get_net().bit_at(depth);
            let child = self.node_mut(cur)?.child(bit);
            cur = match child {
                Some(next) => next,
                None => {
                    let next = NodeId::new(self.nodes.len())?;
                    self.nodes
                        .push(TreeNode::new(prefix.truncate_to_len(depth + 1)));
                    self.node_mut(cur)?.set_child(bit, next);
                    next
                }
            };
        }
        let new = self.node_mut(cur)?.set_present();
        if new {
            self.prefixes_len += 1;
        }
        trace!("insert {} new {}", prefix, new);
        Ok(new)
    }

    /// Returns whether exactly this prefix was inserted.
    pub fn contains(&self, prefix: &PrefixId<AF>) -> bool {
        self.less_specifics_iter_from(prefix)
            .last()
            .is_some_and(|p| p == *prefix)
    }

    /// Returns the least specific inserted prefix covering `prefix`,
    /// including `prefix` itself.
    pub fn search_worst(&self, prefix: &PrefixId<AF>) -> Option<PrefixId<AF>> {
        self.less_specifics_iter_from(prefix).next()
    }

    /// Returns the most specific inserted prefix covering `prefix`,
    /// including `prefix` itself, i.e. the longest prefix match.
    pub fn search_best(&self, prefix: &PrefixId<AF>) -> Option<PrefixId<AF>> {
        self.less_specifics_iter_from(prefix).last()
    }

    /// Returns all inserted prefixes strictly covering `prefix`, least
    /// specific first.
    pub fn less_specifics(&self, prefix: &PrefixId<AF>) -> Vec<PrefixId<AF>> {
        self.less_specifics_iter_from(prefix)
            .filter(|p| p != prefix)
            .collect()
    }

    /// Iterates over all inserted prefixes covering `prefix`, least
    /// specific first, ending with `prefix` itself if it was inserted.
    pub fn less_specifics_iter_from(
        &self,
        prefix: &PrefixId<AF>,
    ) -> LessSpecificsIter<'_, AF> {
        LessSpecificsIter::new(self, *prefix)
    }

    /// Iterates over all inserted prefixes in tree order: ordered by
    /// address, with a covering prefix before the prefixes it covers.
    pub fn prefixes_iter(&self) -> PrefixesIter<'_, AF> {
        PrefixesIter::new(self, false)
    }

    /// Returns the inserted prefixes that are not covered by another
    /// inserted prefix, in tree order.
    ///
    /// A prefix is in the result iff [search_worst](Self::search_worst)
    /// for it returns the prefix itself. The walk does not descend below a
    /// present node, so every covered prefix is skipped in one go.
    pub fn aggregate(&self) -> Vec<PrefixId<AF>> {
        let res: Vec<_> = PrefixesIter::new(self, true).collect();
        debug!(
            "aggregated {} prefixes into {} for {} bits",
            self.prefixes_len,
            res.len(),
            AF::BITS
        );
        res
    }

    pub fn prefixes_len(&self) -> usize {
        self.prefixes_len
    }

    pub fn nodes_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes_len == 0
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes: self.nodes_len(),
            prefixes: self.prefixes_len(),
        }
    }
}

impl<AF: AddressFamily> Default for PrefixTree<AF> {
    fn default() -> Self {
        Self::new()
    }
}

impl<AF: AddressFamily> std::fmt::Display for PrefixTree<AF> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(f, "{:>6} {}", i, node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IPv4, IPv6};
    use std::net::Ipv4Addr;

    fn v4(a: u8, b: u8, c: u8, len: u8) -> PrefixId<IPv4> {
        PrefixId::new(IPv4::from_ipaddr(Ipv4Addr::new(a, b, c, 0)), len)
    }

    fn tree(pfxs: &[PrefixId<IPv4>]) -> PrefixTree<IPv4> {
        let mut tree = PrefixTree::new();
        for p in pfxs {
            tree.insert(*p).unwrap();
        }
        tree
    }

    #[test]
    fn insert_counts() {
        let mut tree = PrefixTree::<IPv4>::new();
        assert!(tree.is_empty());
        assert!(tree.insert(v4(10, 0, 0, 8)).unwrap());
        assert!(!tree.insert(v4(10, 0, 0, 8)).unwrap());
        assert!(tree.insert(v4(10, 0, 0, 16)).unwrap());
        assert_eq!(tree.prefixes_len(), 2);
        // root, 8 nodes down to /8, 8 more down to /16
        assert_eq!(tree.nodes_len(), 17);
    }

    #[test]
    fn invalid_len() {
        let mut tree = PrefixTree::<IPv4>::new();
        assert_eq!(
            tree.insert(PrefixId::new(IPv4::zero(), 33)),
            Err(TreeError::PrefixLengthInvalid)
        );
    }

    #[test]
    fn searches() {
        let tree = tree(&[v4(57, 84, 0, 14), v4(57, 86, 0, 15), v4(57, 86, 0, 16)]);

        let q = v4(57, 86, 0, 17);
        assert_eq!(tree.search_worst(&q), Some(v4(57, 84, 0, 14)));
        assert_eq!(tree.search_best(&q), Some(v4(57, 86, 0, 16)));
        assert!(!tree.contains(&q));
        assert_eq!(
            tree.less_specifics(&v4(57, 86, 0, 16)),
            vec![v4(57, 84, 0, 14), v4(57, 86, 0, 15)]
        );
        assert!(tree.less_specifics(&v4(57, 84, 0, 14)).is_empty());
        assert!(tree.contains(&v4(57, 86, 0, 15)));
        assert_eq!(tree.search_worst(&v4(10, 0, 0, 8)), None);
        // a node on the path is not an inserted prefix
        assert!(!tree.contains(&v4(57, 0, 0, 8)));
    }

    #[test]
    fn aggregate_covered() {
        let tree = tree(&[v4(10, 0, 0, 16), v4(10, 0, 0, 8)]);
        assert_eq!(tree.aggregate(), vec![v4(10, 0, 0, 8)]);
    }

    #[test]
    fn aggregate_disjoint() {
        let tree = tree(&[v4(192, 168, 0, 16), v4(10, 0, 0, 8)]);
        assert_eq!(tree.aggregate(), vec![v4(10, 0, 0, 8), v4(192, 168, 0, 16)]);
    }

    #[test]
    fn aggregate_default_route() {
        let tree = tree(&[v4(192, 168, 0, 16), v4(0, 0, 0, 0), v4(10, 0, 0, 8)]);
        assert_eq!(tree.aggregate(), vec![v4(0, 0, 0, 0)]);
    }

    #[test]
    fn aggregate_matches_search_worst() {
        let pfxs = [
            v4(203, 97, 0, 17),
            v4(203, 97, 2, 24),
            v4(203, 97, 128, 24),
            v4(203, 96, 0, 16),
            v4(203, 97, 0, 16),
            v4(10, 0, 0, 8),
            v4(10, 128, 0, 9),
            v4(11, 0, 0, 8),
        ];
        let tree = tree(&pfxs);
        let expected: Vec<_> = tree
            .prefixes_iter()
            .filter(|p| tree.search_worst(p) == Some(*p))
            .collect();
        assert_eq!(tree.aggregate(), expected);
        assert_eq!(
            expected,
            vec![
                v4(10, 0, 0, 8),
                v4(11, 0, 0, 8),
                v4(203, 96, 0, 16),
                v4(203, 97, 0, 16),
            ]
        );
    }

    #[test]
    fn prefixes_in_tree_order() {
        let tree = tree(&[v4(11, 0, 0, 8), v4(10, 0, 0, 16), v4(10, 0, 0, 8)]);
        assert_eq!(
            tree.prefixes_iter().collect::<Vec<_>>(),
            vec![v4(10, 0, 0, 8), v4(10, 0, 0, 16), v4(11, 0, 0, 8)]
        );
    }

    #[test]
    fn ipv6_full_length() {
        let mut tree = PrefixTree::<IPv6>::new();
        let host = PrefixId::new(
            IPv6::from_ipaddr("2001:db8::1".parse().unwrap()),
            128,
        );
        let net = PrefixId::new(
            IPv6::from_ipaddr("2001:db8::".parse().unwrap()),
            32,
        );
        tree.insert(host).unwrap();
        assert_eq!(tree.aggregate(), vec![host]);
        tree.insert(net).unwrap();
        assert_eq!(tree.aggregate(), vec![net]);
        assert_eq!(tree.search_best(&host), Some(host));
        assert_eq!(tree.search_worst(&host), Some(net));
    }
}
