use std::net::IpAddr;

use inetnum::addr::Prefix;
use log::debug;

use super::af_tree::PrefixTree;
use crate::types::errors::TreeError;
use crate::types::stats::TreeStats;
use crate::types::PrefixId;
use crate::{AddressFamily, IPv4, IPv6};

//------------ FamilyPrefix --------------------------------------------------

// A prefix converted for the tree of its address family.
enum FamilyPrefix {
    V4(PrefixId<IPv4>),
    V6(PrefixId<IPv6>),
}

impl From<&Prefix> for FamilyPrefix {
    fn from(prefix: &Prefix) -> Self {
        match prefix.addr() {
            IpAddr::V4(addr) => {
                Self::V4(PrefixId::new(IPv4::from_ipaddr(addr), prefix.len()))
            }
            IpAddr::V6(addr) => {
                Self::V6(PrefixId::new(IPv6::from_ipaddr(addr), prefix.len()))
            }
        }
    }
}

//------------ PrefixTrie ----------------------------------------------------

/// A prefix tree for both IPv4 and IPv6, with one [PrefixTree] per family.
#[derive(Debug, Clone, Default)]
pub struct PrefixTrie {
    v4: PrefixTree<IPv4>,
    v6: PrefixTree<IPv6>,
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a trie from a list of prefixes. Duplicates are inserted once.
    pub fn from_prefixes<'a>(
        prefixes: impl IntoIterator<Item = &'a Prefix>,
    ) -> Result<Self, TreeError> {
        let mut trie = Self::new();
        for pfx in prefixes {
            trie.insert(pfx)?;
        }
        debug!("ipv4 tree {}", trie.v4.stats());
        debug!("ipv6 tree {}", trie.v6.stats());
        Ok(trie)
    }

    pub fn insert(&mut self, prefix: &Prefix) -> Result<bool, TreeError> {
        match FamilyPrefix::from(prefix) {
            FamilyPrefix::V4(id) => self.v4.insert(id),
            FamilyPrefix::V6(id) => self.v6.insert(id),
        }
    }

    pub fn contains(&self, prefix: &Prefix) -> bool {
        match FamilyPrefix::from(prefix) {
            FamilyPrefix::V4(id) => self.v4.contains(&id),
            FamilyPrefix::V6(id) => self.v6.contains(&id),
        }
    }

    /// Returns the least specific inserted prefix covering `prefix`.
    pub fn search_worst(&self, prefix: &Prefix) -> Option<Prefix> {
        match FamilyPrefix::from(prefix) {
            FamilyPrefix::V4(id) => self.v4.search_worst(&id).map(Into::into),
            FamilyPrefix::V6(id) => self.v6.search_worst(&id).map(Into::into),
        }
    }

    /// Returns the most specific inserted prefix covering `prefix`.
    pub fn search_best(&self, prefix: &Prefix) -> Option<Prefix> {
        match FamilyPrefix::from(prefix) {
            FamilyPrefix::V4(id) => self.v4.search_best(&id).map(Into::into),
            FamilyPrefix::V6(id) => self.v6.search_best(&id).map(Into::into),
        }
    }

    /// Returns all inserted prefixes strictly covering `prefix`, least
    /// specific first.
    pub fn less_specifics(&self, prefix: &Prefix) -> Vec<Prefix> {
        match FamilyPrefix::from(prefix) {
            FamilyPrefix::V4(id) => self
                .v4
                .less_specifics(&id)
                .into_iter()
                .map(Into::into)
                .collect(),
            FamilyPrefix::V6(id) => self
                .v6
                .less_specifics(&id)
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// All inserted prefixes, IPv4 before IPv6, each in tree order.
    pub fn prefixes_iter(&self) -> impl Iterator<Item = Prefix> + '_ {
        self.v4
            .prefixes_iter()
            .map(Prefix::from)
            .chain(self.v6.prefixes_iter().map(Prefix::from))
    }

    /// The inserted prefixes not covered by another inserted prefix, IPv4
    /// before IPv6, each in tree order.
    pub fn aggregate(&self) -> Vec<Prefix> {
        self.v4
            .aggregate()
            .into_iter()
            .map(Prefix::from)
            .chain(self.v6.aggregate().into_iter().map(Prefix::from))
            .collect()
    }

    pub fn prefixes_len(&self) -> usize {
        self.v4.prefixes_len() + self.v6.prefixes_len()
    }

    pub fn prefixes_v4_len(&self) -> usize {
        self.v4.prefixes_len()
    }

    pub fn prefixes_v6_len(&self) -> usize {
        self.v6.prefixes_len()
    }

    pub fn nodes_len(&self) -> usize {
        self.v4.nodes_len() + self.v6.nodes_len()
    }

    pub fn stats(&self) -> (TreeStats, TreeStats) {
        (self.v4.stats(), self.v6.stats())
    }

    pub fn v4(&self) -> &PrefixTree<IPv4> {
        &self.v4
    }

    pub fn v6(&self) -> &PrefixTree<IPv6> {
        &self.v6
    }
}
