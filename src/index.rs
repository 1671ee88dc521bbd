//! Deduplication and indexing of canonical ROAs.
//!
//! The index keeps three views on the ROAs inserted into it: per prefix the
//! origins that may announce it, per origin the prefixes it may announce,
//! and the set of distinct ROAs itself.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use inetnum::addr::Prefix;
use log::trace;
use serde_derive::Serialize;

use crate::types::roa::Roa;

//------------ PrefixEntry ---------------------------------------------------

/// What is known about a single prefix.
///
/// Only the max length of the last ROA seen for the prefix is kept. If
/// ROAs for the same prefix carry different max lengths, the earlier ones
/// are lost here. They do survive in the flat ROA list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrefixEntry {
    /// The distinct origins for the prefix, in the order first seen.
    pub origins: Vec<u32>,
    pub maxlength: u32,
    pub prefixlen: u8,
}

//------------ OriginEntry ---------------------------------------------------

/// The max length and prefix length for a prefix of an origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OriginEntry {
    pub maxlength: u32,
    pub length: u8,
}

//------------ RoaRecord -----------------------------------------------------

/// A flat, render-ready ROA.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RoaRecord {
    pub prefix: String,
    pub prefixlen: u8,
    pub maxlength: u32,
    pub origin: u32,
}

impl From<&Roa> for RoaRecord {
    fn from(roa: &Roa) -> Self {
        Self {
            prefix: roa.prefix().to_string(),
            prefixlen: roa.prefix_len(),
            maxlength: roa.max_len(),
            origin: roa.origin(),
        }
    }
}

//------------ RoaIndex ------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct RoaIndex {
    pfx_dict: BTreeMap<String, PrefixEntry>,
    origin_dict: BTreeMap<u32, BTreeMap<String, OriginEntry>>,
    // distinct prefixes in the order first seen
    prefixes: Vec<Prefix>,
    prefixes_seen: HashSet<Prefix>,
    // distinct ROAs in the order first seen
    roas: Vec<Roa>,
    roas_seen: HashSet<Roa>,
}

impl RoaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roas<'a>(roas: impl IntoIterator<Item = &'a Roa>) -> Self {
        let mut index = Self::new();
        for roa in roas {
            index.insert(roa);
        }
        index
    }

    /// Adds a ROA to all views of the index.
    pub fn insert(&mut self, roa: &Roa) {
        let key = roa.prefix().to_string();
        let origin = roa.origin();

        match self.pfx_dict.get_mut(&key) {
            Some(entry) => {
                if !entry.origins.contains(&origin) {
                    entry.origins.push(origin);
                }
                if entry.maxlength != roa.max_len() {
                    trace!(
                        "max length for {} changes from {} to {}",
                        key,
                        entry.maxlength,
                        roa.max_len()
                    );
                }
                entry.maxlength = roa.max_len();
                entry.prefixlen = roa.prefix_len();
            }
            None => {
                self.pfx_dict.insert(
                    key.clone(),
                    PrefixEntry {
                        origins: vec![origin],
                        maxlength: roa.max_len(),
                        prefixlen: roa.prefix_len(),
                    },
                );
            }
        }

        self.origin_dict.entry(origin).or_default().insert(
            key,
            OriginEntry {
                maxlength: roa.max_len(),
                length: roa.prefix_len(),
            },
        );

        if self.prefixes_seen.insert(roa.prefix()) {
            self.prefixes.push(roa.prefix());
        }
        if self.roas_seen.insert(*roa) {
            self.roas.push(*roa);
        }
    }

    pub fn pfx_dict(&self) -> &BTreeMap<String, PrefixEntry> {
        &self.pfx_dict
    }

    pub fn origin_dict(&self) -> &BTreeMap<u32, BTreeMap<String, OriginEntry>> {
        &self.origin_dict
    }

    /// The distinct prefixes, ordered by prefix length. Prefixes of the same
    /// length stay in the order they were first seen.
    pub fn prefix_list(&self) -> Vec<Prefix> {
        let mut res = self.prefixes.clone();
        res.sort_by_key(|pfx| pfx.len());
        res
    }

    /// The distinct ROAs, in the order first seen.
    pub fn roas(&self) -> &[Roa] {
        &self.roas
    }

    /// The distinct ROAs as flat records, restricted to the origins in
    /// `asn_filter` if given.
    pub fn roa_list(&self, asn_filter: Option<&BTreeSet<u32>>) -> Vec<RoaRecord> {
        self.roas
            .iter()
            .filter(|roa| asn_filter.map_or(true, |f| f.contains(&roa.origin())))
            .map(RoaRecord::from)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Afi;
    use crate::normalize::normalize;
    use crate::types::roa::RawRoa;

    fn roa(prefix: &str, max_len: u32, asn: u32) -> Roa {
        normalize(&RawRoa::new(prefix, max_len, asn), Afi::Mixed)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn origins_first_seen() {
        let index = RoaIndex::from_roas(&[
            roa("10.0.0.0/8", 8, 300),
            roa("10.0.0.0/8", 8, 100),
            roa("10.0.0.0/8", 8, 300),
            roa("10.0.0.0/8", 8, 200),
        ]);
        let entry = &index.pfx_dict()["10.0.0.0/8"];
        assert_eq!(entry.origins, vec![300, 100, 200]);
        assert_eq!(entry.prefixlen, 8);
    }

    #[test]
    fn last_max_len_wins() {
        let index = RoaIndex::from_roas(&[
            roa("10.0.0.0/8", 16, 100),
            roa("10.0.0.0/8", 24, 100),
            roa("10.0.0.0/8", 12, 200),
        ]);
        assert_eq!(index.pfx_dict()["10.0.0.0/8"].maxlength, 12);
        assert_eq!(
            index.origin_dict()[&100_u32]["10.0.0.0/8"],
            OriginEntry {
                maxlength: 24,
                length: 8
            }
        );
        // nothing is lost in the flat list
        assert_eq!(index.roa_list(None).len(), 3);
    }

    #[test]
    fn origin_index() {
        let index = RoaIndex::from_roas(&[roa("203.97.2.0/24", 24, 64500)]);
        assert_eq!(
            index.origin_dict()[&64500_u32]["203.97.2.0/24"],
            OriginEntry {
                maxlength: 24,
                length: 24
            }
        );
    }

    #[test]
    fn prefix_list_order() {
        let index = RoaIndex::from_roas(&[
            roa("192.168.0.0/16", 24, 1),
            roa("10.0.0.0/8", 8, 1),
            roa("172.16.0.0/12", 12, 1),
            roa("10.0.0.0/8", 8, 2),
            roa("11.0.0.0/8", 8, 1),
            roa("2001:db8::/32", 48, 1),
        ]);
        let list: Vec<_> =
            index.prefix_list().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            list,
            vec![
                "10.0.0.0/8",
                "11.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "2001:db8::/32",
            ]
        );
    }

    #[test]
    fn dedup_and_filter() {
        let index = RoaIndex::from_roas(&[
            roa("10.0.0.0/8", 8, 100),
            roa("10.0.0.0/8", 8, 100),
            roa("11.0.0.0/8", 8, 200),
            roa("12.0.0.0/8", 8, 300),
            roa("13.0.0.0/8", 8, 200),
        ]);
        assert_eq!(index.roas().len(), 4);

        let filter = BTreeSet::from([200]);
        let list = index.roa_list(Some(&filter));
        assert_eq!(
            list.iter().map(|r| r.prefix.as_str()).collect::<Vec<_>>(),
            vec!["11.0.0.0/8", "13.0.0.0/8"]
        );
        assert!(list.iter().all(|r| r.origin == 200));

        assert!(index.roa_list(Some(&BTreeSet::new())).is_empty());
    }
}
