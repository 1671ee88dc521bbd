//------------ Types for Statistics -----------------------------------------

use std::fmt::Display;

use serde_derive::Serialize;

use super::errors::RoaError;

/// Counters for a single run over an export.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LoadStats {
    /// All records found in the export.
    pub records: usize,
    /// Records that were normalized into a ROA.
    pub accepted: usize,
    /// Records that were skipped because of the address family selector.
    pub skipped_afi: usize,
    pub malformed_prefix: usize,
    pub malformed_asn: usize,
    pub malformed_max_len: usize,
}

impl LoadStats {
    pub fn rejected(&self) -> usize {
        self.malformed_prefix + self.malformed_asn + self.malformed_max_len
    }

    pub(crate) fn inc_rejected(&mut self, err: &RoaError) {
        match err {
            RoaError::MalformedPrefix(_) => self.malformed_prefix += 1,
            RoaError::MalformedAsn(_) => self.malformed_asn += 1,
            RoaError::MalformedMaxLength(_) => self.malformed_max_len += 1,
        }
    }
}

impl Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "records: {}, accepted: {}, skipped (afi): {}, rejected: {} \
            (prefix: {}, asn: {}, max length: {})",
            self.records,
            self.accepted,
            self.skipped_afi,
            self.rejected(),
            self.malformed_prefix,
            self.malformed_asn,
            self.malformed_max_len
        )
    }
}

//------------ TreeStats -----------------------------------------------------

/// Sizes of the prefix tree for one address family.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    pub nodes: usize,
    pub prefixes: usize,
}

impl Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nodes: {}, prefixes: {}", self.nodes, self.prefixes)
    }
}
