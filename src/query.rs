//! The read-only data model handed to a renderer.
//!
//! [load_roas] runs the complete pipeline over one export: normalizing the
//! records, deduplicating and indexing the resulting ROAs, and aggregating
//! their prefixes. The result, a [RoaData], is not changed afterwards.

use std::collections::BTreeMap;

use inetnum::addr::Prefix;
use log::info;
use serde_derive::Serialize;

use crate::config::{Afi, Config};
use crate::index::{OriginEntry, PrefixEntry, RoaIndex, RoaRecord};
use crate::normalize::normalize_all;
use crate::prefix_tree::PrefixTrie;
use crate::types::errors::LoadError;
use crate::types::roa::ExportFile;
use crate::types::stats::LoadStats;

//------------ load_roas -----------------------------------------------------

/// Builds the data model for an export.
///
/// Malformed records are logged and skipped, they never fail the run.
pub fn load_roas(
    export: &ExportFile,
    config: &Config,
) -> Result<RoaData, LoadError> {
    let mut stats = LoadStats::default();
    let roas = normalize_all(&export.roas, config.afi(), &mut stats);
    let index = RoaIndex::from_roas(&roas);
    let data = RoaData::new(&index, config, stats)?;
    info!("{}", data.stats());
    Ok(data)
}

/// Reads an export from a reader and builds the data model for it.
///
/// A document that is not valid JSON, or that has no `roas` list, fails the
/// whole run.
pub fn load_roas_from_reader(
    reader: impl std::io::Read,
    config: &Config,
) -> Result<RoaData, LoadError> {
    let export = ExportFile::from_reader(reader)?;
    load_roas(&export, config)
}

//------------ RoaData -------------------------------------------------------

/// The normalized, deduplicated and aggregated ROAs of one run.
///
/// Serializes into an object with the members `afi`, `pfx_dict`,
/// `origin_dict`, `pfx_list`, `aggregated_pfx_list` and `roa_list`.
#[derive(Clone, Debug, Serialize)]
pub struct RoaData {
    afi: Afi,
    pfx_dict: BTreeMap<String, PrefixEntry>,
    origin_dict: BTreeMap<u32, BTreeMap<String, OriginEntry>>,
    pfx_list: Vec<String>,
    aggregated_pfx_list: Vec<String>,
    roa_list: Vec<RoaRecord>,

    #[serde(skip)]
    trie: PrefixTrie,
    #[serde(skip)]
    stats: LoadStats,
}

impl RoaData {
    fn new(
        index: &RoaIndex,
        config: &Config,
        stats: LoadStats,
    ) -> Result<Self, LoadError> {
        let pfx_list = index.prefix_list();
        let trie = PrefixTrie::from_prefixes(&pfx_list)?;
        let aggregated_pfx_list =
            trie.aggregate().iter().map(Prefix::to_string).collect();

        Ok(Self {
            afi: config.afi(),
            pfx_dict: index.pfx_dict().clone(),
            origin_dict: index.origin_dict().clone(),
            pfx_list: pfx_list.iter().map(Prefix::to_string).collect(),
            aggregated_pfx_list,
            roa_list: index.roa_list(config.asn_filter()),
            trie,
            stats,
        })
    }

    /// The address family selector the data was built for.
    pub fn afi(&self) -> Afi {
        self.afi
    }

    /// Per prefix, the origins, max length and prefix length.
    pub fn pfx_dict(&self) -> &BTreeMap<String, PrefixEntry> {
        &self.pfx_dict
    }

    /// Per origin, the prefixes it may announce.
    pub fn origin_dict(&self) -> &BTreeMap<u32, BTreeMap<String, OriginEntry>> {
        &self.origin_dict
    }

    /// The distinct prefixes ordered by prefix length.
    pub fn pfx_list(&self) -> &[String] {
        &self.pfx_list
    }

    /// The prefixes not covered by a less specific prefix in the data.
    pub fn aggregated_pfx_list(&self) -> &[String] {
        &self.aggregated_pfx_list
    }

    /// The distinct ROAs, with the AS number filter of the configuration
    /// applied.
    pub fn roa_list(&self) -> &[RoaRecord] {
        &self.roa_list
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// The origins that may announce exactly this prefix.
    pub fn origins(&self, prefix: &str) -> Option<&[u32]> {
        self.pfx_dict.get(prefix).map(|e| e.origins.as_slice())
    }

    /// The prefixes an origin may announce.
    pub fn prefixes_for(
        &self,
        asn: u32,
    ) -> Option<&BTreeMap<String, OriginEntry>> {
        self.origin_dict.get(&asn)
    }

    /// Returns whether `prefix` is in the data and not covered by another
    /// prefix in the data.
    pub fn is_aggregated(&self, prefix: &Prefix) -> bool {
        self.trie.search_worst(prefix) == Some(*prefix)
    }

    /// Returns the most specific prefix in the data covering `prefix`.
    pub fn covering_prefix(&self, prefix: &Prefix) -> Option<Prefix> {
        self.trie.search_best(prefix)
    }
}
