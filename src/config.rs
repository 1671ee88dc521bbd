//! Configuration options for a single run over an RPKI export.
//!
//! A configuration is created with the address family selector, optionally
//! extended with an AS number filter, and passed in as an argument to
//! [load_roas](crate::query::load_roas).
//!
//! ```
//! use rtrsub::config::{parse_asn_filter, Afi, Config};
//!
//! let afi: Afi = "ipv4".parse().unwrap();
//! let config = Config::new(afi)
//!     .with_asn_filter(parse_asn_filter("64500,64501").unwrap());
//! assert!(config.asn_filter().unwrap().contains(&64501));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::types::errors::LoadError;

//------------ Afi -----------------------------------------------------------

/// Selects the address families of the prefixes that are processed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Afi {
    /// Only IPv4 prefixes, IPv6 prefixes are skipped.
    Ipv4,
    /// Only IPv6 prefixes, IPv4 prefixes are skipped.
    Ipv6,
    /// Both IPv4 and IPv6 prefixes.
    Mixed,
}

impl Afi {
    pub fn as_str(&self) -> &'static str {
        match self {
            Afi::Ipv4 => "ipv4",
            Afi::Ipv6 => "ipv6",
            Afi::Mixed => "mixed",
        }
    }

    /// Returns whether a prefix of the given family passes this selector.
    pub fn includes(&self, is_v4: bool) -> bool {
        match self {
            Afi::Ipv4 => is_v4,
            Afi::Ipv6 => !is_v4,
            Afi::Mixed => true,
        }
    }
}

impl FromStr for Afi {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(Afi::Ipv4),
            "ipv6" => Ok(Afi::Ipv6),
            "mixed" => Ok(Afi::Mixed),
            _ => Err(LoadError::InvalidAfi(s.to_string())),
        }
    }
}

impl fmt::Display for Afi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Afi {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

//------------ AS number filter ----------------------------------------------

/// Parses a comma-separated list of AS numbers.
///
/// Surrounding whitespace and empty items are ignored. Items may carry an
/// `AS` prefix.
pub fn parse_asn_filter(s: &str) -> Result<BTreeSet<u32>, LoadError> {
    let mut res = BTreeSet::new();
    for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        let digits = item.strip_prefix("AS").unwrap_or(item);
        let asn = digits
            .parse::<u32>()
            .map_err(|_| LoadError::InvalidAsnFilter(item.to_string()))?;
        res.insert(asn);
    }
    Ok(res)
}

//------------ Config --------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    afi: Afi,
    asn_filter: Option<BTreeSet<u32>>,
}

impl Config {
    pub fn new(afi: Afi) -> Self {
        Self {
            afi,
            asn_filter: None,
        }
    }

    /// Restricts the flat ROA list to the given origin AS numbers.
    pub fn with_asn_filter(mut self, asns: BTreeSet<u32>) -> Self {
        self.asn_filter = Some(asns);
        self
    }

    pub fn afi(&self) -> Afi {
        self.afi
    }

    pub fn asn_filter(&self) -> Option<&BTreeSet<u32>> {
        self.asn_filter.as_ref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Afi::Mixed)
    }
}
