#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! A library that turns the validated Route Origin Authorizations (ROAs) of
//! an RPKI relying party cache into data for rendering router
//! configurations, filters and reports.
//!
//! The input is the JSON export of a cache: a list of records, each with a
//! prefix, a max length and an origin AS number. The records are turned into
//! canonical ROAs, indexed by prefix and by origin, and the prefixes are
//! aggregated into the smallest set of prefixes covering all others. The
//! aggregation uses a binary prefix tree per address family, that can also
//! be used on its own.
//!
//! ```
//! use rtrsub::config::{Afi, Config};
//! use rtrsub::query::load_roas;
//! use rtrsub::roa::{ExportFile, RawRoa};
//!
//! let export = ExportFile::new(vec![
//!     RawRoa::new("10.0.0.0/8", 8, "AS64500"),
//!     RawRoa::new("10.0.0.0/16", 24, "AS64501"),
//! ]);
//! let data = load_roas(&export, &Config::new(Afi::Ipv4)).unwrap();
//! assert_eq!(data.aggregated_pfx_list(), ["10.0.0.0/8"]);
//! ```
mod types;

pub mod config;
pub mod index;
pub mod normalize;
pub mod output;
pub mod prefix_tree;
pub mod query;

// re-exports
pub use inetnum::addr;
pub use inetnum::asn;

/// Trait that defines the AFIs 1 (IPv4) and 2 (IPv6)
pub use types::af::AddressFamily;

/// The underlying value (u32) and trait impl for AFI 1.
pub use types::af::IPv4;
/// The underlying value (u128) and trait impl for AFI 2.
pub use types::af::IPv6;

/// A prefix of a single address family
pub use types::PrefixId;

/// Raw and canonical ROA types
pub use types::roa;

/// Error types returned while loading an export
pub use types::errors;

/// Counters collected while loading an export
pub use types::stats;

pub use query::{load_roas, load_roas_from_reader, RoaData};
