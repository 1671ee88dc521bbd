use std::fmt;

use inetnum::addr::Prefix;
use inetnum::asn::Asn;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

//------------ ExportFile ----------------------------------------------------

/// The JSON export of a relying party cache.
///
/// Only the `roas` list is used, any other members of the document are
/// ignored.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ExportFile {
    pub roas: Vec<RawRoa>,
}

impl ExportFile {
    pub fn new(roas: Vec<RawRoa>) -> Self {
        Self { roas }
    }

    /// Parses an export from a reader.
    pub fn from_reader(
        reader: impl std::io::Read,
    ) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

impl std::str::FromStr for ExportFile {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

//------------ RawRoa --------------------------------------------------------

/// A single element of the `roas` list of an export, as found in the input.
///
/// The fields are kept as untyped JSON values, so that a record with a
/// malformed field can be rejected on its own instead of failing the whole
/// document. Any other members of the record (e.g. `ta`) are retained in
/// `extra` so they show up in diagnostics.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RawRoa {
    #[serde(default)]
    pub prefix: Value,

    #[serde(default, rename = "maxLength")]
    pub max_length: Value,

    #[serde(default)]
    pub asn: Value,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RawRoa {
    pub fn new(
        prefix: impl Into<Value>,
        max_length: impl Into<Value>,
        asn: impl Into<Value>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            max_length: max_length.into(),
            asn: asn.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Returns the pretty-printed JSON representation of the record, for
    /// diagnostics.
    pub fn to_string_pretty(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl From<&Roa> for RawRoa {
    fn from(roa: &Roa) -> Self {
        Self::new(
            roa.prefix().to_string(),
            roa.max_len(),
            roa.asn().to_string(),
        )
    }
}

//------------ Roa -----------------------------------------------------------

/// A canonical Route Origin Authorization.
///
/// The prefix always has all bits beyond its length set to zero. Two ROAs
/// are the same record iff prefix, max length and origin are all equal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Roa {
    prefix: Prefix,
    max_len: u32,
    asn: Asn,
}

impl Roa {
    pub fn new(prefix: Prefix, max_len: u32, asn: Asn) -> Self {
        Self {
            prefix,
            max_len,
            asn,
        }
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix.len()
    }

    /// The max length as found in the input. This is not checked against
    /// the prefix length.
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// The origin AS number as a plain integer.
    pub fn origin(&self) -> u32 {
        self.asn.into_u32()
    }

    pub fn is_v4(&self) -> bool {
        self.prefix.addr().is_ipv4()
    }
}

impl fmt::Display for Roa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} => {}", self.prefix, self.max_len, self.asn)
    }
}
