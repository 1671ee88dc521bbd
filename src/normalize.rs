//! Turning raw export records into canonical ROAs.
//!
//! A record is first checked for its prefix, which also decides whether the
//! record passes the address family selector. Only records of a selected
//! family have their AS number and max length checked. A malformed record
//! is rejected on its own, the batch it came from is processed further.

use std::net::IpAddr;

use inetnum::addr::Prefix;
use inetnum::asn::Asn;
use log::{debug, error, trace};
use serde_json::Value;

use crate::config::Afi;
use crate::types::errors::RoaError;
use crate::types::roa::{RawRoa, Roa};
use crate::types::stats::LoadStats;

/// Normalizes a single raw record.
///
/// Returns `Ok(None)` if the prefix of the record is not of a family
/// selected by `afi`. This check happens before the AS number and the max
/// length are looked at, so a record of the wrong family is never
/// rejected for those.
pub fn normalize(raw: &RawRoa, afi: Afi) -> Result<Option<Roa>, RoaError> {
    let prefix = parse_prefix(&raw.prefix)?;
    if !afi.includes(prefix.addr().is_ipv4()) {
        trace!("skip {} for afi {}", prefix, afi);
        return Ok(None);
    }
    let asn = parse_asn(&raw.asn)?;
    let max_len = parse_max_len(&raw.max_length)?;
    Ok(Some(Roa::new(prefix, max_len, asn)))
}

/// Normalizes all records of an export in order.
///
/// Rejected records are logged together with their full content and
/// counted in `stats`.
pub fn normalize_all<'a>(
    raws: impl IntoIterator<Item = &'a RawRoa>,
    afi: Afi,
    stats: &mut LoadStats,
) -> Vec<Roa> {
    normalize_all_with(raws, afi, stats, |err, raw| {
        error!("{}", err);
        error!("{}", raw.to_string_pretty());
    })
}

/// Normalizes all records of an export in order, handing every rejected
/// record to `on_reject` together with the reason.
pub fn normalize_all_with<'a>(
    raws: impl IntoIterator<Item = &'a RawRoa>,
    afi: Afi,
    stats: &mut LoadStats,
    mut on_reject: impl FnMut(&RoaError, &'a RawRoa),
) -> Vec<Roa> {
    let mut roas = vec![];
    for raw in raws {
        stats.records += 1;
        match normalize(raw, afi) {
            Ok(Some(roa)) => {
                stats.accepted += 1;
                roas.push(roa);
            }
            Ok(None) => stats.skipped_afi += 1,
            Err(err) => {
                stats.inc_rejected(&err);
                on_reject(&err, raw);
            }
        }
    }
    debug!("normalized {} of {} records", roas.len(), stats.records);
    roas
}

/// Parses a prefix in CIDR notation.
///
/// Bits of the address beyond the prefix length are cleared. An address
/// without a length is taken as a host prefix.
pub fn parse_prefix(value: &Value) -> Result<Prefix, RoaError> {
    let s = match value {
        Value::String(s) => s.as_str(),
        other => return Err(RoaError::MalformedPrefix(other.to_string())),
    };
    let malformed = || RoaError::MalformedPrefix(s.to_string());

    let (addr, len) = match s.split_once('/') {
        Some((addr, len)) => {
            let addr = addr.parse::<IpAddr>().map_err(|_| malformed())?;
            // u8::from_str accepts a leading '+', a length does not.
            if !len.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            (addr, len.parse::<u8>().map_err(|_| malformed())?)
        }
        None => {
            let addr = s.parse::<IpAddr>().map_err(|_| malformed())?;
            let len = if addr.is_ipv4() { 32 } else { 128 };
            (addr, len)
        }
    };

    Prefix::new_relaxed(addr, len).map_err(|_| malformed())
}

/// Parses an AS number given as an integer or as a string with an optional
/// `AS` prefix. Whitespace around the number is ignored.
pub fn parse_asn(value: &Value) -> Result<Asn, RoaError> {
    let asn = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let s = s.trim();
            let digits = s.strip_prefix("AS").unwrap_or(s);
            parse_digits(digits.trim())
        }
        _ => None,
    };
    asn.map(Asn::from).ok_or_else(|| {
        RoaError::MalformedAsn(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    })
}

/// Parses a max length given as an integer or a decimal string.
///
/// A JSON number with a zero fraction, e.g. `24.0`, is taken as the integer.
/// The value is not checked against the prefix length.
pub fn parse_max_len(value: &Value) -> Result<u32, RoaError> {
    let max_len = match value {
        Value::Number(n) => integral_u32(n),
        Value::String(s) => parse_digits(s.trim()),
        _ => None,
    };
    max_len.ok_or_else(|| RoaError::MalformedMaxLength(value.to_string()))
}

fn integral_u32(n: &serde_json::Number) -> Option<u32> {
    if let Some(n) = n.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) {
        Some(f as u32)
    } else {
        None
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok()
}
