use std::collections::BTreeSet;
use std::error::Error;

use rtrsub::config::{Afi, Config};
use rtrsub::errors::{LoadError, RoaError};
use rtrsub::index::OriginEntry;
use rtrsub::normalize::normalize_all_with;
use rtrsub::roa::ExportFile;
use rtrsub::stats::LoadStats;
use rtrsub::{load_roas, load_roas_from_reader};
use serde_json::json;

mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

fn export() -> Result<ExportFile, Box<dyn Error>> {
    Ok(serde_json::from_value(json!({
        "metadata": { "generated": 1700000000 },
        "roas": [
            { "prefix": "10.0.0.0/8", "maxLength": 8, "asn": "AS100", "ta": "ripe" },
            { "prefix": "10.0.0.0/16", "maxLength": 24, "asn": "AS200", "ta": "ripe" },
            { "prefix": "10.0.0.0/8", "maxLength": 8, "asn": "AS100", "ta": "ripe" },
            { "prefix": "10.0.0.0/8", "maxLength": 8, "asn": "ASxyz", "ta": "ripe" },
            { "prefix": "192.168.0.0/16", "maxLength": 16, "asn": 300, "ta": "arin" },
            { "prefix": "203.97.2.0/24", "maxLength": 24, "asn": "AS64500", "ta": "apnic" },
            { "prefix": "2001:db8::/32", "maxLength": 48, "asn": "AS200", "ta": "ripe" },
            { "prefix": "2001:db8:1::/48", "maxLength": 48, "asn": "AS300", "ta": "ripe" },
            { "prefix": "2001:db9::/32", "maxLength": 32, "asn": "AS4294967296", "ta": "ripe" }
        ]
    }))?)
}

#[test]
fn test_ipv4_only() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Ipv4))?;
    assert_eq!(data.afi(), Afi::Ipv4);
    assert_eq!(
        data.pfx_list(),
        ["10.0.0.0/8", "10.0.0.0/16", "192.168.0.0/16", "203.97.2.0/24"]
    );
    assert_eq!(
        data.aggregated_pfx_list(),
        ["10.0.0.0/8", "192.168.0.0/16", "203.97.2.0/24"]
    );
    assert!(data.pfx_list().iter().all(|p| !p.contains(':')));
    assert!(data.roa_list().iter().all(|r| !r.prefix.contains(':')));

    let stats = data.stats();
    assert_eq!(stats.records, 9);
    assert_eq!(stats.skipped_afi, 3);
    assert_eq!(stats.malformed_asn, 1);
    assert_eq!(stats.accepted, 5);
    Ok(())
}

#[test]
fn test_ipv6_only() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Ipv6))?;
    assert_eq!(data.pfx_list(), ["2001:db8::/32", "2001:db8:1::/48"]);
    assert_eq!(data.aggregated_pfx_list(), ["2001:db8::/32"]);
    assert!(data.roa_list().iter().all(|r| r.prefix.contains(':')));

    // the out of range AS number is an IPv6 record
    assert_eq!(data.stats().malformed_asn, 1);
    assert_eq!(data.stats().skipped_afi, 6);
    Ok(())
}

#[test]
fn test_mixed() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Mixed))?;
    assert_eq!(
        data.aggregated_pfx_list(),
        [
            "10.0.0.0/8",
            "192.168.0.0/16",
            "203.97.2.0/24",
            "2001:db8::/32"
        ]
    );
    assert_eq!(data.pfx_list().len(), 6);
    assert_eq!(data.stats().rejected(), 2);
    Ok(())
}

#[test]
fn test_malformed_asn_dropped() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Ipv4))?;
    // 10.0.0.0/8 is only there for AS100, the malformed record adds nothing
    assert_eq!(data.origins("10.0.0.0/8"), Some(&[100][..]));
    assert_eq!(
        data.roa_list()
            .iter()
            .filter(|r| r.prefix == "10.0.0.0/8")
            .count(),
        1
    );
    // records after the malformed one are still processed
    assert!(data.pfx_list().iter().any(|p| p == "203.97.2.0/24"));
    Ok(())
}

#[test]
fn test_malformed_asn_reported() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let export = export()?;
    let mut stats = LoadStats::default();
    let mut rejected = vec![];
    let roas = normalize_all_with(
        &export.roas,
        Afi::Ipv4,
        &mut stats,
        |err, raw| rejected.push((err.clone(), raw)),
    );
    assert_eq!(roas.len(), 5);
    assert_eq!(rejected.len(), 1);

    let (err, raw) = &rejected[0];
    assert_eq!(err, &RoaError::MalformedAsn("ASxyz".to_string()));
    assert_eq!(*raw, &export.roas[3]);

    // the logged record carries all of its members
    let diag = raw.to_string_pretty();
    println!("{}\n{}", err, diag);
    assert!(diag.contains("\"prefix\": \"10.0.0.0/8\""));
    assert!(diag.contains("\"maxLength\": 8"));
    assert!(diag.contains("\"asn\": \"ASxyz\""));
    assert!(diag.contains("\"ta\": \"ripe\""));
    assert!(err.to_string().contains("ASxyz"));
    Ok(())
}

#[test]
fn test_duplicates_collapse() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Ipv4))?;
    assert_eq!(data.roa_list().len(), 4);
    let dupes = data
        .roa_list()
        .iter()
        .filter(|r| {
            r.prefix == "10.0.0.0/8" && r.maxlength == 8 && r.origin == 100
        })
        .count();
    assert_eq!(dupes, 1);
    Ok(())
}

#[test]
fn test_asn_filter() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let config =
        Config::new(Afi::Mixed).with_asn_filter(BTreeSet::from([200]));
    let data = load_roas(&export()?, &config)?;
    let origins: BTreeSet<_> =
        data.roa_list().iter().map(|r| r.origin).collect();
    assert_eq!(origins, BTreeSet::from([200]));
    assert_eq!(data.roa_list().len(), 2);

    // the filter only applies to the flat list
    assert_eq!(data.pfx_list().len(), 6);
    assert!(data.origin_dict().contains_key(&100));
    Ok(())
}

#[test]
fn test_origin_index() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&export()?, &Config::new(Afi::Ipv4))?;
    assert_eq!(
        data.prefixes_for(64500).and_then(|p| p.get("203.97.2.0/24")),
        Some(&OriginEntry {
            maxlength: 24,
            length: 24
        })
    );
    Ok(())
}

#[test]
fn test_reader_errors() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let config = Config::default();
    assert!(matches!(
        load_roas_from_reader("{ \"roas\": [".as_bytes(), &config),
        Err(LoadError::Json(_))
    ));
    assert!(matches!(
        load_roas_from_reader("{ \"other\": [] }".as_bytes(), &config),
        Err(LoadError::Json(_))
    ));

    let data = load_roas_from_reader(
        r#"{ "roas": [ { "prefix": "10.0.0.0/24", "maxLength": "24", "asn": 65000 } ] }"#
            .as_bytes(),
        &config,
    )?;
    assert_eq!(data.pfx_list(), ["10.0.0.0/24"]);
    assert_eq!(data.roa_list()[0].maxlength, 24);
    Ok(())
}

#[test]
fn test_empty_export() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let data = load_roas(&ExportFile::default(), &Config::default())?;
    assert!(data.pfx_list().is_empty());
    assert!(data.aggregated_pfx_list().is_empty());
    assert!(data.roa_list().is_empty());
    assert!(data.pfx_dict().is_empty());
    Ok(())
}
