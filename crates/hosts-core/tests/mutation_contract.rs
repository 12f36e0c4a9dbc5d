//! Contract Test: Mutation Semantics
//!
//! Constraints verified:
//! - Adds are idempotent and normalise case and whitespace
//! - A hostname lives on one non-loopback address per family
//! - Loopback addresses may share hostnames
//! - Packing caps are honoured and comments partition lines
//! - Removals by host, address, comment and CIDR delete emptied lines
//!
//! If this test fails, editing a hosts file produces duplicate or
//! conflicting mappings.

mod common;

use common::*;
use hosts_core::{Error, Hosts, HostsConfig, IpFamily};

fn capped(text: &str, cap: i64) -> Hosts {
    Hosts::new(HostsConfig::from_raw_text(text).with_max_hosts_per_line(cap)).unwrap()
}

fn count(hosts: &Hosts, address: &str, hostname: &str) -> usize {
    hosts
        .list_hosts_by_address(address)
        .iter()
        .filter(|h| *h == hostname)
        .count()
}

#[test]
fn add_then_remove_leaves_nothing_behind() {
    let hosts = raw_hosts(SAMPLE_HOSTS);
    hosts.add_host("10.1.1.1", "temp.local");
    assert_eq!(count(&hosts, "10.1.1.1", "temp.local"), 1);

    assert!(hosts.remove_host("temp.local"));
    assert_eq!(count(&hosts, "10.1.1.1", "temp.local"), 0);
    assert_eq!(hosts.render(), raw_hosts(SAMPLE_HOSTS).render());
}

#[test]
fn identical_adds_produce_one_occurrence() {
    let hosts = raw_hosts("");
    assert!(hosts.add_host("192.168.0.10", "nas"));
    assert!(!hosts.add_host("192.168.0.10", "nas"));
    assert!(!hosts.add_host("192.168.0.10", " NAS "));
    assert_eq!(count(&hosts, "192.168.0.10", "nas"), 1);
    assert_eq!(hosts.lines().len(), 1);
}

#[test]
fn invalid_ip_leaves_document_byte_identical() {
    let hosts = raw_hosts(SAMPLE_HOSTS);
    let before = hosts.render();
    for bad in ["", "localhost", "10.0.0", "10.0.0.256", "fe80::zz", "10.0.0.0/24"] {
        assert!(!hosts.add_host(bad, "x"), "{bad:?} accepted");
    }
    assert_eq!(hosts.render(), before);
}

#[test]
fn hostname_moves_between_non_loopback_addresses() {
    let hosts = raw_hosts(SAMPLE_HOSTS);
    assert!(hosts.add_host("10.0.0.9", "db.internal"));

    assert_eq!(count(&hosts, "10.0.0.5", "db.internal"), 0);
    assert_eq!(count(&hosts, "10.0.0.9", "db.internal"), 1);
    // Its only hostname left, so the managed line is gone.
    assert!(hosts.list_hosts_by_address("10.0.0.5").is_empty());
    assert_eq!(hosts.list_hosts_by_comment("managed"), vec!["cache.internal"]);
}

#[test]
fn loopback_addresses_may_share_a_hostname() {
    let hosts = raw_hosts("");
    hosts.add_host("127.0.0.1", "x");
    hosts.add_host("127.0.0.2", "x");
    assert_eq!(count(&hosts, "127.0.0.1", "x"), 1);
    assert_eq!(count(&hosts, "127.0.0.2", "x"), 1);
}

#[test]
fn ipv4_and_ipv6_mappings_coexist() {
    let hosts = raw_hosts("");
    hosts.add_host("10.0.0.1", "svc");
    hosts.add_host("2001:db8::1", "svc");

    assert_eq!(hosts.lookup("svc", IpFamily::V4).unwrap().address, "10.0.0.1");
    assert_eq!(hosts.lookup("svc", IpFamily::V6).unwrap().address, "2001:db8::1");

    hosts.add_host("2001:db8::2", "svc");
    assert_eq!(hosts.lookup("svc", IpFamily::V4).unwrap().address, "10.0.0.1");
    assert_eq!(hosts.lookup("svc", IpFamily::V6).unwrap().address, "2001:db8::2");
}

#[test]
fn packing_bound_holds() {
    let hosts = capped("", 3);
    let names: Vec<String> = (0..10).map(|i| format!("h{i}")).collect();
    assert!(hosts.add_hosts("127.0.0.1", &names));

    let lines = hosts.lines();
    assert!(lines.iter().all(|l| l.hostnames().len() <= 3));
    assert_eq!(lines.iter().map(|l| l.hostnames().len()).sum::<usize>(), 10);
    assert_eq!(lines.len(), 4);
}

#[test]
fn windows_cap_applies_when_configured_explicitly() {
    let hosts = capped("", hosts_core::DEFAULT_MAX_HOSTS_PER_LINE_WINDOWS as i64);
    let names: Vec<String> = (0..20).map(|i| format!("name{i}")).collect();
    hosts.add_hosts("127.0.0.1", &names);

    let sizes: Vec<usize> = hosts.lines().iter().map(|l| l.hostnames().len()).collect();
    assert_eq!(sizes, vec![9, 9, 2]);
}

#[test]
fn comments_group_hostnames() {
    let hosts = raw_hosts("");
    hosts.add_host_with_comment("10.0.0.1", "a", "grp");
    hosts.add_host_with_comment("10.0.0.1", "b", "grp");
    hosts.add_host_with_comment("10.0.0.1", "c", "other");

    assert_eq!(
        hosts.render(),
        "10.0.0.1        a b # grp\n10.0.0.1        c # other\n"
    );
}

#[test]
fn add_remove_scenario() {
    let hosts = raw_hosts("127.0.0.1 localhost\n");
    hosts.add_host("10.0.0.1", "app");
    hosts.remove_host("localhost");
    assert_eq!(hosts.render(), "10.0.0.1        app\n");
}

#[test]
fn cidr_removal_keeps_addresses_outside_the_range() {
    let hosts = raw_hosts("10.0.0.1 a\n10.0.0.2 b\n192.168.1.1 c\n");
    assert!(hosts.remove_cidrs(&["10.0.0.0/24"]).unwrap());
    assert_eq!(hosts.render(), "192.168.1.1     c\n");
}

#[test]
fn malformed_cidr_fails_before_any_removal() {
    let hosts = raw_hosts("10.0.0.1 a\n");
    let err = hosts.remove_cidrs(&["10.0.0.0/24", "10.0.0.0/99"]).unwrap_err();
    assert!(matches!(err, Error::InvalidCidr { ref cidr, .. } if cidr == "10.0.0.0/99"));
    assert_eq!(hosts.list_hosts_by_address("10.0.0.1"), vec!["a"]);
}

#[test]
fn removal_by_comment_spares_other_lines() {
    let hosts = raw_hosts(SAMPLE_HOSTS);
    assert!(hosts.remove_by_comment("managed"));
    assert!(hosts.list_hosts_by_cidr("10.0.0.0/8").is_empty());
    assert!(hosts.render().contains("stray-token\n"));
    assert!(!hosts.remove_by_comment("managed"));
}

#[test]
fn remove_first_variants_only_touch_one_match() {
    let hosts = raw_hosts("127.0.0.1 dup\n127.0.0.2 dup\n10.0.0.1 a\n10.0.0.1 b\n");
    assert!(hosts.remove_first_host("dup"));
    assert_eq!(hosts.list_addresses_by_host("dup", true).len(), 1);

    assert!(hosts.remove_first_address("10.0.0.1"));
    assert_eq!(hosts.list_hosts_by_address("10.0.0.1"), vec!["b"]);

    assert!(hosts.remove_addresses(&["10.0.0.1", "127.0.0.2"]));
    assert!(hosts.lines().is_empty());
}

#[test]
fn update_moves_hosts_off_loopback() {
    let hosts = raw_hosts("127.0.0.1 localhost api web\n");
    assert!(hosts.reassign_hosts("127.0.0.1", "10.0.0.20", &["api", "web"], "moved"));
    assert_eq!(
        hosts.render(),
        "127.0.0.1       localhost\n10.0.0.20       api web # moved\n"
    );
}
