//! Contract Test: Shared Document Access
//!
//! Constraints verified:
//! - Hosts is Send + Sync and usable from many threads
//! - Concurrent adds never lose or duplicate a mapping
//! - Bulk removals are observed all-or-nothing by readers
//!
//! If this test fails, concurrent editors can corrupt the document.

mod common;

use common::*;
use hosts_core::Hosts;
use std::sync::Arc;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn hosts_is_send_and_sync() {
    assert_send_sync::<Hosts>();
}

#[test]
fn concurrent_adds_are_all_applied_once() {
    let hosts = Arc::new(raw_hosts("127.0.0.1 localhost\n"));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let hosts = Arc::clone(&hosts);
            thread::spawn(move || {
                for i in 0..25 {
                    let name = format!("w{worker}-h{i}");
                    hosts.add_host("10.0.0.1", &name);
                    // Re-adding is a no-op even under contention.
                    hosts.add_host("10.0.0.1", &name);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    let names = hosts.list_hosts_by_address("10.0.0.1");
    assert_eq!(names.len(), 8 * 25);
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn bulk_removal_is_atomic_for_readers() {
    let hosts = Arc::new(raw_hosts(""));
    let group: Vec<String> = (0..50).map(|i| format!("g{i}")).collect();
    hosts.add_hosts("10.0.0.2", &group);

    let reader = {
        let hosts = Arc::clone(&hosts);
        thread::spawn(move || {
            for _ in 0..200 {
                let seen = hosts.list_hosts_by_address("10.0.0.2").len();
                assert!(seen == 50 || seen == 0, "observed partial removal: {seen}");
            }
        })
    };

    assert!(hosts.remove_hosts(&group));
    reader.join().unwrap();
    assert!(hosts.list_hosts_by_address("10.0.0.2").is_empty());
}
