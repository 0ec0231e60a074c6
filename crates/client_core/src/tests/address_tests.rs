use super::*;

#[test]
fn push_truncates_forward_history() {
    let mut address = HistoryAddress::new("/site/acme", "?page=2");
    assert_eq!(address.href(), "/site/acme?page=2");
    address.push("search=hat");
    address.push("");
    assert_eq!(address.href(), "/site/acme");

    assert!(address.back());
    assert_eq!(address.read(), "search=hat");
    address.push("sort=price-asc");
    assert!(!address.forward());
    assert_eq!(address.entries(), ["page=2", "search=hat", "sort=price-asc"]);
}

#[test]
fn back_stops_at_first_entry() {
    let mut address = HistoryAddress::new("/site/acme", "");
    assert!(!address.back());
    assert_eq!(address.read(), "");
}

#[test]
fn forward_replays_entries_after_back() {
    let mut address = HistoryAddress::new("/site/acme", "");
    address.push("page=2");
    assert!(address.back());
    assert!(address.forward());
    assert_eq!(address.read(), "page=2");
    assert!(!address.forward());
}
