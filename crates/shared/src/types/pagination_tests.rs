use super::*;
use proptest::prelude::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.offset(), 0);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest::new(1).offset(), 0);
    assert_eq!(PageRequest::new(2).offset(), 25);
    assert_eq!(PageRequest::new(4).offset(), 75);
}

#[test]
fn test_page_zero_is_first_page() {
    assert_eq!(PageRequest::new(0).page, 1);
    assert_eq!(PageRequest { page: 0 }.offset(), 0);
}

#[test]
fn test_page_request_limit() {
    assert_eq!(PageRequest::new(9).limit(), 25);
}

#[test]
fn test_sort_order_parse() {
    assert_eq!(SortOrder::parse("newest"), Some(SortOrder::Newest));
    assert_eq!(SortOrder::parse("oldest"), Some(SortOrder::Oldest));
    assert_eq!(SortOrder::parse("NEWEST"), None);
    assert_eq!(SortOrder::parse("random"), None);
    assert_eq!(SortOrder::default(), SortOrder::Newest);
    assert!(SortOrder::Newest.is_descending());
    assert!(!SortOrder::Oldest.is_descending());
}

proptest! {
    #[test]
    fn prop_offset_is_page_minus_one_times_page_size(page in 1u32..1_000_000) {
        let request = PageRequest::new(page);
        prop_assert_eq!(request.offset(), u64::from(page - 1) * 25);
        prop_assert_eq!(request.limit(), 25);
    }
}
