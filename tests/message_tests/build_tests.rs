//! Tests for build-mode insertions
//!
//! These tests verify:
//! - Exact wire bytes for every insertion type
//! - Entry count tracking and its violations
//! - Failed insertions leave the buffer untouched
//! - Untracked builds defer validation to parse

use mapmsg::{Config, ErrorKind, Message, Mode};

// =============================================================================
// Helper Functions
// =============================================================================

fn tracked() -> Message {
    Message::with_config(Config::builder().track_entry_counts(true).build()).unwrap()
}

fn untracked() -> Message {
    Message::with_config(Config::builder().track_entry_counts(false).build()).unwrap()
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_single_i32_pair_bytes() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_i32("a", 5).unwrap();

    assert_eq!(
        msg.serialize().unwrap(),
        &[0x81, 0xa1, b'a', 0xd2, 0x00, 0x00, 0x00, 0x05]
    );
}

#[test]
fn test_every_integer_width_bytes() {
    let mut msg = tracked();
    msg.insert_map(8).unwrap();
    msg.insert_pair_i8("a", -1).unwrap();
    msg.insert_pair_i16("b", -2).unwrap();
    msg.insert_pair_i32("c", -3).unwrap();
    msg.insert_pair_i64("d", -4).unwrap();
    msg.insert_pair_u8("e", 1).unwrap();
    msg.insert_pair_u16("f", 2).unwrap();
    msg.insert_pair_u32("g", 3).unwrap();
    msg.insert_pair_u64("h", 4).unwrap();

    let expected: Vec<u8> = [
        vec![0x88],
        vec![0xa1, b'a', 0xd0, 0xff],
        vec![0xa1, b'b', 0xd1, 0xff, 0xfe],
        vec![0xa1, b'c', 0xd2, 0xff, 0xff, 0xff, 0xfd],
        vec![0xa1, b'd', 0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfc],
        vec![0xa1, b'e', 0xcc, 0x01],
        vec![0xa1, b'f', 0xcd, 0x00, 0x02],
        vec![0xa1, b'g', 0xce, 0x00, 0x00, 0x00, 0x03],
        vec![0xa1, b'h', 0xcf, 0, 0, 0, 0, 0, 0, 0, 0x04],
    ]
    .concat();

    assert_eq!(msg.serialize().unwrap(), expected.as_slice());
}

#[test]
fn test_str_and_bool_bytes() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();
    msg.insert_pair_str("s", "ok").unwrap();
    msg.insert_pair_bool("t", true).unwrap();

    assert_eq!(
        msg.serialize().unwrap(),
        &[0x82, 0xa1, b's', 0xa2, b'o', b'k', 0xa1, b't', 0xc3]
    );
}

#[test]
fn test_nested_map_bytes() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_nested_map("d", 1).unwrap();
    msg.insert_pair_u8("x", 7).unwrap();

    assert_eq!(
        msg.serialize().unwrap(),
        &[0x81, 0xa1, b'd', 0x81, 0xa1, b'x', 0xcc, 0x07]
    );
}

#[test]
fn test_empty_nested_map() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();
    msg.insert_nested_map("empty", 0).unwrap();
    msg.insert_pair_bool("after", false).unwrap();

    let read = msg.finalize().unwrap();
    let empty = read.get_nested_map_from_key("empty").unwrap();
    assert_eq!(empty.entry_count().unwrap(), 0);
    assert!(!read.get_bool_from_key("after").unwrap());
}

#[test]
fn test_into_bytes_matches_serialize() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_i16("k", 300).unwrap();
    let expected = msg.serialize().unwrap().to_vec();

    let bytes = msg.into_bytes().unwrap();
    assert_eq!(&bytes[..], expected.as_slice());
}

#[test]
fn test_build_display_shows_decoded_document() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();
    msg.insert_pair_i32("a", 5).unwrap();
    msg.insert_pair_str("b", "x").unwrap();

    assert_eq!(msg.to_string(), r#"{"a"=>5, "b"=>"x"}"#);
}

// =============================================================================
// Entry Tracking Tests
// =============================================================================

#[test]
fn test_pair_before_map_rejected() {
    let mut msg = tracked();
    let err = msg.insert_pair_i32("a", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(msg.serialize().unwrap().is_empty());
}

#[test]
fn test_too_many_entries_rejected() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();

    let err = msg.insert_pair_i32("b", 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_second_root_rejected() {
    let mut msg = tracked();
    msg.insert_map(0).unwrap();

    let err = msg.insert_map(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_insert_map_inside_open_map_rejected() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();

    let err = msg.insert_map(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_incomplete_document_cannot_serialize() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();

    assert_eq!(msg.serialize().unwrap_err().kind(), ErrorKind::InvalidState);
    assert_eq!(msg.finalize().unwrap_err().kind(), ErrorKind::InvalidState);

    msg.insert_pair_i32("b", 2).unwrap();
    assert!(msg.serialize().is_ok());
}

#[test]
fn test_nested_maps_close_in_cascade() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_nested_map("outer", 1).unwrap();
    msg.insert_nested_map("inner", 1).unwrap();
    // Fills inner, which closes outer, which closes the root
    msg.insert_pair_u8("leaf", 1).unwrap();

    assert!(msg.serialize().is_ok());
    let err = msg.insert_pair_u8("extra", 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_clear_resets_tracker() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();

    msg.clear();
    assert_eq!(msg.mode(), Mode::Build);
    assert!(msg.serialize().unwrap().is_empty());

    msg.insert_map(1).unwrap();
    msg.insert_pair_i32("b", 2).unwrap();
    assert_eq!(msg.finalize().unwrap().get_i32_from_key("b").unwrap(), 2);
}

// =============================================================================
// Atomicity Tests
// =============================================================================

#[test]
fn test_rejected_insert_leaves_buffer_unchanged() {
    let mut msg = tracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_str("a", "value").unwrap();
    let before = msg.serialize().unwrap().to_vec();

    assert!(msg.insert_pair_str("b", "other").is_err());
    assert!(msg.insert_nested_map("c", 1).is_err());

    assert_eq!(msg.serialize().unwrap(), before.as_slice());
}

#[test]
fn test_rejected_insert_keeps_tracker_state() {
    let mut msg = tracked();
    msg.insert_map(2).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();

    // Wrong operation for an open map; the remaining slot is still free
    assert!(msg.insert_map(1).is_err());
    msg.insert_pair_i32("b", 2).unwrap();

    let read = msg.finalize().unwrap();
    assert_eq!(read.entry_count().unwrap(), 2);
}

// =============================================================================
// Untracked Build Tests
// =============================================================================

#[test]
fn test_untracked_allows_short_document() {
    let mut msg = untracked();
    msg.insert_map(2).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();

    // Serializes fine, the truncation is caught when parsing
    let bytes = msg.serialize().unwrap().to_vec();
    let err = Message::parse(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
}

#[test]
fn test_untracked_allows_extra_entries() {
    let mut msg = untracked();
    msg.insert_map(1).unwrap();
    msg.insert_pair_i32("a", 1).unwrap();
    msg.insert_pair_i32("b", 2).unwrap();

    let err = msg.finalize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
}
