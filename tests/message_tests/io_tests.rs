//! Tests for stream helpers
//!
//! These tests verify:
//! - Round-trip through a temp file
//! - Read-mode messages are re-encoded on write
//! - Message errors surface as InvalidData

use std::fs::File;
use std::io::{self, Cursor};

use mapmsg::{read_message, write_message, Config, ErrorKind, Message, MsgError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn tracked() -> Config {
    Config::builder().track_entry_counts(true).build()
}

fn sample() -> Message {
    let mut msg = Message::with_config(tracked()).unwrap();
    msg.insert_map(2).unwrap();
    msg.insert_pair_str("name", "sensor").unwrap();
    msg.insert_nested_map("reading", 1).unwrap();
    msg.insert_pair_i16("celsius", -40).unwrap();
    msg
}

fn inner_kind(err: &io::Error) -> ErrorKind {
    err.get_ref()
        .and_then(|e| e.downcast_ref::<MsgError>())
        .map(|e| e.kind())
        .unwrap()
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.msgpack");

    let msg = sample();
    let written = write_message(File::create(&path).unwrap(), &msg).unwrap();
    assert_eq!(written, msg.serialize().unwrap().len());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), written as u64);

    let read = read_message(File::open(&path).unwrap(), &tracked()).unwrap();
    assert_eq!(read.get_str_from_key("name").unwrap(), "sensor");
    let reading = read.get_nested_map_from_key("reading").unwrap();
    assert_eq!(reading.get_i16_from_key("celsius").unwrap(), -40);
}

#[test]
fn test_write_read_mode_message() {
    let read = sample().finalize().unwrap();

    let mut out = Vec::new();
    let written = write_message(&mut out, &read).unwrap();

    assert_eq!(written, out.len());
    assert_eq!(out, read.encode().unwrap());

    let again = read_message(Cursor::new(out), &Config::default()).unwrap();
    assert_eq!(again.to_string(), read.to_string());
}

#[test]
fn test_write_read_mode_with_large_extension() {
    // {"blob": ext32(type 1, 65536 bytes)}
    let mut doc = vec![0x81, 0xa4, b'b', b'l', b'o', b'b', 0xc9, 0x00, 0x01, 0x00, 0x00, 0x01];
    doc.extend(std::iter::repeat(0xeeu8).take(65_536));
    let read = Message::parse(&doc).unwrap();

    let mut out = Vec::new();
    let written = write_message(&mut out, &read).unwrap();

    assert_eq!(written, doc.len());
    assert_eq!(out, doc);
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_write_empty_message() {
    let mut msg = sample();
    msg.release();

    let err = write_message(Vec::new(), &msg).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}

#[test]
fn test_write_incomplete_message() {
    let mut msg = Message::with_config(tracked()).unwrap();
    msg.insert_map(3).unwrap();

    let mut out = Vec::new();
    let err = write_message(&mut out, &msg).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(inner_kind(&err), ErrorKind::InvalidState);
    assert!(out.is_empty());
}

#[test]
fn test_read_empty_stream() {
    let err = read_message(Cursor::new(Vec::new()), &Config::default()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(inner_kind(&err), ErrorKind::InvalidArgument);
}

#[test]
fn test_read_garbage() {
    let err = read_message(Cursor::new(vec![0xc1, 0x00]), &Config::default()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(inner_kind(&err), ErrorKind::ParseError);
}
