//! Tests for write module - directory creation, writes and backups.

use std::io::Write;
use tempfile::TempDir;

use omni_io::{backup_existing, create_writer, ensure_dir, write_file};

#[test]
fn test_write_then_overwrite() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("out.txt");
    write_file(&p, b"first").unwrap();
    write_file(&p, b"second").unwrap();
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "second");
}

#[test]
fn test_write_requires_parent() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("missing/out.txt");
    assert!(write_file(&p, b"data").is_err());

    ensure_dir(p.parent().unwrap()).unwrap();
    write_file(&p, b"data").unwrap();
    assert!(p.is_file());
}

#[test]
fn test_streaming_writer() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("stream.txt");
    {
        let mut writer = create_writer(&p).unwrap();
        writer.write_all(b"one\n").unwrap();
        writer.write_all(b"two\n").unwrap();
        writer.flush().unwrap();
    }
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "one\ntwo\n");
}

#[test]
fn test_backup_existing_copies_previous_content() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("config.ini");
    std::fs::write(&p, "old").unwrap();

    let backup = backup_existing(&p).unwrap().unwrap();
    assert_eq!(backup, dir.path().join("config.ini.bak"));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "old");
}

#[test]
fn test_backup_missing_file_is_noop() {
    let dir = TempDir::new().unwrap();
    assert!(backup_existing(dir.path().join("absent.txt")).unwrap().is_none());
}
