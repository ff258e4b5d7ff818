//! Tests for chunks module - line-aligned chunked reading.

use omni_io::LineChunks;

#[test]
fn test_chunks_reassemble_input() {
    let input = "alpha\nbeta\ngamma\ndelta\nepsilon\n".repeat(50);
    let chunks: Vec<Vec<u8>> = LineChunks::new(input.as_bytes(), 16)
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), input.as_bytes());
}

#[test]
fn test_every_chunk_holds_whole_lines() {
    let input = "k1=v1\nk2=v2\nk3=v3\n".repeat(20);
    for chunk in LineChunks::new(input.as_bytes(), 10) {
        let chunk = chunk.unwrap();
        assert_eq!(chunk.last(), Some(&b'\n'));
    }
}

#[test]
fn test_missing_trailing_newline_is_last_chunk() {
    let chunks: Vec<Vec<u8>> = LineChunks::new(&b"a\nb\nc"[..], 2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(chunks.last().unwrap(), b"c");
    assert_eq!(chunks.concat(), b"a\nb\nc");
}
