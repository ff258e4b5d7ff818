//! Binary detection.
//!
//! Quick binary detection using NULL byte scanning.

use memchr::memchr;

/// Number of leading bytes inspected by [`is_binary`].
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Quick binary detection - checks first 8KB for NULL bytes.
///
/// Files containing NULL bytes in the first 8KB are considered binary.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), BINARY_SNIFF_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}
