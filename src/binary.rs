/*!
 * Binary content detection
 */

/// Bytes read from the start of a file before classifying it
pub const SNIFF_BUFFER_SIZE: usize = 8192;

/// Window inspected for a null byte, the same heuristic git uses
pub const BINARY_CHECK_LIMIT: usize = 8000;

/// A file is binary when a null byte appears in its first 8000 bytes
pub fn is_binary(content: &[u8]) -> bool {
    let limit = content.len().min(BINARY_CHECK_LIMIT);
    content[..limit].contains(&0)
}
