//! String utility functions
//!
//! Utilities for the fixed-width text labels stored in MRC headers.

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while !buffer.is_empty() && buffer[buffer.len() - 1] == 0 {
        buffer.pop();
    }
}

/// Decode one header label, dropping padding
pub fn label_from_bytes(bytes: &[u8]) -> String {
    let mut buffer = bytes.to_vec();
    trim_trailing_nulls(&mut buffer);
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

/// Encode a label into a space padded field of `width` bytes
pub fn label_to_bytes(label: &str, width: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = label.bytes().filter(u8::is_ascii).take(width).collect();
    bytes.resize(width, b' ');
    bytes
}
