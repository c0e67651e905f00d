//! Packet checksum arithmetic.
//!
//! A UPB checksum is the two's complement of the 8-bit byte sum, so the sum
//! of a packet including its checksum byte is always zero.

/// Unsigned sum of all bytes, truncated to 8 bits.
pub fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Checksum byte for `bytes`: `(256 - sum) mod 256`.
pub fn checksum(bytes: &[u8]) -> u8 {
    sum(bytes).wrapping_neg()
}

/// Whether a complete packet (checksum included) sums to zero.
pub fn verify(packet: &[u8]) -> bool {
    sum(packet) == 0
}
