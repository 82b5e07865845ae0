//! Random value generators for synthetic record columns.

use rand::Rng;

/// Generate a random lowercase hex string encoding `byte_len` random bytes.
///
/// The returned string is `2 * byte_len` characters long.
pub fn random_hex<R: Rng>(rng: &mut R, byte_len: usize) -> String {
    let mut out = String::with_capacity(byte_len * 2);
    for _ in 0..byte_len {
        let byte: u8 = rng.gen();
        out.push(char::from_digit((byte >> 4) as u32, 16).unwrap_or('0'));
        out.push(char::from_digit((byte & 0x0f) as u32, 16).unwrap_or('0'));
    }
    out
}

/// Generate a random IPv4 address as its 32-bit integer form.
pub fn random_ipv4<R: Rng>(rng: &mut R) -> u32 {
    rng.gen()
}

/// Generate a random IPv6 address as its 16 raw octets.
pub fn random_ipv6<R: Rng>(rng: &mut R) -> [u8; 16] {
    rng.gen()
}

/// Generate a random non-negative integer below `bound` (exclusive).
pub fn bounded_i32<R: Rng>(rng: &mut R, bound: i32) -> i32 {
    rng.gen_range(0..bound)
}

/// Generate a random non-negative integer below `bound` (exclusive).
pub fn bounded_i64<R: Rng>(rng: &mut R, bound: i64) -> i64 {
    rng.gen_range(0..bound)
}

/// Generate a random non-negative 64-bit counter value.
pub fn counter<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(0..=i64::MAX)
}
