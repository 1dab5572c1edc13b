/// Cache key derived from a resource path or name.
///
/// The hash is deterministic and order-sensitive. Distinct strings may
/// collide; the cache does not keep the source string to verify a hit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(u64);

impl ResourceKey {
    /// Hashes `s` byte by byte with a per-position multiplier.
    ///
    /// UTF-8 bytes are weighted as unsigned values. Keys for non-ASCII input
    /// therefore differ from hashers that sign-extend `char` bytes.
    pub fn of(s: &str) -> Self {
        let mut result: u64 = 0;
        let mut mult: u64 = 1;
        let mut c: u64 = 816_753;

        for &byte in s.as_bytes() {
            result = result.wrapping_add(u64::from(byte).wrapping_mul(mult));
            mult = mult.wrapping_add(c);
            c = c.wrapping_add(c.wrapping_add(13) >> 1);
        }

        Self(result)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}
