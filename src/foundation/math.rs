/// Number of grid units spanning the full width or height of a widget surface.
pub(crate) const GRID_UNITS: f64 = 12.0;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Convert grid units into pixels along an axis of length `extent`.
pub(crate) fn grid_to_px(units: f64, extent: f64) -> f64 {
    units * extent / GRID_UNITS
}

/// IEEE-754 style remainder: `x - m * n` where `n` is `x / m` rounded to the nearest integer
/// (ties to even). The result lies in `[-m/2, m/2]`.
pub(crate) fn signed_remainder(x: f64, m: f64) -> f64 {
    if m == 0.0 || !m.is_finite() || !x.is_finite() {
        return 0.0;
    }
    let n = (x / m).round_ties_even();
    x - m * n
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
