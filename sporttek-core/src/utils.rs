/// Returns the number of slots in a bracket for `entrants`, which is the smallest power of two
/// that is greater than or equal to `entrants`.
pub fn bracket_size(entrants: usize) -> usize {
    let mut size = 1;
    while size < entrants {
        size *= 2;
    }

    size
}

pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> Self {
        bracket_size(self).trailing_zeros() as Self
    }
}
