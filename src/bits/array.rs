//! Compact, word-packed bit storage: [`BitArray`].
//!
//! Mirrors the word-at-a-time scanning style of this crate's bitstream
//! lineage (fill/consume a machine word instead of bit-by-bit), but trades
//! the teacher's `unsafe` pointer tricks for plain bounds-checked indexing
//! since `BitArray` is a data structure callers hold onto, not a transient
//! decode-time register.

const BITS_PER_WORD: usize = usize::BITS as usize;

/// A fixed-length, densely packed sequence of bits.
///
/// Bits beyond `size` are never observable through the public API, even
/// though the backing storage is rounded up to a whole number of words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    bits: Vec<usize>,
    size: usize,
}

#[inline(always)]
fn word_index(i: usize) -> usize {
    i / BITS_PER_WORD
}

#[inline(always)]
fn word_mask(i: usize) -> usize {
    1usize << (i % BITS_PER_WORD)
}

fn num_words_for(size: usize) -> usize {
    (size + BITS_PER_WORD - 1) / BITS_PER_WORD
}

impl BitArray {
    /// Create a new all-zero `BitArray` holding `size` bits.
    pub fn new(size: usize) -> Self {
        BitArray { bits: vec![0usize; num_words_for(size)], size }
    }

    /// The logical number of bits.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the bit at index `i`.
    ///
    /// # Panics
    /// Panics if `i >= size()`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.size, "BitArray index {} out of range {}", i, self.size);
        (self.bits[word_index(i)] & word_mask(i)) != 0
    }

    /// Sets the bit at index `i` to `1`.
    #[inline]
    pub fn set(&mut self, i: usize) {
        assert!(i < self.size, "BitArray index {} out of range {}", i, self.size);
        self.bits[word_index(i)] |= word_mask(i);
    }

    /// Flips the bit at index `i`.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.size, "BitArray index {} out of range {}", i, self.size);
        self.bits[word_index(i)] ^= word_mask(i);
    }

    /// Returns the index of the next set bit at or after `from`, or `size()`
    /// if there is none. Scans word-at-a-time so long runs of unset bits
    /// (common for 1D white-space runs) cost O(word count), not O(bit count).
    pub fn get_next_set(&self, from: usize) -> usize {
        if from >= self.size {
            return self.size;
        }

        let mut word_idx = word_index(from);
        let mut word = self.bits[word_idx] & !(word_mask(from).wrapping_sub(1));

        loop {
            if word != 0 {
                let result = word_idx * BITS_PER_WORD + word.trailing_zeros() as usize;
                return result.min(self.size);
            }
            word_idx += 1;
            if word_idx == self.bits.len() {
                return self.size;
            }
            word = self.bits[word_idx];
        }
    }

    /// Returns the index of the next unset bit at or after `from`, or
    /// `size()` if there is none. The mirror-image of [`Self::get_next_set`],
    /// used to find the end of a run of set modules.
    pub fn get_next_unset(&self, from: usize) -> usize {
        if from >= self.size {
            return self.size;
        }

        let mut word_idx = word_index(from);
        let mut word = !self.bits[word_idx] & !(word_mask(from).wrapping_sub(1));

        loop {
            if word != 0 {
                let result = word_idx * BITS_PER_WORD + word.trailing_zeros() as usize;
                return result.min(self.size);
            }
            word_idx += 1;
            if word_idx == self.bits.len() {
                return self.size;
            }
            word = !self.bits[word_idx];
        }
    }

    /// Reverses the bit order in place. An involution: `reverse(reverse(a))
    /// == a`.
    pub fn reverse(&mut self) {
        let mut new_bits = vec![0usize; self.bits.len()];
        for i in 0..self.size {
            if self.get(i) {
                let j = self.size - 1 - i;
                new_bits[word_index(j)] |= word_mask(j);
            }
        }
        self.bits = new_bits;
    }

    /// Debug rendering: `'1'`/`'0'` per bit, most significant (index 0)
    /// first.
    pub fn to_debug_string(&self) -> String {
        let mut s = String::with_capacity(self.size);
        for i in 0..self.size {
            s.push(if self.get(i) { '1' } else { '0' });
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut a = BitArray::new(40);
        for i in (0..40).step_by(3) {
            a.set(i);
        }
        for i in 0..40 {
            assert_eq!(a.get(i), i % 3 == 0, "index {}", i);
        }
    }

    #[test]
    fn flip_toggles() {
        let mut a = BitArray::new(8);
        assert!(!a.get(3));
        a.flip(3);
        assert!(a.get(3));
        a.flip(3);
        assert!(!a.get(3));
    }

    #[test]
    fn get_next_set_skips_runs() {
        let mut a = BitArray::new(100);
        a.set(5);
        a.set(70);
        assert_eq!(a.get_next_set(0), 5);
        assert_eq!(a.get_next_set(6), 70);
        assert_eq!(a.get_next_set(71), 100);
    }

    #[test]
    fn get_next_unset_skips_runs() {
        let mut a = BitArray::new(20);
        for i in 0..20 {
            a.set(i);
        }
        a.flip(12);
        assert_eq!(a.get_next_unset(0), 12);
        assert_eq!(a.get_next_unset(13), 20);
    }

    #[test]
    fn reverse_is_involution() {
        let mut a = BitArray::new(37);
        for i in [0usize, 1, 5, 36, 20, 21].iter() {
            a.set(*i);
        }
        let original = a.clone();
        a.reverse();
        assert_ne!(a, original);
        a.reverse();
        assert_eq!(a, original);
    }

    #[test]
    #[should_panic]
    fn out_of_range_get_panics() {
        let a = BitArray::new(4);
        a.get(4);
    }

    proptest::proptest! {
        #[test]
        fn reverse_is_involution_for_arbitrary_bitsets(
            size in 1usize..200,
            seed in proptest::prelude::any::<u64>(),
        ) {
            use rand::{Rng, SeedableRng};
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let mut a = BitArray::new(size);
            for i in 0..size {
                if rng.gen_bool(0.5) {
                    a.set(i);
                }
            }
            let original = a.clone();
            a.reverse();
            a.reverse();
            proptest::prop_assert_eq!(a, original);
        }
    }
}
