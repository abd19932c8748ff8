//! Fixed-size records addressed in 4-byte words.
//!
//! Every per-neuron state type and every global parameter type is laid out
//! as a whole number of words so the configuration blob can be consumed as a
//! flat `u32` slice.

use std::fmt::Debug;

use crate::types::{Real, WORD_BYTES};

pub trait WordRecord: Clone + Default + Debug {
    /// Number of words one record occupies. Zero means the record carries no
    /// state and is never allocated or read.
    const WORDS: usize;

    fn read_words(reader: &mut WordReader<'_>) -> Self;

    fn write_words(&self, writer: &mut WordWriter<'_>);

    fn byte_size() -> usize {
        Self::WORDS * WORD_BYTES
    }
}

pub struct WordReader<'a> {
    words: &'a [u32],
    pos: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, pos: 0 }
    }

    pub fn next_u32(&mut self) -> u32 {
        debug_assert!(self.pos < self.words.len(), "record read past its words");
        let word = self.words.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        word
    }

    pub fn next_i32(&mut self) -> i32 {
        self.next_u32() as i32
    }

    pub fn next_real(&mut self) -> Real {
        Real::from_bits(self.next_u32())
    }

    pub fn words_read(&self) -> usize {
        self.pos
    }
}

pub struct WordWriter<'a> {
    words: &'a mut [u32],
    pos: usize,
}

impl<'a> WordWriter<'a> {
    pub fn new(words: &'a mut [u32]) -> Self {
        Self { words, pos: 0 }
    }

    pub fn put_u32(&mut self, word: u32) {
        debug_assert!(self.pos < self.words.len(), "record written past its words");
        if let Some(slot) = self.words.get_mut(self.pos) {
            *slot = word;
        }
        self.pos += 1;
    }

    pub fn put_i32(&mut self, value: i32) {
        self.put_u32(value as u32);
    }

    pub fn put_real(&mut self, value: Real) {
        self.put_u32(value.to_bits());
    }

    pub fn words_written(&self) -> usize {
        self.pos
    }
}

/// Appends `records` to `blob` in their word layout.
pub fn pack_records<R: WordRecord>(records: &[R], blob: &mut Vec<u32>) {
    for record in records {
        let start = blob.len();
        blob.resize(start + R::WORDS, 0);
        record.write_words(&mut WordWriter::new(&mut blob[start..]));
    }
}

/// Declares a unit record type for a model family that carries no state.
macro_rules! stateless_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl $crate::record::WordRecord for $name {
            const WORDS: usize = 0;

            fn read_words(_reader: &mut $crate::record::WordReader<'_>) -> Self {
                $name
            }

            fn write_words(&self, _writer: &mut $crate::record::WordWriter<'_>) {}
        }
    };
}

pub(crate) use stateless_record;

#[cfg(test)]
mod tests {
    use super::{WordReader, WordRecord, WordWriter};
    use float_cmp::assert_approx_eq;

    #[test]
    fn mixed_words() {
        let mut words = [0u32; 3];
        let mut writer = WordWriter::new(&mut words);
        writer.put_real(-65.5);
        writer.put_i32(-3);
        writer.put_u32(7);
        assert_eq!(writer.words_written(), 3);

        let mut reader = WordReader::new(&words);
        assert_approx_eq!(f32, reader.next_real(), -65.5);
        assert_eq!(reader.next_i32(), -3);
        assert_eq!(reader.next_u32(), 7);
        assert_eq!(reader.words_read(), 3);
    }

    #[derive(Debug, Clone, Default)]
    struct Pair(u32, u32);

    impl WordRecord for Pair {
        const WORDS: usize = 2;

        fn read_words(reader: &mut WordReader<'_>) -> Self {
            Pair(reader.next_u32(), reader.next_u32())
        }

        fn write_words(&self, writer: &mut WordWriter<'_>) {
            writer.put_u32(self.0);
            writer.put_u32(self.1);
        }
    }

    #[test]
    fn pack_appends() {
        let mut blob = vec![9];
        super::pack_records(&[Pair(1, 2), Pair(3, 4)], &mut blob);
        super::pack_records::<Nothing>(&[Nothing, Nothing], &mut blob);
        assert_eq!(blob, [9, 1, 2, 3, 4]);
    }

    super::stateless_record!(Nothing);

    #[test]
    fn stateless_record_has_no_size() {
        assert_eq!(Nothing::WORDS, 0);
        assert_eq!(Nothing::byte_size(), 0);
        assert_eq!(std::mem::size_of::<Nothing>(), 0);
    }
}
