use crate::types::Time;

const BITS_PER_WORD: usize = 32;

/// One bit per neuron, set when that neuron spiked in the current timestep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpikeSet {
    n_neurons: usize,
    words: Vec<u32>,
}

impl SpikeSet {
    pub fn new(n_neurons: usize) -> Self {
        Self {
            n_neurons,
            words: vec![0; Self::n_words(n_neurons)],
        }
    }

    pub fn n_words(n_neurons: usize) -> usize {
        (n_neurons + BITS_PER_WORD - 1) / BITS_PER_WORD
    }

    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn reset(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    pub fn set_spike(&mut self, neuron_index: usize) {
        if let Some(word) = self.words.get_mut(neuron_index / BITS_PER_WORD) {
            *word |= 1 << (neuron_index % BITS_PER_WORD);
        }
    }

    pub fn is_spike(&self, neuron_index: usize) -> bool {
        self.words
            .get(neuron_index / BITS_PER_WORD)
            .map_or(false, |word| word & (1 << (neuron_index % BITS_PER_WORD)) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Indices of the spiking neurons in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_neurons).filter(|index| self.is_spike(*index))
    }

    /// Little-endian `u32` time followed by the bit words.
    pub fn encode_timed(&self, time: Time, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(4 * (1 + self.words.len()));
        out.extend_from_slice(&time.to_le_bytes());
        for word in &self.words {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }
}
