//! Timestamped per-neuron snapshots handed to the recorder.
//!
//! Wire format, little-endian: one `u32` time followed by one 4-byte sample
//! per neuron. The byte size is fixed once the buffer is allocated.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ArrayKind, CoreResult},
    memory::Dtcm,
    types::{Real, Time, WORD_BYTES},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBuffer {
    time: Time,
    values: Vec<Real>,
}

impl TimedBuffer {
    pub fn byte_size_for(n_neurons: usize) -> usize {
        WORD_BYTES + n_neurons * std::mem::size_of::<Real>()
    }

    pub fn allocate(what: ArrayKind, n_neurons: usize, dtcm: &mut Dtcm) -> CoreResult<Self> {
        let values =
            dtcm.allocate_with_header(what, WORD_BYTES, n_neurons, std::mem::size_of::<Real>(), 0.0)?;
        Ok(Self { time: 0, values })
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<Real> {
        self.values.get(index).copied()
    }

    /// Callers index with a neuron index already checked against the store.
    pub fn set(&mut self, index: usize, value: Real) {
        self.values[index] = value;
    }

    pub fn byte_size(&self) -> usize {
        Self::byte_size_for(self.values.len())
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.byte_size());
        out.extend_from_slice(&self.time.to_le_bytes());
        for value in &self.values {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Parses a buffer produced by [`TimedBuffer::encode_into`].
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < WORD_BYTES || (bytes.len() - WORD_BYTES) % WORD_BYTES != 0 {
            return None;
        }

        let mut words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3]]);

        let time = Time::from_le_bytes(words.next()?);
        let values = words.map(Real::from_le_bytes).collect();

        Some(Self { time, values })
    }
}

/// The three snapshot buffers captured by every timestep update.
#[derive(Debug, Clone)]
pub struct TimedBuffers {
    pub voltages: TimedBuffer,
    pub inputs_excitatory: TimedBuffer,
    pub inputs_inhibitory: TimedBuffer,
}

impl TimedBuffers {
    pub fn allocate(n_neurons: usize, dtcm: &mut Dtcm) -> CoreResult<Self> {
        Ok(Self {
            voltages: TimedBuffer::allocate(ArrayKind::VoltageBuffer, n_neurons, dtcm)?,
            inputs_excitatory: TimedBuffer::allocate(ArrayKind::ExcitatoryBuffer, n_neurons, dtcm)?,
            inputs_inhibitory: TimedBuffer::allocate(ArrayKind::InhibitoryBuffer, n_neurons, dtcm)?,
        })
    }
}
