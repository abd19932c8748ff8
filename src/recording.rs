//! Per-timestep submission of the timed buffers and the spike set to a
//! recorder, with a shared count of submissions not yet acknowledged.
//!
//! The recorder is handed a borrowed view of a scratch buffer that the
//! pipeline rewrites on the next call. Recorders that finish asynchronously
//! must copy the bytes before returning. The pipeline never waits for the
//! outstanding count to drain; callers that need to know when all
//! submissions have landed poll [`OutstandingRecordings::count`].
//!
//! The outstanding count tracks acknowledgement only. It does not guard
//! buffer memory: overwriting a timed buffer while an earlier submission is
//! still in flight cannot corrupt that submission, because the recorder owns
//! its copy of the bytes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{out_spikes::SpikeSet, timed_buffer::TimedBuffers, types::Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingChannel {
    Spikes = 0,
    Voltage = 1,
    GsynExcitatory = 2,
    GsynInhibitory = 3,
}

impl RecordingChannel {
    pub const ALL: [RecordingChannel; 4] = [
        RecordingChannel::Spikes,
        RecordingChannel::Voltage,
        RecordingChannel::GsynExcitatory,
        RecordingChannel::GsynInhibitory,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingFlags(u32);

impl RecordingFlags {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        RecordingChannel::ALL
            .iter()
            .fold(Self::none(), |flags, channel| flags.with_channel(*channel))
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn with_channel(self, channel: RecordingChannel) -> Self {
        Self(self.0 | 1 << channel.index())
    }

    pub fn is_channel_enabled(self, channel: RecordingChannel) -> bool {
        self.0 & (1 << channel.index()) != 0
    }
}

/// Number of submissions handed to the recorder whose completion has not
/// fired yet. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct OutstandingRecordings(Arc<AtomicUsize>);

impl OutstandingRecordings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_drained(&self) -> bool {
        self.count() == 0
    }

    /// Counts one submission and returns the token that retires it.
    pub fn begin(&self) -> RecordingCompletion {
        self.0.fetch_add(1, Ordering::AcqRel);
        RecordingCompletion {
            counter: Some(self.0.clone()),
        }
    }
}

/// Retires exactly one outstanding submission, from whichever thread the
/// recorder finishes on. A token dropped without `complete` still retires its
/// submission.
#[must_use]
#[derive(Debug)]
pub struct RecordingCompletion {
    counter: Option<Arc<AtomicUsize>>,
}

impl RecordingCompletion {
    pub fn complete(mut self) {
        self.retire();
    }

    fn retire(&mut self) {
        if let Some(counter) = self.counter.take() {
            counter.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

impl Drop for RecordingCompletion {
    fn drop(&mut self) {
        if self.counter.is_some() {
            log::warn!("Recording completion dropped before completing");
            self.retire();
        }
    }
}

/// Receives recording submissions.
pub trait Recorder {
    /// `bytes` is only valid for the duration of the call.
    fn record_and_notify(
        &mut self,
        channel: RecordingChannel,
        bytes: &[u8],
        completion: RecordingCompletion,
    );

    fn record_spike_channel(
        &mut self,
        channel: RecordingChannel,
        time: Time,
        spikes: &SpikeSet,
        completion: RecordingCompletion,
    ) {
        let mut bytes = Vec::new();
        spikes.encode_timed(time, &mut bytes);
        self.record_and_notify(channel, &bytes, completion);
    }
}

pub struct RecordingPipeline {
    flags: RecordingFlags,
    outstanding: OutstandingRecordings,
    scratch: Vec<u8>,
}

impl RecordingPipeline {
    pub fn new(flags: RecordingFlags) -> Self {
        Self {
            flags,
            outstanding: OutstandingRecordings::new(),
            scratch: Vec::new(),
        }
    }

    pub fn flags(&self) -> RecordingFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: RecordingFlags) {
        self.flags = flags;
    }

    pub fn outstanding(&self) -> &OutstandingRecordings {
        &self.outstanding
    }

    /// Submits the enabled channels for timestep `time`: voltage, excitatory
    /// input, inhibitory input, then spikes if any neuron fired.
    pub fn do_recording<R: Recorder + ?Sized>(
        &mut self,
        time: Time,
        buffers: &mut TimedBuffers,
        spikes: &SpikeSet,
        recorder: &mut R,
    ) {
        let timed = [
            (RecordingChannel::Voltage, &mut buffers.voltages),
            (RecordingChannel::GsynExcitatory, &mut buffers.inputs_excitatory),
            (RecordingChannel::GsynInhibitory, &mut buffers.inputs_inhibitory),
        ];

        for (channel, buffer) in timed {
            if !self.flags.is_channel_enabled(channel) {
                continue;
            }

            buffer.set_time(time);
            buffer.encode_into(&mut self.scratch);
            let completion = self.outstanding.begin();
            log::debug!("t={} recording {:?}, {} bytes", time, channel, self.scratch.len());
            recorder.record_and_notify(channel, &self.scratch, completion);
        }

        if self.flags.is_channel_enabled(RecordingChannel::Spikes) && !spikes.is_empty() {
            let completion = self.outstanding.begin();
            log::debug!("t={} recording {} spikes", time, spikes.count());
            recorder.record_spike_channel(RecordingChannel::Spikes, time, spikes, completion);
        }
    }
}
