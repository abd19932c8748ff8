//! Recorder backends.

use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    sync::mpsc::{channel as mpsc_channel, Sender as MpscSender},
    thread::{self, JoinHandle},
};

use crate::{
    recording::{Recorder, RecordingChannel, RecordingCompletion},
    types::HashMap,
};

/// Keeps a copy of every submission in memory and acknowledges it after
/// `latency` calls to [`DeferredRecorder::advance`].
#[derive(Debug, Default)]
pub struct DeferredRecorder {
    latency: usize,
    pending: VecDeque<(usize, RecordingCompletion)>,
    records: HashMap<RecordingChannel, Vec<Vec<u8>>>,
    age: usize,
}

impl DeferredRecorder {
    pub fn new(latency: usize) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    /// Moves time forward by one step and completes what has become due.
    pub fn advance(&mut self) {
        self.age += 1;
        while let Some((due, _)) = self.pending.front() {
            if *due > self.age {
                break;
            }
            if let Some((_, completion)) = self.pending.pop_front() {
                completion.complete();
            }
        }
    }

    pub fn flush(&mut self) {
        self.pending
            .drain(..)
            .for_each(|(_, completion)| completion.complete());
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn records(&self, channel: RecordingChannel) -> &[Vec<u8>] {
        self.records
            .get(&channel)
            .map_or(&[][..], |records| records.as_slice())
    }
}

impl Recorder for DeferredRecorder {
    fn record_and_notify(
        &mut self,
        channel: RecordingChannel,
        bytes: &[u8],
        completion: RecordingCompletion,
    ) {
        self.records.entry(channel).or_default().push(bytes.to_vec());

        if self.latency == 0 {
            completion.complete();
        } else {
            self.pending.push_back((self.age + self.latency, completion));
        }
    }
}

struct RecordMessage {
    channel: RecordingChannel,
    bytes: Vec<u8>,
    completion: RecordingCompletion,
}

/// Writes framed submissions to a sink on a dedicated thread. Each frame is
/// `u32 channel | u32 length | bytes`, little-endian.
pub struct ThreadedRecorder<W: Write + Send + 'static> {
    record_tx: Option<MpscSender<RecordMessage>>,
    join_handle: Option<JoinHandle<io::Result<W>>>,
}

impl<W: Write + Send + 'static> ThreadedRecorder<W> {
    pub fn spawn(mut sink: W) -> Self {
        let (record_tx, record_rx) = mpsc_channel::<RecordMessage>();

        let join_handle = thread::spawn(move || {
            while let Ok(message) = record_rx.recv() {
                write_frame(&mut sink, message.channel, &message.bytes)?;
                message.completion.complete();
            }
            sink.flush()?;
            Ok(sink)
        });

        Self {
            record_tx: Some(record_tx),
            join_handle: Some(join_handle),
        }
    }

    /// Waits for all queued records to be written and hands back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        drop(self.record_tx.take());
        match self.join_handle.take() {
            Some(join_handle) => join_handle
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "recorder thread panicked"))?,
            None => Err(io::Error::new(io::ErrorKind::Other, "recorder already finished")),
        }
    }
}

impl<W: Write + Send + 'static> Recorder for ThreadedRecorder<W> {
    fn record_and_notify(
        &mut self,
        channel: RecordingChannel,
        bytes: &[u8],
        completion: RecordingCompletion,
    ) {
        let message = RecordMessage {
            channel,
            bytes: bytes.to_vec(),
            completion,
        };

        let sent = self
            .record_tx
            .as_ref()
            .map(|record_tx| record_tx.send(message));

        if !matches!(sent, Some(Ok(()))) {
            // the returned message, and with it the completion, is dropped here
            log::warn!("Recorder thread gone, {:?} record lost", channel);
        }
    }
}

impl<W: Write + Send + 'static> Drop for ThreadedRecorder<W> {
    fn drop(&mut self) {
        drop(self.record_tx.take()); // ends the writer loop

        if let Some(join_handle) = self.join_handle.take() {
            join_handle.join().ok();
        }
    }
}

fn write_frame<W: Write>(sink: &mut W, channel: RecordingChannel, bytes: &[u8]) -> io::Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "record too large"))?;
    sink.write_all(&channel.index().to_le_bytes())?;
    sink.write_all(&len.to_le_bytes())?;
    sink.write_all(bytes)
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<Option<u32>> {
    let mut word = [0u8; 4];
    let mut filled = 0;
    while filled < word.len() {
        match reader.read(&mut word[filled..])? {
            0 if filled == 0 => return Ok(None),
            0 => return Err(io::ErrorKind::UnexpectedEof.into()),
            n => filled += n,
        }
    }
    Ok(Some(u32::from_le_bytes(word)))
}

/// Parses a stream written by [`ThreadedRecorder`].
pub fn read_records<R: Read>(mut reader: R) -> io::Result<Vec<(RecordingChannel, Vec<u8>)>> {
    let mut records = Vec::new();

    while let Some(channel_index) = read_u32(&mut reader)? {
        let channel = RecordingChannel::from_index(channel_index).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown recording channel {}", channel_index),
            )
        })?;
        let len = read_u32(&mut reader)?.ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        let mut bytes = vec![0; len as usize];
        reader.read_exact(&mut bytes)?;
        records.push((channel, bytes));
    }

    Ok(records)
}
