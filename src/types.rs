use rustc_hash::FxHashMap;

pub type HashMap<K, V> = FxHashMap<K, V>;

/// Scalar used by every per-neuron record and timed buffer.
pub type Real = f32;

/// Simulation time in timesteps, as stamped into recordings.
pub type Time = u32;

pub const WORD_BYTES: usize = 4;
