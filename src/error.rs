use std::fmt;

use simple_error::SimpleError;
use thiserror::Error;

/// Identifies one of the arrays owned by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    GlobalParameters,
    NeuronState,
    InputType,
    AdditionalInput,
    Threshold,
    VoltageBuffer,
    ExcitatoryBuffer,
    InhibitoryBuffer,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayKind::GlobalParameters => "global neuron parameters",
            ArrayKind::NeuronState => "neuron array",
            ArrayKind::InputType => "input type array",
            ArrayKind::AdditionalInput => "additional input array",
            ArrayKind::Threshold => "threshold type array",
            ArrayKind::VoltageBuffer => "voltage recording buffer",
            ArrayKind::ExcitatoryBuffer => "excitatory input recording buffer",
            ArrayKind::InhibitoryBuffer => "inhibitory input recording buffer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unable to allocate {array} ({requested_bytes} bytes requested, {available_bytes} available)")]
    OutOfMemory {
        array: ArrayKind,
        requested_bytes: usize,
        available_bytes: usize,
    },

    #[error("configuration blob too short for {section}: {needed_words} words needed, {available_words} available")]
    MalformedConfig {
        section: ArrayKind,
        needed_words: usize,
        available_words: usize,
    },

    #[error("neuron index {index} out of range for {n_neurons} neurons")]
    IndexOutOfRange { index: usize, n_neurons: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] SimpleError),
}

pub type CoreResult<T> = Result<T, CoreError>;
