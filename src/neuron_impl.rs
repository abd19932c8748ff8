//! Compile-time composition of the four model families into one neuron
//! implementation.

use crate::{
    additional_input::{AdditionalInput, AdditionalInputCa2Adaptive, AdditionalInputNone},
    input_type::{InputType, InputTypeConductance, InputTypeCurrent},
    neuron_model::{IzhikevichNeuron, LifNeuron, NeuronModel},
    record::WordRecord,
    threshold_type::{ThresholdType, ThresholdTypeStatic},
};

pub trait NeuronImpl {
    type Model: NeuronModel;
    type Input: InputType;
    type AdditionalInput: AdditionalInput;
    type Threshold: ThresholdType;
}

pub type GlobalParams<N> = <<N as NeuronImpl>::Model as NeuronModel>::Global;

/// Total number of configuration words for `n_neurons` neurons.
pub fn required_words<N: NeuronImpl>(n_neurons: usize) -> usize {
    <GlobalParams<N> as WordRecord>::WORDS
        + n_neurons
            * (<N::Model as WordRecord>::WORDS
                + <N::Input as WordRecord>::WORDS
                + <N::AdditionalInput as WordRecord>::WORDS
                + <N::Threshold as WordRecord>::WORDS)
}

/// Leaky integrate-and-fire, current input, exponential synapses.
pub struct LifCurrExp;

impl NeuronImpl for LifCurrExp {
    type Model = LifNeuron;
    type Input = InputTypeCurrent;
    type AdditionalInput = AdditionalInputNone;
    type Threshold = ThresholdTypeStatic;
}

/// Leaky integrate-and-fire, conductance input, exponential synapses.
pub struct LifCondExp;

impl NeuronImpl for LifCondExp {
    type Model = LifNeuron;
    type Input = InputTypeConductance;
    type AdditionalInput = AdditionalInputNone;
    type Threshold = ThresholdTypeStatic;
}

/// Leaky integrate-and-fire with calcium-based spike-frequency adaptation.
pub struct LifCurrExpCa2Adaptive;

impl NeuronImpl for LifCurrExpCa2Adaptive {
    type Model = LifNeuron;
    type Input = InputTypeCurrent;
    type AdditionalInput = AdditionalInputCa2Adaptive;
    type Threshold = ThresholdTypeStatic;
}

pub struct IzkCurrExp;

impl NeuronImpl for IzkCurrExp {
    type Model = IzhikevichNeuron;
    type Input = InputTypeCurrent;
    type AdditionalInput = AdditionalInputNone;
    type Threshold = ThresholdTypeStatic;
}
