//! Synaptic shaping: accumulates weighted input per neuron into excitatory
//! and inhibitory values read once per timestep by the update engine.
//!
//! The shaping records belong to the synaptic input subsystem; the core only
//! borrows them for the duration of an update.

use crate::{params::ExpSynapseParams, types::Real, util::get_decay_factor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynapseType {
    Excitatory,
    Inhibitory,
}

pub trait SynapseShaping {
    fn get_excitatory_input(&self) -> Real;

    fn get_inhibitory_input(&self) -> Real;

    fn add_neuron_input(&mut self, synapse_type: SynapseType, weight: Real);

    /// Applies one timestep of decay.
    fn shape_input(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecayTerm {
    pub decay: Real,
    pub init: Real,
}

impl DecayTerm {
    pub fn new(tau_ms: Real, timestep_ms: Real) -> Self {
        let decay = get_decay_factor(timestep_ms, tau_ms);
        Self {
            decay,
            init: (tau_ms / timestep_ms) * (1.0 - decay),
        }
    }
}

/// Single exponential decay on each input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExponentialShaping {
    pub exc: DecayTerm,
    pub inh: DecayTerm,
    pub input_exc: Real,
    pub input_inh: Real,
}

impl ExponentialShaping {
    pub fn new(syn_params: &ExpSynapseParams, timestep_ms: Real) -> Self {
        Self {
            exc: DecayTerm::new(syn_params.tau_syn_e, timestep_ms),
            inh: DecayTerm::new(syn_params.tau_syn_i, timestep_ms),
            input_exc: 0.0,
            input_inh: 0.0,
        }
    }
}

impl SynapseShaping for ExponentialShaping {
    fn get_excitatory_input(&self) -> Real {
        self.input_exc
    }

    fn get_inhibitory_input(&self) -> Real {
        self.input_inh
    }

    fn add_neuron_input(&mut self, synapse_type: SynapseType, weight: Real) {
        match synapse_type {
            SynapseType::Excitatory => self.input_exc += weight * self.exc.init,
            SynapseType::Inhibitory => self.input_inh += weight * self.inh.init,
        }
    }

    fn shape_input(&mut self) {
        self.input_exc *= self.exc.decay;
        self.input_inh *= self.inh.decay;
    }
}

/// Shaping values set directly, one timestep at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedInput {
    pub exc: Real,
    pub inh: Real,
}

impl SynapseShaping for FixedInput {
    fn get_excitatory_input(&self) -> Real {
        self.exc
    }

    fn get_inhibitory_input(&self) -> Real {
        self.inh
    }

    fn add_neuron_input(&mut self, synapse_type: SynapseType, weight: Real) {
        match synapse_type {
            SynapseType::Excitatory => self.exc += weight,
            SynapseType::Inhibitory => self.inh += weight,
        }
    }

    fn shape_input(&mut self) {
        self.exc = 0.0;
        self.inh = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn exponential_add_and_decay() {
        let params = ExpSynapseParams {
            tau_syn_e: 5.0,
            tau_syn_i: 10.0,
        };
        let mut sut = ExponentialShaping::new(&params, 1.0);

        let decay_e = (-0.2f32).exp();
        let init_e = 5.0 * (1.0 - decay_e);
        assert_approx_eq!(f32, sut.exc.decay, decay_e);
        assert_approx_eq!(f32, sut.exc.init, init_e);

        sut.add_neuron_input(SynapseType::Excitatory, 2.0);
        sut.add_neuron_input(SynapseType::Inhibitory, 1.0);
        assert_approx_eq!(f32, sut.get_excitatory_input(), 2.0 * init_e);
        assert_approx_eq!(f32, sut.get_inhibitory_input(), sut.inh.init);

        sut.shape_input();
        assert_approx_eq!(f32, sut.get_excitatory_input(), 2.0 * init_e * decay_e);
    }

    #[test]
    fn fixed_input_clears_on_shape() {
        let mut sut = FixedInput { exc: 0.6, inh: 0.3 };
        sut.add_neuron_input(SynapseType::Excitatory, 0.1);
        assert_approx_eq!(f32, sut.get_excitatory_input(), 0.7);
        sut.shape_input();
        assert_approx_eq!(f32, sut.get_excitatory_input(), 0.0);
        assert_approx_eq!(f32, sut.get_inhibitory_input(), 0.0);
    }
}
