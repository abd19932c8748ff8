use std::collections::VecDeque;

use crate::{
    types::{Real, Time},
    util::get_decay_factor_between,
};

/// Synapse-side plasticity as seen from the neuron update.
pub trait SynapseDynamics {
    fn get_intrinsic_bias(&self, time: Time, neuron_index: usize) -> Real;

    fn process_post_synaptic_event(&mut self, time: Time, neuron_index: usize);
}

/// Static synapses: no bias, nothing to track.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSynapseDynamics;

impl SynapseDynamics for StaticSynapseDynamics {
    fn get_intrinsic_bias(&self, _time: Time, _neuron_index: usize) -> Real {
        0.0
    }

    fn process_post_synaptic_event(&mut self, _time: Time, _neuron_index: usize) {}
}

/// Keeps the recent post-synaptic spike times of every neuron, the history a
/// spike-timing dependent rule pairs pre-synaptic arrivals against.
#[derive(Debug, Clone)]
pub struct PostSynapticHistory {
    histories: Vec<VecDeque<Time>>,
    t_cutoff: Time,
}

impl PostSynapticHistory {
    pub fn new(n_neurons: usize, t_cutoff: Time) -> Self {
        Self {
            histories: vec![VecDeque::new(); n_neurons],
            t_cutoff,
        }
    }

    pub fn last_spike_t(&self, neuron_index: usize) -> Option<Time> {
        self.histories
            .get(neuron_index)
            .and_then(|history| history.back().copied())
    }

    pub fn recent_spikes(&self, neuron_index: usize) -> impl Iterator<Item = Time> + '_ {
        self.histories
            .get(neuron_index)
            .into_iter()
            .flat_map(|history| history.iter().copied())
    }

    /// Sum of exponentially decayed post-synaptic spikes, as seen at `t`.
    pub fn trace(&self, t: Time, neuron_index: usize, tau: Real) -> Real {
        self.recent_spikes(neuron_index)
            .filter(|spike_t| *spike_t <= t)
            .map(|spike_t| get_decay_factor_between(t, spike_t, tau))
            .sum()
    }

    fn discard_stale(history: &mut VecDeque<Time>, t: Time, t_cutoff: Time) {
        while let Some(spike_t) = history.front() {
            if spike_t.saturating_add(t_cutoff) < t {
                history.pop_front();
            } else {
                break;
            }
        }
    }
}

impl SynapseDynamics for PostSynapticHistory {
    fn get_intrinsic_bias(&self, _time: Time, _neuron_index: usize) -> Real {
        0.0
    }

    fn process_post_synaptic_event(&mut self, time: Time, neuron_index: usize) {
        let t_cutoff = self.t_cutoff;
        if let Some(history) = self.histories.get_mut(neuron_index) {
            Self::discard_stale(history, time, t_cutoff);
            history.push_back(time);
        }
    }
}
