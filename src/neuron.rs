use crate::{
    additional_input::AdditionalInput,
    error::{CoreError, CoreResult},
    input_type::InputType,
    loader,
    memory::Dtcm,
    neuron_impl::NeuronImpl,
    neuron_model::NeuronModel,
    out_spikes::SpikeSet,
    parameter_store::ParameterStore,
    synapse_dynamics::SynapseDynamics,
    synapse_types::{SynapseShaping, SynapseType},
    threshold_type::ThresholdType,
    timed_buffer::TimedBuffers,
    types::{Real, Time},
};

/// Parameter store, timed buffers and spike set of one neuron population,
/// and the per-neuron update that ties them together.
pub struct NeuronCore<N: NeuronImpl> {
    store: ParameterStore<N>,
    buffers: TimedBuffers,
    spikes: SpikeSet,
}

impl<N: NeuronImpl> NeuronCore<N> {
    pub fn initialise(n_neurons: usize, dtcm: &mut Dtcm) -> CoreResult<Self> {
        let store = ParameterStore::initialize(n_neurons, dtcm)?;
        let buffers = TimedBuffers::allocate(n_neurons, dtcm)?;

        Ok(Self {
            store,
            buffers,
            spikes: SpikeSet::new(n_neurons),
        })
    }

    pub fn load_neuron_parameters(&mut self, blob: &[u32], cursor: usize) -> CoreResult<usize> {
        loader::load(&mut self.store, blob, cursor)
    }

    pub fn store_neuron_parameters(&self, blob: &mut [u32], cursor: usize) -> CoreResult<usize> {
        loader::store(&self.store, blob, cursor)
    }

    pub fn n_neurons(&self) -> usize {
        self.store.n_neurons()
    }

    pub fn store(&self) -> &ParameterStore<N> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore<N> {
        &mut self.store
    }

    pub fn buffers(&self) -> &TimedBuffers {
        &self.buffers
    }

    pub fn spikes(&self) -> &SpikeSet {
        &self.spikes
    }

    /// Buffers and spike set together, as the recording pipeline needs them.
    pub fn recording_parts(&mut self) -> (&mut TimedBuffers, &SpikeSet) {
        (&mut self.buffers, &self.spikes)
    }

    pub fn reset_spikes(&mut self) {
        self.spikes.reset();
    }

    pub fn get_membrane_voltage(&self, neuron_index: usize) -> CoreResult<Real> {
        Ok(self.store.neuron(neuron_index)?.get_membrane_voltage())
    }

    pub fn add_inputs<S: SynapseShaping>(
        synapse_type: SynapseType,
        shaping: &mut S,
        weight: Real,
    ) {
        shaping.add_neuron_input(synapse_type, weight);
    }

    /// Advances neuron `neuron_index` by one timestep. Returns whether it
    /// spiked.
    pub fn do_timestep_update<S: SynapseShaping, D: SynapseDynamics + ?Sized>(
        &mut self,
        time: Time,
        neuron_index: usize,
        synapse_shaping: &[S],
        synapse_dynamics: &mut D,
    ) -> CoreResult<bool> {
        let shaping = synapse_shaping
            .get(neuron_index)
            .ok_or(CoreError::IndexOutOfRange {
                index: neuron_index,
                n_neurons: synapse_shaping.len(),
            })?;

        let parts = self.store.parts_mut(neuron_index)?;

        let voltage = parts.neuron.get_membrane_voltage();
        self.buffers.voltages.set(neuron_index, voltage);

        let exc_value = shaping.get_excitatory_input();
        let inh_value = shaping.get_inhibitory_input();

        let exc_input = parts.input_type.get_input_value(exc_value);
        let inh_input = parts.input_type.get_input_value(inh_value);

        self.buffers.inputs_excitatory.set(neuron_index, exc_input);
        self.buffers.inputs_inhibitory.set(neuron_index, inh_input);

        let exc_current = parts
            .input_type
            .convert_excitatory_input_to_current(exc_input, voltage);
        let inh_current = parts
            .input_type
            .convert_inhibitory_input_to_current(inh_input, voltage);

        let external_bias = synapse_dynamics.get_intrinsic_bias(time, neuron_index)
            + parts.additional_input.get_input_value_as_current(voltage);

        let result = parts
            .neuron
            .state_update(parts.global, exc_current, inh_current, external_bias);

        let spike = parts.threshold.is_above_threshold(result);

        if spike {
            log::trace!("neuron {} spiked at t={}", neuron_index, time);
            parts.neuron.has_spiked(parts.global);
            parts.additional_input.has_spiked();
            synapse_dynamics.process_post_synaptic_event(time, neuron_index);
            self.spikes.set_spike(neuron_index);
        }

        Ok(spike)
    }

    /// Clears the spike set and updates every neuron in index order. Returns
    /// the indices that spiked.
    pub fn do_timestep<S: SynapseShaping, D: SynapseDynamics + ?Sized>(
        &mut self,
        time: Time,
        synapse_shaping: &[S],
        synapse_dynamics: &mut D,
    ) -> CoreResult<Vec<usize>> {
        self.spikes.reset();

        let mut spiking_nids = Vec::new();
        for neuron_index in 0..self.n_neurons() {
            if self.do_timestep_update(time, neuron_index, synapse_shaping, synapse_dynamics)? {
                spiking_nids.push(neuron_index);
            }
        }

        Ok(spiking_nids)
    }

    pub fn print_state_variables(&self, neuron_index: usize) -> CoreResult<()> {
        self.store.neuron(neuron_index)?.print_state_variables();
        Ok(())
    }

    pub fn print_parameters(&self, neuron_index: usize) -> CoreResult<()> {
        self.store.neuron(neuron_index)?.print_parameters();
        Ok(())
    }
}
