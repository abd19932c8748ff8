use simple_error::SimpleError;

use crate::{
    error::CoreResult,
    memory::Dtcm,
    neuron::NeuronCore,
    neuron_impl::NeuronImpl,
    params::{self, CoreParams},
    recording::{OutstandingRecordings, Recorder, RecordingPipeline},
    synapse_dynamics::SynapseDynamics,
    synapse_types::SynapseShaping,
    types::{Real, Time},
};

/// Validates `params`, allocates the population and loads its parameters from
/// `blob` starting at word `cursor`.
pub fn create_instance<N: NeuronImpl>(
    params: &CoreParams,
    blob: &[u32],
    cursor: usize,
) -> CoreResult<Instance<N>> {
    params::validate_core_params(params)
        .map_err(|err| SimpleError::with("invalid core parameters", err))?;

    let mut dtcm = Dtcm::new(params.technical_params.dtcm_bytes);
    let mut core = NeuronCore::initialise(params.num_neurons, &mut dtcm)?;
    let next_cursor = core.load_neuron_parameters(blob, cursor)?;

    log::info!(
        "Instance ready: {} neurons, {} of {} bytes used, parameters end at word {}",
        params.num_neurons,
        dtcm.used(),
        dtcm.capacity(),
        next_cursor
    );

    Ok(Instance {
        core,
        pipeline: RecordingPipeline::new(params.recording_params.flags()),
        dtcm,
        timestep_ms: params.timestep_ms,
        tick_period: 0,
    })
}

#[derive(Debug)]
pub struct TickResult {
    pub t: Time,
    pub spiking_nids: Vec<usize>,
}

pub struct Instance<N: NeuronImpl> {
    core: NeuronCore<N>,
    pipeline: RecordingPipeline,
    dtcm: Dtcm,
    timestep_ms: Real,
    tick_period: Time,
}

impl<N: NeuronImpl> Instance<N> {
    pub fn get_num_neurons(&self) -> usize {
        self.core.n_neurons()
    }

    pub fn get_tick_period(&self) -> Time {
        self.tick_period
    }

    pub fn get_timestep_ms(&self) -> Real {
        self.timestep_ms
    }

    pub fn core(&self) -> &NeuronCore<N> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut NeuronCore<N> {
        &mut self.core
    }

    pub fn dtcm(&self) -> &Dtcm {
        &self.dtcm
    }

    /// Shared handle on the count of recordings still in flight.
    pub fn recording_counter(&self) -> OutstandingRecordings {
        self.pipeline.outstanding().clone()
    }

    pub fn outstanding_recordings(&self) -> usize {
        self.pipeline.outstanding().count()
    }

    /// Updates every neuron, then submits this timestep's recordings.
    pub fn tick<S, D, R>(
        &mut self,
        synapse_shaping: &[S],
        synapse_dynamics: &mut D,
        recorder: &mut R,
    ) -> CoreResult<TickResult>
    where
        S: SynapseShaping,
        D: SynapseDynamics + ?Sized,
        R: Recorder + ?Sized,
    {
        let t = self.tick_period;
        let spiking_nids = self.core.do_timestep(t, synapse_shaping, synapse_dynamics)?;

        let (buffers, spikes) = self.core.recording_parts();
        self.pipeline.do_recording(t, buffers, spikes, recorder);

        self.tick_period += 1;

        Ok(TickResult { t, spiking_nids })
    }

    /// Writes the current parameter state back in load order.
    pub fn store_parameters(&self, blob: &mut [u32], cursor: usize) -> CoreResult<usize> {
        self.core.store_neuron_parameters(blob, cursor)
    }
}
