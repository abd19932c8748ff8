use neurocore::{
    instance,
    neuron_impl::LifCurrExp,
    recorder::DeferredRecorder,
    recording::RecordingChannel,
    synapse_dynamics::PostSynapticHistory,
    synapse_types::{SynapseShaping, SynapseType},
    timed_buffer::TimedBuffer,
};
use rand::{prelude::Distribution, rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;
use statrs::distribution::Poisson;

#[path = "../scenario_params.rs"]
mod scenario_params;

#[derive(Debug, Serialize)]
struct ChecksumSummary {
    spike_count: usize,
    neuron_checksum: u64,
    voltage_checksum: f64,
    spike_records: usize,
    voltage_records: usize,
    parameter_checksum: u64,
}

fn main() {
    let scenario = scenario_params::get_scenario_params();
    scenario_params::validate_scenario_params(&scenario);

    let blob = scenario_params::build_blob(&scenario);
    let mut instance =
        instance::create_instance::<LifCurrExp>(&scenario.core_params, &blob, 0).unwrap();

    let n_neurons = scenario.core_params.num_neurons;
    let mut shaping = scenario_params::build_shaping(&scenario);
    let mut dynamics = PostSynapticHistory::new(n_neurons, 50);
    let mut recorder =
        DeferredRecorder::new(scenario.core_params.technical_params.recording_latency);

    let stimulation_nids: Vec<usize> = (0..n_neurons).collect();
    let mut rng = StdRng::seed_from_u64(0);
    let num_stimulus_spikes_dist =
        Poisson::new(scenario.stimulus_params.mean_spikes_per_tick).unwrap();

    let mut spike_count = 0;
    let mut neuron_checksum = 0u64;

    for _ in 0..scenario.t_stop {
        let num_stimulus_spikes = num_stimulus_spikes_dist.sample(&mut rng) as usize;
        for nid in stimulation_nids.choose_multiple(&mut rng, num_stimulus_spikes) {
            shaping[*nid].add_neuron_input(SynapseType::Excitatory, scenario.stimulus_params.weight);
        }

        let tick_result = instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();

        spike_count += tick_result.spiking_nids.len();
        for nid in tick_result.spiking_nids {
            neuron_checksum += tick_result.t as u64 * nid as u64;
        }

        shaping.iter_mut().for_each(|shaping| shaping.shape_input());
        recorder.advance();
    }

    recorder.flush();
    assert_eq!(instance.outstanding_recordings(), 0);

    let voltage_checksum: f64 = recorder
        .records(RecordingChannel::Voltage)
        .iter()
        .filter_map(|bytes| TimedBuffer::decode(bytes))
        .flat_map(|buffer| buffer.values().to_vec())
        .map(|voltage| voltage as f64)
        .sum();

    let mut read_back = vec![0u32; blob.len()];
    instance.store_parameters(&mut read_back, 0).unwrap();
    let parameter_checksum = read_back.iter().map(|word| *word as u64).sum();

    let summary = ChecksumSummary {
        spike_count,
        neuron_checksum,
        voltage_checksum,
        spike_records: recorder.records(RecordingChannel::Spikes).len(),
        voltage_records: recorder.records(RecordingChannel::Voltage).len(),
        parameter_checksum,
    };

    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
}
