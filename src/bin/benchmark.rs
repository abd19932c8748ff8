use std::{io::sink, time::Instant};

use neurocore::{
    instance,
    neuron_impl::LifCurrExp,
    recorder::ThreadedRecorder,
    synapse_dynamics::StaticSynapseDynamics,
    synapse_types::{SynapseShaping, SynapseType},
};
use rand::{
    distributions::Uniform, prelude::Distribution, rngs::StdRng, seq::SliceRandom, SeedableRng,
};
use statrs::distribution::Poisson;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let scenario = scenario_params::get_scenario_params();
    scenario_params::validate_scenario_params(&scenario);

    let blob = scenario_params::build_blob(&scenario);
    let mut instance =
        instance::create_instance::<LifCurrExp>(&scenario.core_params, &blob, 0).unwrap();

    let n_neurons = scenario.core_params.num_neurons;
    let mut shaping = scenario_params::build_shaping(&scenario);
    let mut dynamics = StaticSynapseDynamics;
    let mut recorder = ThreadedRecorder::spawn(sink());

    let all_nids: Vec<usize> = (0..n_neurons).collect();
    let mut rng = StdRng::seed_from_u64(0);
    let weight_dist = Uniform::new(0.0, 2.0 * scenario.stimulus_params.weight);
    let num_stimulus_spikes_dist =
        Poisson::new(scenario.stimulus_params.mean_spikes_per_tick).unwrap();

    let mut spike_count = 0usize;
    let mut checksum = 0;
    let t_stop = 50 * scenario.t_stop;

    let wall_start = Instant::now();

    for _ in 0..t_stop {
        let num_stimulus_spikes = num_stimulus_spikes_dist.sample(&mut rng) as usize;
        for nid in all_nids.choose_multiple(&mut rng, num_stimulus_spikes) {
            shaping[*nid].add_neuron_input(SynapseType::Excitatory, weight_dist.sample(&mut rng));
        }

        let tick_result = instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();

        spike_count += tick_result.spiking_nids.len();
        checksum += tick_result.spiking_nids.iter().sum::<usize>();

        shaping.iter_mut().for_each(|shaping| shaping.shape_input());
    }

    let wall_time = wall_start.elapsed();
    recorder.finish().unwrap();

    let neuron_update_throughput = (t_stop as usize * n_neurons) as f64 / wall_time.as_secs_f64();

    eprintln!("Spikes per cycle: {}", spike_count as f64 / t_stop as f64);
    eprintln!(
        "Neuron update throughput: {:.3e} ({:.3} ns per update)",
        neuron_update_throughput,
        1e9 / neuron_update_throughput
    );
    eprintln!("Outstanding recordings: {}", instance.outstanding_recordings());
    eprintln!("Checksum: {}", checksum);
}
