use neurocore::{
    neuron_model::LifNeuron,
    params::{self, CoreParams, ExpSynapseParams, LifParams, StaticThresholdParams},
    record::pack_records,
    synapse_types::ExponentialShaping,
    threshold_type::ThresholdTypeStatic,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StimulusParams {
    pub mean_spikes_per_tick: f64,
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub core_params: CoreParams,
    pub lif_params: LifParams,
    pub threshold_params: StaticThresholdParams,
    pub synapse_params: ExpSynapseParams,
    pub stimulus_params: StimulusParams,
    pub t_stop: u32,
}

pub fn get_scenario_params() -> ScenarioParams {
    let params_yaml_str = r#"
core_params:
  num_neurons: 250
  timestep_ms: 1.0
  recording_params:
    spikes: true
    voltage: true
    gsyn_excitatory: true
    gsyn_inhibitory: false
  technical_params:
    dtcm_bytes: 65536
    recording_latency: 2
lif_params:
  cm: 1.0
  tau_m: 20.0
  v_rest: -65.0
  v_reset: -70.0
  tau_refrac: 2.0
  i_offset: 0.0
  v_init: -65.0
threshold_params:
  v_thresh: -50.0
synapse_params:
  tau_syn_e: 5.0
  tau_syn_i: 5.0
stimulus_params:
  mean_spikes_per_tick: 40.0
  weight: 2.5
t_stop: 1000
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}

pub fn validate_scenario_params(scenario: &ScenarioParams) {
    params::validate_core_params(&scenario.core_params).unwrap();
    params::validate_lif_params(&scenario.lif_params).unwrap();
    params::validate_exp_synapse_params(&scenario.synapse_params).unwrap();
}

/// Packs a homogeneous current-based LIF population into a parameter blob.
pub fn build_blob(scenario: &ScenarioParams) -> Vec<u32> {
    let n_neurons = scenario.core_params.num_neurons;
    let neuron = LifNeuron::new(&scenario.lif_params, scenario.core_params.timestep_ms);
    let threshold = ThresholdTypeStatic::new(&scenario.threshold_params);

    let mut blob = Vec::new();
    pack_records(&vec![neuron; n_neurons], &mut blob);
    pack_records(&vec![threshold; n_neurons], &mut blob);
    blob
}

pub fn build_shaping(scenario: &ScenarioParams) -> Vec<ExponentialShaping> {
    vec![
        ExponentialShaping::new(&scenario.synapse_params, scenario.core_params.timestep_ms);
        scenario.core_params.num_neurons
    ]
}
