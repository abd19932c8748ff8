pub mod additional_input;
pub mod error;
pub mod input_type;
pub mod instance;
pub mod loader;
pub mod memory;
pub mod neuron;
pub mod neuron_impl;
pub mod neuron_model;
pub mod out_spikes;
pub mod parameter_store;
pub mod params;
pub mod record;
pub mod recorder;
pub mod recording;
pub mod synapse_dynamics;
pub mod synapse_types;
pub mod threshold_type;
pub mod timed_buffer;
pub mod types;

mod util;
