use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

use crate::memory::DEFAULT_DTCM_BYTES;
use crate::recording::{RecordingChannel, RecordingFlags};
use crate::types::Real;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreParams {
    pub num_neurons: usize,
    pub timestep_ms: Real,
    pub recording_params: RecordingParams,
    pub technical_params: TechnicalParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingParams {
    pub spikes: bool,
    pub voltage: bool,
    pub gsyn_excitatory: bool,
    pub gsyn_inhibitory: bool,
}

impl RecordingParams {
    pub fn all() -> Self {
        Self {
            spikes: true,
            voltage: true,
            gsyn_excitatory: true,
            gsyn_inhibitory: true,
        }
    }

    pub fn flags(&self) -> RecordingFlags {
        let mut flags = RecordingFlags::none();
        let channels = [
            (self.spikes, RecordingChannel::Spikes),
            (self.voltage, RecordingChannel::Voltage),
            (self.gsyn_excitatory, RecordingChannel::GsynExcitatory),
            (self.gsyn_inhibitory, RecordingChannel::GsynInhibitory),
        ];

        for (enabled, channel) in channels {
            if enabled {
                flags = flags.with_channel(channel);
            }
        }

        flags
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParams {
    pub dtcm_bytes: usize,
    pub recording_latency: usize,
}

/// Leaky integrate-and-fire neuron in user units (mV, ms, nF, nA).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifParams {
    pub cm: Real,
    pub tau_m: Real,
    pub v_rest: Real,
    pub v_reset: Real,
    pub tau_refrac: Real,
    pub i_offset: Real,
    pub v_init: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IzhikevichParams {
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub d: Real,
    pub v_init: Real,
    pub u_init: Real,
    pub i_offset: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConductanceParams {
    pub e_rev_e: Real,
    pub e_rev_i: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticThresholdParams {
    pub v_thresh: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ca2AdaptiveParams {
    pub tau_ca2: Real,
    pub i_alpha: Real,
    pub i_ca2_init: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpSynapseParams {
    pub tau_syn_e: Real,
    pub tau_syn_i: Real,
}

impl Default for CoreParams {
    fn default() -> Self {
        Self {
            num_neurons: 1,
            timestep_ms: 1.0,
            recording_params: RecordingParams::default(),
            technical_params: TechnicalParams::default(),
        }
    }
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            dtcm_bytes: DEFAULT_DTCM_BYTES,
            recording_latency: 1,
        }
    }
}

impl Default for LifParams {
    fn default() -> Self {
        Self {
            cm: 1.0,
            tau_m: 20.0,
            v_rest: -65.0,
            v_reset: -65.0,
            tau_refrac: 0.1,
            i_offset: 0.0,
            v_init: -65.0,
        }
    }
}

impl Default for IzhikevichParams {
    // regular spiking
    fn default() -> Self {
        Self {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 2.0,
            v_init: -70.0,
            u_init: -14.0,
            i_offset: 0.0,
        }
    }
}

impl Default for ConductanceParams {
    fn default() -> Self {
        Self {
            e_rev_e: 0.0,
            e_rev_i: -70.0,
        }
    }
}

impl Default for StaticThresholdParams {
    fn default() -> Self {
        Self { v_thresh: -50.0 }
    }
}

impl Default for Ca2AdaptiveParams {
    fn default() -> Self {
        Self {
            tau_ca2: 50.0,
            i_alpha: 0.1,
            i_ca2_init: 0.0,
        }
    }
}

impl Default for ExpSynapseParams {
    fn default() -> Self {
        Self {
            tau_syn_e: 5.0,
            tau_syn_i: 5.0,
        }
    }
}

pub fn validate_core_params(core_params: &CoreParams) -> Result<(), SimpleError> {
    if core_params.num_neurons == 0 {
        return Err(SimpleError::new("num_neurons must be strictly positive"));
    }

    if core_params.timestep_ms <= 0.0 {
        return Err(SimpleError::new("timestep_ms must be strictly positive"));
    }

    validate_technical_params(&core_params.technical_params)?;

    Ok(())
}

fn validate_technical_params(technical_params: &TechnicalParams) -> Result<(), SimpleError> {
    if technical_params.dtcm_bytes == 0 {
        return Err(SimpleError::new("dtcm_bytes must be strictly positive"));
    }

    Ok(())
}

pub fn validate_lif_params(lif_params: &LifParams) -> Result<(), SimpleError> {
    if lif_params.cm <= 0.0 {
        return Err(SimpleError::new("cm must be strictly positive"));
    }

    if lif_params.tau_m <= 0.0 {
        return Err(SimpleError::new("tau_m must be strictly positive"));
    }

    if lif_params.tau_refrac < 0.0 {
        return Err(SimpleError::new("tau_refrac must not be negative"));
    }

    Ok(())
}

pub fn validate_izhikevich_params(izk_params: &IzhikevichParams) -> Result<(), SimpleError> {
    if izk_params.a <= 0.0 {
        return Err(SimpleError::new("a must be strictly positive"));
    }

    Ok(())
}

pub fn validate_conductance_params(cond_params: &ConductanceParams) -> Result<(), SimpleError> {
    if cond_params.e_rev_i >= cond_params.e_rev_e {
        return Err(SimpleError::new("e_rev_i must be less than e_rev_e"));
    }

    Ok(())
}

pub fn validate_ca2_adaptive_params(ca2_params: &Ca2AdaptiveParams) -> Result<(), SimpleError> {
    if ca2_params.tau_ca2 <= 0.0 {
        return Err(SimpleError::new("tau_ca2 must be strictly positive"));
    }

    if ca2_params.i_alpha < 0.0 {
        return Err(SimpleError::new("i_alpha must not be negative"));
    }

    Ok(())
}

pub fn validate_exp_synapse_params(syn_params: &ExpSynapseParams) -> Result<(), SimpleError> {
    if syn_params.tau_syn_e <= 0.0 {
        return Err(SimpleError::new("tau_syn_e must be strictly positive"));
    }

    if syn_params.tau_syn_i <= 0.0 {
        return Err(SimpleError::new("tau_syn_i must be strictly positive"));
    }

    Ok(())
}
