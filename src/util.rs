use crate::types::{Real, Time};

/// Per-timestep decay of a quantity with time constant `tau_ms`.
pub fn get_decay_factor(timestep_ms: Real, tau_ms: Real) -> Real {
    (-timestep_ms / tau_ms).exp()
}

/// Decay accumulated between two timesteps for a time constant given in
/// timesteps.
pub fn get_decay_factor_between(t: Time, last_t: Time, tau: Real) -> Real {
    let t_diff = t.saturating_sub(last_t);
    (-(t_diff as Real) / tau).exp()
}

/// Number of whole timesteps covering `duration_ms`, rounded up.
pub fn ms_to_timesteps(duration_ms: Real, timestep_ms: Real) -> i32 {
    (duration_ms / timestep_ms).ceil() as i32
}
