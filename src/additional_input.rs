use crate::{
    params::Ca2AdaptiveParams,
    record::{stateless_record, WordReader, WordRecord, WordWriter},
    types::Real,
    util::get_decay_factor,
};

/// Extra intrinsic current, e.g. spike-frequency adaptation.
pub trait AdditionalInput: WordRecord {
    fn get_input_value_as_current(&mut self, membrane_voltage: Real) -> Real;

    fn has_spiked(&mut self);
}

stateless_record!(AdditionalInputNone);

impl AdditionalInput for AdditionalInputNone {
    fn get_input_value_as_current(&mut self, _membrane_voltage: Real) -> Real {
        0.0
    }

    fn has_spiked(&mut self) {}
}

/// Calcium-activated potassium current: every spike adds `i_alpha` to a
/// trace that decays with `tau_ca2` and hyperpolarizes the membrane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalInputCa2Adaptive {
    pub exp_tau_ca2: Real,
    pub i_ca2: Real,
    pub i_alpha: Real,
}

impl AdditionalInputCa2Adaptive {
    pub fn new(ca2_params: &Ca2AdaptiveParams, timestep_ms: Real) -> Self {
        Self {
            exp_tau_ca2: get_decay_factor(timestep_ms, ca2_params.tau_ca2),
            i_ca2: ca2_params.i_ca2_init,
            i_alpha: ca2_params.i_alpha,
        }
    }
}

impl WordRecord for AdditionalInputCa2Adaptive {
    const WORDS: usize = 3;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            exp_tau_ca2: reader.next_real(),
            i_ca2: reader.next_real(),
            i_alpha: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.exp_tau_ca2);
        writer.put_real(self.i_ca2);
        writer.put_real(self.i_alpha);
    }
}

impl AdditionalInput for AdditionalInputCa2Adaptive {
    fn get_input_value_as_current(&mut self, _membrane_voltage: Real) -> Real {
        self.i_ca2 *= self.exp_tau_ca2;
        -self.i_ca2
    }

    fn has_spiked(&mut self) {
        self.i_ca2 += self.i_alpha;
    }
}
