use crate::{
    params::ConductanceParams,
    record::{stateless_record, WordReader, WordRecord, WordWriter},
    types::Real,
};

/// Turns shaped synaptic input into membrane current.
pub trait InputType: WordRecord {
    fn get_input_value(&self, value: Real) -> Real;

    fn convert_excitatory_input_to_current(&self, exc_input: Real, membrane_voltage: Real) -> Real;

    fn convert_inhibitory_input_to_current(&self, inh_input: Real, membrane_voltage: Real) -> Real;
}

stateless_record!(
    /// Current-based input: synaptic values are currents already.
    InputTypeCurrent
);

impl InputType for InputTypeCurrent {
    fn get_input_value(&self, value: Real) -> Real {
        value
    }

    fn convert_excitatory_input_to_current(&self, exc_input: Real, _membrane_voltage: Real) -> Real {
        exc_input
    }

    fn convert_inhibitory_input_to_current(&self, inh_input: Real, _membrane_voltage: Real) -> Real {
        inh_input
    }
}

/// Conductance-based input with a voltage-dependent driving force.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTypeConductance {
    pub v_rev_e: Real,
    pub v_rev_i: Real,
}

impl InputTypeConductance {
    pub fn new(cond_params: &ConductanceParams) -> Self {
        Self {
            v_rev_e: cond_params.e_rev_e,
            v_rev_i: cond_params.e_rev_i,
        }
    }
}

impl WordRecord for InputTypeConductance {
    const WORDS: usize = 2;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            v_rev_e: reader.next_real(),
            v_rev_i: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.v_rev_e);
        writer.put_real(self.v_rev_i);
    }
}

impl InputType for InputTypeConductance {
    fn get_input_value(&self, value: Real) -> Real {
        value
    }

    fn convert_excitatory_input_to_current(&self, exc_input: Real, membrane_voltage: Real) -> Real {
        exc_input * (self.v_rev_e - membrane_voltage)
    }

    // the model subtracts the inhibitory current, hence the sign
    fn convert_inhibitory_input_to_current(&self, inh_input: Real, membrane_voltage: Real) -> Real {
        -inh_input * (self.v_rev_i - membrane_voltage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn current_is_identity() {
        let sut = InputTypeCurrent;
        assert_approx_eq!(f32, sut.get_input_value(0.7), 0.7);
        assert_approx_eq!(f32, sut.convert_excitatory_input_to_current(0.7, -65.0), 0.7);
        assert_approx_eq!(f32, sut.convert_inhibitory_input_to_current(0.3, -65.0), 0.3);
    }

    #[test]
    fn conductance_driving_force() {
        let sut = InputTypeConductance::new(&ConductanceParams {
            e_rev_e: 0.0,
            e_rev_i: -70.0,
        });

        assert_approx_eq!(f32, sut.convert_excitatory_input_to_current(0.1, -60.0), 6.0);
        assert_approx_eq!(f32, sut.convert_inhibitory_input_to_current(0.1, -60.0), 1.0);

        // below the inhibitory reversal potential inhibition depolarizes
        assert!(sut.convert_inhibitory_input_to_current(0.1, -75.0) < 0.0);
    }
}
