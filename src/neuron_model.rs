use crate::{
    params::{IzhikevichParams, LifParams},
    record::{stateless_record, WordReader, WordRecord, WordWriter},
    types::Real,
    util::{get_decay_factor, ms_to_timesteps},
};

/// Membrane dynamics of one neuron.
pub trait NeuronModel: WordRecord {
    /// Parameters shared by every neuron of the population.
    type Global: WordRecord;

    fn get_membrane_voltage(&self) -> Real;

    /// Advances the state by one timestep and returns the value to be tested
    /// against the threshold.
    fn state_update(
        &mut self,
        global: &Self::Global,
        exc_input: Real,
        inh_input: Real,
        external_bias: Real,
    ) -> Real;

    fn has_spiked(&mut self, global: &Self::Global);

    fn print_state_variables(&self);

    fn print_parameters(&self);
}

stateless_record!(
    /// Global parameter record of models that share nothing across neurons.
    NoGlobalParams
);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifNeuron {
    pub v_membrane: Real,
    pub v_rest: Real,
    pub r_membrane: Real,
    pub exp_tc: Real,
    pub i_offset: Real,
    pub refract_timer: i32,
    pub v_reset: Real,
    pub t_refract: i32,
}

impl LifNeuron {
    pub fn new(lif_params: &LifParams, timestep_ms: Real) -> Self {
        Self {
            v_membrane: lif_params.v_init,
            v_rest: lif_params.v_rest,
            r_membrane: lif_params.tau_m / lif_params.cm,
            exp_tc: get_decay_factor(timestep_ms, lif_params.tau_m),
            i_offset: lif_params.i_offset,
            refract_timer: 0,
            v_reset: lif_params.v_reset,
            t_refract: ms_to_timesteps(lif_params.tau_refrac, timestep_ms),
        }
    }

    fn closed_form(&mut self, input_this_timestep: Real) {
        let alpha = input_this_timestep * self.r_membrane + self.v_rest;
        self.v_membrane = alpha - self.exp_tc * (alpha - self.v_membrane);
    }
}

impl WordRecord for LifNeuron {
    const WORDS: usize = 8;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            v_membrane: reader.next_real(),
            v_rest: reader.next_real(),
            r_membrane: reader.next_real(),
            exp_tc: reader.next_real(),
            i_offset: reader.next_real(),
            refract_timer: reader.next_i32(),
            v_reset: reader.next_real(),
            t_refract: reader.next_i32(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.v_membrane);
        writer.put_real(self.v_rest);
        writer.put_real(self.r_membrane);
        writer.put_real(self.exp_tc);
        writer.put_real(self.i_offset);
        writer.put_i32(self.refract_timer);
        writer.put_real(self.v_reset);
        writer.put_i32(self.t_refract);
    }
}

impl NeuronModel for LifNeuron {
    type Global = NoGlobalParams;

    fn get_membrane_voltage(&self) -> Real {
        self.v_membrane
    }

    fn state_update(
        &mut self,
        _global: &NoGlobalParams,
        exc_input: Real,
        inh_input: Real,
        external_bias: Real,
    ) -> Real {
        if self.refract_timer <= 0 {
            let input_this_timestep = exc_input - inh_input + external_bias + self.i_offset;
            self.closed_form(input_this_timestep);
        } else {
            self.refract_timer -= 1;
        }

        self.v_membrane
    }

    fn has_spiked(&mut self, _global: &NoGlobalParams) {
        self.v_membrane = self.v_reset;
        self.refract_timer = self.t_refract;
    }

    fn print_state_variables(&self) {
        log::debug!("V membrane    = {:11.4} mV", self.v_membrane);
    }

    fn print_parameters(&self) {
        log::debug!("V reset       = {:11.4} mV", self.v_reset);
        log::debug!("V rest        = {:11.4} mV", self.v_rest);
        log::debug!("I offset      = {:11.4} nA", self.i_offset);
        log::debug!("R membrane    = {:11.4} Mohm", self.r_membrane);
        log::debug!("exp(-ms/(RC)) = {:11.4} [.]", self.exp_tc);
        log::debug!("T refract     = {} timesteps", self.t_refract);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IzhikevichGlobal {
    pub machine_timestep_ms: Real,
}

impl Default for IzhikevichGlobal {
    fn default() -> Self {
        Self {
            machine_timestep_ms: 1.0,
        }
    }
}

impl WordRecord for IzhikevichGlobal {
    const WORDS: usize = 1;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            machine_timestep_ms: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.machine_timestep_ms);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IzhikevichNeuron {
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub d: Real,
    pub v: Real,
    pub u: Real,
    pub i_offset: Real,
}

impl IzhikevichNeuron {
    pub fn new(izk_params: &IzhikevichParams) -> Self {
        Self {
            a: izk_params.a,
            b: izk_params.b,
            c: izk_params.c,
            d: izk_params.d,
            v: izk_params.v_init,
            u: izk_params.u_init,
            i_offset: izk_params.i_offset,
        }
    }

    // second-order Runge-Kutta, midpoint rule
    fn rk2_kernel_midpoint(&mut self, h: Real, input_this_timestep: Real) {
        let last_v = self.v;
        let last_u = self.u;

        let pre_alpha = 140.0 + input_this_timestep - last_u;
        let alpha = pre_alpha + (5.0 + 0.04 * last_v) * last_v;
        let eta = last_v + 0.5 * h * alpha;
        let beta = 0.5 * h * (self.b * last_v - last_u) * self.a;

        self.v += h * (pre_alpha - beta + (5.0 + 0.04 * eta) * eta);
        self.u += self.a * h * (-last_u - beta + self.b * eta);
    }
}

impl WordRecord for IzhikevichNeuron {
    const WORDS: usize = 7;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            a: reader.next_real(),
            b: reader.next_real(),
            c: reader.next_real(),
            d: reader.next_real(),
            v: reader.next_real(),
            u: reader.next_real(),
            i_offset: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.a);
        writer.put_real(self.b);
        writer.put_real(self.c);
        writer.put_real(self.d);
        writer.put_real(self.v);
        writer.put_real(self.u);
        writer.put_real(self.i_offset);
    }
}

impl NeuronModel for IzhikevichNeuron {
    type Global = IzhikevichGlobal;

    fn get_membrane_voltage(&self) -> Real {
        self.v
    }

    fn state_update(
        &mut self,
        global: &IzhikevichGlobal,
        exc_input: Real,
        inh_input: Real,
        external_bias: Real,
    ) -> Real {
        let input_this_timestep = exc_input - inh_input + external_bias + self.i_offset;
        self.rk2_kernel_midpoint(global.machine_timestep_ms, input_this_timestep);
        self.v
    }

    fn has_spiked(&mut self, _global: &IzhikevichGlobal) {
        self.v = self.c;
        self.u += self.d;
    }

    fn print_state_variables(&self) {
        log::debug!("V = {:11.4} mV", self.v);
        log::debug!("U = {:11.4} mV/ms", self.u);
    }

    fn print_parameters(&self) {
        log::debug!("A = {:11.4}", self.a);
        log::debug!("B = {:11.4}", self.b);
        log::debug!("C = {:11.4}", self.c);
        log::debug!("D = {:11.4}", self.d);
        log::debug!("I = {:11.4} nA", self.i_offset);
    }
}
