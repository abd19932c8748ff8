use crate::{
    error::{ArrayKind, CoreError, CoreResult},
    memory::Dtcm,
    neuron_impl::{GlobalParams, NeuronImpl},
    record::WordRecord,
};

/// Owns the global parameter record and the four index-aligned per-neuron
/// arrays of one neuron implementation.
pub struct ParameterStore<N: NeuronImpl> {
    n_neurons: usize,
    global_parameters: GlobalParams<N>,
    neurons: Vec<N::Model>,
    input_types: Vec<N::Input>,
    additional_inputs: Vec<N::AdditionalInput>,
    thresholds: Vec<N::Threshold>,
}

/// Mutable view of everything the update engine touches for one neuron.
pub struct NeuronParts<'a, N: NeuronImpl> {
    pub global: &'a GlobalParams<N>,
    pub neuron: &'a mut N::Model,
    pub input_type: &'a N::Input,
    pub additional_input: &'a mut N::AdditionalInput,
    pub threshold: &'a N::Threshold,
}

/// Shared view of the whole store in loader order.
pub(crate) struct Sections<'a, N: NeuronImpl> {
    pub global: &'a GlobalParams<N>,
    pub neurons: &'a [N::Model],
    pub input_types: &'a [N::Input],
    pub additional_inputs: &'a [N::AdditionalInput],
    pub thresholds: &'a [N::Threshold],
}

/// Mutable view of the whole store in loader order.
pub(crate) struct SectionsMut<'a, N: NeuronImpl> {
    pub global: &'a mut GlobalParams<N>,
    pub neurons: &'a mut [N::Model],
    pub input_types: &'a mut [N::Input],
    pub additional_inputs: &'a mut [N::AdditionalInput],
    pub thresholds: &'a mut [N::Threshold],
}

impl<N: NeuronImpl> ParameterStore<N> {
    pub fn initialize(n_neurons: usize, dtcm: &mut Dtcm) -> CoreResult<Self> {
        log::info!(
            "\t neurons = {}, params size = {}, input type size = {}, threshold size = {}",
            n_neurons,
            <N::Model as WordRecord>::byte_size(),
            <N::Input as WordRecord>::byte_size(),
            <N::Threshold as WordRecord>::byte_size()
        );

        let global_parameters = dtcm
            .allocate(
                ArrayKind::GlobalParameters,
                1,
                <GlobalParams<N> as WordRecord>::byte_size(),
                <GlobalParams<N> as Default>::default(),
            )?
            .pop()
            .unwrap_or_default();

        let neurons = dtcm.allocate(
            ArrayKind::NeuronState,
            n_neurons,
            <N::Model as WordRecord>::byte_size(),
            N::Model::default(),
        )?;

        let input_types = dtcm.allocate(
            ArrayKind::InputType,
            n_neurons,
            <N::Input as WordRecord>::byte_size(),
            N::Input::default(),
        )?;

        let additional_inputs = dtcm.allocate(
            ArrayKind::AdditionalInput,
            n_neurons,
            <N::AdditionalInput as WordRecord>::byte_size(),
            N::AdditionalInput::default(),
        )?;

        let thresholds = dtcm.allocate(
            ArrayKind::Threshold,
            n_neurons,
            <N::Threshold as WordRecord>::byte_size(),
            N::Threshold::default(),
        )?;

        Ok(Self {
            n_neurons,
            global_parameters,
            neurons,
            input_types,
            additional_inputs,
            thresholds,
        })
    }

    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }

    pub fn global_parameters(&self) -> &GlobalParams<N> {
        &self.global_parameters
    }

    pub fn set_global_parameters(&mut self, global_parameters: GlobalParams<N>) {
        self.global_parameters = global_parameters;
    }

    pub fn neurons(&self) -> &[N::Model] {
        &self.neurons
    }

    pub fn input_types(&self) -> &[N::Input] {
        &self.input_types
    }

    pub fn additional_inputs(&self) -> &[N::AdditionalInput] {
        &self.additional_inputs
    }

    pub fn thresholds(&self) -> &[N::Threshold] {
        &self.thresholds
    }

    pub fn neuron(&self, index: usize) -> CoreResult<&N::Model> {
        self.check_index(index)?;
        Ok(&self.neurons[index])
    }

    pub fn neuron_mut(&mut self, index: usize) -> CoreResult<&mut N::Model> {
        self.check_index(index)?;
        Ok(&mut self.neurons[index])
    }

    pub fn input_type(&self, index: usize) -> CoreResult<&N::Input> {
        self.check_index(index)?;
        Ok(&self.input_types[index])
    }

    pub fn input_type_mut(&mut self, index: usize) -> CoreResult<&mut N::Input> {
        self.check_index(index)?;
        Ok(&mut self.input_types[index])
    }

    pub fn additional_input(&self, index: usize) -> CoreResult<&N::AdditionalInput> {
        self.check_index(index)?;
        Ok(&self.additional_inputs[index])
    }

    pub fn additional_input_mut(&mut self, index: usize) -> CoreResult<&mut N::AdditionalInput> {
        self.check_index(index)?;
        Ok(&mut self.additional_inputs[index])
    }

    pub fn threshold(&self, index: usize) -> CoreResult<&N::Threshold> {
        self.check_index(index)?;
        Ok(&self.thresholds[index])
    }

    pub fn threshold_mut(&mut self, index: usize) -> CoreResult<&mut N::Threshold> {
        self.check_index(index)?;
        Ok(&mut self.thresholds[index])
    }

    pub fn parts_mut(&mut self, index: usize) -> CoreResult<NeuronParts<'_, N>> {
        self.check_index(index)?;
        Ok(NeuronParts {
            global: &self.global_parameters,
            neuron: &mut self.neurons[index],
            input_type: &self.input_types[index],
            additional_input: &mut self.additional_inputs[index],
            threshold: &self.thresholds[index],
        })
    }

    pub(crate) fn sections(&self) -> Sections<'_, N> {
        Sections {
            global: &self.global_parameters,
            neurons: &self.neurons,
            input_types: &self.input_types,
            additional_inputs: &self.additional_inputs,
            thresholds: &self.thresholds,
        }
    }

    pub(crate) fn sections_mut(&mut self) -> SectionsMut<'_, N> {
        SectionsMut {
            global: &mut self.global_parameters,
            neurons: &mut self.neurons,
            input_types: &mut self.input_types,
            additional_inputs: &mut self.additional_inputs,
            thresholds: &mut self.thresholds,
        }
    }

    pub fn check_index(&self, index: usize) -> CoreResult<()> {
        if index < self.n_neurons {
            Ok(())
        } else {
            Err(CoreError::IndexOutOfRange {
                index,
                n_neurons: self.n_neurons,
            })
        }
    }
}
