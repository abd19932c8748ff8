use float_cmp::assert_approx_eq;
use itertools::{assert_equal, Itertools};
use neurocore::{
    additional_input::{AdditionalInputCa2Adaptive, AdditionalInputNone},
    error::{ArrayKind, CoreError},
    input_type::{InputTypeConductance, InputTypeCurrent},
    instance::{create_instance, Instance},
    loader,
    memory::Dtcm,
    neuron_impl::{required_words, LifCondExp, LifCurrExp, LifCurrExpCa2Adaptive, NeuronImpl},
    neuron_model::{LifNeuron, NeuronModel, NoGlobalParams},
    parameter_store::ParameterStore,
    params::{
        Ca2AdaptiveParams, ConductanceParams, CoreParams, LifParams, RecordingParams,
        StaticThresholdParams,
    },
    record::{pack_records, WordReader, WordRecord, WordWriter},
    recorder::{read_records, DeferredRecorder, ThreadedRecorder},
    recording::{Recorder, RecordingChannel, RecordingCompletion},
    synapse_dynamics::{PostSynapticHistory, StaticSynapseDynamics, SynapseDynamics},
    synapse_types::FixedInput,
    threshold_type::ThresholdTypeStatic,
    timed_buffer::TimedBuffer,
    types::{Real, Time},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Reports the plain sum of its three inputs.
#[derive(Debug, Clone, Default)]
struct SumModel {
    value: Real,
}

impl WordRecord for SumModel {
    const WORDS: usize = 1;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            value: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.value);
    }
}

impl NeuronModel for SumModel {
    type Global = NoGlobalParams;

    fn get_membrane_voltage(&self) -> Real {
        self.value
    }

    fn state_update(
        &mut self,
        _global: &NoGlobalParams,
        exc_input: Real,
        inh_input: Real,
        external_bias: Real,
    ) -> Real {
        self.value = exc_input + inh_input + external_bias;
        self.value
    }

    fn has_spiked(&mut self, _global: &NoGlobalParams) {
        self.value = 0.0;
    }

    fn print_state_variables(&self) {}

    fn print_parameters(&self) {}
}

struct SumCurr;

impl NeuronImpl for SumCurr {
    type Model = SumModel;
    type Input = InputTypeCurrent;
    type AdditionalInput = AdditionalInputNone;
    type Threshold = ThresholdTypeStatic;
}

struct FixedBias(Vec<Real>);

impl SynapseDynamics for FixedBias {
    fn get_intrinsic_bias(&self, _time: Time, neuron_index: usize) -> Real {
        self.0[neuron_index]
    }

    fn process_post_synaptic_event(&mut self, _time: Time, _neuron_index: usize) {}
}

fn sum_blob(n_neurons: usize, threshold: Real) -> Vec<u32> {
    let mut blob = Vec::new();
    pack_records(&vec![SumModel::default(); n_neurons], &mut blob);
    pack_records(
        &vec![ThresholdTypeStatic::new(&StaticThresholdParams { v_thresh: threshold }); n_neurons],
        &mut blob,
    );
    blob
}

fn core_params(n_neurons: usize, recording_params: RecordingParams) -> CoreParams {
    CoreParams {
        num_neurons: n_neurons,
        recording_params,
        ..CoreParams::default()
    }
}

fn lif_blob(n_neurons: usize) -> Vec<u32> {
    let mut blob = Vec::new();
    pack_records(
        &vec![LifNeuron::new(&LifParams::default(), 1.0); n_neurons],
        &mut blob,
    );
    pack_records(
        &vec![ThresholdTypeStatic::new(&StaticThresholdParams::default()); n_neurons],
        &mut blob,
    );
    blob
}

#[test]
fn end_to_end_two_neurons() {
    let blob = sum_blob(2, 1.0);
    let mut instance: Instance<SumCurr> =
        create_instance(&core_params(2, RecordingParams::all()), &blob, 0).unwrap();

    let shaping = [FixedInput { exc: 0.6, inh: 0.3 }, FixedInput { exc: 0.1, inh: 0.0 }];
    let mut dynamics = FixedBias(vec![0.2, 0.0]);
    let mut recorder = DeferredRecorder::new(0);

    let tick_result = instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();

    assert_equal(tick_result.spiking_nids, [0]);
    assert!(instance.core().spikes().is_spike(0));
    assert!(!instance.core().spikes().is_spike(1));
    assert_eq!(instance.core().spikes().count(), 1);
    assert_eq!(
        recorder.records(RecordingChannel::Spikes),
        [vec![0u8, 0, 0, 0, 1, 0, 0, 0]]
    );
}

#[test]
fn per_neuron_arrays_share_length() {
    for n_neurons in [1, 7, 64, 100] {
        let mut dtcm = Dtcm::default();
        let store = ParameterStore::<LifCurrExpCa2Adaptive>::initialize(n_neurons, &mut dtcm).unwrap();

        assert_eq!(store.neurons().len(), n_neurons);
        assert_eq!(store.input_types().len(), n_neurons);
        assert_eq!(store.additional_inputs().len(), n_neurons);
        assert_eq!(store.thresholds().len(), n_neurons);
    }
}

#[test]
fn zero_sized_kinds_cost_nothing() {
    // one neuron, a budget that holds exactly the non-empty arrays
    let mut dtcm = Dtcm::new(LifNeuron::byte_size() + ThresholdTypeStatic::byte_size());
    let store = ParameterStore::<LifCurrExp>::initialize(1, &mut dtcm).unwrap();

    assert_eq!(dtcm.available(), 0);
    assert_eq!(store.input_types(), [InputTypeCurrent]);
    assert_eq!(store.additional_inputs(), [AdditionalInputNone]);
    assert_eq!(InputTypeCurrent::byte_size(), 0);
    assert_eq!(NoGlobalParams::byte_size(), 0);
}

#[test]
fn out_of_memory_names_array() {
    let mut dtcm = Dtcm::new(LifNeuron::byte_size() * 3);
    match ParameterStore::<LifCondExp>::initialize(3, &mut dtcm) {
        Err(CoreError::OutOfMemory {
            array,
            available_bytes,
            ..
        }) => {
            assert_eq!(array, ArrayKind::InputType);
            assert_eq!(available_bytes, 0);
        }
        _ => panic!("expected out of memory"),
    }
}

#[test]
fn loader_round_trip_and_cursor() {
    let n_neurons = 4;
    let lif_params = LifParams::default();
    let cond_params = ConductanceParams::default();
    let ca2_params = Ca2AdaptiveParams::default();

    let neurons = (0..n_neurons)
        .map(|index| {
            let mut neuron = LifNeuron::new(&lif_params, 0.1);
            neuron.v_membrane = -70.0 + index as f32;
            neuron
        })
        .collect_vec();

    let prefix = [11u32, 12, 13];
    let mut blob = prefix.to_vec();
    pack_records(&neurons, &mut blob);
    pack_records(&vec![InputTypeConductance::new(&cond_params); n_neurons], &mut blob);
    pack_records(
        &vec![ThresholdTypeStatic::new(&StaticThresholdParams::default()); n_neurons],
        &mut blob,
    );
    blob.push(0xffff_ffff);

    let mut dtcm = Dtcm::default();
    let mut store = ParameterStore::<LifCondExp>::initialize(n_neurons, &mut dtcm).unwrap();
    let cursor = loader::load(&mut store, &blob, prefix.len()).unwrap();

    assert_eq!(cursor, prefix.len() + required_words::<LifCondExp>(n_neurons));
    assert_eq!(blob[cursor], 0xffff_ffff);
    assert_approx_eq!(f32, store.neuron(3).unwrap().v_membrane, -67.0);
    assert_approx_eq!(f32, store.input_type(2).unwrap().v_rev_i, cond_params.e_rev_i);

    let mut written = vec![0u32; blob.len()];
    written[..prefix.len()].copy_from_slice(&prefix);
    written[cursor] = 0xffff_ffff;
    assert_eq!(loader::store(&store, &mut written, prefix.len()).unwrap(), cursor);
    assert_eq!(written, blob);

    // a second population continues from the returned cursor
    let mut adaptive = ParameterStore::<LifCurrExpCa2Adaptive>::initialize(1, &mut dtcm).unwrap();
    let mut tail = vec![0u32; cursor];
    pack_records(&[LifNeuron::new(&lif_params, 1.0)], &mut tail);
    pack_records(&[AdditionalInputCa2Adaptive::new(&ca2_params, 1.0)], &mut tail);
    pack_records(&[ThresholdTypeStatic::new(&StaticThresholdParams::default())], &mut tail);
    assert_eq!(loader::load(&mut adaptive, &tail, cursor).unwrap(), tail.len());
    assert_approx_eq!(
        f32,
        adaptive.additional_input(0).unwrap().i_alpha,
        ca2_params.i_alpha
    );
}

#[test]
fn malformed_blob() {
    let mut blob = lif_blob(3);
    blob.pop();

    match create_instance::<LifCurrExp>(&core_params(3, RecordingParams::default()), &blob, 0) {
        Err(CoreError::MalformedConfig {
            section,
            needed_words,
            available_words,
        }) => {
            assert_eq!(section, ArrayKind::Threshold);
            assert_eq!(needed_words, 3);
            assert_eq!(available_words, 2);
        }
        _ => panic!("expected malformed config"),
    }
}

#[test]
fn capture_independent_of_recording_flags() {
    let blob = sum_blob(2, 10.0);
    let mut instance: Instance<SumCurr> =
        create_instance(&core_params(2, RecordingParams::default()), &blob, 0).unwrap();
    let mut recorder = DeferredRecorder::new(0);
    let shaping = [FixedInput { exc: 0.5, inh: 0.25 }, FixedInput { exc: 1.5, inh: 0.0 }];
    let mut dynamics = StaticSynapseDynamics;

    instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();
    instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();

    let buffers = instance.core().buffers();
    assert_approx_eq!(f32, buffers.voltages.get(0).unwrap(), 0.75);
    assert_approx_eq!(f32, buffers.voltages.get(1).unwrap(), 1.5);
    assert_approx_eq!(f32, buffers.inputs_excitatory.get(1).unwrap(), 1.5);
    assert_approx_eq!(f32, buffers.inputs_inhibitory.get(0).unwrap(), 0.25);

    assert_eq!(instance.outstanding_recordings(), 0);
    for channel in RecordingChannel::ALL {
        assert!(recorder.records(channel).is_empty());
    }
}

#[test]
fn spike_channel_only_when_spiking() {
    let blob = sum_blob(3, 1.0);
    let recording_params = RecordingParams {
        spikes: true,
        ..RecordingParams::default()
    };
    let mut instance: Instance<SumCurr> =
        create_instance(&core_params(3, recording_params), &blob, 0).unwrap();
    let mut recorder = DeferredRecorder::new(0);
    let mut dynamics = StaticSynapseDynamics;

    let quiet = [FixedInput::default(); 3];
    let loud = [
        FixedInput::default(),
        FixedInput { exc: 1.0, inh: 0.0 },
        FixedInput::default(),
    ];

    instance.tick(&quiet, &mut dynamics, &mut recorder).unwrap();
    assert!(recorder.records(RecordingChannel::Spikes).is_empty());

    instance.tick(&loud, &mut dynamics, &mut recorder).unwrap();
    instance.tick(&quiet, &mut dynamics, &mut recorder).unwrap();

    let spike_records = recorder.records(RecordingChannel::Spikes);
    assert_eq!(spike_records.len(), 1);
    assert_eq!(spike_records[0], [1, 0, 0, 0, 0b010, 0, 0, 0]);
}

/// Holds every completion until told to release some.
#[derive(Default)]
struct SlowRecorder {
    submitted: usize,
    pending: Vec<RecordingCompletion>,
    timestamps: Vec<(RecordingChannel, u32)>,
}

impl Recorder for SlowRecorder {
    fn record_and_notify(
        &mut self,
        channel: RecordingChannel,
        bytes: &[u8],
        completion: RecordingCompletion,
    ) {
        self.submitted += 1;
        self.timestamps
            .push((channel, u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])));
        self.pending.push(completion);
    }
}

#[test]
fn outstanding_counter_matches_submitted_minus_completed() {
    let n_neurons = 8;
    let blob = sum_blob(n_neurons, 1.0);
    let mut instance: Instance<SumCurr> =
        create_instance(&core_params(n_neurons, RecordingParams::all()), &blob, 0).unwrap();
    let counter = instance.recording_counter();

    let mut rng = StdRng::seed_from_u64(0);
    let mut recorder = SlowRecorder::default();
    let mut completed = 0;
    let mut dynamics = PostSynapticHistory::new(n_neurons, 20);

    for _ in 0..300 {
        let shaping = (0..n_neurons)
            .map(|_| FixedInput {
                exc: rng.gen_range(0.0..1.2),
                inh: 0.0,
            })
            .collect_vec();
        instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();

        let n_complete = rng.gen_range(0..=recorder.pending.len());
        let order = rng.gen_bool(0.5);
        for _ in 0..n_complete {
            let completion = if order {
                recorder.pending.pop()
            } else {
                Some(recorder.pending.remove(0))
            };
            if let Some(completion) = completion {
                completion.complete();
                completed += 1;
            }
        }

        assert_eq!(counter.count(), recorder.submitted - completed);
        assert_eq!(instance.outstanding_recordings(), counter.count());
    }

    recorder.pending.drain(..).for_each(|completion| completion.complete());
    assert!(counter.is_drained());
}

#[test]
fn in_flight_submissions_keep_their_own_bytes() {
    let blob = sum_blob(2, 1.0);
    let mut instance: Instance<SumCurr> =
        create_instance(&core_params(2, RecordingParams::all()), &blob, 0).unwrap();
    let mut recorder = SlowRecorder::default();
    let shaping = [FixedInput { exc: 2.0, inh: 0.0 }; 2];

    for _ in 0..3 {
        instance
            .tick(&shaping, &mut StaticSynapseDynamics, &mut recorder)
            .unwrap();
    }

    // every tick submitted while the earlier ones were still in flight
    assert_eq!(instance.outstanding_recordings(), 12);

    // the buffers were overwritten twice while the first submission was in
    // flight, yet every submission holds the bytes stamped at its own timestep
    let voltage_times = recorder
        .timestamps
        .iter()
        .filter(|(channel, _)| *channel == RecordingChannel::Voltage)
        .map(|(_, t)| *t);
    assert_equal(voltage_times, [0, 1, 2]);
}

#[test]
fn lif_population_through_threaded_recorder() {
    let n_neurons = 3;
    let blob = lif_blob(n_neurons);
    let recording_params = RecordingParams {
        spikes: true,
        voltage: true,
        ..RecordingParams::default()
    };
    let mut instance: Instance<LifCurrExp> =
        create_instance(&core_params(n_neurons, recording_params), &blob, 0).unwrap();

    // neuron 0 undriven, 1 and 2 driven above rheobase
    let shaping = [
        FixedInput::default(),
        FixedInput { exc: 1.0, inh: 0.0 },
        FixedInput { exc: 1.0, inh: 0.0 },
    ];
    let mut dynamics = PostSynapticHistory::new(n_neurons, 1000);
    let mut recorder = ThreadedRecorder::spawn(Vec::<u8>::new());

    let mut spiking_ticks = Vec::new();
    for _ in 0..200 {
        let tick_result = instance.tick(&shaping, &mut dynamics, &mut recorder).unwrap();
        if !tick_result.spiking_nids.is_empty() {
            assert_equal(tick_result.spiking_nids, [1, 2]);
            spiking_ticks.push(tick_result.t);
        }
    }

    let sink = recorder.finish().unwrap();
    assert_eq!(instance.outstanding_recordings(), 0);
    assert!(!spiking_ticks.is_empty());
    assert_eq!(dynamics.last_spike_t(1), spiking_ticks.last().copied());
    assert_eq!(dynamics.last_spike_t(0), None);

    let records = read_records(sink.as_slice()).unwrap();
    let (spike_records, voltage_records): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|(channel, _)| *channel == RecordingChannel::Spikes);

    assert_eq!(voltage_records.len(), 200);
    assert_equal(
        spike_records
            .iter()
            .map(|(_, bytes)| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        spiking_ticks.iter().copied(),
    );

    let last_voltages = TimedBuffer::decode(&voltage_records[199].1).unwrap();
    assert_eq!(last_voltages.time(), 199);
    assert_approx_eq!(f32, last_voltages.get(0).unwrap(), -65.0);
    assert!(last_voltages.values().iter().all(|v| *v < -50.0));
}
