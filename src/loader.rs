//! Moves the parameter store to and from the packed configuration blob.
//!
//! Section order: global parameters, then neuron, input type, additional
//! input and threshold records, `n_neurons` each. The whole layout is bounds
//! checked against the remaining blob before any word is copied, so a short
//! blob leaves the store untouched.

use crate::{
    error::{ArrayKind, CoreError, CoreResult},
    neuron_impl::{GlobalParams, NeuronImpl},
    parameter_store::ParameterStore,
    record::{WordReader, WordRecord, WordWriter},
};

pub use crate::neuron_impl::required_words;

/// Fills `store` from `blob`, starting at word `cursor`. Returns the cursor
/// just past the last word consumed.
pub fn load<N: NeuronImpl>(
    store: &mut ParameterStore<N>,
    blob: &[u32],
    cursor: usize,
) -> CoreResult<usize> {
    log::info!("Reading neuron parameters from word {}", cursor);
    check_layout::<N>(store.n_neurons(), blob.len(), cursor)?;

    let sections = store.sections_mut();
    let mut cursor = cursor;
    cursor = read_section(
        ArrayKind::GlobalParameters,
        std::slice::from_mut(sections.global),
        blob,
        cursor,
    )?;
    cursor = read_section(ArrayKind::NeuronState, sections.neurons, blob, cursor)?;
    cursor = read_section(ArrayKind::InputType, sections.input_types, blob, cursor)?;
    cursor = read_section(
        ArrayKind::AdditionalInput,
        sections.additional_inputs,
        blob,
        cursor,
    )?;
    cursor = read_section(ArrayKind::Threshold, sections.thresholds, blob, cursor)?;

    Ok(cursor)
}

/// Writes the current contents of `store` back into `blob` in load order.
pub fn store<N: NeuronImpl>(
    store: &ParameterStore<N>,
    blob: &mut [u32],
    cursor: usize,
) -> CoreResult<usize> {
    log::info!("Writing neuron parameters from word {}", cursor);
    check_layout::<N>(store.n_neurons(), blob.len(), cursor)?;

    let sections = store.sections();
    let mut cursor = cursor;
    cursor = write_section(
        ArrayKind::GlobalParameters,
        std::slice::from_ref(sections.global),
        blob,
        cursor,
    )?;
    cursor = write_section(ArrayKind::NeuronState, sections.neurons, blob, cursor)?;
    cursor = write_section(ArrayKind::InputType, sections.input_types, blob, cursor)?;
    cursor = write_section(
        ArrayKind::AdditionalInput,
        sections.additional_inputs,
        blob,
        cursor,
    )?;
    cursor = write_section(ArrayKind::Threshold, sections.thresholds, blob, cursor)?;

    Ok(cursor)
}

/// Walks every section without copying. Returns the cursor past the last one.
fn check_layout<N: NeuronImpl>(
    n_neurons: usize,
    blob_len: usize,
    cursor: usize,
) -> CoreResult<usize> {
    let sections = [
        (ArrayKind::GlobalParameters, <GlobalParams<N> as WordRecord>::WORDS, 1),
        (ArrayKind::NeuronState, <N::Model as WordRecord>::WORDS, n_neurons),
        (ArrayKind::InputType, <N::Input as WordRecord>::WORDS, n_neurons),
        (
            ArrayKind::AdditionalInput,
            <N::AdditionalInput as WordRecord>::WORDS,
            n_neurons,
        ),
        (ArrayKind::Threshold, <N::Threshold as WordRecord>::WORDS, n_neurons),
    ];

    sections
        .into_iter()
        .try_fold(cursor, |cursor, (section, words, count)| {
            section_words(section, words * count, blob_len, cursor).map(|range| range.end)
        })
}

fn section_range<R: WordRecord>(
    section: ArrayKind,
    count: usize,
    blob_len: usize,
    cursor: usize,
) -> CoreResult<std::ops::Range<usize>> {
    section_words(section, R::WORDS * count, blob_len, cursor)
}

fn section_words(
    section: ArrayKind,
    needed_words: usize,
    blob_len: usize,
    cursor: usize,
) -> CoreResult<std::ops::Range<usize>> {
    let available_words = blob_len.saturating_sub(cursor);

    // an empty section still has to start inside the blob
    if cursor > blob_len || needed_words > available_words {
        log::error!(
            "Configuration too short for {}: need {} words, have {}",
            section,
            needed_words,
            available_words
        );
        return Err(CoreError::MalformedConfig {
            section,
            needed_words,
            available_words,
        });
    }

    Ok(cursor..cursor + needed_words)
}

fn read_section<R: WordRecord>(
    section: ArrayKind,
    records: &mut [R],
    blob: &[u32],
    cursor: usize,
) -> CoreResult<usize> {
    if R::WORDS == 0 {
        return Ok(cursor);
    }

    let range = section_range::<R>(section, records.len(), blob.len(), cursor)?;
    log::info!(
        "\t reading {} from words {}..{}",
        section,
        range.start,
        range.end
    );

    for (record, words) in records
        .iter_mut()
        .zip(blob[range.clone()].chunks_exact(R::WORDS))
    {
        *record = R::read_words(&mut WordReader::new(words));
    }

    Ok(range.end)
}

fn write_section<R: WordRecord>(
    section: ArrayKind,
    records: &[R],
    blob: &mut [u32],
    cursor: usize,
) -> CoreResult<usize> {
    if R::WORDS == 0 {
        return Ok(cursor);
    }

    let range = section_range::<R>(section, records.len(), blob.len(), cursor)?;

    for (record, words) in records
        .iter()
        .zip(blob[range.clone()].chunks_exact_mut(R::WORDS))
    {
        record.write_words(&mut WordWriter::new(words));
    }

    Ok(range.end)
}
