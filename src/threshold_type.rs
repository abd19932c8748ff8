use crate::{
    params::StaticThresholdParams,
    record::{WordReader, WordRecord, WordWriter},
    types::Real,
};

pub trait ThresholdType: WordRecord {
    fn is_above_threshold(&self, value: Real) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTypeStatic {
    pub threshold_value: Real,
}

impl ThresholdTypeStatic {
    pub fn new(threshold_params: &StaticThresholdParams) -> Self {
        Self {
            threshold_value: threshold_params.v_thresh,
        }
    }
}

impl WordRecord for ThresholdTypeStatic {
    const WORDS: usize = 1;

    fn read_words(reader: &mut WordReader<'_>) -> Self {
        Self {
            threshold_value: reader.next_real(),
        }
    }

    fn write_words(&self, writer: &mut WordWriter<'_>) {
        writer.put_real(self.threshold_value);
    }
}

impl ThresholdType for ThresholdTypeStatic {
    fn is_above_threshold(&self, value: Real) -> bool {
        value >= self.threshold_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_bound() {
        let sut = ThresholdTypeStatic::new(&StaticThresholdParams { v_thresh: -50.0 });
        assert!(!sut.is_above_threshold(-50.1));
        assert!(sut.is_above_threshold(-50.0));
        assert!(sut.is_above_threshold(12.0));
    }
}
