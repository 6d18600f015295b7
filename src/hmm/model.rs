use std::io::Write;

use bitflags::bitflags;

use super::{
    freq::FrequencyTable,
    tagger::{HmmTagger, Tagger},
};
use crate::{dataset::Dataset, error::Result, evaluation, quark::Quark};

bitflags! {
    /// Parts of a model written by [`HmmModel::dump`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DumpOpt: u8 {
        const TRANSITION = 0x01;
        const EMISSION = 0x02;
        const TAGS = 0x04;
    }
}

/// A trained tagging model.
pub trait Model {
    /// Decoder over this model, ready to tag sentences.
    fn get_tagger(&self) -> Result<impl Tagger + '_>;
    /// Candidate labels in decoding order.
    fn get_labels(&self) -> &Quark;
    /// Writes the selected parts of the model as JSON, for inspection only.
    fn dump<W: Write>(&self, w: W, opt: DumpOpt) -> Result<()>;
}

/// Bigram HMM: transition table keyed by previous tag (or `^`), emission
/// table keyed by tag, and the tag vocabulary in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct HmmModel {
    transition: FrequencyTable,
    emission: FrequencyTable,
    tags: Quark,
}

impl HmmModel {
    pub fn new(transition: FrequencyTable, emission: FrequencyTable, tags: Quark) -> Self {
        Self {
            transition,
            emission,
            tags,
        }
    }

    pub fn transition(&self) -> &FrequencyTable {
        &self.transition
    }

    pub fn emission(&self) -> &FrequencyTable {
        &self.emission
    }

    pub fn tags(&self) -> &Quark {
        &self.tags
    }

    pub fn tagger(&self) -> Result<HmmTagger<'_>> {
        HmmTagger::new(self)
    }

    /// Most likely tag sequence for `words`.
    pub fn label<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<String>> {
        self.get_tagger()?.tag(words)
    }

    /// Token-level accuracy of the model on a labelled data set.
    pub fn evaluate(&self, ds: &Dataset) -> Result<f64> {
        let mut tagger = self.tagger()?;
        let est = evaluation::evaluate(&mut tagger, ds)?;
        Ok(est.accuracy)
    }
}

impl Model for HmmModel {
    fn get_tagger(&self) -> Result<impl Tagger + '_> {
        self.tagger()
    }

    fn get_labels(&self) -> &Quark {
        &self.tags
    }

    fn dump<W: Write>(&self, w: W, opt: DumpOpt) -> Result<()> {
        let mut m = serde_json::Map::new();
        if opt.contains(DumpOpt::TAGS) {
            m.insert("tags".into(), serde_json::to_value(&self.tags)?);
        }
        if opt.contains(DumpOpt::TRANSITION) {
            m.insert("transition".into(), serde_json::to_value(&self.transition)?);
        }
        if opt.contains(DumpOpt::EMISSION) {
            m.insert("emission".into(), serde_json::to_value(&self.emission)?);
        }
        serde_json::to_writer_pretty(w, &m)?;
        Ok(())
    }
}
