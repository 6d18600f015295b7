use std::time::Instant;

use serde::Serialize;

use super::{
    freq::{observe, Counts, FrequencyTable, DEFAULT_FLOOR},
    model::HmmModel,
};
use crate::{
    dataset::{Dataset, Sentence},
    error::{Error, Result},
    quark::{Quark, StringTable, TextVectorizer},
};

/// Context of the first tag of every sentence.
pub const START: &str = "^";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainerOptions {
    /// Probability of unseen transitions and emissions.
    pub floor: f64,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self { floor: DEFAULT_FLOOR }
    }
}

impl TrainerOptions {
    /// Sets an option by name, as given on the command line with `-p name=value`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "floor" => {
                let floor: f64 = value.parse().map_err(|_| invalid())?;
                if !(floor > 0.0 && floor < 1.0) {
                    return Err(invalid());
                }
                self.floor = floor;
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

/// Counts transitions and emissions over tagged sentences.
#[derive(Debug, Default)]
pub struct Trainer {
    opt: TrainerOptions,
    transitions: Counts,
    emissions: Counts,
    tags: Quark,
    num_sentences: usize,
    num_items: usize,
}

impl Trainer {
    pub fn new(opt: TrainerOptions) -> Self {
        Self {
            opt,
            ..Default::default()
        }
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.opt.set(name, value)
    }

    pub fn append(&mut self, sentence: &Sentence) {
        if sentence.is_empty() {
            return;
        }
        let mut prev = START;
        for (word, tag) in sentence.pairs() {
            observe(&mut self.transitions, prev, tag);
            observe(&mut self.emissions, tag, word);
            self.tags.find_or_insert(tag);
            prev = tag;
        }
        self.num_sentences += 1;
        self.num_items += sentence.len();
    }

    pub fn append_all(&mut self, ds: &Dataset) {
        ds.iter().for_each(|s| self.append(s));
    }

    /// Converts the accumulated counts into the model tables.
    pub fn train(self) -> HmmModel {
        let begin = Instant::now();
        let transition = FrequencyTable::from_counts(&self.transitions, self.opt.floor);
        let emission = FrequencyTable::from_counts(&self.emissions, self.opt.floor);
        log::info!(
            "trained on {} sentences, {} items (tags: {}, transition contexts: {}, emission contexts: {}, floor: {}), time cost: {:?}",
            self.num_sentences,
            self.num_items,
            self.tags.len(),
            transition.len(),
            emission.len(),
            self.opt.floor,
            begin.elapsed()
        );
        HmmModel::new(transition, emission, self.tags)
    }
}

/// Trains a model with default options.
pub fn train(ds: &Dataset) -> HmmModel {
    let mut trainer = Trainer::default();
    trainer.append_all(ds);
    trainer.train()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_transitions_and_emissions() {
        let ds: Dataset = "The_DT dog_NN barks_VBZ\nThe_DT cat_NN sleeps_VBZ\nA_DT dog_NN"
            .parse()
            .unwrap();
        let model = train(&ds);
        let trans = model.transition();
        assert_eq!(trans.frequency(START, "DT"), 1.0);
        assert_eq!(trans.frequency("DT", "NN"), 1.0);
        assert_eq!(trans.frequency("NN", "VBZ"), 1.0);
        // "A dog" ends the sentence, nothing follows its NN
        assert!(trans.context("VBZ").is_none());

        let emit = model.emission();
        assert!((emit.frequency("DT", "The") - 2.0 / 3.0).abs() < 1e-12);
        assert!((emit.frequency("NN", "dog") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(emit.frequency("VBZ", "dog"), DEFAULT_FLOOR);

        let tags: Vec<_> = model.tags().iter().collect();
        assert_eq!(tags, ["DT", "NN", "VBZ"]);
    }

    #[test]
    fn start_is_not_a_tag() {
        let ds: Dataset = "x_A y_B".parse().unwrap();
        let model = train(&ds);
        assert!(!model.tags().contains(START));
        assert!(model.transition().context(START).is_some());
    }

    #[test]
    fn empty_corpus() {
        let model = train(&Dataset::default());
        assert!(model.transition().is_empty());
        assert!(model.emission().is_empty());
        assert!(model.tags().is_empty());
    }

    #[test]
    fn options() {
        let mut opt = TrainerOptions::default();
        assert_eq!(opt.floor, DEFAULT_FLOOR);
        opt.set("floor", "1e-4").unwrap();
        assert_eq!(opt.floor, 1e-4);
        for (name, value) in [("floor", "0"), ("floor", "abc"), ("floor", "1.5"), ("c2", "0.1")] {
            assert!(
                matches!(opt.set(name, value), Err(Error::InvalidParameter { .. })),
                "{name}={value}"
            );
        }
        assert_eq!(opt.floor, 1e-4);
    }

    #[test]
    fn floor_is_carried_into_tables() {
        let ds: Dataset = "x_A".parse().unwrap();
        let mut trainer = Trainer::default();
        trainer.set("floor", "0.001").unwrap();
        trainer.append_all(&ds);
        let model = trainer.train();
        assert_eq!(model.emission().frequency("A", "y"), 0.001);
        assert_eq!(model.transition().frequency("A", "A"), 0.001);
    }
}
