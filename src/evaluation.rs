use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    hmm::tagger::Tagger,
};

/// Label-wise performance values.
#[derive(Debug, Default, Clone)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /// Number of occurrences of the label in the gold-standard data.
    pub num_observation: usize,
    /// Number of predictions.
    pub num_prediction: usize,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

/// Accumulates reference/prediction pairs over a test set.
#[derive(Debug, Default)]
pub struct Evaluation {
    tbl: BTreeMap<String, LabelMeasure>,

    /// Number of correctly predicted items.
    item_total_correct: usize,
    /// Total number of items.
    item_total_num: usize,

    /// Number of sentences predicted without a single error.
    inst_total_correct: usize,
    inst_total_num: usize,
}

/// Summary computed by [`Evaluation::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Estimation {
    /// Item (token) accuracy.
    pub accuracy: f64,
    /// Sentence accuracy.
    pub instance_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Evaluation {
    /// Adds one sentence; both sequences must have the same length.
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(
        &mut self,
        reference: &[R],
        prediction: &[P],
    ) -> Result<()> {
        if reference.len() != prediction.len() {
            return Err(Error::LengthMismatch {
                expected: reference.len(),
                actual: prediction.len(),
            });
        }
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }
        self.item_total_correct += matched;

        if matched == reference.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
        Ok(())
    }

    pub fn item_total_num(&self) -> usize {
        self.item_total_num
    }

    pub fn label(&self, label: &str) -> Option<&LabelMeasure> {
        self.tbl.get(label)
    }

    /// Computes accuracies and macro averages, `NoData` when nothing was accumulated.
    pub fn evaluate(&mut self) -> Result<Estimation> {
        if self.item_total_num == 0 {
            return Err(Error::NoData);
        }
        let (mut precision, mut recall, mut fmeasure) = (0.0, 0.0, 0.0);
        let mut num_labels = 0;
        for lev in self.tbl.values_mut() {
            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;
            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            if lev.num_observation > 0 {
                lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            }
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            /* Labels only ever predicted do not count in the macro average. */
            if lev.num_observation == 0 {
                continue;
            }
            precision += lev.precision;
            recall += lev.recall;
            fmeasure += lev.fmeasure;
            num_labels += 1;
        }
        let n = num_labels.max(1) as f64;
        Ok(Estimation {
            accuracy: self.item_total_correct as f64 / self.item_total_num as f64,
            instance_accuracy: self.inst_total_correct as f64 / self.inst_total_num as f64,
            precision: precision / n,
            recall: recall / n,
            fmeasure: fmeasure / n,
        })
    }

    fn accuracy(n: usize, total: usize) -> f64 {
        if total > 0 {
            n as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.item_total_correct,
            self.item_total_num,
            Self::accuracy(self.item_total_correct, self.item_total_num)
        )?;
        writeln!(
            f,
            "Sequence accuracy: {}/{} => {:.4}",
            self.inst_total_correct,
            self.inst_total_num,
            Self::accuracy(self.inst_total_correct, self.inst_total_num)
        )
    }
}

/// Tags every sentence of `ds` and scores the predictions against its gold tags.
pub fn run<T: Tagger>(tagger: &mut T, ds: &Dataset) -> Result<Evaluation> {
    let mut evaluation = Evaluation::default();
    for seq in ds {
        let prediction = tagger.tag(&seq.words)?;
        evaluation.accumulate(&seq.tags, &prediction)?;
    }
    log::info!(
        "evaluated {} sentences, {} items",
        ds.len(),
        evaluation.item_total_num()
    );
    Ok(evaluation)
}

/// Runs the tagger over `ds` and returns the summary.
pub fn evaluate<T: Tagger>(tagger: &mut T, ds: &Dataset) -> Result<Estimation> {
    run(tagger, ds)?.evaluate()
}
