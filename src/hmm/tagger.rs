use super::model::HmmModel;
use crate::{
    error::{Error, Result},
    quark::StringTable,
};

pub trait Tagger {
    /// Assigns one tag to each of `words`.
    fn tag<S: AsRef<str>>(&mut self, words: &[S]) -> Result<Vec<String>>;
}

/// One cell of the Viterbi lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cell {
    /// Log probability of the best path reaching this cell.
    pub score: f64,
    /// Index into the previous row, `None` for the start cell.
    pub back: Option<usize>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            score: f64::NEG_INFINITY,
            back: None,
        }
    }
}

/// Work space of the decoder.
///
/// A [T + 1][L] lattice; row 0 holds only the start state in column 0,
/// row t holds the best paths ending in each tag at word #(t - 1).
#[derive(Debug, Default)]
pub(crate) struct ViterbiContext {
    pub num_labels: usize,
    num_items: usize,
    cap_items: usize,
    cells: Vec<Cell>,
    /// [T][L] log emission scores of the current words.
    pub state: Vec<f64>,
    /// [L + 1][L] log transition scores, row L is the start sentinel.
    pub trans: Vec<f64>,
}

impl ViterbiContext {
    pub fn new(num_labels: usize) -> Self {
        Self {
            num_labels,
            trans: vec![f64::NEG_INFINITY; (num_labels + 1) * num_labels],
            ..Default::default()
        }
    }

    pub fn set_num_items(&mut self, t: usize) {
        let l = self.num_labels;
        self.num_items = t;
        if self.cap_items < t {
            self.cells.resize((t + 1) * l.max(1), Cell::default());
            self.state.resize(t * l, 0.0);
            self.cap_items = t;
        }
    }

    fn reset(&mut self) {
        let n = (self.num_items + 1) * self.num_labels.max(1);
        self.cells[..n].fill(Cell::default());
    }

    #[inline]
    fn cell(&self, t: usize, j: usize) -> &Cell {
        &self.cells[self.num_labels * t + j]
    }

    /// Fills the lattice and writes the best path into `labels`, returning its log score.
    ///
    /// Ties go to the lowest tag index. `None` when no path has a finite score.
    pub fn viterbi(&mut self, labels: &mut Vec<usize>) -> Option<f64> {
        let t_max = self.num_items;
        let l = self.num_labels;
        labels.clear();
        if t_max == 0 {
            return Some(0.0);
        }
        self.reset();
        self.cells[0] = Cell {
            score: 0.0,
            back: None,
        };

        for t in 1..=t_max {
            // predecessors of the first word are the start state only
            let preds = if t == 1 { 1 } else { l };
            for j in 0..l {
                let emit = self.state[l * (t - 1) + j];
                let mut best = Cell::default();
                for k in 0..preds {
                    let src = if t == 1 { l } else { k };
                    let score = self.cell(t - 1, k).score + self.trans[l * src + j] + emit;
                    if score > best.score {
                        best = Cell {
                            score,
                            back: Some(k),
                        };
                    }
                }
                self.cells[l * t + j] = best;
            }
        }

        let mut last = 0;
        let mut max_score = f64::NEG_INFINITY;
        for j in 0..l {
            let score = self.cell(t_max, j).score;
            if score > max_score {
                max_score = score;
                last = j;
            }
        }
        if max_score == f64::NEG_INFINITY {
            return None;
        }

        labels.resize(t_max, 0);
        let mut cur = last;
        for t in (1..=t_max).rev() {
            labels[t - 1] = cur;
            match self.cell(t, cur).back {
                Some(k) => cur = k,
                None => {
                    labels.clear();
                    return None;
                }
            }
        }
        Some(max_score)
    }
}

/// Viterbi decoder over a trained [`HmmModel`].
pub struct HmmTagger<'a> {
    model: &'a HmmModel,
    ctx: ViterbiContext,
    log_floor: f64,
}

impl<'a> HmmTagger<'a> {
    pub fn new(model: &'a HmmModel) -> Result<Self> {
        let tags = model.tags();
        if tags.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        if model.transition().is_empty() {
            return Err(Error::EmptyModel);
        }
        check_floor(model.transition().floor())?;
        check_floor(model.emission().floor())?;
        let l = tags.len();
        let mut ctx = ViterbiContext::new(l);
        /* Transition scores, row #l is the transition from the start sentinel. */
        let sources = tags.iter().chain(std::iter::once(super::trainer::START));
        for (i, src) in sources.enumerate() {
            for (j, dst) in tags.iter().enumerate() {
                ctx.trans[l * i + j] = model.transition().frequency(src, dst).ln();
            }
        }
        Ok(Self {
            model,
            ctx,
            log_floor: model.emission().floor().ln(),
        })
    }

    fn set_words<S: AsRef<str>>(&mut self, words: &[S]) {
        let l = self.ctx.num_labels;
        self.ctx.set_num_items(words.len());
        let emission = self.model.emission();
        for (t, word) in words.iter().enumerate() {
            for (j, tag) in self.model.tags().iter().enumerate() {
                self.ctx.state[l * t + j] = emission
                    .get(tag, word.as_ref())
                    .map(|o| o.probability.ln())
                    .unwrap_or(self.log_floor);
            }
        }
    }

    /// Best tag ids for `words` and the log probability of that path.
    pub fn viterbi<S: AsRef<str>>(&mut self, words: &[S], labels: &mut Vec<usize>) -> Result<f64> {
        self.set_words(words);
        self.ctx.viterbi(labels).ok_or(Error::NoPath)
    }
}

/// Unseen pairs score `ln(floor)`, which must be finite.
fn check_floor(floor: f64) -> Result<()> {
    if floor.is_finite() && floor > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "floor".to_string(),
            value: floor.to_string(),
        })
    }
}

impl<'a> Tagger for HmmTagger<'a> {
    fn tag<S: AsRef<str>>(&mut self, words: &[S]) -> Result<Vec<String>> {
        let mut labels = Vec::with_capacity(words.len());
        let score = self.viterbi(words, &mut labels)?;
        let tags = self.model.tags();
        let prediction: Vec<String> = labels
            .iter()
            .filter_map(|&i| tags.to_str(i))
            .map(str::to_string)
            .collect();
        log::debug!("tagged {} words, log score {score}: {:?}", words.len(), prediction);
        Ok(prediction)
    }
}
