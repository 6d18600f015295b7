use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{freq::FrequencyTable, model::HmmModel, trainer::START};
use crate::error::{Error, Result};

pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Random walk over a frequency table, starting from `^`.
///
/// Each step draws from [0, 1) and takes the first outcome whose cumulative
/// mass reaches the draw; the walk ends at a context with no outgoing entries.
#[derive(Debug)]
pub struct Generator<R: Rng> {
    rng: R,
    max_steps: usize,
}

impl Generator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn generate(&mut self, table: &FrequencyTable) -> Result<Vec<String>> {
        let mut seq = Vec::new();
        let mut ctx = START.to_string();
        while let Some(dist) = table.context(&ctx) {
            if seq.len() >= self.max_steps {
                log::warn!("generation stopped after {} steps", self.max_steps);
                return Err(Error::GenerationLimit {
                    limit: self.max_steps,
                });
            }
            let draw: f64 = self.rng.gen();
            match dist.sample(draw) {
                Some(o) => ctx = o.label.clone(),
                None => break,
            }
            seq.push(ctx.clone());
        }
        Ok(seq)
    }

    /// Samples a tag path from the transition table and a word for each tag
    /// from its emission distribution.
    pub fn sentence(&mut self, model: &HmmModel) -> Result<Vec<(String, String)>> {
        if model.transition().is_empty() {
            return Err(Error::EmptyModel);
        }
        let tags = self.generate(model.transition())?;
        let mut sentence = Vec::with_capacity(tags.len());
        for tag in tags {
            let draw: f64 = self.rng.gen();
            let word = model
                .emission()
                .context(&tag)
                .and_then(|d| d.sample(draw))
                .map(|o| o.label.clone())
                .ok_or_else(|| Error::MissingEmission { tag: tag.clone() })?;
            sentence.push((word, tag));
        }
        Ok(sentence)
    }
}
