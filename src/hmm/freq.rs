use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use serde::Serialize;

/// Probability assigned to a (context, label) pair never seen in training.
pub const DEFAULT_FLOOR: f64 = 1e-8;

/// Raw occurrence counts, context -> label -> count.
///
/// Ordered maps keep the construction order of every distribution stable.
pub type Counts = BTreeMap<String, BTreeMap<String, u64>>;

/// Adds one observation of `label` under `context`.
pub fn observe(counts: &mut Counts, context: &str, label: &str) {
    *counts
        .entry(context.to_string())
        .or_default()
        .entry(label.to_string())
        .or_default() += 1;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub label: String,
    pub probability: f64,
    /// Running sum of probabilities up to and including this outcome.
    pub cumulative: f64,
}

/// Discrete distribution of one context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Distribution {
    outcomes: Vec<Outcome>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Distribution {
    fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        let total: u64 = counts.values().sum();
        debug_assert!(total > 0, "context without observations");
        let mut outcomes = Vec::with_capacity(counts.len());
        let mut index = HashMap::with_capacity(counts.len());
        let mut running = 0.0;
        for (label, &count) in counts {
            let probability = count as f64 / total as f64;
            running += probability;
            index.insert(label.clone(), outcomes.len());
            outcomes.push(Outcome {
                label: label.clone(),
                probability,
                cumulative: running,
            });
        }
        // rounding must not leave a gap below 1.0 for the sampler
        if let Some(last) = outcomes.last_mut() {
            last.cumulative = 1.0;
        }
        Self { outcomes, index }
    }

    pub fn get(&self, label: &str) -> Option<&Outcome> {
        self.index.get(label).map(|&i| &self.outcomes[i])
    }

    /// Outcomes in cumulative (sampling) order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// First outcome whose cumulative mass reaches `draw`.
    pub fn sample(&self, draw: f64) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| draw <= o.cumulative)
            .or_else(|| self.outcomes.last())
    }

    /// Outcomes by descending probability, ties by label.
    pub fn sorted(&self) -> Vec<&Outcome> {
        let mut v: Vec<&Outcome> = self.outcomes.iter().collect();
        v.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        v
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Per-context probability tables built once from counts.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyTable {
    floor: f64,
    contexts: BTreeMap<String, Distribution>,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
            contexts: BTreeMap::new(),
        }
    }
}

impl FrequencyTable {
    pub fn from_counts(counts: &Counts, floor: f64) -> Self {
        let contexts = counts
            .iter()
            .filter(|(_, labels)| labels.values().any(|&c| c > 0))
            .map(|(ctx, labels)| (ctx.clone(), Distribution::from_counts(labels)))
            .collect();
        Self { floor, contexts }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn context(&self, context: &str) -> Option<&Distribution> {
        self.contexts.get(context)
    }

    pub fn get(&self, context: &str, label: &str) -> Option<&Outcome> {
        self.contexts.get(context)?.get(label)
    }

    /// Probability of `label` under `context`, the floor when unseen.
    pub fn frequency(&self, context: &str, label: &str) -> f64 {
        self.get(context, label)
            .map(|o| o.probability)
            .unwrap_or(self.floor)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> + '_ {
        self.contexts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl Display for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (ctx, dist) in &self.contexts {
            writeln!(f, "{ctx}:")?;
            for o in dist.sorted() {
                writeln!(f, "\t{}: {:.6}", o.label, o.probability)?;
            }
        }
        Ok(())
    }
}
