//! Part-of-speech tagging with a bigram hidden Markov model.
//!
//! ```
//! use hmmpos::{Dataset, Tagger};
//!
//! let ds: Dataset = "The_DT dog_NN barks_VBZ".parse().unwrap();
//! let model = hmmpos::train(&ds);
//! let mut tagger = model.tagger().unwrap();
//! assert_eq!(tagger.tag(&["The", "dog", "barks"]).unwrap(), ["DT", "NN", "VBZ"]);
//! ```

pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod hmm;
pub mod quark;

pub use dataset::{Dataset, Sentence};
pub use error::{Error, Result};
pub use evaluation::{Estimation, Evaluation};
pub use hmm::{
    freq::{FrequencyTable, Outcome, DEFAULT_FLOOR},
    generator::Generator,
    model::{DumpOpt, HmmModel, Model},
    tagger::{HmmTagger, Tagger},
    trainer::{train, Trainer, TrainerOptions, START},
};
pub use quark::{Quark, StringTable};
