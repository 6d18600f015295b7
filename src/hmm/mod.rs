//! Bigram hidden Markov model: counting trainer, Viterbi tagger and a
//! Markov-chain sampler over the trained tables.

pub mod freq;
pub mod generator;
pub mod model;
pub mod tagger;
pub mod trainer;
