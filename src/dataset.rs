use std::{
    fs::File,
    io::{BufRead, BufReader},
    str::FromStr,
};

use crate::error::{Error, Result};

/// A tagged sentence, words and tags are aligned by position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl Sentence {
    pub fn push(&mut self, word: &str, tag: &str) {
        self.words.push(word.to_string());
        self.tags.push(tag.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.words
            .iter()
            .zip(&self.tags)
            .map(|(w, t)| (w.as_str(), t.as_str()))
    }

    /// Parses one corpus line: `The_DT dog_NN barks_VBZ`.
    ///
    /// Tokens split at their last `_`, so `New_York_NNP` is the word `New_York`.
    pub fn parse_line(line: &str, lineno: usize) -> Result<Self> {
        let mut sentence = Sentence::default();
        for token in line.split_whitespace() {
            match token.rsplit_once('_') {
                Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
                    sentence.push(word, tag)
                }
                _ => {
                    return Err(Error::InvalidToken {
                        line: lineno,
                        token: token.to_string(),
                    })
                }
            }
        }
        Ok(sentence)
    }
}

impl<W: AsRef<str>, T: AsRef<str>> FromIterator<(W, T)> for Sentence {
    fn from_iter<I: IntoIterator<Item = (W, T)>>(iter: I) -> Self {
        let mut sentence = Sentence::default();
        for (w, t) in iter {
            sentence.push(w.as_ref(), t.as_ref());
        }
        sentence
    }
}

/// A labelled corpus, one sentence per line.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub seqs: Vec<Sentence>,
}

impl Dataset {
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut ds = Dataset::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            ds.push(Sentence::parse_line(&line, i + 1)?);
        }
        log::debug!("read {} sentences, {} items", ds.len(), ds.total_items());
        Ok(ds)
    }

    pub fn push(&mut self, sentence: Sentence) {
        if !sentence.is_empty() {
            self.seqs.push(sentence);
        }
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.seqs.iter()
    }

    pub fn max_length(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).sum()
    }
}

impl TryFrom<File> for Dataset {
    type Error = Error;

    fn try_from(f: File) -> Result<Self> {
        Dataset::read(BufReader::new(f))
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dataset::read(s.as_bytes())
    }
}

impl FromIterator<Sentence> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sentence>>(iter: I) -> Self {
        let mut ds = Dataset::default();
        iter.into_iter().for_each(|s| ds.push(s));
        ds
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs.iter()
    }
}
