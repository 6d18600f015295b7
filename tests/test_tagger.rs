use std::fs::File;

use hmmpos::{
    evaluation, Dataset, Error, FrequencyTable, Generator, HmmModel, Tagger, DEFAULT_FLOOR, START,
};

fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn single_sentence_model() -> HmmModel {
    let ds: Dataset = "The_DT dog_NN barks_VBZ".parse().unwrap();
    hmmpos::train(&ds)
}

fn read(fpath: &str) -> Dataset {
    let f = File::open(fpath).expect("failed to open file");
    Dataset::try_from(f).expect("failed to read file")
}

#[test]
fn single_sentence_tables() {
    let model = single_sentence_model();
    let trans = model.transition();
    for (ctx, tag) in [(START, "DT"), ("DT", "NN"), ("NN", "VBZ")] {
        let dist = trans.context(ctx).unwrap();
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.get(tag).unwrap().probability, 1.0);
    }
    assert!(trans.context("VBZ").is_none());

    let emit = model.emission();
    for (tag, word) in [("DT", "The"), ("NN", "dog"), ("VBZ", "barks")] {
        assert_eq!(emit.context(tag).unwrap().len(), 1);
        assert_eq!(emit.frequency(tag, word), 1.0);
    }
}

#[test]
fn single_sentence_decode() {
    init();
    let model = single_sentence_model();
    let mut tagger = model.tagger().unwrap();
    assert_eq!(
        tagger.tag(&["The", "dog", "barks"]).unwrap(),
        ["DT", "NN", "VBZ"]
    );
}

#[test]
fn training_sentence_accuracy() {
    let model = single_sentence_model();
    let ds: Dataset = "The_DT dog_NN barks_VBZ".parse().unwrap();
    assert_eq!(model.evaluate(&ds).unwrap(), 1.0);
}

#[test]
fn empty_test_set() {
    let model = single_sentence_model();
    assert!(matches!(
        model.evaluate(&Dataset::default()),
        Err(Error::NoData)
    ));
    let ds: Dataset = "\n\n".parse().unwrap();
    assert!(matches!(model.evaluate(&ds), Err(Error::NoData)));
}

#[test]
fn generate_single_step() {
    let ds: Dataset = "x_X".parse().unwrap();
    let model = hmmpos::train(&ds);
    let table: &FrequencyTable = model.transition();
    assert!(table.context("X").is_none());
    let mut gen = Generator::seeded(42);
    assert_eq!(gen.generate(table).unwrap(), ["X"]);
}

#[test]
fn training_is_idempotent() {
    let ds = read("tests/data/train.txt");
    let a = hmmpos::train(&ds);
    let b = hmmpos::train(&ds);
    for (ta, tb) in [(a.transition(), b.transition()), (a.emission(), b.emission())] {
        assert_eq!(ta.contexts().collect::<Vec<_>>(), tb.contexts().collect::<Vec<_>>());
        for ctx in ta.contexts() {
            for o in ta.context(ctx).unwrap().outcomes() {
                assert_eq!(tb.frequency(ctx, &o.label), o.probability);
            }
        }
    }
}

#[test]
fn distributions_are_normalized() {
    let model = hmmpos::train(&read("tests/data/train.txt"));
    for table in [model.transition(), model.emission()] {
        for ctx in table.contexts() {
            let dist = table.context(ctx).unwrap();
            let sum: f64 = dist.outcomes().iter().map(|o| o.probability).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{ctx}: {sum}");
            let last = dist.outcomes().last().unwrap().cumulative;
            assert!((last - 1.0).abs() < 1e-9, "{ctx}: {last}");
        }
    }
}

#[test]
fn unseen_pairs_get_the_floor() {
    let model = hmmpos::train(&read("tests/data/train.txt"));
    assert_eq!(model.emission().frequency("NN", "xylophone"), DEFAULT_FLOOR);
    assert_eq!(model.transition().frequency("MD", "DT"), DEFAULT_FLOOR);
    assert_eq!(model.transition().frequency("UNSEEN", "DT"), DEFAULT_FLOOR);
    // unknown words still decode, one tag per word
    let tags = model.label(&["xylophone", "quux", "dog"]).unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[2], "NN");
}

#[test]
fn held_out_accuracy() {
    init();
    let model = hmmpos::train(&read("tests/data/train.txt"));
    let test = read("tests/data/test.txt");
    let mut tagger = model.tagger().unwrap();
    let mut ev = evaluation::run(&mut tagger, &test).unwrap();
    let est = ev.evaluate().unwrap();
    println!("{}", ev);
    assert_eq!(est.accuracy, 1.0);
    assert_eq!(est.instance_accuracy, 1.0);
    assert_eq!(
        model.label(&["I", "can", "swim"]).unwrap(),
        ["PRP", "MD", "VB"]
    );
}

#[test]
fn decode_with_empty_model() {
    let model = hmmpos::train(&Dataset::default());
    assert!(matches!(model.tagger(), Err(Error::EmptyVocabulary)));
    assert!(matches!(model.label(&["dog"]), Err(Error::EmptyVocabulary)));
}

#[test]
fn generated_sentences_use_training_vocabulary() {
    let ds = read("tests/data/train.txt");
    let model = hmmpos::train(&ds);
    let mut gen = Generator::seeded(2024);
    for _ in 0..20 {
        let sentence = gen.sentence(&model).unwrap();
        assert!(!sentence.is_empty());
        for (word, tag) in &sentence {
            assert!(model.tags().contains(tag));
            assert!(model.emission().get(tag, word).is_some(), "{word}_{tag}");
        }
    }
}
