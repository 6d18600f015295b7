use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use hmmpos::{
    evaluation, Dataset, DumpOpt, Generator, HmmModel, Model, Result, StringTable, Tagger, Trainer,
    TrainerOptions,
};

/// Train a bigram HMM part-of-speech tagger on a `word_TAG` corpus and use it.
#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// training corpus, one sentence of `word_TAG` tokens per line
    #[arg(short, long, value_name = "CORPUS")]
    model: PathBuf,
    /// training parameter as NAME=VALUE (e.g. floor=1e-8)
    #[arg(short)]
    parameters: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assign tags to the sentences of FILE (or STDIN), one sentence per line
    Tag {
        #[arg(value_name = "FILE")]
        datasets: Vec<PathBuf>,
    },
    /// Report the performance of the model on labelled data
    Evaluate {
        #[arg(required = true, value_name = "FILE")]
        datasets: Vec<PathBuf>,
    },
    /// Sample sentences from the trained tables
    Generate {
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        #[arg(long, default_value_t = hmmpos::hmm::generator::DEFAULT_MAX_STEPS)]
        max_steps: usize,
        /// output `word_TAG` tokens instead of words only
        #[arg(short, long)]
        tags: bool,
    },
    /// Output the trained tables as JSON
    Dump {
        #[arg(long)]
        transition: bool,
        #[arg(long)]
        emission: bool,
        #[arg(long)]
        tags: bool,
    },
}

fn load(path: &Path, parameters: &[String]) -> Result<HmmModel> {
    let mut opt = TrainerOptions::default();
    for s in parameters {
        match s.split_once('=') {
            Some((name, value)) => opt.set(name, value)?,
            None => log::warn!("ignoring parameter without value: {s}"),
        }
    }
    log::info!("reading training data from {:?}", path);
    let ds = Dataset::try_from(File::open(path)?)?;
    let mut trainer = Trainer::new(opt);
    trainer.append_all(&ds);
    let model = trainer.train();
    log::info!("candidate tags: {}", model.get_labels().len());
    Ok(model)
}

fn tag_lines<M: Model, R: BufRead, W: Write>(model: &M, input: R, out: &mut W) -> Result<()> {
    let mut tagger = model.get_tagger()?;
    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let tags = tagger.tag(&words)?;
        let tokens: Vec<String> = words
            .iter()
            .zip(&tags)
            .map(|(w, t)| format!("{w}_{t}"))
            .collect();
        writeln!(out, "{}", tokens.join(" "))?;
    }
    Ok(())
}

fn run(argv: Argv) -> Result<()> {
    let model = load(&argv.model, &argv.parameters)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match argv.command {
        Command::Tag { datasets } if datasets.is_empty() => {
            tag_lines(&model, io::stdin().lock(), &mut out)?;
        }
        Command::Tag { datasets } => {
            for fpath in datasets {
                tag_lines(&model, BufReader::new(File::open(fpath)?), &mut out)?;
            }
        }
        Command::Evaluate { datasets } => {
            let mut ds = Dataset::default();
            for fpath in datasets {
                Dataset::try_from(File::open(fpath)?)?
                    .seqs
                    .into_iter()
                    .for_each(|s| ds.push(s));
            }
            let mut tagger = model.get_tagger()?;
            let mut evaluation = evaluation::run(&mut tagger, &ds)?;
            evaluation.evaluate()?;
            write!(out, "{}", evaluation)?;
        }
        Command::Generate {
            seed,
            count,
            max_steps,
            tags,
        } => {
            let mut gen = Generator::seeded(seed).with_max_steps(max_steps);
            for _ in 0..count {
                let sentence = gen.sentence(&model)?;
                let tokens: Vec<String> = sentence
                    .into_iter()
                    .map(|(w, t)| if tags { format!("{w}_{t}") } else { w })
                    .collect();
                writeln!(out, "{}", tokens.join(" "))?;
            }
        }
        Command::Dump {
            transition,
            emission,
            tags,
        } => {
            let mut opt = DumpOpt::empty();
            opt.set(DumpOpt::TRANSITION, transition);
            opt.set(DumpOpt::EMISSION, emission);
            opt.set(DumpOpt::TAGS, tags);
            if opt.is_empty() {
                opt = DumpOpt::all();
            }
            model.dump(&mut out, opt)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() {
    let argv = Argv::parse();
    let mut builder = env_logger::Builder::from_default_env();
    match argv.verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.init();
    log::debug!("argv: {:?}", argv);
    if let Err(e) = run(argv) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
