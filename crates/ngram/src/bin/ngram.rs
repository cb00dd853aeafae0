use std::path::PathBuf;
use std::process::ExitCode;

use ngram::{
    load_corpus, CountingModel, Generator, PipelineConfig, PipelineContext, PipelineError,
    Strategy, VocabularyStore,
};

const USAGE: &str = "usage: ngram --dataFilePath=<corpus.txt> [-T|--train] [--name=<model>] \
[--initializer=<seed_text>] [--tokens=<n>] [--temperature=<t>] [--config=<config.json>]";

#[derive(Debug, Default)]
struct Args {
    train: bool,
    name: String,
    initializer: Option<String>,
    data_file: Option<PathBuf>,
    config: Option<PathBuf>,
    tokens: usize,
    temperature: Option<f32>,
}

fn value<'a>(arg: &'a str, flag: &str) -> Option<&'a str> {
    arg.strip_prefix(flag).and_then(|rest| rest.strip_prefix('='))
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, PipelineError> {
    let mut args = Args {
        name: "default".into(),
        tokens: 50,
        ..Default::default()
    };
    for arg in raw {
        if arg == "-T" || arg == "--train" {
            args.train = true;
        } else if let Some(v) = value(&arg, "--name") {
            args.name = v.to_string();
        } else if let Some(v) = value(&arg, "--initializer") {
            // underscores stand in for spaces so the seed survives shells
            args.initializer = Some(v.replace('_', " "));
        } else if let Some(v) = value(&arg, "--dataFilePath") {
            args.data_file = Some(PathBuf::from(v));
        } else if let Some(v) = value(&arg, "--config") {
            args.config = Some(PathBuf::from(v));
        } else if let Some(v) = value(&arg, "--tokens") {
            args.tokens = v
                .parse()
                .map_err(|e| PipelineError::Config(format!("--tokens={v}: {e}")))?;
        } else if let Some(v) = value(&arg, "--temperature") {
            let t = v
                .parse()
                .map_err(|e| PipelineError::Config(format!("--temperature={v}: {e}")))?;
            args.temperature = Some(t);
        } else {
            log::warn!("ignoring unknown argument {arg}");
        }
    }
    Ok(args)
}

fn run(args: &Args) -> Result<(), PipelineError> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let store = VocabularyStore::new(&config.vocabulary_dir, config.save_failure_policy);
    let data = args
        .data_file
        .as_ref()
        .ok_or_else(|| PipelineError::Config(format!("--dataFilePath is required\n{USAGE}")))?;
    let text = load_corpus(data, config.max_corpus_chars)?;

    let ctx = if args.train {
        let ctx = PipelineContext::from_corpus(&text, &config)?;
        store.save(&args.name, ctx.vocabulary())?;
        // the optimizer lives outside this crate; walk one epoch to hand
        // batches over the same way a training loop would pull them
        let mut batches = ctx.batches(&config)?;
        let mut seen = 0usize;
        for batch in batches.epoch() {
            let batch = batch?;
            seen += batch.len();
        }
        println!(
            "[train] model {}: vocabulary {} ({} distinct corpus tokens), {} samples, \
             {} batches/epoch ({} samples pulled), inputs [{}, {}, {}]",
            args.name,
            ctx.vocabulary().len(),
            ctx.frequencies().len(),
            ctx.samples().len(),
            batches.batches_per_epoch(),
            seen,
            config.batch_size,
            ctx.window_len(),
            ctx.vocabulary().len()
        );
        ctx
    } else {
        let vocab = store.load(&args.name)?;
        PipelineContext::from_corpus_with_vocabulary(&text, vocab, config.sequence_length)?
    };

    if let Some(seed) = &args.initializer {
        let model = CountingModel::fit(ctx.samples(), ctx.vocabulary().len());
        let generator = Generator::new(&model, ctx.vocabulary(), ctx.window_len())?
            .with_strategy(Strategy::from_temperature(args.temperature));
        let mut rng = sampler::make_rng(config.seed);
        println!("{}", generator.run_text(seed, args.tokens, &mut rng)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
