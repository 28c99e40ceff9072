use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use voice_detector::batch::{classify_files, collect_inputs};
use voice_detector::request::{AudioRequest, PredictionResponse};
use voice_detector::{Classifier, InferenceConfig, InferencePipeline, LogisticModel, StubClassifier};

#[derive(Parser, Debug)]
#[command(name = "voice-detector")]
#[command(about = "Classify speech clips as human or machine-generated", long_about = None)]
struct Args {
    /// Audio files or directories to classify
    inputs: Vec<PathBuf>,

    /// Read a base64-encoded audio payload from stdin
    #[arg(long)]
    stdin: bool,

    /// Read a JSON request body (with an audio_base64 field) from stdin
    #[arg(long, conflicts_with = "stdin")]
    request: bool,

    /// Path to the trained model (JSON artifact)
    #[arg(short = 'm', long, env = "MODEL_PATH", default_value = "model/detector.json")]
    model: String,

    /// Use a fixed stub classifier instead of loading a model
    #[arg(long)]
    stub: bool,

    /// Seconds of audio analysed per clip (default: 6)
    #[arg(long, default_value = "6.0")]
    max_duration: f32,

    /// Stop decoding each file after this many seconds of source audio
    #[arg(long, default_value = "60.0")]
    max_decode: f32,

    /// Per-request deadline in milliseconds for --stdin/--request
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = InferenceConfig::new()
        .with_max_duration(args.max_duration)
        .with_max_decode(args.max_decode);
    config.validate().context("Invalid configuration")?;

    if args.stub {
        log::info!("Voice Detector (stub classifier)");
        let classifier = StubClassifier::new(config.features.dimension());
        run(&args, InferencePipeline::new(config, classifier))
    } else {
        log::info!("Voice Detector");
        let model_path = shellexpand::tilde(&args.model);
        let model = LogisticModel::load(PathBuf::from(model_path.as_ref()).as_path())?;
        run(&args, InferencePipeline::new(config, model))
    }
}

fn run<C: Classifier + 'static>(args: &Args, pipeline: InferencePipeline<C>) -> Result<()> {
    pipeline
        .check_dimensions()
        .context("Model does not match the configured feature layout")?;
    log::info!(
        "Analysing up to {:.1}s per clip at {}Hz",
        pipeline.config().max_duration_seconds,
        pipeline.config().target_sample_rate
    );

    if args.stdin || args.request {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read stdin")?;

        let payload = if args.request {
            match AudioRequest::from_json(&body) {
                Ok(request) => request.audio_base64,
                Err(e) => {
                    log::warn!("{:#}", e);
                    None
                }
            }
        } else {
            Some(body)
        };

        let prediction = match (payload, args.timeout_ms) {
            (Some(payload), Some(ms)) => {
                let pipeline = Arc::new(pipeline);
                InferencePipeline::infer_with_timeout(&pipeline, payload, Duration::from_millis(ms))
            }
            (payload, _) => pipeline.infer_request(payload.as_deref()),
        };

        println!("{}", serde_json::to_string(&PredictionResponse::new(prediction, None))?);
        return Ok(());
    }

    if args.inputs.is_empty() {
        anyhow::bail!("No inputs given: pass audio files or directories, --stdin or --request");
    }

    let files = collect_inputs(&args.inputs);
    log::info!("Classifying {} file(s)", files.len());

    for response in classify_files(&pipeline, &files) {
        println!("{}", serde_json::to_string(&response)?);
    }

    log::info!("Done");
    Ok(())
}
