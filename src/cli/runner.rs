use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use monocast::{DirectorySink, FileFrameSource, PipelineConfig, Session};

use super::args::CliArgs;
use super::errors::AppError;

fn build_config(args: &CliArgs) -> Result<PipelineConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading pipeline config from {:?}", path);
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(interval_ms) = args.interval_ms {
        if interval_ms == 0 {
            return Err(AppError::ZeroInterval);
        }
        config.interval_ms = interval_ms;
    }
    if let Some(size) = args.size {
        if size == 0 {
            return Err(AppError::ZeroSize { size });
        }
        config.target_width = size;
        config.target_height = size;
    }
    if let Some(rotation) = args.rotation {
        config.rotation = rotation;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(filter) = args.filter {
        config.resize_filter = filter;
    }
    if args.diagnostics {
        config.diagnostics = true;
    }

    config.validate()?;
    Ok(config)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = build_config(&args)?;
    let source = FileFrameSource::new(
        &args.input_dir,
        args.width,
        args.height,
        Duration::from_millis(args.frame_spacing_ms),
    );
    let sink = DirectorySink::new(&args.output_dir).map_err(AppError::from)?;

    info!("Input directory: {:?}", args.input_dir);
    info!("Output directory: {:?}", args.output_dir);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime
        .block_on(async {
            let (mut session, _handle) = Session::new(config, source, sink);
            session.run().await
        })
        .map_err(AppError::from)?;

    info!("Replay complete!");
    println!(
        "{}",
        serde_json::to_string_pretty(&report).map_err(AppError::from)?
    );
    Ok(())
}
