// src/main.rs
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use fire_detect::batch::{run_batch, BatchConfig};
use fire_detect::cli::{Cli, Commands};
use fire_detect::config::PipelineConfig;
use fire_detect::io::{load_pixel_features, write_feature_table, write_points, RasterSource, TableSource};
use fire_detect::model::{shared_model, Classifier};
use fire_detect::pipeline::FirePipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }

    match cli.command {
        Commands::Points {
            raster,
            table,
            output,
            threshold,
            format,
        } => {
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            let pipeline = build_pipeline(config)?;
            let points = pipeline
                .detect(RasterSource::Path(raster), TableSource::Path(table))
                .context("fire point detection failed")?;
            let mut out = open_output(output.as_deref())?;
            write_points(&mut out, &points, format)?;
            out.flush()?;
            log::info!("Wrote {} points", points.len());
        }
        Commands::Features { raster, output } => {
            let (table, info) =
                load_pixel_features(RasterSource::Path(raster), &config.bands, config.epsilon)?;
            let mut out = open_output(output.as_deref())?;
            write_feature_table(&mut out, &table)?;
            out.flush()?;
            log::info!("Wrote features for {} x {} pixels", info.height, info.width);
        }
        Commands::Schema => {
            let pipeline = build_pipeline(config)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for name in pipeline.model().schema().names() {
                writeln!(out, "{}", name)?;
            }
        }
        Commands::Batch { batch } => {
            let batch_config = BatchConfig::from_file(&batch)?;
            let mut config = batch_config.global.clone();
            if let Some(model) = &cli.model {
                config.model_path = model.clone();
            }
            let pipeline = build_pipeline(config)?;
            let reports = run_batch(&batch_config, &pipeline);

            let failed = reports.iter().filter(|r| r.result.is_err()).count();
            for report in &reports {
                match &report.result {
                    Ok(n) => println!("{}: {} points", report.output.display(), n),
                    Err(e) => println!("{}: FAILED ({})", report.output.display(), e),
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} batch jobs failed", failed, reports.len());
            }
            println!("Batch processing complete!");
        }
    }

    Ok(())
}

fn build_pipeline(config: PipelineConfig) -> Result<FirePipeline> {
    let model = shared_model(&config.model_path)
        .with_context(|| format!("loading model {}", config.model_path.display()))?;
    Ok(FirePipeline::new(model, config)?)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
