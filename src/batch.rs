// src/batch.rs
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::io::{write_points, OutputFormat, RasterSource, TableSource};
use crate::pipeline::FirePipeline;

#[derive(Deserialize, Serialize, Debug)]
pub struct BatchConfig {
    #[serde(default)]
    pub global: PipelineConfig,
    /// Worker threads; defaults to the number of CPUs
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub format: OutputFormat,
    pub jobs: Vec<Job>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Job {
    pub raster: PathBuf,
    pub table: PathBuf,
    pub output: PathBuf,
    pub threshold: Option<f64>,
    pub format: Option<OutputFormat>,
}

/// Outcome of one job, reported in job order.
#[derive(Debug)]
pub struct JobReport {
    pub index: usize,
    pub output: PathBuf,
    pub result: std::result::Result<usize, String>,
}

impl BatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading batch config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing batch config {}", path.display()))?;
        Ok(config)
    }
}

/// Run every job of `config` against one shared classifier.
///
/// Jobs are independent: a failing job is reported and the others still run.
pub fn run_batch(config: &BatchConfig, pipeline: &FirePipeline) -> Vec<JobReport> {
    let workers = config
        .workers
        .unwrap_or_else(num_cpus::get)
        .clamp(1, config.jobs.len().max(1));

    log::info!(
        "Starting batch processing with {} jobs on {} workers",
        config.jobs.len(),
        workers
    );

    let (job_tx, job_rx) = flume::unbounded::<(usize, Job)>();
    for (i, job) in config.jobs.iter().cloned().enumerate() {
        // The receiver is alive until the workers are joined below.
        let _ = job_tx.send((i, job));
    }
    drop(job_tx);

    let reports: Arc<Mutex<Vec<JobReport>>> = Arc::new(Mutex::new(Vec::new()));
    let total = config.jobs.len();
    let default_format = config.format;

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let job_rx = job_rx.clone();
            let reports = Arc::clone(&reports);
            let pipeline = pipeline.clone();

            thread::spawn(move || {
                for (index, job) in job_rx {
                    log::info!(
                        "[{}/{}] {} + {} -> {}",
                        index + 1,
                        total,
                        job.raster.display(),
                        job.table.display(),
                        job.output.display()
                    );

                    let result = run_job(&pipeline, &job, default_format).map_err(|e| {
                        log::error!("[{}/{}] failed: {:#}", index + 1, total, e);
                        format!("{:#}", e)
                    });

                    reports.lock().push(JobReport {
                        index,
                        output: job.output,
                        result,
                    });
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            log::error!("Batch worker panicked");
        }
    }

    let mut reports = std::mem::take(&mut *reports.lock());
    reports.sort_by_key(|r| r.index);
    reports
}

fn run_job(pipeline: &FirePipeline, job: &Job, default_format: OutputFormat) -> Result<usize> {
    let mut config = pipeline.config().clone();
    if let Some(threshold) = job.threshold {
        config.threshold = threshold;
    }
    let job_pipeline = FirePipeline::new(Arc::clone(pipeline.model()), config)?;

    let points = job_pipeline.detect(
        RasterSource::Path(job.raster.clone()),
        TableSource::Path(job.table.clone()),
    )?;

    let file = File::create(&job.output)
        .with_context(|| format!("creating {}", job.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_points(&mut writer, &points, job.format.unwrap_or(default_format))?;
    writer.flush()?;

    Ok(points.len())
}
