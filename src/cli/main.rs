//! genmedia CLI
//!
//! Three subcommands map onto the library's task pipelines. All failures
//! are caught here, logged with full detail, and converted to exit code 1
//! with a short user-facing message.

use crate::config::ClientConfig;
use crate::error::GenMediaError;
use crate::job::{GenerationJob, JobStatus};
use crate::locator::StorageLocator;
use crate::pipeline::{GenerationPipeline, ReplaceBackgroundOptions, VideoOptions};
use crate::tracing_config::init_cli_tracing;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Generative media CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "genmedia")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the inference runtime API [env: GENMEDIA_ENDPOINT_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Base URL of the object-store gateway [env: GENMEDIA_STORAGE_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub storage_url: Option<String>,

    /// Bearer token for the endpoint and store [env: GENMEDIA_API_TOKEN]
    #[arg(long, global = true, value_name = "TOKEN")]
    pub api_token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove the background from an image
    RemoveBackground {
        /// Input image: local path or s3://container/key
        input: String,
        /// Output location for the PNG cutout
        output: String,
        /// Image model id [default: amazon.nova-canvas-v1:0]
        #[arg(long)]
        model: Option<String>,
    },
    /// Replace an image's background with a prompted scene
    ReplaceBackground {
        /// Input image: local path or s3://container/key
        input: String,
        /// Description of the desired background
        background_prompt: String,
        /// Output location for the PNG result
        #[arg(short, long, default_value = "output_background_changed.png")]
        output: String,
        /// Description of the region to keep
        #[arg(long, default_value = "person")]
        mask_prompt: String,
        /// Prompt adherence strength
        #[arg(long, default_value_t = 8.0)]
        cfg_scale: f32,
        /// Fixed generation seed [default: random]
        #[arg(long)]
        seed: Option<u32>,
        /// Image model id [default: amazon.nova-canvas-v1:0]
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate a video from a text prompt
    TextToVideo {
        /// Description of the desired video
        prompt: String,
        /// Object-store prefix the artifact is written under (s3://container/prefix)
        output_prefix: String,
        /// Optional reference frame, resized to the model's dimensions
        #[arg(long, value_name = "PATH")]
        reference_image: Option<String>,
        /// Video length in seconds
        #[arg(long, default_value_t = 6)]
        duration: u32,
        /// Frames per second
        #[arg(long, default_value_t = 24)]
        fps: u32,
        /// Output dimension
        #[arg(long, default_value = "1280x720")]
        dimension: String,
        /// Fixed generation seed [default: random]
        #[arg(long)]
        seed: Option<u32>,
        /// Seconds between status polls
        #[arg(long, default_value_t = 30)]
        poll_interval: u64,
        /// Give up waiting after this many seconds (the job keeps running remotely)
        #[arg(long, value_name = "SECONDS")]
        max_wait: Option<u64>,
        /// Submit the job and exit without waiting for completion
        #[arg(long)]
        no_wait: bool,
        /// Video model id [default: amazon.nova-reel-v1:0]
        #[arg(long)]
        model: Option<String>,
    },
}

pub async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_cli_tracing(cli.verbose) {
        eprintln!("Failed to initialize tracing: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Expected business outcomes get a plain message; everything
            // else keeps its context chain for diagnostics.
            match e.downcast_ref::<GenMediaError>() {
                Some(err) if err.is_expected_outcome() => error!("{err}"),
                _ => error!("{e:#}"),
            }
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let pipeline = GenerationPipeline::new(config).context("Failed to build clients")?;

    match cli.command {
        Command::RemoveBackground { input, output, .. } => {
            let input = StorageLocator::from_arg(&input)?;
            let output = StorageLocator::from_arg(&output)?;

            info!(model = %pipeline.config().image_model_id, %input, %output, "removing background");
            let bytes = pipeline.read_input(&input).await?;
            let png = pipeline.remove_background_bytes(&bytes).await?;
            pipeline.write_png_output(&png, &output).await?;

            println!("Background removed; output saved to {output}");
            Ok(())
        },
        Command::ReplaceBackground {
            input,
            background_prompt,
            output,
            mask_prompt,
            cfg_scale,
            seed,
            ..
        } => {
            let input = StorageLocator::from_arg(&input)?;
            let output = StorageLocator::from_arg(&output)?;
            let options = ReplaceBackgroundOptions {
                mask_prompt,
                cfg_scale,
                seed,
            };

            info!(model = %pipeline.config().image_model_id, %input, %output, "replacing background");
            let bytes = pipeline.read_input(&input).await?;
            let png = pipeline
                .replace_background_bytes(&bytes, &background_prompt, &options)
                .await?;
            pipeline.write_png_output(&png, &output).await?;

            println!("Background replaced; output saved to {output}");
            Ok(())
        },
        Command::TextToVideo {
            prompt,
            output_prefix,
            reference_image,
            duration,
            fps,
            dimension,
            seed,
            no_wait,
            ..
        } => {
            let prefix = StorageLocator::from_arg(&output_prefix)?;

            let reference_image = match reference_image {
                Some(path) => Some(
                    pipeline
                        .read_input(&StorageLocator::from_arg(&path)?)
                        .await
                        .context("Failed to read reference image")?,
                ),
                None => None,
            };
            let options = VideoOptions {
                duration_seconds: duration,
                fps,
                dimension,
                seed,
                reference_image,
            };

            info!(model = %pipeline.config().video_model_id, %prefix, "starting video generation");
            let job = pipeline.start_video_job(&prompt, &options, &prefix).await?;
            println!("Job submitted: {}", job.handle());
            println!("Output location: {}", job.output_location());

            if no_wait {
                return Ok(());
            }

            let done = wait_with_spinner(&pipeline, job).await?;
            report_terminal_job(&done)
        },
    }
}

/// Resolve config from flags with environment-variable fallbacks
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let endpoint_url = resolve(cli.endpoint_url.clone(), "GENMEDIA_ENDPOINT_URL")
        .context("endpoint URL required: pass --endpoint-url or set GENMEDIA_ENDPOINT_URL")?;
    let storage_url = resolve(cli.storage_url.clone(), "GENMEDIA_STORAGE_URL")
        .context("storage URL required: pass --storage-url or set GENMEDIA_STORAGE_URL")?;

    let mut builder = ClientConfig::builder()
        .endpoint_url(endpoint_url)
        .storage_url(storage_url);

    if let Some(token) = resolve(cli.api_token.clone(), "GENMEDIA_API_TOKEN") {
        builder = builder.api_token(token);
    }

    let (model, poll_interval, max_wait) = command_overrides(&cli.command);
    if let Some(model) = model {
        builder = match cli.command {
            Command::TextToVideo { .. } => builder.video_model_id(model),
            _ => builder.image_model_id(model),
        };
    }
    if let Some(secs) = poll_interval {
        builder = builder.poll_interval(Duration::from_secs(secs));
    }
    if let Some(secs) = max_wait {
        builder = builder.poll_deadline(Some(Duration::from_secs(secs)));
    }

    Ok(builder.build()?)
}

fn resolve(flag: Option<String>, env_var: &str) -> Option<String> {
    flag.or_else(|| std::env::var(env_var).ok()).filter(|v| !v.is_empty())
}

fn command_overrides(command: &Command) -> (Option<String>, Option<u64>, Option<u64>) {
    match command {
        Command::RemoveBackground { model, .. } | Command::ReplaceBackground { model, .. } => {
            (model.clone(), None, None)
        },
        Command::TextToVideo {
            model,
            poll_interval,
            max_wait,
            ..
        } => (model.clone(), Some(*poll_interval), *max_wait),
    }
}

async fn wait_with_spinner(
    pipeline: &GenerationPipeline,
    job: GenerationJob,
) -> Result<GenerationJob> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Waiting for video generation");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline.await_video_job(job).await;
    match &result {
        Ok(job) => spinner.finish_with_message(format!("Job finished: {:?}", job.status())),
        Err(_) => spinner.finish_with_message("Wait aborted"),
    }
    Ok(result?)
}

fn report_terminal_job(job: &GenerationJob) -> Result<()> {
    match job.status() {
        JobStatus::Completed => {
            println!("Video is ready at {}/output.mp4", job.output_location());
            Ok(())
        },
        JobStatus::Failed => {
            // A failed generation is a user-facing outcome, not a crash.
            let detail = job.failure_detail().unwrap_or("no detail provided");
            anyhow::bail!("Video generation failed: {detail}")
        },
        JobStatus::InProgress => {
            // await_video_job only returns terminal jobs.
            anyhow::bail!("Job is still in progress")
        },
    }
}
