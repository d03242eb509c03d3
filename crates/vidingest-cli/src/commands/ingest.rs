use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::sync::mpsc;

use crate::args::JobOptions;
use vidingest_core::{
    config::Config,
    pipeline::{JobSource, Pipeline, PipelineConfig, PipelineStage},
};

pub async fn run(url: &str, options: &JobOptions, config_path: Option<&Path>) -> Result<()> {
    run_job(
        JobSource::Remote {
            url: url.to_string(),
        },
        options,
        config_path,
    )
    .await
}

pub(crate) async fn run_job(
    source: JobSource,
    options: &JobOptions,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    let pipeline_config = PipelineConfig {
        source,
        output_dir: options.output.clone(),
        keep_temp: options.keep_temp,
        config,
    };

    // Create progress channel
    let (tx, mut rx) = mpsc::channel(32);

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("=>-"),
    );

    // Spawn progress handler
    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::Downloading { title } => {
                    pb.set_position(10);
                    pb.set_message(format!("Downloading: {}", truncate(&title, 40)));
                }
                PipelineStage::Transcoding => {
                    pb.set_position(50);
                    pb.set_message("Extracting audio...");
                }
                PipelineStage::Uploading => {
                    pb.set_position(75);
                    pb.set_message("Uploading to knowledge base...");
                }
                PipelineStage::Complete { audio, duration } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!(
                        "Done: {} ({:.1}s)",
                        audio.display(),
                        duration.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    // Run pipeline
    let pipeline = Pipeline::new(pipeline_config, tx);
    let result = pipeline.run().await;

    // Release the pipeline's progress sender so the handler loop sees the
    // channel close and terminates; otherwise the await below never returns.
    drop(pipeline);

    // Wait for progress handler
    progress_handle.await?;

    match result {
        Ok(output) => {
            println!(
                "\n{} uploaded to the knowledge base (HTTP {})",
                output.title, output.upload.status
            );
            println!("Audio: {}", output.audio_path.display());
            if let Some(video) = output.video_path {
                println!("Video: {}", video.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError: {}", e);
            Err(e.into())
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
