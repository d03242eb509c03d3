use anyhow::Result;
use std::path::Path;

use crate::args::JobOptions;
use vidingest_core::pipeline::JobSource;

pub async fn run(file: &Path, options: &JobOptions, config_path: Option<&Path>) -> Result<()> {
    super::ingest::run_job(
        JobSource::Local {
            path: file.to_path_buf(),
        },
        options,
        config_path,
    )
    .await
}
