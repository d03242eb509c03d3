use anyhow::Result;
use std::path::Path;
use vidingest_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("vidingest configuration\n");

    println!("[api]");
    if let Some(ref e) = config.api.endpoint {
        println!("  endpoint = {:?}", e);
    } else {
        println!("  endpoint = (not set)");
    }
    if let Some(ref k) = config.api.key {
        println!("  key = {:?} ({} chars)", mask_key(k), k.len());
    } else {
        println!("  key = (not set)");
    }

    println!("\n[paths]");
    if let Some(ref p) = config.paths.yt_dlp {
        println!("  yt_dlp = {:?}", p);
    } else {
        println!("  yt_dlp = (auto-detect)");
    }
    if let Some(ref p) = config.paths.ffmpeg {
        println!("  ffmpeg = {:?}", p);
    } else {
        println!("  ffmpeg = (auto-detect)");
    }

    println!("\n[output]");
    println!("  default_directory = {:?}", config.output.default_directory);

    println!("\n[upload]");
    println!("  tags = {:?}", config.upload.tags);
    println!("  visibility = {:?}", config.upload.visibility);
    println!("  auto_summary = {}", config.upload.auto_summary);

    println!("\n[temp]");
    println!("  cleanup = {}", config.temp.cleanup);
    if let Some(ref d) = config.temp.directory {
        println!("  directory = {:?}", d);
    } else {
        println!("  directory = (system temp)");
    }

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(config_dir) = dirs::config_dir() {
        println!("  2. {}/vidingest/config.toml", config_dir.display());
    }
    println!("  3. Environment variables (VIDINGEST_*)");

    Ok(())
}

fn mask_key(key: &str) -> String {
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = key.chars().take(4).collect();
        format!("{}****", prefix)
    }
}
