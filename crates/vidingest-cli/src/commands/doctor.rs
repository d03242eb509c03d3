use anyhow::Result;
use std::path::Path;
use std::process::Command;
use vidingest_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    println!("vidingest dependency check\n");

    let config = Config::load(config_path)?;
    let mut all_ok = true;

    // Check yt-dlp, honoring a configured [paths] override
    print!("yt-dlp:   ");
    match config.yt_dlp_path() {
        Ok(path) => {
            let version = Command::new(&path).arg("--version").output();
            match version {
                Ok(out) => {
                    let v = String::from_utf8_lossy(&out.stdout);
                    println!("OK ({}, {})", v.trim(), path.display());
                }
                Err(_) => {
                    println!("FOUND at {} but failed to get version", path.display());
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("          Install with: brew install yt-dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg, honoring a configured [paths] override
    print!("ffmpeg:   ");
    match config.ffmpeg_path() {
        Ok(path) => {
            let version = Command::new(&path).args(["-version"]).output();
            match version {
                Ok(out) => {
                    let first_line = String::from_utf8_lossy(&out.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    // Extract just version number
                    let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                    println!("OK ({}, {})", version_part, path.display());
                }
                Err(_) => {
                    println!("FOUND at {} but failed to get version", path.display());
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("          Install with: brew install ffmpeg");
            all_ok = false;
        }
    }

    // Check API configuration
    print!("api:      ");
    match config.api_credentials() {
        Ok(creds) => {
            println!("OK (endpoint: {})", creds.endpoint);
        }
        Err(e) => {
            println!("NOT CONFIGURED");
            println!("          {}", e);
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for instructions.");
    }

    Ok(())
}
