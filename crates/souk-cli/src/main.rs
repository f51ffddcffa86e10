//! Souk CLI: push listing images and profile photos through the ingestion pipeline.
//!
//! Storage comes from STORAGE_BACKEND and friends; the session from
//! SOUK_ACCESS_TOKEN and SOUK_USER_ID.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use serde::Serialize;
use souk_cli::{format_progress, init_tracing, read_media_file, ErrorOutput, UploadOutput};
use souk_core::{StaticSessionProvider, UploadConfig, UploadError, UploadPurpose};
use souk_processing::upload::progress;
use souk_processing::MediaPipeline;
use souk_storage::create_storage;

#[derive(Parser)]
#[command(name = "souk", about = "Souk media ingestion CLI")]
struct Cli {
    /// Print a JSON result instead of progress and plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and upload an image
    Upload {
        #[command(subcommand)]
        target: UploadTarget,
    },
    /// Delete a stored object
    Delete {
        /// Bucket holding the object
        #[arg(long)]
        bucket: String,
        /// Object path inside the bucket
        path: String,
    },
}

#[derive(Subcommand)]
enum UploadTarget {
    /// Listing image (watermarked)
    Listing {
        /// Owner (user) id used as the path prefix
        #[arg(long)]
        owner: String,
        /// Path to the image
        file: PathBuf,
    },
    /// Profile photo
    Profile {
        /// Owner (user) id used as the path prefix
        #[arg(long)]
        owner: String,
        /// Path to the image
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Print the error (as JSON when asked) and hand it back for the exit status.
fn report_error(err: UploadError, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&ErrorOutput::from(&err))?;
    }
    Err(err.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = UploadConfig::from_env().context("Failed to load configuration")?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    let sessions = Arc::new(StaticSessionProvider::from_env());
    let pipeline = MediaPipeline::new(storage, sessions, config);

    match cli.command {
        Commands::Upload { target } => {
            let (purpose, owner, file) = match target {
                UploadTarget::Listing { owner, file } => (UploadPurpose::Listing, owner, file),
                UploadTarget::Profile { owner, file } => (UploadPurpose::Profile, owner, file),
            };
            let media = read_media_file(&file).await?;
            tracing::debug!(
                file = %file.display(),
                content_type = %media.content_type,
                purpose = %purpose,
                "Read input file"
            );

            let (tx, mut rx) = progress::channel();
            let show_progress = !cli.json;
            let printer = tokio::spawn(async move {
                while let Some(percent) = rx.next().await {
                    if show_progress {
                        eprintln!("{}", format_progress(percent));
                    }
                }
            });

            let result = match purpose {
                UploadPurpose::Listing => {
                    pipeline
                        .upload_listing_image(&owner, media, Some(&tx))
                        .await
                }
                UploadPurpose::Profile => {
                    pipeline
                        .upload_profile_photo(&owner, media, Some(&tx))
                        .await
                }
            };
            drop(tx);
            printer.await.context("Progress printer failed")?;

            match result {
                Ok(url) if cli.json => print_json(&UploadOutput { success: true, url })?,
                Ok(url) => println!("{}", url),
                Err(err) => return report_error(err, cli.json),
            }
        }
        Commands::Delete { bucket, path } => match pipeline.delete_file(&bucket, &path).await {
            Ok(()) if cli.json => print_json(&serde_json::json!({
                "success": true,
                "message": format!("Deleted {} from {}", path, bucket),
            }))?,
            Ok(()) => println!("Deleted {} from {}", path, bucket),
            Err(err) => return report_error(err, cli.json),
        },
    }

    Ok(())
}
