use anyhow::Result;
use clap::Parser;
use s3mirror::{sync_bucket, S3Store, SyncConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "s3mirror")]
#[command(about = "Mirror the contents of an S3 bucket to a local directory", long_about = None)]
#[command(version)]
struct Args {
    /// Name of the S3 bucket
    bucket: String,

    /// Optional prefix to filter objects
    #[arg(long, default_value = "")]
    prefix: String,

    /// Local directory to save files to (defaults to ".", or "./photo" with --transcode)
    #[arg(long)]
    local_dir: Option<PathBuf>,

    /// Re-encode recognized images (jpg/jpeg/png/gif/bmp/webp) as quality-95 JPEG
    #[arg(long)]
    transcode: bool,

    /// AWS region
    #[arg(long)]
    region: Option<String>,

    /// Custom S3 endpoint URL (R2, MinIO, LocalStack)
    #[arg(long)]
    endpoint: Option<String>,

    /// AWS profile name
    #[arg(long)]
    profile: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("s3mirror={}", log_level))
        .init();

    // The transcoding variant mirrors into ./photo unless told otherwise
    let local_dir = args.local_dir.unwrap_or_else(|| {
        if args.transcode {
            PathBuf::from("./photo")
        } else {
            PathBuf::from(".")
        }
    });

    let mut config = SyncConfig::new(args.bucket)
        .with_prefix(args.prefix)
        .with_local_dir(local_dir.clone())
        .with_transcode(args.transcode);

    if let Some(region) = args.region {
        config = config.with_region(region);
    }
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(profile) = args.profile {
        config = config.with_profile(profile);
    }

    info!("🪣 Bucket: s3://{}/{}", config.bucket, config.prefix);
    info!("Destination: {}", local_dir.display());

    let store = S3Store::connect(&config).await;

    match sync_bucket(&store, &config).await {
        Ok(report) => {
            println!("\nDownload completed successfully to {}", local_dir.display());
            if report.fallbacks > 0 {
                println!(
                    "{} image(s) could not be transcoded and kept their original bytes",
                    report.fallbacks
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
