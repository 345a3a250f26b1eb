use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};

use gradient_engine::logging::{init_logging, LoggingConfig};
use gradient_engine::{EngineConfig, GradientParams, GradientService};

#[derive(Parser)]
#[command(name = "gradient-studio", about = "Render and cache linear gradient images")]
struct Cli {
    /// Cache directory (overrides GRADIENT_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Cache budget in bytes (overrides GRADIENT_CACHE_BUDGET)
    #[arg(long, global = true)]
    budget: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render a gradient through the cache
    Render {
        /// Start color: 3, 6 or 8 hex digits
        start: String,
        /// End color: 3, 6 or 8 hex digits
        end: String,
        /// Length in pixels
        #[arg(long, default_value = "100")]
        length: String,
        /// Angle in degrees, or `h` / `v`
        #[arg(long, default_value = "h")]
        angle: String,
        /// Stretch the gradient to fill its bounding box
        #[arg(long)]
        extend: bool,
        /// Write the image here
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Unix seconds of a copy the caller already holds
        #[arg(long)]
        if_modified_since: Option<u64>,
    },
    /// Run one eviction sweep
    Sweep,
    /// Delete every cached image
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = match cli.verbose {
        0 => LoggingConfig::default(),
        1 => LoggingConfig::with_filter("debug"),
        _ => LoggingConfig::with_filter("trace"),
    };
    init_logging(logging);

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(budget) = cli.budget {
        config = config.with_cache_budget(budget);
    }

    let cache_dir = config.cache_dir.clone();
    let service = GradientService::open(config)
        .with_context(|| format!("opening cache at {}", cache_dir.display()))?;

    match cli.command {
        Cmd::Render { start, end, length, angle, extend, out, if_modified_since } => {
            let params = GradientParams::new(start, end)
                .length(length)
                .angle(angle)
                .extend(if extend { "1" } else { "0" });
            let spec = params.normalize(service.config());

            if let Some(secs) = if_modified_since {
                let since = UNIX_EPOCH + Duration::from_secs(secs);
                if service.is_not_modified(&spec, since).context("checking cache entry")? {
                    println!("not modified");
                    return Ok(());
                }
            }

            let image = service.fetch(&spec).context("rendering gradient")?;

            println!("key:           {}", image.key);
            println!("content-type:  {}", image.content_type);
            println!("bytes:         {}", image.bytes.len());
            println!("cache:         {}", if image.cache_hit { "hit" } else { "miss" });
            println!("last-modified: {}", unix_secs(image.last_modified));

            if let Some(path) = out {
                std::fs::write(&path, &image.bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {}", path.display());
            }
        }
        Cmd::Sweep => {
            let report = service.cache().evict().context("sweeping cache")?;
            println!(
                "kept {} entries ({} bytes), evicted {} ({} bytes)",
                report.kept,
                report.kept_bytes,
                report.evicted.len(),
                report.freed_bytes
            );
        }
        Cmd::Clear => {
            let removed = service.cache().clear().context("clearing cache")?;
            println!("removed {removed} entries");
        }
    }

    Ok(())
}

fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
