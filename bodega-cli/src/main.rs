//! bodega — reconcile a spreadsheet manifest against an object-storage
//! bucket, downloading each expected file and annotating the row with the
//! outcome.
//!
//! # Usage
//!
//! ```text
//! bodega --bucket DOCS [--manifest tracking.xlsx] [--base-folder downloads]
//!        [--bucket-prefix pqrsdf] [--profile DEFAULT] [--save-every 1]
//!        [--json]
//! ```
//!
//! Every flag also reads from the environment (`OCI_BUCKET`, `MANIFEST_FILE`,
//! `BASE_FOLDER`, `BUCKET_PREFIX`, `OCI_PROFILE`, `OCI_CONFIG_FILE`,
//! `COL_ID`..`COL_STATUS`, `SAVE_EVERY_N_ROWS`); a `.env` file in the working
//! directory is honored.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

use bodega_core::{BucketName, ColumnMap};
use bodega_manifest::{CheckpointPolicy, Manifest, SavedTo};
use bodega_pipeline::{RunOptions, RunSummary};
use bodega_storage::{expand_home, OciClient, OciProfile};

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "bodega",
    version,
    about = "Download manifest-listed files from an object-storage bucket",
    long_about = None,
)]
struct Cli {
    /// Bucket to reconcile against (mandatory).
    #[arg(long, env = "OCI_BUCKET")]
    bucket: Option<String>,

    /// Local directory downloads are written under.
    #[arg(long, env = "BASE_FOLDER", default_value = "downloads")]
    base_folder: PathBuf,

    /// Manifest spreadsheet (row 1 is the header).
    #[arg(long, env = "MANIFEST_FILE", default_value = "manifest.xlsx")]
    manifest: PathBuf,

    /// Root prefix inside the bucket; may be empty.
    #[arg(long, env = "BUCKET_PREFIX", default_value = "")]
    bucket_prefix: String,

    /// Profile in the OCI config file.
    #[arg(long, env = "OCI_PROFILE", default_value = "DEFAULT")]
    profile: String,

    /// Path to the OCI config file.
    #[arg(long, env = "OCI_CONFIG_FILE", default_value = "~/.oci/config")]
    config_file: String,

    /// 1-indexed manifest columns.
    #[arg(long, env = "COL_ID", default_value_t = 1)]
    col_id: u32,
    #[arg(long, env = "COL_FOLDER", default_value_t = 2)]
    col_folder: u32,
    #[arg(long, env = "COL_FILENAME", default_value_t = 3)]
    col_filename: u32,
    #[arg(long, env = "COL_DISPLAY_NAME", default_value_t = 4)]
    col_display_name: u32,
    #[arg(long, env = "COL_STATUS", default_value_t = 5)]
    col_status: u32,

    /// Rows between checkpoint saves (1 = every row, 0 = final save only).
    #[arg(long, env = "SAVE_EVERY_N_ROWS", default_value_t = 1)]
    save_every: u32,

    /// Emit the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn run(self) -> Result<()> {
        let Some(bucket) = self.bucket.clone().filter(|b| !b.is_empty()) else {
            bail!(
                "OCI_BUCKET is not set; pass --bucket or export OCI_BUCKET \
                 (a .env file in the working directory is also honored)"
            );
        };

        let columns = ColumnMap {
            id: self.col_id,
            folder: self.col_folder,
            filename: self.col_filename,
            display_name: self.col_display_name,
            status: self.col_status,
        };
        if !columns.is_valid() {
            bail!("column numbers are 1-indexed; zero is not a valid column");
        }
        if !self.manifest.is_file() {
            bail!("manifest file does not exist: {}", self.manifest.display());
        }

        // Connection/setup failures are fatal and happen before any row.
        let config_path = expand_home(&self.config_file);
        let profile = OciProfile::load(&config_path, &self.profile)
            .with_context(|| format!("failed to load OCI profile '{}'", self.profile))?;
        let client = OciClient::connect(&profile, BucketName::from(bucket.as_str()))
            .context("failed to connect to object storage")?;
        println!(
            "connected: namespace '{}', bucket '{}'",
            client.namespace(),
            client.bucket()
        );

        let mut manifest = Manifest::open(&self.manifest, columns)
            .with_context(|| format!("failed to open manifest {}", self.manifest.display()))?;
        let options = RunOptions {
            base_folder: self.base_folder.clone(),
            bucket_prefix: self.bucket_prefix.clone(),
            checkpoint: CheckpointPolicy::new(self.save_every),
        };

        // Row failures are recorded in the manifest, not via the exit code.
        let summary = bodega_pipeline::run(&mut manifest, &client, &options)
            .context("manifest pass failed")?;

        if self.json {
            print_json(&summary)?;
        } else {
            print_summary(&summary);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Summary output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SummaryJson {
    total: u32,
    found: u32,
    not_found: u32,
    checkpoint_saves: u32,
    final_save_path: String,
    final_save_is_backup: bool,
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "{} {} row(s): {} found, {} not found, {} checkpoint save(s)",
        "summary:".bold(),
        summary.total,
        summary.found.to_string().green(),
        summary.not_found.to_string().yellow(),
        summary.checkpoint_saves
    );
    match &summary.final_save {
        SavedTo::Primary(path) => {
            println!("  {} manifest saved to {}", "✓".green(), path.display());
        }
        SavedTo::Backup(path) => {
            println!(
                "  {} primary manifest was locked; results saved to {}",
                "!".yellow(),
                path.display()
            );
        }
    }
}

fn print_json(summary: &RunSummary) -> Result<()> {
    let json = SummaryJson {
        total: summary.total,
        found: summary.found,
        not_found: summary.not_found,
        checkpoint_saves: summary.checkpoint_saves,
        final_save_path: summary.final_save.path().display().to_string(),
        final_save_is_backup: matches!(summary.final_save, SavedTo::Backup(_)),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    // Load .env before clap reads the environment.
    dotenvy::dotenv().ok();
    init_tracing();
    Cli::parse().run()
}
