//! Bulk geometry snapshot tool.
//!
//! Walks the country boundary set plus every province code, pulls each
//! asset through the same validation the server uses, and writes the
//! payloads to disk. Useful for seeding an offline mirror or checking the
//! upstream source end to end.

use std::{
    fs,
    path::{Path, PathBuf},
};

use atlas::geometry::{DEFAULT_GEO_BASE, FetchGeometry, GeometryAsset, HttpFetcher};
use atlas::region::{COUNTRY_CODE, COUNTRY_MAP_NAME, PROVINCES};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory the geometry snapshots are written to.
    #[arg(default_value = "geo-cache")]
    out: PathBuf,

    /// Upstream geometry source.
    #[arg(long, default_value = DEFAULT_GEO_BASE)]
    base: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    fs::create_dir_all(&args.out).unwrap();
    let fetcher = HttpFetcher::new(&args.base);

    let regions: Vec<(&str, &str)> = std::iter::once((COUNTRY_MAP_NAME, COUNTRY_CODE))
        .chain(PROVINCES.iter().copied())
        .collect();

    let pb = ProgressBar::new(regions.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    let mut fetched = 0;
    let mut failed = 0;

    for (name, code) in regions {
        pb.set_message(format!("Fetching {name}"));

        match snapshot(&fetcher, &args.out, code).await {
            Ok(()) => fetched += 1,
            Err(e) => {
                failed += 1;
                pb.println(format!("{name} ({code}): {e}"));
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!("\nFetched: {fetched}");
    println!("Failed: {failed}");
}

async fn snapshot(fetcher: &HttpFetcher, out: &Path, code: &str) -> Result<(), anyhow::Error> {
    let raw = fetcher.fetch(code).await?;
    let asset = GeometryAsset::from_value(code, raw)?;

    fs::write(
        out.join(format!("{code}.json")),
        serde_json::to_vec(&asset.raw)?,
    )?;

    Ok(())
}
