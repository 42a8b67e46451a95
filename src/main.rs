use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use clap::Parser;

use exposure_matcher::report::ReportSummary;
use exposure_matcher::time_utils::format_timestamp_ms;
use exposure_matcher::{
    load_location_history, load_locations_of_interest, CheckerError, LocationOfInterest,
    PositionHistory, PositionSample, Result,
};

#[cfg(not(feature = "parallel"))]
use exposure_matcher::build_report;
#[cfg(feature = "parallel")]
use exposure_matcher::build_report_parallel;

#[derive(Parser, Debug)]
#[command(
    about = "Check published exposure locations of interest against exported location history"
)]
struct Args {
    /// Path to the exported location history JSON
    #[arg(long)]
    history: Option<PathBuf>,

    /// Locations-of-interest GeoJSON feed: a file path, or a URL with the `http` feature
    #[arg(long)]
    locations: String,

    /// Output CSV path
    #[arg(long)]
    output: PathBuf,

    /// Drop history samples recorded before this Unix timestamp (milliseconds)
    #[arg(long, default_value_t = 0)]
    threshold_ms: i64,

    /// UTC offset, in hours, of the feed's local times
    #[arg(long, default_value_t = 12.0)]
    utc_offset_hours: f64,

    /// Generate a synthetic location history instead of loading an export
    #[cfg(feature = "synthetic")]
    #[arg(long)]
    synthetic: bool,

    /// Seed for the synthetic history
    #[cfg(feature = "synthetic")]
    #[arg(long, default_value_t = 123)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let offset_secs = (args.utc_offset_hours * 3600.0).round() as i32;
    let utc_offset =
        FixedOffset::east_opt(offset_secs).ok_or_else(|| CheckerError::Config {
            message: format!("utc offset {} hours is out of range", args.utc_offset_hours),
        })?;

    let lois = load_locations(&args.locations, utc_offset)?;
    let history = PositionHistory::new(load_samples(args)?);

    #[cfg(feature = "parallel")]
    let report = build_report_parallel(&lois, &history);
    #[cfg(not(feature = "parallel"))]
    let report = build_report(&lois, &history);

    exposure_matcher::export_csv(&args.output, &report, utc_offset)?;
    print_summary(&report.summary, utc_offset, &args.output);
    Ok(())
}

fn load_locations(source: &str, utc_offset: FixedOffset) -> Result<Vec<LocationOfInterest>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        #[cfg(feature = "http")]
        {
            let body = exposure_matcher::fetch_locations_of_interest(source)?;
            return exposure_matcher::read_locations_of_interest(body.as_bytes(), utc_offset);
        }
        #[cfg(not(feature = "http"))]
        return Err(CheckerError::Config {
            message: "downloading the feed requires the `http` feature; pass a file path instead"
                .to_string(),
        });
    }
    load_locations_of_interest(Path::new(source), utc_offset)
}

fn load_samples(args: &Args) -> Result<Vec<PositionSample>> {
    #[cfg(feature = "synthetic")]
    if args.synthetic {
        let end_ms = chrono::Utc::now().timestamp_millis();
        let start_ms = if args.threshold_ms > 0 {
            args.threshold_ms
        } else {
            end_ms - 60 * 24 * 3600 * 1000
        };
        log::info!("Generating synthetic location history (seed {})", args.seed);
        return Ok(exposure_matcher::synthetic_history(
            exposure_matcher::synthetic::DEMO_CENTER,
            start_ms,
            end_ms,
            60_000,
            args.seed,
        ));
    }

    let path = args.history.as_deref().ok_or_else(|| CheckerError::Config {
        message: "--history is required (or build with the `synthetic` feature and pass --synthetic)"
            .to_string(),
    })?;
    load_location_history(path, args.threshold_ms)
}

fn print_summary(summary: &ReportSummary, utc_offset: FixedOffset, output: &Path) {
    println!();
    println!(
        "Matched {} of {} locations of interest to the location history.",
        summary.matched, summary.total
    );
    if summary.unmatched > 0 {
        println!(
            "Warning: no personal location data for {} locations of interest - please check these manually.",
            summary.unmatched
        );
    }
    if let Some(closest) = &summary.closest {
        println!();
        println!("Closest location of interest:");
        println!("  Event: {}", closest.event);
        if let Some(location) = &closest.location {
            println!("  Location: {location}");
        }
        println!(
            "  Time frame: {} to {}",
            format_timestamp_ms(closest.start_ms, utc_offset),
            format_timestamp_ms(closest.end_ms, utc_offset),
        );
        if let Some(distance_km) = closest.distance_km {
            println!("  You were {distance_km:.2} km away.");
        }
    }
    println!();
    println!("Annotated locations of interest written to {}", output.display());
}
