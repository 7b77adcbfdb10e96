//! CLI definition and dispatch.

use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::fs_report_store::FsReportStore;
use crate::domain::aggregator::{
    bucket_series, coverage, selectable_months, selectable_years, CoverageSummary,
    PeriodSelection, ReportingPeriod,
};
use crate::domain::chart_text::{render_ranges, render_series};
use crate::domain::config_validation::{
    max_concurrent, parse_fetch_date, require_string, validate_fetch_config,
    validate_view_config, DATE_FORMAT,
};
use crate::domain::date_interval::DateInterval;
use crate::domain::error::SalesError;
use crate::domain::report_fetch::{FetchRequest, FetchSummary};
use crate::domain::report_loader::load_records;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "sales", about = "Daily sales report fetcher and viewer")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download missing daily sales reports
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        /// First day to fetch (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        /// Last day to fetch (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
        #[arg(long)]
        vendor: Option<String>,
        /// Re-download days that are already stored
        #[arg(long)]
        no_skip_existing: bool,
    },
    /// Show total sales and the selectable years and months
    Summary {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        sku: Option<String>,
    },
    /// Show bucketed sales for a reporting period
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_enum)]
        period: ReportingPeriod,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        #[arg(long)]
        sku: Option<String>,
    },
}

/// Command-line values that take precedence over `[fetch]` and `[vendor]`.
#[derive(Debug, Clone, Default)]
pub struct FetchOverrides {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub no_skip_existing: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Fetch {
            config,
            start,
            end,
            vendor,
            no_skip_existing,
        } => run_fetch(
            &config,
            &FetchOverrides {
                start,
                end,
                vendor,
                no_skip_existing,
            },
        ),
        Command::Summary { config, sku } => run_summary(&config, sku.as_deref()),
        Command::Chart {
            config,
            period,
            year,
            month,
            sku,
        } => run_chart(&config, period, year, month, sku.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SalesError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn fail(err: SalesError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Report store directory from `[store] dir`, defaulting to the working directory.
pub fn store_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("store", "dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the fetch parameters: flags, then config, then defaults.
///
/// Without any dates the interval is one month before `today` through `today`.
pub fn build_fetch_request(
    config: &dyn ConfigPort,
    overrides: &FetchOverrides,
    today: NaiveDate,
) -> Result<FetchRequest, SalesError> {
    let vendor_number = require_string(config, "vendor", "number", overrides.vendor.as_deref())?;

    let default_interval = DateInterval::last_month(today);
    let start = match overrides.start {
        Some(d) => d,
        None => parse_fetch_date(config, "start_date")?.unwrap_or(default_interval.start()),
    };
    let end = match overrides.end {
        Some(d) => d,
        None => parse_fetch_date(config, "end_date")?.unwrap_or(default_interval.end()),
    };
    let interval = DateInterval::new(start, end)?;

    let skip_existing =
        !overrides.no_skip_existing && config.get_bool("fetch", "skip_existing", true);

    Ok(FetchRequest {
        vendor_number,
        interval,
        skip_existing,
        max_concurrent: max_concurrent(config)?,
    })
}

/// Fill in a missing year from the last covered day and a missing month from
/// the last selectable month of that year.
///
/// A selection outside the covered range is kept and drawn zero-filled, with
/// a warning.
pub fn resolve_selection(
    period: ReportingPeriod,
    year: Option<i32>,
    month: Option<u32>,
    coverage: &CoverageSummary,
) -> PeriodSelection {
    let year = year.unwrap_or(coverage.last_date.year());
    let month = month
        .or_else(|| selectable_months(year, coverage).last().copied())
        .unwrap_or(coverage.last_date.month());
    let selection = PeriodSelection::resolve(period, Some(year), Some(month))
        .unwrap_or(PeriodSelection::LastThirtyDays);

    if !is_selectable(&selection, coverage) {
        tracing::warn!(
            ?selection,
            covered = %coverage.interval(),
            "selection lies outside the covered range"
        );
    }
    selection
}

/// Whether `selection` is one of the years/months offered for `coverage`.
pub fn is_selectable(selection: &PeriodSelection, coverage: &CoverageSummary) -> bool {
    match *selection {
        PeriodSelection::LastThirtyDays => true,
        PeriodSelection::Yearly { year } => selectable_years(coverage).contains(&year),
        PeriodSelection::Monthly { year, month } => {
            selectable_months(year, coverage).contains(&month)
        }
    }
}

fn run_fetch(config_path: &PathBuf, overrides: &FetchOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_fetch_config(&adapter) {
        return fail(e);
    }

    let today = Utc::now().date_naive();
    let request = match build_fetch_request(&adapter, overrides, today) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let store = match FsReportStore::open(store_dir(&adapter)) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    #[cfg(feature = "http")]
    {
        use crate::adapters::http_report_source::HttpReportSource;

        let source = match HttpReportSource::from_config(&adapter) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };

        eprintln!(
            "Fetching {} day(s) for vendor {} ({})",
            request.interval.len_days(),
            request.vendor_number,
            request.interval
        );
        match run_fetch_pipeline(source, store, &request) {
            Ok(summary) => report_fetch_summary(&summary),
            Err(e) => fail(e),
        }
    }

    #[cfg(not(feature = "http"))]
    {
        let _ = (&request, &store);
        eprintln!("error: http feature is required for fetch");
        ExitCode::from(1)
    }
}

/// Run the orchestrator on a fresh runtime; Ctrl-C cancels outstanding days.
#[cfg(feature = "http")]
pub fn run_fetch_pipeline(
    source: crate::adapters::http_report_source::HttpReportSource,
    store: FsReportStore,
    request: &FetchRequest,
) -> Result<FetchSummary, SalesError> {
    use crate::domain::cancel::cancel_pair;
    use crate::domain::report_fetch::fetch_reports;
    use std::sync::Arc;

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(async {
        let (handle, token) = cancel_pair();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling outstanding downloads");
                handle.cancel();
            }
        });
        fetch_reports(Arc::new(source), Arc::new(store), request, token).await
    });
    Ok(summary)
}

/// Print the run summary; 0 when the run finished, even with failed days.
pub fn report_fetch_summary(summary: &FetchSummary) -> ExitCode {
    println!(
        "fetched: {}  skipped: {}  failed: {}  cancelled: {}",
        summary.fetched(),
        summary.skipped(),
        summary.failed(),
        summary.cancelled()
    );
    for (date, reason) in summary.failures() {
        println!("  failed {date}: {reason}");
    }

    if summary.cancelled() > 0 {
        (&SalesError::Cancelled).into()
    } else {
        ExitCode::SUCCESS
    }
}

fn load_view(
    config_path: &PathBuf,
    sku_override: Option<&str>,
) -> Result<(Vec<crate::domain::sales_record::SalesRecord>, NaiveDate), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_view_config(&adapter).map_err(fail)?;
    let sku = require_string(&adapter, "product", "sku", sku_override).map_err(fail)?;

    let store = FsReportStore::new(store_dir(&adapter));
    let loaded = load_records(&store, &sku).map_err(fail)?;
    for (date, err) in &loaded.failures {
        eprintln!("warning: skipped report for {date}: {err}");
    }
    Ok((loaded.records, Utc::now().date_naive()))
}

fn run_summary(config_path: &PathBuf, sku_override: Option<&str>) -> ExitCode {
    let (records, today) = match load_view(config_path, sku_override) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let cov = coverage(&records, today);
    let ranges: Vec<(i32, Vec<u32>)> = selectable_years(&cov)
        .into_iter()
        .map(|year| (year, selectable_months(year, &cov)))
        .collect();
    print!("{}", render_ranges(&cov, &ranges));
    ExitCode::SUCCESS
}

fn run_chart(
    config_path: &PathBuf,
    period: ReportingPeriod,
    year: Option<i32>,
    month: Option<u32>,
    sku_override: Option<&str>,
) -> ExitCode {
    let (records, today) = match load_view(config_path, sku_override) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let cov = coverage(&records, today);
    let selection = resolve_selection(period, year, month, &cov);
    let series = bucket_series(&records, selection, today);

    println!("{}", period.display_name());
    print!("{}", render_series(&series));
    println!("Total: {}", series.total_units());
    ExitCode::SUCCESS
}
