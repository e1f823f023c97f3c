//! P&L calendar views over a trade journal export
//!
//! Loads a delimited journal export, runs the normalization and
//! aggregation engine, and renders text calendar grids, period tables,
//! and cumulative-P&L excursion (OHLC) summaries.

use chrono::{Datelike, NaiveDate};
use clap::{Parser, ValueEnum};
use plcal_config::{CliConfigMerge, Settings};
use plcal_core::{Excursion, MarketFilter, Period, TradeJournal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "plcal",
    about = "Calendar-style P&L summaries for trade journal exports",
    long_about = "
Loads a trade journal export (CSV with platform-dependent column naming),
normalizes and deduplicates the trades, and renders time-bucketed P&L
summaries with cumulative-P&L excursion (OHLC) statistics.

Views:
- day:   calendar grid for one month plus per-day excursions
- week:  week-number table for one year
- month: month table for one year
- year:  table across all journal years

Examples:
  plcal journal.csv
  plcal journal.csv --view month --year 2024
  plcal journal.csv --market \"FTSE 100\" --view day --month 10
  plcal journal.csv --day 2 --month 10 --year 2025
  plcal journal.csv --format json
",
    version
)]
struct Args {
    /// Journal export file to load
    input: Option<PathBuf>,

    /// Configuration file (TOML); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calendar view granularity
    #[arg(long, value_enum)]
    view: Option<View>,

    /// Restrict to one canonical ticker (exact match)
    #[arg(long)]
    market: Option<String>,

    /// Year to display (default: latest year in the journal)
    #[arg(long)]
    year: Option<i32>,

    /// Month to display in the day view, 1-12 (default: current month)
    #[arg(long)]
    month: Option<u32>,

    /// Drill into one day: per-market breakdown and individual trades
    #[arg(long)]
    day: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl CliConfigMerge for Args {
    fn merge_into_config(&self, config: &mut Settings) {
        if let Some(input) = &self.input {
            config.data.default_input = Some(input.clone());
        }
        if let Some(market) = &self.market {
            config.view.default_market = Some(market.clone());
        }
        if let Some(year) = self.year {
            config.view.default_year = Some(year);
        }
        if let Some(view) = self.view {
            config.view.default_view = match view {
                View::Day => "day",
                View::Week => "week",
                View::Month => "month",
                View::Year => "year",
            }
            .to_string();
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings.merge_cli_args(&args),
        Err(err) => {
            eprintln!("error: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.app.log_directive())),
        )
        .with_target(false)
        .init();

    let Some(input) = settings.data.default_input.clone() else {
        eprintln!("error: no journal export given (pass a file or set data.default_input)");
        return ExitCode::FAILURE;
    };

    let rows = match plcal_io::read_rows_from_path(&input, settings.data.delimiter_byte()) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let journal =
        TradeJournal::from_raw_rows_with_symbols(&rows, &settings.data.currency_symbols);
    let report = journal.report();
    if report.dropped_no_date > 0 {
        warn!(
            dropped = report.dropped_no_date,
            "rows without a resolvable date were ignored"
        );
    }
    if journal.is_empty() {
        println!("No trades found in {}.", input.display());
        return ExitCode::SUCCESS;
    }
    info!(trades = journal.trades().len(), "journal loaded");

    let filter = match &settings.view.default_market {
        Some(market) => MarketFilter::Market(market.clone()),
        None => MarketFilter::AllMarkets,
    };
    let year = settings
        .view
        .default_year
        .or_else(|| journal.years().last().copied())
        .unwrap_or_else(|| chrono::Local::now().year());
    let month = args
        .month
        .unwrap_or_else(|| chrono::Local::now().month())
        .clamp(1, 12);

    if args.format == Format::Json {
        return render_json(&journal, &filter);
    }

    println!("Journal: {} ({} trades)", input.display(), journal.trades().len());
    println!("Filter:  {filter}");
    println!();

    if let Some(day) = args.day {
        render_day_drilldown(&journal, &filter, year, month, day);
        return ExitCode::SUCCESS;
    }

    match settings.view.default_view.as_str() {
        "week" => render_week_view(&journal, &filter, year),
        "month" => render_month_view(&journal, &filter, year),
        "year" => render_year_view(&journal, &filter),
        _ => render_day_view(&journal, &filter, year, month),
    }

    ExitCode::SUCCESS
}

fn render_json(journal: &TradeJournal, filter: &MarketFilter) -> ExitCode {
    let summaries = journal.summaries(filter);
    let payload = serde_json::json!({
        "markets": journal.markets(),
        "years": journal.years(),
        "rows_in": journal.report().rows_in,
        "dropped_no_date": journal.report().dropped_no_date,
        "summaries": summaries,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn format_total(total: f64) -> String {
    format!("{total:+.0}")
}

fn format_ohlc(ohlc: Option<Excursion>) -> String {
    match ohlc {
        Some(e) => format!(
            "O {:>+8.0}  H {:>+8.0}  L {:>+8.0}  C {:>+8.0}",
            e.open, e.high, e.low, e.close
        ),
        None => "no data".to_string(),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(31)
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES[(month.clamp(1, 12) - 1) as usize]
}

fn render_day_view(journal: &TradeJournal, filter: &MarketFilter, year: i32, month: u32) {
    let summaries = journal.summaries(filter);
    let month_total = summaries
        .monthly
        .get(&(year, month))
        .map(|b| b.total)
        .unwrap_or(0.0);

    println!("{} {}  (total {})", month_name(month), year, format_total(month_total));
    println!();
    println!(
        "{:>13} {:>13} {:>13} {:>13} {:>13} {:>13} {:>13}",
        "SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"
    );

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        println!("invalid month");
        return;
    };
    let start_weekday = first.weekday().num_days_from_sunday();
    let total_days = days_in_month(year, month);

    let mut cells: Vec<String> = vec![String::new(); start_weekday as usize];
    for day in 1..=total_days {
        let cell = match summaries.daily.get(&(year, month, day)) {
            Some(bucket) => format!("{day:>2} {:>6} T{}", format_total(bucket.total), bucket.trade_count),
            None => format!("{day:>2}       ."),
        };
        cells.push(cell);
    }
    for row in cells.chunks(7) {
        for cell in row {
            print!("{cell:>13} ");
        }
        println!();
    }

    println!();
    println!("Daily excursions (cumulative P&L):");
    for day in 1..=total_days {
        let ohlc = journal.excursion(filter, Period::Day { year, month, day });
        if ohlc.is_some() {
            println!("  {:>2}  {}", day, format_ohlc(ohlc));
        }
    }
}

fn render_week_view(journal: &TradeJournal, filter: &MarketFilter, year: i32) {
    let summaries = journal.summaries(filter);
    println!("Weeks of {year}");
    println!("{:>4} {:>10} {:>7}  {}", "wk", "total", "trades", "excursion");
    for week in 1..=53u32 {
        match summaries.weekly.get(&(year, week)) {
            Some(bucket) => {
                let ohlc = journal.excursion(filter, Period::Week { year, week });
                println!(
                    "{week:>4} {:>10} {:>7}  {}",
                    format_total(bucket.total),
                    bucket.trade_count,
                    format_ohlc(ohlc)
                );
            }
            None if week <= 52 => println!("{week:>4} {:>10} {:>7}", "-", "-"),
            None => {}
        }
    }
}

fn render_month_view(journal: &TradeJournal, filter: &MarketFilter, year: i32) {
    let summaries = journal.summaries(filter);
    println!("Months of {year}");
    println!("{:>10} {:>10} {:>7}  {}", "month", "total", "trades", "excursion");
    for month in 1..=12u32 {
        match summaries.monthly.get(&(year, month)) {
            Some(bucket) => {
                let ohlc = journal.excursion(filter, Period::Month { year, month });
                println!(
                    "{:>10} {:>10} {:>7}  {}",
                    month_name(month),
                    format_total(bucket.total),
                    bucket.trade_count,
                    format_ohlc(ohlc)
                );
            }
            None => println!("{:>10} {:>10} {:>7}", month_name(month), "-", "-"),
        }
    }
}

fn render_year_view(journal: &TradeJournal, filter: &MarketFilter) {
    let summaries = journal.summaries(filter);
    println!("All years");
    println!("{:>6} {:>10} {:>7}  {}", "year", "total", "trades", "excursion");
    for (year, bucket) in &summaries.yearly {
        let ohlc = journal.excursion(filter, Period::Year { year: *year });
        println!(
            "{year:>6} {:>10} {:>7}  {}",
            format_total(bucket.total),
            bucket.trade_count,
            format_ohlc(ohlc)
        );
    }
}

fn render_day_drilldown(
    journal: &TradeJournal,
    filter: &MarketFilter,
    year: i32,
    month: u32,
    day: u32,
) {
    println!("{} {}, {}", month_name(month), day, year);

    let breakdown = journal.day_market_breakdown(filter, year, month, day);
    if breakdown.is_empty() {
        println!("no trades");
        return;
    }

    println!();
    println!("{:<24} {:>10} {:>8} {:>7}", "market", "total", "points", "trades");
    for entry in &breakdown {
        println!(
            "{:<24} {:>10} {:>8.0} {:>7}",
            entry.market,
            format_total(entry.total),
            entry.points,
            entry.count
        );
    }

    println!();
    println!("Individual trades:");
    let trades = journal.trades_in_period(filter, Period::Day { year, month, day });
    for (idx, trade) in trades.iter().enumerate() {
        println!(
            "  #{:<3} {:<24} {:>10}  {:>8.0} pts  held {}",
            idx + 1,
            trade.market,
            format_total(trade.amount),
            trade.points,
            trade.duration_hms()
        );
    }
}
