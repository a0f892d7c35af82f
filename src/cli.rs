//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::directory_cache::DirectoryCache;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::tables;
use crate::adapters::html_report::HtmlReportAdapter;
use crate::adapters::table_directory_adapter::TableDirectoryAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config_validation::validate_dashboard_config;
use crate::domain::date_range::{default_start_date, parse_date, DateRange};
use crate::domain::directory::{resolve_selection, SymbolDirectory};
use crate::domain::error::StockboardError;
use crate::domain::pipeline::{run_pipeline, PipelineOutcome, NO_DATA_MESSAGE};
use crate::domain::session::{Session, SessionCommand, HELP};
use crate::domain::settings::{
    DirectorySettings, PriceProvider, Settings, DEFAULT_CACHE_TTL_SECS, DEFAULT_DIRECTORY_SOURCE,
    DEFAULT_NAME_COLUMN, DEFAULT_REPORT_OUTPUT, DEFAULT_SYMBOL_COLUMN, DEFAULT_TIMEOUT_SECS,
    DEFAULT_YAHOO_BASE_URL,
};
use crate::domain::symbol::{default_symbols, parse_symbols, Symbol};
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::directory_port::DirectoryPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockboard", about = "Stock return and risk dashboard", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the dashboard once and write an HTML report
    Dashboard {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols, e.g. AAPL,TSLA,MSFT
        #[arg(long)]
        symbols: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date (YYYY-MM-DD), default today
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the ticker directory; labels fall back to symbols
        #[arg(long)]
        no_directory: bool,
    },
    /// List the ticker directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Case-insensitive filter on symbol or company name
        #[arg(long)]
        search: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Line-oriented session: change inputs and rerun on every change
    Interactive {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        no_directory: bool,
    },
}

impl Command {
    fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Dashboard { config, .. }
            | Command::ListSymbols { config, .. }
            | Command::Interactive { config, .. } => config.as_ref(),
            Command::Validate { config } => Some(config),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub symbols: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub no_directory: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.command.config_path()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logging(config.get_string("logging", "level").as_deref());

    match cli.command {
        Command::Dashboard {
            symbols,
            start,
            end,
            output,
            no_directory,
            ..
        } => run_dashboard(
            &config,
            Overrides {
                symbols,
                start,
                end,
                output,
                no_directory,
            },
        ),
        Command::ListSymbols { search, .. } => run_list_symbols(&config, search.as_deref()),
        Command::Validate { config: path } => run_validate(&config, &path),
        Command::Interactive {
            output,
            no_directory,
            ..
        } => run_interactive(
            &config,
            Overrides {
                output,
                no_directory,
                ..Overrides::default()
            },
        ),
    }
}

/// No path: built-in defaults plus `STOCKBOARD_*` environment overrides.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, StockboardError> {
    match path {
        Some(path) => {
            FileConfigAdapter::from_file(path).map_err(|e| StockboardError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn positive_secs(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<Duration, StockboardError> {
    let secs = config.get_int(section, key, default);
    if secs <= 0 {
        return Err(StockboardError::config_invalid(
            section,
            key,
            format!("{} must be a positive integer", key),
        ));
    }
    Ok(Duration::from_secs(secs as u64))
}

fn config_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, StockboardError> {
    match config.get_string("dashboard", key) {
        None => Ok(None),
        Some(s) => parse_date(&s).map(Some).ok_or_else(|| {
            StockboardError::config_invalid(
                "dashboard",
                key,
                "invalid date format (expected YYYY-MM-DD)",
            )
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve every setting from config with defaults. `today` is the default
/// end date.
pub fn build_settings(config: &dyn ConfigPort, today: NaiveDate) -> Result<Settings, StockboardError> {
    let directory = if config.get_bool("directory", "enabled", true) {
        Some(DirectorySettings {
            source: non_empty(config.get_string("directory", "source"))
                .unwrap_or_else(|| DEFAULT_DIRECTORY_SOURCE.to_string()),
            symbol_column: non_empty(config.get_string("directory", "symbol_column"))
                .unwrap_or_else(|| DEFAULT_SYMBOL_COLUMN.to_string()),
            name_column: match config.get_string("directory", "name_column") {
                Some(column) => non_empty(Some(column)),
                None => Some(DEFAULT_NAME_COLUMN.to_string()),
            },
            cache_ttl: positive_secs(config, "directory", "cache_ttl_secs", DEFAULT_CACHE_TTL_SECS)?,
        })
    } else {
        None
    };

    let provider = config
        .get_string("prices", "provider")
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "yahoo".to_string());
    let prices = match provider.as_str() {
        "yahoo" => PriceProvider::Yahoo {
            base_url: non_empty(config.get_string("prices", "base_url"))
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
        },
        "csv" => PriceProvider::Csv {
            data_dir: non_empty(config.get_string("prices", "data_dir"))
                .map(PathBuf::from)
                .ok_or_else(|| StockboardError::ConfigMissing {
                    section: "prices".into(),
                    key: "data_dir".into(),
                })?,
        },
        other => {
            return Err(StockboardError::config_invalid(
                "prices",
                "provider",
                format!("unknown provider '{}'", other),
            ))
        }
    };

    let symbols = match config.get_string("dashboard", "symbols") {
        Some(s) => parse_symbols(&s)
            .map_err(|e| StockboardError::config_invalid("dashboard", "symbols", e.to_string()))?,
        None => default_symbols(),
    };

    Ok(Settings {
        directory,
        prices,
        timeout: positive_secs(config, "prices", "timeout_secs", DEFAULT_TIMEOUT_SECS)?,
        symbols,
        start_date: config_date(config, "start_date")?.unwrap_or_else(default_start_date),
        end_date: config_date(config, "end_date")?.unwrap_or(today),
        report_output: non_empty(config.get_string("report", "output"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_OUTPUT)),
        report_template: non_empty(config.get_string("report", "template_path")).map(PathBuf::from),
    })
}

/// Apply command-line overrides on top of the config settings.
pub fn apply_overrides(mut settings: Settings, overrides: &Overrides) -> Result<Settings, StockboardError> {
    if let Some(symbols) = &overrides.symbols {
        settings.symbols = parse_symbols(symbols)?;
    }
    if let Some(start) = overrides.start {
        settings.start_date = start;
    }
    if let Some(end) = overrides.end {
        settings.end_date = end;
    }
    if let Some(output) = &overrides.output {
        settings.report_output = output.clone();
    }
    if overrides.no_directory {
        settings.directory = None;
    }
    Ok(settings)
}

pub fn build_price_port(settings: &Settings) -> Result<Box<dyn PricePort>, StockboardError> {
    match &settings.prices {
        PriceProvider::Yahoo { base_url } => {
            Ok(Box::new(YahooAdapter::new(base_url, settings.timeout)?))
        }
        PriceProvider::Csv { data_dir } => Ok(Box::new(CsvAdapter::new(data_dir.clone()))),
    }
}

pub fn build_directory(settings: &Settings) -> Option<DirectoryCache<TableDirectoryAdapter>> {
    settings.directory.as_ref().map(|dir| {
        DirectoryCache::new(TableDirectoryAdapter::new(dir, settings.timeout), dir.cache_ttl)
    })
}

fn build_report(settings: &Settings) -> HtmlReportAdapter {
    match &settings.report_template {
        Some(path) => HtmlReportAdapter::with_template(path.clone()),
        None => HtmlReportAdapter::new(),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Everything one dashboard run needs besides the user's inputs.
pub struct RunContext<'a, D: DirectoryPort> {
    pub prices: &'a dyn PricePort,
    pub directory: Option<&'a DirectoryCache<D>>,
    pub report: &'a dyn ReportPort,
    pub output: &'a Path,
}

impl<D: DirectoryPort> RunContext<'_, D> {
    fn load_directory(&self) -> Result<Option<SymbolDirectory>, StockboardError> {
        self.directory.map(|cache| cache.get()).transpose()
    }

    /// One pipeline pass: resolve the selection against the directory, run
    /// the pipeline, print the console summary and write the report.
    pub fn execute(
        &self,
        selection: &[Symbol],
        range: &DateRange,
    ) -> Result<PipelineOutcome, StockboardError> {
        let directory = self.load_directory()?;

        let symbols = match &directory {
            Some(dir) => {
                let resolved = resolve_selection(selection, dir);
                for unknown in &resolved.unknown {
                    eprintln!("warning: {} is not in the ticker directory, skipped", unknown);
                }
                resolved.symbols
            }
            None => selection.to_vec(),
        };

        if !symbols.is_empty() {
            eprintln!("Fetching {} symbols, {}", symbols.len(), range);
        }
        let outcome = run_pipeline(&symbols, range, self.prices, directory.as_ref())?;

        match &outcome {
            PipelineOutcome::NothingSelected => {
                eprintln!("No symbols selected.");
            }
            PipelineOutcome::NoData { .. } => {
                eprintln!("{}", NO_DATA_MESSAGE);
            }
            PipelineOutcome::Computed(data) => {
                eprintln!(
                    "\n=== Return and risk ({}, {} trading days) ===",
                    data.range,
                    data.table.row_count()
                );
                eprint!("{}", tables::format_console_table(data));
                eprintln!("\n=== Recommendations ===");
                eprintln!("{}", tables::format_console_summary(&data.summary));
                for symbol in data.insufficient() {
                    eprintln!("warning: insufficient data for {}", data.label(symbol));
                }

                self.report.write(data, self.output)?;
                eprintln!("\nReport written to: {}", self.output.display());
            }
        }
        Ok(outcome)
    }
}

fn run_dashboard(config: &dyn ConfigPort, overrides: Overrides) -> ExitCode {
    // Stage 1: Validate config
    let today = today();
    if let Err(e) = validate_dashboard_config(config, today) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve settings
    let settings = match build_settings(config, today).and_then(|s| apply_overrides(s, &overrides)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let range = match DateRange::new(settings.start_date, settings.end_date, today) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Build adapters
    let prices = match build_price_port(&settings) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let directory = build_directory(&settings);
    let report = build_report(&settings);

    // Stage 4: Run
    let ctx = RunContext {
        prices: prices.as_ref(),
        directory: directory.as_ref(),
        report: &report,
        output: &settings.report_output,
    };
    match ctx.execute(&settings.symbols, &range) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config: &dyn ConfigPort, search: Option<&str>) -> ExitCode {
    let settings = match build_settings(config, today()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let Some(dir_settings) = &settings.directory else {
        let e = StockboardError::config_invalid("directory", "enabled", "the ticker directory is disabled");
        eprintln!("error: {e}");
        return (&e).into();
    };

    let adapter = TableDirectoryAdapter::new(dir_settings, settings.timeout);
    eprintln!("Loading ticker directory from {}", adapter.source_name());
    let directory = match adapter.list_symbols() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let matches = directory.search(search.unwrap_or(""));
    for symbol in &matches {
        println!("{}\t{}", symbol, directory.name(symbol).unwrap_or(""));
    }
    eprintln!("{} of {} symbols", matches.len(), directory.len());
    ExitCode::SUCCESS
}

fn run_validate(config: &dyn ConfigPort, path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", path.display());
    let today = today();
    let settings = match validate_dashboard_config(config, today).and_then(|()| build_settings(config, today)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match &settings.directory {
        Some(dir) => eprintln!(
            "  directory: {} (cache {}s)",
            dir.source,
            dir.cache_ttl.as_secs()
        ),
        None => eprintln!("  directory: disabled"),
    }
    match &settings.prices {
        PriceProvider::Yahoo { base_url } => eprintln!("  prices:    yahoo ({})", base_url),
        PriceProvider::Csv { data_dir } => eprintln!("  prices:    csv ({})", data_dir.display()),
    }
    let symbols: Vec<&str> = settings.symbols.iter().map(Symbol::as_str).collect();
    eprintln!("  symbols:   {}", symbols.join(", "));
    eprintln!("  range:     {} to {}", settings.start_date, settings.end_date);
    eprintln!("  output:    {}", settings.report_output.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_interactive(config: &dyn ConfigPort, overrides: Overrides) -> ExitCode {
    let today = today();
    if let Err(e) = validate_dashboard_config(config, today) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let settings = match build_settings(config, today).and_then(|s| apply_overrides(s, &overrides)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let prices = match build_price_port(&settings) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let directory = build_directory(&settings);
    let report = build_report(&settings);
    let ctx = RunContext {
        prices: prices.as_ref(),
        directory: directory.as_ref(),
        report: &report,
        output: &settings.report_output,
    };

    let mut session = Session::new(
        settings.symbols.clone(),
        settings.start_date,
        settings.end_date,
        today,
    );
    run_session(std::io::stdin().lock(), &mut session, &ctx, today);
    ExitCode::SUCCESS
}

fn rerun<D: DirectoryPort>(session: &Session, ctx: &RunContext<'_, D>, today: NaiveDate) {
    let result = session
        .range(today)
        .and_then(|range| ctx.execute(session.selection(), &range));
    if let Err(e) = result {
        eprintln!("error: {e}");
    }
}

fn show(session: &Session) {
    let symbols: Vec<&str> = session.selection().iter().map(Symbol::as_str).collect();
    eprintln!("  symbols: {}", if symbols.is_empty() { "(none)".to_string() } else { symbols.join(", ") });
    eprintln!("  start:   {}", session.start());
    eprintln!("  end:     {}", session.end());
}

/// Read commands until `quit` or end of input. Every command that changes
/// the inputs triggers a fresh run; errors are reported and the session
/// carries on.
pub fn run_session<D: DirectoryPort>(
    input: impl BufRead,
    session: &mut Session,
    ctx: &RunContext<'_, D>,
    today: NaiveDate,
) {
    eprintln!("{}", HELP);
    rerun(session, ctx, today);

    let prompt = || {
        eprint!("> ");
        let _ = std::io::stderr().flush();
    };
    prompt();

    for line in input.lines() {
        let Ok(line) = line else { break };
        let command = match SessionCommand::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => {
                prompt();
                continue;
            }
            Err(e) => {
                eprintln!("error: {e}");
                prompt();
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => eprintln!("{}", HELP),
            SessionCommand::Show => show(session),
            SessionCommand::SetSymbols(list) => match session.set_symbols(&list) {
                Ok(()) => rerun(session, ctx, today),
                Err(e) => eprintln!("error: {e}"),
            },
            SessionCommand::Add(arg) => {
                let directory = match ctx.directory.map(|cache| cache.get()).transpose() {
                    Ok(directory) => directory,
                    Err(e) => {
                        eprintln!("error: {e}");
                        prompt();
                        continue;
                    }
                };
                if session.add(&arg, directory.as_ref()) {
                    rerun(session, ctx, today);
                } else {
                    eprintln!("nothing added: '{}' is unknown or already selected", arg);
                }
            }
            SessionCommand::Remove(arg) => {
                if session.remove(&arg) {
                    rerun(session, ctx, today);
                } else {
                    eprintln!("nothing removed: '{}' is not selected", arg);
                }
            }
            SessionCommand::Start(date) => {
                session.set_start(date, today);
                rerun(session, ctx, today);
            }
            SessionCommand::End(date) => {
                session.set_end(date, today);
                rerun(session, ctx, today);
            }
            SessionCommand::Run => rerun(session, ctx, today),
            SessionCommand::Refresh => {
                match ctx.directory.map(|cache| cache.refresh()) {
                    Some(Ok(dir)) => eprintln!("Ticker directory reloaded: {} symbols", dir.len()),
                    Some(Err(e)) => eprintln!("error: {e}"),
                    None => eprintln!("ticker directory is disabled"),
                }
                rerun(session, ctx, today);
            }
        }
        prompt();
    }
}
