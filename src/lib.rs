pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod events;
pub mod link;
pub mod query;
pub mod replay;

use crate::clock::{ManualClock, SystemClock};
use crate::config::SearchConfig;
use crate::display::{EventRow, FilterReport};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::filter::LevelFilter;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use clock::Clock;
pub use controller::{FilterController, FilterOutcome, QueryInput, Row, TextInput};
pub use events::{Event, SearchField, load_events, parse_events};
pub use link::{query_from_link, share_link};
pub use query::{RuleSet, Term, exclusion_query, matches, parse};

fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::OFF,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to set up logging: {}", e).into())
}

fn write_output_file(
    path: &std::path::Path,
    content: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, content)
        .map_err(|e| format!("Failed to write output file '{}': {}", path.display(), e).into())
}

fn emit(text: &str, output: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    print!("{text}");
    if let Some(path) = output {
        write_output_file(path, text)?;
    }
    Ok(())
}

/// Merge the query restored from a link with the one given on the command line
fn initial_query(
    terms: &[String],
    link: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let typed = terms.join(" ");
    let restored = match link {
        Some(link) => query_from_link(link).map_err(|e| format!("Invalid link: {}", e))?,
        None => None,
    };

    Ok(match restored {
        Some(restored) if typed.trim().is_empty() => restored,
        Some(restored) => format!("{restored} {typed}"),
        None => typed,
    })
}

fn build_report(
    controller: &FilterController<Event, TextInput, SystemClock>,
    today: NaiveDate,
    config: &SearchConfig,
) -> FilterReport {
    let query = controller.input().value();
    FilterReport {
        link: share_link(&config.link_base, &query),
        rules: controller.rules().to_string(),
        query,
        total: controller.rows().len(),
        outcome: controller.outcome(),
        events: controller
            .visible_items()
            .map(|event| EventRow {
                when: event.when_label(today, &config.today_label),
                name: event.name.clone(),
                place: event.place.clone(),
                url: event.url.clone(),
            })
            .collect(),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli_parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| format!("Failed to load config: {}", e))?;
    if let Some(config_path) = &cli.config {
        info!(path = %config_path.display(), "config loaded");
    }
    debug!(?config, "effective config");

    let output = cli.output.as_deref();

    match &cli.command {
        Commands::Filter {
            file,
            query,
            link,
            exclude,
            today,
            field,
        } => {
            let events =
                load_events(file).map_err(|e| format!("Failed to load events: {}", e))?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let field = field.unwrap_or(config.search_field);
            let initial = initial_query(query, link.as_deref())?;
            info!(query = %initial, ?field, "filtering {} events", events.len());

            let mut controller = FilterController::attach(
                events,
                TextInput::new(initial),
                SystemClock::new(),
                config.debounce_delay(),
                |event: &Event| field.extract(event, today, &config.today_label),
            );
            for phrase in exclude {
                controller.exclude(phrase);
            }

            let report = build_report(&controller, today, &config);
            let text = match cli.format {
                OutputFormat::Text => {
                    display::format_filter_text(&report, &config.empty_state_label)
                }
                OutputFormat::Json => format!("{}\n", display::format_filter_json(&report)),
            };
            emit(&text, output)?;
        }
        Commands::Link {
            query,
            base,
            decode,
        } => {
            let text = if let Some(link) = decode {
                let decoded =
                    query_from_link(link).map_err(|e| format!("Invalid link: {}", e))?;
                match cli.format {
                    OutputFormat::Text => format!("{}\n", decoded.unwrap_or_default()),
                    OutputFormat::Json => format!(
                        "{}\n",
                        serde_json::json!({ "link": link, "query": decoded })
                    ),
                }
            } else {
                let base = base.as_deref().unwrap_or(&config.link_base);
                let query = query.join(" ");
                let link = share_link(base, &query);
                match cli.format {
                    OutputFormat::Text => format!("{link}\n"),
                    OutputFormat::Json => format!(
                        "{}\n",
                        serde_json::json!({ "link": link, "query": query.trim() })
                    ),
                }
            };
            emit(&text, output)?;
        }
        Commands::Replay {
            file,
            script,
            today,
            field,
        } => {
            let events =
                load_events(file).map_err(|e| format!("Failed to load events: {}", e))?;
            let steps = replay::load_script(script)
                .map_err(|e| format!("Failed to load script '{}': {}", script.display(), e))?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let field = field.unwrap_or(config.search_field);
            let total = events.len();

            let clock = ManualClock::new();
            let mut controller = FilterController::attach(
                events,
                TextInput::default(),
                clock.clone(),
                config.debounce_delay(),
                |event: &Event| field.extract(event, today, &config.today_label),
            );
            let firings = replay::replay(&mut controller, &clock, &steps);
            info!(steps = steps.len(), firings = firings.len(), "replayed script");

            let text = match cli.format {
                OutputFormat::Text => display::format_replay_text(&firings, total),
                OutputFormat::Json => format!("{}\n", display::format_replay_json(&firings, total)),
            };
            emit(&text, output)?;
        }
    }

    Ok(())
}
