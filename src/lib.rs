pub mod cli;
pub mod config;
pub mod filter;
pub mod output;
pub mod records;

use crate::config::SearchConfig;
use crate::output::{
    SearchSource, format_count_json, format_count_text, format_explain_json, format_explain_text,
    format_matches_json, format_matches_text, print_filter_warnings,
};
use crate::records::{STDIN_NAME, collect_field_names, load_records};
use anyhow::Context;
use log::info;
use std::path::PathBuf;

pub use cli::{Cli, ColorMode, Commands, OutputFormat, cli_parse};
pub use filter::{Expr, FieldList, FilterOptions, FilterWarning, QueryFilter, Record};

/// Compile `search` and keep the matching items, in order
pub fn smart_search_filter<I, R>(
    items: I,
    search: &str,
    default_fields: impl Into<FieldList>,
    options: FilterOptions,
) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Record,
{
    QueryFilter::new(search, default_fields, options).filter(items)
}

/// Initialise logging; `RUST_LOG` takes precedence over `level`
pub fn init_logger(level: log::LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

fn build_filter(
    query: &str,
    fields: Option<&str>,
    case_sensitive: bool,
    config: &SearchConfig,
    fallback_fields: impl FnOnce() -> FieldList,
) -> QueryFilter {
    let default_fields = fields
        .map(FieldList::parse)
        .or_else(|| config.default_fields())
        .unwrap_or_else(fallback_fields);

    let mut options = config.filter_options();
    if case_sensitive {
        options = options.case_sensitive(true);
    }

    QueryFilter::new(query, default_fields, options)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    apply_color_mode(cli.color);

    info!("config profile: {}", config.profile_name);
    if let Some(config_path) = &cli.config {
        info!("config file: {}", config_path.display());
    }

    let rendered = match &cli.command {
        Commands::Filter {
            query,
            files,
            fields,
            case_sensitive,
            count,
            columns,
        } => {
            let files = if files.is_empty() {
                vec![PathBuf::from(STDIN_NAME)]
            } else {
                files.clone()
            };

            let mut records = Vec::new();
            for file in &files {
                records.extend(load_records(file)?);
            }

            let filter = build_filter(query, fields.as_deref(), *case_sensitive, &config, || {
                collect_field_names(&records)
            });
            if !cli.quiet {
                print_filter_warnings(&filter);
            }
            info!("default fields: {}", filter.default_fields());

            let matches = filter.filter(&records);
            info!("{} of {} record(s) matched", matches.len(), records.len());

            let source = SearchSource {
                query: query.as_str(),
                files: &files,
                default_fields: filter.default_fields(),
            };
            let columns = columns
                .as_deref()
                .map(FieldList::parse)
                .or_else(|| {
                    (!config.output.columns.is_empty())
                        .then(|| FieldList::from(config.output.columns.clone()))
                })
                .unwrap_or_else(|| filter.default_fields().clone());

            match (cli.format, *count) {
                (OutputFormat::Text, false) => format_matches_text(&matches, &columns),
                (OutputFormat::Text, true) => format_count_text(matches.len()),
                (OutputFormat::Json, false) => format_matches_json(&source, &matches),
                (OutputFormat::Json, true) => format_count_json(&source, matches.len()),
            }
        }
        Commands::Explain {
            query,
            fields,
            case_sensitive,
        } => {
            let filter = build_filter(query, fields.as_deref(), *case_sensitive, &config, || {
                FieldList::default()
            });
            match cli.format {
                OutputFormat::Text => format_explain_text(&filter),
                OutputFormat::Json => format_explain_json(&filter),
            }
        }
    };

    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    if let Some(path) = &cli.output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
    }

    Ok(())
}
