use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Filter JSON records with a free-text search query
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file with default fields and display columns
    #[arg(short, long, global = true, env = "SMART_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the records matching a query
    Filter {
        /// Search query, e.g. 'name:jo* -city:oslo | tag:urgent'
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// JSON array / JSON5 / NDJSON files with records ("-" or none for stdin)
        files: Vec<PathBuf>,

        /// Fields searched by phrases without a field scope (e.g. "name,email")
        #[arg(short = 'f', long)]
        fields: Option<String>,

        /// Match letter case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Only print the number of matching records
        #[arg(long)]
        count: bool,

        /// Columns shown in the text table (defaults to the searched fields)
        #[arg(long)]
        columns: Option<String>,
    },
    /// Show how a query is compiled
    Explain {
        /// Search query
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Fields searched by phrases without a field scope
        #[arg(short = 'f', long)]
        fields: Option<String>,

        /// Match letter case exactly
        #[arg(long)]
        case_sensitive: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Log level implied by `-v`/`-q`, used when `RUST_LOG` is not set
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_command() {
        let cli = Cli::try_parse_from([
            "smart-search",
            "-F",
            "json",
            "filter",
            "name:jo*",
            "a.json",
            "b.ndjson",
            "--fields",
            "name,email",
            "--count",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Filter {
                query,
                files,
                fields,
                count,
                case_sensitive,
                ..
            } => {
                assert_eq!(query, "name:jo*");
                assert_eq!(files.len(), 2);
                assert_eq!(fields.as_deref(), Some("name,email"));
                assert!(count);
                assert!(!case_sensitive);
            }
            _ => panic!("expected filter command"),
        }
    }

    #[test]
    fn test_negated_query_is_not_a_flag() {
        let cli = Cli::try_parse_from(["smart-search", "explain", "-tag:draft"]).unwrap();
        match cli.command {
            Commands::Explain { query, .. } => assert_eq!(query, "-tag:draft"),
            _ => panic!("expected explain command"),
        }
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["smart-search", "-vv", "explain", "x"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let cli = Cli::try_parse_from(["smart-search", "-v", "-q", "explain", "x"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Error);
    }
}
