use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tz_locale::localized::{
    available_locales, convert_original_to_localized, default_data_path, load_any, load_raw,
    timezone_data_for_locale, timezone_data_for_locales, timezone_value_for_city, write_json, TimezoneData,
    DEFAULT_LOCALE,
};
use tz_locale::server;

/// tz-locale: locale-aware timezone display data
///
/// Converts single-locale timezone datasets, looks up cities with locale
/// fallback, and serves locale-filtered views.
///
/// Examples:
///   tzlocale convert raw.json --out ~/.tz-locale/timezones.json
///   tzlocale locales
///   tzlocale lookup Europe/Rome --locale it
///   tzlocale filter it --fallback en
///   tzlocale filter-many it,de
///   tzlocale serve --port 3000
#[derive(Parser)]
#[command(name = "tzlocale", version, about, long_about = None)]
struct Cli {
    /// Dataset file, raw or localized JSON. Defaults to ~/.tz-locale/timezones.json.
    #[arg(long, global = true, env = "TZ_LOCALE_DATA")]
    data: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a raw single-locale file (region → city → triple) to the localized shape.
    Convert {
        /// Raw JSON file.
        raw: PathBuf,

        /// Write here instead of stdout.
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// List the locales available in the dataset.
    Locales,

    /// Look up one city's display strings.
    Lookup {
        /// City id, e.g. Europe/Rome.
        city: String,

        #[arg(long, short = 'l', default_value = DEFAULT_LOCALE)]
        locale: String,

        /// Used when --locale is not available.
        #[arg(long, default_value = DEFAULT_LOCALE)]
        fallback: String,
    },

    /// Restrict the dataset to a single locale.
    Filter {
        locale: String,

        #[arg(long, default_value = DEFAULT_LOCALE)]
        fallback: String,
    },

    /// Restrict the dataset to several locales (space or comma separated).
    FilterMany {
        #[arg(required = true, value_delimiter = ',')]
        locales: Vec<String>,
    },

    /// Report regions whose locale set differs from the first region's.
    Check,

    /// Serve the dataset over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,
    },
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tz_locale=info,tzlocale=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;

    match cli.command {
        Command::Convert { raw, out } => {
            let source = load_raw(&raw)?;
            let data = convert_original_to_localized(&source);
            match out {
                Some(path) => {
                    write_json(&path, &data)?;
                    info!(regions = data.len(), "wrote {}", path.display());
                }
                None => print_json(&data, pretty)?,
            }
        }

        Command::Locales => {
            let data = load_dataset(cli.data.as_deref())?;
            print_json(&available_locales(&data)?, pretty)?;
        }

        Command::Lookup { city, locale, fallback } => {
            let data = load_dataset(cli.data.as_deref())?;
            match timezone_value_for_city(&locale, &city, &fallback, &data)? {
                Some(value) => print_json(&*value, pretty)?,
                None => bail!("Timezone not found: '{}' (locale {}, fallback {})", city, locale, fallback),
            }
        }

        Command::Filter { locale, fallback } => {
            let data = load_dataset(cli.data.as_deref())?;
            print_json(&timezone_data_for_locale(&locale, &fallback, &data)?, pretty)?;
        }

        Command::FilterMany { locales } => {
            let data = load_dataset(cli.data.as_deref())?;
            print_json(&timezone_data_for_locales(&locales, &data), pretty)?;
        }

        Command::Check => {
            let data = load_dataset(cli.data.as_deref())?;
            let report = data.check_uniform_locales();
            print_json(&report, pretty)?;
            if !report.is_empty() {
                bail!("{} region(s) differ from the first region's locale set", report.len());
            }
        }

        Command::Serve { host, port } => {
            let data = load_dataset(cli.data.as_deref())?;
            for mismatch in data.check_uniform_locales() {
                warn!("non-uniform locales: {}", mismatch);
            }
            let runtime = tokio::runtime::Runtime::new().context("Cannot start async runtime")?;
            runtime
                .block_on(server::start(data, &host, port))
                .with_context(|| format!("Server on {}:{} failed", host, port))?;
        }
    }

    Ok(())
}

fn load_dataset(path: Option<&Path>) -> Result<TimezoneData> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_data_path);
    Ok(load_any(&path)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_many_accepts_commas() {
        let cli = Cli::try_parse_from(["tzlocale", "filter-many", "it,de", "ja"]).unwrap();
        match cli.command {
            Command::FilterMany { locales } => assert_eq!(locales, vec!["it", "de", "ja"]),
            _ => panic!("expected filter-many"),
        }
    }

    #[test]
    fn test_lookup_defaults() {
        let cli = Cli::try_parse_from(["tzlocale", "lookup", "Europe/Rome", "--data", "x.json"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("x.json")));
        match cli.command {
            Command::Lookup { city, locale, fallback } => {
                assert_eq!(city, "Europe/Rome");
                assert_eq!(locale, "en");
                assert_eq!(fallback, "en");
            }
            _ => panic!("expected lookup"),
        }
    }
}
