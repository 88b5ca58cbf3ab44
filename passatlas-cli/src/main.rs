//! Command-line consumer for the Passatlas engine.
//!
//! Loads an entity snapshot, applies the engine's filters, and prints the
//! resulting views; `geocode` runs a one-shot place lookup against the
//! configured endpoint.
#![forbid(unsafe_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use passatlas_core::{JsonFileStore, LegendKey, Level, LevelError};
use passatlas_data::{
    DEFAULT_GEOCODER_ENDPOINT, DataSourceError, GeocodeError, Geocoder as _, JsonFileSource,
    NominatimGeocoder, NominatimGeocoderConfig, SourceBuildError,
};
use passatlas_session::Session;
use thiserror::Error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => print!("{output}"),
        Err(error) => {
            eprintln!("passatlas: {error}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Command::List(args) => list(args).await,
        Command::Map(args) => map(args).await,
        Command::Geocode(args) => geocode(args).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "passatlas",
    about = "Browse a catalog of passes, roads, tours and scenic spots",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the filtered, sorted list view of a snapshot.
    List(ListArgs),
    /// Print the legend-filtered map view of a snapshot.
    Map(MapArgs),
    /// Look up place candidates for a free-text query.
    Geocode(GeocodeArgs),
}

#[derive(Debug, Parser)]
struct ListArgs {
    /// Path to the entity snapshot (JSON array)
    #[arg(long, value_name = "path")]
    data: PathBuf,
    /// Case-insensitive name filter
    #[arg(long, value_name = "text", default_value = "")]
    search: String,
    /// Restrict to entities crossing this country code (repeatable)
    #[arg(long = "country", value_name = "code")]
    countries: Vec<String>,
    /// Restrict to this difficulty level (1-3)
    #[arg(long, value_name = "level")]
    level: Option<u8>,
    /// Show only favorites recorded in the state file
    #[arg(long)]
    only_favorites: bool,
    /// Path to the persisted user state
    #[arg(long, value_name = "path", default_value = "passatlas-state.json")]
    state: PathBuf,
}

#[derive(Debug, Parser)]
struct MapArgs {
    /// Path to the entity snapshot (JSON array)
    #[arg(long, value_name = "path")]
    data: PathBuf,
    /// Enable a legend toggle (repeatable)
    #[arg(long = "show", value_name = "key")]
    show: Vec<LegendKey>,
    /// Disable a legend toggle (repeatable)
    #[arg(long = "hide", value_name = "key")]
    hide: Vec<LegendKey>,
    /// Path to the persisted user state
    #[arg(long, value_name = "path", default_value = "passatlas-state.json")]
    state: PathBuf,
}

#[derive(Debug, Parser)]
struct GeocodeArgs {
    /// Free-text place query
    #[arg(value_name = "query")]
    query: String,
    /// Geocoding service endpoint
    #[arg(long, value_name = "url", default_value = DEFAULT_GEOCODER_ENDPOINT)]
    endpoint: String,
    /// Maximum number of candidates
    #[arg(long, value_name = "count", default_value_t = 5)]
    limit: usize,
}

async fn load_session(data: &Path, state: &Path) -> Result<Session, CliError> {
    let mut session = Session::new(Arc::new(JsonFileStore::new(state)));
    session.load(&JsonFileSource::new(data)).await?;
    Ok(session)
}

async fn list(args: ListArgs) -> Result<String, CliError> {
    let mut session = load_session(&args.data, &args.state).await?;
    let filters = session.filters_mut();
    filters.set_search_term(args.search);
    filters.set_selected_countries(
        args.countries
            .iter()
            .map(|code| code.to_ascii_uppercase())
            .collect(),
    );
    if let Some(level) = args.level {
        filters.set_selected_level(Some(Level::new(level)?));
    }
    filters.set_show_only_favorites(args.only_favorites);

    let mut output = String::new();
    for entity in session.list_view() {
        let star = if session.is_favorite(entity.id) { "*" } else { " " };
        let countries: Vec<&str> = entity.countries.iter().map(String::as_str).collect();
        let _ = writeln!(
            output,
            "{star} {name}  [{status}]  {countries}",
            name = entity.name,
            status = entity.status,
            countries = countries.join(",")
        );
    }
    Ok(output)
}

async fn map(args: MapArgs) -> Result<String, CliError> {
    let mut session = load_session(&args.data, &args.state).await?;
    for key in args.show {
        session.filters_mut().set_legend(key, true);
    }
    for key in args.hide {
        session.filters_mut().set_legend(key, false);
    }

    let mut output = String::new();
    for entity in session.map_view() {
        let _ = writeln!(
            output,
            "{name}  ({category})",
            name = entity.name,
            category = entity.legend_category()
        );
    }
    Ok(output)
}

async fn geocode(args: GeocodeArgs) -> Result<String, CliError> {
    let geocoder = NominatimGeocoder::with_config(NominatimGeocoderConfig::new(args.endpoint))?;
    let candidates = geocoder.search(&args.query, args.limit).await?;

    let mut output = String::new();
    for candidate in candidates {
        let _ = writeln!(
            output,
            "{name}  ({lat}, {lon})",
            name = candidate.compact_display_name(),
            lat = candidate.location.y,
            lon = candidate.location.x
        );
    }
    Ok(output)
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Build(#[from] SourceBuildError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"[
        {"id": 1, "name": "Stelvio", "status": "open", "type": "pass", "countries": "IT,CH", "level": 3},
        {"id": 2, "name": "Furka", "status": "open", "type": "pass", "countries": "CH", "level": 2},
        {"id": 3, "name": "Umbrail", "status": "closed", "type": "pass", "countries": "CH,IT"},
        {"id": 4, "name": "Dreipaessefahrt", "status": "open", "type": "tour"}
    ]"#;

    fn snapshot_dir() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let data = dir.path().join("snapshot.json");
        std::fs::write(&data, SNAPSHOT).expect("write snapshot");
        let state = dir.path().join("state.json");
        (dir, data, state)
    }

    #[rstest]
    fn parses_list_arguments() {
        let cli = Cli::try_parse_from([
            "passatlas",
            "list",
            "--data",
            "snapshot.json",
            "--search",
            "stel",
            "--country",
            "ch",
            "--country",
            "it",
            "--level",
            "3",
            "--only-favorites",
        ])
        .expect("arguments should parse");
        let Command::List(args) = cli.command else {
            panic!("expected list subcommand");
        };
        assert_eq!(args.search, "stel");
        assert_eq!(args.countries, ["ch", "it"]);
        assert_eq!(args.level, Some(3));
        assert!(args.only_favorites);
    }

    #[rstest]
    fn parses_map_arguments() {
        let cli = Cli::try_parse_from([
            "passatlas",
            "map",
            "--data",
            "snapshot.json",
            "--show",
            "tour",
            "--hide",
            "closed",
        ])
        .expect("arguments should parse");
        let Command::Map(args) = cli.command else {
            panic!("expected map subcommand");
        };
        assert_eq!(args.show, [LegendKey::Tour]);
        assert_eq!(args.hide, [LegendKey::Closed]);
    }

    #[rstest]
    fn rejects_unknown_legend_keys() {
        let outcome = Cli::try_parse_from([
            "passatlas",
            "map",
            "--data",
            "snapshot.json",
            "--show",
            "everything",
        ]);
        assert!(outcome.is_err());
    }

    #[rstest]
    fn rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["passatlas"]).is_err());
    }

    #[tokio::test]
    async fn list_renders_the_sorted_filtered_view() {
        let (_dir, data, state) = snapshot_dir();
        let args = ListArgs {
            data,
            search: String::new(),
            countries: vec!["it".into()],
            level: None,
            only_favorites: false,
            state,
        };
        let output = list(args).await.expect("list should render");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Stelvio"));
        assert!(lines[1].contains("Umbrail"));
    }

    #[tokio::test]
    async fn list_rejects_out_of_range_levels() {
        let (_dir, data, state) = snapshot_dir();
        let args = ListArgs {
            data,
            search: String::new(),
            countries: Vec::new(),
            level: Some(9),
            only_favorites: false,
            state,
        };
        assert!(matches!(list(args).await, Err(CliError::Level(_))));
    }

    #[tokio::test]
    async fn map_honours_legend_toggles() {
        let (_dir, data, state) = snapshot_dir();
        let args = MapArgs {
            data,
            show: vec![LegendKey::Tour],
            hide: vec![LegendKey::Closed],
            state,
        };
        let output = map(args).await.expect("map should render");
        assert!(output.contains("Dreipaessefahrt"));
        assert!(!output.contains("Umbrail"));
    }

    #[tokio::test]
    async fn missing_snapshot_is_a_source_error() {
        let dir = TempDir::new().expect("create temp dir");
        let args = MapArgs {
            data: dir.path().join("missing.json"),
            show: Vec::new(),
            hide: Vec::new(),
            state: dir.path().join("state.json"),
        };
        assert!(matches!(map(args).await, Err(CliError::Source(_))));
    }
}
