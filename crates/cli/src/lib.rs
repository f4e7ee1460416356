use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use standards_catalog::{Catalog, CatalogConfig, Entry, FilterView, LookupError, QartodTest};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod flags;
mod render;

use flags::{ConfigFormat, EntryFormat, ListFormat};

const CONFIG_ENV: &str = "STANDARDS_CATALOG_CONFIG";
const SUGGESTION_LIMIT: usize = 3;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "standards")]
#[command(about = "Look up and filter scientific measurement standards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog configuration file (overrides STANDARDS_CATALOG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the embedded data set
    #[arg(long, global = true)]
    no_bundled: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a single standard by name or alias
    Get(GetArgs),

    /// List standards matching every given criterion
    Filter(FilterArgs),

    /// List the IOOS categories used by the catalog
    Categories(CategoriesArgs),

    /// Inspect QARTOD test suites attached to a standard
    #[command(subcommand)]
    Qc(QcCommands),
}

#[derive(Args)]
struct GetArgs {
    /// Standard name or alias
    name: String,

    #[arg(short, long, value_enum, default_value_t = EntryFormat::Full)]
    format: EntryFormat,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Common variable name (e.g. sst, atmp)
    #[arg(long = "var")]
    variable_name: Option<String>,

    /// IOOS category, exact match
    #[arg(short, long)]
    ioos_category: Option<String>,

    /// Canonical or alternative unit, exact match
    #[arg(short, long)]
    unit: Option<String>,

    /// Only standards with QARTOD test suites
    #[arg(long)]
    qartod: bool,

    /// Case-insensitive text in name, long name or description
    #[arg(short, long)]
    search: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ListFormat::Short)]
    format: ListFormat,
}

impl FilterArgs {
    fn apply<'a>(&self, catalog: &'a Catalog) -> FilterView<'a> {
        let mut view = catalog.filter();
        if let Some(variable_name) = &self.variable_name {
            view = view.by_variable_name(variable_name);
        }
        if let Some(category) = &self.ioos_category {
            view = view.by_ioos_category(category);
        }
        if let Some(unit) = &self.unit {
            view = view.by_unit(unit);
        }
        view = view.has_qartod_tests(self.qartod);
        if let Some(text) = &self.search {
            view = view.search(text);
        }
        view
    }
}

#[derive(Args)]
struct CategoriesArgs {
    /// Output as a JSON array
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum QcCommands {
    /// List the QARTOD test suites of a standard
    List {
        /// Standard name or alias
        name: String,
    },
    /// Show one QARTOD test suite
    Get {
        /// Standard name or alias
        name: String,
        /// Test suite slug
        slug: String,
    },
    /// Generate an ioos_qc config stream from a test suite
    Config(QcConfigArgs),
}

#[derive(Args)]
struct QcConfigArgs {
    /// Standard name or alias
    name: String,

    /// Test suite slug
    slug: String,

    /// Suite arguments as key=value
    args: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = ConfigFormat::Yaml)]
    format: ConfigFormat,
}

pub fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Get(args) => args.format.is_json(),
        Commands::Filter(args) => args.format.is_json(),
        Commands::Categories(args) => args.json,
        Commands::Qc(QcCommands::Config(args)) => args.format == ConfigFormat::Json,
        Commands::Qc(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(cli.config.clone(), cli.no_bundled)?;
    let catalog = Catalog::from_config(&config).context("Failed to load the standards catalog")?;

    match cli.command {
        Commands::Get(args) => run_get(&catalog, &args),
        Commands::Filter(args) => run_filter(&catalog, &args),
        Commands::Categories(args) => run_categories(&catalog, &args),
        Commands::Qc(QcCommands::List { name }) => run_qc_list(&catalog, &name),
        Commands::Qc(QcCommands::Get { name, slug }) => run_qc_get(&catalog, &name, &slug),
        Commands::Qc(QcCommands::Config(args)) => run_qc_config(&catalog, &args),
    }
}

fn resolve_config(flag: Option<PathBuf>, no_bundled: bool) -> Result<CatalogConfig> {
    let path = flag.or_else(|| {
        env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });

    let mut config = match path {
        Some(path) => {
            debug!("Using catalog config {}", path.display());
            CatalogConfig::from_file(&path)
                .with_context(|| format!("Invalid catalog config {}", path.display()))?
        }
        None => CatalogConfig::default(),
    };
    if no_bundled {
        config.bundled = false;
    }
    Ok(config)
}

/// Resolve `name`, or explain the miss on stderr
fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Option<&'a Entry> {
    match catalog.get(name) {
        Ok(entry) => Some(entry),
        Err(err) => {
            eprintln!("{err}");
            if let LookupError::NotFound { query } = &err {
                if let Some(hint) = render::did_you_mean(&catalog.suggest(query, SUGGESTION_LIMIT)) {
                    eprintln!("{hint}");
                }
            }
            None
        }
    }
}

fn run_get(catalog: &Catalog, args: &GetArgs) -> Result<ExitCode> {
    let Some(entry) = lookup(catalog, &args.name) else {
        return Ok(ExitCode::from(2));
    };
    let text = match args.format {
        EntryFormat::Short => render::short(entry),
        EntryFormat::Full => render::full(entry)?,
        EntryFormat::Xarray => render::xarray(entry)?,
        EntryFormat::Json => render::json(entry)?,
    };
    print_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

fn run_filter(catalog: &Catalog, args: &FilterArgs) -> Result<ExitCode> {
    let view = args.apply(catalog);
    debug!(
        "Filter kept {} of {} standards",
        view.len(),
        view.baseline_len()
    );
    if view.is_empty() && !view.is_unfiltered() {
        eprintln!("No standards found matching the criteria.");
        return Ok(ExitCode::from(2));
    }
    if view.is_empty() && args.format == ListFormat::Short {
        eprintln!("The catalog has no standards.");
        return Ok(ExitCode::SUCCESS);
    }

    let text = match args.format {
        ListFormat::Short => render::list_short(&view),
        ListFormat::Xarray => render::list_xarray(&view)?,
        ListFormat::Json => render::json(&render::FilterPayload::new(&view))?,
    };
    print_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

fn run_categories(catalog: &Catalog, args: &CategoriesArgs) -> Result<ExitCode> {
    let categories = catalog.known_ioos_categories();
    let text = if args.json {
        render::json(categories)?
    } else {
        categories.join("\n")
    };
    print_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

fn run_qc_list(catalog: &Catalog, name: &str) -> Result<ExitCode> {
    let Some(entry) = lookup(catalog, name) else {
        return Ok(ExitCode::from(2));
    };
    if !entry.has_qartod_tests() {
        eprintln!("{} has no QARTOD test suites", entry.name);
        return Ok(ExitCode::from(2));
    }
    print_stdout(&render::qartod_list(entry))?;
    Ok(ExitCode::SUCCESS)
}

/// Resolve a standard and one of its suites, or explain the miss on stderr
fn lookup_suite<'a>(catalog: &'a Catalog, name: &str, slug: &str) -> Option<&'a QartodTest> {
    let entry = lookup(catalog, name)?;
    let test = entry.qartod_test(slug);
    if test.is_none() {
        eprintln!("{} has no QARTOD test suite {slug}", entry.name);
    }
    test
}

fn run_qc_get(catalog: &Catalog, name: &str, slug: &str) -> Result<ExitCode> {
    let Some(test) = lookup_suite(catalog, name, slug) else {
        return Ok(ExitCode::from(2));
    };
    print_stdout(&render::qartod_details(test))?;
    Ok(ExitCode::SUCCESS)
}

fn run_qc_config(catalog: &Catalog, args: &QcConfigArgs) -> Result<ExitCode> {
    let Some(test) = lookup_suite(catalog, &args.name, &args.slug) else {
        return Ok(ExitCode::from(2));
    };
    let config = match test
        .parse_arguments(&args.args)
        .and_then(|arguments| test.scaffold(&arguments))
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error generating configuration: {err}");
            return Ok(ExitCode::from(2));
        }
    };
    debug!(
        "{} configures {} tests",
        test.slug,
        config.test_types().len()
    );

    let text = match args.format {
        ConfigFormat::Yaml => render::qartod_config_yaml(test, &config)?,
        ConfigFormat::Json => render::json(&config)?,
    };
    print_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filter_args_chain_only_given_criteria() {
        let catalog = Catalog::bundled().expect("bundled");

        let none = FilterArgs::default();
        assert!(none.apply(&catalog).is_unfiltered());

        let args = FilterArgs {
            unit: Some("m".to_string()),
            qartod: true,
            ..FilterArgs::default()
        };
        let view = args.apply(&catalog);
        assert_eq!(view.predicates().len(), 2);
        assert_eq!(
            view.names(),
            vec!["sea_surface_height_above_geopotential_datum"]
        );
    }

    #[test]
    fn no_bundled_overrides_default_config() {
        let config = resolve_config(None, true).expect("config");
        assert!(!config.bundled);
    }
}
