use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ytc::collect::{CollectionPlan, CollectionSession, TimeRange};
use ytc::config::{self, YtcConfig};
use ytc::keywords::top_keywords;
use ytc::output::{json as json_out, table};
use ytc::store::Store;
use ytc::youtube::{HttpTransport, SearchOrder};

#[derive(Parser)]
#[command(name = "ytc", version, about = "YouTube collector — time-windowed video and comment acquisition")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log progress details (info level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect videos and comments for one or more search queries
    Collect {
        /// Search query (repeatable; default: configured or built-in list)
        #[arg(long = "query", short = 'q')]
        queries: Vec<String>,

        /// Start of the publication range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End of the publication range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Videos to collect per query (1-100)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=100))]
        per_query: Option<u16>,

        /// Comments to fetch per video (0-100)
        #[arg(long, value_parser = clap::value_parser!(u16).range(0..=100))]
        max_comments: Option<u16>,

        /// Search ordering: date, relevance, viewCount
        #[arg(long)]
        order: Option<String>,

        /// Output directory (default: ~/.ytc/data)
        #[arg(long, env = "YTC_OUT")]
        out: Option<PathBuf>,

        /// YouTube Data API key (overrides YTC_API_KEY and config)
        #[arg(long)]
        api_key: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Show the plan without contacting the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Rank normalized keywords across collected video titles
    Keywords {
        /// Output directory to read (default: ~/.ytc/data)
        #[arg(long, env = "YTC_OUT")]
        out: Option<PathBuf>,

        /// Only titles collected under this query
        #[arg(long)]
        query: Option<String>,

        /// Maximum keywords to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Summarize collected data
    Stats {
        /// Output directory to read (default: ~/.ytc/data)
        #[arg(long, env = "YTC_OUT")]
        out: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create default config file at ~/.ytc/config.toml
    Init,
    /// Show current configuration (secrets redacted)
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let cfg = YtcConfig::load()?;

    match cli.command {
        Commands::Collect {
            queries,
            from,
            to,
            per_query,
            max_comments,
            order,
            out,
            api_key,
            yes,
            dry_run,
        } => {
            let defaults = cfg.collection();

            let queries = if !queries.is_empty() {
                queries
            } else if let Some(q) = defaults.queries.clone().filter(|q| !q.is_empty()) {
                q
            } else {
                config::DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
            };
            let from = from
                .or(defaults.start_date.clone())
                .unwrap_or_else(|| config::DEFAULT_START_DATE.to_string());
            let to = to
                .or(defaults.end_date.clone())
                .unwrap_or_else(|| config::DEFAULT_END_DATE.to_string());
            let per_query = per_query
                .map(usize::from)
                .or(defaults.videos_per_query)
                .unwrap_or(config::DEFAULT_VIDEOS_PER_QUERY);
            let max_comments = max_comments
                .map(usize::from)
                .or(defaults.max_comments)
                .unwrap_or(config::DEFAULT_MAX_COMMENTS);
            anyhow::ensure!(
                (1..=100).contains(&per_query),
                "videos_per_query must be between 1 and 100 (got {per_query})"
            );
            anyhow::ensure!(
                max_comments <= 100,
                "max_comments must be at most 100 (got {max_comments})"
            );

            let order_name = order.or_else(|| cfg.youtube.as_ref().and_then(|y| y.order.clone()));
            let order = match order_name {
                Some(name) => SearchOrder::parse(&name).with_context(|| {
                    format!("Unknown search order: {name}. Use: date, relevance, viewCount")
                })?,
                None => SearchOrder::default(),
            };

            let range = TimeRange::parse_dates(&from, &to)?;
            let plan = CollectionPlan::new(queries, range, per_query, max_comments)?;

            if dry_run {
                if json_output {
                    json_out::print_json(&serde_json::json!({
                        "queries": plan.queries,
                        "rangeStart": plan.range.start,
                        "rangeEnd": plan.range.end,
                        "perQuery": plan.per_query,
                        "maxComments": plan.max_comments,
                        "order": order.as_str(),
                        "totalTarget": plan.total_target(),
                    }))?;
                } else {
                    table::print_plan(&plan);
                    println!("\n[dry-run] No requests made.");
                }
                return Ok(());
            }

            let key = config::resolve_credential(
                api_key.as_deref(),
                config::API_KEY_ENV,
                cfg.youtube.as_ref(),
            )?;

            let dir = resolve_dir(out, &cfg)?;
            let store = Store::open(&dir)?;

            if !yes {
                table::print_plan(&plan);
                eprint!("\nStart collection into {}? [y/N] ", dir.display());
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let base_url = cfg.youtube.as_ref().and_then(|y| y.base_url.clone());
            let transport = HttpTransport::new(key, base_url)?;
            let session = CollectionSession::new(&transport, cfg.pacing()).with_order(order);
            let result = session.run_to_store(&plan, &store)?;

            if json_output {
                json_out::print_json(&result.manifest)?;
            } else {
                table::print_run_summary(&result.manifest);
                println!("\n  Written to {}", store.dir.display());
            }
        }

        Commands::Keywords { out, query, limit } => {
            let store = Store::open(&resolve_dir(out, &cfg)?)?;
            let videos = store.load_videos()?;
            let titles: Vec<&str> = videos
                .iter()
                .filter(|v| query.as_deref().map_or(true, |q| v.query == q))
                .map(|v| v.title.as_str())
                .collect();
            let ranked = top_keywords(titles.iter().copied(), limit);

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "query": query,
                    "videos": titles.len(),
                    "keywords": ranked,
                }))?;
            } else {
                table::print_keywords(&ranked, titles.len());
            }
        }

        Commands::Stats { out } => {
            let store = Store::open(&resolve_dir(out, &cfg)?)?;
            let stats = store.stats()?;
            if json_output {
                json_out::print_json(&stats)?;
            } else {
                table::print_stats(&stats);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                if config::init_config()? {
                    let path = config::config_path()?;
                    println!("Created config at {}", path.display());
                } else {
                    println!("Config already exists at {}", config::config_path()?.display());
                }
            }
            ConfigAction::Show => {
                println!("{}", cfg.display_redacted());
            }
        },
    }

    Ok(())
}

/// Output directory: flag > config output_dir > ~/.ytc/data
fn resolve_dir(flag: Option<PathBuf>, cfg: &YtcConfig) -> Result<PathBuf> {
    match flag.or_else(|| cfg.collection().output_dir) {
        Some(dir) => Ok(dir),
        None => Store::default_dir(),
    }
}
