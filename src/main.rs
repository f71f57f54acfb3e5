//! Folio: portfolio page renderer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use folio::app::{App, AppState};
use folio::config::{load_config, write_starter_config, Config, CONFIG_FILENAME};
use folio::content::{load_content, ContentSource, DEFAULT_CONTENT};
use folio::filter::{tag_facets, FilterMode};
use folio::site::write_page;
use folio::view::{Host, Page, RecordingHost};
use folio::watcher::ContentWatcher;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Location used when no site URL is configured
const DEFAULT_LOCATION: &str = "http://localhost/";

/// Folio: render a portfolio page from a JSON content document
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Content document: a path or an http(s) URL (default: from config, then content.json)
    content: Option<String>,

    /// Path to config file (default: search .foliorc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the page here instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Query string applied to the page location, e.g. "tags=rust,web"
    #[arg(long, short = 'Q')]
    query: Option<String>,

    /// How active tags combine: all (every tag) or single (one tag at a time)
    #[arg(long)]
    mode: Option<FilterMode>,

    /// Print the rendered page model as JSON instead of HTML
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Watch the content and config files and re-render on change
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .foliorc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Content document the config points at (default: content.json)
        #[arg(long)]
        content: Option<String>,
    },

    /// List the filterable tags in a content document with their item counts
    Tags {
        /// Content document (default: from config, then content.json)
        content: Option<String>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init { dir, content } => run_init(dir.as_deref(), content.as_deref()),
            Commands::Tags {
                content,
                config,
                json,
            } => run_tags(content.as_deref(), config.as_deref(), json),
        };
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    // Load config (CLI flags override config file)
    let out = args.out.as_ref().map(|p| p.display().to_string());
    let config = load_config(&cwd, args.config.as_deref())?.merge_with_cli(
        args.content.as_deref(),
        out.as_deref(),
        args.mode,
    );
    let source = content_source(&config, &cwd);

    if args.watch {
        return run_watch(&args, &config, &source, &cwd);
    }

    render_once(&args, &config, &source)
}

fn content_source(config: &Config, cwd: &Path) -> ContentSource {
    ContentSource::parse(config.content.as_deref().unwrap_or(DEFAULT_CONTENT)).resolve(cwd)
}

/// Page location: the configured site URL with the CLI query applied
fn page_location(config: &Config, query: Option<&str>) -> Result<Url> {
    let base = config.site_url.as_deref().unwrap_or(DEFAULT_LOCATION);
    let mut location =
        Url::parse(base).with_context(|| format!("Invalid siteUrl in config: {}", base))?;
    if let Some(query) = query {
        let query = query.trim_start_matches('?');
        location.set_query(if query.is_empty() { None } else { Some(query) });
    }
    Ok(location)
}

fn render_once(args: &Args, config: &Config, source: &ContentSource) -> Result<ExitCode> {
    let Some(content) = load_content(source) else {
        eprintln!(
            "{}: Could not load content from {}",
            "Error".red().bold(),
            source
        );
        return Ok(ExitCode::from(2));
    };

    let location = page_location(config, args.query.as_deref())?;
    let meta = config.page_meta(&content.bio.name);
    let host = RecordingHost::new(location);
    let Some(app) = App::start(Some(content), config.render_options(), host) else {
        return Ok(ExitCode::from(2));
    };

    let output = if args.json {
        let summary = PageSummary::new(app.page(), app.host().location(), app.state());
        serde_json::to_string_pretty(&summary).context("Failed to serialize page")? + "\n"
    } else {
        write_page(app.page(), &meta)
    };

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !args.quiet {
                let shown = app.page().visible_item_indices().len();
                let rendered = app.page().rendered_item_indices().len();
                eprintln!(
                    "{} Wrote {} ({} of {} items, {} collapsed)",
                    "Done".green().bold(),
                    path.display(),
                    rendered,
                    app.state().items.len(),
                    rendered - shown
                );
            }
        }
        None => print!("{}", output),
    }

    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, config: &Config, source: &ContentSource, cwd: &Path) -> Result<ExitCode> {
    let Some(content_path) = source.as_path() else {
        anyhow::bail!("--watch needs a local content file, got {}", source);
    };
    if config.output_path().is_none() {
        anyhow::bail!("--watch needs an output file (--out or \"output\" in config)");
    }

    let mut files = vec![content_path.to_path_buf()];
    let config_file = match &args.config {
        Some(p) => Some(cwd.join(p)),
        None => {
            let candidate = cwd.join(CONFIG_FILENAME);
            candidate.exists().then_some(candidate)
        }
    };
    files.extend(config_file);

    let watcher = ContentWatcher::watch(&files).context("Failed to create file watcher")?;

    // First render up front; a failure here is reported, not fatal
    if let Err(e) = render_once(args, config, source) {
        eprintln!("{}: {:#}", "Error".red(), e);
    }
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    let out = args.out.as_ref().map(|p| p.display().to_string());
    loop {
        let paths = watcher.next_changes();
        if paths.is_empty() {
            continue;
        }
        if !args.quiet {
            for p in &paths {
                eprintln!("{}: {} changed", "Info".blue(), p.display());
            }
        }

        // Config may have changed too: reload it every time
        let config = match load_config(cwd, args.config.as_deref()) {
            Ok(c) => c.merge_with_cli(args.content.as_deref(), out.as_deref(), args.mode),
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red(), e);
                continue;
            }
        };
        let source = content_source(&config, cwd);
        if let Err(e) = render_once(args, &config, &source) {
            eprintln!("{}: {:#}", "Error".red(), e);
        }
    }
}

fn run_init(dir: Option<&Path>, content: Option<&str>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let path = write_starter_config(dir, content)?;
    eprintln!("{} Created {}", "Done".green().bold(), path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_tags(content: Option<&str>, config_path: Option<&Path>, json: bool) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, config_path)?.merge_with_cli(content, None, None);
    let source = content_source(&config, &cwd);

    let Some(content) = load_content(&source) else {
        eprintln!(
            "{}: Could not load content from {}",
            "Error".red().bold(),
            source
        );
        return Ok(ExitCode::from(2));
    };

    let facets = tag_facets(&content.items);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&facets).context("Failed to serialize tags")?
        );
    } else if facets.is_empty() {
        eprintln!("{}: No filterable tags found", "Info".blue());
    } else {
        let width = facets.iter().map(|f| f.tag.len()).max().unwrap_or(0);
        for facet in &facets {
            println!("{:<width$}  {}", facet.tag, facet.count, width = width);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// JSON view of a rendered page
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageSummary {
    location: String,
    bio_name_html: String,
    bio_description: String,
    active_filters: Vec<String>,
    sections: Vec<SectionSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionSummary {
    id: String,
    show_more: Option<String>,
    items: Vec<CardSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardSummary {
    index: usize,
    title: String,
    url: Option<String>,
    hidden: bool,
}

impl PageSummary {
    fn new(page: &Page, location: &Url, state: &AppState) -> Self {
        Self {
            location: location.to_string(),
            bio_name_html: page.bio_name_html.clone(),
            bio_description: page.bio_description.clone(),
            active_filters: state.filter.iter().map(str::to_string).collect(),
            sections: page
                .sections
                .iter()
                .map(|s| SectionSummary {
                    id: s.id.clone(),
                    show_more: s
                        .show_more
                        .as_ref()
                        .filter(|c| c.visible)
                        .map(|c| c.label.clone()),
                    items: s
                        .cards
                        .iter()
                        .map(|c| CardSummary {
                            index: c.item_index,
                            title: state
                                .items
                                .get(c.item_index)
                                .map(|i| i.title.clone())
                                .unwrap_or_default(),
                            url: c.url.clone(),
                            hidden: c.is_hidden(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
