//! hywind-hover CLI - Hywind utility class documentation provider.
//!
//! # Usage
//!
//! ```bash
//! # Hover info at a position
//! hywind-hover hover page.ui --line 3 --column 18
//!
//! # Read from stdin
//! cat page.ui | hywind-hover hover - --line 3 --column 18 --format json
//!
//! # Resolve a token inside a bare attribute value
//! hywind-hover resolve "bg-primary p-4" --start 0 --end 2
//!
//! # Refresh the catalog and cache it
//! hywind-hover refresh --save hywind-meta.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use hywind_hover::render::{to_html, to_markdown, unescape_html};
use hywind_hover::{
    CaretQuery, Catalog, CompletionCandidate, EntryKind, HywindService, Settings,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hywind-hover")]
#[command(about = "Hywind utility class documentation provider")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog manifest to use instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to .hywind.yaml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown", global = true)]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show documentation for the class or prop at a position
    Hover {
        /// Markup file (or - for stdin)
        file: String,

        /// Line number (1-based)
        #[arg(long)]
        line: u32,

        /// Column number (1-based)
        #[arg(long)]
        column: u32,
    },

    /// List completion candidates at a position
    Complete {
        /// Markup file (or - for stdin)
        file: String,

        /// Line number (1-based)
        #[arg(long)]
        line: u32,

        /// Column number (1-based)
        #[arg(long)]
        column: u32,

        /// Only candidates starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Show the token and range at a position
    Definition {
        /// Markup file (or - for stdin)
        file: String,

        /// Line number (1-based)
        #[arg(long)]
        line: u32,

        /// Column number (1-based)
        #[arg(long)]
        column: u32,
    },

    /// Resolve the token under a caret inside an attribute value
    Resolve {
        /// Unquoted attribute value
        value: String,

        /// Start of the hovered range (char offset)
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// End of the hovered range (defaults to start)
        #[arg(long)]
        end: Option<usize>,

        /// Text of the hovered element, if known
        #[arg(long)]
        hint: Option<String>,
    },

    /// List every catalog entry of one kind
    List {
        #[arg(value_enum, default_value = "class")]
        kind: EntryKind,
    },

    /// Fetch the latest manifest
    Refresh {
        /// Manifest URL
        #[arg(long, env = "HYWIND_META_URL")]
        url: Option<String>,

        /// Origin label to stamp on every entry
        #[arg(long)]
        origin: Option<String>,

        /// Write the fetched catalog to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Plain,
    Json,
    Html,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = match cli.config {
        Some(ref path) => Settings::load(path)?,
        None => Settings::load_default(&std::env::current_dir()?),
    };

    // A configured cache may be stale or missing; an explicit --catalog may not
    let catalog = match cli.catalog.as_deref() {
        Some(path) => Catalog::load(path)?,
        None => Catalog::load_or_default(settings.catalog_path.as_deref()),
    };
    tracing::debug!(
        classes = catalog.classes.len(),
        props = catalog.props.len(),
        "catalog ready"
    );

    match cli.command {
        Commands::Hover { file, line, column } => {
            let source = read_source(&file)?;
            let service = HywindService::new(catalog, settings);

            match service.hover(&source, line, column) {
                Some(info) => {
                    let output = match cli.format {
                        OutputFormat::Markdown => info.contents,
                        OutputFormat::Plain => unescape_html(&strip_markdown(&info.contents)),
                        OutputFormat::Json => serde_json::to_string_pretty(&info)?,
                        OutputFormat::Html => to_html(&info.doc),
                    };
                    println!("{}", output);
                }
                None => {
                    tracing::info!("no hover information at {}:{}", line, column);
                }
            }
        }

        Commands::Complete {
            file,
            line,
            column,
            prefix,
        } => {
            let source = read_source(&file)?;
            let service = HywindService::new(catalog, settings);

            let mut candidates = service.complete(&source, line, column);
            if let Some(ref prefix) = prefix {
                candidates.retain(|c| c.name.starts_with(prefix.as_str()));
            }
            print_candidates(&candidates, cli.format)?;
        }

        Commands::Definition { file, line, column } => {
            let source = read_source(&file)?;
            let service = HywindService::new(catalog, settings);

            if let Some(def) = service.definition(&source, line, column) {
                match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&def)?),
                    _ => println!(
                        "{} {}:{}-{}:{}",
                        def.name,
                        def.range.start_line,
                        def.range.start_col,
                        def.range.end_line,
                        def.range.end_col
                    ),
                }
            }
        }

        Commands::Resolve {
            value,
            start,
            end,
            hint,
        } => {
            let mut query = CaretQuery::spanning(start..end.unwrap_or(start));
            if let Some(hint) = hint {
                query = query.hint(hint);
            }

            let service = HywindService::new(catalog, settings);
            let Some(token) = service.resolve_token(&value, &query) else {
                tracing::info!("no token resolved");
                return Ok(());
            };

            match service.hover_doc_at(&value, &query) {
                Some(doc) => {
                    let output = match cli.format {
                        OutputFormat::Markdown => to_markdown(&doc),
                        OutputFormat::Plain => {
                            let info = service.quick_info_at(&value, &query).unwrap_or_default();
                            unescape_html(&info)
                        }
                        OutputFormat::Json => serde_json::to_string_pretty(&doc)?,
                        OutputFormat::Html => to_html(&doc),
                    };
                    println!("{}", output);
                }
                None => println!("{}", token),
            }
        }

        Commands::List { kind } => {
            print_candidates(&catalog.completion_candidates(kind), cli.format)?;
        }

        Commands::Refresh { url, origin, save } => {
            if let Some(url) = url {
                settings.meta_url = url;
            }
            if origin.is_some() {
                settings.origin_override = origin;
            }

            let service = HywindService::new(catalog, settings);
            let refreshed = service.refresh()?;
            eprintln!(
                "Refreshed catalog: {} classes, {} props",
                refreshed.classes.len(),
                refreshed.props.len()
            );

            if let Some(ref path) = save {
                refreshed.save(path)?;
                eprintln!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn read_source(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(Path::new(file))
    }
}

fn print_candidates(
    candidates: &[CompletionCandidate],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(candidates)?),
        _ => {
            for candidate in candidates {
                println!("{}", candidate_line(candidate));
            }
        }
    }
    Ok(())
}

fn candidate_line(candidate: &CompletionCandidate) -> String {
    let summary = unescape_html(&candidate.short_description);
    if summary.is_empty() {
        candidate.name.clone()
    } else {
        format!("{}\t{}", candidate.name, summary)
    }
}

/// Strip markdown formatting for plain text output.
fn strip_markdown(md: &str) -> String {
    md.lines()
        .filter(|line| !line.starts_with("```"))
        .map(|line| {
            line.trim_start_matches('#')
                .trim()
                .replace("**", "")
                .replace('`', "")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
