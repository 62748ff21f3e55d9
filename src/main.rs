use clap::{Parser, Subcommand};

use git_release_notes::config;
use git_release_notes::error::Result;
use git_release_notes::git::GitHistory;
use git_release_notes::release::{self, NotesFormat, ReleaseOptions};
use git_release_notes::ui;
use git_release_notes::version;

#[derive(Parser)]
#[command(
    name = "git-release-notes",
    about = "Provides next release version and release notes from git commit messages",
    arg_required_else_help = true
)]
struct Cli {
    #[arg(short = 'j', long, help = "Output in json format")]
    json: bool,

    #[arg(short = 't', long, help = "Prefix for tags (optional)")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Add tag prefix to versions (only if tag prefix is defined)")]
    tag: bool,

    #[arg(short = 's', long, help = "Scope to filter release note items")]
    scope: Option<String>,

    #[arg(short = 'i', long, help = "Start range from next revision")]
    initial_revision: Option<String>,

    #[arg(short = 'l', long, default_value = "HEAD", help = "Stop on this revision")]
    last_revision: String,

    #[arg(long, help = "Don't drop pre-release tags")]
    allow_pre_releases: bool,

    #[arg(short = 'c', long, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print version of this tool
    Version,
    /// Print current version (useful for non-release builds)
    CurrentVersion,
    /// Print version of last release
    LastReleaseVersion,
    /// Print version of next release from git commit messages
    ReleaseVersion,
    /// Print release notes from git commit messages
    ReleaseNotes {
        #[arg(
            short = 's',
            long,
            help = "Switch output to short format to be used as description of git tag"
        )]
        short: bool,

        #[arg(
            short = 'l',
            long = "one-line",
            help = "Switch output to one-line format to be used as description of git tag"
        )]
        one_line: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        ui::display_error(&err.to_string());
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    let options = ReleaseOptions {
        tag_prefix: cli.tag_prefix.clone().unwrap_or(config.tag_prefix),
        as_tag: cli.tag,
        scope: cli.scope.clone().or(config.scope),
        initial_revision: cli.initial_revision.clone(),
        last_revision: cli.last_revision.clone(),
        allow_pre_releases: cli.allow_pre_releases || config.allow_pre_releases,
    };

    match &cli.command {
        Command::Version => {
            let tool_version = env!("CARGO_PKG_VERSION");
            if cli.json {
                println!("{}", serde_json::json!({ "tool_version": tool_version }));
            } else {
                println!("{}", tool_version);
            }
        }

        Command::CurrentVersion => {
            let history = GitHistory::open(".")?;
            let described = version::describe_version(
                &history,
                &options.tag_prefix,
                options.allow_pre_releases,
                7,
                &options.last_revision,
            )?;
            let current = strip_tag_prefix(described.version, &options);
            if cli.json {
                println!("{}", serde_json::json!({ "current_version": current }));
            } else {
                println!("{}", current);
            }
        }

        Command::LastReleaseVersion => {
            let history = GitHistory::open(".")?;
            let resolved = version::resolve_last_release(
                &history,
                &options.tag_prefix,
                &options.last_revision,
                options.allow_pre_releases,
            )?;
            let last = strip_tag_prefix(resolved.version, &options);
            if cli.json {
                println!("{}", serde_json::json!({ "last_release_version": last }));
            } else {
                println!("{}", last);
            }
        }

        Command::ReleaseVersion => {
            let history = GitHistory::open(".")?;
            let info = release::compute_release(&history, &options)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "release_version": info.version.current,
                        "increment": info.version.increment,
                    })
                );
            } else {
                println!("{}", info.version.current);
            }
        }

        Command::ReleaseNotes { short, one_line } => {
            let history = GitHistory::open(".")?;
            let info = release::compute_release(&history, &options)?;
            if cli.json {
                println!("{}", serde_json::to_string(&info)?);
            } else {
                let format = if *one_line {
                    NotesFormat::OneLine
                } else if *short {
                    NotesFormat::Short
                } else {
                    NotesFormat::Full
                };
                println!("{}", release::render_notes(&info, format));
            }
        }
    }

    Ok(())
}

/// Strip the configured tag prefix unless versions were requested as tags.
fn strip_tag_prefix(version: String, options: &ReleaseOptions) -> String {
    if options.as_tag || options.tag_prefix.is_empty() {
        return version;
    }
    match version.strip_prefix(&options.tag_prefix) {
        Some(stripped) => stripped.to_string(),
        None => version,
    }
}
