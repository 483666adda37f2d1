//! hdfsutils - Unix-like `mv` and `find` for HDFS over WebHDFS.
//!
//! Usage:
//!   hdfs mv [-f|-n|-i] [-v] SOURCE... TARGET       Rename or move into a directory
//!   hdfs mv --overlay SOURCE_DIR... TARGET_DIR     Merge directory trees
//!   hdfs find [PATH...] [FILTERS]                  List matching paths
//!   hdfs --help                                    Show help

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hdfsutils_core::Node;
use hdfsutils_find::{FindOptions, Finder};
use hdfsutils_ops::{LinePrompt, MoveEvent, MoveMode, MoveRequest, Mover, OverwritePolicy};
use hdfsutils_webhdfs::{ClientConfig, WebHdfsClient, DEFAULT_URL};

#[derive(Parser)]
#[command(
    name = "hdfsutils",
    version,
    about = "Unix-like find and mv for HDFS",
    long_about = "hdfsutils talks to a namenode over WebHDFS and provides familiar \
                  file utilities: `mv` with an overlay mode that merges directory \
                  trees, and `find` with name, type, size, time and owner filters."
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log every remote call to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Namenode WebHDFS address
    #[arg(long, env = "WEBHDFS_URL", default_value = DEFAULT_URL, global = true)]
    url: String,

    /// User name sent with each request
    #[arg(long, env = "HADOOP_USER_NAME", global = true)]
    user: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,
}

impl ConnectionArgs {
    fn client(&self) -> Result<WebHdfsClient> {
        let config = ClientConfig::builder()
            .base_url(self.url.clone())
            .user(self.user.clone())
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .context("Invalid connection settings")?;
        WebHdfsClient::new(config).context("Cannot create WebHDFS client")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Move or rename files and directories
    Mv(MvArgs),

    /// Search directory trees
    Find(FindArgs),
}

#[derive(Args)]
struct MvArgs {
    /// Overwrite existing targets without asking
    #[arg(short, long)]
    force: bool,

    /// Never overwrite existing targets
    #[arg(short = 'n', long = "no-clobber")]
    no_clobber: bool,

    /// Ask before overwriting each existing target
    #[arg(short, long)]
    interactive: bool,

    /// Print each move as `source -> target`
    #[arg(short, long)]
    verbose: bool,

    /// Merge source directory trees into the target directory tree
    #[arg(long)]
    overlay: bool,

    /// Sources followed by the target
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    paths: Vec<String>,
}

#[derive(Args)]
struct FindArgs {
    /// Starting points
    #[arg(default_value = "/", value_name = "PATH")]
    paths: Vec<String>,

    /// Final component matches a glob
    #[arg(long)]
    name: Option<String>,

    /// Like --name, ignoring case
    #[arg(long)]
    iname: Option<String>,

    /// Full path matches a glob
    #[arg(long)]
    path: Option<String>,

    /// f for files, d for directories
    #[arg(long = "type", value_parser = ["f", "d"])]
    file_type: Option<String>,

    /// Size in blocks, e.g. +10M, -1k, 100c
    #[arg(long, allow_hyphen_values = true)]
    size: Option<String>,

    /// Modified N days ago (+N more, -N less)
    #[arg(long, allow_hyphen_values = true)]
    mtime: Option<String>,

    /// Modified N minutes ago (+N more, -N less)
    #[arg(long, allow_hyphen_values = true)]
    mmin: Option<String>,

    /// Owned by user
    #[arg(long = "owner")]
    owner: Option<String>,

    /// Owned by group
    #[arg(long)]
    group: Option<String>,

    /// Empty files and directories only
    #[arg(long)]
    empty: bool,

    /// Skip entries shallower than this depth
    #[arg(long)]
    mindepth: Option<usize>,

    /// Do not descend below this depth
    #[arg(long)]
    maxdepth: Option<usize>,

    /// Keep the namenode's listing order instead of sorting by name
    #[arg(long)]
    unsorted: bool,

    /// Print an `ls -l` style line per entry
    #[arg(short, long)]
    long: bool,

    /// With --long, print sizes like 1.5 MiB
    #[arg(long)]
    human: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

impl FindArgs {
    fn options(&self) -> FindOptions {
        FindOptions {
            name: self.name.clone(),
            iname: self.iname.clone(),
            path: self.path.clone(),
            file_type: self.file_type.clone(),
            size: self.size.clone(),
            mtime: self.mtime.clone(),
            mmin: self.mmin.clone(),
            user: self.owner.clone(),
            group: self.group.clone(),
            empty: self.empty,
            min_depth: self.mindepth,
            max_depth: self.maxdepth,
            listing_order: self.unsorted,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.debug)?;

    let client = cli.connection.client()?;
    let prog = program_name();

    let succeeded = match cli.command {
        Command::Mv(args) => run_mv(&client, &prog, args),
        Command::Find(args) => run_find(&client, &prog, &args),
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Name used as the prefix of error lines.
fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(hdfsutils_core::path::basename)
        .filter(|name| !name.is_empty())
        .unwrap_or("hdfsutils")
        .to_string()
}

/// Run a move and print its events.
fn run_mv(client: &WebHdfsClient, prog: &str, mut args: MvArgs) -> bool {
    let Some(target) = args.paths.pop() else {
        return false;
    };
    let policy = OverwritePolicy::from_flags(args.force, args.no_clobber, args.interactive);
    let mode = if args.overlay {
        MoveMode::Overlay
    } else {
        MoveMode::Plain
    };
    let request = MoveRequest::new(args.paths, target)
        .with_mode(mode)
        .with_policy(policy);

    let mut mover = Mover::new(client);
    if policy == OverwritePolicy::Interactive {
        mover = mover.with_prompt(LinePrompt::new(io::stdin().lock(), io::stdout()));
    }

    let verbose = args.verbose;
    let result = mover.run(&request, &mut |event: &MoveEvent| {
        if let Some(line) = event_line(event, verbose) {
            println!("{line}");
        }
    });

    match result {
        Ok(summary) => {
            for (_, error) in &summary.failures {
                eprintln!("{prog}: {error}");
            }
            summary.is_success()
        }
        Err(error) => {
            eprintln!("{prog}: {error}");
            false
        }
    }
}

/// Line printed for a move event, if any.
fn event_line(event: &MoveEvent, verbose: bool) -> Option<String> {
    match event {
        MoveEvent::Renamed { .. } if verbose => Some(event.to_string()),
        MoveEvent::Conflict(_) => Some(event.to_string()),
        _ => None,
    }
}

/// Run a search and print the matching entries.
fn run_find(client: &WebHdfsClient, prog: &str, args: &FindArgs) -> bool {
    let finder = match Finder::from_options(client, &args.options(), chrono::Utc::now()) {
        Ok(finder) => finder,
        Err(error) => {
            eprintln!("{prog}: {error}");
            return false;
        }
    };

    let summary = finder.find_all(args.paths.as_slice(), |entry| match args.format {
        OutputFormat::Text if args.long => println!("{}", long_line(&entry.node, args.human)),
        OutputFormat::Text => println!("{}", entry.path()),
        OutputFormat::Json => match serde_json::to_string(&entry.node) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(path = entry.path(), error = %e, "cannot encode entry"),
        },
    });

    for (_, error) in &summary.failures {
        eprintln!("{prog}: {error}");
    }
    summary.is_success()
}

/// Format a node like one line of `ls -l`.
fn long_line(node: &Node, human: bool) -> String {
    let kind = if node.is_dir() { 'd' } else { '-' };
    let replication = if node.is_dir() {
        "-".to_string()
    } else {
        node.replication.to_string()
    };
    let size = if human {
        format_size(node.length)
    } else {
        node.length.to_string()
    };

    format!(
        "{kind}{} {replication:>3} {:<10} {:<10} {size:>10} {} {}",
        node.permission.symbolic(),
        node.owner.as_str(),
        node.group.as_str(),
        node.modified.format("%Y-%m-%d %H:%M"),
        node.path
    )
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::CommandFactory;
    use hdfsutils_core::{NodeKind, TypeConflict};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mv_arguments() {
        let cli = Cli::parse_from(["hdfs", "mv", "-v", "-f", "/a/bar.txt", "/a/foo.txt"]);
        let Command::Mv(args) = cli.command else {
            panic!("expected mv");
        };
        assert!(args.verbose && args.force);
        assert_eq!(args.paths, ["/a/bar.txt", "/a/foo.txt"]);

        assert!(Cli::try_parse_from(["hdfs", "mv", "/only"]).is_err());
    }

    #[test]
    fn test_find_arguments() {
        let cli = Cli::parse_from(["hdfs", "find", "--size", "-1k", "--type", "f", "--mindepth", "1"]);
        let Command::Find(args) = cli.command else {
            panic!("expected find");
        };
        assert_eq!(args.paths, ["/"]);
        let options = args.options();
        assert_eq!(options.size.as_deref(), Some("-1k"));
        assert_eq!(options.file_type.as_deref(), Some("f"));
        assert_eq!(options.min_depth, Some(1));
    }

    #[test]
    fn test_event_lines() {
        let renamed = MoveEvent::Renamed {
            source: "/a/bar.txt".into(),
            target: "/a/foo.txt".into(),
            replaced: false,
        };
        assert_eq!(event_line(&renamed, true).as_deref(), Some("/a/bar.txt -> /a/foo.txt"));
        assert_eq!(event_line(&renamed, false), None);

        let conflict = MoveEvent::Conflict(TypeConflict::new(
            "/a/c",
            "/b/c",
            NodeKind::Directory,
            NodeKind::File,
        ));
        assert_eq!(
            event_line(&conflict, false).as_deref(),
            Some("ERROR: source(/a/c:DIRECTORY) and target(/b/c:FILE) have different types")
        );
    }

    #[test]
    fn test_long_line() {
        let modified = Utc.with_ymd_and_hms(2015, 1, 2, 3, 4, 0).unwrap();
        let mut node = Node::file("/user/alice/data.csv", 2048)
            .with_modified(modified)
            .with_owner("alice", "staff");
        node.replication = 3;

        assert_eq!(
            long_line(&node, false),
            "-rw-r--r--   3 alice      staff            2048 2015-01-02 03:04 /user/alice/data.csv"
        );
        assert!(long_line(&node, true).contains("2 KiB"));

        let dir = Node::directory("/user").with_modified(modified);
        assert!(long_line(&dir, false).starts_with("drwxr-xr-x   - "));
    }
}
