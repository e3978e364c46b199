//! CLI binary for bibler.
//!
//! Usage: bibler -k doe2020 | -a smith | -t "neural" | -l  [-f library.bib]

#[cfg(feature = "cli")]
mod cli {
    use bibler::error::{BiblerError, Result};
    use bibler::report::Report;
    use bibler::{Config, Outcome, Prompt, SearchField, Session, Target, TerminalPrompt};
    use clap::{ArgAction, ArgGroup, Parser};
    use std::ffi::OsString;
    use std::path::PathBuf;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[derive(Parser, Debug)]
    #[command(
        name = "bibler",
        about = "Search a BibTeX file and open the linked document",
        version
    )]
    #[command(group(
        ArgGroup::new("mode")
            .required(true)
            .args(["key", "author", "title", "list"])
    ))]
    pub(crate) struct Cli {
        /// Input bibtex file (defaults to the configured bibliography)
        #[arg(short = 'f', long = "file", value_name = "PATH", allow_hyphen_values = true)]
        file: Option<PathBuf>,

        /// Search for bibtex key
        #[arg(short = 'k', long, allow_hyphen_values = true)]
        key: Option<String>,

        /// Search for author
        #[arg(short = 'a', long, allow_hyphen_values = true)]
        author: Option<String>,

        /// Search for title
        #[arg(short = 't', long, allow_hyphen_values = true)]
        title: Option<String>,

        /// List all entries with links and summary statistics
        #[arg(short = 'l', long)]
        list: bool,

        /// Config file (overrides BIBLER_CONFIG and the default location)
        #[arg(short = 'c', long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Output format for the listing and the lookup result
        #[arg(long, default_value = "table")]
        output: OutputFormat,

        /// More log output (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long, action = ArgAction::Count)]
        verbose: u8,

        /// Only log errors
        #[arg(short = 'q', long, conflicts_with = "verbose")]
        quiet: bool,
    }

    #[derive(Clone, Copy, Debug, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    /// Options whose next token is their value.
    const VALUE_OPTIONS: &[&str] = &[
        "-f", "--file", "-k", "--key", "-a", "--author", "-t", "--title", "-c", "--config",
        "--output",
    ];

    /// Accept the single-dash long spellings (`-key`, `-file`, ...).
    ///
    /// Only tokens in option position are rewritten; option values and
    /// everything after `--` pass through untouched.
    pub(crate) fn normalize_args<I>(args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut out = Vec::new();
        let mut iter = args.into_iter();
        // argv[0]
        out.extend(iter.next());

        let mut value_next = false;
        let mut verbatim = false;
        for arg in iter {
            if verbatim || value_next {
                value_next = false;
                out.push(arg);
                continue;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    verbatim = true;
                    arg
                }
                Some("-file") => OsString::from("--file"),
                Some("-key") => OsString::from("--key"),
                Some("-author") => OsString::from("--author"),
                Some("-title") => OsString::from("--title"),
                Some("-list") => OsString::from("--list"),
                _ => arg,
            };
            value_next = rewritten
                .to_str()
                .is_some_and(|token| VALUE_OPTIONS.contains(&token));
            out.push(rewritten);
        }
        out
    }

    fn init_tracing(verbose: u8, quiet: bool) {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };

        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bibler={}", level)),
            ))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    fn print_report(report: &Report) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Link", "Modified", "Size"]);

        for row in &report.rows {
            let (modified, size) = match &row.file {
                Some(info) => (info.modified_display(), info.size_display()),
                None => (String::new(), String::new()),
            };
            table.add_row(vec![&row.key, &row.link, &modified, &size]);
        }

        println!("{table}");
        println!();
        println!("Entries:             {}", report.total_entries);
        println!("Entries with link:   {}", report.linked_entries);
        println!("Entries without:     {}", report.omitted.len());
        println!("Local files:         {}", report.local_files());
        println!("Total size:          {}", report.total_size_display());
    }

    fn print_outcome(outcome: &Outcome) {
        match outcome {
            Outcome::NoMatch => println!("No match ..."),
            Outcome::Opened {
                key, exact, target, ..
            } => {
                if *exact {
                    println!(
                        "Found exact match for '{}', showing: '{}'",
                        key,
                        target.location()
                    );
                }
                match target {
                    Target::Local { path } => println!("Opening file: {}", path.display()),
                    Target::Remote { url } => println!("Opening url: {}", url),
                    Target::Search { url } => {
                        println!("No link in the selected bibtex item, searching: {}", url)
                    }
                    Target::Invalid { .. } => {}
                }
            }
        }
    }

    async fn execute<P: Prompt + ?Sized>(
        cli: &Cli,
        session: &Session,
        prompt: &mut P,
    ) -> Result<()> {
        if cli.list {
            let report = session.list();
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print_report(&report),
            }
            return Ok(());
        }

        let (field, query) = if let Some(key) = &cli.key {
            (SearchField::Key, key)
        } else if let Some(author) = &cli.author {
            (SearchField::author(), author)
        } else if let Some(title) = &cli.title {
            (SearchField::title(), title)
        } else {
            // clap enforces exactly one mode.
            return Ok(());
        };

        match cli.output {
            OutputFormat::Json => {
                let outcome = session.lookup(&field, query, prompt).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            OutputFormat::Table => {
                println!("\nSearching for {} '{}'\n", field, query);
                let outcome = session.lookup(&field, query, prompt).await?;
                print_outcome(&outcome);
            }
        }
        Ok(())
    }

    /// Run the CLI and return the process exit status.
    pub async fn run() -> i32 {
        let cli = Cli::parse_from(normalize_args(std::env::args_os()));
        init_tracing(cli.verbose, cli.quiet);

        let config = match Config::discover(cli.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        run_with(&cli, config, &mut TerminalPrompt::new()).await
    }

    /// Load the bibliography, execute the requested mode and map the result
    /// to an exit status.
    pub(crate) async fn run_with<P: Prompt + ?Sized>(
        cli: &Cli,
        config: Config,
        prompt: &mut P,
    ) -> i32 {
        let missing_file_exit_code = config.missing_file_exit_code;

        let session = match Session::open(config, cli.file.as_deref()) {
            Ok(session) => session,
            Err(e @ BiblerError::NotFound(_)) => {
                println!("{}", e);
                return missing_file_exit_code;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };

        match execute(cli, &session, prompt).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    }

}

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = cli::run().await;
    std::process::exit(code);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
