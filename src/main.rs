use std::{io, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use library_circulation::{
    Book, Library, LibraryConfig, LibraryError, LoadPolicy, LoadReport, Result,
    config::{DEFAULT_BOOKS_FILE, DEFAULT_MEMBERS_FILE},
    console::Console,
    logging,
    report::{self, Summary},
};

/// Command-line arguments for the library circulation desk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the books and members files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// File name of the books file inside the data directory
    #[arg(long, default_value = DEFAULT_BOOKS_FILE)]
    books_file: String,

    /// File name of the members file inside the data directory
    #[arg(long, default_value = DEFAULT_MEMBERS_FILE)]
    members_file: String,

    /// Refuse to start if a backing file has a malformed line
    #[arg(long)]
    strict: bool,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Run one command instead of the interactive menu
    #[command(subcommand)]
    command: Option<Command>,
}

/// One-shot, read-only commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Print every book, member and category
    List {
        /// Print a JSON snapshot instead of text
        #[arg(long, conflicts_with = "table")]
        json: bool,

        /// Print books as a markdown table
        #[arg(long)]
        table: bool,
    },
    /// Print headline counts
    Summary,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("{}", format!("Logging unavailable: {e}").yellow());
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Open the library and dispatch to a command or the menu
fn run(args: Args) -> Result<()> {
    let policy = if args.strict { LoadPolicy::Abort } else { LoadPolicy::SkipAndWarn };
    let config = LibraryConfig::builder()
        .data_dir(&args.data_dir)
        .books_file(args.books_file)
        .members_file(args.members_file)
        .load_policy(policy)
        .build()?;

    let (mut library, load_report) = Library::open(&config)?;
    warn_about_load(&load_report);

    match args.command {
        Some(Command::List { json: true, .. }) => {
            println!("{}", report::json_snapshot(library.catalog())?);
        }
        Some(Command::List { table: true, .. }) => {
            let books: Vec<&Book> = library.catalog().books().collect();
            println!("{}", report::books_table(&books));
        }
        Some(Command::List { .. }) => print!("{}", report::listing(library.catalog())),
        Some(Command::Summary) => println!("{}", Summary::of(library.catalog())),
        None => {
            let mut console = Console::new(io::stdin().lock(), io::stdout());
            console.run(&mut library).map_err(|e| LibraryError::io("<console>", e))?;
        }
    }

    Ok(())
}

/// One-line heads-up when the load was not clean; details are in the log
fn warn_about_load(load_report: &LoadReport) {
    if load_report.is_clean() {
        return;
    }
    let message = format!(
        "Loaded with {} skipped lines, {} unreadable files and {} loan discrepancies",
        load_report.skipped.len(),
        load_report.read_errors.len(),
        load_report.discrepancies.len()
    );
    eprintln!("{}", message.yellow());
}
