use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use arbor_inspect::{Document, InspectError, Inspector};
use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "arbor-inspect")]
#[command(about = "Replay gestures against a tree and print the callbacks it fires")]
struct Cli {
    /// Hierarchy and configuration as JSON: `{"config": {...}, "nodes": [...]}`
    tree: PathBuf,

    /// Gesture script, one command per line. Read from stdin when omitted.
    script: Option<PathBuf>,

    /// Where to write the debug log
    #[arg(long, default_value = "arbor-inspect.log")]
    log: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match File::create(&cli.log) {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file) {
                eprintln!("Warning: logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("Warning: cannot create {}: {}", cli.log.display(), e),
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), InspectError> {
    let document = Document::load(&cli.tree)?;
    let script = match &cli.script {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let inspector = Inspector::new(document)?;
    let stdout = io::stdout();
    inspector.run(&script, &mut stdout.lock())
}
