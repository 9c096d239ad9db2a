use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Render RFC-style XML documents to paginated nroff")]
struct Args {
    /// Input XML document
    input: PathBuf,

    /// Output file (defaults to the input path with an .nroff extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render edit-mark counters instead of leading blank lines
    #[arg(long)]
    editing: bool,

    /// Disable the automatic page-break heuristic
    #[arg(long)]
    no_autobreaks: bool,

    /// Emit a table of contents even if the document does not ask for one
    #[arg(long)]
    toc: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("nroff"));

    let mut doc = match docroff::rfcxml::parse(&args.input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // CLI flags override the document's processing instructions
    if args.editing {
        doc.settings.editing = true;
    }
    if args.no_autobreaks {
        doc.settings.autobreaks = false;
    }
    if args.toc {
        doc.settings.toc = true;
    }

    let text = docroff::nroff::render(&doc);
    if let Err(e) = std::fs::write(&output, &text) {
        eprintln!("error: {}: {e}", output.display());
        return ExitCode::FAILURE;
    }
    log::info!("wrote {} ({} bytes)", output.display(), text.len());
    ExitCode::SUCCESS
}
