use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;

use deckdown::pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markdown document to convert
    #[arg(default_value = "README.md")]
    input: PathBuf,

    /// Where to write the presentation
    #[arg(short, long, default_value = "dist/output.pptx")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let pipeline = Pipeline::new(cli.input, cli.output);
    match print_err(pipeline.build()) {
        Some(()) => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    }
}

fn print_err<T>(res: anyhow::Result<T>) -> Option<T> {
    match res {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            e.chain()
                .skip(1)
                .for_each(|cause| eprintln!(" {} {}", style("caused by:").bold(), cause));
            None
        }
    }
}
