//! stl2pov - convert STL files into POV-ray mesh or mesh2 objects
//!
//! Every `name.stl` on the command line becomes `name.inc`. Files that
//! cannot be read or parsed are reported and skipped; a file that cannot
//! be written stops the run with exit status 2.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use stltools_cli::{init_logging, output_path, pov, report, write_output, ConvertError, Provenance};
use stltools_core::stl;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "stl2pov", version, about = "Convert STL files into POV-ray mesh or mesh2 objects")]
struct Cli {
    /// Generate a mesh2 object (slow on big files)
    #[arg(short = '2', long)]
    mesh2: bool,

    /// Directory for the generated .inc files (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// One or more STL files
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.files.is_empty() {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::error(format!("{err:#}"));
            let code = err
                .downcast_ref::<ConvertError>()
                .map_or(1, ConvertError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    for file in &cli.files {
        let mesh = match stl::load(file) {
            Ok(mesh) => mesh,
            Err(err) => {
                report::error(format!("{}: {:#}", file.display(), anyhow::Error::new(err)));
                continue;
            }
        };

        let outfile = output_path(file, "inc", cli.output_dir.as_deref());
        let provenance = Provenance::now("stl2pov", file);
        write_output(&outfile, |w| pov::write_document(w, &provenance, &mesh, cli.mesh2))
            .with_context(|| format!("converting '{}'", file.display()))?;

        info!(
            input = %file.display(),
            output = %outfile.display(),
            facets = mesh.len(),
            mesh2 = cli.mesh2,
            "converted"
        );
    }
    Ok(())
}
