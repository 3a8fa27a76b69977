//! stl2ps - convert a view of an STL file into PostScript
//!
//! Usage: `stl2ps INFILE [OUTFILE] [AXIS ANGLE]...`
//!
//! The model is rotated as requested, viewed from +z, and drawn with
//! back-facing facets removed and the rest painted far to near.
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use stltools_cli::{
    init_logging, ps_output_path, report, write_output, ConvertError, PostScriptRenderer, Provenance,
    ViewArgs,
};
use stltools_core::stl;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "stl2ps",
    version,
    about = "Convert a view of an STL file into PostScript",
    after_help = "TRANSFORM is AXIS ANGLE, where AXIS is x, y or z and ANGLE is in degrees.\n\
                  Rotations are applied in the order given."
)]
struct Cli {
    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// STL file to convert
    infile: Option<std::path::PathBuf>,

    /// Output file (default: INFILE's base name with .ps) followed by TRANSFORMs
    #[arg(value_name = "[OUTFILE] [TRANSFORM]", trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(infile) = cli.infile.as_deref() else {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    init_logging(cli.verbose);

    match run(infile, &cli.rest) {
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

fn run(infile: &Path, rest: &[String]) -> Result<()> {
    let view = ViewArgs::parse(rest);
    for warning in &view.warnings {
        report::warning(warning);
    }
    let outfile = view
        .outfile
        .clone()
        .unwrap_or_else(|| ps_output_path(infile));

    let mesh = stl::load(infile)
        .map_err(ConvertError::from)
        .with_context(|| format!("'{}' cannot be read or parsed", infile.display()))?;

    let xform = view.xform();
    let mesh = if xform.is_identity() {
        mesh
    } else {
        debug!(rotations = ?view.rotations, "rotating model");
        mesh.transformed(&xform)
    };

    let renderer = PostScriptRenderer::new(&mesh);
    let provenance = Provenance::now("stl2ps", infile);
    write_output(&outfile, |w| renderer.draw(w, &provenance))?;

    info!(
        input = %infile.display(),
        output = %outfile.display(),
        visible = renderer.facets().len(),
        facets = mesh.len(),
        "converted"
    );
    Ok(())
}
