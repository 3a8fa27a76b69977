//! Converters from STL to POV-ray and PostScript
//!
//! Shared plumbing for the `stl2pov` and `stl2ps` binaries: output naming,
//! provenance headers, error classification and logging setup.
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use stltools_core::StlError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod postscript;
pub mod pov;
pub mod report;

pub use args::{Axis, Rotation, ViewArgs};
pub use postscript::PostScriptRenderer;

/// Version of the converters, fixed at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for an input that cannot be read or parsed.
pub const EXIT_PARSE: u8 = 1;

/// Exit status for an output file that cannot be written.
pub const EXIT_WRITE: u8 = 2;

/// Failures of a single conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] StlError),

    #[error("cannot write output file '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Parse(_) => EXIT_PARSE,
            ConvertError::Write { .. } => EXIT_WRITE,
        }
    }
}

/// Where a generated file came from, written as comments at its top
#[derive(Debug, Clone)]
pub struct Provenance {
    pub program: &'static str,
    pub timestamp: String,
    pub source: PathBuf,
}

impl Provenance {
    pub fn now(program: &'static str, source: &Path) -> Self {
        Self {
            program,
            timestamp: chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
            source: source.to_path_buf(),
        }
    }

    pub fn generator(&self) -> String {
        format!("{} [ver. {}]", self.program, VERSION)
    }
}

/// Output file for `input`: its base name with `extension` in place of the
/// original extension, placed in `dir` or the current directory.
pub fn output_path(input: &Path, extension: &str, dir: Option<&Path>) -> PathBuf {
    let mut name: OsString = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("out"));
    name.push(".");
    name.push(extension);

    match dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Default PostScript output for `input`: its file name with a trailing
/// `.stl` or `.STL` replaced by `.ps`, in the current directory. Any other
/// extension is kept, so `scan.v2` becomes `scan.v2.ps`.
pub fn ps_output_path(input: &Path) -> PathBuf {
    let Some(name) = input.file_name().and_then(|s| s.to_str()) else {
        return output_path(input, "ps", None);
    };
    let base = name
        .strip_suffix(".stl")
        .or_else(|| name.strip_suffix(".STL"))
        .unwrap_or(name);
    PathBuf::from(format!("{base}.ps"))
}

/// Create `path` and fill it through `emit`.
pub fn write_output<F>(path: &Path, emit: F) -> Result<(), ConvertError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let write = || -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        emit(&mut writer)?;
        writer.flush()
    };

    write().map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence; without
/// it the level is `debug` when `verbose` and `warn` otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
