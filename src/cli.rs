//! Helpers to parse CLI arguments in the accompanying
//! binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{DecodeOptions, ThermalResult};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// The `--temp-dir` option shared by the binaries.
pub fn temp_dir_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("temp dir")
        .long("temp-dir")
        .value_name("TEMP_DIR")
        .help("Directory for temporary extraction (default: system temp dir)")
}

pub fn decode_options(temp_dir: Option<&str>) -> DecodeOptions {
    DecodeOptions {
        temp_root: temp_dir.map(PathBuf::from),
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );
    bar
}

pub struct ThermalInput {
    pub path: PathBuf,
    pub result: ThermalResult,
}

/// Decode containers in parallel, with a progress bar.
/// Each decode uses its own extraction directory.
pub fn process_paths_par(
    paths: Vec<PathBuf>,
    opts: DecodeOptions,
) -> impl ParallelIterator<Item = Result<ThermalInput>> {
    let bar = progress_bar(paths.len());

    paths
        .into_par_iter()
        .map(move |path| -> Result<ThermalInput> {
            let result = ThermalResult::try_from_is2_path_with(&path, &opts)
                .with_context(|| format!("decoding {}", path.display()))?;
            Ok(ThermalInput { path, result })
        })
        .inspect(move |_| bar.inc(1))
}
