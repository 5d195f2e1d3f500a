mod args;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use itertools::iproduct;
use tracing::info;

use args::Args;
use is2::{
    cli::{decode_options, init_logging},
    ThermalResult,
};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    let opts = decode_options(args.temp_dir.as_deref());
    let result = ThermalResult::try_from_is2_path_with(&args.path, &opts)
        .with_context(|| format!("decoding {}", args.path.display()))?;

    let (rows, cols) = result.temperatures.dim();
    info!(camera = ?result.camera, "decoded {}", result.filename);
    info!(settings = ?result.metadata.settings, "image: {}x{}", rows, cols);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "row,col,temp")?;
    for (row, col) in iproduct!(0..rows, 0..cols) {
        let temp = args.scale.convert(result.temperatures[(row, col)]);
        writeln!(out, "{},{},{}", row, col, temp)?;
    }
    out.flush()?;

    Ok(())
}
