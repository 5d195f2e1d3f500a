mod args;
mod proc;

use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use is2::cli::{decode_options, init_logging, process_paths_par};

use crate::{
    args::Args,
    proc::{transform_image, TransformArgs},
};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;
    let t_args = TransformArgs::from_args(&args)?;
    std::fs::create_dir_all(&t_args.output)?;

    let opts = decode_options(args.temp_dir.as_deref());
    let count = process_paths_par(args.paths, opts)
        .map(|p| -> Result<()> {
            let inp = p?;
            let out_path = transform_image(&inp, &t_args)?;
            info!(output = %out_path.display(), "wrote {}", inp.result.filename);
            Ok(())
        })
        .try_fold(
            || 0usize,
            |acc, res| -> Result<_> {
                res?;
                Ok(acc + 1)
            },
        )
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    info!("Processed {} images", count);
    info!(
        "Transform equation: V = {} + {} C",
        t_args.coeffs[0], t_args.coeffs[1]
    );
    info!(
        "Inverse equation: C = {} + {} V",
        -t_args.coeffs[0] / t_args.coeffs[1],
        1. / t_args.coeffs[1]
    );
    Ok(())
}
