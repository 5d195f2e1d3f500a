mod args;

use std::path::PathBuf;

use anyhow::Result;
use args::Args;
use ndarray::parallel::prelude::*;
use serde_derive::*;

use is2::{
    cli::{decode_options, init_logging, process_paths_par, ThermalInput},
    metadata::{CameraInfo, ImageMetadata},
    stats::{Extrema, Location, Stats},
    units::TemperatureScale,
};

fn main() -> Result<()> {
    init_logging();
    let Args {
        paths,
        scale,
        temp_dir,
    } = Args::from_cmd_line()?;

    let (mut stats, cumulative) = process_paths_par(paths, decode_options(temp_dir.as_deref()))
        .map(|try_input| -> Result<_> { Ok(ImageStats::from_input(try_input?, scale)) })
        .try_fold(
            || (vec![], Stats::default()),
            |mut acc, try_stats| -> Result<_> {
                let item = try_stats?;
                acc.1 += &item.stats;
                acc.0.push(item);
                Ok(acc)
            },
        )
        .try_reduce(
            || (vec![], Stats::default()),
            |mut acc1, acc2| -> Result<_> {
                acc1.0.extend(acc2.0);
                acc1.1 += &acc2.1;
                Ok(acc1)
            },
        )?;
    stats.sort_by(|a, b| a.path.cmp(&b.path));

    #[derive(Debug, Serialize)]
    struct OutputJson {
        scale: TemperatureScale,
        image_stats: Vec<ImageStats>,
        cumulative: Summary,
    }

    serde_json::to_writer(
        std::io::stdout().lock(),
        &OutputJson {
            scale,
            image_stats: stats,
            cumulative: cumulative.into(),
        },
    )?;

    Ok(())
}

#[derive(Serialize, Debug)]
struct Summary {
    #[serde(flatten)]
    stats: Stats,
    mean: Option<f64>,
    std_dev: Option<f64>,
}

impl From<Stats> for Summary {
    fn from(stats: Stats) -> Self {
        Summary {
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            stats,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ImageStats {
    path: PathBuf,
    filename: String,
    camera: CameraInfo,
    calibration_range: u8,
    #[serde(flatten)]
    metadata: ImageMetadata,
    extrema: Option<Extrema>,
    mean: Option<f64>,
    std_dev: Option<f64>,
    pub(crate) stats: Stats,
}

impl ImageStats {
    pub fn from_input(input: ThermalInput, scale: TemperatureScale) -> Self {
        let ThermalInput { path, result } = input;
        let stats = result
            .temperatures
            .par_iter()
            .fold(Stats::default, |mut acc, val| {
                acc += scale.convert(*val);
                acc
            })
            .reduce(Stats::default, |mut acc, val| {
                acc += &val;
                acc
            });

        // conversions are monotonic, so locations carry over
        let in_scale = |loc: Location| Location {
            value: scale.convert(loc.value),
            ..loc
        };
        let extrema = Extrema::locate(&result.temperatures).map(|e| Extrema {
            min: in_scale(e.min),
            max: in_scale(e.max),
        });

        ImageStats {
            path,
            filename: result.filename,
            camera: result.camera,
            calibration_range: result.calibration_range,
            metadata: result.metadata,
            extrema,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            stats,
        }
    }
}
