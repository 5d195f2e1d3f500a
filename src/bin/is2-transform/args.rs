use anyhow::Result;
use clap::value_t_or_exit;
use is2::{arg, args_parser, cli::temp_dir_arg, opt};
use std::path::PathBuf;

use crate::proc::OutputFormat;

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub min: f64,
    pub max: f64,
    pub format: OutputFormat,
    pub temp_dir: Option<String>,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("is2-transform")
            .setting(clap::AppSettings::AllowLeadingHyphen)
            .about("Map temperatures of IS2 containers to 16-bit grayscale images.")
            .arg(
                opt!("output")
                    .short("o")
                    .required(true)
                    .help("Output directory"),
            )
            .arg(
                opt!("min")
                    .required(true)
                    .help("Temperature (°C) mapped to black"),
            )
            .arg(
                opt!("max")
                    .required(true)
                    .help("Temperature (°C) mapped to white"),
            )
            .arg(
                opt!("format")
                    .short("f")
                    .possible_values(&["tiff", "png"])
                    .help("Output format.  Default is tiff"),
            )
            .arg(temp_dir_arg())
            .arg(
                arg!("paths")
                    .required(true)
                    .multiple(true)
                    .help("IS2 paths"),
            )
            .get_matches();

        let paths = matches
            .values_of("paths")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let output = value_t_or_exit!(matches, "output", PathBuf);
        let min = value_t_or_exit!(matches, "min", f64);
        let max = value_t_or_exit!(matches, "max", f64);
        let format = matches
            .is_present("format")
            .then(|| value_t_or_exit!(matches.value_of("format"), OutputFormat))
            .unwrap_or(OutputFormat::Tiff);
        let temp_dir = matches.value_of("temp dir").map(String::from);

        Ok(Args {
            paths,
            output,
            min,
            max,
            format,
            temp_dir,
        })
    }
}
