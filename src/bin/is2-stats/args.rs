use anyhow::Result;
use clap::value_t_or_exit;
use is2::{arg, args_parser, cli::temp_dir_arg, opt, units::TemperatureScale};
use std::path::PathBuf;

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub scale: TemperatureScale,
    pub temp_dir: Option<String>,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("is2-stats")
            .about("Compute temperature stats from IS2 containers.")
            .arg(
                opt!("scale")
                    .short("s")
                    .help("Temperature scale: C, K, F or N.  Default is C"),
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
        let scale = matches
            .is_present("scale")
            .then(|| value_t_or_exit!(matches.value_of("scale"), TemperatureScale))
            .unwrap_or_default();
        let temp_dir = matches.value_of("temp dir").map(String::from);

        Ok(Args {
            paths,
            scale,
            temp_dir,
        })
    }
}
