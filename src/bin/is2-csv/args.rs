use anyhow::Result;
use clap::value_t_or_exit;
use is2::{arg, args_parser, cli::temp_dir_arg, opt, units::TemperatureScale};
use std::path::PathBuf;

pub struct Args {
    pub path: PathBuf,
    pub scale: TemperatureScale,
    pub temp_dir: Option<String>,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("is2-csv")
            .about("Print pixel temperatures of an IS2 container as CSV.")
            .arg(
                opt!("scale")
                    .short("s")
                    .help("Temperature scale: C, K, F or N.  Default is C"),
            )
            .arg(temp_dir_arg())
            .arg(arg!("path").required(true).help("IS2 path"))
            .get_matches();

        let path = value_t_or_exit!(matches, "path", PathBuf);
        let scale = matches
            .is_present("scale")
            .then(|| value_t_or_exit!(matches.value_of("scale"), TemperatureScale))
            .unwrap_or_default();
        let temp_dir = matches.value_of("temp dir").map(String::from);

        Ok(Args {
            path,
            scale,
            temp_dir,
        })
    }
}
