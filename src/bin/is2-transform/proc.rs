use super::Args;
use anyhow::{bail, ensure, Result};
use byteordered::ByteOrdered;
use image::tiff::TiffEncoder;
use is2::{cli::ThermalInput, ThermalResult};
use itertools::iproduct;
use std::{
    fs::File,
    io::{BufWriter, Cursor},
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Tiff,
    Png,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "tiff" => OutputFormat::Tiff,
            "png" => OutputFormat::Png,
            _ => bail!("unsupported output format: {}", s),
        })
    }
}

pub struct TransformArgs {
    pub coeffs: [f64; 2],
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl TransformArgs {
    pub fn from_args(args: &Args) -> Result<Self> {
        ensure!(
            args.max > args.min,
            "max ({}) must be greater than min ({})",
            args.max,
            args.min
        );
        let factor = u16::MAX as f64 / (args.max - args.min);
        let coeffs = [-args.min * factor, factor];

        Ok(TransformArgs {
            coeffs,
            output: args.output.clone(),
            format: args.format,
        })
    }

    pub fn transform(&self, val: f64) -> u16 {
        let tval = self.coeffs[0] + self.coeffs[1] * val;
        tval.max(0.).min(u16::MAX as f64) as u16
    }

    pub fn output_stem_for(&self, path: &Path) -> PathBuf {
        self.output
            .join(path.file_stem().unwrap_or_else(|| path.as_os_str()))
    }
}

/// Transformed values in row-major order, with the
/// temperature matrix rows as image rows.
fn image_to_u16_iterator<'a>(
    thermal: &'a ThermalResult,
    args: &'a TransformArgs,
) -> impl Iterator<Item = (usize, usize, u16)> + 'a {
    let (ht, wid) = thermal.temperatures.dim();
    iproduct!(0..ht, 0..wid).map(move |(row, col)| {
        let tval = args.transform(thermal.temperatures[(row, col)]);
        (row, col, tval)
    })
}

pub fn transform_image(input: &ThermalInput, args: &TransformArgs) -> Result<PathBuf> {
    match args.format {
        OutputFormat::Tiff => transform_image_tiff(input, args),
        OutputFormat::Png => transform_image_png(input, args),
    }
}

fn transform_image_tiff(input: &ThermalInput, args: &TransformArgs) -> Result<PathBuf> {
    let thermal = &input.result;
    let (ht, wid) = thermal.temperatures.dim();
    let mut image_buffer = {
        let vec = Vec::with_capacity(2 * ht * wid);
        let cursor = Cursor::new(vec);
        ByteOrdered::native(cursor)
    };
    for (_, _, val) in image_to_u16_iterator(thermal, args) {
        image_buffer.write_u16(val)?;
    }

    let output_path = args.output_stem_for(&input.path).with_extension("tif");
    let image_writer = BufWriter::new(File::create(&output_path)?);
    TiffEncoder::new(image_writer).encode(
        &image_buffer.into_inner().into_inner(),
        wid as u32,
        ht as u32,
        image::ColorType::L16,
    )?;

    Ok(output_path)
}

fn transform_image_png(input: &ThermalInput, args: &TransformArgs) -> Result<PathBuf> {
    let thermal = &input.result;

    let outpath = args.output_stem_for(&input.path).with_extension("png");
    let image_writer = BufWriter::new(File::create(&outpath)?);
    let mut png_writer = {
        let (ht, wid) = thermal.temperatures.dim();
        let mut encoder = png::Encoder::new(image_writer, wid as u32, ht as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Sixteen);
        encoder.write_header()?
    };
    let mut png_streamer = ByteOrdered::be(png_writer.stream_writer());

    for (_, _, val) in image_to_u16_iterator(thermal, args) {
        png_streamer.write_u16(val)?;
    }
    png_streamer.into_inner().finish()?;

    Ok(outpath)
}
