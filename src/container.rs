//! Decode IS2 containers.
//!
//! An IS2 file is a zip archive. The container is extracted
//! into a private temporary directory, the members are parsed
//! from there, and the directory is removed again before
//! [`ThermalResult::try_from_is2_path`] returns, whether
//! decoding succeeded or not.
use std::{
    cmp::Reverse,
    env,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageFormat, ImageResult};
use ndarray::Array2;
use tempfile::TempDir;
use tracing::{debug, warn};
use zip::{result::ZipError, ZipArchive};

use crate::{
    calibration::CalibrationTable,
    error::{Error, Result},
    metadata::{extract_calibration_range, CameraInfo, ImageMetadata},
    raw::RawImage,
    schema::{
        CALIBRATION_MEMBER, CAMERA_INFO_MEMBER, IMAGE_DIR, IMAGE_INFO_MEMBER, IR_DATA_MEMBER,
        THUMBNAIL_DIR,
    },
    temperature::ThermalSettings,
};

/// Options for [`ThermalResult::try_from_is2_path_with`].
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Where to create the extraction directory. Defaults to
    /// the system temporary directory.
    pub temp_root: Option<PathBuf>,
}

/// Everything decoded from one IS2 container.
#[derive(Debug, Clone)]
pub struct ThermalResult {
    /// File name of the container.
    pub filename: String,
    /// Calibration range selected on the camera.
    pub calibration_range: u8,
    pub camera: CameraInfo,
    pub metadata: ImageMetadata,
    pub calibration: CalibrationTable,
    /// Temperatures in celsius, in `(width, height)` shape.
    pub temperatures: Array2<f64>,
    /// Visible-light photo (JPEG).
    pub photo: Vec<u8>,
    /// Thumbnail (JPEG).
    pub thumbnail: Vec<u8>,
}

impl ThermalResult {
    pub fn try_from_is2_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_from_is2_path_with(path, &DecodeOptions::default())
    }

    pub fn try_from_is2_path_with<P: AsRef<Path>>(path: P, opts: &DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let dir = unpack(path, opts)?;
        let result = assemble(path, dir.path());

        let dir_path = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            warn!(
                dir = %dir_path.display(),
                error = %e,
                "could not remove extraction directory"
            );
        }
        result
    }

    pub fn decode_photo(&self) -> ImageResult<DynamicImage> {
        image::load_from_memory_with_format(&self.photo, ImageFormat::Jpeg)
    }

    pub fn decode_thumbnail(&self) -> ImageResult<DynamicImage> {
        image::load_from_memory_with_format(&self.thumbnail, ImageFormat::Jpeg)
    }
}

/// Decode the IS2 container at `path`.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<ThermalResult> {
    ThermalResult::try_from_is2_path(path)
}

/// Extract the archive into a fresh temporary directory. The
/// directory is removed when the returned guard is dropped.
fn unpack(path: &Path, opts: &DecodeOptions) -> Result<TempDir> {
    let archive_err = |source| Error::Archive {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| archive_err(ZipError::Io(e)))?;
    let mut archive = ZipArchive::new(file).map_err(archive_err)?;

    let root = opts.temp_root.clone().unwrap_or_else(env::temp_dir);
    let dir = tempfile::Builder::new()
        .prefix("is2-")
        .tempdir_in(&root)
        .map_err(|source| Error::Io { path: root, source })?;

    archive.extract(dir.path()).map_err(archive_err)?;
    debug!(
        archive = %path.display(),
        dir = %dir.path().display(),
        members = archive.len(),
        "extracted container"
    );
    Ok(dir)
}

fn assemble(path: &Path, dir: &Path) -> Result<ThermalResult> {
    let camera = CameraInfo::extract(&read_member(dir, CAMERA_INFO_MEMBER)?)?;

    let calibration_data = read_member(dir, CALIBRATION_MEMBER)?;
    let calibration_range = extract_calibration_range(&calibration_data)?;
    let calibration = CalibrationTable::scan(&calibration_data)?;
    debug!(codes = calibration.len(), "built calibration table");

    let settings = ThermalSettings::extract(&read_member(dir, IMAGE_INFO_MEMBER)?)?;

    let raw = RawImage::parse(&read_member(dir, IR_DATA_MEMBER)?)?;
    let temperatures = raw.temperatures(&calibration, &settings)?;
    let metadata = ImageMetadata {
        settings,
        width: raw.width(),
        height: raw.height(),
    };

    let thumbnail = read_thumbnail(dir)?;
    let photo = read_photo(dir)?;

    Ok(ThermalResult {
        filename: path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default(),
        calibration_range,
        camera,
        metadata,
        calibration,
        temperatures,
        photo,
        thumbnail,
    })
}

fn read_member(dir: &Path, member: &str) -> Result<Vec<u8>> {
    let path = dir.join(member);
    match fs::read(&path) {
        Ok(bytes) => {
            debug!(member, len = bytes.len(), "read member");
            Ok(bytes)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::MissingMember {
            member: member.into(),
        }),
        Err(source) => Err(Error::Io { path, source }),
    }
}

/// Cameras write `.jpg`; other casings are accepted as well.
fn is_jpeg(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("jpg"))
}

/// JPEG files directly under `sub_dir` with their sizes,
/// sorted by path.
fn jpeg_members(dir: &Path, sub_dir: &str) -> Result<Vec<(PathBuf, u64)>> {
    let root = dir.join(sub_dir);
    let io_err = |source| Error::Io {
        path: root.clone(),
        source,
    };
    let entries = match fs::read_dir(&root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(io_err(e)),
    };

    let mut jpegs = vec![];
    for entry in entries {
        let entry = entry.map_err(io_err)?;
        let meta = entry.metadata().map_err(io_err)?;
        if meta.is_file() && is_jpeg(&entry.path()) {
            jpegs.push((entry.path(), meta.len()));
        }
    }
    jpegs.sort();
    Ok(jpegs)
}

fn read_jpeg(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The camera stores a cropped copy next to the photo, so the
/// largest JPEG is the full photo. Ties go to the first name.
fn read_photo(dir: &Path) -> Result<Vec<u8>> {
    let jpegs = jpeg_members(dir, IMAGE_DIR)?;
    let (path, _) = jpegs
        .iter()
        .min_by_key(|(_, len)| Reverse(*len))
        .ok_or_else(|| Error::MissingMember {
            member: format!("{}/*.jpg", IMAGE_DIR),
        })?;
    read_jpeg(path)
}

fn read_thumbnail(dir: &Path) -> Result<Vec<u8>> {
    let jpegs = jpeg_members(dir, THUMBNAIL_DIR)?;
    let (path, _) = jpegs.first().ok_or_else(|| Error::MissingMember {
        member: format!("{}/*.jpg", THUMBNAIL_DIR),
    })?;
    read_jpeg(path)
}
