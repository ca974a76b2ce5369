//! Level set archive I/O
//!
//! An archive is a zip file with two entries:
//! - `levelset.meta`: `key=value` lines (`res`, `offset`, `friction`)
//! - `phi.f32`: little-endian samples, x fastest

use crate::{Error, LevelSet, Result};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;

const META_ENTRY: &str = "levelset.meta";
const DATA_ENTRY: &str = "phi.f32";

impl LevelSet {
    /// Save the level set to a zip archive
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mpmkit::LevelSet;
    /// use nalgebra::Vector3;
    ///
    /// let mut ls = LevelSet::new(Vector3::new(32, 32, 32), Vector3::repeat(0.5))?;
    /// ls.add_sphere(Vector3::new(16.0, 16.0, 16.0), 8.0, false);
    /// ls.save_archive("sphere.lsz")?;
    /// # Ok::<(), mpmkit::Error>(())
    /// ```
    pub fn save_archive<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|e| {
            Error::FileSave(format!(
                "Unable to create file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        self.write_archive(file)
    }

    /// Write the archive to any seekable writer
    pub fn write_archive<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let zip_err = |e: zip::result::ZipError| Error::FileSave(format!("Zip error: {}", e));

        let mut zip = zip::ZipWriter::new(writer);
        let options = FileOptions::default();

        zip.start_file(META_ENTRY, options).map_err(zip_err)?;
        let res = self.resolution();
        let offset = self.offset();
        writeln!(zip, "res={} {} {}", res.x, res.y, res.z)?;
        writeln!(zip, "offset={} {} {}", offset.x, offset.y, offset.z)?;
        writeln!(zip, "friction={}", self.friction())?;

        zip.start_file(DATA_ENTRY, options).map_err(zip_err)?;
        let mut bytes = Vec::with_capacity(self.values().len() * 4);
        for value in self.values() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        zip.write_all(&bytes)?;

        zip.finish().map_err(zip_err)?;
        Ok(())
    }

    /// Load a level set from a zip archive written by [`LevelSet::save_archive`]
    pub fn load_archive<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::FileLoad(format!(
                "Unable to open file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::read_archive(file)
    }

    /// Read an archive from any seekable reader
    pub fn read_archive<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::FileLoad(format!("Failed to read zip: {}", e)))?;

        let mut meta = String::new();
        {
            let mut file = archive.by_name(META_ENTRY).map_err(|_| {
                Error::FileLoad(format!("{} not found in archive", META_ENTRY))
            })?;
            file.read_to_string(&mut meta)
                .map_err(|e| Error::FileLoad(format!("Failed to read metadata: {}", e)))?;
        }

        let mut bytes = Vec::new();
        {
            let mut file = archive.by_name(DATA_ENTRY).map_err(|_| {
                Error::FileLoad(format!("{} not found in archive", DATA_ENTRY))
            })?;
            file.read_to_end(&mut bytes)
                .map_err(|e| Error::FileLoad(format!("Failed to read samples: {}", e)))?;
        }

        let header = ArchiveHeader::parse(&meta)?;
        if bytes.len() % 4 != 0 {
            return Err(Error::FileLoad(format!(
                "{} has {} bytes, not a whole number of samples",
                DATA_ENTRY,
                bytes.len()
            )));
        }
        let values = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        LevelSet::from_parts(header.res, header.offset, values, header.friction)
            .map_err(|e| Error::FileLoad(e.to_string()))
    }
}

struct ArchiveHeader {
    res: Vector3<usize>,
    offset: Vector3<f32>,
    friction: f32,
}

impl ArchiveHeader {
    fn parse(text: &str) -> Result<Self> {
        let mut res = None;
        let mut offset = None;
        let mut friction = LevelSet::DEFAULT_FRICTION;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| Error::FileLoad(format!("Malformed metadata line '{}'", line)))?;
            match key.trim() {
                "res" => {
                    let [x, y, z] = parse_triple::<usize>(value)?;
                    if x == 0 || y == 0 || z == 0 {
                        return Err(Error::FileLoad(format!("Invalid resolution '{}'", value)));
                    }
                    res = Some(Vector3::new(x, y, z));
                }
                "offset" => {
                    let [x, y, z] = parse_triple::<f32>(value)?;
                    offset = Some(Vector3::new(x, y, z));
                }
                "friction" => {
                    friction = value.trim().parse().map_err(|_| {
                        Error::FileLoad(format!("Invalid friction '{}'", value))
                    })?;
                }
                // Unknown keys are ignored
                _ => {}
            }
        }

        Ok(Self {
            res: res.ok_or_else(|| Error::FileLoad("Metadata is missing 'res'".to_string()))?,
            offset: offset
                .ok_or_else(|| Error::FileLoad("Metadata is missing 'offset'".to_string()))?,
            friction,
        })
    }
}

fn parse_triple<T: std::str::FromStr>(value: &str) -> Result<[T; 3]> {
    let parts: Vec<T> = value
        .split_whitespace()
        .map(|p| p.parse::<T>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::FileLoad(format!("Invalid vector '{}'", value)))?;
    <[T; 3]>::try_from(parts)
        .map_err(|_| Error::FileLoad(format!("Expected three components in '{}'", value)))
}
