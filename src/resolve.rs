//! Prepare an instance file the solver can read directly.
use {
    crate::{
        error::DecompressError,
        instance::{BenchmarkInstance, Codec, Format},
    },
    flate2::read::GzDecoder,
    log::{debug, warn},
    std::{
        fs::{self, File, OpenOptions},
        io::{self, BufReader, BufWriter, Read, Write},
        path::{Path, PathBuf},
    },
    xz2::read::XzDecoder,
};

/// A decompressed copy of an instance, owned by exactly one run.
/// The file is removed when this value is dropped, whatever path the run took.
#[derive(Debug)]
pub struct Scratch {
    path: PathBuf,
}

impl Scratch {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed scratch {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (),
            Err(e) => warn!("failed to remove scratch {}: {}", self.path.display(), e),
        }
    }
}

/// A ready-to-feed instance path.
#[derive(Debug)]
pub enum Resolved<'a> {
    Raw(&'a Path),
    Compressed(Scratch),
}

impl Resolved<'_> {
    pub fn path(&self) -> &Path {
        match self {
            Resolved::Raw(p) => p,
            Resolved::Compressed(s) => s.path(),
        }
    }
}

/// Scratch file name for an instance: `<name>.cnf` under `scratch_dir`.
pub fn scratch_path(instance: &BenchmarkInstance, scratch_dir: &Path) -> PathBuf {
    scratch_dir.join(format!("{}.cnf", instance.name()))
}

pub fn resolve<'a>(
    instance: &'a BenchmarkInstance,
    scratch_dir: &Path,
) -> Result<Resolved<'a>, DecompressError> {
    let codec = match instance.format() {
        Format::Raw => return Ok(Resolved::Raw(instance.path())),
        Format::Compressed(codec) => codec,
    };
    let source = instance.path();
    let target = scratch_path(instance, scratch_dir);
    let input = BufReader::new(File::open(source).map_err(|e| DecompressError::Read {
        path: source.to_path_buf(),
        source: e,
    })?);
    fs::create_dir_all(scratch_dir).map_err(|e| DecompressError::Write {
        path: scratch_dir.to_path_buf(),
        source: e,
    })?;
    // never take over a file this run did not create
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(|e| DecompressError::Write {
            path: target.clone(),
            source: e,
        })?;
    // From here on the guard owns the file, so any failure below removes it.
    let scratch = Scratch { path: target };
    let mut decoder: Box<dyn Read> = match codec {
        Codec::Xz => Box::new(XzDecoder::new(input)),
        Codec::Gzip => Box::new(GzDecoder::new(input)),
    };
    let mut output = BufWriter::new(file);
    copy(&mut decoder, &mut output, source, scratch.path())?;
    output.flush().map_err(|e| DecompressError::Write {
        path: scratch.path().to_path_buf(),
        source: e,
    })?;
    debug!(
        "decompressed {} into {}",
        source.display(),
        scratch.path().display()
    );
    Ok(Resolved::Compressed(scratch))
}

/// `io::copy` that tells reading failures apart from writing ones.
fn copy<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    source: &Path,
    target: &Path,
) -> Result<u64, DecompressError> {
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(DecompressError::Read {
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| DecompressError::Write {
                path: target.to_path_buf(),
                source: e,
            })?;
        total += n as u64;
    }
}
