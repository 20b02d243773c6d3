//! Transparent decompression of run files.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Read};
use std::path::{Path, PathBuf};

/// Errors produced while opening or reading a run file.
#[derive(Debug, thiserror::Error)]
pub enum RunFileError {
    #[error("unsupported run file format {extension:?} for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to open run file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read run file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Compression scheme of a run file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// `.txt`, `.tsv`, `.trec`, `.run` or no extension.
    None,

    /// `.gz`
    Gzip,

    /// `.bz2`
    Bzip2,

    /// `.zst`, `.zstd`
    Zstd,
}

impl Compression {
    /// Map the final extension of `path` to a compression scheme.
    pub fn from_path(path: &Path) -> Result<Self, RunFileError> {
        let Some(ext) = path.extension() else {
            return Ok(Compression::None);
        };

        match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "gz" => Ok(Compression::Gzip),
            "bz2" => Ok(Compression::Bzip2),
            "zst" | "zstd" => Ok(Compression::Zstd),
            "txt" | "tsv" | "trec" | "run" => Ok(Compression::None),
            other => Err(RunFileError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "raw",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Zstd => "zstd",
        }
    }
}

/// Lazy line iterator over a decompressed run file.
pub type RunLines = Lines<BufReader<Box<dyn Read + Send>>>;

/// Opens run files regardless of how they were compressed.
pub struct RunFileReader;

impl RunFileReader {
    /// Open `path` and return its decompressed lines.
    ///
    /// Concatenated gzip and bzip2 streams are read to the end.
    pub fn open(path: &Path) -> Result<RunLines, RunFileError> {
        let compression = Compression::from_path(path)?;
        let file = File::open(path).map_err(|source| RunFileError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let reader: Box<dyn Read + Send> = match compression {
            Compression::None => Box::new(file),
            Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(file)),
            Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(file)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(file).map_err(
                |source| RunFileError::Open {
                    path: path.to_path_buf(),
                    source,
                },
            )?),
        };

        Ok(BufReader::new(reader).lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::write_run_file;

    #[test]
    fn test_compression_dispatch() {
        let cases = [
            ("dev.txt.bz2", Compression::Bzip2),
            ("dev.txt.gz", Compression::Gzip),
            ("dev.txt.zst", Compression::Zstd),
            ("dev.TXT.GZ", Compression::Gzip),
            ("dev.txt", Compression::None),
            ("dev.tsv", Compression::None),
            ("dev", Compression::None),
        ];
        for (name, expected) in cases {
            assert_eq!(
                Compression::from_path(Path::new(name)).unwrap(),
                expected,
                "{name}"
            );
        }
    }

    #[test]
    fn test_unsupported_extension_is_named() {
        let err = Compression::from_path(Path::new("dev.txt.xz")).unwrap_err();
        match err {
            RunFileError::UnsupportedFormat { extension, path } => {
                assert_eq!(extension, "xz");
                assert_eq!(path, PathBuf::from("dev.txt.xz"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reads_every_compression_identically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["run.txt", "run.txt.gz", "run.txt.bz2", "run.txt.zst"] {
            let path = dir.path().join(name);
            write_run_file(&path, 2, 3).unwrap();

            let lines: Vec<String> = RunFileReader::open(&path)
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(lines.len(), 6, "{name}");
            assert!(lines[0].starts_with("q0\t"), "{name}: {}", lines[0]);
            assert!(lines[5].starts_with("q1\t"), "{name}: {}", lines[5]);
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunFileReader::open(&dir.path().join("absent.txt.bz2"))
            .err()
            .expect("open should fail");
        assert!(matches!(err, RunFileError::Open { .. }));
        assert!(err.to_string().contains("absent.txt.bz2"));
    }
}
