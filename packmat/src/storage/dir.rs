//! On-disk container: one file per stream plus a JSON manifest
//!
//! ```text
//! matrix/
//!   manifest.json
//!   val_data.bin  val_idx.bin  row_data.bin  row_starts.bin
//!   row_idx.bin   col_ptr.bin  row_count.bin
//! ```
//!
//! A write fills `<stream>.bin.tmp` staging files and renames them into place
//! only once the whole matrix is encoded. The old manifest is removed just
//! before the renames and the new one is written last. A failed or
//! interrupted write leaves the previous matrix untouched, and readers
//! already open keep the files they opened.

use crate::config::PackConfig;
use crate::labels::LabelSet;
use crate::packed::{PackedMatrix, PackedMatrixWriter, WriteSummary};
use crate::streams::{DiskReader, FileWriter};
use crate::transforms::{Rename, RenameDims};
use crate::{Error, Result};
use packmat_core::format::constants::{FORMAT_NAME, FORMAT_VERSION, MANIFEST_FILE, STREAM_FILE_EXTENSION};
use packmat_core::{
    InterruptCheck, MatrixLoader, MatrixShape, MatrixValue, MatrixWriter, PackError, PackedStreams, StreamKind,
    UIntReader,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Description of a stored matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format: String,
    pub version: u32,
    /// Element type of the value streams
    pub value_type: String,
    pub n_rows: u32,
    pub n_cols: u32,
    /// Stored entries
    pub nnz: u64,
    /// Blocks across all columns
    pub blocks: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub col_names: Vec<String>,
}

impl Manifest {
    fn new(summary: &WriteSummary, row_names: Option<LabelSet>, col_names: Option<LabelSet>) -> Self {
        Self {
            format: FORMAT_NAME.to_owned(),
            version: FORMAT_VERSION,
            value_type: <u32 as MatrixValue>::TYPE_NAME.to_owned(),
            n_rows: summary.shape.n_rows,
            n_cols: summary.shape.n_cols,
            nnz: summary.entries,
            blocks: summary.blocks,
            row_names: row_names.map(|l| l.to_vec()).unwrap_or_default(),
            col_names: col_names.map(|l| l.to_vec()).unwrap_or_default(),
        }
    }

    pub fn shape(&self) -> MatrixShape {
        MatrixShape::new(self.n_rows, self.n_cols)
    }

    fn check_format(&self) -> Result<()> {
        let value_type = <u32 as MatrixValue>::TYPE_NAME;
        if self.format != FORMAT_NAME || self.version > FORMAT_VERSION || self.value_type != value_type {
            return Err(Error::UnsupportedFormat {
                name: self.format.clone(),
                version: self.version,
            });
        }
        Ok(())
    }
}

/// Path of one stream file inside a matrix directory
pub fn stream_path(dir: &Path, kind: StreamKind) -> PathBuf {
    dir.join(kind.name()).with_extension(STREAM_FILE_EXTENSION)
}

/// Path a stream is written to before it replaces [`stream_path`]
fn staging_path(dir: &Path, kind: StreamKind) -> PathBuf {
    stream_path(dir, kind).with_extension(format!("{STREAM_FILE_EXTENSION}.tmp"))
}

/// Remove whatever staging files a failed write left behind
fn discard_staged(dir: &Path) {
    for kind in StreamKind::ALL {
        let path = staging_path(dir, kind);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove staging file"),
        }
    }
}

fn labels_for(names: &[String], len: u32) -> Result<Rename> {
    if names.is_empty() {
        return Ok(Rename::Clear);
    }
    let labels = LabelSet::new(names.to_vec())?;
    labels.check_len(len)?;
    Ok(Rename::Replace(labels))
}

/// Handle to a packed matrix directory
#[derive(Debug, Clone)]
pub struct PackedDir {
    path: PathBuf,
    manifest: Manifest,
    rows: Rename,
    cols: Rename,
    config: PackConfig,
}

impl PackedDir {
    /// Encode `loader` into `dir`, replacing any matrix already there
    ///
    /// Row and column names reported by the loader are stored in the manifest.
    pub fn write<P: AsRef<Path>>(
        dir: P,
        loader: &mut dyn MatrixLoader<u32>,
        config: &PackConfig,
        interrupt: &dyn InterruptCheck,
    ) -> Result<WriteSummary> {
        config.validate()?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let staged = Self::write_staged(dir, loader, config, interrupt);
        let (summary, manifest) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                discard_staged(dir);
                return Err(err);
            }
        };

        let manifest_path = dir.join(MANIFEST_FILE);
        match fs::remove_file(&manifest_path) {
            Ok(()) => debug!(path = %dir.display(), "replacing packed matrix"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        for kind in StreamKind::ALL {
            fs::rename(staging_path(dir, kind), stream_path(dir, kind))?;
        }

        let staging = manifest_path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(&manifest)?)?;
        fs::rename(&staging, &manifest_path)?;

        info!(path = %dir.display(), shape = %summary.shape, nnz = summary.entries, "wrote packed matrix directory");
        Ok(summary)
    }

    /// Encode into the staging files and build the manifest
    fn write_staged(
        dir: &Path,
        loader: &mut dyn MatrixLoader<u32>,
        config: &PackConfig,
        interrupt: &dyn InterruptCheck,
    ) -> Result<(WriteSummary, Manifest)> {
        let streams =
            PackedStreams::try_from_fn(|kind| FileWriter::create(staging_path(dir, kind), config.io_buffer_size))?;
        let mut writer = PackedMatrixWriter::with_config(streams, config)?;
        writer.write(loader, interrupt)?;
        let summary = *writer.summary().ok_or(PackError::WriterClosed)?;

        let source: &dyn MatrixLoader<u32> = &*loader;
        let row_names = LabelSet::collect(summary.shape.n_rows, |r| source.row_name(r))?;
        let col_names = LabelSet::collect(summary.shape.n_cols, |c| source.col_name(c))?;
        Ok((summary, Manifest::new(&summary, row_names, col_names)))
    }

    /// Open a matrix directory, checking its manifest against the stream files
    pub fn open<P: AsRef<Path>>(dir: P, config: &PackConfig) -> Result<Self> {
        config.validate()?;
        let path = dir.as_ref().to_path_buf();
        let text = fs::read_to_string(path.join(MANIFEST_FILE))?;
        let manifest: Manifest = serde_json::from_str(&text)?;
        manifest.check_format()?;

        let rows = labels_for(&manifest.row_names, manifest.n_rows)?;
        let cols = labels_for(&manifest.col_names, manifest.n_cols)?;
        let dir = Self {
            path,
            manifest,
            rows,
            cols,
            config: config.clone(),
        };

        // Surface layout problems at open rather than on first read
        dir.reader()?;
        debug!(path = %dir.path.display(), shape = %dir.manifest.shape(), "opened packed matrix directory");
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn shape(&self) -> MatrixShape {
        self.manifest.shape()
    }

    /// A fresh reader carrying the stored names
    pub fn reader(&self) -> Result<RenameDims<PackedMatrix<DiskReader>>> {
        let streams = PackedStreams::try_from_fn(|kind| DiskReader::open(stream_path(&self.path, kind), &self.config))?;
        if streams.row_count.len() != self.manifest.n_cols as usize {
            return Err(Error::ManifestMismatch(format!(
                "{} columns in manifest, {} in {}",
                self.manifest.n_cols,
                streams.row_count.len(),
                StreamKind::RowCount
            )));
        }
        if streams.row_starts.len() != self.manifest.blocks as usize {
            return Err(Error::ManifestMismatch(format!(
                "{} blocks in manifest, {} in {}",
                self.manifest.blocks,
                streams.row_starts.len(),
                StreamKind::RowStarts
            )));
        }
        let matrix = PackedMatrix::new(streams, self.manifest.n_rows)?;
        Ok(RenameDims::new(matrix, self.rows.clone(), self.cols.clone())?)
    }
}
