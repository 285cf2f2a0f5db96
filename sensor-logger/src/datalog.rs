use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::LogRecord;

/// Append-only CSV datalog.
#[derive(Debug)]
pub struct Datalog {
    path: PathBuf,
    file: File,
}

impl Datalog {
    /// Open the datalog at `path`, creating it with a header row if absent.
    ///
    /// An existing file is continued as is; its header is never rewritten.
    pub fn open(path: impl AsRef<Path>, with_distance: bool) -> io::Result<Self> {
        let path = path.as_ref();
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                writeln!(file, "{}", LogRecord::header(with_distance))?;
                file.sync_data()?;
                log::info!("[LOG] {}> Created datalog", path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                println!("File already exists. New data will be appended.\n");
                log::warn!("[LOG] {}> Datalog exists, appending", path.display());
            }
            Err(e) => return Err(e),
        }
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row and push it to the storage device.
    pub fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        writeln!(self.file, "{record}")?;
        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }
}
