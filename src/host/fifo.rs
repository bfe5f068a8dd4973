//! The named FIFO that feeds the decode engine.
//!
//! One FIFO per keyboard instance, at `<runtime dir>/buffer_<pid>` by
//! default so concurrent instances never collide. The read end is opened
//! non-blocking: an empty pipe (or one with no writer yet) reads as zero
//! bytes, which the engine treats as "no new key this cycle".

use std::ffi::CString;
use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::engine::ByteSource;

pub const DEFAULT_RUNTIME_DIR: &str = "/tmp/pipekey";

pub struct Fifo {
    file: fs::File,
    path: PathBuf,
}

impl Fifo {
    /// Create and open the default per-process FIFO.
    pub fn create_default() -> io::Result<Fifo> {
        Self::create_in(Path::new(DEFAULT_RUNTIME_DIR))
    }

    /// Create and open `<dir>/buffer_<pid>`, creating `dir` if needed.
    pub fn create_in(dir: &Path) -> io::Result<Fifo> {
        fs::create_dir_all(dir)?;
        Self::create_at(&dir.join(format!("buffer_{}", std::process::id())))
    }

    /// Create a FIFO at `path` and open it for non-blocking reads. A
    /// leftover FIFO from a previous run at the same path is reused.
    pub fn create_at(path: &Path) -> io::Result<Fifo> {
        let cpath = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        if unsafe { libc::mkfifo(cpath.as_ptr(), 0o666) } != 0 {
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::AlreadyExists {
                return Err(err);
            }
            debug!("reusing existing FIFO at {:?}", path);
        }

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        info!("Input FIFO ready at {:?}", path);
        Ok(Fifo {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for Fifo {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.read(buf) {
            // 0 also covers "no writer connected yet"
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }
}

impl Drop for Fifo {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("failed to remove FIFO {:?}: {e}", self.path);
        }
    }
}
