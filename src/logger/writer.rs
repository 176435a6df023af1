//! Log file writer

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;

/// Shared file writer for the file layer.
///
/// After the first failed write it switches to stderr for the rest of the
/// process so log lines are not silently lost.
#[derive(Clone)]
pub struct LogFileWriter {
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    file: BufWriter<File>,
    fallback_mode: bool,
}

impl LogFileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file: open_log_file(&config.path, config.append)?,
                fallback_mode: false,
            })),
        })
    }

    /// Whether writes currently go to stderr
    pub fn is_in_fallback_mode(&self) -> bool {
        lock(&self.state).fallback_mode
    }
}

fn lock(state: &Mutex<WriterState>) -> MutexGuard<'_, WriterState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard {
            state: self.state.clone(),
        }
    }
}

/// Per-event writer handed out to the formatting layer
pub struct LogFileGuard {
    state: Arc<Mutex<WriterState>>,
}

impl Write for LogFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);

        if state.fallback_mode {
            return io::stderr().write(buf);
        }

        match state.file.write(buf) {
            Ok(written) => Ok(written),
            Err(error) => {
                state.fallback_mode = true;
                eprintln!("[Logger] File write failed, falling back to stderr: {error}");
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = lock(&self.state);
        if state.fallback_mode {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for LogFileGuard {
    fn drop(&mut self) {
        // one event per guard, push it out
        let _ = lock(&self.state).file.flush();
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::LogFormat;
    use tempfile::TempDir;

    fn file_config(path: std::path::PathBuf, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Json,
        }
    }

    #[test]
    fn test_creates_parent_directories_and_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/logs/app.log");
        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();

        {
            let mut guard = writer.make_writer();
            guard.write_all(b"hello\n").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!writer.is_in_fallback_mode());
    }

    #[test]
    fn test_append_and_truncate_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.make_writer().write_all(b"new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");

        let writer = LogFileWriter::new(&file_config(path.clone(), false)).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
