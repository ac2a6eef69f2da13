use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILE_CAP: u64 = 10 * 1024 * 1024;

pub fn init_logging(log_level: Level, log_file: Option<&str>) -> io::Result<()> {
    let level_filter = LevelFilter::from_level(log_level);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_filter(level_filter);

    match log_file {
        Some(path) => {
            let writer = CappedLogFile::open(path, DEFAULT_LOG_FILE_CAP)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(level_filter);
            tracing_subscriber::registry().with(stdout_layer).with(file_layer).init();
        }
        None => {
            tracing_subscriber::registry().with(stdout_layer).init();
        }
    }
    Ok(())
}

/// Log file that is moved aside to `<path>.1` once it reaches `max_len`
/// bytes, so at most two files of roughly `max_len` exist at a time.
#[derive(Clone)]
pub struct CappedLogFile {
    state: Arc<Mutex<CappedState>>,
}

struct CappedState {
    path: PathBuf,
    max_len: u64,
    file: File,
    written: u64,
}

impl CappedLogFile {
    pub fn open(path: impl AsRef<Path>, max_len: u64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            state: Arc::new(Mutex::new(CappedState { path, max_len, file, written })),
        })
    }
}

impl CappedState {
    fn rotated_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        std::fs::rename(&self.path, self.rotated_path())?;
        self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;

        if state.written > 0 && state.written + buf.len() as u64 > state.max_len {
            state.rotate()?;
        }
        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for CappedLogFile {
    type Writer = CappedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotates_when_cap_is_reached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");
        let mut writer = CappedLogFile::open(&path, 16).unwrap();

        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"abcdefghij\n").unwrap();
        writer.flush().unwrap();

        let current = std::fs::read_to_string(&path).unwrap();
        let rotated = std::fs::read_to_string(dir.path().join("relay.log.1")).unwrap();
        assert_eq!(rotated, "0123456789\n");
        assert_eq!(current, "abcdefghij\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut writer = CappedLogFile::open(&path, 1024).unwrap();
        writer.write_all(b"new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");
        assert!(!dir.path().join("relay.log.1").exists());
    }

    #[test]
    fn test_oversized_first_write_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");
        let mut writer = CappedLogFile::open(&path, 4).unwrap();
        writer.write_all(b"longer than the cap\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "longer than the cap\n");
    }
}
