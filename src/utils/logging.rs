use chrono::Local;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

pub trait Logger: Send + Sync {
    fn log(&mut self, message: &str);
    fn debug_log(&mut self, message: &str);
}

#[derive(Debug)]
pub struct FileLogger {
    log_file: String,
    debug: bool,
}

impl FileLogger {
    pub fn new(log_file: &str, debug: bool) -> std::io::Result<Self> {
        // Create log directory if it doesn't exist
        if let Some(parent) = Path::new(log_file).parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(FileLogger {
            log_file: log_file.to_string(),
            debug,
        })
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(file, "{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.write_to_file(message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            if let Err(e) = self.write_to_file(&format!("[DEBUG] {}", message)) {
                eprintln!("Failed to write debug log: {}", e);
            }
        }
    }
}

/// Writes to stderr so stdout stays free for the generated bundle.
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    debug: bool,
}

impl ConsoleLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Logger for ConsoleLogger {
    fn log(&mut self, message: &str) {
        eprintln!("{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            eprintln!(
                "{}: [DEBUG] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            );
        }
    }
}

#[derive(Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&mut self, _message: &str) {}
    fn debug_log(&mut self, _message: &str) {}
}

// MultiLogger allows logging to multiple destinations
#[derive(Default)]
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, logger: Box<dyn Logger>) {
        self.loggers.push(logger);
    }
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.log(message);
        }
    }

    fn debug_log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.debug_log(message);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Collects messages in memory; clones share the same buffer.
    #[derive(Clone, Default)]
    pub(crate) struct MockLogger {
        pub logs: Arc<Mutex<Vec<String>>>,
    }

    impl MockLogger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.logs.lock().map(|l| l.clone()).unwrap_or_default()
        }
    }

    impl Logger for MockLogger {
        fn log(&mut self, message: &str) {
            if let Ok(mut logs) = self.logs.lock() {
                logs.push(message.to_string());
            }
        }

        fn debug_log(&mut self, message: &str) {
            if let Ok(mut logs) = self.logs.lock() {
                logs.push(format!("DEBUG: {}", message));
            }
        }
    }

    #[test]
    fn test_file_logger_creates_parent_and_appends() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let log_path = temp_dir.path().join("nested/dir/pki.log");
        let mut logger = FileLogger::new(log_path.to_str().unwrap(), false)?;

        logger.log("first");
        logger.log("second");
        logger.debug_log("hidden");

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first"));
        assert!(lines[1].ends_with(": second"));
        Ok(())
    }

    #[test]
    fn test_file_logger_writes_debug_when_enabled() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let log_path = temp_dir.path().join("pki.log");
        let mut logger = FileLogger::new(log_path.to_str().unwrap(), true)?;

        logger.debug_log("serial details");

        let content = fs::read_to_string(&log_path)?;
        assert!(content.contains("[DEBUG] serial details"));
        Ok(())
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = MockLogger::new();
        let second = MockLogger::new();
        let mut multi = MultiLogger::new();
        multi.add(Box::new(first.clone()));
        multi.add(Box::new(second.clone()));

        multi.log("issued ca");
        multi.debug_log("alt names");

        assert_eq!(first.lines(), vec!["issued ca", "DEBUG: alt names"]);
        assert_eq!(second.lines(), first.lines());
    }
}
