use crate::security::RiskLevel;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only history of executed commands and rejected model replies
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger with the default log path
    pub fn new() -> std::io::Result<Self> {
        Self::with_path(Self::default_log_path()?)
    }

    /// Create an AuditLogger with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Get the default log path: ~/.config/smartgit/history.log
    fn default_log_path() -> std::io::Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("smartgit")
            .join("history.log"))
    }

    /// Log a command execution; `exit_code` is `None` for a signal
    pub fn log_command(
        &self,
        command: &str,
        cwd: &Path,
        exit_code: Option<i32>,
        risk: RiskLevel,
    ) -> std::io::Result<()> {
        let exit = exit_code.map_or_else(|| "signal".to_string(), |code| code.to_string());
        self.append(&format!(
            "[{}] [{}] [{}] [exit:{}] [risk:{}] {}",
            Utc::now().to_rfc3339(),
            Self::user(),
            cwd.display(),
            exit,
            risk,
            command
        ))
    }

    /// Log a model reply that could not be turned into a usable payload
    pub fn log_rejected_reply(
        &self,
        request: &str,
        reply: &str,
        reason: &str,
        cwd: &Path,
    ) -> std::io::Result<()> {
        self.append(&format!(
            "[{}] [{}] [{}] [REPLY-REJECTED] request={:?} reply={:?} reason={:?}",
            Utc::now().to_rfc3339(),
            Self::user(),
            cwd.display(),
            request,
            reply,
            reason
        ))
    }

    fn user() -> String {
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        // Check and rotate log if needed
        self.rotate_if_needed()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", entry)?;
        file.flush()
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // Rotate: history.log -> history.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AuditLogger) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::with_path(temp_dir.path().join("logs").join("history.log")).unwrap();
        (temp_dir, logger)
    }

    #[test]
    fn test_creates_parent_directory() {
        let (temp_dir, logger) = logger();
        assert!(temp_dir.path().join("logs").is_dir());
        assert_eq!(logger.log_path(), temp_dir.path().join("logs").join("history.log"));
    }

    #[test]
    fn test_log_command() {
        let (_temp, logger) = logger();

        logger
            .log_command("git status", Path::new("/test/repo"), Some(0), RiskLevel::Low)
            .unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("git status"));
        assert!(content.contains("/test/repo"));
        assert!(content.contains("exit:0"));
        assert!(content.contains("risk:low"));
    }

    #[test]
    fn test_multiple_log_entries() {
        let (_temp, logger) = logger();
        let cwd = Path::new("/test/repo");

        logger.log_command("ls", cwd, Some(0), RiskLevel::Low).unwrap();
        logger.log_command("rm notes.txt", cwd, Some(1), RiskLevel::Medium).unwrap();
        logger.log_command("sleep 100", cwd, None, RiskLevel::Low).unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("exit:1") && lines[1].contains("risk:medium"));
        assert!(lines[2].contains("exit:signal"));
    }

    #[test]
    fn test_log_rotation() {
        let (_temp, logger) = logger();
        let cwd = Path::new("/test/repo");

        // Write a large entry to trigger rotation
        let large_command = "echo ".to_string() + &"x".repeat(MAX_LOG_SIZE as usize);
        logger.log_command(&large_command, cwd, Some(0), RiskLevel::Low).unwrap();

        // Write another entry - should trigger rotation
        logger.log_command("git status", cwd, Some(0), RiskLevel::Low).unwrap();

        let backup_path = logger.log_path().with_extension("log.1");
        assert!(backup_path.exists());

        let metadata = fs::metadata(logger.log_path()).unwrap();
        assert!(metadata.len() < MAX_LOG_SIZE);
    }

    #[test]
    fn test_log_rejected_reply() {
        let (_temp, logger) = logger();

        logger
            .log_rejected_reply(
                "free disk space",
                "Sorry, I can't help with \"that\"",
                "no structured payload found",
                Path::new("/home/me"),
            )
            .unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("REPLY-REJECTED"));
        assert!(content.contains("request=\"free disk space\""));
        assert!(content.contains("can't help with \\\"that\\\""));
        assert!(content.contains("no structured payload found"));
        assert_eq!(content.lines().count(), 1);
    }
}
