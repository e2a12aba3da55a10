use crate::error::{GitError, GitResult};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Result of executing a git command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

/// Executes git commands within a repository.
///
/// Arguments are passed as a vector straight to the `git` binary; nothing is
/// interpreted by a shell. When a deadline is set, a command still running at
/// the deadline is killed and reported as `GitError::Timeout`.
#[derive(Debug, Clone)]
pub struct GitExecutor {
    repo_path: PathBuf,
    deadline: Option<Instant>,
}

impl GitExecutor {
    /// Create a new GitExecutor for the given repository path
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Execute a git command, failing on a non-zero exit
    ///
    /// Example: `executor.execute(&["status", "--porcelain"])`
    pub async fn execute(&self, args: &[&str]) -> GitResult<CommandOutput> {
        let output = self.execute_unchecked(args).await?;

        if !output.success {
            return Err(GitError::CommandFailed(format!(
                "Command 'git {}' failed with exit code {}: {}",
                args.join(" "),
                output.exit_code,
                output.stderr.trim()
            )));
        }

        Ok(output)
    }

    /// Execute a git command and return its output whatever the exit status
    pub async fn execute_unchecked(&self, args: &[&str]) -> GitResult<CommandOutput> {
        if args.is_empty() {
            return Err(GitError::CommandFailed("Empty command".to_string()));
        }

        debug!(args = ?args, path = %self.repo_path.display(), "running git");

        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.repo_path)
            .kill_on_drop(true);

        let output = match self.deadline {
            Some(deadline) => {
                tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), command.output())
                    .await
                    .map_err(|_| GitError::Timeout(format!("git {}", args.join(" "))))?
            }
            None => command.output().await,
        }
        .map_err(|e| GitError::CommandFailed(format!("Failed to execute git: {}", e)))?;

        Ok(Self::process_output(output))
    }

    fn process_output(output: Output) -> CommandOutput {
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
        }
    }

    /// Get the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        StdCommand::new("git")
            .args(["init"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        (temp_dir, repo_path)
    }

    #[tokio::test]
    async fn test_execute_status() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let output = executor.execute(&["status", "--porcelain"]).await.unwrap();
        assert!(output.success);
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_execute_log_empty_repo_fails() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let result = executor.execute(&["log", "--oneline"]).await;
        assert!(matches!(result, Err(GitError::CommandFailed(_))));
    }

    #[tokio::test]
    async fn test_execute_unchecked_reports_failure() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let output = executor.execute_unchecked(&["log", "--oneline"]).await.unwrap();
        assert!(!output.success);
        assert_ne!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        // A literal "$(whoami)" is just an unknown pathspec to git
        let output = executor
            .execute_unchecked(&["status", "--porcelain", "--", "$(whoami)"])
            .await
            .unwrap();
        assert!(output.success);
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_empty_command() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        assert!(executor.execute(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path).with_deadline(Instant::now() - Duration::from_millis(1));

        let result = executor.execute(&["status"]).await;
        assert!(matches!(result, Err(GitError::Timeout(_))));
    }

    #[test]
    fn test_repo_path() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        assert_eq!(executor.repo_path(), repo_path.as_path());
    }
}
