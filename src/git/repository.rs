use crate::error::{GitError, GitResult};
use crate::git::executor::GitExecutor;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Repository metadata handed to the model as context
#[derive(Debug, Clone, PartialEq)]
pub struct RepoInfo {
    pub path: PathBuf,
    pub branch: String,
    pub remote: String,
}

/// A git working tree plus the version-control primitives the CLI needs
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    executor: GitExecutor,
}

impl Repository {
    /// Detect git repository starting from a specific directory
    pub fn discover_from<P: AsRef<Path>>(start_path: P) -> GitResult<Self> {
        let mut current = start_path.as_ref().to_path_buf();

        loop {
            // `.git` is a directory in a normal clone and a file in a worktree
            if current.join(".git").exists() {
                return Ok(Self::new(current));
            }

            if !current.pop() {
                return Err(GitError::NotARepository);
            }
        }
    }

    /// Create a Repository for a known git directory
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let executor = GitExecutor::new(&path);

        Self { path, executor }
    }

    /// Bound every git command run through this repository by `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.executor = self.executor.with_deadline(deadline);
        self
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path, current branch and origin URL
    pub async fn info(&self) -> GitResult<RepoInfo> {
        let branch = match self.executor.execute(&["rev-parse", "--abbrev-ref", "HEAD"]).await {
            Ok(output) => output.stdout.trim().to_string(),
            // Unborn branch in a fresh repository
            Err(GitError::CommandFailed(_)) => self.current_branch().await?.unwrap_or_default(),
            Err(e) => return Err(e),
        };

        Ok(RepoInfo {
            path: self.path.clone(),
            branch,
            remote: self.remote_url("origin").await?.unwrap_or_default(),
        })
    }

    /// Name of the checked-out branch, `None` on a detached HEAD
    pub async fn current_branch(&self) -> GitResult<Option<String>> {
        let output = self.executor.execute(&["branch", "--show-current"]).await?;
        let branch = output.stdout.trim();
        Ok((!branch.is_empty()).then(|| branch.to_string()))
    }

    pub async fn remote_url(&self, remote: &str) -> GitResult<Option<String>> {
        let key = format!("remote.{}.url", remote);
        let output = self.executor.execute_unchecked(&["config", "--get", &key]).await?;
        let url = output.stdout.trim();
        Ok((output.success && !url.is_empty()).then(|| url.to_string()))
    }

    /// `git status --porcelain` output; empty means nothing to commit
    pub async fn status_porcelain(&self) -> GitResult<String> {
        Ok(self.executor.execute(&["status", "--porcelain"]).await?.stdout)
    }

    pub async fn staged_diff(&self) -> GitResult<String> {
        Ok(self.executor.execute(&["diff", "--cached"]).await?.stdout)
    }

    pub async fn working_tree_diff(&self) -> GitResult<String> {
        Ok(self.executor.execute(&["diff"]).await?.stdout)
    }

    pub async fn last_commit_diff(&self) -> GitResult<String> {
        Ok(self.executor.execute(&["show", "HEAD"]).await?.stdout)
    }

    pub async fn last_commit_subject(&self) -> GitResult<String> {
        let output = self.executor.execute(&["log", "-1", "--format=%s"]).await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Stage all tracked and untracked changes
    pub async fn add_all(&self) -> GitResult<()> {
        self.executor.execute(&["add", "-A"]).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> GitResult<()> {
        self.executor.execute(&["commit", "-m", message]).await?;
        Ok(())
    }

    pub async fn create_and_checkout_branch(&self, name: &str) -> GitResult<()> {
        self.executor.execute(&["checkout", "-b", name]).await?;
        Ok(())
    }

    pub async fn checkout_branch(&self, name: &str) -> GitResult<()> {
        self.executor.execute(&["checkout", name]).await?;
        Ok(())
    }

    pub async fn pull_rebase(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.executor.execute(&["pull", "--rebase", remote, branch]).await?;
        Ok(())
    }

    /// Whether the current branch tracks a remote branch
    pub async fn has_upstream(&self) -> GitResult<bool> {
        let output = self
            .executor
            .execute_unchecked(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])
            .await?;
        Ok(output.success && !output.stdout.trim().is_empty())
    }

    /// Push the current branch, creating the upstream on origin when asked
    pub async fn push_current_branch(&self, set_upstream: bool) -> GitResult<()> {
        if set_upstream {
            self.executor.execute(&["push", "-u", "origin", "HEAD"]).await?;
        } else {
            self.executor.execute(&["push"]).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(repo_path: &Path, args: &[&str]) {
        Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .unwrap();
    }

    fn create_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        git(&repo_path, &["init"]);
        git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&repo_path, &["config", "user.name", "Test User"]);
        git(&repo_path, &["config", "user.email", "test@example.com"]);
        git(&repo_path, &["config", "commit.gpgsign", "false"]);

        (temp_dir, repo_path)
    }

    fn create_commit(repo_path: &Path, file: &str, message: &str) {
        fs::write(repo_path.join(file), "content\n").unwrap();
        git(repo_path, &["add", file]);
        git(repo_path, &["commit", "-m", message]);
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (_temp, repo_path) = create_test_repo();

        let sub_dir = repo_path.join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let repo = Repository::discover_from(&sub_dir).unwrap();
        assert_eq!(repo.path(), repo_path.as_path());
    }

    #[test]
    fn test_discover_not_a_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = Repository::discover_from(temp_dir.path());

        assert!(matches!(result.unwrap_err(), GitError::NotARepository));
    }

    #[tokio::test]
    async fn test_info_on_unborn_branch() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);

        let info = repo.info().await.unwrap();
        assert_eq!(info.branch, "main");
        assert_eq!(info.remote, "");
        assert_eq!(info.path, repo_path);
    }

    #[tokio::test]
    async fn test_info_with_remote() {
        let (_temp, repo_path) = create_test_repo();
        create_commit(&repo_path, "a.txt", "initial");
        git(&repo_path, &["remote", "add", "origin", "git@github.com:acme/app.git"]);

        let info = Repository::new(&repo_path).info().await.unwrap();
        assert_eq!(info.branch, "main");
        assert_eq!(info.remote, "git@github.com:acme/app.git");
    }

    #[tokio::test]
    async fn test_status_and_diffs() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);
        create_commit(&repo_path, "a.txt", "initial");

        assert!(repo.status_porcelain().await.unwrap().trim().is_empty());

        fs::write(repo_path.join("a.txt"), "changed\n").unwrap();
        assert!(repo.working_tree_diff().await.unwrap().contains("+changed"));
        assert!(repo.staged_diff().await.unwrap().is_empty());

        repo.add_all().await.unwrap();
        assert!(repo.staged_diff().await.unwrap().contains("+changed"));
        assert!(!repo.status_porcelain().await.unwrap().trim().is_empty());
    }

    #[tokio::test]
    async fn test_commit_and_subject() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);

        fs::write(repo_path.join("new.txt"), "hello\n").unwrap();
        repo.add_all().await.unwrap();
        repo.commit("feat: add greeting").await.unwrap();

        assert_eq!(repo.last_commit_subject().await.unwrap(), "feat: add greeting");
        assert!(repo.last_commit_diff().await.unwrap().contains("+hello"));
    }

    #[tokio::test]
    async fn test_commit_message_with_shell_characters() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);

        fs::write(repo_path.join("x.txt"), "x\n").unwrap();
        repo.add_all().await.unwrap();
        repo.commit("fix: handle `$HOME` expansion").await.unwrap();

        assert_eq!(
            repo.last_commit_subject().await.unwrap(),
            "fix: handle `$HOME` expansion"
        );
    }

    #[tokio::test]
    async fn test_create_and_checkout_branch() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);
        create_commit(&repo_path, "a.txt", "initial");

        repo.create_and_checkout_branch("feature/add-login").await.unwrap();
        assert_eq!(repo.current_branch().await.unwrap().as_deref(), Some("feature/add-login"));

        repo.checkout_branch("main").await.unwrap();
        assert_eq!(repo.current_branch().await.unwrap().as_deref(), Some("main"));

        // Creating it twice fails
        assert!(repo.create_and_checkout_branch("feature/add-login").await.is_err());
    }

    #[tokio::test]
    async fn test_has_upstream_false_without_remote() {
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);
        create_commit(&repo_path, "a.txt", "initial");

        assert!(!repo.has_upstream().await.unwrap());
    }

    #[tokio::test]
    async fn test_push_sets_upstream() {
        let (_remote_dir, remote_path) = {
            let dir = TempDir::new().unwrap();
            let path = dir.path().to_path_buf();
            git(&path, &["init", "--bare"]);
            (dir, path)
        };
        let (_temp, repo_path) = create_test_repo();
        let repo = Repository::new(&repo_path);
        create_commit(&repo_path, "a.txt", "initial");
        git(&repo_path, &["remote", "add", "origin", remote_path.to_str().unwrap()]);

        repo.push_current_branch(true).await.unwrap();
        assert!(repo.has_upstream().await.unwrap());

        create_commit(&repo_path, "b.txt", "second");
        repo.push_current_branch(false).await.unwrap();
    }

    #[tokio::test]
    async fn test_detached_head() {
        let (_temp, repo_path) = create_test_repo();
        create_commit(&repo_path, "a.txt", "initial");
        git(&repo_path, &["checkout", "--detach"]);

        let repo = Repository::new(&repo_path);
        assert_eq!(repo.current_branch().await.unwrap(), None);
        assert_eq!(repo.info().await.unwrap().branch, "HEAD");
    }
}
