#![allow(dead_code)]

use async_trait::async_trait;
use smartgit::interaction::Prompter;
use smartgit::llm::{Assistant, GenerateRequest, LLMClient, LLMError};
use smartgit::shell::{ExitReport, ShellError, ShellRunner};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn git(repo_path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Helper to create a test git repository on branch `main`
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init"]);
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);
    git(&repo_path, &["config", "commit.gpgsign", "false"]);

    (temp_dir, repo_path)
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-m", message]);
}

/// Bare repository registered as `origin` of `repo_path`
pub fn add_bare_origin(repo_path: &Path) -> TempDir {
    let remote_dir = TempDir::new().unwrap();
    git(remote_dir.path(), &["init", "--bare"]);
    git(repo_path, &["remote", "add", "origin", remote_dir.path().to_str().unwrap()]);
    remote_dir
}

pub fn run_git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Scripted input, captured output
pub fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn output_of(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(prompter.into_output()).unwrap()
}

/// Returns a canned reply and remembers every request
#[derive(Clone)]
pub struct MockLLMClient {
    reply: Result<String, u16>,
    pub requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockLLMClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every call with an API error carrying `status`
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn assistant(&self) -> Assistant {
        Assistant::new(Box::new(self.clone()))
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LLMError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(LLMError::Api {
                status: *status,
                body: "mock failure".to_string(),
            }),
        }
    }
}

/// Records commands instead of running them
#[derive(Default)]
pub struct RecordingShell {
    pub commands: Vec<String>,
    pub exit_code: i32,
}

impl ShellRunner for RecordingShell {
    fn run(&mut self, command: &str) -> Result<ExitReport, ShellError> {
        self.commands.push(command.to_string());
        Ok(ExitReport {
            code: Some(self.exit_code),
            success: self.exit_code == 0,
        })
    }
}
