pub mod branch_name;
pub mod executor;
pub mod repository;

// Re-export commonly used types
pub use branch_name::{BranchCategory, BranchName, derive_branch_name, is_protected_branch, slugify};
pub use executor::{CommandOutput, GitExecutor};
pub use repository::{RepoInfo, Repository};
