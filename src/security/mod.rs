pub mod classifier;
pub mod risk;

pub use classifier::{Escalation, RiskAssessment, SafetyClassifier};
pub use risk::RiskLevel;

/// Substrings that mark a command as destructive no matter what the model says.
///
/// Matching is done against the lower-cased command text. A hit always forces
/// `RiskLevel::High`, including when the model already reported `High`.
///
/// Adding a new pattern requires careful security review; removing one weakens
/// the confirmation gate for every user.
pub const DESTRUCTIVE_PATTERNS: &[&str] = &[
    // Recursive force delete of the filesystem root
    "rm -rf /",
    "rm -rf /*",
    "rm -fr /",
    "rm -rf --no-preserve-root",
    // Filesystem format
    "mkfs",
    // Raw disk writes
    "dd if=",
    "> /dev/sd",
    "> /dev/nvme",
    // Fork bomb
    ":(){:|:&};:",
    ":(){ :|:& };:",
    // Partition table rewrite
    "mklabel gpt",
    "mklabel msdos",
    "wipefs",
];

/// Command prefixes that mutate local state.
///
/// When the model labels one of these `Low`, the classifier bumps it to
/// `Medium` so the user at least sees an advisory before it runs.
pub const STATE_MUTATING_PREFIXES: &[&str] = &[
    // File operations
    "rm ",
    "mv ",
    "cp ",
    // Privilege elevation
    "sudo ",
    // Permission and ownership changes
    "chmod ",
    "chown ",
    // History rewriting / remote mutation
    "git reset",
    "git push",
    "git rebase",
    "git checkout",
    "git clean",
    "git filter-branch",
];
