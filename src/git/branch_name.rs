use std::fmt;

/// Longest slug produced after the `category/` prefix
pub const MAX_SLUG_LEN: usize = 40;

const FALLBACK_SLUG: &str = "changes";

/// Branch name prefix, drawn from a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCategory {
    Feature,
    Fix,
    Hotfix,
    Refactor,
    Perf,
    Style,
    Test,
    Docs,
    Build,
    Ops,
    Chore,
    Revert,
}

impl BranchCategory {
    pub const ALL: [BranchCategory; 12] = [
        BranchCategory::Feature,
        BranchCategory::Fix,
        BranchCategory::Hotfix,
        BranchCategory::Refactor,
        BranchCategory::Perf,
        BranchCategory::Style,
        BranchCategory::Test,
        BranchCategory::Docs,
        BranchCategory::Build,
        BranchCategory::Ops,
        BranchCategory::Chore,
        BranchCategory::Revert,
    ];

    /// Map a conventional-commit type token; unknown tokens become `Feature`
    pub fn from_commit_type(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "fix" => BranchCategory::Fix,
            "refactor" => BranchCategory::Refactor,
            "perf" => BranchCategory::Perf,
            "style" => BranchCategory::Style,
            "test" => BranchCategory::Test,
            "docs" => BranchCategory::Docs,
            "build" => BranchCategory::Build,
            "ops" => BranchCategory::Ops,
            "chore" => BranchCategory::Chore,
            "revert" => BranchCategory::Revert,
            _ => BranchCategory::Feature,
        }
    }

    /// Exact match on the serialized category name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchCategory::Feature => "feature",
            BranchCategory::Fix => "fix",
            BranchCategory::Hotfix => "hotfix",
            BranchCategory::Refactor => "refactor",
            BranchCategory::Perf => "perf",
            BranchCategory::Style => "style",
            BranchCategory::Test => "test",
            BranchCategory::Docs => "docs",
            BranchCategory::Build => "build",
            BranchCategory::Ops => "ops",
            BranchCategory::Chore => "chore",
            BranchCategory::Revert => "revert",
        }
    }
}

impl fmt::Display for BranchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `category/slug` branch name.
///
/// The slug is lowercase ASCII alphanumerics separated by single dashes, at
/// most [`MAX_SLUG_LEN`] characters, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName {
    category: BranchCategory,
    slug: String,
}

impl BranchName {
    pub fn new(category: BranchCategory, slug_source: &str) -> Self {
        Self {
            category,
            slug: slugify(slug_source),
        }
    }

    /// Accept an existing `category/slug` only if it is already canonical
    pub fn parse(name: &str) -> Option<Self> {
        let (category, slug) = name.trim().split_once('/')?;
        let category = BranchCategory::parse(category)?;

        if slug.is_empty() || slugify(slug) != slug {
            return None;
        }

        Some(Self {
            category,
            slug: slug.to_string(),
        })
    }

    pub fn category(&self) -> BranchCategory {
        self.category
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.slug)
    }
}

/// Derive a branch name from a conventional-commit header.
///
/// `feat(auth): add login flow` becomes `feature/add-login-flow`. Only the
/// first line of a multi-line message is considered.
pub fn derive_branch_name(header: &str) -> BranchName {
    let header = header.lines().next().unwrap_or_default().trim();
    if header.is_empty() {
        return BranchName::new(BranchCategory::Feature, FALLBACK_SLUG);
    }

    let Some((prefix, description)) = header.split_once(':') else {
        return BranchName::new(BranchCategory::Feature, header);
    };

    let prefix = prefix.trim().trim_end_matches('!');
    let type_token = prefix.split('(').next().unwrap_or_default();

    BranchName::new(BranchCategory::from_commit_type(type_token), description)
}

/// Lowercase, collapse every non-alphanumeric run to one dash, cap the length
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    // Output is ASCII, so byte truncation is safe
    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Whether `branch` is one of the configured protected branches, ignoring case
pub fn is_protected_branch(branch: &str, protected: &[String]) -> bool {
    let branch = branch.trim();
    protected.iter().any(|name| name.trim().eq_ignore_ascii_case(branch))
}
