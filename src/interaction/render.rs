use crate::llm::CommandSuggestion;
use crate::security::RiskLevel;
use crossterm::style::Stylize;

/// Formats suggestions and risk badges for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// `[LOW]`, `[MEDIUM]` or `[HIGH]`, colored when enabled
    pub fn risk_badge(&self, risk: RiskLevel) -> String {
        let badge = format!("[{}]", risk.label());
        if !self.color {
            return badge;
        }

        match risk {
            RiskLevel::Low => badge.green().to_string(),
            RiskLevel::Medium => badge.yellow().bold().to_string(),
            RiskLevel::High => badge.red().bold().to_string(),
        }
    }

    pub fn command(&self, command: &str) -> String {
        if self.color {
            command.cyan().bold().to_string()
        } else {
            command.to_string()
        }
    }

    /// Numbered menu entry: command, badge, and the description underneath
    pub fn menu_entry(&self, index: usize, suggestion: &CommandSuggestion) -> String {
        let mut entry = format!(
            "  {}) {}  {}",
            index,
            self.command(&suggestion.command),
            self.risk_badge(suggestion.risk)
        );
        if !suggestion.description.is_empty() {
            entry.push_str(&format!("\n     {}", suggestion.description));
        }
        entry
    }

    /// Menu entry plus reason and tags, used when browsing alternates
    pub fn detailed_entry(&self, index: usize, suggestion: &CommandSuggestion) -> String {
        let mut entry = self.menu_entry(index, suggestion);
        if !suggestion.reason.is_empty() {
            entry.push_str(&format!("\n     why: {}", suggestion.reason));
        }
        if !suggestion.tags.is_empty() {
            entry.push_str(&format!("\n     tags: {}", suggestion.tags.join(", ")));
        }
        entry
    }

    pub fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn danger(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> CommandSuggestion {
        CommandSuggestion {
            command: "du -sh *".to_string(),
            description: "Size of each entry".to_string(),
            risk: RiskLevel::Low,
            reason: "read-only".to_string(),
            tags: vec!["disk".to_string(), "usage".to_string()],
        }
    }

    #[test]
    fn test_plain_badges() {
        let renderer = Renderer::new(false);
        assert_eq!(renderer.risk_badge(RiskLevel::Low), "[LOW]");
        assert_eq!(renderer.risk_badge(RiskLevel::High), "[HIGH]");
    }

    #[test]
    fn test_colored_badge_contains_label() {
        let badge = Renderer::new(true).risk_badge(RiskLevel::Medium);
        assert!(badge.contains("[MEDIUM]"));
        assert!(badge.contains('\u{1b}'));
    }

    #[test]
    fn test_menu_entry() {
        let entry = Renderer::new(false).menu_entry(1, &suggestion());
        assert_eq!(entry, "  1) du -sh *  [LOW]\n     Size of each entry");
    }

    #[test]
    fn test_detailed_entry() {
        let entry = Renderer::new(false).detailed_entry(2, &suggestion());
        assert!(entry.contains("why: read-only"));
        assert!(entry.contains("tags: disk, usage"));
    }
}
