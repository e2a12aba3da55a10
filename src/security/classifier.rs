use crate::security::risk::RiskLevel;
use crate::security::{DESTRUCTIVE_PATTERNS, STATE_MUTATING_PREFIXES};

/// Why the classifier raised a risk above what the model reported
#[derive(Debug, Clone, PartialEq)]
pub enum Escalation {
    DestructivePattern(&'static str),
    StateMutatingPrefix(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub risk: RiskLevel,
    pub escalation: Option<Escalation>,
}

/// Deterministic risk overlay applied on top of the model's own judgment.
///
/// The model is an untrusted source of risk labels, so the confirmation gate
/// never depends on it alone. The overlay can only raise a risk level.
pub struct SafetyClassifier {
    destructive_patterns: Vec<&'static str>,
    mutating_prefixes: Vec<&'static str>,
}

impl SafetyClassifier {
    pub fn new() -> Self {
        Self {
            destructive_patterns: DESTRUCTIVE_PATTERNS.to_vec(),
            mutating_prefixes: STATE_MUTATING_PREFIXES.to_vec(),
        }
    }

    /// Return the effective risk for `command` given the model-reported risk
    pub fn classify(&self, command: &str, reported: Option<RiskLevel>) -> RiskLevel {
        self.assess(command, reported).risk
    }

    /// Like `classify`, but also reports which rule fired
    pub fn assess(&self, command: &str, reported: Option<RiskLevel>) -> RiskAssessment {
        let cmd_lower = command.to_lowercase();

        // Destructive patterns win over everything, including a reported High
        if let Some(pattern) = self.find_destructive_pattern(&cmd_lower) {
            return RiskAssessment {
                risk: RiskLevel::High,
                escalation: (reported != Some(RiskLevel::High))
                    .then_some(Escalation::DestructivePattern(pattern)),
            };
        }

        if reported == Some(RiskLevel::Low)
            && let Some(prefix) = self.find_mutating_prefix(&cmd_lower)
        {
            return RiskAssessment {
                risk: RiskLevel::Medium,
                escalation: Some(Escalation::StateMutatingPrefix(prefix)),
            };
        }

        RiskAssessment {
            risk: reported.unwrap_or(RiskLevel::Low),
            escalation: None,
        }
    }

    fn find_destructive_pattern(&self, cmd_lower: &str) -> Option<&'static str> {
        self.destructive_patterns
            .iter()
            .copied()
            .find(|pattern| cmd_lower.contains(pattern))
    }

    fn find_mutating_prefix(&self, cmd_lower: &str) -> Option<&'static str> {
        let trimmed = cmd_lower.trim_start();
        self.mutating_prefixes
            .iter()
            .copied()
            .find(|prefix| trimmed.starts_with(prefix))
    }
}

impl Default for SafetyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_command_passes_through() {
        let classifier = SafetyClassifier::new();
        assert_eq!(classifier.classify("git status", Some(RiskLevel::Low)), RiskLevel::Low);
        assert_eq!(classifier.classify("ls -la", Some(RiskLevel::Medium)), RiskLevel::Medium);
    }

    #[test]
    fn test_root_delete_forced_high() {
        let classifier = SafetyClassifier::new();
        for reported in [None, Some(RiskLevel::Low), Some(RiskLevel::Medium)] {
            assert_eq!(classifier.classify("rm -rf /", reported), RiskLevel::High);
        }
    }

    #[test]
    fn test_destructive_pattern_idempotent_on_high() {
        let classifier = SafetyClassifier::new();
        let assessment = classifier.assess("sudo rm -rf /", Some(RiskLevel::High));
        assert_eq!(assessment.risk, RiskLevel::High);
        assert!(assessment.escalation.is_none());
    }

    #[test]
    fn test_destructive_pattern_is_case_insensitive() {
        let classifier = SafetyClassifier::new();
        assert_eq!(classifier.classify("MKFS.ext4 /dev/sdb1", Some(RiskLevel::Low)), RiskLevel::High);
        assert_eq!(
            classifier.classify("DD IF=/dev/zero of=/dev/sda", Some(RiskLevel::Low)),
            RiskLevel::High
        );
    }

    #[test]
    fn test_fork_bomb_detection() {
        let classifier = SafetyClassifier::new();
        let assessment = classifier.assess(":(){:|:&};:", Some(RiskLevel::Low));
        assert_eq!(assessment.risk, RiskLevel::High);
        assert_eq!(assessment.escalation, Some(Escalation::DestructivePattern(":(){:|:&};:")));
    }

    #[test]
    fn test_partition_rewrite_detection() {
        let classifier = SafetyClassifier::new();
        assert_eq!(
            classifier.classify("parted /dev/sda mklabel gpt", Some(RiskLevel::Medium)),
            RiskLevel::High
        );
    }

    #[test]
    fn test_destructive_pattern_anywhere_in_command() {
        let classifier = SafetyClassifier::new();
        assert_eq!(
            classifier.classify("echo hi && dd if=/dev/zero of=disk.img", None),
            RiskLevel::High
        );
    }

    #[test]
    fn test_low_mutating_prefix_bumped_to_medium() {
        let classifier = SafetyClassifier::new();
        let commands = [
            "rm build.log",
            "mv a.txt b.txt",
            "cp -r src dst",
            "sudo apt update",
            "chmod +x run.sh",
            "chown me file",
            "git reset HEAD~1",
            "git push origin main",
            "git rebase main",
            "git checkout -- file.txt",
        ];

        for cmd in commands {
            assert_eq!(
                classifier.classify(cmd, Some(RiskLevel::Low)),
                RiskLevel::Medium,
                "Command should be bumped to medium: {}",
                cmd
            );
        }
    }

    #[test]
    fn test_mutating_prefix_reports_escalation() {
        let classifier = SafetyClassifier::new();
        let assessment = classifier.assess("sudo reboot", Some(RiskLevel::Low));
        assert_eq!(assessment.escalation, Some(Escalation::StateMutatingPrefix("sudo ")));
    }

    #[test]
    fn test_mutating_prefix_only_bumps_low() {
        let classifier = SafetyClassifier::new();
        // Medium stays medium, high stays high
        assert_eq!(classifier.classify("rm notes.txt", Some(RiskLevel::Medium)), RiskLevel::Medium);
        assert_eq!(classifier.classify("git push --force", Some(RiskLevel::High)), RiskLevel::High);
    }

    #[test]
    fn test_mutating_prefix_must_be_a_prefix() {
        let classifier = SafetyClassifier::new();
        assert_eq!(classifier.classify("echo rm stuff", Some(RiskLevel::Low)), RiskLevel::Low);
        assert_eq!(classifier.classify("git status", Some(RiskLevel::Low)), RiskLevel::Low);
    }

    #[test]
    fn test_unset_risk_defaults_to_low() {
        let classifier = SafetyClassifier::new();
        assert_eq!(classifier.classify("df -h", None), RiskLevel::Low);
    }

    #[test]
    fn test_unset_risk_with_mutating_prefix_stays_low() {
        // Only an explicit Low is escalated by the prefix rule
        let classifier = SafetyClassifier::new();
        assert_eq!(classifier.classify("rm notes.txt", None), RiskLevel::Low);
    }

    #[test]
    fn test_never_downgrades() {
        let classifier = SafetyClassifier::new();
        let commands = ["ls", "rm -rf /", "git push", "mkfs.ext4 /dev/sdb", "cat README.md"];
        let levels = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

        for cmd in commands {
            for level in levels {
                assert!(
                    classifier.classify(cmd, Some(level)) >= level,
                    "{} was downgraded from {}",
                    cmd,
                    level
                );
            }
        }
    }
}
