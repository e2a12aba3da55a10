use super::InteractionError;
use super::prompt::Prompter;
use super::render::Renderer;
use crate::llm::CommitAnalysis;
use crate::security::RiskLevel;
use std::io::{BufRead, Write};

/// Ask before committing a diff the model flagged as leaking sensitive data.
///
/// Low risk passes without a prompt. Medium and high need an explicit
/// `y`/`yes`; anything else, including end of input, declines.
pub fn privacy_gate<R: BufRead, W: Write>(
    analysis: &CommitAnalysis,
    prompter: &mut Prompter<R, W>,
    renderer: &Renderer,
) -> Result<bool, InteractionError> {
    if analysis.privacy_risk == RiskLevel::Low {
        return Ok(true);
    }

    prompter.say(&renderer.warning(&format!(
        "{} The diff may expose sensitive information:",
        renderer.risk_badge(analysis.privacy_risk)
    )))?;
    if analysis.privacy_reasons.is_empty() {
        prompter.say("  - no details given")?;
    }
    for reason in &analysis.privacy_reasons {
        prompter.say(&format!("  - {}", reason))?;
    }

    prompter.confirm_default_no("Commit anyway?")
}
