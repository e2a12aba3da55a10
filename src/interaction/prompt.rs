use super::InteractionError;
use std::io::{BufRead, Write};

/// Line-oriented question/answer over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line; `None` at end of input
    pub fn ask(&mut self, question: &str) -> Result<Option<String>, InteractionError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, text: &str) -> Result<(), InteractionError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Only `y`/`yes` count as agreement
    pub fn confirm_default_no(&mut self, question: &str) -> Result<bool, InteractionError> {
        let answer = self.ask(&format!("{} [y/N]: ", question))?;
        Ok(matches!(answer.as_deref().map(str::to_lowercase).as_deref(), Some("y" | "yes")))
    }

    /// Empty input agrees; end of input declines
    pub fn confirm_default_yes(&mut self, question: &str) -> Result<bool, InteractionError> {
        let answer = self.ask(&format!("{} [Y/n]: ", question))?;
        Ok(matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("" | "y" | "yes")
        ))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_and_echoes_question() {
        let mut p = prompter("  hello \n");
        assert_eq!(p.ask("Name? ").unwrap().as_deref(), Some("hello"));
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "Name? ");
    }

    #[test]
    fn test_ask_eof() {
        let mut p = prompter("");
        assert_eq!(p.ask("Name? ").unwrap(), None);
    }

    #[test]
    fn test_confirm_default_no() {
        assert!(prompter("y\n").confirm_default_no("Go?").unwrap());
        assert!(prompter("YES\n").confirm_default_no("Go?").unwrap());
        assert!(!prompter("\n").confirm_default_no("Go?").unwrap());
        assert!(!prompter("sure\n").confirm_default_no("Go?").unwrap());
        assert!(!prompter("").confirm_default_no("Go?").unwrap());
    }

    #[test]
    fn test_confirm_default_yes() {
        assert!(prompter("\n").confirm_default_yes("Go?").unwrap());
        assert!(prompter("Y\n").confirm_default_yes("Go?").unwrap());
        assert!(!prompter("n\n").confirm_default_yes("Go?").unwrap());
        assert!(!prompter("").confirm_default_yes("Go?").unwrap());
    }
}
