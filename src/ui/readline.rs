//! Readline wrapper with a live currency mask.

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, ExternalPrinter, Helper};

use crate::utils::format_masked_input;

/// Shows the formatted amount as a hint while digits are typed
#[derive(Default)]
pub struct AmountHelper {
    masking: bool,
}

impl Helper for AmountHelper {}
impl Validator for AmountHelper {}
impl Highlighter for AmountHelper {}

impl Completer for AmountHelper {
    type Candidate = String;
}

impl Hinter for AmountHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        // Only hint with the cursor at the end, otherwise the hint splits the line
        if !self.masking || pos < line.len() {
            return None;
        }
        let masked = format_masked_input(line);
        if masked.is_empty() {
            None
        } else {
            Some(format!("  → R$ {}", masked))
        }
    }
}

/// Thin wrapper over `rustyline::Editor`. Nothing is written to a history
/// file: simulations are not persisted.
pub struct Readline {
    editor: Editor<AmountHelper, DefaultHistory>,
}

impl Readline {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(AmountHelper::default()));
        Ok(Self { editor })
    }

    fn set_masking(&mut self, masking: bool) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masking;
        }
    }

    /// Printer that writes above the prompt while a line is being read
    pub fn external_printer(
        &mut self,
    ) -> rustyline::Result<impl ExternalPrinter + Send + 'static> {
        self.editor.create_external_printer()
    }

    /// Read the prize amount, with the live mask hint
    pub fn read_amount(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.set_masking(true);
        self.editor.readline(prompt)
    }

    /// Read a plain command (results screen)
    pub fn read_command(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.set_masking(false);
        self.editor.readline(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint_for(rl: &mut Readline, line: &str, masking: bool) -> Option<String> {
        rl.set_masking(masking);
        let helper = rl.editor.helper()?;
        helper.hint(line, line.len(), &Context::new(rl.editor.history()))
    }

    #[test]
    fn test_hint_shows_masked_amount() {
        let mut rl = Readline::new().unwrap();
        assert_eq!(
            hint_for(&mut rl, "100000000", true),
            Some("  → R$ 1.000.000,00".to_string())
        );
        assert_eq!(hint_for(&mut rl, "5", true), Some("  → R$ 0,05".to_string()));
    }

    #[test]
    fn test_no_hint_without_digits_or_masking() {
        let mut rl = Readline::new().unwrap();
        assert_eq!(hint_for(&mut rl, "", true), None);
        assert_eq!(hint_for(&mut rl, "abc", true), None);
        assert_eq!(hint_for(&mut rl, "100000000", false), None);
    }
}
