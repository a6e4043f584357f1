//! Interactive terminal prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use purgemail_core::{Category, Confirm};
use tracing::warn;

/// Line-oriented prompts over any reader and writer.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Prompts on `output` and reads answers from `input`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `line` followed by a newline.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Shows the category menu and reads a choice.
    pub fn choose_category(&mut self) -> Result<Category> {
        self.say("Categories:")?;
        for (index, category) in Category::ALL.iter().enumerate() {
            self.say(&format!("{} - {}", index + 1, category.label()))?;
        }

        let answer = self
            .ask("Enter category number to purge: ")
            .context("Unable to read category")?;

        match answer.parse().ok().and_then(Category::from_menu_number) {
            Some(category) => Ok(category),
            None => bail!("Invalid category number: {answer:?}"),
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Only an exact `Y` counts as yes; anything else, including a read
    /// failure, is a no.
    fn agree(&mut self, question: &str) -> bool {
        match self.ask(question) {
            Ok(answer) => answer == "Y",
            Err(e) => {
                warn!("Unable to read answer: {e}");
                false
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirm for Terminal<R, W> {
    fn confirm_purge(&mut self, category: Category) -> bool {
        self.agree(&format!(
            "Are you sure you want to purge all messages in {category}? (Y/n): "
        ))
    }

    fn confirm_delete(&mut self, _category: Category, count: usize) -> bool {
        self.agree(&format!(
            "Are you sure you want to delete {count} messages? (Y/n): "
        ))
    }
}
