//! Infrastructure implementation of the `OperatorPrompt` port.
//!
//! Interactive prompts go through `dialoguer` and block until the operator
//! answers; there is no timeout. In non-interactive runs (`--yes`, CI) ask
//! prompts take their declared defaults and the address-correction prompt
//! gives up immediately — an unattended run has nobody to ask.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password, Select};
use serde_yaml::Value;

use crate::application::ports::OperatorPrompt;
use crate::domain::ask::{self, AskEntry};
use crate::domain::profile::ProfileDocument;
use crate::output::OutputContext;

/// Production `OperatorPrompt` over the terminal.
pub struct DialoguerPrompt<'a> {
    ctx: &'a OutputContext,
    non_interactive: bool,
}

impl<'a> DialoguerPrompt<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext, non_interactive: bool) -> Self {
        Self {
            ctx,
            non_interactive,
        }
    }

    fn answer(&self, entry: &AskEntry) -> Result<Option<Value>> {
        if self.non_interactive {
            // Entries without a default are skipped rather than guessed.
            return Ok(entry.default.clone());
        }
        let answer = match entry.kind.as_str() {
            "boolean" => {
                let default = matches!(entry.default, Some(Value::Bool(true)));
                Value::Bool(
                    Confirm::new()
                        .with_prompt(&entry.question)
                        .default(default)
                        .interact()
                        .context("boolean prompt")?,
                )
            }
            "password" => Value::String(
                Password::new()
                    .with_prompt(&entry.question)
                    .interact()
                    .context("password prompt")?,
            ),
            "selection" if !entry.selection.is_empty() => {
                let labels: Vec<String> = entry
                    .selection
                    .iter()
                    .map(|item| {
                        if item.label.is_empty() {
                            scalar_text(&item.value)
                        } else {
                            item.label.clone()
                        }
                    })
                    .collect();
                let preselected = entry
                    .default
                    .as_ref()
                    .and_then(|default| {
                        entry.selection.iter().position(|item| item.value == *default)
                    })
                    .unwrap_or(0);
                let index = Select::new()
                    .with_prompt(&entry.question)
                    .items(&labels)
                    .default(preselected)
                    .interact()
                    .context("selection prompt")?;
                entry.selection[index].value.clone()
            }
            _ => {
                let initial = entry.default.as_ref().map(scalar_text).unwrap_or_default();
                let text: String = Input::new()
                    .with_prompt(&entry.question)
                    .with_initial_text(initial)
                    .allow_empty(true)
                    .interact_text()
                    .context("text prompt")?;
                Value::String(text)
            }
        };
        Ok(Some(answer))
    }
}

/// Scalar rendered the way an operator would type it.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl OperatorPrompt for DialoguerPrompt<'_> {
    fn correct_source(&self, current: &str, error: &str) -> Result<String> {
        self.ctx.error(&format!("could not retrieve the profile: {error}"));
        if self.non_interactive {
            return Ok(String::new());
        }
        Input::new()
            .with_prompt("Profile address (empty input aborts)")
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .context("address correction prompt")
    }

    fn confirm_abort(&self) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt("Abort the automatic installation?")
            .default(true)
            .interact()
            .context("abort confirmation prompt")
    }

    fn show_error(&self, message: &str) {
        for line in message.lines() {
            self.ctx.error(line);
        }
    }

    fn ask(&self, doc: &ProfileDocument) -> Result<Option<ProfileDocument>> {
        let entries = ask::ask_list(doc);
        if entries.is_empty() {
            return Ok(None);
        }
        let mut updated = doc.clone();
        let mut changed = false;
        for entry in &entries {
            let Some(answer) = self.answer(entry)? else {
                continue;
            };
            if ask::substitute(&mut updated, &entry.path, answer) {
                changed = true;
            }
        }
        Ok(changed.then_some(updated))
    }
}
