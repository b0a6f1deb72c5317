//! Thin wrappers over `dialoguer` that map prompt failures (no TTY, ctrl-c)
//! into `anyhow` errors.

use anyhow::Context as _;
use dialoguer::{Confirm, Input, MultiSelect, Select};

pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}

pub fn select<T: ToString>(prompt: &str, items: &[T]) -> anyhow::Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .context("failed to read selection")
}

pub fn multi_select<T: ToString>(prompt: &str, items: &[T]) -> anyhow::Result<Vec<usize>> {
    MultiSelect::new()
        .with_prompt(prompt)
        .items(items)
        .interact()
        .context("failed to read selection")
}

pub fn input(prompt: &str) -> anyhow::Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .context("failed to read input")
}
