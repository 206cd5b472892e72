//! User input utilities for interactive command-line prompts.
//!
//! Credential fields not given as flags or environment variables are asked
//! for on the terminal. The client secret is read without echo.

use anyhow::{Context, Result};
use console::Term;
use recshell_core::Credentials;

use crate::error::CliError;

/// Prompts the user for a string input.
///
/// The input is returned with whitespace trimmed.
pub fn prompt_string(prompt: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt}: "))
        .context("Failed to write prompt")?;
    let input = term.read_line().context("Failed to read user input")?;
    Ok(input.trim().to_string())
}

/// Prompts the user for a secret; typed characters are not echoed.
///
/// The input is returned as typed.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt}: "))
        .context("Failed to write prompt")?;
    let input = term
        .read_secure_line()
        .context("Failed to read user input")?;
    Ok(input)
}

/// Fill in missing credential fields and validate the result.
///
/// `ask(label, secret)` is called once for every field that is `None` or
/// blank.
pub fn collect_credentials_with<F>(
    account_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    mut ask: F,
) -> Result<Credentials>
where
    F: FnMut(&str, bool) -> Result<String>,
{
    let mut field = |given: Option<String>, label: &str, secret: bool| -> Result<String> {
        match given.filter(|v| !v.trim().is_empty()) {
            Some(value) => Ok(value),
            None => ask(label, secret),
        }
    };

    let creds = Credentials::new(
        field(account_id, "Account ID", false)?,
        field(client_id, "Client ID", false)?,
        field(client_secret, "Client secret", true)?,
    );
    creds
        .validate()
        .map_err(|e| CliError::Arguments(e.to_string()))?;
    Ok(creds)
}

/// Fill in missing credential fields from the terminal.
pub fn collect_credentials(
    account_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<Credentials> {
    collect_credentials_with(account_id, client_id, client_secret, |label, secret| {
        if secret {
            prompt_secret(label)
        } else {
            prompt_string(label)
        }
    })
}
