//! Command execution against an [`App`].
//!
//! Each command plays one page of the browser front end: it goes through the
//! same controller calls, so guard redirects and forced logouts behave the
//! same way here. Output goes to the supplied writer; diagnostics go to
//! stderr through `tracing`.

use std::io::{self, Write};

use client::{App, ConfigError, Invoice, InvoiceUpdate, ViewError};
use serde_json::{Map, Value};
use session::{Access, KeyValueStore, Route};

use crate::{Command, InvoicesSubcommand, ProfileSubcommand};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    View(#[from] ViewError),
    #[error("expected key=value, got {0:?}")]
    InvalidPair(String),
    #[error("unknown path: {0}")]
    UnknownPath(String),
    #[error("no local data directory; pass --state-file")]
    NoStateDir,
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Run one command.
///
/// # Errors
///
/// Returns the view error, or the output write failure.
pub(crate) async fn execute<S: KeyValueStore>(
    app: &mut App<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Login(creds) => {
            app.login(&creds.email, &creds.password).await?;
            let session = app.session();
            writeln!(out, "Logged in as {}", session.email().unwrap_or(creds.email.trim()))?;
        }
        Command::Signup(creds) => {
            let next = app.signup(&creds.email, &creds.password).await?;
            if let Some(message) = &app.session().message {
                writeln!(out, "{message}")?;
            }
            writeln!(out, "Next: {next}")?;
        }
        Command::Logout => {
            app.logout();
            if let Some(message) = &app.session().message {
                writeln!(out, "{message}")?;
            }
        }
        Command::Whoami => whoami(app, out)?,
        Command::Status => writeln!(out, "{}", app.status())?,
        Command::Open { path } => {
            let route = Route::parse(&path).ok_or(CliError::UnknownPath(path))?;
            match app.open(route) {
                Access::Render(to) => writeln!(out, "render {to}")?,
                Access::Redirect(to) => writeln!(out, "redirect {to}")?,
            }
        }
        Command::Invoices(invoices) => run_invoices(app, invoices.command, out).await?,
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Set { pairs } => {
                let partial = parse_pairs(&pairs)?;
                let session = app.update_profile(partial);
                if let Some(user) = &session.user {
                    writeln!(out, "{}", user.to_json())?;
                }
            }
        },
    }
    Ok(())
}

fn whoami<S: KeyValueStore>(app: &App<S>, out: &mut impl Write) -> io::Result<()> {
    let session = app.session();
    match (&session.user, session.is_authenticated()) {
        (Some(user), true) => writeln!(out, "{}", user.email().unwrap_or("(no email)")),
        (_, true) => writeln!(out, "(authenticated, no stored user)"),
        (_, false) => writeln!(out, "Not logged in"),
    }
}

async fn run_invoices<S: KeyValueStore>(
    app: &mut App<S>,
    command: InvoicesSubcommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        InvoicesSubcommand::List => {
            let invoices = app.list_invoices().await?;
            if invoices.is_empty() {
                writeln!(out, "No invoices found.")?;
            }
            for invoice in &invoices {
                writeln!(out, "{}", invoice_row(invoice))?;
            }
        }
        InvoicesSubcommand::Show { id } => {
            let invoice = app.invoice(id).await?;
            write_invoice(out, &invoice)?;
        }
        InvoicesSubcommand::Create { amount, date } => {
            let invoice = app.create_invoice(amount, date.as_deref()).await?;
            writeln!(out, "Created invoice {}", invoice.id)?;
            write_invoice(out, &invoice)?;
        }
        InvoicesSubcommand::Edit { id, amount, date } => {
            let update = InvoiceUpdate { invoice_amount: amount, invoice_date: date };
            let invoice = app.update_invoice(id, &update).await?;
            write_invoice(out, &invoice)?;
        }
        InvoicesSubcommand::Delete { id } => {
            app.delete_invoice(id).await?;
            writeln!(out, "Deleted invoice {id}")?;
        }
    }
    Ok(())
}

// =============================================================================
// FORMATTING
// =============================================================================

fn invoice_row(invoice: &Invoice) -> String {
    format!(
        "{:>6}  {:<24}  {:>12.2}  {}",
        invoice.id, invoice.invoice_number, invoice.invoice_amount, invoice.invoice_date
    )
}

fn write_invoice(out: &mut impl Write, invoice: &Invoice) -> io::Result<()> {
    writeln!(out, "Invoice #{}", invoice.id)?;
    writeln!(out, "  Number: {}", invoice.invoice_number)?;
    writeln!(out, "  Amount: {:.2}", invoice.invoice_amount)?;
    writeln!(out, "  Date:   {}", invoice.invoice_date)
}

/// Parse `key=value` pairs. Values that are valid JSON keep their type,
/// anything else is stored as a string.
fn parse_pairs(pairs: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut partial = Map::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(CliError::InvalidPair(pair.clone()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidPair(pair.clone()));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        partial.insert(key.to_owned(), value);
    }
    Ok(partial)
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
