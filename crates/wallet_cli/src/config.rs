//! Command-line surface and runtime settings.
//!
//! Every global flag falls back to a `WALLET_*` environment variable.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use wallet_core::{default_log_level, QueryValue, RecordDraft, DEFAULT_DATA_FILE};

#[derive(Parser, Debug)]
#[command(name = "wallet")]
#[command(about = "Financial Wallet CLI", version)]
pub struct Cli {
    /// Ledger JSON file (also read from `WALLET_DATA_FILE`).
    #[arg(long, global = true, env = "WALLET_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Directory for rolling log files; logging stays off when unset.
    #[arg(long, global = true, env = "WALLET_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "WALLET_LOG_LEVEL", default_value = default_log_level())]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new record
    Add {
        /// Transaction amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Category
        category: String,
        /// Transaction date
        date: String,
        /// Transaction description
        description: String,
    },
    /// Update an existing record
    Update {
        /// Record index
        #[arg(allow_negative_numbers = true)]
        index: i64,
        /// Updated amount
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        /// Updated category
        #[arg(long)]
        category: Option<String>,
        /// Updated date
        #[arg(long)]
        date: Option<String>,
        /// Updated description
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a record
    Remove {
        /// Record index
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Get balance, income, and expenses
    #[command(name = "get_balance")]
    GetBalance,
    /// Get all records
    Get,
    /// Get records by key
    #[command(name = "get_by_key")]
    GetByKey {
        /// Search key
        #[arg(value_parser = ["amount", "category", "date"])]
        by: String,
        /// Search value
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
}

impl Command {
    /// Builds the partial update carried by `update`; `None` for other commands.
    pub fn draft(&self) -> Option<RecordDraft> {
        let Self::Update {
            amount,
            category,
            date,
            description,
            ..
        } = self
        else {
            return None;
        };
        Some(RecordDraft {
            amount: *amount,
            category: category.clone(),
            date: date.clone(),
            description: description.clone(),
        })
    }
}

/// `amount` searches take a number; text that does not parse stays text and
/// is rejected by the service with the list of search keys.
pub fn query_value(by: &str, raw: &str) -> QueryValue {
    if by == "amount" {
        if let Ok(amount) = raw.trim().parse::<f64>() {
            return QueryValue::Number(amount);
        }
    }
    QueryValue::Text(raw.to_string())
}

pub fn render_query_value(value: &QueryValue) -> String {
    match value {
        QueryValue::Number(amount) => format!("{amount:?}"),
        QueryValue::Text(text) => text.clone(),
    }
}

/// Makes `path` absolute against the current directory.
pub fn absolute_dir(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::{absolute_dir, query_value, render_query_value, Cli, Command};
    use clap::Parser;
    use std::path::Path;
    use wallet_core::QueryValue;

    #[test]
    fn amount_queries_parse_as_numbers() {
        assert_eq!(query_value("amount", "12.5"), QueryValue::Number(12.5));
        assert_eq!(query_value("amount", "5"), QueryValue::Number(5.0));
        assert_eq!(
            query_value("amount", "twelve"),
            QueryValue::Text("twelve".to_string())
        );
        assert_eq!(
            query_value("date", "2024-1-1"),
            QueryValue::Text("2024-1-1".to_string())
        );
    }

    #[test]
    fn rendered_numbers_keep_a_fraction() {
        assert_eq!(render_query_value(&QueryValue::Number(5.0)), "5.0");
        assert_eq!(render_query_value(&QueryValue::from("income")), "income");
    }

    #[test]
    fn relative_dirs_are_anchored_to_cwd() {
        let resolved = absolute_dir(Path::new("logs")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
    }

    #[test]
    fn update_collects_only_given_flags() {
        let cli = Cli::try_parse_from(["wallet", "update", "2", "--amount", "0", "--description", ""])
            .unwrap();
        let draft = cli.command.draft().unwrap();

        assert_eq!(draft.amount, Some(0.0));
        assert_eq!(draft.description.as_deref(), Some(""));
        assert!(draft.category.is_none());
        assert!(draft.date.is_none());
        assert!(matches!(cli.command, Command::Update { index: 2, .. }));
    }

    #[test]
    fn underscore_subcommands_and_key_choices() {
        let cli = Cli::try_parse_from(["wallet", "get_by_key", "category", "income"]).unwrap();
        assert!(matches!(cli.command, Command::GetByKey { ref by, .. } if by == "category"));
        assert!(cli.command.draft().is_none());

        assert!(Cli::try_parse_from(["wallet", "get_balance"]).is_ok());
        assert!(Cli::try_parse_from(["wallet", "get_by_key", "description", "x"]).is_err());
    }
}
