use std::{error::Error, path::PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, ExpenseId, PeriodKey, UserId, metrics};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "spendlog_admin")]
#[command(about = "Admin utilities for Spendlog (users, expenses, receipts, summaries)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./spendlog.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Expense(Expense),
    Receipt(Receipt),
    /// Print the totals of one month against the month before.
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Password (also read from `SPENDLOG_PASSWORD`).
    #[arg(long, env = "SPENDLOG_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[command(flatten)]
    owner: Owner,
    /// Amount in cents.
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    note: Option<String>,
    /// RFC 3339 timestamp, defaults to now.
    #[arg(long)]
    occurred_at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct Receipt {
    #[command(subcommand)]
    command: ReceiptCommand,
}

#[derive(Subcommand, Debug)]
enum ReceiptCommand {
    /// Write the receipt of an expense to a file.
    Export(ReceiptExportArgs),
}

#[derive(Args, Debug)]
struct ReceiptExportArgs {
    #[command(flatten)]
    owner: Owner,
    #[arg(long)]
    expense_id: ExpenseId,
    /// Output path, defaults to the stored filename.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    owner: Owner,
    /// Calendar month, `YYYY-MM`.
    #[arg(long)]
    period: PeriodKey,
}

/// Whose data a command reads or writes: `--user-id` or `--username`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Owner {
    #[arg(long)]
    user_id: Option<UserId>,
    #[arg(long)]
    username: Option<String>,
}

impl Owner {
    async fn resolve(&self, engine: &Engine) -> Result<UserId, EngineError> {
        match (self.user_id, self.username.as_deref()) {
            (Some(user_id), _) => Ok(user_id),
            (None, Some(username)) => engine.user_id(username).await,
            (None, None) => Err(EngineError::InvalidIdentifier(
                "--user-id or --username is required".to_string(),
            )),
        }
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let user_id = engine.create_user(&args.username, &args.password).await?;
            println!("created user: {} ({user_id})", args.username);
        }
        Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) => {
            let user_id = args.owner.resolve(&engine).await?;
            let expense_id = engine
                .record_expense(
                    user_id,
                    args.amount,
                    args.category.as_deref(),
                    args.note.as_deref(),
                    args.occurred_at.unwrap_or_else(Utc::now),
                )
                .await?;
            println!("recorded expense: {expense_id}");
        }
        Command::Receipt(Receipt {
            command: ReceiptCommand::Export(args),
        }) => {
            let user_id = args.owner.resolve(&engine).await?;
            let Some(receipt) = engine
                .receipt_by_expense(user_id, args.expense_id)
                .await?
            else {
                eprintln!(
                    "no receipt for expense {} of user {user_id}",
                    args.expense_id
                );
                std::process::exit(1);
            };

            let out = args
                .out
                .unwrap_or_else(|| PathBuf::from(&receipt.filename));
            tokio::fs::write(&out, &receipt.bytes).await?;
            println!(
                "wrote {} ({}, {} bytes) to {}",
                receipt.filename,
                receipt.mime_type,
                receipt.bytes.len(),
                out.display()
            );
        }
        Command::Summary(args) => {
            let user_id = args.owner.resolve(&engine).await?;
            let observations = engine.expense_observations(user_id).await?;
            let summary = metrics::period_summary(&observations, args.period);

            println!("{}", summary.label);
            println!("  total:          {}", format_cents(summary.total_minor));
            println!(
                "  previous month: {}",
                format_cents(summary.previous_total_minor)
            );
            match summary.evolution {
                Some(evolution) => println!("  evolution:      {evolution:+.1}%"),
                None => println!("  evolution:      n/a"),
            }
            println!("  sold ratio:     {:+.1}%", summary.sold_ratio);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ids_are_parsed_strictly() {
        let ok = Cli::try_parse_from([
            "spendlog_admin",
            "receipt",
            "export",
            "--user-id",
            "3",
            "--expense-id",
            "14",
        ]);
        assert!(ok.is_ok());

        let bad = Cli::try_parse_from([
            "spendlog_admin",
            "receipt",
            "export",
            "--user-id",
            "three",
            "--expense-id",
            "14",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn owner_is_given_by_id_or_username() {
        let by_name = Cli::try_parse_from([
            "spendlog_admin",
            "summary",
            "--username",
            "alice",
            "--period",
            "2024-01",
        ])
        .unwrap();
        let Command::Summary(args) = by_name.command else {
            panic!("expected summary");
        };
        assert_eq!(args.owner.username.as_deref(), Some("alice"));
        assert!(args.owner.user_id.is_none());

        let both = Cli::try_parse_from([
            "spendlog_admin",
            "summary",
            "--user-id",
            "1",
            "--username",
            "alice",
            "--period",
            "2024-01",
        ]);
        assert!(both.is_err());

        let neither = Cli::try_parse_from(["spendlog_admin", "summary", "--period", "2024-01"]);
        assert!(neither.is_err());
    }

    #[test]
    fn summary_period_must_be_a_month() {
        let bad = Cli::try_parse_from([
            "spendlog_admin",
            "summary",
            "--user-id",
            "1",
            "--period",
            "2024-13",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn cents_are_formatted_with_two_decimals() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(1050), "10.50");
        assert_eq!(format_cents(-7), "-0.07");
    }
}
