//! Command-line surface.

use expense_core::FilterController;
use models::{Category, CategoryFilter, ExpenseId, Money};

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "expenses",
    version,
    about = "Track expenses against a remote expense store",
    long_about = "Lists, adds and deletes expenses on a remote expense store and \
                  shows totals per category. With no command, shows the full view."
)]
pub struct Cli {
    /// Base URL of the expense store (overrides config and EXPENSES_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory holding config.json and the log file
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Category to show, or "All"
    #[arg(
        short,
        long,
        default_value = "All",
        value_parser = FilterController::parse_selection
    )]
    pub category: CategoryFilter,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show expenses and totals
    Show(FilterArgs),

    /// List expenses, newest first
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show totals only
    Summary(FilterArgs),

    /// Add an expense
    Add {
        /// Amount, e.g. 12.50
        #[arg(short, long)]
        amount: Money,
        /// What the money was spent on
        #[arg(short, long)]
        description: String,
        /// One of Food, Transport, Entertainment, Bills, Other
        #[arg(short, long)]
        category: Category,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete an expense by id
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Check whether the expense store is reachable
    Health,
}

impl Command {
    /// What runs when no subcommand is given.
    pub fn default_view() -> Self {
        Command::Show(FilterArgs {
            category: CategoryFilter::All,
        })
    }
}
