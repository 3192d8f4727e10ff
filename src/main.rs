use agrofin::cli::{
    business::BusinessCommand, cards::CardsCommand, goal::GoalCommand, loans::LoansCommand,
};
use agrofin::core::log::init_logging;
use agrofin::core::{CreditCardInput, LoanInput, TransactionInput, TransactionKind};
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, CommandFactory, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show credit, debt and business figures at a glance
    Dashboard,
    /// Manage credit cards
    #[command(subcommand)]
    Cards(CardsArgs),
    /// Manage loans
    #[command(subcommand)]
    Loans(LoansArgs),
    /// Record and list grain trading transactions
    #[command(subcommand)]
    Business(BusinessArgs),
    /// Display monthly cash flow and goal progress
    Analysis,
    /// Manage the profit goal
    #[command(subcommand)]
    Goal(GoalArgs),
}

#[derive(Subcommand)]
enum CardsArgs {
    /// List cards with their billing cycle
    List,
    /// Add a card, or update it when --id is given
    Add(CardArgs),
    /// Show the card that finances a purchase the longest
    Recommend {
        /// Date of the purchase (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args)]
struct CardArgs {
    /// Id of an existing card to update
    #[arg(long)]
    id: Option<Uuid>,
    #[arg(long)]
    bank: String,
    #[arg(long, default_value = "Classic")]
    tier: String,
    /// Credit limit
    #[arg(long)]
    limit: f64,
    /// Day of month the statement closes (1-31)
    #[arg(long)]
    cutoff: u32,
    /// Day of month the payment is due (1-31)
    #[arg(long)]
    payment: u32,
}

#[derive(Subcommand)]
enum LoansArgs {
    /// List loans and their progress
    List,
    /// Register a loan
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        principal: f64,
        /// Fixed monthly payment
        #[arg(long)]
        quota: f64,
        /// Current balance, defaults to the principal
        #[arg(long)]
        balance: Option<f64>,
    },
    /// Register one monthly payment
    Pay {
        /// Loan id, or a unique prefix of it
        id: String,
    },
}

#[derive(Subcommand)]
enum BusinessArgs {
    /// List transactions, newest first
    List,
    /// Record a transaction
    Add(TransactionArgs),
}

#[derive(Args)]
struct TransactionArgs {
    /// purchase, sale or expense
    #[arg(long = "type")]
    kind: TransactionKind,
    /// Quintals traded
    #[arg(long)]
    quantity: Option<f64>,
    /// Price per quintal
    #[arg(long)]
    price: Option<f64>,
    /// Total amount, required unless quantity and price are given
    #[arg(long)]
    total: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    fuel: f64,
    #[arg(long, default_value_t = 0.0)]
    freight: f64,
    /// Location or notes
    #[arg(long, default_value = "")]
    location: String,
    /// Date of the transaction (YYYY-MM-DD), defaults to now
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum GoalArgs {
    /// Show progress towards the profit goal
    Show,
    /// Set the profit goal
    Set { amount: f64 },
}

impl From<Commands> for agrofin::AppCommand {
    fn from(cmd: Commands) -> agrofin::AppCommand {
        match cmd {
            Commands::Dashboard => agrofin::AppCommand::Dashboard,
            Commands::Analysis => agrofin::AppCommand::Analysis,
            Commands::Cards(args) => agrofin::AppCommand::Cards(match args {
                CardsArgs::List => CardsCommand::List,
                CardsArgs::Add(card) => CardsCommand::Add(CreditCardInput {
                    id: card.id,
                    bank: card.bank,
                    tier: card.tier,
                    credit_limit: card.limit,
                    cutoff_day: card.cutoff,
                    payment_day: card.payment,
                }),
                CardsArgs::Recommend { date } => {
                    CardsCommand::Recommend(date.unwrap_or_else(|| Local::now().date_naive()))
                }
            }),
            Commands::Loans(args) => agrofin::AppCommand::Loans(match args {
                LoansArgs::List => LoansCommand::List,
                LoansArgs::Add {
                    name,
                    principal,
                    quota,
                    balance,
                } => LoansCommand::Add(LoanInput {
                    name,
                    principal_amount: principal,
                    monthly_quota: quota,
                    current_balance: balance,
                }),
                LoansArgs::Pay { id } => LoansCommand::Pay(id),
            }),
            Commands::Business(args) => agrofin::AppCommand::Business(match args {
                BusinessArgs::List => BusinessCommand::List,
                BusinessArgs::Add(tx) => BusinessCommand::Add(TransactionInput {
                    kind: tx.kind,
                    quantity: tx.quantity,
                    price_per_unit: tx.price,
                    total_amount: tx.total,
                    fuel_cost: tx.fuel,
                    freight_cost: tx.freight,
                    location: tx.location,
                    transaction_date: tx.date.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
                }),
            }),
            Commands::Goal(args) => agrofin::AppCommand::Goal(match args {
                GoalArgs::Show => GoalCommand::Show,
                GoalArgs::Set { amount } => GoalCommand::Set(amount),
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => agrofin::cli::setup::setup(),
        Some(cmd) => agrofin::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
