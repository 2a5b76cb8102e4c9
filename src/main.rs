use anyhow::Result;
use clap::{Parser, Subcommand};

use aims::audit::EntityType;
use aims::cli::{
    handle_budget_command, handle_dev_command, handle_export_command, handle_goal_command,
    handle_health_command, handle_networth_command, handle_project_command,
    handle_report_command, handle_task_command, handle_time_command, handle_transaction_command,
};
use aims::config::{paths::AimsPaths, settings::Settings};
use aims::crypto::SecretKey;
use aims::logging::init_logging;
use aims::storage::Storage;

#[derive(Parser)]
#[command(
    name = "aims",
    version,
    about = "Personal life-tracking from the command line",
    long_about = "AIMS tracks daily health, income and expenses, budgets, net worth, \
                  savings goals, projects and personal development. Mood and journal \
                  text are encrypted on disk with a key read from the environment."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily health logging
    #[command(subcommand)]
    Health(aims::cli::HealthCommands),

    /// Income and expense transactions
    #[command(subcommand, alias = "txn")]
    Transaction(aims::cli::TransactionCommands),

    /// Monthly category budgets
    #[command(subcommand)]
    Budget(aims::cli::BudgetCommands),

    /// Assets, liabilities and net worth
    #[command(subcommand, alias = "networth")]
    NetWorth(aims::cli::NetWorthCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(aims::cli::GoalCommands),

    /// Projects
    #[command(subcommand)]
    Project(aims::cli::ProjectCommands),

    /// Project tasks
    #[command(subcommand)]
    Task(aims::cli::TaskCommands),

    /// Time logged against tasks
    #[command(subcommand)]
    Time(aims::cli::TimeCommands),

    /// Skills, books, courses, journal and networking
    #[command(subcommand, alias = "dev")]
    Develop(aims::cli::DevCommands),

    /// Reports
    #[command(subcommand)]
    Report(aims::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(aims::cli::ExportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
        /// Only this entity type (e.g., transaction, health_entry)
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Generate a new field-encryption key
    Keygen,

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Key generation touches no data
    if let Some(Commands::Keygen) = cli.command {
        let key = SecretKey::generate();
        println!("{}", key.to_base64());
        eprintln!("Store this key in your environment, e.g.:");
        eprintln!("  export AIMS_FIELD_KEY=<key>");
        eprintln!("Data encrypted with a lost key cannot be recovered.");
        return Ok(());
    }

    // Initialize paths and settings
    let paths = AimsPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    if let Err(e) = init_logging(&settings.log_level, &paths.log_dir()) {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    // Initialize storage
    let storage = Storage::open(paths.clone())?;
    let currency = settings.currency_symbol.as_str();

    match cli.command {
        Some(Commands::Health(cmd)) => handle_health_command(&storage, &settings, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, currency, cmd)?,
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, settings.budget_scope, currency, cmd)?
        }
        Some(Commands::NetWorth(cmd)) => handle_networth_command(&storage, currency, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, currency, cmd)?,
        Some(Commands::Project(cmd)) => handle_project_command(&storage, cmd)?,
        Some(Commands::Task(cmd)) => handle_task_command(&storage, cmd)?,
        Some(Commands::Time(cmd)) => handle_time_command(&storage, cmd)?,
        Some(Commands::Develop(cmd)) => handle_dev_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, settings.budget_scope, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { count, entity }) => {
            let entity = entity
                .as_deref()
                .map(str::parse::<EntityType>)
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let entries = storage.audit().read_recent(count, entity)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing AIMS at: {}", paths.base_dir().display());
            let fresh = aims::storage::init::initialize_storage(&paths)?;
            if fresh {
                println!("Initialization complete!");
            } else {
                println!("Already initialized; existing data left untouched.");
            }
            println!();
            if settings.load_key().is_err() {
                println!("No field-encryption key found in ${}.", settings.encryption.key_env);
                println!("Run 'aims keygen' and export the key before logging moods or journal entries.");
            }
        }
        Some(Commands::Config) => {
            println!("AIMS Configuration");
            println!("==================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Log directory:   {}", paths.log_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Budget scope:    {}", settings.budget_scope);
            println!("  Log level:       {}", settings.log_level);
            println!(
                "  Key variable:    {} ({})",
                settings.encryption.key_env,
                if settings.load_key().is_ok() { "set" } else { "not set" }
            );
            println!(
                "  Nutrition:       {}",
                if settings.nutrition.enabled { "enabled" } else { "disabled" }
            );
        }
        Some(Commands::Keygen) => {}
        None => {
            println!("AIMS - personal life-tracking");
            println!();
            println!("Run 'aims --help' for usage information.");
            println!("Run 'aims init' to set up the data directory.");
        }
    }

    Ok(())
}
