//! Savings goal CLI commands

use clap::Subcommand;

use crate::error::AimsResult;
use crate::services::GoalService;
use crate::storage::Storage;

use super::{parse_amount, parse_opt_date};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Add money to a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        amount: String,
    },
    /// Show progress toward every goal
    List,
}

pub fn handle_goal_command(storage: &Storage, currency: &str, cmd: GoalCommands) -> AimsResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::Create {
            name,
            target,
            deadline,
        } => {
            let goal = service.create(
                &name,
                parse_amount(&target)?,
                parse_opt_date(deadline.as_deref())?,
            )?;
            println!(
                "Created goal '{}' ({}) with target {}",
                goal.name,
                goal.id,
                goal.target_amount.format_with_symbol(currency)
            );
        }

        GoalCommands::Contribute { goal, amount } => {
            let goal = service.find(&goal)?;
            let (goal, progress) = service.contribute(goal.id, parse_amount(&amount)?)?;
            println!(
                "{}: {} of {} ({:.1}%)",
                goal.name,
                goal.current_amount.format_with_symbol(currency),
                goal.target_amount.format_with_symbol(currency),
                progress.percent
            );
            if progress.is_achieved() {
                println!("Goal achieved!");
            } else {
                println!("Status: {}", progress.status);
            }
        }

        GoalCommands::List => {
            print!("{}", service.report()?.format_terminal());
        }
    }

    Ok(())
}
