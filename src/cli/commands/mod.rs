//! Command execution functions.
//!
//! Each command loads the registry, resolves the requested projects, then
//! walks them one after another. Hosting and package registry failures are
//! reported per project; anything else aborts the run.

mod dispatch;
mod helpers;
mod release_check;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use dispatch::execute_dispatch;
use release_check::execute_release_check;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    // Validate arguments
    if let Err(validation_error) = args.validate() {
        // Create output for validation errors (never quiet)
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Dispatch {
            projects,
            apply,
            with_files,
        } => execute_dispatch(&args, &config, projects, *apply, *with_files).await,
        Command::ReleaseCheck { projects } => {
            execute_release_check(&args, &config, projects).await
        }
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            let output = config.output();
            output.error(&format!("Command '{}' failed: {}", args.command.name(), e));

            // Show recovery suggestions if available
            if config.is_verbose() {
                let suggestions = e.recovery_suggestions();
                if !suggestions.is_empty() {
                    let _ = output.println("\n💡 Recovery suggestions:");
                    for suggestion in suggestions {
                        let _ = output.indent(&format!("• {}", suggestion));
                    }
                }
            }

            Ok(1)
        }
    }
}
