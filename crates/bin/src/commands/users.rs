//! User management commands.

use std::sync::Arc;

use filedesk::{SystemClock, user::CredentialStore};

use crate::backend::create_backend;
use crate::cli::UsersListArgs;
use crate::output::{OutputFormat, print_table};

/// Run the `users list` command
pub async fn list(args: &UsersListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = create_backend(&args.backend_config).await?;
    let users = CredentialStore::new(backend, Arc::new(SystemClock));
    let summaries = users.summaries().await?;

    match OutputFormat::from_json_flag(args.json) {
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = summaries
                .iter()
                .map(|user| {
                    vec![
                        user.user_id.to_string(),
                        user.email.clone(),
                        user.role.to_string(),
                        user.file_count.to_string(),
                    ]
                })
                .collect();
            print_table(&["USER ID", "EMAIL", "ROLE", "FILES"], &rows);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&summaries)?);
        }
    }

    Ok(())
}
