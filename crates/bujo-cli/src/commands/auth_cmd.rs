use bujo_core::models::{LoginCredentials, SignupData};

use crate::cli::AuthCommands;
use crate::commands::common::session_manager;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, api_url: Option<&str>) -> Result<(), CliError> {
    let session = session_manager(api_url)?;

    match command {
        AuthCommands::Login { email, password } => {
            let credentials = LoginCredentials { email, password };
            let established = session.login(&credentials).await?;
            println!("Logged in as {}", established.user.display_name());
            Ok(())
        }
        AuthCommands::Signup {
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            phone,
        } => {
            let data = SignupData {
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                phone_number: phone,
            };
            let established = session.signup(&data).await?;
            println!(
                "Account created; logged in as {}",
                established.user.display_name()
            );
            Ok(())
        }
        AuthCommands::Status => {
            match session.current_user() {
                Some(user) => {
                    let token_state = if session.is_token_expired() {
                        "expires soon"
                    } else {
                        "valid"
                    };
                    println!(
                        "Logged in as {} <{}> (token {token_state})",
                        user.display_name(),
                        user.email
                    );
                }
                None => println!("Not logged in."),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            session.logout();
            println!("Logged out.");
            Ok(())
        }
    }
}
