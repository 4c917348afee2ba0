use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use zeroize::Zeroizing;

use crate::{entities::admin_user::NewAdminUser, startup::Application};

fn ask(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Creates an admin. Missing email or password are prompted for on stdin.
pub async fn create_superuser(
    app: &Application,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    println!("👤 Creating superuser...");

    let email = match email {
        Some(email) => email,
        None => ask("Email address: ").context("reading email")?,
    };

    let password = match password {
        Some(password) => Zeroizing::new(password),
        None => {
            let first = Zeroizing::new(ask("Password: ").context("reading password")?);
            let again = Zeroizing::new(ask("Password (again): ").context("reading password")?);
            if *first != *again {
                bail!("Passwords do not match");
            }
            first
        }
    };

    let request = NewAdminUser { email, password: password.to_string() };
    let admin = app
        .state
        .auth_handler
        .create_admin(request)
        .await
        .context("Superuser was not created")?;

    println!("✅ Superuser {} created (id {})", admin.email, admin.id);
    Ok(())
}
