use std::{collections::HashMap, io::Write, path::Path};

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{load_application, static_files::collect_static, superuser::create_superuser};
use crate::{
    db::sqlite::{create_pool, run_migrations, MIGRATOR},
    entry::{call_environ, SiteService},
    settings::AppConfig,
};

fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::new().context("Configuration error")?;
    crate::telemetry::init(&config.logging);
    Ok(config)
}

pub async fn migrate() -> anyhow::Result<()> {
    migrate_with(&load_config()?).await
}

async fn migrate_with(config: &AppConfig) -> anyhow::Result<()> {
    println!("🔄 Running database migrations...");
    let pool = create_pool(&config.database).await.context("Database error")?;
    run_migrations(&pool).await.context("Migration error")?;
    println!("✅ Migrations completed! ({} known)", MIGRATOR.iter().count());
    Ok(())
}

pub async fn collectstatic() -> anyhow::Result<()> {
    collectstatic_with(&load_config()?).await
}

async fn collectstatic_with(config: &AppConfig) -> anyhow::Result<()> {
    println!("📦 Collecting static files...");
    let copied = collect_static(&config.static_files).await.with_context(|| {
        format!(
            "Could not copy {} into {}",
            config.static_files.source_dir, config.static_files.root
        )
    })?;
    println!("✅ {copied} static files copied to {}", config.static_files.root);
    Ok(())
}

/// Initializes everything and reports what looks wrong.
pub async fn check() -> anyhow::Result<()> {
    println!("🔍 Running system check...");
    let app = load_application().await?;
    let config = app.config();
    let mut issues = Vec::new();

    if let Err(e) = app.state.cache.ping().await {
        issues.push(format!("cache backend unreachable: {e}"));
    }
    if !Path::new(config.static_files.serving_dir()).is_dir() {
        issues.push(format!("static directory {} does not exist", config.static_files.serving_dir()));
    }
    if config.is_production() && config.is_debug() {
        issues.push("debug mode is on in production".to_string());
    }

    println!("   profile:   {}", config.env);
    println!("   database:  {}", config.database.url);
    println!("   templates: {}", app.state.renderer.template_names().join(", "));
    println!("   cache:     {:?}", app.state.cache.backend());

    if issues.is_empty() {
        println!("✅ System check identified no issues.");
        Ok(())
    } else {
        for issue in &issues {
            println!("⚠️  {issue}");
        }
        anyhow::bail!("System check identified {} issue(s)", issues.len())
    }
}

/// Runs `cargo test` with the testing profile and returns its exit code.
pub async fn run_tests(args: &[String]) -> anyhow::Result<i32> {
    println!("🧪 Running tests...");
    let status = tokio::process::Command::new("cargo")
        .arg("test")
        .args(args)
        .env("DJANGO_ENV", "testing")
        .status()
        .await
        .context("Could not start cargo")?;
    Ok(status.code().unwrap_or(1))
}

/// Static collection is optional outside production; a failure only warns.
async fn collectstatic_step(config: &AppConfig) {
    if let Err(e) = collectstatic_with(config).await {
        tracing::warn!("Static file collection failed: {:#}", e);
        println!("⚠️  Failed to collect static files: {e:#}");
    }
}

fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{question}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn setup(no_input: bool) -> anyhow::Result<()> {
    println!("🎯 Portfolio Site - Quick Setup");
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    migrate_with(&config).await.context("Setup aborted during migrations")?;
    collectstatic_step(&config).await;

    if !no_input && confirm("\n👤 Do you want to create a superuser? (y/n): ")? {
        let app = load_application().await?;
        if let Err(e) = create_superuser(&app, None, None).await {
            println!("⚠️  {e:#}. You can create one later with 'portfolio_site createsuperuser'");
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("🎉 Setup completed successfully!");
    println!("💡 Next steps:");
    println!("   1. Copy .env.example to .env and update your settings");
    println!("   2. Run 'portfolio_site' to open the development menu");
    println!("   3. Visit http://127.0.0.1:8000/ to see your portfolio");
    println!("{}", "=".repeat(50));
    Ok(())
}

pub async fn build() -> anyhow::Result<()> {
    println!("🏗️  Building for deployment...");
    let config = AppConfig::for_deployment().context("Configuration error")?;
    crate::telemetry::init(&config.logging);
    migrate_with(&config).await.context("Build aborted during migrations")?;
    collectstatic_step(&config).await;
    println!("✅ Build completed!");
    Ok(())
}

/// Reads at most `length` bytes; the declared length is never preallocated.
async fn read_body<R: AsyncRead + Unpin>(reader: R, length: u64) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(length).read_to_end(&mut body).await?;
    Ok(body)
}

/// One request from the CGI environment and stdin, answered on stdout.
pub async fn cgi() -> anyhow::Result<()> {
    let app = load_application().await?;
    let environ: HashMap<String, String> = std::env::vars().collect();

    let length = environ
        .get("CONTENT_LENGTH")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let body = read_body(tokio::io::stdin(), length)
        .await
        .context("Reading request body")?;

    let service = SiteService::new(app.state.clone()).await?;

    let mut head = String::new();
    let payload = call_environ(&service, &environ, body, |status, headers| {
        head.push_str(&format!("Status: {status}\r\n"));
        for (name, value) in headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");
    })
    .await;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(head.as_bytes())?;
    stdout.write_all(&payload)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn body_stops_at_declared_length() {
        let body = read_body(&b"name=Ada&extra"[..], 8).await.unwrap();
        assert_eq!(body, b"name=Ada");
    }

    #[tokio::test]
    async fn oversized_length_reads_what_is_there() {
        let body = read_body(&b"name=Ada"[..], u64::MAX).await.unwrap();
        assert_eq!(body, b"name=Ada");
    }
}
