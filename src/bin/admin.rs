//! CLI administration tool for yamdb.
//!
//! Provides account management, statistics and database checks without
//! going through the HTTP API. Accounts created here have no confirmation
//! code; use `user token` to issue an access token for them.
//!
//! # Usage
//!
//! ```bash
//! # Create an administrator (superuser)
//! cargo run --bin admin -- user create-superuser
//!
//! # Change someone's role
//! cargo run --bin admin -- user set-role reader moderator
//!
//! # List accounts
//! cargo run --bin admin -- user list --search rea
//!
//! # Issue an access token (needs JWT_SECRET)
//! cargo run --bin admin -- user token root
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `JWT_SECRET`: only for `user token`

use yamdb::application::services::AuthService;
use yamdb::config::{Config, load_from_env};
use yamdb::domain::entities::{NewUser, Role, User, UserPatch};
use yamdb::domain::repositories::{Page, UserRepository};
use yamdb::domain::validators::validate_name;
use yamdb::infrastructure::mail::LogMailer;
use yamdb::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing yamdb.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show row counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a superuser with the admin role
    CreateSuperuser {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Change the role of an account (user, moderator, admin)
    SetRole { username: String, role: String },

    /// List accounts ordered by username
    List {
        /// Username substring
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Issue an access token for an account
    Token { username: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::CreateSuperuser {
            username,
            email,
            yes,
        } => create_superuser(repo, username, email, yes).await?,
        UserAction::SetRole { username, role } => set_role(repo, &username, &role).await?,
        UserAction::List { search, limit } => list_users(repo, search, limit).await?,
        UserAction::Token { username } => issue_token(repo, &username).await?,
    }

    Ok(())
}

async fn find_user(repo: &PgUserRepository, username: &str) -> Result<User> {
    repo.find_by_username(username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("User '{username}' not found"))
}

/// Creates an account with the admin role and the superuser flag.
///
/// # Flow
///
/// 1. Prompt for username and email (or use provided)
/// 2. Validate the username
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store in database
async fn create_superuser(
    repo: Arc<PgUserRepository>,
    username: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create superuser".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    validate_name(&username).map_err(|e| anyhow::anyhow!("Invalid username: {}", e))?;

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    println!();
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Role:     {}", Role::Admin.as_str().bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = repo
        .create(NewUser {
            username,
            email,
            role: Role::Admin,
            is_superuser: true,
            is_staff: true,
            ..NewUser::default()
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ Superuser created".green().bold());
    println!();
    println!(
        "  Get a token with: {} admin -- user token {}",
        "cargo run --bin".bright_cyan(),
        user.username.bright_yellow()
    );
    println!();

    Ok(())
}

async fn set_role(repo: Arc<PgUserRepository>, username: &str, role: &str) -> Result<()> {
    let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let user = find_user(&repo, username).await?;

    if user.role == role {
        println!("{}", format!("⚠️  {} already has role {}", username, role).yellow());
        return Ok(());
    }

    repo.update(
        user.id,
        UserPatch {
            role: Some(role),
            ..UserPatch::default()
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to update user: {}", e))?;

    println!(
        "{} {} → {}",
        "✅ Role changed:".green().bold(),
        user.role.as_str().bright_black(),
        role.as_str().bright_yellow()
    );

    Ok(())
}

/// Lists accounts.
///
/// # Output Format
///
/// ```text
///   ID  Username             Email                          Role       Joined
///   1   root                 root@example.com               admin*     2024-01-15 10:30
/// ```
///
/// `*` marks superusers.
async fn list_users(repo: Arc<PgUserRepository>, search: Option<String>, limit: i64) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let (users, total) = tokio::try_join!(
        repo.list(search.clone(), Page::new(0, limit)),
        repo.count(search)
    )
    .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<30} {:<10} {:<16}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Joined".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for user in &users {
        let role = if user.is_superuser {
            format!("{}*", user.role)
        } else {
            user.role.to_string()
        };
        let role = match user.role {
            Role::Admin => role.red(),
            Role::Moderator => role.yellow(),
            Role::User => role.normal(),
        };

        println!(
            "  {:<5} {:<20} {:<30} {:<10} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            role,
            user.date_joined
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Shown: {} of {}",
        users.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Issues an access token signed with the configured `JWT_SECRET`.
async fn issue_token(repo: Arc<PgUserRepository>, username: &str) -> Result<()> {
    let config: Config = load_from_env()?;
    let user = find_user(&repo, username).await?;

    let auth = AuthService::new(repo, Arc::new(LogMailer::new()), config.auth_settings());
    let token = auth
        .issue_token(&user)
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    println!("{}", "🔑 Access token".bright_blue().bold());
    println!();
    println!("  {}", token.bright_yellow());
    println!();
    println!(
        "  Valid for {} minutes. Send it as {}: Bearer <token>",
        config.jwt_access_ttl_minutes,
        "Authorization".bright_cyan()
    );
    println!();

    Ok(())
}

/// Displays row counts per table.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    for (label, table) in [
        ("Users", "users"),
        ("Categories", "categories"),
        ("Genres", "genres"),
        ("Titles", "titles"),
        ("Reviews", "reviews"),
        ("Comments", "comments"),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;

        println!(
            "  {:<12} {}",
            format!("{label}:"),
            count.to_string().bright_green().bold()
        );
    }

    let rated: Option<f64> = sqlx::query_scalar("SELECT AVG(score)::float8 FROM reviews")
        .fetch_one(pool)
        .await?;

    if let Some(avg) = rated {
        println!("  {:<12} {:.2}", "Avg score:", avg);
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
