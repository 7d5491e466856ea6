//! # Company Subcommand
//!
//! Registers company accounts and inspects them. A freshly created company
//! starts in `PENDING_ONBOARDING`; it completes onboarding itself through
//! the API once it has a session token.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use uuid::Uuid;

use company_api::db;
use company_api::state::{CompanyRecord, CompanyStatus};
use company_core::{email, max_len, non_empty, CompanyId};

/// Arguments for the `company-admin company` subcommand.
#[derive(Args, Debug)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub command: CompanyCommand,
}

/// Company subcommands.
#[derive(Subcommand, Debug)]
pub enum CompanyCommand {
    /// Register a new company account.
    Create {
        /// Display name of the company.
        #[arg(long)]
        name: String,
        /// Contact email address. Must be unique across companies.
        #[arg(long)]
        email: String,
    },

    /// Show a company account and its onboarding profile.
    Show {
        /// Company id to look up.
        #[arg(value_name = "COMPANY_ID")]
        id: Uuid,
    },
}

/// Execute the company subcommand.
pub async fn run_company(args: &CompanyArgs) -> Result<u8> {
    match &args.command {
        CompanyCommand::Create { name, email } => cmd_create(name, email).await,
        CompanyCommand::Show { id } => cmd_show(*id).await,
    }
}

/// Validate registration input before touching the database.
fn validate_registration(name: &str, email_addr: &str) -> Result<()> {
    if let Err(e) = non_empty(name).and_then(|_| max_len(name, 160)) {
        bail!("invalid name: {e}");
    }
    if let Err(e) = email(email_addr) {
        bail!("invalid email: {e}");
    }
    Ok(())
}

/// Register a new company account in `PENDING_ONBOARDING`.
async fn cmd_create(name: &str, email_addr: &str) -> Result<u8> {
    validate_registration(name, email_addr)?;

    let pool = crate::connect().await?;

    let now = Utc::now();
    let record = CompanyRecord {
        id: CompanyId::new(),
        name: name.trim().to_string(),
        email: email_addr.trim().to_string(),
        status: CompanyStatus::PendingOnboarding,
        created_at: now,
        updated_at: now,
    };

    db::companies::insert(&pool, &record)
        .await
        .context("failed to register company (is the email already taken?)")?;

    tracing::info!(company_id = %record.id, "company registered");

    println!("OK: registered company");
    println!("  ID:     {}", record.id);
    println!("  Name:   {}", record.name);
    println!("  Email:  {}", record.email);
    println!("  Status: {}", record.status);

    Ok(0)
}

/// Show a company account and, when onboarded, its profile.
async fn cmd_show(id: Uuid) -> Result<u8> {
    let pool = crate::connect().await?;
    let company_id = CompanyId::from_uuid(id);

    let company = match db::companies::get_by_id(&pool, company_id)
        .await
        .context("failed to look up company")?
    {
        Some(company) => company,
        None => bail!("company not found: {id}"),
    };

    println!("Company {}", company.id);
    println!("  Name:       {}", company.name);
    println!("  Email:      {}", company.email);
    println!("  Status:     {}", company.status);
    println!("  Created at: {}", company.created_at.to_rfc3339());
    println!("  Updated at: {}", company.updated_at.to_rfc3339());

    match db::profiles::get_by_company_id(&pool, company_id)
        .await
        .context("failed to look up company profile")?
    {
        Some(profile) => {
            println!("Profile");
            println!("  Industry:     {}", profile.industry);
            println!("  Location:     {}", profile.location);
            println!("  Company size: {}", profile.company_size);
            if let Some(website) = &profile.website {
                println!("  Website:      {website}");
            }
            if let Some(phone) = &profile.phone {
                println!("  Phone:        {phone}");
            }
        }
        None => {
            println!("Profile");
            println!("  (not onboarded yet)");
        }
    }

    Ok(0)
}
