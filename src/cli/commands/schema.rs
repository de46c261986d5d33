use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{schema, DatabaseManager};

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create the tables (idempotent)")]
    Apply,

    #[command(about = "Print the DDL without touching the database")]
    Print,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Apply => {
            let db = &config::config().database;
            let pool = DatabaseManager::init(db)
                .await
                .context("failed to create database pool")?;

            schema::apply(&pool)
                .await
                .with_context(|| format!("failed to apply schema to {}", db.name))?;
            DatabaseManager::close().await;

            output_success(
                output_format,
                &format!("Schema applied to {}", db.name),
                None,
            )
        }
        SchemaCommands::Print => {
            print!("{}", schema::SCHEMA_SQL);
            Ok(())
        }
    }
}
