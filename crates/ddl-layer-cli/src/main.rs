//! ddl-layer CLI - schema management for SQLite, PostgreSQL, MySQL and SQL Server.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ddl_layer::{
    BackendKind, Config, DdlError, DdlLayer, Dialect, DialectImpl, DriverCatalog, LogicalType,
    Table,
};
use serde_json::json;
use tracing::{info, info_span, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Exit code used when the user interrupts a command.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "ddl-layer")]
#[command(about = "Create, probe and drop database storage units and tables")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "ddl.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the storage unit and each configured table exist
    Status,

    /// Create the storage unit if it does not exist
    CreateStore {
        /// Create even if it already exists (truncates SQLite files)
        #[arg(long)]
        force: bool,
    },

    /// Delete the storage unit and everything in it
    DropStore,

    /// Print CREATE TABLE statements without connecting
    Ddl {
        /// Only print the statement for this table
        #[arg(long)]
        table: Option<String>,
    },

    /// Create every configured table that is missing
    CreateTables,

    /// Drop every configured table
    DropTables,

    /// Print the type token of every logical type (no config needed)
    Types {
        /// Only show this backend
        #[arg(long)]
        backend: Option<String>,
    },

    /// Check whether a sequence exists
    Sequence {
        /// Sequence name
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tokio::select! {
        result = run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e.format_detailed());
                ExitCode::from(e.exit_code())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted.");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run() -> Result<(), DdlError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    // Type listing is pure and needs no configuration file
    if let Commands::Types { backend } = &cli.command {
        return print_types(backend.as_deref(), cli.output_json);
    }

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let identity = config.connection.identity()?;
    let span = info_span!("ddl", target = %identity.describe());
    let layer = DriverCatalog::with_builtins().create_layer_with(&identity, None, Some(span))?;

    match cli.command {
        Commands::Types { .. } => unreachable!(), // Handled above

        Commands::Status => {
            let store_missing = layer.storage_unit_missing().await?;
            let mut tables = Vec::with_capacity(config.tables.len());
            if !store_missing {
                for table in &config.tables {
                    tables.push((table.name.clone(), !layer.container_missing(table).await?));
                }
            }

            if cli.output_json {
                let tables: Vec<_> = tables
                    .iter()
                    .map(|(name, exists)| json!({ "name": name, "exists": exists }))
                    .collect();
                let report = json!({
                    "target": identity.describe(),
                    "storage_unit_exists": !store_missing,
                    "tables": tables,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Target: {}", identity.describe());
                println!(
                    "  Storage unit: {}",
                    if store_missing { "missing" } else { "present" }
                );
                for (name, exists) in &tables {
                    println!(
                        "  Table {}: {}",
                        name,
                        if *exists { "present" } else { "missing" }
                    );
                }
            }
        }

        Commands::CreateStore { force } => {
            let created = if force || layer.storage_unit_missing().await? {
                layer.create_storage_unit().await?;
                true
            } else {
                warn!("Storage unit already exists; use --force to recreate it");
                false
            };
            report_action(cli.output_json, "create-store", created)?;
        }

        Commands::DropStore => {
            layer.delete_storage_unit().await?;
            report_action(cli.output_json, "drop-store", true)?;
        }

        Commands::Ddl { table } => {
            let selected = select_tables(&config, table.as_deref())?;
            let statements = selected
                .iter()
                .map(|t| layer.build_create_container_statement(t))
                .collect::<Result<Vec<_>, _>>()?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&statements)?);
            } else {
                for sql in statements {
                    println!("{};\n", sql);
                }
            }
        }

        Commands::CreateTables => {
            let mut created = Vec::new();
            let mut skipped = Vec::new();
            for table in &config.tables {
                if layer.container_missing(table).await? {
                    layer.create_container(table).await?;
                    created.push(table.name.clone());
                } else {
                    skipped.push(table.name.clone());
                }
            }
            print_table_summary(cli.output_json, "created", &created, &skipped)?;
        }

        Commands::DropTables => {
            let mut dropped = Vec::new();
            for table in config.tables.iter().rev() {
                layer.delete_container(table).await?;
                dropped.push(table.name.clone());
            }
            print_table_summary(cli.output_json, "dropped", &dropped, &[])?;
        }

        Commands::Sequence { name } => {
            let exists = sequence_exists(&layer, &name).await?;
            if cli.output_json {
                println!("{}", json!({ "sequence": name, "exists": exists }));
            } else {
                println!(
                    "Sequence {}: {}",
                    name,
                    if exists { "present" } else { "missing" }
                );
            }
        }
    }

    Ok(())
}

async fn sequence_exists(layer: &Arc<dyn DdlLayer>, name: &str) -> Result<bool, DdlError> {
    if !layer.dialect().supports_sequences() {
        info!("{} has no sequence objects", layer.dialect().name());
    }
    layer.sequence_exists(name).await
}

fn select_tables<'a>(config: &'a Config, name: Option<&str>) -> Result<Vec<&'a Table>, DdlError> {
    match name {
        Some(name) => config
            .table(name)
            .map(|t| vec![t])
            .ok_or_else(|| DdlError::Config(format!("table '{}' is not configured", name))),
        None => Ok(config.tables.iter().collect()),
    }
}

fn report_action(output_json: bool, action: &str, changed: bool) -> Result<(), DdlError> {
    if output_json {
        println!("{}", json!({ "action": action, "changed": changed }));
    } else if changed {
        println!("{}: done", action);
    } else {
        println!("{}: nothing to do", action);
    }
    Ok(())
}

fn print_table_summary(
    output_json: bool,
    verb: &str,
    changed: &[String],
    skipped: &[String],
) -> Result<(), DdlError> {
    if output_json {
        let report = json!({ verb: changed, "skipped": skipped });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Tables {}: {}", verb, changed.len());
        for name in changed {
            println!("  {}", name);
        }
        if !skipped.is_empty() {
            println!("Tables already present: {}", skipped.join(", "));
        }
    }
    Ok(())
}

fn print_types(backend: Option<&str>, output_json: bool) -> Result<(), DdlError> {
    let kinds = match backend {
        Some(name) => vec![name.parse::<BackendKind>()?],
        None => BackendKind::ALL.to_vec(),
    };
    let dialects: Vec<DialectImpl> = kinds.iter().map(|k| DialectImpl::from_kind(*k)).collect();

    let token = |dialect: &DialectImpl, ty: &LogicalType| match dialect.type_token(ty) {
        Ok(token) => token,
        Err(_) => "-".to_string(),
    };

    if output_json {
        let rows: Vec<_> = LogicalType::all()
            .iter()
            .map(|ty| {
                let tokens: serde_json::Map<String, serde_json::Value> = dialects
                    .iter()
                    .map(|d| {
                        let value = d
                            .type_token(ty)
                            .map(serde_json::Value::String)
                            .unwrap_or(serde_json::Value::Null);
                        (d.name().to_string(), value)
                    })
                    .collect();
                json!({ "logical_type": ty.to_string(), "tokens": tokens })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print!("{:<16}", "logical");
    for dialect in &dialects {
        print!(" {:<24}", dialect.name());
    }
    println!();
    for ty in LogicalType::all() {
        print!("{:<16}", ty.to_string());
        for dialect in &dialects {
            print!(" {:<24}", token(dialect, &ty));
        }
        println!();
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays clean for --output-json
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
