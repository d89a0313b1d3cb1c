use bom_scanner::{cli, config, error, inventory, kicad_import, report, session, tme};
use bom_scanner_common::{
    classify_part, parse_barcode, CatalogAccessor, CategoryLabel, FieldKey, PipelineOptions,
    ScanPipeline,
};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Catalog client, or `None` when offline or without credentials
fn open_catalog(config: &Config, offline: bool) -> Result<Option<tme::TmeClient>> {
    if offline {
        return Ok(None);
    }
    match config.credentials() {
        Ok(credentials) => Ok(Some(tme::TmeClient::new(credentials, config)?)),
        Err(e) => {
            warn!("{}; running offline", e);
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Ok(name) = std::env::var(config::PROFILE_ENV) {
        config.set_profile_name(&name)?;
    }
    if let Some(profile) = cli.profile {
        config.keyboard_profile = profile.profile();
    }

    match cli.command {
        Commands::Parse { text, restore_separators } => {
            let mut options = config.parse_options();
            options.restore_separators |= restore_separators;

            let results: Vec<_> = text.iter().map(|t| parse_barcode(t, &options)).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for fields in &results {
                    println!("{}", fields.raw);
                    println!("{}\n", report::render_fields(fields));
                }
            }
        }

        Commands::Scan { text, inventory, location, project, no_classify } => {
            let client = open_catalog(&config, cli.offline)?;
            let options = PipelineOptions {
                parse: config.parse_options(),
                classify: !no_classify,
            };
            let mut pipeline = ScanPipeline::new(options);
            if let Some(client) = &client {
                pipeline = pipeline.with_catalog(client);
            }

            let mut session = session::ScanSession::new(pipeline, inventory.as_deref())?;
            session.set_location(location);
            session.set_project(project);

            if text.is_empty() {
                session.run_interactive()?;
            } else {
                let mut outcomes = Vec::new();
                for t in &text {
                    if let Some((outcome, result)) = session.handle_scan(t)? {
                        if cli.json {
                            outcomes.push(outcome);
                        } else {
                            session::print_result(&outcome, &result);
                        }
                    }
                }
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&outcomes)?);
                }
            }
        }

        Commands::Classify { part_number, description } => {
            let client = open_catalog(&config, cli.offline)?;
            let catalog = client.as_ref().map(|c| c as &dyn CatalogAccessor);
            let label = classify_part(&part_number, description.as_deref(), catalog);

            if cli.json {
                let value = serde_json::json!({
                    "part_number": part_number,
                    "category": label,
                    "id_prefix": label.id_prefix(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}: {} ({})", part_number, label, label.id_prefix());
            }
        }

        Commands::ImportKicad { file, project, inventory } => {
            let project = project.or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            });
            let import = kicad_import::import_kicad_csv(&file, project.as_deref())?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&import.parts)?);
            } else {
                println!("📋 bom-scan - KiCad import\n");
                println!("{}", report::render_parts_table(&import.parts));
                println!(
                    "\n✔ {} parts imported, {} rows skipped",
                    import.parts.len(),
                    import.skipped
                );
            }

            if let Some(path) = inventory {
                let client = open_catalog(&config, cli.offline)?;
                let catalog = client.as_ref().map(|c| c as &dyn CatalogAccessor);
                let mut inventory = inventory::Inventory::load(&path)?;
                let now = Local::now();

                for part in import.parts {
                    let category = match part.part_number() {
                        Some(pn) => classify_part(pn, part.get(FieldKey::Value), catalog),
                        None => CategoryLabel::UNKNOWN,
                    };
                    inventory.record_fields(part, category, now);
                }
                inventory.save(&path)?;
                if !cli.json {
                    println!("✔ Inventory saved: {} ({} parts)", path.display(), inventory.len());
                }
            }
        }

        Commands::Config { set_token, set_secret, set_profile, show } => {
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(token) = set_token {
                config.tme_token = Some(token);
                changed = true;
            }
            if let Some(secret) = set_secret {
                config.tme_secret = Some(secret);
                changed = true;
            }
            if let Some(profile) = set_profile {
                config.keyboard_profile = profile.profile();
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ Configuration saved: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("Configuration:");
                println!("  Keyboard profile: {}", config.keyboard_profile);
                println!("  Restore separators: {}", config.restore_separators);
                println!(
                    "  Country/Language: {}/{}",
                    config.country, config.language
                );
                println!("  Timeout: {}s", config.timeout_seconds);
                println!(
                    "  TME credentials: {}",
                    if config.has_credentials() { "set" } else { "not set" }
                );
            }
        }
    }

    Ok(())
}
