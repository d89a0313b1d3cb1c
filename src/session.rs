//! Interactive scan session
//!
//! Reads scans from the terminal (the reader types them like a keyboard),
//! runs each through the pipeline and records it in the inventory file.
//! Lines starting with `:` are session commands.

use crate::error::{BomError, Result};
use crate::inventory::{Inventory, RecordResult};
use crate::report::render_outcome;
use bom_scanner_common::{FieldKey, ScanOutcome, ScanPipeline};
use dialoguer::Input;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Barcode text
    Scan(String),
    /// Storage location for the following scans (`None` clears it)
    Location(Option<String>),
    /// Project for the following scans (`None` clears it)
    Project(Option<String>),
    Help,
    Skip,
    Quit,
}

pub fn parse_command(input: &str) -> SessionCommand {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return SessionCommand::Skip;
    }

    let Some(command) = trimmed.strip_prefix(':') else {
        return SessionCommand::Scan(trimmed.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
        None => (command, None),
    };

    match name {
        "q" | "quit" => SessionCommand::Quit,
        "loc" | "location" => SessionCommand::Location(arg),
        "proj" | "project" => SessionCommand::Project(arg),
        "h" | "help" => SessionCommand::Help,
        _ => SessionCommand::Scan(trimmed.to_string()),
    }
}

const HELP: &str = "Commands: :loc <LOCATION>  :proj <PROJECT>  :help  :q (empty line skips)";

/// Scan session state
pub struct ScanSession<'a> {
    pipeline: ScanPipeline<'a>,
    inventory: Inventory,
    inventory_path: Option<PathBuf>,
    location: Option<String>,
    project: Option<String>,
}

impl<'a> ScanSession<'a> {
    /// Start a session; the inventory is loaded from `inventory_path` when given
    pub fn new(pipeline: ScanPipeline<'a>, inventory_path: Option<&Path>) -> Result<Self> {
        let inventory = match inventory_path {
            Some(path) => Inventory::load(path)?,
            None => Inventory::new(),
        };
        Ok(Self {
            pipeline,
            inventory,
            inventory_path: inventory_path.map(Path::to_path_buf),
            location: None,
            project: None,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }

    pub fn set_project(&mut self, project: Option<String>) {
        self.project = project;
    }

    /// Process one scan and record it
    ///
    /// A scan with neither PN nor MPN is recorded under its scanned text, so
    /// nothing the operator scanned goes missing from the inventory.
    ///
    /// # Returns
    /// `None` for blank input
    pub fn handle_scan(&mut self, raw: &str) -> Result<Option<(ScanOutcome, RecordResult)>> {
        let Some(mut outcome) = self.pipeline.process(raw) else {
            return Ok(None);
        };

        if let Some(location) = &self.location {
            outcome.fields.location = Some(location.clone());
        }
        if let Some(project) = &self.project {
            if !outcome.fields.projects.contains(project) {
                outcome.fields.projects.push(project.clone());
            }
        }

        let keyed = outcome.fields.has_part_number() || outcome.fields.contains(FieldKey::Mpn);
        if !keyed {
            let identifier = outcome.identifier().to_string();
            warn!(identifier = %identifier, "unidentified scan recorded under its text");
            outcome.fields.insert(FieldKey::Pn, identifier);
            outcome.fields.fill(FieldKey::Qty, "1");
        }

        let result = self.inventory.record(&outcome);
        if let Some(path) = &self.inventory_path {
            self.inventory.save(path)?;
        }
        Ok(Some((outcome, result)))
    }

    /// Read scans from the terminal until `:q`
    pub fn run_interactive(&mut self) -> Result<()> {
        println!("📦 bom-scan - scanning{}", if self.pipeline.is_online() { "" } else { " (offline)" });
        println!("{}", HELP);
        println!("---\n");

        let mut scanned = 0usize;
        loop {
            let prompt = match (&self.location, &self.project) {
                (Some(l), Some(p)) => format!("scan [{} / {}]", l, p),
                (Some(l), None) => format!("scan [{}]", l),
                (None, Some(p)) => format!("scan [/ {}]", p),
                (None, None) => "scan".to_string(),
            };

            let input: String = Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| BomError::Prompt(e.to_string()))?;

            match parse_command(&input) {
                SessionCommand::Quit => break,
                SessionCommand::Skip => continue,
                SessionCommand::Help => println!("{}", HELP),
                SessionCommand::Location(location) => {
                    println!("  → location: {}\n", location.as_deref().unwrap_or("(none)"));
                    self.set_location(location);
                }
                SessionCommand::Project(project) => {
                    println!("  → project: {}\n", project.as_deref().unwrap_or("(none)"));
                    self.set_project(project);
                }
                SessionCommand::Scan(text) => {
                    if let Some((outcome, result)) = self.handle_scan(&text)? {
                        scanned += 1;
                        print_result(&outcome, &result);
                    }
                }
            }
        }

        info!(scanned, parts = self.inventory.len(), "scan session finished");
        println!("\n✔ {} scans, {} parts in inventory", scanned, self.inventory.len());
        if let Some(path) = &self.inventory_path {
            println!("✔ Saved: {}", path.display());
        }
        Ok(())
    }
}

pub fn print_result(outcome: &ScanOutcome, result: &RecordResult) {
    println!("{}", render_outcome(outcome));
    match result {
        RecordResult::Added { id } => println!("  → added as {}\n", id),
        RecordResult::Merged { id, quantity } => {
            println!("  → {} updated, quantity {}\n", id, quantity)
        }
    }
}
