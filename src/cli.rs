use crate::profile::ProfileArg;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bom-scan")]
#[command(about = "Barcode scanner BOM tool: scan recovery, catalog lookup and part classification", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keyboard profile of the scanner station (overrides the config)
    #[arg(long, global = true)]
    pub profile: Option<ProfileArg>,

    /// Do not contact the catalog
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse scanned text without any catalog lookup
    Parse {
        /// Scanned text (one scan per argument)
        #[arg(required = true)]
        text: Vec<String>,

        /// Restore `/` separators inside part symbols
        #[arg(long)]
        restore_separators: bool,
    },

    /// Process scans and record them in an inventory file
    Scan {
        /// Scanned text; reads interactively when omitted
        text: Vec<String>,

        /// Inventory JSON file
        #[arg(short, long)]
        inventory: Option<PathBuf>,

        /// Storage location assigned to the scans
        #[arg(short, long)]
        location: Option<String>,

        /// Project assigned to the scans
        #[arg(short, long)]
        project: Option<String>,

        /// Skip category classification
        #[arg(long)]
        no_classify: bool,
    },

    /// Classify a part number
    Classify {
        /// Part number
        #[arg(required = true)]
        part_number: String,

        /// Item description (used for Prumex parts)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Import a KiCad BOM (CSV export)
    ImportKicad {
        /// BOM CSV file
        #[arg(required = true)]
        file: PathBuf,

        /// Project assigned to the parts (default: file name)
        #[arg(short, long)]
        project: Option<String>,

        /// Also record the parts in this inventory file
        #[arg(short, long)]
        inventory: Option<PathBuf>,
    },

    /// Show or edit the configuration
    Config {
        /// Set the TME API token
        #[arg(long)]
        set_token: Option<String>,

        /// Set the TME application secret
        #[arg(long)]
        set_secret: Option<String>,

        /// Set the default keyboard profile
        #[arg(long)]
        set_profile: Option<ProfileArg>,

        /// Show the configuration
        #[arg(long)]
        show: bool,
    },
}
