use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paving-estimator", version, author, about = "Asphalt paving job-cost estimator")]
pub struct Cli {
    /// Directory for saved jobs, settings and quote numbers
    #[arg(long, global = true, env = "PAVING_ESTIMATOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new quote from section templates
    New {
        #[arg(long, default_value = "")]
        project: String,

        #[arg(long, default_value = "")]
        customer: String,

        #[arg(long, default_value = "")]
        location: String,

        /// Template name; repeat for several sections
        #[arg(short, long = "section")]
        sections: Vec<String>,

        /// Where to write the quote JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the quote sheet for a quote JSON file
    Summary {
        file: PathBuf,

        /// Also list category costs, mobilization and markup per section
        #[arg(long)]
        breakdown: bool,
    },

    /// Convert a quote JSON file to CSV
    ExportCsv {
        file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an exported CSV back into a quote JSON file
    ImportCsv {
        file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a quote JSON file and optionally keep it as the saved job
    ImportJson {
        file: PathBuf,

        #[arg(long)]
        save: bool,
    },

    /// Tons of mix needed for an area
    Tons {
        /// Square feet
        #[arg(long)]
        area: f64,

        #[command(flatten)]
        mix: MixArgs,
    },

    /// Area covered by a tonnage
    Area {
        #[arg(long)]
        tons: f64,

        #[command(flatten)]
        mix: MixArgs,
    },

    /// List section templates
    Templates,

    /// List asphalt mixes and densities
    Mixes,

    /// Manage the saved equipment list
    Equipment {
        #[command(subcommand)]
        action: EquipmentCommands,
    },
}

#[derive(Args, Debug)]
pub struct MixArgs {
    /// Thickness in inches (defaults to the configured depth)
    #[arg(long)]
    pub depth: Option<f64>,

    /// Density in pounds per cubic foot; overrides --mix
    #[arg(long)]
    pub density: Option<f64>,

    /// Mix name, e.g. "Surface Course"
    #[arg(long)]
    pub mix: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// Show saved equipment
    List,

    /// Add a piece of equipment to the saved list
    Add {
        #[arg(long)]
        name: String,

        /// Hourly rate
        #[arg(long)]
        rate: f64,

        #[arg(long, default_value_t = 8.0)]
        hours: f64,

        #[arg(long)]
        operator: bool,
    },
}
