mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use paving_estimator::util::logging::init_tracing;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);

    let port = commands::open_store(args.data_dir.as_deref())?;

    match args.command {
        cli::Commands::New {
            project,
            customer,
            location,
            sections,
            output,
        } => commands::new_quote(&port, project, customer, location, &sections, output)?,
        cli::Commands::Summary { file, breakdown } => commands::summary(&file, breakdown)?,
        cli::Commands::ExportCsv { file, output } => commands::export_csv(&file, output)?,
        cli::Commands::ImportCsv { file, output } => commands::import_csv(&file, output)?,
        cli::Commands::ImportJson { file, save } => commands::import_json(&port, &file, save)?,
        cli::Commands::Tons { area, mix } => commands::tons(&port, area, &mix)?,
        cli::Commands::Area { tons, mix } => commands::area(&port, tons, &mix)?,
        cli::Commands::Templates => commands::templates(),
        cli::Commands::Mixes => commands::mixes(),
        cli::Commands::Equipment { action } => commands::equipment(&port, action)?,
    }

    Ok(())
}
