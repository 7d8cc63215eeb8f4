use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use paving_estimator::domain::{
    find_mix, format_money, job_summary, EquipmentItem, JobStore, LineCategory, LineItem,
    SectionTemplate, MIXES,
};
use paving_estimator::infra::{csv, json, quote_sheet, today, QuoteDocument};
use paving_estimator::util::persistence::{
    load_saved_equipment, load_settings, next_quote_number, save_job, save_saved_equipment,
    FileStore,
};

use crate::cli::{EquipmentCommands, MixArgs};

pub fn open_store(data_dir: Option<&Path>) -> Result<FileStore> {
    match data_dir {
        Some(dir) => Ok(FileStore::at(dir)),
        None => FileStore::platform().context("no config directory available; pass --data-dir"),
    }
}

fn read_document(file: &Path) -> Result<QuoteDocument> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    json::import_json(&text).with_context(|| format!("{} is not a valid quote", file.display()))
}

fn emit(content: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub fn new_quote(
    port: &FileStore,
    project: String,
    customer: String,
    location: String,
    templates: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(port);
    let mut store = JobStore::new(&settings);

    for name in templates {
        let Some(template) = SectionTemplate::from_name(name) else {
            let known: Vec<&str> = SectionTemplate::ALL.iter().map(|t| t.name()).collect();
            bail!("unknown template {name:?}; expected one of: {}", known.join(", "));
        };
        store.add_section("", Some(template));
    }

    store.set_details(project, customer, location, today());
    let quote_number = next_quote_number(port).context("failed to reserve a quote number")?;
    store.set_quote_number(quote_number.clone());
    save_job(port, &store.to_persisted()).context("failed to save job")?;

    let job = store.into_job();
    let date = job.date.clone();
    let document = QuoteDocument::new(job, quote_number, date);
    emit(&json::export_json(&document)?, output)
}

pub fn summary(file: &Path, breakdown: bool) -> Result<()> {
    let document = read_document(file)?;
    print!("{}", quote_sheet::render_quote(&document));

    if breakdown {
        println!();
        let mobilization = &document.job_data.mobilization;
        if mobilization.enabled {
            println!(
                "Mobilization: {} truck(s), {}, {}",
                mobilization.num_trucks,
                mobilization.trip_type.label(),
                if mobilization.section_specific {
                    "charged to flagged sections"
                } else {
                    "split across selected sections"
                }
            );
        }
        for row in job_summary(&document.job_data).sections {
            println!("{}", row.name);
            if let Some(section) = document.job_data.section(&row.section_id) {
                for material in &section.materials {
                    println!(
                        "    {:<24} {:>10.2} {:<8} @ {}",
                        material.name,
                        material.quantity,
                        material.unit.label(),
                        format_money(material.rate)
                    );
                }
            }
            println!("  Equipment     {:>14}", format_money(row.equipment));
            println!("  Labor         {:>14}", format_money(row.labor));
            println!("  Materials     {:>14}", format_money(row.materials));
            println!("  Trucking      {:>14}", format_money(row.trucking));
            println!("  Mobilization  {:>14}", format_money(row.mobilization));
            println!("  Base          {:>14}", format_money(row.base_total));
            println!(
                "  Markup {:>5.1}% {:>14}",
                row.markup_pct,
                format_money(row.markup_amount)
            );
        }
    }
    Ok(())
}

pub fn export_csv(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let document = read_document(file)?;
    emit(&csv::export_csv(&document), output)
}

pub fn import_csv(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let document = csv::import_csv(&text)
        .with_context(|| format!("{} is not a quote CSV", file.display()))?;
    emit(&json::export_json(&document)?, output)
}

pub fn import_json(port: &FileStore, file: &Path, save: bool) -> Result<()> {
    let document = read_document(file)?;
    let summary = job_summary(&document.job_data);
    println!(
        "{} sections ({} selected), total {}",
        document.job_data.sections.len(),
        summary.sections.len(),
        format_money(summary.total_with_markup)
    );

    if save {
        let mut store = JobStore::from_job(document.job_data);
        store.set_quote_number(document.quote_number);
        save_job(port, &store.to_persisted()).context("failed to save job")?;
        println!("Saved to {}", port.dir().display());
    }
    Ok(())
}

fn resolve_mix(port: &FileStore, args: &MixArgs) -> Result<(f64, f64)> {
    let settings = load_settings(port);
    let depth = args.depth.unwrap_or(settings.default_depth_inches);
    let density = match (args.density, args.mix.as_deref()) {
        (Some(density), _) => density,
        (None, Some(name)) => match find_mix(name) {
            Some(mix) => mix.density_pcf,
            None => bail!("unknown mix {name:?}; run `mixes` to list them"),
        },
        (None, None) => settings.mix().density_pcf,
    };
    if depth <= 0.0 || density <= 0.0 {
        bail!("depth and density must be greater than zero");
    }
    Ok((depth, density))
}

pub fn tons(port: &FileStore, area: f64, args: &MixArgs) -> Result<()> {
    let (depth, density) = resolve_mix(port, args)?;
    let tons = paving_estimator::domain::tons_from_area(area, depth, density);
    println!("{area:.0} sq ft at {depth}\" and {density} pcf = {tons:.2} tons");
    Ok(())
}

pub fn area(port: &FileStore, tons: f64, args: &MixArgs) -> Result<()> {
    let (depth, density) = resolve_mix(port, args)?;
    let area = paving_estimator::domain::area_from_tons(tons, depth, density);
    println!("{tons:.2} tons at {depth}\" and {density} pcf = {area:.0} sq ft");
    Ok(())
}

pub fn templates() {
    for template in SectionTemplate::ALL {
        let section = template.build();
        let counts: Vec<String> = LineCategory::ALL
            .iter()
            .map(|category| {
                format!(
                    "{} {}",
                    section.items_in(*category),
                    category.label().to_lowercase()
                )
            })
            .collect();
        println!("{:<18} {}", template.name(), counts.join(", "));
    }
}

pub fn mixes() {
    for mix in MIXES {
        println!("{:<16} {:>5.1} pcf  {}", mix.name, mix.density_pcf, mix.description);
    }
}

pub fn equipment(port: &FileStore, action: EquipmentCommands) -> Result<()> {
    match action {
        EquipmentCommands::List => {
            let items = load_saved_equipment(port);
            if items.is_empty() {
                println!("No saved equipment.");
            }
            for item in items {
                println!(
                    "{:<24} {:>10}/hr {:>5} hrs{}",
                    item.name(),
                    format_money(item.rate),
                    item.hours,
                    if item.includes_operator {
                        "  (with operator)"
                    } else {
                        ""
                    }
                );
            }
        }
        EquipmentCommands::Add {
            name,
            rate,
            hours,
            operator,
        } => {
            if name.trim().is_empty() {
                bail!("equipment name cannot be empty");
            }
            let mut items = load_saved_equipment(port);
            items.retain(|item| !item.name.eq_ignore_ascii_case(name.trim()));
            items.push(EquipmentItem::new(name.trim(), 1.0, hours, rate).with_operator(operator));
            save_saved_equipment(port, &items).context("failed to save equipment list")?;
            println!("Saved {} items.", items.len());
        }
    }
    Ok(())
}
