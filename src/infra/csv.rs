//! Quote CSV export and import.
//!
//! Layout:
//!
//! ```text
//! Quote Number,Q-1001
//! Date,2024-05-01
//! Project,...
//! Customer,...
//! Location,...
//!
//! Section,Area (sq ft),Tons,Equipment Cost,Labor Cost,Materials Cost,Trucking Cost,Mobilization Cost,Total Cost
//! Mainline Paving,1000.00,12.08,...
//! TOTAL,1000.00,12.08,...
//! ```

use std::borrow::Cow;

use tracing::{info, warn};

use super::{parse_date, ImportError, QuoteDocument};
use crate::domain::{
    format_amount, job_summary, EquipmentItem, HourlyItem, Job, MaterialItem, MaterialUnit,
    Section,
};
use crate::util::lenient::parse_number;

pub const HEADER: [&str; 9] = [
    "Section",
    "Area (sq ft)",
    "Tons",
    "Equipment Cost",
    "Labor Cost",
    "Materials Cost",
    "Trucking Cost",
    "Mobilization Cost",
    "Total Cost",
];

const TOTAL_MARKER: &str = "TOTAL";

/// Renders the selected sections of a quote. Total Cost includes markup.
pub fn export_csv(document: &QuoteDocument) -> String {
    let job = &document.job_data;
    let summary = job_summary(job);
    let mut out = String::new();

    write_row(&mut out, &["Quote Number", &document.quote_number]);
    write_row(&mut out, &["Date", &document.date]);
    write_row(&mut out, &["Project", &job.project_name]);
    write_row(&mut out, &["Customer", &job.customer_name]);
    write_row(&mut out, &["Location", &job.location]);
    out.push('\n');
    write_row(&mut out, &HEADER);

    let (mut equipment, mut labor, mut materials, mut trucking) = (0.0, 0.0, 0.0, 0.0);
    for row in &summary.sections {
        equipment += row.equipment;
        labor += row.labor;
        materials += row.materials;
        trucking += row.trucking;
        write_row(
            &mut out,
            &[
                &row.name,
                &format_amount(row.area),
                &format_amount(row.tons),
                &format_amount(row.equipment),
                &format_amount(row.labor),
                &format_amount(row.materials),
                &format_amount(row.trucking),
                &format_amount(row.mobilization),
                &format_amount(row.total_with_markup),
            ],
        );
    }

    write_row(
        &mut out,
        &[
            TOTAL_MARKER,
            &format_amount(summary.total_area),
            &format_amount(summary.total_tons),
            &format_amount(equipment),
            &format_amount(labor),
            &format_amount(materials),
            &format_amount(trucking),
            &format_amount(summary.mobilization_total),
            &format_amount(summary.total_with_markup),
        ],
    );
    out
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row(out: &mut String, fields: &[&str]) {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|field| escape_field(field)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// A parsed CSV record with the line it started on.
#[derive(Debug, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.trim()).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.trim().is_empty())
    }
}

fn parse_records(input: &str) -> Result<Vec<Record>, ImportError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(Record {
                    line: record_line,
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ImportError::MalformedRow {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
        });
    }
    Ok(records)
}

/// Column positions discovered from the header row.
struct Columns {
    area: Option<usize>,
    tons: Option<usize>,
    equipment: usize,
    labor: usize,
    materials: usize,
    trucking: usize,
}

impl Columns {
    fn from_header(header: &Record) -> Result<Self, ImportError> {
        let find = |prefix: &str| {
            header
                .fields
                .iter()
                .position(|name| name.trim().to_ascii_lowercase().starts_with(prefix))
        };
        let require = |prefix: &str, label: &str| {
            find(prefix).ok_or_else(|| ImportError::MissingHeader(label.to_string()))
        };

        Ok(Self {
            area: find("area"),
            tons: find("tons"),
            equipment: require("equipment", "Equipment Cost")?,
            labor: require("labor", "Labor Cost")?,
            materials: require("materials", "Materials Cost")?,
            trucking: require("trucking", "Trucking Cost")?,
        })
    }
}

fn is_header(record: &Record) -> bool {
    record.field(0).eq_ignore_ascii_case("section")
        && record
            .fields
            .iter()
            .any(|name| name.to_ascii_lowercase().contains("equipment cost"))
}

fn cell(record: &Record, index: usize, column: &str) -> Result<f64, ImportError> {
    let text = record.field(index);
    if text.is_empty() {
        return Ok(0.0);
    }
    parse_number(text).ok_or_else(|| ImportError::MalformedRow {
        line: record.line,
        reason: format!("{column} is not a number: {text:?}"),
    })
}

fn section_from_row(record: &Record, columns: &Columns) -> Result<Section, ImportError> {
    let name = record.field(0);
    if name.is_empty() {
        return Err(ImportError::MalformedRow {
            line: record.line,
            reason: "section name is empty".to_string(),
        });
    }

    let mut section = Section::new(name);
    if let Some(index) = columns.area {
        section.area = cell(record, index, "Area")?;
    }
    if let Some(index) = columns.tons {
        section.tons = cell(record, index, "Tons")?;
    }

    let equipment = cell(record, columns.equipment, "Equipment Cost")?;
    let labor = cell(record, columns.labor, "Labor Cost")?;
    let materials = cell(record, columns.materials, "Materials Cost")?;
    let trucking = cell(record, columns.trucking, "Trucking Cost")?;

    if equipment != 0.0 {
        section
            .equipment
            .push(EquipmentItem::new("Imported equipment", 1.0, 1.0, equipment));
    }
    if labor != 0.0 {
        section
            .labor
            .push(HourlyItem::new("Imported labor", 1.0, 1.0, labor));
    }
    if materials != 0.0 {
        section.materials.push(MaterialItem::new(
            "Imported materials",
            1.0,
            MaterialUnit::Each,
            materials,
        ));
    }
    if trucking != 0.0 {
        section
            .trucking
            .push(HourlyItem::new("Imported trucking", 1.0, 1.0, trucking));
    }
    Ok(section)
}

/// Rebuilds a quote from an exported CSV.
///
/// Category costs become one line item each. Mobilization is derived from
/// the job's policy, so that column is not read back.
pub fn import_csv(input: &str) -> Result<QuoteDocument, ImportError> {
    let records = parse_records(input)?;
    let mut rows = records.iter().filter(|record| !record.is_blank());

    let mut job = Job::default();
    let mut quote_number = String::new();
    let mut date = String::new();

    let header = loop {
        let Some(record) = rows.next() else {
            return Err(ImportError::MissingHeader("Section".to_string()));
        };
        if is_header(record) {
            break record;
        }
        let value = record.field(1).to_string();
        match record.field(0).to_ascii_lowercase().as_str() {
            "quote number" | "quote #" | "quote" => quote_number = value,
            "date" => date = value,
            "project" | "project name" => job.project_name = value,
            "customer" | "customer name" => job.customer_name = value,
            "location" => job.location = value,
            _ => {}
        }
    };
    let columns = Columns::from_header(header)?;

    // Only the final record can be the totals row; a section may be named "Total".
    let mut body: Vec<&Record> = rows.collect();
    let terminated = body
        .last()
        .is_some_and(|record| record.field(0).eq_ignore_ascii_case(TOTAL_MARKER));
    if terminated {
        body.pop();
    }
    for record in body {
        let section = section_from_row(record, &columns)?;
        job.selected_sections.insert(section.id().to_string());
        job.sections.push(section);
    }

    if job.sections.is_empty() {
        return Err(ImportError::NoSections);
    }
    if !terminated {
        warn!("CSV has no TOTAL row; imported every row after the header");
    }
    if !date.is_empty() && parse_date(&date).is_none() {
        warn!(date = %date, "quote date is not in YYYY-MM-DD form; kept as written");
    }
    job.date = date.clone();

    info!(sections = job.sections.len(), "imported quote CSV");
    Ok(QuoteDocument::new(job, quote_number, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        job_base_total, job_total_with_markup, JobStore, MobilizationPolicy, SectionTemplate,
    };

    fn sample_document() -> QuoteDocument {
        let mut store = JobStore::default();
        let main = store.add_section("Mainline, Phase 1", Some(SectionTemplate::MainlinePaving));
        store.set_area(&main, 1000.0).unwrap();
        store.recalculate_tons(&main, 2.0, 145.0).unwrap();
        store.set_markup(&main, 10.0).unwrap();
        let skipped = store.add_section("Alternate", Some(SectionTemplate::Milling));
        store.set_selected(&skipped, false).unwrap();
        store.add_section("Patches", Some(SectionTemplate::Patching));

        let mut job = store.into_job();
        job.project_name = "Route 9".to_string();
        job.customer_name = "County DPW".to_string();
        QuoteDocument::new(job, "Q-1001", "2024-05-01")
    }

    #[test]
    fn export_lists_selected_sections_and_total() {
        let csv = export_csv(&sample_document());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Quote Number,Q-1001");
        assert_eq!(lines[2], "Project,Route 9");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], HEADER.join(","));
        assert!(lines[7].starts_with("\"Mainline, Phase 1\",1000.00,12.08,"));
        assert!(lines[8].starts_with("Patches,"));
        assert!(lines[9].starts_with("TOTAL,"));
        assert!(!csv.contains("Alternate"));
    }

    #[test]
    fn export_total_column_includes_markup() {
        let document = sample_document();
        let csv = export_csv(&document);
        let total_line = csv.lines().last().unwrap();
        let total = total_line.rsplit(',').next().unwrap();
        assert_eq!(total, format_amount(job_total_with_markup(&document.job_data)));
    }

    #[test]
    fn import_reads_back_exported_quote() {
        let document = sample_document();
        let imported = import_csv(&export_csv(&document)).unwrap();
        let job = &imported.job_data;

        assert_eq!(imported.quote_number, "Q-1001");
        assert_eq!(imported.date, "2024-05-01");
        assert_eq!(job.customer_name, "County DPW");
        assert_eq!(job.sections.len(), 2);
        assert_eq!(job.sections[0].name, "Mainline, Phase 1");
        assert_eq!(job.selected_count(), 2);
        // Markup is not part of the CSV row breakdown, so base totals match.
        let original = job_base_total(&document.job_data);
        assert!((job_base_total(job) - original).abs() < 0.05);
    }

    #[test]
    fn mobilization_column_is_not_imported() {
        let mut document = sample_document();
        document.job_data.mobilization = MobilizationPolicy {
            enabled: true,
            ..MobilizationPolicy::default()
        };
        let imported = import_csv(&export_csv(&document)).unwrap();
        assert!(!imported.job_data.mobilization.enabled);
        let row = export_csv(&imported);
        assert!(row.contains(",0.00,"));
    }

    #[test]
    fn section_named_total_survives_a_round_trip() {
        let mut store = JobStore::default();
        store.add_section("Total", Some(SectionTemplate::Patching));
        store.add_section("Parking", Some(SectionTemplate::ParkingLot));
        let document = QuoteDocument::new(store.into_job(), "Q-1002", "2024-06-01");

        let imported = import_csv(&export_csv(&document)).unwrap();
        let names: Vec<&str> = imported
            .job_data
            .sections
            .iter()
            .map(|section| section.name.as_str())
            .collect();
        assert_eq!(names, vec!["Total", "Parking"]);
        let original = job_base_total(&document.job_data);
        assert!((job_base_total(&imported.job_data) - original).abs() < 0.05);
    }

    #[test]
    fn accepts_currency_cells_and_missing_total_row() {
        let input = "Project,Shop Lot\r\n\
                     Section,Area,Tons,Equipment Cost,Labor Cost,Materials Cost,Trucking Cost\r\n\
                     Lot,\"5,000\",60,\"$1,200.50\",800,,300\r\n";
        let document = import_csv(input).unwrap();
        let section = &document.job_data.sections[0];
        assert_eq!(document.job_data.project_name, "Shop Lot");
        assert_eq!(section.area, 5000.0);
        assert!(section.materials.is_empty());
        assert!((job_base_total(&document.job_data) - 2300.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(matches!(
            import_csv("Project,Nothing\n"),
            Err(ImportError::MissingHeader(_))
        ));
        assert!(matches!(
            import_csv("Section,Area,Equipment Cost,Labor Cost,Materials Cost\n"),
            Err(ImportError::MissingHeader(column)) if column == "Trucking Cost"
        ));
        assert!(matches!(
            import_csv(&format!("{}\nTOTAL,0,0,0,0,0,0,0,0\n", HEADER.join(","))),
            Err(ImportError::NoSections)
        ));
        assert!(matches!(
            import_csv(&format!("{}\nLot,10,1,lots,0,0,0,0,0\n", HEADER.join(","))),
            Err(ImportError::MalformedRow { line: 2, .. })
        ));
        assert!(matches!(
            import_csv("Section,\"Equipment Cost\n"),
            Err(ImportError::MalformedRow { .. })
        ));
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let records = parse_records("a,\"b\nc\",\"d\"\"e\"\nf").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b\nc", "d\"e"]);
        assert_eq!(records[1].line, 3);
    }
}
