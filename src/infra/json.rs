use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{today, ImportError};
use crate::domain::{ContactInfo, Job};

/// Saved or exchanged quote: `{ jobData, contactInfo, quoteNumber, date }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub job_data: Job,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub quote_number: String,
    #[serde(default)]
    pub date: String,
}

impl QuoteDocument {
    /// Wraps a job, taking the contact block from the job itself.
    pub fn new(job: Job, quote_number: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            contact_info: job.contact_info.clone(),
            job_data: job,
            quote_number: quote_number.into(),
            date: date.into(),
        }
    }
}

pub fn export_json(document: &QuoteDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Parses a quote document and normalizes it for editing.
///
/// Sections with blank or repeated ids get fresh ones, references to
/// unknown sections are dropped, cached line totals are recomputed and a
/// missing date becomes today.
pub fn import_json(input: &str) -> Result<QuoteDocument, ImportError> {
    let mut document: QuoteDocument = serde_json::from_str(input)?;

    let reassigned = document.job_data.reassign_duplicate_ids();
    if reassigned > 0 {
        warn!(reassigned, "quote repeated section ids; later sections were given new ids");
    }
    let pruned = document.job_data.prune_dangling_references();
    if pruned > 0 {
        warn!(pruned, "quote referenced sections it does not contain");
    }
    document.job_data.refresh_totals();

    if document.date.trim().is_empty() {
        document.date = if document.job_data.date.trim().is_empty() {
            today()
        } else {
            document.job_data.date.clone()
        };
    }

    info!(
        quote = %document.quote_number,
        sections = document.job_data.sections.len(),
        "imported quote document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{job_base_total, JobStore, LineItem, SectionTemplate};

    #[test]
    fn export_then_import_preserves_totals() {
        let mut store = JobStore::default();
        let id = store.add_section("Main", Some(SectionTemplate::MainlinePaving));
        store.set_markup(&id, 12.0).unwrap();
        let document = QuoteDocument::new(store.job().clone(), "Q-1001", "2024-05-01");

        let json = export_json(&document).unwrap();
        assert!(json.contains("\"jobData\""));
        assert!(json.contains("\"quoteNumber\": \"Q-1001\""));

        let imported = import_json(&json).unwrap();
        assert_eq!(imported, document);
    }

    #[test]
    fn lenient_fields_and_stale_totals_are_repaired() {
        let input = r#"{
            "jobData": {
                "projectName": "Lot B",
                "sections": [{
                    "id": "s1",
                    "name": "Lot",
                    "area": "2,000",
                    "materials": [{"name": "Hot Mix", "quantity": "10", "unit": "tons", "rate": "abc", "total": 999}],
                    "labor": [{"name": "Crew", "quantity": 2, "hours": "8", "rate": 40, "total": 1}]
                }],
                "selectedSections": ["s1", "gone"],
                "markups": {"s1": "10", "gone": 5},
                "mobilization": {"enabled": "true", "numTrucks": "0", "tripType": "round-trip"}
            },
            "quoteNumber": "Q-7"
        }"#;
        let document = import_json(input).unwrap();
        let job = &document.job_data;
        let section = &job.sections[0];

        assert_eq!(section.area, 2000.0);
        assert_eq!(section.materials[0].total(), 0.0);
        assert_eq!(section.labor[0].total(), 640.0);
        assert_eq!(job.selected_sections.len(), 1);
        assert_eq!(job.markups.get("s1"), Some(&10.0));
        assert!(job.mobilization.enabled);
        assert_eq!(job.mobilization.num_trucks, 1);
        assert!(!document.date.is_empty());
        // 640 labor + 2040 mobilization (one truck, round trip, one section)
        assert!((job_base_total(job) - 2680.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_section_ids_are_split_apart() {
        let input = r#"{
            "jobData": {
                "sections": [
                    {"id": "s1", "name": "Front", "labor": [{"quantity": 1, "hours": 1, "rate": 100}]},
                    {"id": "s1", "name": "Back", "labor": [{"quantity": 1, "hours": 1, "rate": 200}]}
                ],
                "selectedSections": ["s1"],
                "markups": {"s1": 10}
            }
        }"#;
        let document = import_json(input).unwrap();
        let job = &document.job_data;

        assert_eq!(job.sections[0].id(), "s1");
        assert_ne!(job.sections[1].id(), "s1");
        assert!(!job.is_selected(job.sections[1].id()));
        assert!(job.markups.get(job.sections[1].id()).is_none());
        assert!((job_base_total(job) - 100.0).abs() < 1e-9);

        let mut store = JobStore::from_job(document.job_data);
        store.remove_section("s1").unwrap();
        assert_eq!(store.job().sections.len(), 1);
        assert_eq!(store.job().sections[0].name, "Back");
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(matches!(
            import_json(r#"{"quoteNumber": "Q-1"}"#),
            Err(ImportError::Json(_))
        ));
        assert!(matches!(import_json("not json"), Err(ImportError::Json(_))));
        assert!(matches!(
            import_json(r#"{"jobData": {"sections": [{"materials": [{"unit": "barrels"}]}]}}"#),
            Err(ImportError::Json(_))
        ));
    }
}
