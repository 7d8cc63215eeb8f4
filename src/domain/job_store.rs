//! The editing session's single owner of the job being estimated.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::conversions::tons_from_area;
use super::engine::{self, JobSummary};
use super::entities::{
    EquipmentItem, HourlyItem, Job, LineCategory, LineItem, MaterialItem, MobilizationPolicy,
    Section, SectionId,
};
use super::settings::EstimatorSettings;
use super::templates::SectionTemplate;
use crate::util::finite_or_zero;
use crate::util::lenient::parse_number;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
    #[error("no {category} item at index {index}")]
    ItemIndex {
        category: &'static str,
        index: usize,
    },
}

/// Snapshot written through the persistence port.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedJob {
    pub job: Job,
    #[serde(default)]
    pub quote_number: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct JobStore {
    job: Job,
    quote_number: Option<String>,
    default_markup_pct: f64,
}

impl JobStore {
    /// A blank job carrying the user's default terms, contact and truck count.
    pub fn new(settings: &EstimatorSettings) -> Self {
        let mut job = Job {
            terms: settings.default_terms.clone(),
            contact_info: settings.company_contact.clone(),
            ..Job::default()
        };
        job.mobilization.num_trucks = settings.default_num_trucks.max(1);
        if settings.default_markup_pct > 0.0 {
            job.default_markup = settings.default_markup_pct.to_string();
        }

        Self {
            job,
            quote_number: None,
            default_markup_pct: finite_or_zero(settings.default_markup_pct).max(0.0),
        }
    }

    pub fn from_job(job: Job) -> Self {
        let mut store = Self::default();
        store.replace_job(job);
        store
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn into_job(self) -> Job {
        self.job
    }

    pub fn quote_number(&self) -> Option<&str> {
        self.quote_number.as_deref()
    }

    pub fn set_quote_number(&mut self, quote_number: impl Into<String>) {
        self.quote_number = Some(quote_number.into());
    }

    /// Swaps in a job built elsewhere (e.g. an import), cleaning stale
    /// references and refreshing every cached line total.
    ///
    /// A parseable `default_markup` on the job becomes the markup applied to
    /// sections added afterwards.
    pub fn replace_job(&mut self, mut job: Job) {
        let reassigned = job.reassign_duplicate_ids();
        if reassigned > 0 {
            warn!(reassigned, "sections with repeated ids were given new ids");
        }
        let pruned = job.prune_dangling_references();
        if pruned > 0 {
            debug!(pruned, "dropped references to unknown sections");
        }
        job.refresh_totals();
        if let Some(markup_pct) = parse_number(&job.default_markup) {
            self.default_markup_pct = markup_pct.max(0.0);
        }
        self.job = job;
    }

    /// Header fields printed on the quote.
    pub fn set_details(
        &mut self,
        project_name: impl Into<String>,
        customer_name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
    ) {
        self.job.project_name = project_name.into();
        self.job.customer_name = customer_name.into();
        self.job.location = location.into();
        self.job.date = date.into();
    }

    pub fn summary(&self) -> JobSummary {
        engine::job_summary(&self.job)
    }

    /// Appends a section, pre-filled from `template` when given, and selects it.
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        template: Option<SectionTemplate>,
    ) -> SectionId {
        let name = name.into();
        let mut section = match template {
            Some(template) => template.build(),
            None => Section::new(String::new()),
        };
        if !name.trim().is_empty() {
            section.name = name;
        }

        let id = section.id().to_string();
        debug!(section = %id, name = %section.name, "section added");
        self.job.selected_sections.insert(id.clone());
        if self.default_markup_pct > 0.0 {
            self.job.markups.insert(id.clone(), self.default_markup_pct);
        }
        self.job.sections.push(section);
        id
    }

    /// Inserts a copy right after the original, keeping its selection and markup.
    pub fn duplicate_section(&mut self, id: &str) -> Result<SectionId, StoreError> {
        let position = self.position(id)?;
        let original = &self.job.sections[position];
        let copy = original.duplicate(format!("{} (copy)", original.name));
        let copy_id = copy.id().to_string();

        if self.job.is_selected(id) {
            self.job.selected_sections.insert(copy_id.clone());
        }
        if let Some(markup) = self.job.markups.get(id).copied() {
            self.job.markups.insert(copy_id.clone(), markup);
        }
        if self.job.mobilization.is_flagged(id) {
            self.job
                .mobilization
                .section_mobilization
                .insert(copy_id.clone(), true);
        }
        self.job.sections.insert(position + 1, copy);
        Ok(copy_id)
    }

    pub fn rename_section(&mut self, id: &str, name: impl Into<String>) -> Result<(), StoreError> {
        self.section_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn remove_section(&mut self, id: &str) -> Result<Section, StoreError> {
        let position = self.position(id)?;
        let removed = self.job.sections.remove(position);
        self.job.selected_sections.remove(id);
        self.job.markups.remove(id);
        self.job.mobilization.section_mobilization.remove(id);
        debug!(section = %id, "section removed");
        Ok(removed)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), StoreError> {
        self.position(id)?;
        if selected {
            self.job.selected_sections.insert(id.to_string());
        } else {
            self.job.selected_sections.remove(id);
        }
        Ok(())
    }

    pub fn set_markup(&mut self, id: &str, markup_pct: f64) -> Result<(), StoreError> {
        self.position(id)?;
        let markup_pct = finite_or_zero(markup_pct).max(0.0);
        if markup_pct == 0.0 {
            self.job.markups.remove(id);
        } else {
            self.job.markups.insert(id.to_string(), markup_pct);
        }
        Ok(())
    }

    pub fn set_area(&mut self, id: &str, area: f64) -> Result<(), StoreError> {
        self.section_mut(id)?.area = finite_or_zero(area).max(0.0);
        Ok(())
    }

    pub fn set_tons(&mut self, id: &str, tons: f64) -> Result<(), StoreError> {
        self.section_mut(id)?.tons = finite_or_zero(tons).max(0.0);
        Ok(())
    }

    /// Derives the section's tonnage from its area and returns it.
    pub fn recalculate_tons(
        &mut self,
        id: &str,
        depth_inches: f64,
        density_pcf: f64,
    ) -> Result<f64, StoreError> {
        let section = self.section_mut(id)?;
        section.tons = tons_from_area(section.area, depth_inches, density_pcf);
        Ok(section.tons)
    }

    /// Replaces the policy wholesale; flags for unknown sections are dropped.
    pub fn set_mobilization(&mut self, mut policy: MobilizationPolicy) {
        policy.num_trucks = policy.num_trucks.max(1);
        let job = &self.job;
        policy
            .section_mobilization
            .retain(|id, _| job.section(id).is_some());
        self.job.mobilization = policy;
    }

    pub fn add_equipment(&mut self, id: &str, mut item: EquipmentItem) -> Result<usize, StoreError> {
        item.refresh_total();
        let items = &mut self.section_mut(id)?.equipment;
        items.push(item);
        Ok(items.len() - 1)
    }

    pub fn add_labor(&mut self, id: &str, mut item: HourlyItem) -> Result<usize, StoreError> {
        item.refresh_total();
        let items = &mut self.section_mut(id)?.labor;
        items.push(item);
        Ok(items.len() - 1)
    }

    pub fn add_material(&mut self, id: &str, mut item: MaterialItem) -> Result<usize, StoreError> {
        item.refresh_total();
        let items = &mut self.section_mut(id)?.materials;
        items.push(item);
        Ok(items.len() - 1)
    }

    pub fn add_trucking(&mut self, id: &str, mut item: HourlyItem) -> Result<usize, StoreError> {
        item.refresh_total();
        let items = &mut self.section_mut(id)?.trucking;
        items.push(item);
        Ok(items.len() - 1)
    }

    pub fn update_equipment(
        &mut self,
        id: &str,
        index: usize,
        edit: impl FnOnce(&mut EquipmentItem),
    ) -> Result<(), StoreError> {
        let items = &mut self.section_mut(id)?.equipment;
        edit_item(items, LineCategory::Equipment, index, edit)
    }

    pub fn update_labor(
        &mut self,
        id: &str,
        index: usize,
        edit: impl FnOnce(&mut HourlyItem),
    ) -> Result<(), StoreError> {
        let items = &mut self.section_mut(id)?.labor;
        edit_item(items, LineCategory::Labor, index, edit)
    }

    pub fn update_material(
        &mut self,
        id: &str,
        index: usize,
        edit: impl FnOnce(&mut MaterialItem),
    ) -> Result<(), StoreError> {
        let items = &mut self.section_mut(id)?.materials;
        edit_item(items, LineCategory::Materials, index, edit)
    }

    pub fn update_trucking(
        &mut self,
        id: &str,
        index: usize,
        edit: impl FnOnce(&mut HourlyItem),
    ) -> Result<(), StoreError> {
        let items = &mut self.section_mut(id)?.trucking;
        edit_item(items, LineCategory::Trucking, index, edit)
    }

    pub fn remove_item(
        &mut self,
        id: &str,
        category: LineCategory,
        index: usize,
    ) -> Result<(), StoreError> {
        let section = self.section_mut(id)?;
        if index >= section.items_in(category) {
            return Err(StoreError::ItemIndex {
                category: category.label(),
                index,
            });
        }
        match category {
            LineCategory::Equipment => {
                section.equipment.remove(index);
            }
            LineCategory::Labor => {
                section.labor.remove(index);
            }
            LineCategory::Materials => {
                section.materials.remove(index);
            }
            LineCategory::Trucking => {
                section.trucking.remove(index);
            }
        }
        Ok(())
    }

    pub fn apply_persisted(&mut self, persisted: PersistedJob) {
        self.replace_job(persisted.job);
        self.quote_number = persisted.quote_number;
    }

    pub fn to_persisted(&self) -> PersistedJob {
        PersistedJob {
            job: self.job.clone(),
            quote_number: self.quote_number.clone(),
        }
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.job
            .sections
            .iter()
            .position(|section| section.id() == id)
            .ok_or_else(|| StoreError::UnknownSection(id.to_string()))
    }

    fn section_mut(&mut self, id: &str) -> Result<&mut Section, StoreError> {
        self.job
            .section_mut(id)
            .ok_or_else(|| StoreError::UnknownSection(id.to_string()))
    }
}

fn edit_item<T: LineItem>(
    items: &mut [T],
    category: LineCategory,
    index: usize,
    edit: impl FnOnce(&mut T),
) -> Result<(), StoreError> {
    let item = items.get_mut(index).ok_or(StoreError::ItemIndex {
        category: category.label(),
        index,
    })?;
    edit(item);
    item.refresh_total();
    Ok(())
}
