use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::util::{generate_id, lenient};

/// Identifier assigned to a section when it is created.
pub type SectionId = String;

/// The four cost categories every section carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCategory {
    Equipment,
    Labor,
    Materials,
    Trucking,
}

impl LineCategory {
    pub const ALL: [LineCategory; 4] = [
        LineCategory::Equipment,
        LineCategory::Labor,
        LineCategory::Materials,
        LineCategory::Trucking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Equipment => "Equipment",
            Self::Labor => "Labor",
            Self::Materials => "Materials",
            Self::Trucking => "Trucking",
        }
    }
}

/// How a line item is billed, which decides its total formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Billing {
    /// quantity x hours x rate
    Hourly { hours: f64 },
    /// quantity x rate
    PerUnit,
}

/// Common view over the per-category line item shapes.
///
/// The cached `total` is only ever written through `refresh_total`, which
/// every setter calls; the engine itself recomputes from the raw fields.
pub trait LineItem {
    fn name(&self) -> &str;
    fn quantity(&self) -> f64;
    fn rate(&self) -> f64;
    fn billing(&self) -> Billing;
    /// Cached total as last stored on the item.
    fn total(&self) -> f64;
    fn refresh_total(&mut self);
}

macro_rules! cached_total_setters {
    ($ty:ty) => {
        impl $ty {
            pub fn set_quantity(&mut self, quantity: f64) {
                self.quantity = quantity;
                self.refresh_total();
            }

            pub fn set_rate(&mut self, rate: f64) {
                self.rate = rate;
                self.refresh_total();
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hours: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate: f64,
    /// Informational only; has no effect on the total.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub includes_operator: bool,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    total: f64,
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>, quantity: f64, hours: f64, rate: f64) -> Self {
        let mut item = Self {
            name: name.into(),
            quantity,
            hours,
            rate,
            includes_operator: false,
            total: 0.0,
        };
        item.refresh_total();
        item
    }

    pub fn with_operator(mut self, includes_operator: bool) -> Self {
        self.includes_operator = includes_operator;
        self
    }

    pub fn set_hours(&mut self, hours: f64) {
        self.hours = hours;
        self.refresh_total();
    }
}

cached_total_setters!(EquipmentItem);

impl LineItem for EquipmentItem {
    fn name(&self) -> &str {
        &self.name
    }
    fn quantity(&self) -> f64 {
        self.quantity
    }
    fn rate(&self) -> f64 {
        self.rate
    }
    fn billing(&self) -> Billing {
        Billing::Hourly { hours: self.hours }
    }
    fn total(&self) -> f64 {
        self.total
    }
    fn refresh_total(&mut self) {
        self.total = super::engine::line_item_total(&*self);
    }
}

/// Labor and trucking entries share the hourly shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlyItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hours: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    total: f64,
}

impl HourlyItem {
    pub fn new(name: impl Into<String>, quantity: f64, hours: f64, rate: f64) -> Self {
        let mut item = Self {
            name: name.into(),
            quantity,
            hours,
            rate,
            total: 0.0,
        };
        item.refresh_total();
        item
    }

    pub fn set_hours(&mut self, hours: f64) {
        self.hours = hours;
        self.refresh_total();
    }
}

cached_total_setters!(HourlyItem);

impl LineItem for HourlyItem {
    fn name(&self) -> &str {
        &self.name
    }
    fn quantity(&self) -> f64 {
        self.quantity
    }
    fn rate(&self) -> f64 {
        self.rate
    }
    fn billing(&self) -> Billing {
        Billing::Hourly { hours: self.hours }
    }
    fn total(&self) -> f64 {
        self.total
    }
    fn refresh_total(&mut self) {
        self.total = super::engine::line_item_total(&*self);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialUnit {
    #[default]
    Tons,
    Yards,
    Gallons,
    Lbs,
    Each,
    Feet,
}

impl MaterialUnit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tons => "tons",
            Self::Yards => "yards",
            Self::Gallons => "gallons",
            Self::Lbs => "lbs",
            Self::Each => "each",
            Self::Feet => "feet",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: MaterialUnit,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    total: f64,
}

impl MaterialItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit: MaterialUnit, rate: f64) -> Self {
        let mut item = Self {
            name: name.into(),
            quantity,
            unit,
            rate,
            total: 0.0,
        };
        item.refresh_total();
        item
    }
}

cached_total_setters!(MaterialItem);

impl LineItem for MaterialItem {
    fn name(&self) -> &str {
        &self.name
    }
    fn quantity(&self) -> f64 {
        self.quantity
    }
    fn rate(&self) -> f64 {
        self.rate
    }
    fn billing(&self) -> Billing {
        Billing::PerUnit
    }
    fn total(&self) -> f64 {
        self.total
    }
    fn refresh_total(&mut self) {
        self.total = super::engine::line_item_total(&*self);
    }
}

/// One scope-of-work block within a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default = "new_section_id")]
    id: SectionId,
    #[serde(default)]
    pub name: String,
    /// Square feet.
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub area: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub tons: f64,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default)]
    pub labor: Vec<HourlyItem>,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    #[serde(default)]
    pub trucking: Vec<HourlyItem>,
}

fn new_section_id() -> SectionId {
    generate_id("section")
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_section_id(),
            name: name.into(),
            area: 0.0,
            tons: 0.0,
            equipment: Vec::new(),
            labor: Vec::new(),
            materials: Vec::new(),
            trucking: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Copy of this section under a fresh id.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: new_section_id(),
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn items_in(&self, category: LineCategory) -> usize {
        match category {
            LineCategory::Equipment => self.equipment.len(),
            LineCategory::Labor => self.labor.len(),
            LineCategory::Materials => self.materials.len(),
            LineCategory::Trucking => self.trucking.len(),
        }
    }

    pub fn item_count(&self) -> usize {
        LineCategory::ALL
            .iter()
            .map(|category| self.items_in(*category))
            .sum()
    }

    pub fn refresh_totals(&mut self) {
        self.equipment.iter_mut().for_each(LineItem::refresh_total);
        self.labor.iter_mut().for_each(LineItem::refresh_total);
        self.materials.iter_mut().for_each(LineItem::refresh_total);
        self.trucking.iter_mut().for_each(LineItem::refresh_total);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub position: String,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.phone,
            &self.email,
            &self.company,
            &self.position,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
}

impl TripType {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::OneWay => 1.0,
            Self::RoundTrip => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneWay => "one-way",
            Self::RoundTrip => "round-trip",
        }
    }
}

/// Job-wide mobilization fee configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilizationPolicy {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub section_specific: bool,
    #[serde(default = "one_truck", deserialize_with = "lenient::count_at_least_one")]
    pub num_trucks: u32,
    #[serde(default)]
    pub trip_type: TripType,
    /// Only consulted when `section_specific` is set.
    #[serde(default, deserialize_with = "lenient::flag_map")]
    pub section_mobilization: BTreeMap<SectionId, bool>,
}

fn one_truck() -> u32 {
    1
}

impl Default for MobilizationPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            section_specific: false,
            num_trucks: 1,
            trip_type: TripType::OneWay,
            section_mobilization: BTreeMap::new(),
        }
    }
}

impl MobilizationPolicy {
    pub fn is_flagged(&self, section_id: &str) -> bool {
        self.section_mobilization
            .get(section_id)
            .copied()
            .unwrap_or(false)
    }
}

/// The top-level estimate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub terms: String,
    /// Free-form, as typed into the job header.
    #[serde(default, deserialize_with = "lenient::text")]
    pub default_markup: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub mobilization: MobilizationPolicy,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub selected_sections: BTreeSet<SectionId>,
    #[serde(default, deserialize_with = "lenient::number_map")]
    pub markups: BTreeMap<SectionId, f64>,
}

impl Job {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_sections.contains(id)
    }

    /// Selected sections in display order.
    pub fn selected(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |section| self.is_selected(&section.id))
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    pub fn refresh_totals(&mut self) {
        self.sections.iter_mut().for_each(Section::refresh_totals);
    }

    /// Gives a fresh id to every section whose id is blank or repeats an
    /// earlier one. References keep pointing at the first holder of an id,
    /// so the renamed sections start unselected, unmarked and unflagged.
    /// Returns how many sections were renamed.
    pub fn reassign_duplicate_ids(&mut self) -> usize {
        let mut seen = BTreeSet::new();
        let mut reassigned = 0;
        for section in &mut self.sections {
            if section.id.trim().is_empty() || !seen.insert(section.id.clone()) {
                section.id = new_section_id();
                seen.insert(section.id.clone());
                reassigned += 1;
            }
        }
        reassigned
    }

    /// Drops selections, markups and mobilization flags that point at
    /// sections the job no longer has. Returns how many entries were removed.
    pub fn prune_dangling_references(&mut self) -> usize {
        let known: BTreeSet<SectionId> = self.sections.iter().map(|s| s.id.clone()).collect();
        let before = self.selected_sections.len()
            + self.markups.len()
            + self.mobilization.section_mobilization.len();

        self.selected_sections.retain(|id| known.contains(id));
        self.markups.retain(|id, _| known.contains(id));
        self.mobilization
            .section_mobilization
            .retain(|id, _| known.contains(id));

        let after = self.selected_sections.len()
            + self.markups.len()
            + self.mobilization.section_mobilization.len();
        before - after
    }
}
