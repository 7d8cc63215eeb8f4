//! Estimating domain: job model, cost engine and editing session.

pub mod conversions;
pub mod engine;
pub mod entities;
pub mod job_store;
pub mod settings;
pub mod templates;

pub use conversions::{
    area_from_tons, default_mix, find_mix, tons_from_area, AsphaltMix, DEFAULT_DENSITY_PCF, MIXES,
};
pub use engine::{
    category_total, format_amount, format_money, job_base_total, job_summary,
    job_total_with_markup, line_item_total, markup_pct, mobilization_cost, section_base_total,
    section_breakdown, section_total_with_markup, JobSummary, SectionBreakdown,
    MOBILIZATION_BASE_COST,
};
pub use entities::{
    ContactInfo, EquipmentItem, HourlyItem, Job, LineCategory, LineItem, MaterialItem,
    MaterialUnit, MobilizationPolicy, Section, SectionId, TripType,
};
pub use job_store::{JobStore, PersistedJob, StoreError};
pub use settings::EstimatorSettings;
pub use templates::SectionTemplate;
