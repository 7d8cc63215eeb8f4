//! Cost aggregation over a [`Job`].
//!
//! Every figure shown on screen, in a quote sheet or in an export comes out of
//! these functions. They never fail and never return NaN or infinity:
//! non-finite or negative inputs count as zero.

use serde::Serialize;

use super::entities::{Billing, Job, LineItem, Section, SectionId};
use crate::util::finite_or_zero;

/// Flat cost of moving one truck to the site, one way.
pub const MOBILIZATION_BASE_COST: f64 = 1020.0;

fn amount(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

/// `quantity * hours * rate` for hourly items, `quantity * rate` for materials.
pub fn line_item_total<T: LineItem + ?Sized>(item: &T) -> f64 {
    let quantity = amount(item.quantity());
    let rate = amount(item.rate());
    let total = match item.billing() {
        Billing::Hourly { hours } => quantity * amount(hours) * rate,
        Billing::PerUnit => quantity * rate,
    };
    finite_or_zero(total)
}

pub fn category_total<T: LineItem>(items: &[T]) -> f64 {
    items.iter().map(line_item_total).fold(0.0, |acc, total| acc + total)
}

/// Full mobilization charge for the job's truck count and trip type.
pub fn mobilization_full_charge(job: &Job) -> f64 {
    let policy = &job.mobilization;
    MOBILIZATION_BASE_COST * f64::from(policy.num_trucks.max(1)) * policy.trip_type.multiplier()
}

/// Mobilization charged to one section.
///
/// Section-specific mode charges the full amount to each flagged section.
/// Otherwise the full amount is split evenly across the selected sections;
/// with nothing selected there is nothing to split and the share is 0.
pub fn mobilization_cost(section: &Section, job: &Job) -> f64 {
    let policy = &job.mobilization;
    if !policy.enabled {
        return 0.0;
    }

    let full = mobilization_full_charge(job);
    if policy.section_specific {
        return if policy.is_flagged(section.id()) {
            full
        } else {
            0.0
        };
    }

    match job.selected_count() {
        0 => 0.0,
        count => full / count as f64,
    }
}

/// Category totals plus mobilization. Never includes markup.
pub fn section_base_total(section: &Section, job: &Job) -> f64 {
    category_total(&section.equipment)
        + category_total(&section.labor)
        + category_total(&section.materials)
        + category_total(&section.trucking)
        + mobilization_cost(section, job)
}

/// Markup percentage recorded for a section, 0 when absent or invalid.
pub fn markup_pct(job: &Job, section_id: &str) -> f64 {
    job.markups.get(section_id).copied().map(amount).unwrap_or(0.0)
}

pub fn section_total_with_markup(section: &Section, job: &Job) -> f64 {
    section_base_total(section, job) * (1.0 + markup_pct(job, section.id()) / 100.0)
}

/// Sum of base totals over the selected sections only.
pub fn job_base_total(job: &Job) -> f64 {
    job.selected()
        .map(|section| section_base_total(section, job))
        .fold(0.0, |acc, total| acc + total)
}

pub fn job_total_with_markup(job: &Job) -> f64 {
    job.selected()
        .map(|section| section_total_with_markup(section, job))
        .fold(0.0, |acc, total| acc + total)
}

/// Every figure a section contributes to a quote or export row.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBreakdown {
    pub section_id: SectionId,
    pub name: String,
    pub area: f64,
    pub tons: f64,
    pub equipment: f64,
    pub labor: f64,
    pub materials: f64,
    pub trucking: f64,
    pub mobilization: f64,
    pub base_total: f64,
    pub markup_pct: f64,
    pub markup_amount: f64,
    pub total_with_markup: f64,
}

pub fn section_breakdown(section: &Section, job: &Job) -> SectionBreakdown {
    let equipment = category_total(&section.equipment);
    let labor = category_total(&section.labor);
    let materials = category_total(&section.materials);
    let trucking = category_total(&section.trucking);
    let mobilization = mobilization_cost(section, job);
    let base_total = equipment + labor + materials + trucking + mobilization;
    let markup_pct = markup_pct(job, section.id());
    let markup_amount = base_total * markup_pct / 100.0;

    SectionBreakdown {
        section_id: section.id().to_string(),
        name: section.name.clone(),
        area: amount(section.area),
        tons: amount(section.tons),
        equipment,
        labor,
        materials,
        trucking,
        mobilization,
        base_total,
        markup_pct,
        markup_amount,
        total_with_markup: base_total + markup_amount,
    }
}

/// Job-level view over the selected sections, in display order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub sections: Vec<SectionBreakdown>,
    pub base_total: f64,
    pub markup_amount: f64,
    pub total_with_markup: f64,
    pub mobilization_total: f64,
    pub total_area: f64,
    pub total_tons: f64,
}

pub fn job_summary(job: &Job) -> JobSummary {
    let sections: Vec<SectionBreakdown> = job
        .selected()
        .map(|section| section_breakdown(section, job))
        .collect();

    let mut summary = JobSummary::default();
    for row in &sections {
        summary.base_total += row.base_total;
        summary.markup_amount += row.markup_amount;
        summary.total_with_markup += row.total_with_markup;
        summary.mobilization_total += row.mobilization;
        summary.total_area += row.area;
        summary.total_tons += row.tons;
    }
    summary.sections = sections;
    summary
}

/// Two-decimal figure for exports, e.g. `1234.50`.
pub fn format_amount(value: f64) -> String {
    let rounded = (finite_or_zero(value) * 100.0).round() / 100.0;
    // Avoid printing "-0.00".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}

/// Currency for display, e.g. `$12,345.67`.
pub fn format_money(value: f64) -> String {
    let formatted = format_amount(value);
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (whole, cents) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, ch) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        EquipmentItem, HourlyItem, MaterialItem, MaterialUnit, MobilizationPolicy, TripType,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.005
    }

    fn job_with(sections: Vec<Section>) -> Job {
        let mut job = Job::default();
        for section in &sections {
            job.selected_sections.insert(section.id().to_string());
        }
        job.sections = sections;
        job
    }

    fn priced_section(name: &str) -> Section {
        let mut section = Section::new(name);
        section.equipment.push(EquipmentItem::new("Paver", 1.0, 4.0, 250.0));
        section.labor.push(HourlyItem::new("Crew", 2.0, 10.0, 100.0));
        section
            .materials
            .push(MaterialItem::new("Hot Mix", 30.0, MaterialUnit::Tons, 100.0));
        section.trucking.push(HourlyItem::new("Tri-axle", 1.0, 10.0, 150.0));
        section
    }

    #[test]
    fn line_totals_follow_category_formula() {
        assert_eq!(line_item_total(&HourlyItem::new("Crew", 3.0, 8.0, 40.0)), 960.0);
        assert_eq!(
            line_item_total(&MaterialItem::new("Tack", 50.0, MaterialUnit::Gallons, 4.5)),
            225.0
        );
        assert_eq!(line_item_total(&HourlyItem::new("Crew", f64::NAN, 8.0, 40.0)), 0.0);
        assert_eq!(line_item_total(&HourlyItem::new("Crew", 1.0, f64::INFINITY, 40.0)), 0.0);
        assert_eq!(line_item_total(&HourlyItem::new("Crew", -1.0, 8.0, 40.0)), 0.0);
    }

    #[test]
    fn empty_category_is_zero() {
        let items: Vec<HourlyItem> = Vec::new();
        assert_eq!(category_total(&items), 0.0);
        assert!(category_total(&items).is_sign_positive());

        let job = Job::default();
        assert!(job_base_total(&job).is_sign_positive());
        assert!(job_total_with_markup(&job).is_sign_positive());
        assert_eq!(format_money(job_base_total(&job)), "$0.00");
    }

    #[test]
    fn base_total_excludes_markup() {
        let mut section = Section::new("Mainline");
        section.equipment.push(EquipmentItem::new("Equipment", 1.0, 1.0, 1000.0));
        section.labor.push(HourlyItem::new("Labor", 1.0, 1.0, 2000.0));
        section
            .materials
            .push(MaterialItem::new("Materials", 1.0, MaterialUnit::Each, 3000.0));
        section.trucking.push(HourlyItem::new("Trucking", 1.0, 1.0, 1500.0));
        let id = section.id().to_string();
        let mut job = job_with(vec![section]);
        job.markups.insert(id, 10.0);

        let section = &job.sections[0];
        assert!(close(section_base_total(section, &job), 7500.0));
        assert!(close(section_total_with_markup(section, &job), 8250.0));
        assert!(close(job_base_total(&job), 7500.0));
        assert!(close(job_total_with_markup(&job), 8250.0));
    }

    #[test]
    fn markup_ratio_holds_for_nonzero_base() {
        let section = priced_section("A");
        let id = section.id().to_string();
        let mut job = job_with(vec![section]);
        job.markups.insert(id, 17.5);
        let section = &job.sections[0];
        let ratio = section_total_with_markup(section, &job) / section_base_total(section, &job);
        assert!((ratio - 1.175).abs() < 1e-9);
    }

    #[test]
    fn negative_or_missing_markup_counts_as_zero() {
        let section = priced_section("A");
        let id = section.id().to_string();
        let mut job = job_with(vec![section]);
        job.markups.insert(id.clone(), -25.0);
        assert_eq!(markup_pct(&job, &id), 0.0);
        assert_eq!(markup_pct(&job, "missing"), 0.0);
    }

    #[test]
    fn uniform_mobilization_splits_across_selected_sections() {
        let mut job = job_with(vec![priced_section("A"), priced_section("B"), priced_section("C")]);
        let unselected = job.sections[2].id().to_string();
        job.selected_sections.remove(&unselected);
        job.mobilization = MobilizationPolicy {
            enabled: true,
            ..MobilizationPolicy::default()
        };

        assert!(close(mobilization_cost(&job.sections[0], &job), 510.0));
        assert!(close(mobilization_cost(&job.sections[1], &job), 510.0));
    }

    #[test]
    fn uniform_mobilization_with_nothing_selected_is_zero() {
        let mut job = job_with(vec![priced_section("A")]);
        job.selected_sections.clear();
        job.mobilization.enabled = true;
        assert_eq!(mobilization_cost(&job.sections[0], &job), 0.0);
    }

    #[test]
    fn section_specific_mobilization_charges_flagged_sections_in_full() {
        let mut job = job_with(vec![priced_section("A"), priced_section("B")]);
        let a = job.sections[0].id().to_string();
        let mut policy = MobilizationPolicy {
            enabled: true,
            section_specific: true,
            num_trucks: 2,
            trip_type: TripType::RoundTrip,
            ..MobilizationPolicy::default()
        };
        policy.section_mobilization.insert(a, true);
        job.mobilization = policy;

        assert!(close(mobilization_cost(&job.sections[0], &job), 4080.0));
        assert_eq!(mobilization_cost(&job.sections[1], &job), 0.0);
    }

    #[test]
    fn disabled_mobilization_ignores_flags() {
        let mut job = job_with(vec![priced_section("A")]);
        let a = job.sections[0].id().to_string();
        job.mobilization.section_specific = true;
        job.mobilization.section_mobilization.insert(a, true);
        assert_eq!(mobilization_cost(&job.sections[0], &job), 0.0);
    }

    #[test]
    fn deselecting_removes_contribution_entirely() {
        let mut job = job_with(vec![priced_section("A"), priced_section("B")]);
        let both = job_base_total(&job);
        let b = job.sections[1].id().to_string();
        job.selected_sections.remove(&b);

        let only_a = job_base_total(&job);
        assert!(only_a < both);
        assert!(close(only_a, section_base_total(&job.sections[0], &job)));
        assert_eq!(job_summary(&job).sections.len(), 1);
        assert!(job_total_with_markup(&job) <= both);
    }

    #[test]
    fn summary_matches_engine_totals() {
        let mut job = job_with(vec![priced_section("A"), priced_section("B")]);
        job.sections[0].area = 1000.0;
        job.sections[0].tons = 12.08;
        let a = job.sections[0].id().to_string();
        job.markups.insert(a, 10.0);
        job.mobilization.enabled = true;

        let summary = job_summary(&job);
        assert!(close(summary.base_total, job_base_total(&job)));
        assert!(close(summary.total_with_markup, job_total_with_markup(&job)));
        assert!(close(summary.mobilization_total, MOBILIZATION_BASE_COST));
        assert!(close(summary.total_area, 1000.0));
        let row = &summary.sections[0];
        assert!(close(row.markup_amount, row.base_total * 0.1));
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_amount(f64::NAN), "0.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(999.0), "$999.00");
        assert_eq!(format_money(-1500.0), "-$1,500.00");
        assert_eq!(format_money(f64::INFINITY), "$0.00");
    }
}
