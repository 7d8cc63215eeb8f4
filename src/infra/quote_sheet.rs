//! Printable plain-text quote.

use std::fmt;

use super::QuoteDocument;
use crate::domain::{format_money, job_summary, ContactInfo};
use crate::util::version::generator_line;

const WIDTH: usize = 72;

/// Renders the customer-facing quote: one line per selected section with
/// its marked-up price, followed by the grand total, notes and terms.
pub fn render_quote(document: &QuoteDocument) -> String {
    QuoteSheet(document).to_string()
}

/// Display adapter over a quote document.
pub struct QuoteSheet<'a>(pub &'a QuoteDocument);

impl fmt::Display for QuoteSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.0;
        let job = &document.job_data;
        let summary = job_summary(job);

        write_contact(f, &document.contact_info)?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "QUOTE {:>width$}", document.quote_number, width = WIDTH - 6)?;
        writeln!(f, "Date: {}", document.date)?;
        for (label, value) in [
            ("Customer", &job.customer_name),
            ("Project", &job.project_name),
            ("Location", &job.location),
        ] {
            if !value.is_empty() {
                writeln!(f, "{label}: {value}")?;
            }
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;

        writeln!(
            f,
            "{:<32} {:>12} {:>8} {:>17}",
            "Section", "Area (sq ft)", "Tons", "Price"
        )?;
        for row in &summary.sections {
            writeln!(
                f,
                "{:<32} {:>12.0} {:>8.2} {:>17}",
                truncate(&row.name, 32),
                row.area,
                row.tons,
                format_money(row.total_with_markup)
            )?;
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(
            f,
            "{:<32} {:>12.0} {:>8.2} {:>17}",
            "TOTAL",
            summary.total_area,
            summary.total_tons,
            format_money(summary.total_with_markup)
        )?;

        if !job.notes.trim().is_empty() {
            writeln!(f, "\nNotes:\n{}", job.notes.trim())?;
        }
        if !job.terms.trim().is_empty() {
            writeln!(f, "\nTerms:\n{}", job.terms.trim())?;
        }
        writeln!(f, "\n{}", generator_line())
    }
}

fn write_contact(f: &mut fmt::Formatter<'_>, contact: &ContactInfo) -> fmt::Result {
    if contact.is_empty() {
        return Ok(());
    }
    for line in [&contact.company, &contact.name, &contact.position] {
        if !line.trim().is_empty() {
            writeln!(f, "{line}")?;
        }
    }
    let reach: Vec<&str> = [contact.phone.as_str(), contact.email.as_str()]
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect();
    if !reach.is_empty() {
        writeln!(f, "{}", reach.join(" | "))?;
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max - 1).collect();
        cut.push('~');
        cut
    }
}
