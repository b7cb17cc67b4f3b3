/*!
 * Writes batch results back into the document.
 */

use log::warn;

use super::planner::{Destination, WorkItem};
use crate::xliff::Document;

/// Outcome of `apply_translations`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// Translations written into a target
    pub applied: usize,
    /// Translations with no place to go
    pub skipped: usize,
}

/// Pair each work item with its translation and write it to the destination.
///
/// Items and translations are zipped in order. A length mismatch or a
/// destination that no longer exists is logged and skipped.
pub fn apply_translations(document: &mut Document, items: &[WorkItem], translations: Vec<String>) -> RemapReport {
    let mut report = RemapReport::default();

    if items.len() != translations.len() {
        warn!(
            "Received {} translations for {} fragments; extra entries are ignored",
            translations.len(),
            items.len()
        );
        report.skipped += items.len().abs_diff(translations.len());
    }

    for (item, translation) in items.iter().zip(translations) {
        let unit_ref = item.destination.unit();
        let Some(unit) = document.unit_mut(unit_ref.file, unit_ref.unit) else {
            warn!("No translation unit at file {} position {}", unit_ref.file, unit_ref.unit);
            report.skipped += 1;
            continue;
        };

        match &item.destination {
            Destination::UnitText { .. } => {
                unit.target_mut().text = Some(translation);
                report.applied += 1;
            }
            Destination::Placeholder { placeholder_id, .. } => {
                match unit.target_mut().placeholder_mut(placeholder_id) {
                    Some(span) => {
                        span.text = translation;
                        report.applied += 1;
                    }
                    None => {
                        warn!("Unit '{}' has no target placeholder '{}'", unit.id, placeholder_id);
                        report.skipped += 1;
                    }
                }
            }
        }
    }

    report
}
