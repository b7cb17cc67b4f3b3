/*!
 * Translation planning.
 *
 * Walks a document after copy-forward and decides, fragment by fragment,
 * what is sent for translation. Every fragment either becomes a `WorkItem`
 * or is written to the target verbatim; nothing is silently dropped.
 */

use serde::Serialize;

use crate::xliff::Document;

/// Position of a translation unit inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitRef {
    /// Index of the `<file>`
    pub file: usize,
    /// Index of the unit within its file
    pub unit: usize,
}

/// Where a translated fragment must be written back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// The leading text of the unit's target
    UnitText {
        /// Owning unit
        unit: UnitRef,
    },
    /// The text of a `<g>` span in the unit's target
    Placeholder {
        /// Owning unit
        unit: UnitRef,
        /// Id of the span, shared by source and target
        placeholder_id: String,
    },
}

impl Destination {
    /// Unit this destination belongs to.
    pub fn unit(&self) -> UnitRef {
        match self {
            Self::UnitText { unit } | Self::Placeholder { unit, .. } => *unit,
        }
    }
}

/// One fragment queued for translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    /// Where the translation goes
    pub destination: Destination,
    /// Source text of the fragment
    pub original: String,
}

/// Ordered work list produced by `plan_translations`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranslationPlan {
    /// Candidates in traversal order
    pub items: Vec<WorkItem>,
    /// Fragments written to the target unchanged
    pub copied_verbatim: usize,
}

impl TranslationPlan {
    /// Source texts of all work items, in order.
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.original.clone()).collect()
    }

    /// Number of work items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing needs translation.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A fragment is worth translating when it is not blank and holds at least one ASCII letter.
pub fn is_translatable(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Build the work list for a document whose targets were copied from the sources.
///
/// Order: files, then units, then the unit's own text before its
/// placeholders in source order. Fragments that are not translatable get the
/// source text written into the target directly.
pub fn plan_translations(document: &mut Document) -> TranslationPlan {
    let mut plan = TranslationPlan::default();

    for (file_index, file) in document.files.iter_mut().enumerate() {
        for (unit_index, unit) in file.units.iter_mut().enumerate() {
            let unit_ref = UnitRef {
                file: file_index,
                unit: unit_index,
            };
            let (source, target) = unit.split_mut();

            if let Some(text) = &source.text {
                if is_translatable(text) {
                    plan.items.push(WorkItem {
                        destination: Destination::UnitText { unit: unit_ref },
                        original: text.clone(),
                    });
                } else {
                    target.text = Some(text.clone());
                    plan.copied_verbatim += 1;
                }
            }

            for placeholder in &source.placeholders {
                if is_translatable(&placeholder.text) {
                    plan.items.push(WorkItem {
                        destination: Destination::Placeholder {
                            unit: unit_ref,
                            placeholder_id: placeholder.id.clone(),
                        },
                        original: placeholder.text.clone(),
                    });
                } else {
                    if let Some(span) = target.placeholder_mut(&placeholder.id) {
                        span.text = placeholder.text.clone();
                    }
                    plan.copied_verbatim += 1;
                }
            }
        }
    }

    plan
}
