/*!
 * Core document model types for XLIFF translation.
 *
 * A `Document` is built once by the parser. Afterwards only the `target`
 * side of each translation unit is mutated; `source` stays exactly as parsed.
 */

use serde::{Deserialize, Serialize};

/// Parsed XLIFF document: an ordered list of `<file>` elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Files in document order
    pub files: Vec<FileUnit>,
}

impl Document {
    /// Create a document from its files.
    pub fn new(files: Vec<FileUnit>) -> Self {
        Self { files }
    }

    /// Iterate over every translation unit in traversal order.
    pub fn units(&self) -> impl Iterator<Item = &TranslationUnit> {
        self.files.iter().flat_map(|file| file.units.iter())
    }

    /// Total number of translation units across all files.
    pub fn unit_count(&self) -> usize {
        self.files.iter().map(|file| file.units.len()).sum()
    }

    /// Reset every unit's target to a deep copy of its source.
    ///
    /// After this call every target has exactly the placeholders of its
    /// source, in the same order.
    pub fn copy_source_to_target(&mut self) {
        for file in &mut self.files {
            for unit in &mut file.units {
                unit.reset_target();
            }
        }
    }

    /// Look up a unit by file and unit position.
    pub fn unit_mut(&mut self, file_index: usize, unit_index: usize) -> Option<&mut TranslationUnit> {
        self.files
            .get_mut(file_index)
            .and_then(|file| file.units.get_mut(unit_index))
    }
}

/// A `<file>` element with its attributes and translation units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUnit {
    /// `original` attribute: name of the source file
    pub original: Option<String>,

    /// `datatype` attribute
    pub datatype: Option<String>,

    /// `source-language` attribute
    pub source_language: Option<String>,

    /// `target-language` attribute
    pub target_language: Option<String>,

    /// Translation units in document order
    pub units: Vec<TranslationUnit>,
}

impl FileUnit {
    /// Create an empty file with the given `original` name.
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: Some(original.into()),
            ..Default::default()
        }
    }

    /// Set the language pair.
    pub fn with_languages(mut self, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        self.source_language = Some(source_language.into());
        self.target_language = Some(target_language.into());
        self
    }

    /// Set the datatype.
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    /// Append a unit.
    pub fn with_unit(mut self, unit: TranslationUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Find a unit by id.
    pub fn unit(&self, id: &str) -> Option<&TranslationUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }
}

/// A `<trans-unit>`: paired source and target containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Unit id, unique within its file
    pub id: String,

    source: TextContainer,

    target: TextContainer,
}

impl TranslationUnit {
    /// Create a unit from its parsed parts.
    pub fn new(id: impl Into<String>, source: TextContainer, target: TextContainer) -> Self {
        Self {
            id: id.into(),
            source,
            target,
        }
    }

    /// Create a unit with an empty target.
    pub fn from_source(id: impl Into<String>, source: TextContainer) -> Self {
        Self::new(id, source, TextContainer::default())
    }

    /// The source container, immutable once parsed.
    pub fn source(&self) -> &TextContainer {
        &self.source
    }

    /// The target container.
    pub fn target(&self) -> &TextContainer {
        &self.target
    }

    /// Mutable access to the target container.
    pub fn target_mut(&mut self) -> &mut TextContainer {
        &mut self.target
    }

    /// Borrow the source and the mutable target at the same time.
    pub fn split_mut(&mut self) -> (&TextContainer, &mut TextContainer) {
        (&self.source, &mut self.target)
    }

    /// Overwrite the target with a deep copy of the source.
    ///
    /// Whatever markup the target held before is discarded.
    pub fn reset_target(&mut self) {
        self.target = self.source.clone();
    }
}

/// Content of a `<source>` or `<target>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContainer {
    /// Leading text of the element, trimmed
    pub text: Option<String>,

    /// Direct `<g>` children in document order
    pub placeholders: Vec<PlaceholderSpan>,
}

impl TextContainer {
    /// Container holding only text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            placeholders: Vec::new(),
        }
    }

    /// Append a placeholder span.
    pub fn with_placeholder(mut self, placeholder: PlaceholderSpan) -> Self {
        self.placeholders.push(placeholder);
        self
    }

    /// True when there is neither text nor any placeholder.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.placeholders.is_empty()
    }

    /// First placeholder with the given id (case-sensitive).
    pub fn placeholder(&self, id: &str) -> Option<&PlaceholderSpan> {
        self.placeholders.iter().find(|placeholder| placeholder.id == id)
    }

    /// Mutable lookup of the first placeholder with the given id.
    pub fn placeholder_mut(&mut self, id: &str) -> Option<&mut PlaceholderSpan> {
        self.placeholders.iter_mut().find(|placeholder| placeholder.id == id)
    }

    /// Placeholder ids in order.
    pub fn placeholder_ids(&self) -> Vec<&str> {
        self.placeholders.iter().map(|placeholder| placeholder.id.as_str()).collect()
    }
}

/// An inline `<g>` span.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderSpan {
    /// Span id, unique within its container
    pub id: String,

    /// Markup category, carried through untouched
    pub ctype: Option<String>,

    /// All descendant text of the span, trimmed
    pub text: String,
}

impl PlaceholderSpan {
    /// Create a span.
    pub fn new(id: impl Into<String>, ctype: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ctype: ctype.map(str::to_string),
            text: text.into(),
        }
    }
}
