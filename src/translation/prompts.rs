/*!
 * Prompt construction and response parsing for batch translation.
 *
 * Two wire protocols are supported:
 * - `Lines`: one text per line, the reply is read back line by line
 * - `Markers`: every text is wrapped in `<<ENTRY_n>>` ... `<<END>>` markers
 *
 * Both protocols verify that the reply holds exactly one translation per input.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ProviderError;

/// Regex capturing `<<ENTRY_n>> ... <<END>>` blocks
static ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<<ENTRY_(\d+)>>(.*?)<<END>>").unwrap());

/// System prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with a `{target_language}` placeholder
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for UI string translation.
    pub const UI_TRANSLATOR: &'static str = r#"You are a professional software localizer translating user interface strings into {target_language}.

- Translate each entry independently and keep the order of entries
- Return exactly one translation per entry and nothing else
- Do not add explanations, numbering or quotes
- Keep product names, placeholders and punctuation as they are
- If an entry needs no translation, return it unchanged"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Render the template for a target language.
    pub fn render(&self, target_language: &str) -> String {
        self.template.replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Self::UI_TRANSLATOR)
    }
}

/// Wire protocol between the batch and the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptFormat {
    /// One text per line
    #[default]
    Lines,
    /// Texts wrapped in numbered entry markers
    Markers,
}

impl fmt::Display for PromptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Markers => write!(f, "markers"),
        }
    }
}

impl FromStr for PromptFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "markers" => Ok(Self::Markers),
            _ => Err(anyhow::anyhow!("Invalid prompt format: {}", s)),
        }
    }
}

/// Collapse all whitespace runs, including newlines, into single spaces.
pub fn flatten_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the user prompt for one batch.
///
/// `Lines` puts one text per line, so each text is flattened with
/// `flatten_text` first and its translation comes back as a single line.
/// Use `Markers` when line breaks inside a text must survive translation.
pub fn build_batch_prompt(texts: &[String], target_language: &str, format: PromptFormat) -> String {
    match format {
        PromptFormat::Lines => {
            let combined = texts.iter().map(|text| flatten_text(text)).collect::<Vec<_>>().join("\n");
            format!("Translate the following texts to {}:\n{}", target_language, combined)
        }
        PromptFormat::Markers => {
            let mut prompt = format!(
                "Translate the following {} entries to {}. Answer with the same markers, one block per entry:\n\n",
                texts.len(),
                target_language
            );
            for (index, text) in texts.iter().enumerate() {
                prompt.push_str(&format!("<<ENTRY_{}>>\n{}\n<<END>>\n", index + 1, text));
            }
            prompt
        }
    }
}

/// Split a model reply into exactly `expected` translations.
pub fn parse_batch_response(response: &str, expected: usize, format: PromptFormat) -> Result<Vec<String>, ProviderError> {
    let translations = match format {
        PromptFormat::Lines => response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>(),
        PromptFormat::Markers => parse_markers(response)?,
    };

    if translations.len() != expected {
        return Err(ProviderError::ResponseMismatch {
            expected,
            actual: translations.len(),
        });
    }

    Ok(translations)
}

fn parse_markers(response: &str) -> Result<Vec<String>, ProviderError> {
    let mut entries = Vec::new();
    for captures in ENTRY_REGEX.captures_iter(response) {
        let number: usize = captures[1]
            .parse()
            .map_err(|_| ProviderError::ParseError(format!("Invalid entry number: {}", &captures[1])))?;
        entries.push((number, captures[2].trim().to_string()));
    }

    entries.sort_by_key(|(number, _)| *number);
    for (position, (number, _)) in entries.iter().enumerate() {
        if *number != position + 1 {
            return Err(ProviderError::ParseError(format!(
                "Unexpected entry marker {} at position {}",
                number,
                position + 1
            )));
        }
    }

    Ok(entries.into_iter().map(|(_, text)| text).collect())
}
