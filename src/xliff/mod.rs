/*!
 * XLIFF 1.2 document handling.
 *
 * - `model`: in-memory document tree (files, translation units, text containers)
 * - `parser`: XML text to `Document`
 * - `serializer`: `Document` back to pretty-printed XLIFF
 */

pub mod model;
pub mod parser;
pub mod serializer;

pub use self::model::{Document, FileUnit, PlaceholderSpan, TextContainer, TranslationUnit};
pub use self::parser::{parse_document, parse_file};
pub use self::serializer::{to_xliff_string, write_xliff};

/// XLIFF 1.2 namespace URI
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// XML Schema instance namespace URI
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XHTML namespace URI
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Location of the strict XLIFF 1.2 schema
pub const XLIFF_SCHEMA_LOCATION: &str =
    "urn:oasis:names:tc:xliff:document:1.2 http://docs.oasis-open.org/xliff/v1.2/os/xliff-core-1.2-strict.xsd";

/// Media type of serialized output
pub const XLIFF_MEDIA_TYPE: &str = "application/x-xliff+xml";
