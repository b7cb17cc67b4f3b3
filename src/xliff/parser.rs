/*!
 * XLIFF 1.2 parser.
 *
 * The XML is first read into a small namespace-resolved element tree using
 * quick-xml events, then the tree is queried for `file`, `trans-unit`,
 * `source`, `target` and `g` elements in the document's default namespace.
 */

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::model::{Document, FileUnit, PlaceholderSpan, TextContainer, TranslationUnit};
use crate::errors::ParseError;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse an XLIFF document from a string.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    let root = read_tree(xml.trim_start_matches('\u{feff}'))?;

    let namespace = root
        .declared_default
        .clone()
        .ok_or_else(|| ParseError::MissingNamespace(root.local_name.clone()))?;

    let mut files = Vec::new();
    for file_element in root.children_named(&namespace, "file") {
        files.push(parse_file_element(file_element, &namespace)?);
    }

    Ok(Document::new(files))
}

/// Parse an XLIFF document from any reader.
///
/// Input that is not UTF-8 is reported as `ParseError::MalformedXml`.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document> {
    let mut xml = String::new();
    if let Err(e) = reader.read_to_string(&mut xml) {
        if e.kind() == io::ErrorKind::InvalidData {
            return Err(ParseError::MalformedXml(format!("input is not valid UTF-8: {}", e)).into());
        }
        return Err(e).context("Failed to read XLIFF input");
    }
    Ok(parse_document(&xml)?)
}

/// Parse an XLIFF document from a file on disk.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open XLIFF file: {:?}", path))?;
    parse_reader(BufReader::new(file)).with_context(|| format!("Failed to parse XLIFF file: {:?}", path))
}

fn parse_file_element(element: &XmlElement, namespace: &str) -> Result<FileUnit, ParseError> {
    let mut units = Vec::new();
    for unit_element in element.descendants_named(namespace, "trans-unit") {
        let id = unit_element
            .attribute("id")
            .ok_or_else(|| ParseError::MissingAttribute {
                element: "trans-unit".to_string(),
                attribute: "id",
            })?;

        let source = parse_container(unit_element.first_child_named(namespace, "source"), namespace)?;
        let target = parse_container(unit_element.first_child_named(namespace, "target"), namespace)?;

        units.push(TranslationUnit::new(id, source, target));
    }

    Ok(FileUnit {
        original: element.attribute("original").map(str::to_string),
        datatype: element.attribute("datatype").map(str::to_string),
        source_language: element.attribute("source-language").map(str::to_string),
        target_language: element.attribute("target-language").map(str::to_string),
        units,
    })
}

fn parse_container(element: Option<&XmlElement>, namespace: &str) -> Result<TextContainer, ParseError> {
    let Some(element) = element else {
        return Ok(TextContainer::default());
    };

    let leading = element.leading_text();
    let text = Some(leading.trim()).filter(|t| !t.is_empty()).map(str::to_string);

    let mut placeholders = Vec::new();
    for span in element.children_named(namespace, "g") {
        let id = span.attribute("id").ok_or_else(|| ParseError::MissingAttribute {
            element: "g".to_string(),
            attribute: "id",
        })?;
        let mut inner = String::new();
        span.collect_text(&mut inner);
        placeholders.push(PlaceholderSpan::new(id, span.attribute("ctype"), inner.trim()));
    }

    Ok(TextContainer { text, placeholders })
}

/// Element of the intermediate tree.
#[derive(Debug)]
struct XmlElement {
    namespace: Option<String>,
    local_name: String,
    /// Default namespace declared on this element itself
    declared_default: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

#[derive(Debug)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    fn children_named<'a>(&'a self, namespace: &'a str, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements()
            .filter(move |element| element.is(namespace, local_name))
    }

    fn first_child_named(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|element| element.is(namespace, local_name))
    }

    /// Matching descendants in document order, excluding `self`.
    fn descendants_named<'a>(&'a self, namespace: &str, local_name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlElement> = self.child_elements().collect();
        pending.reverse();
        while let Some(element) = pending.pop() {
            if element.is(namespace, local_name) {
                found.push(element);
            }
            let mut children: Vec<&XmlElement> = element.child_elements().collect();
            children.reverse();
            pending.extend(children);
        }
        found
    }

    /// Text that precedes the first child element.
    fn leading_text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(value) => text.push_str(value),
                XmlNode::Element(_) => break,
            }
        }
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(value) => out.push_str(value),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }

    fn push_text(&mut self, value: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(value);
        } else {
            self.children.push(XmlNode::Text(value.to_string()));
        }
    }
}

/// Prefix bindings introduced by one element; `None` is the default namespace.
type Scope = Vec<(Option<String>, String)>;

fn read_tree(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut scopes: Vec<Scope> = Vec::new();
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::MalformedXml(format!("{} at byte {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(start) => {
                let element = open_element(&start, &mut scopes)?;
                if open.is_empty() && root.is_some() {
                    return Err(ParseError::MalformedXml("multiple root elements".to_string()));
                }
                open.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start, &mut scopes)?;
                scopes.pop();
                close_element(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                scopes.pop();
                let element = open
                    .pop()
                    .ok_or_else(|| ParseError::MalformedXml("unexpected closing tag".to_string()))?;
                close_element(element, &mut open, &mut root)?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| ParseError::MalformedXml(e.to_string()))?;
                append_text(&mut open, &value)?;
            }
            Event::CData(data) => {
                let value = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| ParseError::MalformedXml(e.to_string()))?;
                append_text(&mut open, &value)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no content
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(ParseError::MalformedXml(format!(
            "unexpected end of document inside <{}>",
            unclosed.local_name
        )));
    }

    root.ok_or(ParseError::NoRootElement)
}

fn open_element(start: &BytesStart<'_>, scopes: &mut Vec<Scope>) -> Result<XmlElement, ParseError> {
    let qualified = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut scope = Scope::new();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ParseError::MalformedXml(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| ParseError::MalformedXml(e.to_string()))?
            .into_owned();

        if key == "xmlns" {
            scope.push((None, value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((Some(prefix.to_string()), value));
        } else {
            attributes.push((key, value));
        }
    }

    let declared_default = scope
        .iter()
        .find(|(prefix, uri)| prefix.is_none() && !uri.is_empty())
        .map(|(_, uri)| uri.clone());
    scopes.push(scope);

    let (prefix, local_name) = match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local.to_string()),
        None => (None, qualified.clone()),
    };
    // An unprefixed element outside any default namespace is simply unqualified
    let namespace = match prefix {
        Some(prefix) => Some(resolve_prefix(scopes, Some(prefix)).ok_or_else(|| {
            ParseError::MalformedXml(format!("unbound namespace prefix '{}'", prefix))
        })?),
        None => resolve_prefix(scopes, None),
    };

    Ok(XmlElement {
        namespace,
        local_name,
        declared_default,
        attributes,
        children: Vec::new(),
    })
}

fn resolve_prefix(scopes: &[Scope], prefix: Option<&str>) -> Option<String> {
    if prefix == Some("xml") {
        return Some(XML_NAMESPACE.to_string());
    }
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter())
        .find(|(bound, _)| bound.as_deref() == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

fn close_element(
    element: XmlElement,
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), ParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::MalformedXml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

fn append_text(open: &mut [XmlElement], value: &str) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(element) => {
            element.push_text(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(ParseError::MalformedXml("text outside the root element".to_string())),
    }
}
