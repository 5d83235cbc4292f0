// Minimal owned XML tree
//
// Requests are built as `XmlNode` trees and serialized through quick-xml's
// writer, so every name and description is escaped. Responses are parsed
// into the same tree and the resource adapters walk it by tag name.

use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Errors that can occur while parsing XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// A generic XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
    pub text: Option<String>,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// `<tag>text</tag>`
    pub fn text_element(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// `<container><item>a</item><item>b</item></container>`
    pub fn list<I, S>(container: &str, item: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::new(container);
        node.children = values
            .into_iter()
            .map(|v| Self::text_element(item, v))
            .collect();
        node
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append `<tag>text</tag>` only when `text` is non-empty.
    pub fn push_non_empty(&mut self, tag: &str, text: &str) {
        if !text.is_empty() {
            self.children.push(Self::text_element(tag, text));
        }
    }

    /// Return the first child with the provided tag.
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Trimmed text content, empty when the element has none.
    pub fn text(&self) -> &str {
        self.text.as_deref().map_or("", str::trim)
    }

    /// Trimmed text of the first child named `tag`, empty when absent.
    pub fn child_text(&self, tag: &str) -> String {
        self.child(tag).map(|c| c.text().to_owned()).unwrap_or_default()
    }

    /// Texts of `<container><item/>...</container>`, skipping blank items.
    pub fn child_list(&self, container: &str, item: &str) -> Vec<String> {
        self.child(container)
            .map(|c| {
                c.children_named(item)
                    .map(XmlNode::text)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

// ── Reading ─────────────────────────────────────────────────────────

/// Parse XML bytes into an [`XmlNode`] tree.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(build_node_start(&e, &reader)?);
            }
            Event::Empty(e) => {
                let node = build_node_start(&e, &reader)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape()?.into_owned();
                    push_text(current, text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())?.to_owned();
                    push_text(current, text);
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("encountered closing tag without open tag".into())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed(
            "unclosed element(s) at end of document".into(),
        ));
    }

    root.ok_or_else(|| ParseError::Malformed("no root element found".into()))
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(ParseError::Malformed(
            "multiple top-level elements found".into(),
        ));
    }
    Ok(())
}

fn push_text(node: &mut XmlNode, text: String) {
    if text.trim().is_empty() {
        return;
    }
    match &mut node.text {
        Some(existing) => existing.push_str(&text),
        None => node.text = Some(text),
    }
}

fn build_node_start(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(qname_to_string(e.name())?);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_owned())
}

// ── Writing ─────────────────────────────────────────────────────────

/// Serialize a tree as a UTF-8 document with an XML declaration.
pub fn write_document(node: &XmlNode) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_attributes_and_text() {
        let node = parse(br#"<Response APIVersion="1905.1"><Status code="200"> ok </Status></Response>"#)
            .unwrap();
        assert_eq!(node.attr("APIVersion"), Some("1905.1"));
        let status = node.child("Status").unwrap();
        assert_eq!(status.attr("code"), Some("200"));
        assert_eq!(status.text(), "ok");
    }

    #[test]
    fn parse_rejects_truncated_document() {
        assert!(parse(b"<Response><Login>").is_err());
    }

    #[test]
    fn child_list_skips_blank_items() {
        let node = parse(b"<Host><HostList><Host>a</Host><Host/><Host>b</Host></HostList></Host>")
            .unwrap();
        assert_eq!(node.child_list("HostList", "Host"), vec!["a", "b"]);
    }

    #[test]
    fn writer_escapes_text_and_attributes() {
        let node = XmlNode::new("IPHost")
            .with_attr("transactionid", "\"x\"")
            .with_child(XmlNode::text_element("Name", "a<b>&c"));
        let out = String::from_utf8(write_document(&node).unwrap()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("a&lt;b&gt;&amp;c"));
        assert!(!out.contains("a<b>"));

        let back = parse(out.as_bytes()).unwrap();
        assert_eq!(back.child_text("Name"), "a<b>&c");
        assert_eq!(back.attr("transactionid"), Some("\"x\""));
    }
}
