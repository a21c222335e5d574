//! AWDRIP document layout.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

pub const ROOT_ELEMENT: &str = "AWDRIP";
const TRANSACTION_ELEMENT: &str = "transaction";
const FIELD_ELEMENT: &str = "field";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentField {
    pub name: String,
    pub value: String,
}

/// Fields of one emitted document, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<DocumentField>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(DocumentField {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn fields(&self) -> &[DocumentField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serialize `document` into `writer` and hand the writer back.
///
/// Attribute values are escaped by the XML writer.
pub fn write_document<W: Write>(writer: W, document: &Document) -> io::Result<W> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("xmlns:xsd", XSD_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new(TRANSACTION_ELEMENT)))?;
    for field in document.fields() {
        let mut node = BytesStart::new(FIELD_ELEMENT);
        node.push_attribute(("name", field.name.as_str()));
        node.push_attribute(("value", field.value.as_str()));
        xml.write_event(Event::Empty(node))?;
    }
    xml.write_event(Event::End(BytesEnd::new(TRANSACTION_ELEMENT)))?;
    xml.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    Ok(xml.into_inner())
}

/// Render `document` to a string.
pub fn render_document(document: &Document) -> io::Result<String> {
    let bytes = write_document(Vec::new(), document)?;
    String::from_utf8(bytes).map_err(io::Error::other)
}
