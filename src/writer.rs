// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use xmlwriter::XmlWriter;

use crate::document::{Document, NodeId, NodeKind, SVG_NS, XLINK_NS};

impl Document {
    /// Writes the document back to SVG.
    ///
    /// Unset paints are omitted, everything else is written as attributes.
    pub fn to_svg_string(&self) -> String {
        let mut xml = XmlWriter::new(xmlwriter::Options {
            use_single_quote: false,
            indent: xmlwriter::Indent::None,
            attributes_indent: xmlwriter::Indent::None,
        });

        write_element(self, self.root_element(), true, &mut xml);
        xml.end_document()
    }
}

fn write_element(doc: &Document, id: NodeId, is_root: bool, xml: &mut XmlWriter) {
    let element = match doc.element(id) {
        Some(v) => v,
        None => return,
    };

    xml.start_element(&element.tag_name);

    if is_root {
        xml.write_attribute("xmlns", SVG_NS);
        xml.write_attribute("xmlns:xlink", XLINK_NS);
    }

    if let Some(value) = element.fill.to_attribute() {
        write_attribute(xml, "fill", &value);
    }

    if let Some(value) = element.stroke.to_attribute() {
        write_attribute(xml, "stroke", &value);
    }

    for attr in &element.attributes {
        write_attribute(xml, &attr.name, &attr.value);
    }

    let is_text = element.tag_name == "text";
    if is_text {
        xml.set_preserve_whitespaces(true);
    }

    for child in doc.children(id) {
        match doc.kind(child) {
            NodeKind::Element(_) => write_element(doc, child, false, xml),
            NodeKind::Text(ref text) => xml.write_text(&text.replace('&', "&amp;")),
            NodeKind::Root => {}
        }
    }

    xml.end_element();

    if is_text {
        xml.set_preserve_whitespaces(false);
    }
}

fn write_attribute(xml: &mut XmlWriter, name: &str, value: &str) {
    xml.write_attribute_raw(name, |buf| {
        for c in value.bytes() {
            match c {
                b'&' => buf.extend_from_slice(b"&amp;"),
                b'<' => buf.extend_from_slice(b"&lt;"),
                b'>' => buf.extend_from_slice(b"&gt;"),
                b'"' => buf.extend_from_slice(b"&quot;"),
                _ => buf.push(c),
            }
        }
    });
}
