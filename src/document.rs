// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A mutable SVG tree.

The tree is a small arena of element and text nodes built from a
[`roxmltree::Document`]. CSS from `style` elements and `style` attributes is
resolved during parsing, and the `fill`/`stroke` properties are pulled out
into typed [`Paint`] slots, so that a paint set anywhere in the source
is seen as an explicit one.
*/

use std::num::NonZeroU32;

use roxmltree::Error;

use crate::paint::Paint;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An SVG tree container.
///
/// Contains only SVG elements and text nodes.
/// Text nodes are present only inside the `text` element.
#[derive(Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

/// A node ID inside a [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    fn new(id: u32) -> Self {
        debug_assert!(id < u32::MAX);

        // We are using `NonZeroU32` to reduce overhead of `Option<NodeId>`.
        NodeId(NonZeroU32::new(id + 1).unwrap())
    }

    #[inline]
    fn get_usize(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(id: usize) -> Self {
        // We already checked that `id` is limited by the nodes limit.
        debug_assert!(id <= u32::MAX as usize);
        NodeId::new(id as u32)
    }
}

/// A node kind.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The document root. Not an element.
    Root,
    /// An SVG element.
    Element(Element),
    /// A text node.
    Text(String),
}

#[derive(Clone)]
struct NodeData {
    parent: Option<NodeId>,
    next_sibling: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    kind: NodeKind,
}

/// An SVG element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Element's local name, like `rect` or `linearGradient`.
    pub tag_name: String,
    /// All attributes, except `fill`, `stroke`, `style` and `class`.
    ///
    /// Namespaced attributes keep their prefix, like `xlink:href`.
    pub attributes: Vec<Attribute>,
    /// Element's own `fill`.
    pub fill: Paint,
    /// Element's own `stroke`.
    pub stroke: Paint,
}

impl Element {
    /// Returns an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute value, replacing an existing one.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Returns a paint by property name.
    fn paint_mut(&mut self, name: &str) -> Option<&mut Paint> {
        match name {
            "fill" => Some(&mut self.fill),
            "stroke" => Some(&mut self.stroke),
            _ => None,
        }
    }
}

/// An attribute.
#[derive(Clone, PartialEq, Debug)]
pub struct Attribute {
    /// Attribute's qualified name.
    pub name: String,
    /// Attribute's value.
    pub value: String,
}

impl Document {
    /// Parses a [`Document`] from a string.
    pub fn parse_str(text: &str) -> Result<Document, Error> {
        let opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, opt)?;
        Self::parse_tree(&xml)
    }

    /// Parses a [`Document`] from a [`roxmltree::Document`].
    pub fn parse_tree(xml: &roxmltree::Document) -> Result<Document, Error> {
        parse(xml)
    }

    /// Returns the root node ID.
    ///
    /// The root is not an element, use [`Document::root_element`] to get the `svg` one.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Returns the root `svg` element ID.
    #[inline]
    pub fn root_element(&self) -> NodeId {
        // `unwrap` is safe, because `Document` is guarantee to have the `svg` element.
        self.children(self.root())
            .find(|id| self.element(*id).is_some())
            .unwrap()
    }

    /// Returns a node kind.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.get_usize()].kind
    }

    /// Returns an element, unless the node is not an element.
    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes[id.get_usize()].kind {
            NodeKind::Element(ref e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable element, unless the node is not an element.
    #[inline]
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes[id.get_usize()].kind {
            NodeKind::Element(ref mut e) => Some(e),
            _ => None,
        }
    }

    /// Returns a parent node ID.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.get_usize()].parent
    }

    /// Returns an iterator over node's children.
    #[inline]
    pub fn children(&self, id: NodeId) -> Children {
        Children {
            doc: self,
            next: self.nodes[id.get_usize()].children.map(|(first, _)| first),
        }
    }

    /// Returns an iterator over all document elements, in document order.
    ///
    /// Text nodes are skipped.
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len())
            .map(NodeId::from)
            .filter(move |id| self.element(*id).is_some())
    }

    /// Returns an iterator over element's ancestors, starting from its parent.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |id| self.parent(*id))
    }

    /// Returns an element by its `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants()
            .find(|node| self.element(*node).and_then(|e| e.attribute("id")) == Some(id))
    }

    /// Returns the number of elements.
    pub fn elements_count(&self) -> usize {
        self.descendants().count()
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        fn print_children(
            doc: &Document,
            parent: NodeId,
            depth: usize,
            f: &mut std::fmt::Formatter,
        ) -> Result<(), std::fmt::Error> {
            for child in doc.children(parent) {
                for _ in 0..depth {
                    write!(f, "    ")?;
                }

                match doc.kind(child) {
                    NodeKind::Element(ref e) => {
                        writeln!(f, "{} fill={:?} stroke={:?}", e.tag_name, e.fill, e.stroke)?;
                        print_children(doc, child, depth + 1, f)?;
                    }
                    NodeKind::Text(ref text) => writeln!(f, "{:?}", text)?,
                    NodeKind::Root => {}
                }
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self, self.root(), 1, f)?;
        writeln!(f, "]")
    }
}

/// An iterator over node's children.
#[derive(Debug)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.doc.nodes[id.get_usize()].next_sibling;
        Some(id)
    }
}

fn parse(xml: &roxmltree::Document) -> Result<Document, Error> {
    let mut doc = Document { nodes: Vec::new() };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    // Check that the root element is `svg`.
    let root = xml.root_element();
    if !root.has_tag_name((SVG_NS, "svg")) {
        return Err(Error::NoRootNode);
    }

    let style_sheet = resolve_css(xml);
    parse_xml_node(root, doc.root(), &style_sheet, false, 0, &mut doc)?;

    Ok(doc)
}

fn parse_xml_node(
    node: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    in_text: bool,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    if depth > 1024 {
        return Err(Error::NodesLimitReached);
    }

    if node.is_text() {
        if in_text {
            if let Some(text) = node.text() {
                doc.append(parent_id, NodeKind::Text(text.to_string()));
            }
        }

        return Ok(());
    }

    if !node.is_element() {
        return Ok(());
    }

    if node.tag_name().namespace() != Some(SVG_NS) {
        log::debug!(
            "Non-SVG element '{}' will be skipped.",
            node.tag_name().name()
        );
        return Ok(());
    }

    let tag_name = node.tag_name().name();

    // Style sheets are already resolved.
    if tag_name == "style" {
        return Ok(());
    }

    if doc.nodes.len() > 1_000_000 {
        return Err(Error::NodesLimitReached);
    }

    let element = parse_svg_element(node, style_sheet);
    let node_id = doc.append(parent_id, NodeKind::Element(element));

    let in_text = in_text || tag_name == "text";
    for child in node.children() {
        parse_xml_node(child, node_id, style_sheet, in_text, depth + 1, doc)?;
    }

    Ok(())
}

fn parse_svg_element(xml_node: roxmltree::Node, style_sheet: &simplecss::StyleSheet) -> Element {
    let mut element = Element {
        tag_name: xml_node.tag_name().name().to_string(),
        attributes: Vec::new(),
        fill: Paint::Unset,
        stroke: Paint::Unset,
    };

    // Copy presentational attributes first.
    for attr in xml_node.attributes() {
        let name = match attr.namespace() {
            None | Some(SVG_NS) => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(XML_NAMESPACE_NS) => format!("xml:{}", attr.name()),
            _ => continue,
        };

        match name.as_str() {
            // The `style` attribute will be split below.
            // No need to copy a `class` attribute since CSS were already resolved.
            "style" | "class" => {}
            "fill" | "stroke" => {
                if let Some(paint) = element.paint_mut(&name) {
                    *paint = Paint::from_attribute(attr.value());
                }
            }
            _ => element.attributes.push(Attribute {
                name,
                value: attr.value().to_string(),
            }),
        }
    }

    // CSS declarations have a higher priority than attributes
    // and the `style` attribute has the highest one.
    // Everything except paint is kept as a `style` attribute,
    // so `usvg` can apply it with the right priority.
    let mut style = String::new();
    let mut write_declaration = |declaration: &simplecss::Declaration| {
        if let Some(paint) = element.paint_mut(declaration.name) {
            *paint = Paint::from_attribute(declaration.value);
        } else {
            if !style.is_empty() {
                style.push(';');
            }

            style.push_str(declaration.name);
            style.push(':');
            style.push_str(declaration.value);
        }
    };

    // Apply CSS.
    for rule in &style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                write_declaration(declaration);
            }
        }
    }

    // Split a `style` attribute.
    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            write_declaration(&declaration);
        }
    }

    if !style.is_empty() {
        element.attributes.push(Attribute {
            name: "style".to_string(),
            value: style,
        });
    }

    element
}

fn resolve_css<'a>(xml: &'a roxmltree::Document<'a>) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        let text = match node.text() {
            Some(v) => v,
            None => continue,
        };

        sheet.parse_more(text);
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // A static SVG doesn't have other pseudo-classes.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, PaintValue};

    fn first(doc: &Document, tag_name: &str) -> NodeId {
        doc.descendants()
            .find(|id| doc.element(*id).unwrap().tag_name == tag_name)
            .unwrap()
    }

    #[test]
    fn paint_states() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <rect fill='none'/>
                <circle stroke='red'/>
                <path/>
            </svg>",
        )
        .unwrap();

        let rect = doc.element(first(&doc, "rect")).unwrap();
        assert_eq!(rect.fill, Paint::None);
        assert_eq!(rect.stroke, Paint::Unset);

        let circle = doc.element(first(&doc, "circle")).unwrap();
        assert_eq!(circle.fill, Paint::Unset);
        assert_eq!(circle.stroke, Paint::color(Color::new_rgb(255, 0, 0)));

        let path = doc.element(first(&doc, "path")).unwrap();
        assert!(path.fill.is_unset());
        assert!(path.stroke.is_unset());
    }

    #[test]
    fn css_paint_is_explicit() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.outline { fill: none; stroke-width: 2 }</style>
                <rect class='outline' fill='red'/>
                <circle style='stroke:currentColor;opacity:0.5'/>
            </svg>",
        )
        .unwrap();

        let rect = doc.element(first(&doc, "rect")).unwrap();
        assert_eq!(rect.fill, Paint::None);
        assert_eq!(rect.attribute("style"), Some("stroke-width:2"));
        assert_eq!(rect.attribute("class"), None);

        let circle = doc.element(first(&doc, "circle")).unwrap();
        assert_eq!(circle.stroke, Paint::Value(PaintValue::CurrentColor));
        assert_eq!(circle.attribute("style"), Some("opacity:0.5"));
    }

    #[test]
    fn style_elements_and_foreign_content_are_dropped() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:ink='http://example.com/ink'>
                <style>rect { fill: blue }</style>
                <ink:layer/>
                <rect ink:label='x'/>
            </svg>",
        )
        .unwrap();

        assert_eq!(doc.elements_count(), 2);
        let rect = doc.element(first(&doc, "rect")).unwrap();
        assert!(rect.attributes.is_empty());
        assert_eq!(rect.fill, Paint::color(Color::new_rgb(0, 0, 255)));
    }

    #[test]
    fn xlink_prefix_is_kept() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
                <use xlink:href='#r'/>
            </svg>",
        )
        .unwrap();

        let use_node = doc.element(first(&doc, "use")).unwrap();
        assert_eq!(use_node.attribute("xlink:href"), Some("#r"));
    }

    #[test]
    fn text_nodes_only_inside_text() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <g>ignored</g>
                <text>Hello <tspan>world</tspan></text>
            </svg>",
        )
        .unwrap();

        let g = first(&doc, "g");
        assert_eq!(doc.children(g).count(), 0);

        let text = first(&doc, "text");
        let kinds: Vec<_> = doc.children(text).map(|id| doc.kind(id).clone()).collect();
        assert!(matches!(kinds[0], NodeKind::Text(ref s) if s == "Hello "));
        assert!(matches!(kinds[1], NodeKind::Element(ref e) if e.tag_name == "tspan"));
    }

    #[test]
    fn ancestors_and_lookup() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><g id='g1'><rect id='r1'/></g></svg>",
        )
        .unwrap();

        let rect = doc.element_by_id("r1").unwrap();
        let ancestors: Vec<_> = doc.ancestors(rect).collect();
        let g = doc.element_by_id("g1").unwrap();
        assert_eq!(ancestors, vec![g, doc.root_element(), doc.root()]);
    }

    #[test]
    fn set_attribute() {
        let mut doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect id='r1' width='5'/></svg>",
        )
        .unwrap();

        let id = doc.element_by_id("r1").unwrap();
        let rect = doc.element_mut(id).unwrap();
        rect.set_attribute("width", "7");
        rect.set_attribute("height", "3");

        let rect = doc.element(id).unwrap();
        assert_eq!(rect.attribute("width"), Some("7"));
        assert_eq!(rect.attribute("height"), Some("3"));
        assert_eq!(rect.attributes.iter().filter(|a| a.name == "width").count(), 1);
    }

    #[test]
    fn non_svg_root() {
        let res = Document::parse_str("<html/>");
        assert!(matches!(res, Err(Error::NoRootNode)));
    }

    #[test]
    fn malformed_xml() {
        assert!(Document::parse_str("<svg xmlns='http://www.w3.org/2000/svg'>").is_err());
    }
}
