// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::document::{Document, NodeId};
use crate::paint::Paint;

/// A document preprocessing step applied before rasterization.
pub trait Fixup: Send + Sync {
    /// Modifies the document in place.
    fn apply(&self, doc: &mut Document);
}

impl<F> Fixup for F
where
    F: Fn(&mut Document) + Send + Sync,
{
    fn apply(&self, doc: &mut Document) {
        self(doc)
    }
}

/// Makes unpainted shapes visible for monochrome rendering.
///
/// SVG paints shapes black by default and doesn't stroke them at all,
/// which turns into nothing on a dark terminal. This step sets `fill` and `stroke`
/// to opaque white on every element that doesn't get a paint either from itself
/// or from an ancestor. Explicit `none` and explicit paints are left as is.
///
/// Elements inside `defs`, `clipPath`, `mask`, `marker`, `pattern`, `symbol`,
/// gradients and filters are not touched. They are painted only through
/// a referencing element and will inherit from it.
#[derive(Clone, Copy, Default, Debug)]
pub struct WhitePaint;

impl Fixup for WhitePaint {
    fn apply(&self, doc: &mut Document) {
        let root = doc.root_element();
        paint_unset(doc, root, false, false);
    }
}

/// Keeps the document as is.
///
/// Useful when authored colors should survive, e.g. for a colorized renderer.
#[derive(Clone, Copy, Default, Debug)]
pub struct KeepPaint;

impl Fixup for KeepPaint {
    fn apply(&self, _: &mut Document) {}
}

fn paint_unset(doc: &mut Document, id: NodeId, has_fill: bool, has_stroke: bool) {
    let element = match doc.element_mut(id) {
        Some(v) => v,
        None => return,
    };

    if is_definition(&element.tag_name) {
        return;
    }

    if !has_fill && element.fill.is_unset() {
        element.fill = Paint::white();
    }

    if !has_stroke && element.stroke.is_unset() {
        element.stroke = Paint::white();
    }

    let has_fill = has_fill || !element.fill.is_unset();
    let has_stroke = has_stroke || !element.stroke.is_unset();

    let children: Vec<_> = doc.children(id).collect();
    for child in children {
        paint_unset(doc, child, has_fill, has_stroke);
    }
}

fn is_definition(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "defs"
            | "clipPath"
            | "mask"
            | "marker"
            | "pattern"
            | "symbol"
            | "linearGradient"
            | "radialGradient"
            | "filter"
    )
}
