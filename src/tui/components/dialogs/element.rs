//! Retained element model backing a dialog surface
//!
//! A tiny tree of tagged nodes with marker classes and text content. It models
//! just enough of a native `<dialog>` element for the dialog component:
//! attachment to the document, open/closed presentation and a return value.

use std::collections::BTreeSet;

/// Marker class present on a freshly built dialog until it is revealed
pub const HIDE_CLASS: &str = "hide";

/// How an open dialog element is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Shown without blocking the rest of the surface
    NonModal,
    /// Exclusive presentation, everything else is inert and dimmed
    Modal,
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    classes: BTreeSet<String>,
    text: Option<String>,
    children: Vec<Element>,
    attached: bool,
    open: Option<Presentation>,
    return_value: String,
}

impl Element {
    /// Create an empty element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder: add a class
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.classes.insert(name.into());
        self
    }

    /// Builder: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn add_class(&mut self, name: impl Into<String>) {
        self.classes.insert(name.into());
    }

    pub fn remove_class(&mut self, name: &str) {
        self.classes.remove(name);
    }

    /// Own text of this node, not including descendants
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the text content. The string is stored verbatim and never parsed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Concatenated text of this node and all descendants, depth first
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            if !out.is_empty() && !text.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First descendant (or self) matching the predicate, depth first
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Mutable variant of [`Element::find`]
    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(pred))
    }

    /// Descendant carrying the given class
    pub fn query_class(&self, class: &str) -> Option<&Element> {
        self.find(&|el| el.has_class(class))
    }

    /// Descendant with the given tag
    pub fn query_tag(&self, tag: &str) -> Option<&Element> {
        self.find(&|el| el.tag == tag)
    }

    /// Remove the first descendant matching the predicate and return it
    pub fn remove_where(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<Element> {
        if let Some(index) = self.children.iter().position(|child| pred(child)) {
            return Some(self.children.remove(index));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_where(pred))
    }

    /// Replace the first descendant matching the predicate, keeping its slot.
    /// Returns the replaced node.
    pub fn replace_where(
        &mut self,
        pred: &dyn Fn(&Element) -> bool,
        replacement: Element,
    ) -> Option<Element> {
        let mut replacement = Some(replacement);
        self.replace_inner(pred, &mut replacement)
    }

    fn replace_inner(
        &mut self,
        pred: &dyn Fn(&Element) -> bool,
        replacement: &mut Option<Element>,
    ) -> Option<Element> {
        for child in self.children.iter_mut() {
            if pred(child) {
                let new = replacement.take()?;
                return Some(std::mem::replace(child, new));
            }
            if let Some(old) = child.replace_inner(pred, replacement) {
                return Some(old);
            }
        }
        None
    }

    /// Whether the element is part of the document
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn attach(&mut self) {
        self.attached = true;
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
    }

    /// Current presentation, `None` when closed
    pub fn presentation(&self) -> Option<Presentation> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Present the element without blocking the rest of the page
    pub fn show(&mut self) {
        self.open = Some(Presentation::NonModal);
    }

    /// Present the element exclusively
    pub fn show_modal(&mut self) {
        self.open = Some(Presentation::Modal);
    }

    /// Close the element. Returns true when it was open, meaning a close
    /// signal must be raised by the owner.
    pub fn close(&mut self, return_value: Option<&str>) -> bool {
        if self.open.take().is_none() {
            return false;
        }
        if let Some(value) = return_value {
            self.return_value = value.to_string();
        }
        true
    }

    pub fn return_value(&self) -> &str {
        &self.return_value
    }
}

/// Build the fixed dialog template:
///
/// ```text
/// dialog.hide
///   div.content
///     span.title
///     a.close
///     div.body
///       p
/// ```
pub fn dialog_template() -> Element {
    Element::new("dialog").with_class(HIDE_CLASS).with_child(
        Element::new("div")
            .with_class("content")
            .with_child(Element::new("span").with_class("title"))
            .with_child(Element::new("a").with_class("close"))
            .with_child(
                Element::new("div")
                    .with_class("body")
                    .with_child(Element::new("p")),
            ),
    )
}
