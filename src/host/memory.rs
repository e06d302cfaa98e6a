//! In-memory notebook host.
//!
//! Models a menu bar as a tree of [`MemoryElement`]s and a notebook as a list
//! of cells. Template discovery follows the way a notebook page is searched:
//! the first separator, the first plain item and the first submenu anywhere in
//! the menu bar, and the last top-level dropdown. Used by the preview binary
//! and the tests.

use std::fmt;
use std::fmt::Write as _;

use crate::host::{ClickHandler, MenuElement, NotebookDocument, TemplateSource, Toolbar};
use crate::util::{single_line, truncate_to_width, LINK_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Dropdown,
    Submenu,
    Item,
    Separator,
}

/// One menu element.
#[derive(Clone)]
pub struct MemoryElement {
    pub kind: ElementKind,
    pub label: String,
    pub tooltip: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub href: Option<String>,
    /// `Some("_blank")` for links that open in a new tab.
    pub target: Option<String>,
    pub external_icon: bool,
    pub snippet: Option<String>,
    pub children: Vec<MemoryElement>,
    click: Option<ClickHandler>,
}

impl MemoryElement {
    pub fn new(kind: ElementKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            tooltip: None,
            id: None,
            classes: Vec::new(),
            href: None,
            target: None,
            external_icon: false,
            snippet: None,
            children: Vec::new(),
            click: None,
        }
    }

    pub fn separator() -> Self {
        Self::new(ElementKind::Separator, "")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_child(mut self, child: MemoryElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_wired(&self) -> bool {
        self.click.is_some()
    }

    /// Fires the bound click handler. Returns `false` when nothing is bound.
    pub fn click(&self) -> bool {
        match &self.click {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Depth-first search, parents before children.
    pub fn find(&self, pred: &impl Fn(&MemoryElement) -> bool) -> Option<&MemoryElement> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&MemoryElement> {
        self.find(&|el: &MemoryElement| el.id.as_deref() == Some(id))
    }

    pub fn find_by_label(&self, label: &str) -> Option<&MemoryElement> {
        self.find(&|el: &MemoryElement| el.label == label)
    }

    /// Every element in depth-first order.
    pub fn descendants(&self) -> Vec<&MemoryElement> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Human-readable tree, one element per line, tooltips cut to `width`.
    pub fn outline(&self, width: usize) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0, width);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize, width: usize) {
        let indent = "  ".repeat(depth);
        let id = self
            .id
            .as_deref()
            .map(|id| format!(" #{id}"))
            .unwrap_or_default();

        let line = match self.kind {
            ElementKind::Separator => "----".to_string(),
            ElementKind::Dropdown => format!("[{}]{}", self.label, id),
            ElementKind::Submenu => format!("> {}{}", self.label, id),
            ElementKind::Item => {
                let mut line = format!("- {}{}", self.label, id);
                if self.target.is_some() {
                    if let Some(href) = &self.href {
                        let _ = write!(line, " -> {href} (new tab)");
                    }
                }
                if let Some(snippet) = &self.snippet {
                    let preview = single_line(snippet);
                    let _ = write!(line, " [snippet: {}]", truncate_to_width(&preview, width));
                }
                if let Some(tooltip) = self.tooltip.as_deref().filter(|t| !t.is_empty()) {
                    let _ = write!(line, " \"{}\"", truncate_to_width(tooltip, width));
                }
                line
            }
        };
        let _ = writeln!(out, "{indent}{line}");

        for child in &self.children {
            child.write_outline(out, depth + 1, width);
        }
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("tooltip", &self.tooltip)
            .field("id", &self.id)
            .field("classes", &self.classes)
            .field("href", &self.href)
            .field("target", &self.target)
            .field("external_icon", &self.external_icon)
            .field("snippet", &self.snippet)
            .field("children", &self.children)
            .field("wired", &self.click.is_some())
            .finish()
    }
}

/// Structural equality; bound click handlers are compared by presence only.
impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.label == other.label
            && self.tooltip == other.tooltip
            && self.id == other.id
            && self.classes == other.classes
            && self.href == other.href
            && self.target == other.target
            && self.external_icon == other.external_icon
            && self.snippet == other.snippet
            && self.children == other.children
            && self.click.is_some() == other.click.is_some()
    }
}

impl MenuElement for MemoryElement {
    fn set_label(&mut self, text: &str) {
        self.label = text.to_string();
    }

    fn set_tooltip(&mut self, text: &str) {
        self.tooltip = Some(text.to_string());
    }

    fn set_element_id(&mut self, id: Option<&str>) {
        self.id = id.map(str::to_string);
    }

    fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    fn set_external_link(&mut self, href: &str) {
        self.href = Some(href.to_string());
        self.target = Some("_blank".to_string());
        self.external_icon = true;
    }

    fn set_inert_link(&mut self) {
        self.href = Some(LINK_PLACEHOLDER.to_string());
        self.target = None;
        self.external_icon = false;
    }

    fn set_snippet(&mut self, snippet: &str) {
        self.snippet = Some(snippet.to_string());
    }

    fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    fn clear_children(&mut self) {
        self.children.clear();
    }

    fn append_child(&mut self, child: Self) {
        self.children.push(child);
    }

    fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    fn on_click(&mut self, handler: ClickHandler) {
        self.click = Some(handler);
    }
}

/// A notebook page's menu bar, used as the template source.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub menu_bar: Vec<MemoryElement>,
}

impl MemoryHost {
    pub fn new(menu_bar: Vec<MemoryElement>) -> Self {
        Self { menu_bar }
    }

    /// A menu bar shaped like a classic notebook page: File, Edit and Help
    /// dropdowns with items, separators and a nested submenu.
    pub fn notebook_menu_bar() -> Self {
        let file = MemoryElement::new(ElementKind::Dropdown, "File")
            .with_id("file_menu")
            .with_child(
                MemoryElement::new(ElementKind::Submenu, "New Notebook")
                    .with_id("new_notebook")
                    .with_child(
                        MemoryElement::new(ElementKind::Item, "Python 3")
                            .with_id("kernel-python3")
                            .with_href("#"),
                    ),
            )
            .with_child(
                MemoryElement::new(ElementKind::Item, "Open...")
                    .with_id("open_notebook")
                    .with_href("#"),
            )
            .with_child(MemoryElement::separator())
            .with_child(
                MemoryElement::new(ElementKind::Item, "Save and Checkpoint")
                    .with_id("save_checkpoint")
                    .with_href("#"),
            );

        let edit = MemoryElement::new(ElementKind::Dropdown, "Edit")
            .with_id("edit_menu")
            .with_child(
                MemoryElement::new(ElementKind::Item, "Cut Cells")
                    .with_id("cut_cell")
                    .with_href("#"),
            );

        let help = MemoryElement::new(ElementKind::Dropdown, "Help")
            .with_id("help_menu")
            .with_child(
                MemoryElement::new(ElementKind::Item, "Keyboard Shortcuts")
                    .with_id("keyboard_shortcuts")
                    .with_href("#"),
            );

        Self::new(vec![file, edit, help])
    }

    fn first_of(&self, kind: ElementKind) -> Option<MemoryElement> {
        self.menu_bar
            .iter()
            .find_map(|menu| menu.find(&|el: &MemoryElement| el.kind == kind))
            .cloned()
    }
}

impl TemplateSource for MemoryHost {
    type Element = MemoryElement;

    fn separator(&self) -> Option<MemoryElement> {
        self.first_of(ElementKind::Separator)
    }

    fn item(&self) -> Option<MemoryElement> {
        self.first_of(ElementKind::Item)
    }

    fn submenu(&self) -> Option<MemoryElement> {
        self.first_of(ElementKind::Submenu)
    }

    fn dropdown(&self) -> Option<MemoryElement> {
        self.menu_bar
            .iter()
            .rev()
            .find(|el| el.kind == ElementKind::Dropdown)
            .cloned()
    }
}

/// Menus appended by extensions.
#[derive(Debug, Default)]
pub struct MemoryToolbar {
    pub menus: Vec<MemoryElement>,
}

impl Toolbar<MemoryElement> for MemoryToolbar {
    fn append_menu(&mut self, menu: MemoryElement) {
        self.menus.push(menu);
    }
}

/// Notebook cells with a selection cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNotebook {
    pub cells: Vec<String>,
    pub selected: usize,
}

impl Default for MemoryNotebook {
    fn default() -> Self {
        Self {
            cells: vec![String::new()],
            selected: 0,
        }
    }
}

impl MemoryNotebook {
    pub fn with_cells(cells: Vec<String>, selected: usize) -> Self {
        let selected = selected.min(cells.len().saturating_sub(1));
        Self { cells, selected }
    }
}

impl NotebookDocument for MemoryNotebook {
    /// The new cell goes at the cursor and the selection stays on the cell
    /// that was selected before.
    fn insert_cell_above(&mut self, text: &str) {
        let at = self.selected.min(self.cells.len());
        self.cells.insert(at, text.to_string());
        if self.cells.len() > 1 {
            self.selected = at + 1;
        }
    }
}
