//! What the menu core needs from the notebook host.
//!
//! The core never builds UI primitives itself. Every element is cloned from
//! one the host already shows, via [`TemplateSource`], so the new menu looks
//! like the rest of the host's menu family. Rendered elements are edited
//! through [`MenuElement`], the finished dropdown goes to a [`Toolbar`], and
//! snippet clicks end up in [`NotebookDocument::insert_cell_above`].
//!
//! Everything here runs on the host's single UI thread; click handlers are
//! `Rc` closures and are not `Send`.

pub mod memory;

use std::fmt;
use std::rc::Rc;

/// Callback bound to a rendered element.
pub type ClickHandler = Rc<dyn Fn()>;

/// The host elements the renderer clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Separator,
    Item,
    Submenu,
    /// A top-level toolbar dropdown.
    Dropdown,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Separator => "separator",
            TemplateKind::Item => "menu item",
            TemplateKind::Submenu => "submenu",
            TemplateKind::Dropdown => "dropdown",
        };
        f.write_str(name)
    }
}

/// A cloned host menu element.
pub trait MenuElement: Sized {
    /// Visible text. For submenus and dropdowns, the toggle text.
    fn set_label(&mut self, text: &str);
    fn set_tooltip(&mut self, text: &str);
    /// Sets the element id, or clears whatever id the template carried.
    fn set_element_id(&mut self, id: Option<&str>);
    fn add_class(&mut self, class: &str);
    /// Opens `href` in a new tab and shows the external-link indicator.
    fn set_external_link(&mut self, href: &str);
    /// Plain text with the `#` placeholder link.
    fn set_inert_link(&mut self);
    /// Attaches the snippet as retrievable metadata.
    fn set_snippet(&mut self, snippet: &str);
    fn snippet(&self) -> Option<&str>;
    /// Detaches the child entries the template came with.
    fn clear_children(&mut self);
    fn append_child(&mut self, child: Self);
    fn children_mut(&mut self) -> &mut [Self];
    fn on_click(&mut self, handler: ClickHandler);
}

/// Supplies fresh clones of existing host menu elements.
///
/// Each call returns a new, independent copy, or `None` when the host shows
/// no element of that kind.
pub trait TemplateSource {
    type Element: MenuElement;

    fn separator(&self) -> Option<Self::Element>;
    fn item(&self) -> Option<Self::Element>;
    fn submenu(&self) -> Option<Self::Element>;
    fn dropdown(&self) -> Option<Self::Element>;
}

/// The host's menu bar.
pub trait Toolbar<E> {
    fn append_menu(&mut self, menu: E);
}

/// The host document's cell model, reduced to what snippet insertion needs.
pub trait NotebookDocument {
    /// Inserts a new cell above the current one with `text` as its content.
    fn insert_cell_above(&mut self, text: &str);
}
