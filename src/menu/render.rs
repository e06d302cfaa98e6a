//! Turns a [`MenuNode`] tree into host elements.
//!
//! Every element is a clone of a host template; nothing is built from
//! scratch. Leaves and submenus are rendered by separate functions chosen by
//! the node variant.

use thiserror::Error;

use crate::config::MenuConfig;
use crate::host::{MenuElement, TemplateKind, TemplateSource};
use crate::menu::node::{Leaf, LeafAction, MenuNode, Submenu};
use crate::util::external_link;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The host shows no element of this kind to clone.
    #[error("Host document has no {0} element to clone")]
    MissingTemplate(TemplateKind),
}

fn template<E>(found: Option<E>, kind: TemplateKind) -> Result<E, RenderError> {
    found.ok_or(RenderError::MissingTemplate(kind))
}

/// Renders any node.
pub fn render<T: TemplateSource>(node: &MenuNode, templates: &T) -> Result<T::Element, RenderError> {
    match node {
        MenuNode::Section => render_section(templates),
        MenuNode::Leaf(leaf) => render_leaf(leaf, templates),
        MenuNode::Submenu(sub) => render_submenu(sub, templates),
    }
}

pub fn render_section<T: TemplateSource>(templates: &T) -> Result<T::Element, RenderError> {
    template(templates.separator(), TemplateKind::Separator)
}

/// Clones the item template and applies the leaf's fields.
///
/// Real http(s) links open in a new tab with the external-link indicator;
/// everything else shows plain text. Snippets are attached as metadata for
/// the wirer.
pub fn render_leaf<T: TemplateSource>(leaf: &Leaf, templates: &T) -> Result<T::Element, RenderError> {
    let mut el = template(templates.item(), TemplateKind::Item)?;

    el.set_tooltip(&leaf.title);
    el.set_element_id(leaf.id.as_deref());
    if let Some(class) = &leaf.style_class {
        el.add_class(class);
    }

    match &leaf.action {
        LeafAction::Link(href) if external_link(href).is_some() => el.set_external_link(href),
        LeafAction::Link(href) => {
            tracing::debug!(name = %leaf.name, href = %href, "Link is not external, rendering as text");
            el.set_inert_link();
        }
        LeafAction::Snippet(snippet) => {
            el.set_inert_link();
            el.set_snippet(snippet);
        }
        LeafAction::Inert => el.set_inert_link(),
    }
    el.set_label(&leaf.name);

    Ok(el)
}

/// Clones the submenu template, drops its original entries and appends the
/// rendered children in order.
pub fn render_submenu<T: TemplateSource>(
    sub: &Submenu,
    templates: &T,
) -> Result<T::Element, RenderError> {
    let mut el = template(templates.submenu(), TemplateKind::Submenu)?;

    el.clear_children();
    el.set_label(&sub.name);
    el.set_tooltip(&sub.title);
    el.set_element_id(sub.id.as_deref());
    append_children(&mut el, &sub.children, templates)?;

    Ok(el)
}

/// Renders the top-level dropdown for the toolbar.
///
/// Uses the dropdown template, labels its toggle with `menu.title` and gives
/// its list `menu.id`. For a submenu root its children become the dropdown's
/// entries; any other root becomes the single entry.
pub fn render_menu<T: TemplateSource>(
    root: &MenuNode,
    templates: &T,
    menu: &MenuConfig,
) -> Result<T::Element, RenderError> {
    let mut el = template(templates.dropdown(), TemplateKind::Dropdown)?;

    el.clear_children();
    el.set_label(&menu.title);
    el.set_element_id(Some(menu.id.as_str()));

    match root {
        MenuNode::Submenu(sub) => append_children(&mut el, &sub.children, templates)?,
        other => el.append_child(render(other, templates)?),
    }

    Ok(el)
}

fn append_children<T: TemplateSource>(
    parent: &mut T::Element,
    children: &[MenuNode],
    templates: &T,
) -> Result<(), RenderError> {
    for child in children {
        parent.append_child(render(child, templates)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{ElementKind, MemoryElement, MemoryHost};
    use crate::menu::node::LeafSpec;
    use pretty_assertions::assert_eq;

    fn host() -> MemoryHost {
        MemoryHost::notebook_menu_bar()
    }

    #[test]
    fn test_external_link_leaf() {
        let node = MenuNode::leaf(
            LeafSpec::new("ATK Git Repo", "ATK Github Repository")
                .link("https://github.com/trustedanalytics/atk"),
        )
        .unwrap();
        let el = render(&node, &host()).unwrap();

        assert_eq!(el.kind, ElementKind::Item);
        assert_eq!(el.label, "ATK Git Repo");
        assert_eq!(el.tooltip.as_deref(), Some("ATK Github Repository"));
        assert_eq!(el.href.as_deref(), Some("https://github.com/trustedanalytics/atk"));
        assert_eq!(el.target.as_deref(), Some("_blank"));
        assert!(el.external_icon);
        assert!(el.snippet.is_none());
    }

    #[test]
    fn test_snippet_leaf_is_inert_text_with_metadata() {
        let node = MenuNode::leaf(
            LeafSpec::new("0.1", "Uploaded")
                .snippet("#c\n!pip install trustedanalytics==0.1")
                .style_class("pypi-install"),
        )
        .unwrap();
        let el = render(&node, &host()).unwrap();

        assert_eq!(el.href.as_deref(), Some("#"));
        assert!(el.target.is_none());
        assert!(!el.external_icon);
        assert_eq!(el.snippet.as_deref(), Some("#c\n!pip install trustedanalytics==0.1"));
        assert_eq!(el.classes, vec!["pypi-install"]);
    }

    #[test]
    fn test_template_id_is_cleared_when_leaf_has_none() {
        let node = MenuNode::leaf(LeafSpec::new("Header", "")).unwrap();
        let el = render(&node, &host()).unwrap();
        // The item template carries the host's own id
        assert!(el.id.is_none());
    }

    #[test]
    fn test_non_http_link_renders_as_text() {
        let node = MenuNode::leaf(LeafSpec::new("Local", "").link("notebooks/intro.ipynb")).unwrap();
        let el = render(&node, &host()).unwrap();
        assert_eq!(el.href.as_deref(), Some("#"));
        assert!(el.target.is_none());
    }

    #[test]
    fn test_submenu_replaces_template_children() {
        let node = MenuNode::submenu(
            "Install ATK Client",
            "Install",
            vec![
                MenuNode::leaf(LeafSpec::new("a", "")).unwrap(),
                MenuNode::section(),
                MenuNode::leaf(LeafSpec::new("b", "")).unwrap(),
            ],
        )
        .unwrap()
        .with_id("install-atk");
        let el = render(&node, &host()).unwrap();

        assert_eq!(el.kind, ElementKind::Submenu);
        assert_eq!(el.label, "Install ATK Client");
        assert_eq!(el.id.as_deref(), Some("install-atk"));
        let kinds: Vec<_> = el.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Item, ElementKind::Separator, ElementKind::Item]
        );
        assert_eq!(el.children[0].label, "a");
        assert_eq!(el.children[2].label, "b");
    }

    #[test]
    fn test_nested_submenus_render_recursively() {
        let inner = MenuNode::submenu("Inner", "", vec![MenuNode::leaf(LeafSpec::new("x", "")).unwrap()])
            .unwrap();
        let outer = MenuNode::submenu("Outer", "", vec![inner]).unwrap();
        let el = render(&outer, &host()).unwrap();

        assert_eq!(el.children[0].kind, ElementKind::Submenu);
        assert_eq!(el.children[0].label, "Inner");
        assert_eq!(el.children[0].children[0].label, "x");
    }

    #[test]
    fn test_empty_submenu_renders_empty_container() {
        let node = MenuNode::submenu("Empty", "", Vec::new()).unwrap();
        let el = render(&node, &host()).unwrap();
        assert_eq!(el.kind, ElementKind::Submenu);
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_render_menu_uses_dropdown() {
        let root = MenuNode::submenu("TAP Help", "", vec![MenuNode::section()]).unwrap();
        let el = render_menu(&root, &host(), &MenuConfig::default()).unwrap();

        assert_eq!(el.kind, ElementKind::Dropdown);
        assert_eq!(el.label, "TAP Help");
        assert_eq!(el.id.as_deref(), Some("tap_help"));
        assert_eq!(el.children, vec![MemoryElement::separator()]);
    }

    #[test]
    fn test_missing_templates_are_reported() {
        let empty = MemoryHost::default();
        assert_eq!(
            render(&MenuNode::section(), &empty),
            Err(RenderError::MissingTemplate(TemplateKind::Separator))
        );

        // Items exist, separators do not
        let items_only = MemoryHost::new(vec![MemoryElement::new(ElementKind::Dropdown, "File")
            .with_child(MemoryElement::new(ElementKind::Item, "Open"))]);
        let root = MenuNode::submenu(
            "Root",
            "",
            vec![MenuNode::leaf(LeafSpec::new("a", "")).unwrap(), MenuNode::section()],
        )
        .unwrap();
        assert_eq!(
            render_menu(&root, &items_only, &MenuConfig::default()),
            Err(RenderError::MissingTemplate(TemplateKind::Separator))
        );
        assert_eq!(
            render(&root, &items_only),
            Err(RenderError::MissingTemplate(TemplateKind::Submenu))
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let root = crate::menu::catalog::static_menu(&crate::config::Config::default()).unwrap();
        let first = render_menu(&root, &host(), &MenuConfig::default()).unwrap();
        let second = render_menu(&root, &host(), &MenuConfig::default()).unwrap();
        assert_eq!(first, second);
    }
}
