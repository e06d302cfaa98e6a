use thiserror::Error;

use crate::util::is_placeholder;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by the node constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu entry name must not be empty")]
    EmptyName,

    /// An action field was declared but holds no text.
    #[error("Menu entry '{name}' declares an empty {field}")]
    EmptyAction { name: String, field: &'static str },

    /// Both a real link and a snippet were given; a leaf has one action.
    #[error("Menu entry '{name}' declares both a link and a snippet")]
    ConflictingActions { name: String },
}

// ============================================================================
// Node Types
// ============================================================================

/// What happens when a leaf is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafAction {
    /// Display-only entry (e.g. a channel header).
    Inert,
    /// Opens an external page.
    Link(String),
    /// Inserts the text as a new notebook cell.
    Snippet(String),
}

/// A menu entry with a direct action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub name: String,
    /// Tooltip text.
    pub title: String,
    pub id: Option<String>,
    pub action: LeafAction,
    pub style_class: Option<String>,
}

/// A menu entry holding an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub name: String,
    pub title: String,
    pub id: Option<String>,
    pub children: Vec<MenuNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Leaf(Leaf),
    /// Visual separator.
    Section,
    Submenu(Submenu),
}

/// Declarative description of a leaf, checked by [`MenuNode::leaf`].
///
/// Mirrors how entries are written in a static menu table: every field is
/// optional except the name.
#[derive(Debug, Clone, Default)]
pub struct LeafSpec {
    pub name: String,
    pub title: String,
    pub id: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub style_class: Option<String>,
}

impl LeafSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }
}

impl MenuNode {
    /// Builds a leaf, checking its action fields.
    ///
    /// The `#` link placeholder counts as "no link", so `link("#")` combined
    /// with a snippet yields a snippet leaf.
    pub fn leaf(entry: LeafSpec) -> Result<Self, MenuError> {
        if entry.name.trim().is_empty() {
            return Err(MenuError::EmptyName);
        }

        if entry.link.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(MenuError::EmptyAction {
                name: entry.name,
                field: "link",
            });
        }
        if entry.snippet.as_deref().is_some_and(str::is_empty) {
            return Err(MenuError::EmptyAction {
                name: entry.name,
                field: "snippet",
            });
        }

        let link = entry.link.filter(|l| !is_placeholder(l));
        let action = match (link, entry.snippet) {
            (Some(_), Some(_)) => {
                return Err(MenuError::ConflictingActions { name: entry.name });
            }
            (Some(link), None) => LeafAction::Link(link),
            (None, Some(snippet)) => LeafAction::Snippet(snippet),
            (None, None) => LeafAction::Inert,
        };

        Ok(MenuNode::Leaf(Leaf {
            name: entry.name,
            title: entry.title,
            id: entry.id.filter(|id| !id.is_empty()),
            action,
            style_class: entry.style_class.filter(|c| !c.is_empty()),
        }))
    }

    pub fn section() -> Self {
        MenuNode::Section
    }

    /// Builds a submenu. `children` may be empty.
    pub fn submenu(
        name: impl Into<String>,
        title: impl Into<String>,
        children: Vec<MenuNode>,
    ) -> Result<Self, MenuError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MenuError::EmptyName);
        }
        Ok(MenuNode::Submenu(Submenu {
            name,
            title: title.into(),
            id: None,
            children,
        }))
    }

    /// Sets the id of a leaf or submenu; no-op on sections.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = Some(id.into()).filter(|id| !id.is_empty());
        match &mut self {
            MenuNode::Leaf(leaf) => leaf.id = id,
            MenuNode::Submenu(sub) => sub.id = id,
            MenuNode::Section => {}
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf(leaf) => Some(&leaf.name),
            MenuNode::Submenu(sub) => Some(&sub.name),
            MenuNode::Section => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf(leaf) => leaf.id.as_deref(),
            MenuNode::Submenu(sub) => sub.id.as_deref(),
            MenuNode::Section => None,
        }
    }

    /// Children of a submenu; empty for leaves and sections.
    pub fn children(&self) -> &[MenuNode] {
        match self {
            MenuNode::Submenu(sub) => &sub.children,
            _ => &[],
        }
    }

    pub fn snippet(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf(Leaf {
                action: LeafAction::Snippet(snippet),
                ..
            }) => Some(snippet),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, MenuNode::Section)
    }

    /// Depth-first search for the submenu carrying `id`.
    pub fn find_submenu(&self, id: &str) -> Option<&Submenu> {
        let mut found = None;
        self.walk(&mut |node| match node {
            MenuNode::Submenu(sub) if found.is_none() && sub.id.as_deref() == Some(id) => {
                found = Some(sub);
            }
            _ => {}
        });
        found
    }

    /// Visits every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MenuNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_link_leaf() {
        let node = MenuNode::leaf(
            LeafSpec::new("ATK Git Repo", "ATK Github Repository")
                .link("https://github.com/trustedanalytics/atk"),
        )
        .unwrap();
        match node {
            MenuNode::Leaf(leaf) => assert_eq!(
                leaf.action,
                LeafAction::Link("https://github.com/trustedanalytics/atk".to_string())
            ),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_link_with_snippet_is_snippet_leaf() {
        let node = MenuNode::leaf(
            LeafSpec::new("Create Credentials", "Adds boilerplate")
                .link("#")
                .snippet("import trustedanalytics as atk\n"),
        )
        .unwrap();
        assert_eq!(node.snippet(), Some("import trustedanalytics as atk\n"));
    }

    #[test]
    fn test_placeholder_link_alone_is_inert() {
        let node = MenuNode::leaf(LeafSpec::new("Header", "Header").link("#")).unwrap();
        assert!(matches!(
            node,
            MenuNode::Leaf(Leaf {
                action: LeafAction::Inert,
                ..
            })
        ));
    }

    #[test]
    fn test_conflicting_actions_rejected() {
        let result = MenuNode::leaf(
            LeafSpec::new("Both", "")
                .link("https://example.com")
                .snippet("print(1)"),
        );
        assert_eq!(
            result,
            Err(MenuError::ConflictingActions {
                name: "Both".to_string()
            })
        );
    }

    #[test]
    fn test_empty_action_rejected() {
        let result = MenuNode::leaf(LeafSpec::new("Empty", "").snippet(""));
        assert!(matches!(
            result,
            Err(MenuError::EmptyAction {
                field: "snippet",
                ..
            })
        ));

        let result = MenuNode::leaf(LeafSpec::new("Empty", "").link("  "));
        assert!(matches!(
            result,
            Err(MenuError::EmptyAction { field: "link", .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            MenuNode::leaf(LeafSpec::new("", "title")),
            Err(MenuError::EmptyName)
        );
        assert_eq!(
            MenuNode::submenu(" ", "title", Vec::new()),
            Err(MenuError::EmptyName)
        );
    }

    #[test]
    fn test_empty_submenu_allowed() {
        let node = MenuNode::submenu("Install", "Install", Vec::new()).unwrap();
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_find_submenu_nested() {
        let inner = MenuNode::submenu("Inner", "", Vec::new())
            .unwrap()
            .with_id("install-atk");
        let root = MenuNode::submenu(
            "Root",
            "",
            vec![
                MenuNode::section(),
                MenuNode::submenu("Middle", "", vec![inner]).unwrap(),
            ],
        )
        .unwrap();

        let found = root.find_submenu("install-atk").unwrap();
        assert_eq!(found.name, "Inner");
        assert!(root.find_submenu("missing").is_none());
    }

    #[test]
    fn test_with_id_on_section_is_noop() {
        assert_eq!(MenuNode::section().with_id("x"), MenuNode::Section);
    }

    #[test]
    fn test_walk_visits_in_order() {
        let root = MenuNode::submenu(
            "Root",
            "",
            vec![
                MenuNode::leaf(LeafSpec::new("a", "")).unwrap(),
                MenuNode::submenu(
                    "b",
                    "",
                    vec![MenuNode::leaf(LeafSpec::new("c", "")).unwrap()],
                )
                .unwrap(),
                MenuNode::section(),
            ],
        )
        .unwrap();

        let mut names = Vec::new();
        root.walk(&mut |node| names.push(node.name().unwrap_or("-")));
        assert_eq!(names, vec!["Root", "a", "b", "c", "-"]);
    }
}
