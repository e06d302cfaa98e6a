//! The static part of the TAP Help menu.
//!
//! Built once at startup from [`Config`]. The install submenu starts out
//! empty; its children are filled in by [`merge_install_branch`] once the
//! release fetch has finished.
//!
//! [`merge_install_branch`]: crate::menu::merge_install_branch

use crate::config::Config;
use crate::menu::node::{LeafSpec, MenuError, MenuNode};

/// Boilerplate for creating a credentials file and connecting to a server.
pub const CREDENTIALS_SNIPPET: &str = "import trustedanalytics as atk\n\n\
print \"ATK installation path = %s\" % (atk.__path__) \n\n\
#You will need your server URI to create the credentials file.\n\
#Don't include the protocol when assigning to atk.server.uri.\n\
#    incorrect atk.server.uri = 'http://my-server.some.domain.com'\n\
#    correct atk.server.uri = 'my-server.some.domain.com'\n\
atk.server.uri = 'YOUR_ATK_SERVER_URI' \n\n\
#The file name passed to create_credentials_file() can be anything you like\n\
#     but you must use the same name when executing atk.connect.\n\
atk.create_credentials_file('ATK.creds')\n\n\
#After creating the credentials file we can connect to the ATK server.\n\
atk.connect(r'/ATK.creds')";

/// Builds the static menu tree.
///
/// Order: install submenu, credentials snippet, separator, then the
/// configured reference links.
pub fn static_menu(config: &Config) -> Result<MenuNode, MenuError> {
    let install = &config.install;

    let mut children = Vec::with_capacity(config.menu.links.len() + 3);
    children.push(
        MenuNode::submenu(&install.name, &install.title, Vec::new())?.with_id(&install.id),
    );
    children.push(MenuNode::leaf(
        LeafSpec::new(
            "Create Credentials",
            "Adds boilerplate for creating the credentials file",
        )
        .link("#")
        .snippet(CREDENTIALS_SNIPPET),
    )?);
    children.push(MenuNode::section());

    for link in &config.menu.links {
        children.push(MenuNode::leaf(
            LeafSpec::new(&link.name, &link.title).link(&link.url),
        )?);
    }

    Ok(MenuNode::submenu(&config.menu.title, &config.menu.title, children)?.with_id(&config.menu.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::menu::node::{Leaf, LeafAction};

    #[test]
    fn test_default_layout() {
        let tree = static_menu(&Config::default()).unwrap();
        let children = tree.children();

        assert_eq!(children.len(), 8);
        assert_eq!(children[0].id(), Some("install-atk"));
        assert!(children[0].children().is_empty());
        assert_eq!(children[1].snippet(), Some(CREDENTIALS_SNIPPET));
        assert!(children[2].is_section());
        assert_eq!(children[3].name(), Some("ATK Documentation"));
        assert_eq!(children[7].name(), Some("TAP Community"));
    }

    #[test]
    fn test_reference_links_open_externally() {
        let tree = static_menu(&Config::default()).unwrap();
        for node in &tree.children()[3..] {
            assert!(matches!(
                node,
                MenuNode::Leaf(Leaf {
                    action: LeafAction::Link(_),
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_credentials_snippet_keeps_comments_and_newlines() {
        assert!(CREDENTIALS_SNIPPET.starts_with("import trustedanalytics as atk\n\n"));
        assert!(CREDENTIALS_SNIPPET.contains("\n#    correct atk.server.uri = 'my-server.some.domain.com'\n"));
        assert!(CREDENTIALS_SNIPPET.ends_with("atk.connect(r'/ATK.creds')"));
    }

    #[test]
    fn test_invalid_link_entry_surfaces_error() {
        let mut config = Config::default();
        config.menu.links = vec![LinkConfig {
            name: String::new(),
            title: "nameless".to_string(),
            url: "https://example.com".to_string(),
        }];
        assert_eq!(static_menu(&config), Err(MenuError::EmptyName));
    }
}
