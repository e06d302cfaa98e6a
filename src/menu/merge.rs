use crate::config::InstallBranchConfig;
use crate::menu::node::{LeafSpec, MenuError, MenuNode, Submenu};
use crate::releases::{ChannelBundle, ReleaseEntry};

pub const WEEKLY_HEADER: &str = "Weekly Builds";
pub const WEEKLY_HEADER_TITLE: &str = "Most recent weekly builds.";
pub const PRODUCTION_HEADER: &str = "Production Builds";
pub const PRODUCTION_HEADER_TITLE: &str = "Most recent production builds.";

/// Style class marking entries that install a specific release.
pub const RELEASE_CLASS: &str = "pypi-install";

/// Returns a copy of `tree` whose install submenu lists the bundle.
///
/// The submenu whose id is `branch.id` gets, in order: the central index
/// link, a separator, the weekly header and weekly releases, the production
/// header and production releases, a separator, and the install-from-server
/// snippet. An empty bundle still yields the headers, separators and both
/// fixed entries.
///
/// Inputs are not modified. When no submenu carries the id the tree is
/// returned unchanged.
pub fn merge_install_branch(
    tree: &MenuNode,
    bundle: &ChannelBundle,
    branch: &InstallBranchConfig,
) -> MenuNode {
    let children = match install_children(bundle, branch) {
        Ok(children) => children,
        Err(e) => {
            tracing::error!(error = %e, "Install entries could not be built, keeping static menu");
            return tree.clone();
        }
    };

    let mut replaced = false;
    let merged = replace_children(tree, &branch.id, &children, &mut replaced);
    if !replaced {
        tracing::warn!(id = %branch.id, "Install submenu not found in static menu");
    }
    merged
}

fn replace_children(
    node: &MenuNode,
    id: &str,
    children: &[MenuNode],
    replaced: &mut bool,
) -> MenuNode {
    match node {
        MenuNode::Submenu(sub) if !*replaced && sub.id.as_deref() == Some(id) => {
            *replaced = true;
            MenuNode::Submenu(Submenu {
                children: children.to_vec(),
                ..sub.clone()
            })
        }
        MenuNode::Submenu(sub) => MenuNode::Submenu(Submenu {
            name: sub.name.clone(),
            title: sub.title.clone(),
            id: sub.id.clone(),
            children: sub
                .children
                .iter()
                .map(|child| replace_children(child, id, children, replaced))
                .collect(),
        }),
        other => other.clone(),
    }
}

/// The install submenu's new children.
///
/// Releases that cannot be turned into a leaf are dropped one by one. An
/// error means the fixed entries themselves are invalid, which
/// [`Config::validate`](crate::config::Config::validate) rules out.
pub fn install_children(
    bundle: &ChannelBundle,
    branch: &InstallBranchConfig,
) -> Result<Vec<MenuNode>, MenuError> {
    let mut children = Vec::with_capacity(bundle.len() + 6);

    children.push(MenuNode::leaf(
        LeafSpec::new(&branch.central_name, &branch.central_title).link(&branch.central_url),
    )?);
    children.push(MenuNode::section());

    children.push(MenuNode::leaf(LeafSpec::new(
        WEEKLY_HEADER,
        WEEKLY_HEADER_TITLE,
    ))?);
    children.extend(bundle.weekly.iter().filter_map(release_leaf));

    children.push(MenuNode::leaf(LeafSpec::new(
        PRODUCTION_HEADER,
        PRODUCTION_HEADER_TITLE,
    ))?);
    children.extend(bundle.production.iter().filter_map(release_leaf));

    children.push(MenuNode::section());
    children.push(MenuNode::leaf(
        LeafSpec::new(&branch.server_name, &branch.server_title)
            .link("#")
            .snippet(&branch.server_snippet),
    )?);

    Ok(children)
}

/// `None` for an entry that cannot be shown; the rest of the branch is kept.
fn release_leaf(entry: &ReleaseEntry) -> Option<MenuNode> {
    let leaf = MenuNode::leaf(
        LeafSpec::new(&entry.version, &entry.display_title)
            .snippet(&entry.snippet)
            .style_class(RELEASE_CLASS),
    );
    match leaf {
        Ok(node) => Some(node),
        Err(e) => {
            tracing::warn!(version = %entry.version, error = %e, "Release entry skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::menu::catalog::static_menu;
    use crate::menu::node::{Leaf, LeafAction};
    use crate::releases::{classify, ReleaseRecord};
    use pretty_assertions::assert_eq;

    fn bundle_of(versions: &[(&str, &str)]) -> ChannelBundle {
        let records = versions.iter().map(|(v, t)| ReleaseRecord {
            version: v.to_string(),
            upload_time: Some(t.to_string()),
        });
        classify(records.collect::<Vec<_>>(), "pypi.python.org", &InstallBranchConfig::default())
    }

    fn names(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name().unwrap_or("----")).collect()
    }

    #[test]
    fn test_empty_bundle_keeps_fixed_structure() {
        let config = Config::default();
        let tree = static_menu(&config).unwrap();
        let merged = merge_install_branch(&tree, &ChannelBundle::default(), &config.install);

        let install = merged.find_submenu("install-atk").unwrap();
        assert_eq!(
            names(&install.children),
            vec![
                "From PyPi central",
                "----",
                "Weekly Builds",
                "Production Builds",
                "----",
                "From ATK Server",
            ]
        );
    }

    #[test]
    fn test_releases_follow_their_headers() {
        let config = Config::default();
        let tree = static_menu(&config).unwrap();
        let bundle = bundle_of(&[
            ("0.1", "2015-01-01"),
            ("0.2.dev1", "2015-03-01"),
            ("0.2.post1", "2015-02-01"),
        ]);
        let merged = merge_install_branch(&tree, &bundle, &config.install);

        let install = merged.find_submenu("install-atk").unwrap();
        assert_eq!(
            names(&install.children),
            vec![
                "From PyPi central",
                "----",
                "Weekly Builds",
                "0.2.dev1",
                "0.1",
                "Production Builds",
                "0.2.post1",
                "----",
                "From ATK Server",
            ]
        );
    }

    #[test]
    fn test_release_leaf_carries_entry_fields() {
        let bundle = bundle_of(&[("0.2.post1", "2015-02-01")]);
        let children = install_children(&bundle, &InstallBranchConfig::default()).unwrap();

        match &children[4] {
            MenuNode::Leaf(Leaf {
                name,
                title,
                action: LeafAction::Snippet(snippet),
                style_class,
                ..
            }) => {
                assert_eq!(name, "0.2.post1");
                assert_eq!(title, &bundle.production[0].display_title);
                assert_eq!(snippet, &bundle.production[0].snippet);
                assert_eq!(style_class.as_deref(), Some(RELEASE_CLASS));
            }
            other => panic!("expected release leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_headers_are_inert_and_fixed_entries_act() {
        let children =
            install_children(&ChannelBundle::default(), &InstallBranchConfig::default()).unwrap();
        assert!(matches!(
            &children[0],
            MenuNode::Leaf(Leaf {
                action: LeafAction::Link(_),
                ..
            })
        ));
        assert!(matches!(
            &children[2],
            MenuNode::Leaf(Leaf {
                action: LeafAction::Inert,
                ..
            })
        ));
        assert!(children[5].snippet().unwrap().contains("YOUR_ATK_SERVER_URL"));
    }

    #[test]
    fn test_unusable_release_keeps_fixed_entries() {
        let config = Config::default();
        let tree = static_menu(&config).unwrap();
        let mut bundle = bundle_of(&[("0.1", "2015-01-01"), ("0.2.post1", "2015-02-01")]);
        let mut blank = bundle.weekly[0].clone();
        blank.version = "  ".to_string();
        bundle.weekly.insert(0, blank);

        let merged = merge_install_branch(&tree, &bundle, &config.install);

        let install = merged.find_submenu("install-atk").unwrap();
        assert_eq!(
            names(&install.children),
            vec![
                "From PyPi central",
                "----",
                "Weekly Builds",
                "0.1",
                "Production Builds",
                "0.2.post1",
                "----",
                "From ATK Server",
            ]
        );
    }

    #[test]
    fn test_merge_does_not_touch_inputs_or_siblings() {
        let config = Config::default();
        let tree = static_menu(&config).unwrap();
        let before = tree.clone();
        let bundle = bundle_of(&[("0.1", "2015-01-01")]);

        let merged = merge_install_branch(&tree, &bundle, &config.install);

        assert_eq!(tree, before);
        assert_eq!(merged.children().len(), tree.children().len());
        assert_eq!(&merged.children()[1..], &tree.children()[1..]);
    }

    #[test]
    fn test_missing_branch_returns_tree_unchanged() {
        let config = Config::default();
        let tree = static_menu(&config).unwrap();
        let branch = InstallBranchConfig {
            id: "no-such-menu".to_string(),
            ..InstallBranchConfig::default()
        };
        assert_eq!(merge_install_branch(&tree, &ChannelBundle::default(), &branch), tree);
    }

    #[test]
    fn test_only_first_matching_branch_replaced() {
        let config = Config::default();
        let first = MenuNode::submenu("A", "", Vec::new()).unwrap().with_id("install-atk");
        let second = MenuNode::submenu("B", "", Vec::new()).unwrap().with_id("install-atk");
        let tree = MenuNode::submenu("Root", "", vec![first, second]).unwrap();

        let merged = merge_install_branch(&tree, &ChannelBundle::default(), &config.install);
        assert_eq!(merged.children()[0].children().len(), 6);
        assert!(merged.children()[1].children().is_empty());
    }
}
