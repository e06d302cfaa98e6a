//! One initialization of the TAP Help menu.
//!
//! ```text
//! Init -> FetchPending -> (FetchSucceeded | FetchFailed) -> Merged
//!      -> Rendered -> Wired -> Idle
//! ```
//!
//! The static tree is built when the session is created. [`MenuSession::initialize`]
//! consumes the session, so the fetch can only be issued once; a reload means
//! a new session. Rendering starts only after the fetch has resolved either
//! way. Nothing in this sequence returns an error to the caller: feed failures
//! degrade to an install menu without releases and a missing host template
//! leaves the toolbar untouched, both with a log entry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::Config;
use crate::host::{NotebookDocument, TemplateSource, Toolbar};
use crate::menu::merge::install_children;
use crate::menu::{merge_install_branch, render_menu, static_menu, wire, MenuError, MenuNode, RenderError};
use crate::releases::{ChannelBundle, FeedError, FeedOutcome, ReleaseFeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    FetchPending,
    FetchSucceeded,
    FetchFailed,
    Merged,
    Rendered,
    Wired,
    Idle,
}

impl SessionState {
    /// States reachable in one step.
    pub fn successors(self) -> &'static [SessionState] {
        use SessionState::*;
        match self {
            Init => &[FetchPending],
            FetchPending => &[FetchSucceeded, FetchFailed],
            FetchSucceeded | FetchFailed => &[Merged],
            // Idle directly from Merged when the host lacks a template
            Merged => &[Rendered, Idle],
            Rendered => &[Wired],
            Wired => &[Idle],
            Idle => &[],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What happened during [`MenuSession::initialize`].
#[derive(Debug)]
pub struct SessionReport {
    /// Every state entered, starting with `Init`.
    pub transitions: Vec<SessionState>,
    /// Why the release list is empty, if the fetch failed.
    pub feed_error: Option<FeedError>,
    /// The merged tree that was rendered.
    pub tree: MenuNode,
    /// Set when the menu could not be rendered and nothing was attached.
    pub render_error: Option<RenderError>,
    /// Number of snippet entries bound to the notebook.
    pub wired: usize,
}

impl SessionReport {
    pub fn final_state(&self) -> SessionState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(SessionState::Init)
    }

    pub fn menu_attached(&self) -> bool {
        self.render_error.is_none()
    }
}

pub struct MenuSession {
    config: Config,
    feed: ReleaseFeed,
    static_tree: MenuNode,
    transitions: Vec<SessionState>,
}

impl MenuSession {
    /// Builds the static menu from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError`] when a configured entry is invalid (e.g. a link
    /// with an empty name or a blank install-from-server snippet). The fixed
    /// install entries are checked here so the merge after the fetch cannot
    /// fail on them.
    pub fn new(config: Config, client: reqwest::Client) -> Result<Self, MenuError> {
        let static_tree = static_menu(&config)?;
        install_children(&ChannelBundle::default(), &config.install)?;
        let feed = ReleaseFeed::new(client, &config);
        Ok(Self {
            config,
            feed,
            static_tree,
            transitions: vec![SessionState::Init],
        })
    }

    pub fn state(&self) -> SessionState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(SessionState::Init)
    }

    pub fn static_tree(&self) -> &MenuNode {
        &self.static_tree
    }

    fn advance(&mut self, next: SessionState) {
        let current = self.state();
        if !current.successors().contains(&next) {
            tracing::error!(from = %current, to = %next, "Invalid menu session transition");
        }
        tracing::debug!(from = %current, to = %next, "Menu session transition");
        self.transitions.push(next);
    }

    /// Runs fetch, merge, render, wire and attach, in that order.
    ///
    /// The dropdown is wired before it is handed to the toolbar, since the
    /// toolbar takes ownership of it.
    pub async fn initialize<T, B, D>(
        mut self,
        templates: &T,
        toolbar: &mut B,
        document: Rc<RefCell<D>>,
    ) -> SessionReport
    where
        T: TemplateSource,
        B: Toolbar<T::Element>,
        D: NotebookDocument + 'static,
    {
        self.advance(SessionState::FetchPending);
        let outcome = self.feed.fetch_and_classify().await;
        let (bundle, feed_error) = match outcome {
            FeedOutcome::Fetched(bundle) => {
                self.advance(SessionState::FetchSucceeded);
                (bundle, None)
            }
            FeedOutcome::Failed(e) => {
                self.advance(SessionState::FetchFailed);
                (ChannelBundle::default(), Some(e))
            }
        };

        let tree = merge_install_branch(&self.static_tree, &bundle, &self.config.install);
        self.advance(SessionState::Merged);

        let mut menu = match render_menu(&tree, templates, &self.config.menu) {
            Ok(menu) => menu,
            Err(e) => {
                tracing::error!(error = %e, "TAP Help menu not rendered");
                self.advance(SessionState::Idle);
                return SessionReport {
                    transitions: self.transitions,
                    feed_error,
                    tree,
                    render_error: Some(e),
                    wired: 0,
                };
            }
        };
        self.advance(SessionState::Rendered);

        let wired = wire(&mut menu, document);
        self.advance(SessionState::Wired);

        toolbar.append_menu(menu);
        self.advance(SessionState::Idle);
        tracing::info!(
            title = %self.config.menu.title,
            weekly = bundle.weekly.len(),
            production = bundle.production.len(),
            wired = wired,
            "TAP Help menu attached"
        );

        SessionReport {
            transitions: self.transitions,
            feed_error,
            tree,
            render_error: None,
            wired,
        }
    }
}
