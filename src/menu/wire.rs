use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{MenuElement, NotebookDocument};

/// Binds snippet insertion to every rendered element carrying a snippet.
///
/// A click inserts one new cell above the current one, holding the snippet
/// exactly as attached (newlines and comment lines included). Returns the
/// number of elements wired.
pub fn wire<E, D>(root: &mut E, document: Rc<RefCell<D>>) -> usize
where
    E: MenuElement,
    D: NotebookDocument + 'static,
{
    let mut wired = 0;
    wire_element(root, &document, &mut wired);
    tracing::debug!(wired = wired, "Snippet entries wired");
    wired
}

fn wire_element<E, D>(el: &mut E, document: &Rc<RefCell<D>>, wired: &mut usize)
where
    E: MenuElement,
    D: NotebookDocument + 'static,
{
    if let Some(snippet) = el.snippet().map(Rc::<str>::from) {
        let document = Rc::clone(document);
        el.on_click(Rc::new(move || insert_snippet(&document, &snippet)));
        *wired += 1;
    }

    for child in el.children_mut() {
        wire_element(child, document, wired);
    }
}

fn insert_snippet<D: NotebookDocument>(document: &RefCell<D>, snippet: &str) {
    match document.try_borrow_mut() {
        Ok(mut doc) => doc.insert_cell_above(snippet),
        // Only reachable if a handler fires while the document is already
        // being edited on this thread.
        Err(_) => tracing::warn!("Notebook is busy, snippet click ignored"),
    }
}
