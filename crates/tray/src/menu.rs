//! Static menu model registered with the host.

use std::fmt;
use std::sync::Arc;

use crate::host::Callback;

/// What a menu entry does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Action,
    Separator,
    /// Terminates the host loop.
    Quit,
}

/// A single menu entry. Immutable once built.
#[derive(Clone)]
pub struct MenuItem {
    title: String,
    kind: MenuKind,
    handler: Option<Callback>,
}

impl MenuItem {
    pub fn action(title: impl Into<String>, handler: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            title: title.into(),
            kind: MenuKind::Action,
            handler: Some(Arc::new(handler)),
        }
    }

    pub fn quit(title: impl Into<String>, handler: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            title: title.into(),
            kind: MenuKind::Quit,
            handler: Some(Arc::new(handler)),
        }
    }

    pub fn separator() -> Self {
        Self {
            title: String::new(),
            kind: MenuKind::Separator,
            handler: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    pub fn is_separator(&self) -> bool {
        self.kind == MenuKind::Separator
    }

    /// Runs the handler. Separators do nothing.
    pub fn activate(&self) {
        if let Some(handler) = &self.handler {
            handler();
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn action_runs_handler() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired2 = Arc::clone(&fired);
        let item = MenuItem::action("Do it", move || fired2.store(true, Ordering::SeqCst));

        assert_eq!(item.title(), "Do it");
        assert_eq!(item.kind(), MenuKind::Action);
        item.activate();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn separator_has_no_handler() {
        let item = MenuItem::separator();
        assert!(item.is_separator());
        assert!(item.title().is_empty());
        item.activate(); // Should not panic.
    }

    #[test]
    fn quit_kind() {
        let item = MenuItem::quit("Quit", || {});
        assert_eq!(item.kind(), MenuKind::Quit);
        assert!(!item.is_separator());
    }

    #[test]
    fn debug_output() {
        let dbg = format!("{:?}", MenuItem::quit("Quit", || {}));
        assert!(dbg.contains("Quit"));
    }
}
