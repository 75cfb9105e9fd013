//! Presentation side effects of navigation
//!
//! The document title is owned by an explicit [`PresentationContext`] rather
//! than a global, so the title hook can run without a rendering environment.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::navigation::NavigationEvent;

/// Receives the title of every committed navigation
pub trait PresentationContext {
    fn set_title(&mut self, title: &str);
}

/// In-memory document title
///
/// Keeps the current title and every title applied so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTitle {
    current: Option<String>,
    applied: Vec<String>,
}

impl DocumentTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Titles in the order they were applied
    pub fn applied(&self) -> &[String] {
        &self.applied
    }
}

impl PresentationContext for DocumentTitle {
    fn set_title(&mut self, title: &str) {
        self.current = Some(title.to_string());
        self.applied.push(title.to_string());
    }
}

/// Builds the hook that applies the target title and then proceeds
///
/// # Examples
///
/// ```
/// use kino_router::{kino_routes, title_hook, DocumentTitle, Router};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let router = Router::from_definitions(kino_routes()).unwrap();
/// let document = Rc::new(RefCell::new(DocumentTitle::new()));
/// router.before_each(title_hook(document.clone()));
///
/// router.navigate("/contact").unwrap();
/// assert_eq!(document.borrow().current(), Some("Контакты"));
/// ```
pub fn title_hook<P>(context: Rc<RefCell<P>>) -> impl FnMut(NavigationEvent) + 'static
where
    P: PresentationContext + 'static,
{
    move |event: NavigationEvent| {
        debug!(title = event.title(), to = %event.to.name(), "applying title");
        context.borrow_mut().set_title(event.title());
        event.proceed();
    }
}
