//! Page - one document with the reveal and accessibility behaviors mounted

use folio_a11y::{FocusTrap, KeyboardModality, focusable_elements};
use folio_dom::{DOMRect, Document, DomError, Event, Key, KeyModifiers, NodeId, ScrollBlock, ScrollRequest};
use folio_reveal::{ImageRequest, IntersectionSupport, LazyImageLoader, LoadError, RevealObserver};

use crate::Config;

/// What became visible after the viewport moved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollOutcome {
    /// Elements that just received the revealed class
    pub revealed: Vec<NodeId>,
    /// Images the host should now fetch
    pub image_requests: Vec<ImageRequest>,
}

impl ScrollOutcome {
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.image_requests.is_empty()
    }

    fn extend(&mut self, other: ScrollOutcome) {
        self.revealed.extend(other.revealed);
        self.image_requests.extend(other.image_requests);
    }
}

/// Page error
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("A modal is already open on {0:?}")]
    ModalOpen(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),
}

#[derive(Debug)]
struct Modal {
    trap: FocusTrap,
    return_focus: Option<NodeId>,
}

/// A hosted page
#[derive(Debug)]
pub struct Page {
    document: Document,
    config: Config,
    scroll_y: f64,
    reveal: RevealObserver,
    lazy: LazyImageLoader,
    modality: KeyboardModality,
    modal: Option<Modal>,
    mounted: bool,
}

impl Page {
    pub fn new(document: Document, config: Config) -> Self {
        Self {
            document,
            config,
            scroll_y: 0.0,
            reveal: RevealObserver::new(),
            lazy: LazyImageLoader::new(),
            modality: KeyboardModality::new(),
            modal: None,
            mounted: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    pub fn lazy_images(&self) -> &LazyImageLoader {
        &self.lazy
    }

    pub fn keyboard_modality(&self) -> &KeyboardModality {
        &self.modality
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Current viewport in document coordinates
    pub fn viewport(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, self.scroll_y, self.config.viewport_width, self.config.viewport_height)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start the enabled behaviors and run the first intersection check.
    /// Mounting again tears the previous mount down first.
    pub fn mount(&mut self, support: &dyn IntersectionSupport) -> ScrollOutcome {
        if self.mounted {
            self.unmount();
        }

        if self.config.enable_reveal {
            let count = self.reveal.start(&mut self.document, support);
            tracing::debug!("Reveal observer started with {} elements", count);
        }
        if self.config.enable_lazy_images {
            let count = self.lazy.start(&mut self.document, support);
            tracing::debug!("Lazy loader started with {} images", count);
        }
        if self.config.enable_keyboard_modality {
            self.modality.install(&mut self.document);
        }
        self.mounted = true;
        tracing::info!("Mounted {}", self.document.url());

        self.poll()
    }

    /// Stop everything and close any open modal. Idempotent.
    pub fn unmount(&mut self) {
        self.close_modal();
        self.reveal.stop(&mut self.document);
        self.lazy.stop();
        self.modality.uninstall(&mut self.document);
        if self.mounted {
            tracing::info!("Unmounted {}", self.document.url());
        }
        self.mounted = false;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Move the viewport to `y` (clamped at the top) and run the observers
    pub fn scroll_to(&mut self, y: f64) -> ScrollOutcome {
        self.scroll_y = y.max(0.0);
        self.poll()
    }

    /// Key press on the focused element, or on body when nothing has focus.
    /// An unprevented Tab moves focus through the page's focusable elements.
    /// Returns false when a listener prevented the default action.
    pub fn press_key(&mut self, key: Key, modifiers: KeyModifiers) -> bool {
        let target = self.document.active_element().unwrap_or(self.document.body());
        let mut event = Event::key_down(key.clone(), modifiers);
        let proceed = self.document.dispatch_event(target, &mut event);
        if proceed && key == Key::Tab {
            self.advance_focus(modifiers.shift);
        }
        proceed
    }

    /// Mouse button press on `target`
    pub fn mouse_down(&mut self, target: NodeId) -> bool {
        self.document.dispatch_event(target, &mut Event::mouse_down())
    }

    /// A full click on `target`: mousedown then click. Any scroll the click
    /// requested is carried out.
    pub fn click(&mut self, target: NodeId) -> ScrollOutcome {
        self.mouse_down(target);
        self.document.dispatch_event(target, &mut Event::click());
        self.apply_scroll_requests()
    }

    /// Report the fetch result for a lazy image
    pub fn complete_image(&mut self, request: &ImageRequest, outcome: Result<(), LoadError>) -> Result<(), PageError> {
        LazyImageLoader::complete(&mut self.document, request, outcome)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------

    /// Trap focus inside `container`. Returns whether the trap is active
    /// (false when the container has nothing focusable).
    pub fn open_modal(&mut self, container: NodeId) -> Result<bool, PageError> {
        if let Some(modal) = &self.modal {
            return Err(PageError::ModalOpen(modal.trap.container()));
        }
        if self.document.element(container).is_none() {
            let err = if self.document.tree().get(container).is_some() {
                DomError::NotAnElement(container)
            } else {
                DomError::NodeNotFound(container)
            };
            return Err(err.into());
        }

        let return_focus = self.document.active_element();
        let trap = FocusTrap::activate(&mut self.document, container);
        let active = trap.is_active();
        self.modal = Some(Modal { trap, return_focus });
        Ok(active)
    }

    /// Release the modal's trap and give focus back to whatever had it
    /// before. Returns false when no modal was open.
    pub fn close_modal(&mut self) -> bool {
        let Some(mut modal) = self.modal.take() else {
            return false;
        };
        modal.trap.release(&mut self.document);
        if let Some(previous) = modal.return_focus {
            self.document.focus(previous);
        }
        true
    }

    pub fn modal_container(&self) -> Option<NodeId> {
        self.modal.as_ref().map(|m| m.trap.container())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn poll(&mut self) -> ScrollOutcome {
        let viewport = self.viewport();
        ScrollOutcome {
            revealed: self.reveal.poll(&mut self.document, viewport),
            image_requests: self.lazy.poll(&self.document, viewport),
        }
    }

    fn advance_focus(&mut self, backwards: bool) {
        let order = focusable_elements(&self.document, self.document.root());
        let len = order.len();
        if len == 0 {
            return;
        }
        let current = self.document.active_element().and_then(|id| order.iter().position(|&x| x == id));
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(i), false) => (i + 1) % len,
            (Some(0), true) => len - 1,
            (Some(i), true) => i - 1,
        };
        if let Some(&id) = order.get(next) {
            self.document.focus(id);
        }
    }

    fn apply_scroll_requests(&mut self) -> ScrollOutcome {
        let mut outcome = ScrollOutcome::default();
        for request in self.document.take_scroll_requests() {
            match self.scroll_offset(&request) {
                Some(y) => outcome.extend(self.scroll_to(y)),
                None => tracing::debug!("No layout for scroll target {:?}", request.target),
            }
        }
        outcome
    }

    // Smooth and instant scrolls land on the same offset here.
    fn scroll_offset(&self, request: &ScrollRequest) -> Option<f64> {
        let rect = self.document.layout_rect(request.target)?;
        let view = self.viewport();
        let height = view.height;
        let y = match request.options.block {
            ScrollBlock::Start => rect.top(),
            ScrollBlock::Center => rect.top() + rect.height / 2.0 - height / 2.0,
            ScrollBlock::End => rect.bottom() - height,
            ScrollBlock::Nearest if rect.top() < view.top() => rect.top(),
            ScrollBlock::Nearest if rect.bottom() > view.bottom() => rect.bottom() - height,
            ScrollBlock::Nearest => view.top(),
        };
        Some(y.max(0.0))
    }
}
