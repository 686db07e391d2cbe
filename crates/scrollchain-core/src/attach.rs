//! Attaching controllers to elements and tearing them down again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::config::ChainingConfig;
use crate::controller::{ChainSnapshot, ChainingEnvironment, ScrollChainController};
use crate::momentum::PageScrollAnimator;
use crate::platform::{EventDisposition, InputEvent, InputKind, InputListener, ListenerKey, Page, ScrollElement};
use crate::style::{StyleGuard, StyleOverrides, StyleTarget};

const LISTENED_KINDS: [InputKind; 4] = [
    InputKind::TouchStart,
    InputKind::TouchMove,
    InputKind::TouchEnd,
    InputKind::Scroll,
];

/// Body overrides shared by every live attachment on a page.
///
/// The first holder snapshots and unlocks the body; the last one to release
/// restores it, whatever order attachments detach in.
#[derive(Default)]
struct SharedBodyGuard {
    guard: Option<StyleGuard>,
    holders: usize,
}

impl SharedBodyGuard {
    fn retain(&mut self, acquire: impl FnOnce() -> StyleGuard) {
        if self.holders == 0 {
            self.guard = Some(acquire());
        }
        self.holders += 1;
    }

    fn release(&mut self) {
        self.holders = self.holders.saturating_sub(1);
        if self.holders == 0 {
            if let Some(mut guard) = self.guard.take() {
                guard.restore();
                log::debug!("body styles restored");
            }
        }
    }
}

trait Attachment {
    fn detach(&self);
    fn is_detached(&self) -> bool;
    fn listener_count(&self) -> usize;
    fn snapshot(&self) -> Option<ChainSnapshot>;
}

struct LiveAttachment<E, P> {
    element: Rc<E>,
    controller: Rc<RefCell<ScrollChainController<E, P>>>,
    animator: PageScrollAnimator,
    listeners: RefCell<SmallVec<[ListenerKey; 4]>>,
    element_guard: RefCell<Option<StyleGuard>>,
    body_guard: Option<Rc<RefCell<SharedBodyGuard>>>,
    detached: Cell<bool>,
}

impl<E, P> Attachment for LiveAttachment<E, P>
where
    E: ScrollElement + 'static,
    P: Page + 'static,
{
    fn detach(&self) {
        if self.detached.replace(true) {
            return;
        }

        for key in self.listeners.borrow_mut().drain(..) {
            self.element.remove_listener(key);
        }
        self.animator.cancel();
        if let Some(guard) = self.element_guard.borrow_mut().as_mut() {
            guard.restore();
        }
        if let Some(body_guard) = &self.body_guard {
            body_guard.borrow_mut().release();
        }
        log::debug!("scroll chaining detached");
    }

    fn is_detached(&self) -> bool {
        self.detached.get()
    }

    fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn snapshot(&self) -> Option<ChainSnapshot> {
        self.controller.try_borrow().ok().map(|c| c.snapshot())
    }
}

/// Handle returned by [`ScrollChaining::attach`].
///
/// Cloning shares the attachment. Dropping the handle does not detach;
/// call [`detach`](Self::detach), which is safe to repeat.
#[derive(Clone, Default)]
pub struct DetachHandle {
    inner: Option<Rc<dyn Attachment>>,
}

impl DetachHandle {
    /// A handle for an attachment that never happened.
    pub fn inert() -> Self {
        Self { inner: None }
    }

    /// Removes the listeners, cancels pending frames and restores styles.
    pub fn detach(&self) {
        if let Some(inner) = &self.inner {
            inner.detach();
        }
    }

    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Inert handles count as detached.
    pub fn is_detached(&self) -> bool {
        self.inner.as_ref().map_or(true, |inner| inner.is_detached())
    }

    /// Number of listeners currently registered by this attachment.
    pub fn listener_count(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.listener_count())
    }

    pub fn snapshot(&self) -> Option<ChainSnapshot> {
        self.inner.as_ref().and_then(|inner| inner.snapshot())
    }
}

impl fmt::Debug for DetachHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachHandle")
            .field("inert", &self.is_inert())
            .field("detached", &self.is_detached())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Entry point: attaches scroll chaining to elements on one page.
///
/// Attaching is idempotent per element while the previous attachment is live.
pub struct ScrollChaining<E, P> {
    page: Rc<P>,
    env: ChainingEnvironment,
    config: ChainingConfig,
    attachments: Vec<(Rc<E>, DetachHandle)>,
    body_guard: Rc<RefCell<SharedBodyGuard>>,
}

impl<E, P> ScrollChaining<E, P>
where
    E: ScrollElement + 'static,
    P: Page + 'static,
{
    pub fn new(page: Rc<P>, env: ChainingEnvironment, config: ChainingConfig) -> Self {
        Self {
            page,
            env,
            config,
            attachments: Vec::new(),
            body_guard: Rc::default(),
        }
    }

    pub fn config(&self) -> &ChainingConfig {
        &self.config
    }

    /// Attaches to `element`.
    ///
    /// Returns an inert handle without touching anything when the platform
    /// chains natively or the element is missing.
    pub fn attach(&mut self, element: Option<Rc<E>>) -> DetachHandle {
        if !self.env.capability.should_enable_chaining() {
            log::info!("platform chains scroll natively; scroll chaining stays inert");
            return DetachHandle::inert();
        }

        let Some(element) = element else {
            log::error!("scroll element not found; scroll chaining not attached");
            return DetachHandle::inert();
        };

        self.attachments.retain(|(_, handle)| !handle.is_detached());
        if let Some((_, existing)) = self
            .attachments
            .iter()
            .find(|(attached, _)| attached.same_element(&element))
        {
            log::debug!("element already has scroll chaining attached");
            return existing.clone();
        }

        let body_guard = self.config.unlock_body.then(|| {
            let page = self.page.clone();
            self.body_guard.borrow_mut().retain(move || {
                let body: Rc<dyn StyleTarget> = page;
                StyleGuard::acquire(body, &StyleOverrides::body_unlock())
            });
            self.body_guard.clone()
        });
        let handle = attach_element(
            element.clone(),
            self.page.clone(),
            body_guard,
            &self.env,
            self.config.clone(),
        );
        self.attachments.push((element, handle.clone()));
        handle
    }

    /// Number of live attachments.
    pub fn attached_count(&self) -> usize {
        self.attachments
            .iter()
            .filter(|(_, handle)| !handle.is_detached())
            .count()
    }

    /// Detaches every attachment, most recent first.
    pub fn detach_all(&mut self) {
        for (_, handle) in self.attachments.drain(..).rev() {
            handle.detach();
        }
    }
}

fn attach_element<E, P>(
    element: Rc<E>,
    page: Rc<P>,
    body_guard: Option<Rc<RefCell<SharedBodyGuard>>>,
    env: &ChainingEnvironment,
    config: ChainingConfig,
) -> DetachHandle
where
    E: ScrollElement + 'static,
    P: Page + 'static,
{
    let mut element_overrides = StyleOverrides::new();
    if config.touch_hints {
        element_overrides = element_overrides.merge(StyleOverrides::touch_hints());
    }
    if let Some(behavior) = config.overscroll_behavior {
        element_overrides = element_overrides.with_property("overscroll-behavior", behavior.as_css());
    }
    let element_guard = (!element_overrides.is_empty()).then(|| {
        let target: Rc<dyn StyleTarget> = element.clone();
        StyleGuard::acquire(target, &element_overrides)
    });

    let controller = Rc::new(RefCell::new(ScrollChainController::new(
        element.clone(),
        page,
        env,
        config,
    )));
    let animator = controller.borrow().animator();

    let mut listeners: SmallVec<[ListenerKey; 4]> = SmallVec::new();
    for kind in LISTENED_KINDS {
        let weak = Rc::downgrade(&controller);
        let listener: InputListener = Rc::new(move |event: &InputEvent| {
            let Some(shared) = weak.upgrade() else {
                return EventDisposition::Default;
            };
            let Ok(mut controller) = shared.try_borrow_mut() else {
                log::warn!("reentrant {} ignored", event.kind.event_type());
                return EventDisposition::Default;
            };
            controller.handle_event(event)
        });
        match element.add_listener(kind, listener) {
            Some(key) => listeners.push(key),
            None => log::warn!("failed to register {} listener", kind.event_type()),
        }
    }

    log::debug!(
        "scroll chaining attached with {} listeners (body unlocked: {}, element styled: {})",
        listeners.len(),
        body_guard.is_some(),
        element_guard.is_some()
    );

    let attachment = LiveAttachment {
        element,
        controller,
        animator,
        listeners: RefCell::new(listeners),
        element_guard: RefCell::new(element_guard),
        body_guard,
        detached: Cell::new(false),
    };
    DetachHandle {
        inner: Some(Rc::new(attachment)),
    }
}
