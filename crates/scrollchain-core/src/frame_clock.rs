use std::rc::Rc;

use crate::platform::{FrameRequestId, FrameScheduler};

/// Hands out cancellable frame callbacks on top of a [`FrameScheduler`].
#[derive(Clone)]
pub struct FrameClock {
    scheduler: Rc<dyn FrameScheduler>,
}

impl FrameClock {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self { scheduler }
    }

    /// Runs `callback` on the next frame with the frame time in milliseconds.
    ///
    /// Dropping the returned registration cancels the callback if it has not
    /// run yet.
    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(f64) + 'static,
    ) -> FrameCallbackRegistration {
        match self.scheduler.request_frame(Box::new(callback)) {
            Some(id) => FrameCallbackRegistration::new(self.scheduler.clone(), id),
            None => {
                log::warn!("frame request refused by host");
                FrameCallbackRegistration::inactive(self.scheduler.clone())
            }
        }
    }
}

pub struct FrameCallbackRegistration {
    scheduler: Rc<dyn FrameScheduler>,
    id: Option<FrameRequestId>,
}

impl FrameCallbackRegistration {
    fn new(scheduler: Rc<dyn FrameScheduler>, id: FrameRequestId) -> Self {
        Self {
            scheduler,
            id: Some(id),
        }
    }

    fn inactive(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            id: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel_frame(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel_frame(id);
        }
    }
}
