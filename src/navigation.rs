//! Routes and the gate deferring navigation until a pinned item is ready.

use log::info;

use crate::loader::LoadState;

str_enum! {
    /// A view of the application.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Route {
        /// Search and pinned cards.
        Entry = "/",
        Details = "/details",
    }
}

/// Something that can switch the visible view, e.g. a router.
pub trait Navigator {
    fn push(&mut self, route: Route);
}

/// Records the history of pushed routes.
impl Navigator for Vec<Route> {
    fn push(&mut self, route: Route) {
        info!("navigating to {}", route);
        Vec::push(self, route);
    }
}

impl<'a, N: Navigator + ?Sized> Navigator for &'a mut N {
    fn push(&mut self, route: Route) {
        N::push(&mut **self, route);
    }
}

/// What to do with a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The item is ready; navigate now.
    Now,
    /// The item is still loading; navigate once it is ready.
    Latched,
    /// A navigation is already waiting for this item.
    AlreadyLatched,
}

/// A latch holding at most one deferred navigation request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gate {
    latched: bool,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides a navigation request given the item's current state.
    ///
    /// A request made while idle is latched as well: the item is about to load.
    pub fn request(&mut self, state: LoadState) -> Decision {
        if state == LoadState::Ready {
            self.latched = false;
            Decision::Now
        } else if self.latched {
            Decision::AlreadyLatched
        } else {
            self.latched = true;
            Decision::Latched
        }
    }

    /// Clears the latch once the item became ready, returning whether a
    /// navigation was waiting.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.latched, false)
    }

    /// Drops a waiting request without navigating.
    pub fn cancel(&mut self) {
        self.latched = false;
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_navigates_now() {
        let mut gate = Gate::new();
        assert_eq!(gate.request(LoadState::Ready), Decision::Now);
        assert!(!gate.release());
    }

    #[test]
    fn latches_once_while_loading() {
        let mut gate = Gate::new();
        assert_eq!(gate.request(LoadState::Loading), Decision::Latched);
        assert_eq!(gate.request(LoadState::Loading), Decision::AlreadyLatched);
        assert!(gate.is_latched());

        assert!(gate.release());
        // the latch fires only once
        assert!(!gate.release());
    }

    #[test]
    fn cancelled_request_does_not_fire() {
        let mut gate = Gate::new();
        gate.request(LoadState::Idle);
        gate.cancel();
        assert!(!gate.release());
    }

    #[test]
    fn history() {
        let mut history: Vec<Route> = Vec::new();
        Navigator::push(&mut history, Route::Details);
        Navigator::push(&mut &mut history, Route::Entry);
        assert_eq!(history, [Route::Details, Route::Entry]);
        assert_eq!(Route::Details.as_ref(), "/details");
    }
}
