//! Single-slot pending contactor request.

use drive_common::supervisor::state::ContactorRequest;

/// Holds at most one pending request. A newer request overwrites an older
/// one that has not been serviced yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSlot(Option<ContactorRequest>);

impl RequestSlot {
    pub const fn new() -> Self {
        Self(None)
    }

    /// Store `request`, returning the one it replaced.
    #[inline]
    pub fn store(&mut self, request: ContactorRequest) -> Option<ContactorRequest> {
        self.0.replace(request)
    }

    /// Remove and return the pending request.
    #[inline]
    pub fn take(&mut self) -> Option<ContactorRequest> {
        self.0.take()
    }

    #[inline]
    pub const fn pending(&self) -> Option<ContactorRequest> {
        self.0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }
}
