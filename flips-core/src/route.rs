//! Route decision.

use crate::key::ComponentKey;

/// Where a call goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Run the original implementation.
    Proceed,
    /// Run the same operation on this alternate instead.
    Redirect(ComponentKey),
}

impl Route {
    /// Decide the route for a call declared on `source` whose binding names
    /// `alternate`. A self-binding means no flip.
    pub fn decide(source: ComponentKey, alternate: ComponentKey) -> Self {
        if source == alternate {
            Route::Proceed
        } else {
            Route::Redirect(alternate)
        }
    }

    /// Whether the call is redirected.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Route::Redirect(_))
    }
}
