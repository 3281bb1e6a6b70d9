//! Closure handles carried by calendar configuration.
//!
//! ## Usage
//!
//! Event hooks (`on_date_select`, `on_month_change`, preference listeners)
//! take a [`CallbackWith`]; content hooks (`render_day`, `render_header`)
//! take a [`RenderSlotWith`]. Both are built from plain closures through
//! `From`, clone by bumping a reference count and compare by identity.

use std::{fmt, sync::Arc};

type SharedFn<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// Event hook invoked with a value, e.g. the date a user picked.
///
/// Two handles are equal only when one was cloned from the other.
pub struct CallbackWith<T, R = ()> {
    handler: SharedFn<T, R>,
}

impl<T, R> CallbackWith<T, R> {
    /// Wraps `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Runs the hook.
    pub fn call(&self, value: T) -> R {
        (self.handler)(value)
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackWith(..)")
    }
}

/// Content hook that turns a context, such as a day cell, into markup.
///
/// A callback can be reused as a render slot; the identity is kept.
pub struct RenderSlotWith<T, R = ()> {
    render: SharedFn<T, R>,
}

impl<T, R> RenderSlotWith<T, R> {
    /// Wraps `render`.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
        }
    }

    /// Produces content for `context`.
    pub fn render(&self, context: T) -> R {
        (self.render)(context)
    }
}

impl<T, R, F> From<F> for RenderSlotWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(render: F) -> Self {
        Self::new(render)
    }
}

impl<T, R> From<CallbackWith<T, R>> for RenderSlotWith<T, R> {
    fn from(callback: CallbackWith<T, R>) -> Self {
        Self {
            render: callback.handler,
        }
    }
}

impl<T, R> Clone for RenderSlotWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            render: Arc::clone(&self.render),
        }
    }
}

impl<T, R> PartialEq for RenderSlotWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render, &other.render)
    }
}

impl<T, R> Eq for RenderSlotWith<T, R> {}

impl<T, R> fmt::Debug for RenderSlotWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderSlotWith(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_callback_identity() {
        let a = CallbackWith::<u32>::new(|_| {});
        let b = a.clone();
        let c = CallbackWith::<u32>::new(|_| {});
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_callback_invokes_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let callback = CallbackWith::new(move |step: usize| {
            counter.fetch_add(step, Ordering::SeqCst);
        });
        callback.call(2);
        callback.clone().call(3);
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_render_slot_from_callback_keeps_identity() {
        let callback = CallbackWith::new(|day: u32| format!("day {day}"));
        let slot: RenderSlotWith<u32, String> = callback.clone().into();
        assert_eq!(slot.render(4), "day 4");
        assert_eq!(slot.clone(), slot);
    }
}
