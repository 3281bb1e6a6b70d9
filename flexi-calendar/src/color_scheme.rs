//! Ambient light/dark preference and color-scheme resolution.
//!
//! ## Usage
//!
//! Hosts implement [`ColorSchemePreference`] to report the system appearance.
//! A calendar configured with [`ColorScheme::System`] follows that
//! preference until it is deactivated.
use std::sync::{
    Arc, Weak,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    prop::CallbackWith,
    theme::{ColorMode, ColorScheme},
};

/// Source of the host's ambient dark-mode preference.
pub trait ColorSchemePreference: Send + Sync {
    /// Returns the current preference.
    fn prefers_dark(&self) -> bool;

    /// Registers a listener for preference changes.
    ///
    /// Returns `None` when the host cannot notify; callers then keep the
    /// value read from [`ColorSchemePreference::prefers_dark`].
    fn subscribe(&self, listener: CallbackWith<bool>) -> Option<Subscription>;
}

/// Handle of a registered preference listener.
///
/// The listener is removed on [`Subscription::unsubscribe`] or on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wraps the closure that removes the listener.
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// A fixed preference that never changes, for headless hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticPreference {
    prefers_dark: bool,
}

impl StaticPreference {
    /// A host that always prefers light.
    pub fn light() -> Self {
        Self { prefers_dark: false }
    }

    /// A host that always prefers dark.
    pub fn dark() -> Self {
        Self { prefers_dark: true }
    }
}

impl ColorSchemePreference for StaticPreference {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn subscribe(&self, _listener: CallbackWith<bool>) -> Option<Subscription> {
        None
    }
}

#[derive(Default)]
struct BroadcasterState {
    prefers_dark: bool,
    next_id: u64,
    listeners: FxHashMap<u64, CallbackWith<bool>>,
}

/// In-process preference source that fans changes out to its subscribers.
#[derive(Clone, Default)]
pub struct PreferenceBroadcaster {
    state: Arc<RwLock<BroadcasterState>>,
}

impl PreferenceBroadcaster {
    /// Creates a broadcaster with an initial preference.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(BroadcasterState {
                prefers_dark,
                ..BroadcasterState::default()
            })),
        }
    }

    /// Updates the preference and notifies every current subscriber.
    ///
    /// Listeners run outside the lock, so they may subscribe or unsubscribe.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let listeners: Vec<CallbackWith<bool>> = {
            let mut state = self.state.write();
            if state.prefers_dark == prefers_dark {
                return;
            }
            state.prefers_dark = prefers_dark;
            state.listeners.values().cloned().collect()
        };
        debug!(
            "ambient preference changed to {}, notifying {} listener(s)",
            ColorMode::from_dark(prefers_dark).as_str(),
            listeners.len()
        );
        for listener in listeners {
            listener.call(prefers_dark);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.read().listeners.len()
    }
}

impl ColorSchemePreference for PreferenceBroadcaster {
    fn prefers_dark(&self) -> bool {
        self.state.read().prefers_dark
    }

    fn subscribe(&self, listener: CallbackWith<bool>) -> Option<Subscription> {
        let id = {
            let mut state = self.state.write();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.insert(id, listener);
            id
        };
        let state: Weak<RwLock<BroadcasterState>> = Arc::downgrade(&self.state);
        Some(Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.write().listeners.remove(&id);
            }
        }))
    }
}

/// Resolves a [`ColorScheme`] against an ambient preference source.
pub struct ColorSchemeState {
    scheme: ColorScheme,
    source: Arc<dyn ColorSchemePreference>,
    system_dark: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl ColorSchemeState {
    /// Creates an inactive resolver. Call [`ColorSchemeState::activate`]
    /// to start following the ambient preference.
    pub fn new(scheme: ColorScheme, source: Arc<dyn ColorSchemePreference>) -> Self {
        Self {
            scheme,
            source,
            system_dark: Arc::new(AtomicBool::new(false)),
            subscription: None,
        }
    }

    /// Reads the ambient preference and subscribes to changes.
    ///
    /// Does nothing unless the scheme is [`ColorScheme::System`].
    pub fn activate(&mut self) {
        self.deactivate();
        if self.scheme != ColorScheme::System {
            return;
        }
        self.system_dark
            .store(self.source.prefers_dark(), Ordering::Release);
        let flag = Arc::clone(&self.system_dark);
        self.subscription = self.source.subscribe(CallbackWith::new(move |dark: bool| {
            flag.store(dark, Ordering::Release);
        }));
        if self.subscription.is_none() {
            debug!("ambient preference source cannot notify, keeping snapshot");
        }
    }

    /// Releases the ambient subscription, if any.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Returns true while subscribed to the ambient preference.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns the requested scheme.
    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Changes the requested scheme, re-subscribing as needed.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        if self.scheme == scheme {
            return;
        }
        self.scheme = scheme;
        self.activate();
    }

    /// Returns true when the calendar should render in dark mode.
    pub fn is_dark(&self) -> bool {
        match self.scheme {
            ColorScheme::Dark => true,
            ColorScheme::Light => false,
            ColorScheme::System => self.system_dark.load(Ordering::Acquire),
        }
    }

    /// Returns the resolved display mode.
    pub fn resolved_mode(&self) -> ColorMode {
        ColorMode::from_dark(self.is_dark())
    }
}

impl Drop for ColorSchemeState {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for ColorSchemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorSchemeState")
            .field("scheme", &self.scheme)
            .field("is_dark", &self.is_dark())
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_scheme_follows_ambient_changes() {
        let broadcaster = PreferenceBroadcaster::new(true);
        let mut state = ColorSchemeState::new(ColorScheme::System, Arc::new(broadcaster.clone()));
        state.activate();
        assert!(state.is_dark());
        assert_eq!(broadcaster.subscriber_count(), 1);

        broadcaster.set_prefers_dark(false);
        assert!(!state.is_dark());
        assert_eq!(state.resolved_mode(), ColorMode::Light);

        state.deactivate();
        assert_eq!(broadcaster.subscriber_count(), 0);
        broadcaster.set_prefers_dark(true);
        assert!(!state.is_dark());
    }

    #[test]
    fn test_explicit_schemes_ignore_ambient_preference() {
        let broadcaster = PreferenceBroadcaster::new(true);
        let mut state = ColorSchemeState::new(ColorScheme::Light, Arc::new(broadcaster.clone()));
        state.activate();
        assert!(!state.is_dark());
        assert_eq!(broadcaster.subscriber_count(), 0);

        state.set_color_scheme(ColorScheme::Dark);
        assert!(state.is_dark());

        state.set_color_scheme(ColorScheme::System);
        assert!(state.is_dark());
        assert_eq!(broadcaster.subscriber_count(), 1);

        state.set_color_scheme(ColorScheme::Light);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn test_static_preference_keeps_snapshot() {
        let mut state = ColorSchemeState::new(ColorScheme::System, Arc::new(StaticPreference::dark()));
        state.activate();
        assert!(state.is_dark());
        assert!(!state.is_subscribed());
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let broadcaster = PreferenceBroadcaster::new(false);
        {
            let mut state =
                ColorSchemeState::new(ColorScheme::System, Arc::new(broadcaster.clone()));
            state.activate();
            assert_eq!(broadcaster.subscriber_count(), 1);
        }
        assert_eq!(broadcaster.subscriber_count(), 0);

        let subscription = broadcaster.subscribe(CallbackWith::new(|_| {}));
        assert_eq!(broadcaster.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
