use tokio::sync::watch;

use super::User;

/// Holds the current user and fans changes out to subscribers.
#[derive(Debug)]
pub struct AuthState {
    tx: watch::Sender<Option<User>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    /// Replace the current user and notify every live subscription.
    pub fn set(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: Some(self.tx.subscribe()),
        }
    }
}

/// Handle returned by [`IdentityProvider::subscribe`](super::IdentityProvider::subscribe).
///
/// After [`cancel`](Self::cancel) the handle never yields again, so a torn
/// down view cannot be mutated by a late auth-state change.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: Option<watch::Receiver<Option<User>>>,
}

impl AuthSubscription {
    /// The user at the time of the call, or `None` once cancelled.
    pub fn current(&self) -> Option<User> {
        self.rx.as_ref().and_then(|rx| rx.borrow().clone())
    }

    /// Wait for the next auth-state change.
    ///
    /// Resolves to `None` when the subscription was cancelled or the provider
    /// went away.
    pub async fn changed(&mut self) -> Option<Option<User>> {
        let rx = self.rx.as_mut()?;
        match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => {
                self.rx = None;
                None
            }
        }
    }

    /// Take a change that already happened without waiting.
    pub fn try_changed(&mut self) -> Option<Option<User>> {
        let rx = self.rx.as_mut()?;
        match rx.has_changed() {
            Ok(true) => Some(rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.rx = None;
    }

    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }
}
