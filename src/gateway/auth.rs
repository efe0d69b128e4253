use std::cell::RefCell;
use std::rc::Rc;

use super::Identity;

type AuthListener = Rc<dyn Fn(Option<&Identity>)>;

/// Holds the signed-in identity and notifies listeners when it changes.
///
/// "No identity" is the signed-out state; store access is gated on
/// [`AuthSession::current`] returning `Some`.
#[derive(Default)]
pub struct AuthSession {
    current: RefCell<Option<Identity>>,
    listeners: RefCell<Vec<AuthListener>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_auth_change(&self, listener: impl Fn(Option<&Identity>) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn is_current_owner(&self, owner_id: &str) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|identity| identity.owner_id == owner_id)
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.current.borrow_mut() = identity;
        let current = self.current();
        // Listeners may re-enter the session, so no borrow is held while they run.
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(current.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn ana() -> Identity {
        Identity {
            owner_id: "ana".into(),
            display_name: Some("Ana".into()),
            token: None,
        }
    }

    #[test]
    fn listeners_see_sign_in_and_sign_out() {
        let session = Rc::new(AuthSession::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        session.on_auth_change({
            let seen = seen.clone();
            move |identity| seen.borrow_mut().push(identity.map(|id| id.owner_id.clone()))
        });

        session.set_identity(Some(ana()));
        assert!(session.is_signed_in());
        assert!(session.is_current_owner("ana"));
        session.set_identity(None);
        assert!(!session.is_signed_in());
        assert!(!session.is_current_owner("ana"));

        assert_eq!(*seen.borrow(), vec![Some("ana".to_string()), None]);
    }

    #[test]
    fn listeners_may_read_the_session() {
        let session = Rc::new(AuthSession::new());
        let observed = Rc::new(Cell::new(false));
        session.on_auth_change({
            let session = session.clone();
            let observed = observed.clone();
            move |_| observed.set(session.current().is_some())
        });

        session.set_identity(Some(ana()));
        assert!(observed.get());
    }
}
