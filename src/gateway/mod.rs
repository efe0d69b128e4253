use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, Backend};
use crate::error::AppError;

mod auth;
pub mod firebase;
pub mod memory;

pub use auth::AuthSession;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(rename = "uid")]
    pub owner: String,
    pub front: String,
    pub back: String,
}

impl Flashcard {
    /// Builds a card for `owner`, refusing an empty side.
    pub fn new(owner: &str, front: &str, back: &str) -> Result<Self, AppError> {
        if front.trim().is_empty() {
            return Err(AppError::Validation("front text is empty"));
        }
        if back.trim().is_empty() {
            return Err(AppError::Validation("back text is empty"));
        }
        Ok(Flashcard {
            owner: owner.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        })
    }
}

/// Renew bearer tokens this long before they lapse.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// Short-lived bearer token plus the long-lived token that renews it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionToken {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: SystemTime,
}

impl SessionToken {
    pub fn needs_refresh(&self, now: SystemTime) -> bool {
        now + TOKEN_REFRESH_MARGIN >= self.expires_at
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub owner_id: String,
    pub display_name: Option<String>,
    pub token: Option<SessionToken>,
}

#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError>;
    fn sign_out(&self, identity: &Identity) -> Result<(), AppError>;
}

pub trait FlashcardStore: Send + Sync {
    fn list_cards_for_owner(&self, identity: &Identity) -> Result<Vec<Flashcard>, AppError>;
    fn insert_card(&self, identity: &Identity, card: &Flashcard) -> Result<(), AppError>;
}

/// Identity provider and flashcard store, built once by `main`.
#[derive(Clone)]
pub struct Gateway {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn FlashcardStore>,
}

impl Gateway {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match config.backend {
            Backend::Memory => Ok(Self::memory()),
            Backend::Firebase => {
                let firebase = Arc::new(firebase::FirebaseGateway::new(config)?);
                Ok(Gateway {
                    identity: firebase.clone(),
                    store: firebase,
                })
            }
        }
    }

    pub fn memory() -> Self {
        Gateway {
            identity: Arc::new(memory::MemoryIdentity),
            store: Arc::new(memory::MemoryStore::default()),
        }
    }
}

/// Writes a new card through to the store and returns the owner's refreshed list.
pub fn add_card_and_refresh(
    store: &dyn FlashcardStore,
    identity: &Identity,
    front: &str,
    back: &str,
) -> Result<Vec<Flashcard>, AppError> {
    let card = Flashcard::new(&identity.owner_id, front, back)?;
    store.insert_card(identity, &card)?;
    tracing::info!(owner = %identity.owner_id, "flashcard added");
    store.list_cards_for_owner(identity)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::ErrorKind;

    #[derive(Default)]
    struct RecordingStore {
        inserts: Mutex<Vec<Flashcard>>,
    }

    impl FlashcardStore for RecordingStore {
        fn list_cards_for_owner(&self, identity: &Identity) -> Result<Vec<Flashcard>, AppError> {
            let inserts = self.inserts.lock().unwrap();
            Ok(inserts
                .iter()
                .filter(|card| card.owner == identity.owner_id)
                .cloned()
                .collect())
        }

        fn insert_card(&self, _identity: &Identity, card: &Flashcard) -> Result<(), AppError> {
            self.inserts.lock().unwrap().push(card.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl FlashcardStore for FailingStore {
        fn list_cards_for_owner(&self, _identity: &Identity) -> Result<Vec<Flashcard>, AppError> {
            Err(AppError::Store("unreachable".into()))
        }

        fn insert_card(&self, _identity: &Identity, _card: &Flashcard) -> Result<(), AppError> {
            Err(AppError::Store("unreachable".into()))
        }
    }

    fn identity(owner: &str) -> Identity {
        Identity {
            owner_id: owner.to_string(),
            display_name: None,
            token: None,
        }
    }

    #[test]
    fn empty_front_never_reaches_the_store() {
        let store = RecordingStore::default();
        let err = add_card_and_refresh(&store, &identity("ana"), "", "Hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(store.inserts.lock().unwrap().is_empty());

        let err = add_card_and_refresh(&store, &identity("ana"), "Hola", "  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(store.inserts.lock().unwrap().is_empty());
    }

    #[test]
    fn insert_is_followed_by_a_full_reload() {
        let store = RecordingStore::default();
        let ana = identity("ana");
        add_card_and_refresh(&store, &ana, "Hola", "Hello").unwrap();
        let cards = add_card_and_refresh(&store, &ana, "Hola", "Hello").unwrap();

        assert_eq!(cards.len(), 2, "duplicates are allowed");
        assert!(cards.iter().all(|card| card.owner == "ana"));
    }

    #[test]
    fn store_failures_propagate() {
        let err = add_card_and_refresh(&FailingStore, &identity("ana"), "a", "b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
    }

    #[test]
    fn flashcard_serializes_owner_as_uid() {
        let card = Flashcard::new("ana", "Hola", "Hello").unwrap();
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["uid"], "ana");
        assert_eq!(value["front"], "Hola");
        assert_eq!(value["back"], "Hello");
    }

    #[test]
    fn tokens_are_renewed_shortly_before_expiry() {
        let issued = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let token = SessionToken {
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: issued + Duration::from_secs(3600),
        };

        assert!(!token.needs_refresh(issued));
        assert!(!token.needs_refresh(issued + Duration::from_secs(3000)));
        assert!(token.needs_refresh(issued + Duration::from_secs(3300)));
        assert!(token.needs_refresh(issued + Duration::from_secs(7200)));
    }

    #[test]
    fn memory_backend_is_the_default() {
        let gateway = Gateway::from_config(&AppConfig::default()).unwrap();
        let ana = gateway
            .identity
            .sign_in(&Credentials {
                email: "ana@example.com".into(),
                password: String::new(),
            })
            .unwrap();
        assert!(gateway.store.list_cards_for_owner(&ana).unwrap().is_empty());
    }
}
