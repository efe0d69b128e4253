use std::sync::Mutex;

use super::{Credentials, Flashcard, FlashcardStore, Identity, IdentityProvider};
use crate::error::AppError;

/// Accepts any non-empty user name; the normalized name becomes the owner id.
pub struct MemoryIdentity;

impl IdentityProvider for MemoryIdentity {
    fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        let name = credentials.email.trim();
        if name.is_empty() {
            return Err(AppError::Auth("a user name is required".into()));
        }
        Ok(Identity {
            owner_id: name.to_lowercase(),
            display_name: Some(name.to_string()),
            token: None,
        })
    }

    fn sign_out(&self, _identity: &Identity) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Flashcard>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_cards(cards: Vec<Flashcard>) -> Self {
        MemoryStore {
            cards: Mutex::new(cards),
        }
    }
}

impl FlashcardStore for MemoryStore {
    fn list_cards_for_owner(&self, identity: &Identity) -> Result<Vec<Flashcard>, AppError> {
        let cards = self
            .cards
            .lock()
            .map_err(|_| AppError::Store("card list lock poisoned".into()))?;
        Ok(cards
            .iter()
            .filter(|card| card.owner == identity.owner_id)
            .cloned()
            .collect())
    }

    fn insert_card(&self, identity: &Identity, card: &Flashcard) -> Result<(), AppError> {
        if card.owner != identity.owner_id {
            return Err(AppError::Store("card owner does not match the signed-in user".into()));
        }
        let mut cards = self
            .cards
            .lock()
            .map_err(|_| AppError::Store("card list lock poisoned".into()))?;
        cards.push(card.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in(name: &str) -> Identity {
        MemoryIdentity
            .sign_in(&Credentials {
                email: name.into(),
                password: String::new(),
            })
            .unwrap()
    }

    #[test]
    fn blank_user_name_is_an_auth_failure() {
        let result = MemoryIdentity.sign_in(&Credentials::default());
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn owner_id_is_normalized() {
        let identity = sign_in("  Ana@Example.com ");
        assert_eq!(identity.owner_id, "ana@example.com");
        assert_eq!(identity.display_name.as_deref(), Some("Ana@Example.com"));
    }

    #[test]
    fn listing_is_partitioned_by_owner() {
        let store = MemoryStore::with_cards(vec![
            Flashcard::new("ana", "Hola", "Hello").unwrap(),
            Flashcard::new("bo", "Gato", "Cat").unwrap(),
        ]);
        let ana = sign_in("ana");

        store
            .insert_card(&ana, &Flashcard::new("ana", "Perro", "Dog").unwrap())
            .unwrap();

        let fronts: Vec<String> = store
            .list_cards_for_owner(&ana)
            .unwrap()
            .into_iter()
            .map(|card| card.front)
            .collect();
        assert_eq!(fronts, vec!["Hola", "Perro"]);
        assert_eq!(store.list_cards_for_owner(&sign_in("bo")).unwrap().len(), 1);
    }

    #[test]
    fn inserting_for_someone_else_is_refused() {
        let store = MemoryStore::default();
        let result = store.insert_card(&sign_in("ana"), &Flashcard::new("bo", "a", "b").unwrap());
        assert!(matches!(result, Err(AppError::Store(_))));
    }
}
