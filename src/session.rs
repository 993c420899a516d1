use crate::model::Pet;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pets keyed by the session that owns them. Each session holds at most one
/// pet; a session with no pet is still waiting on the name prompt.
#[derive(Default)]
pub(crate) struct SessionStore {
    sessions: HashMap<SessionId, Option<Pet>>,
}

impl SessionStore {
    pub(crate) fn open(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, None);
        id
    }

    /// Binds `pet` to the session, replacing any pet it already had.
    /// Returns false if the session is not open.
    pub(crate) fn adopt(&mut self, id: SessionId, pet: Pet) -> bool {
        match self.sessions.get_mut(&id) {
            Some(slot) => {
                *slot = Some(pet);
                true
            }
            None => false,
        }
    }

    /// Drops the session's pet but keeps the session open.
    pub(crate) fn release(&mut self, id: SessionId) -> Option<Pet> {
        self.sessions.get_mut(&id).and_then(Option::take)
    }

    pub(crate) fn pet(&self, id: SessionId) -> Option<&Pet> {
        self.sessions.get(&id).and_then(Option::as_ref)
    }

    pub(crate) fn pet_mut(&mut self, id: SessionId) -> Option<&mut Pet> {
        self.sessions.get_mut(&id).and_then(Option::as_mut)
    }

    pub(crate) fn end(&mut self, id: SessionId) -> Option<Pet> {
        self.sessions.remove(&id).flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_pet() {
        let mut store = SessionStore::default();
        let id = store.open();
        assert!(store.pet(id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sessions_do_not_share_pets() {
        let mut store = SessionStore::default();
        let a = store.open();
        let b = store.open();
        assert_ne!(a, b);

        assert!(store.adopt(a, Pet::new("Alpha")));
        assert!(store.adopt(b, Pet::new("Beta")));
        store.pet_mut(a).unwrap().feed();

        assert_eq!(store.pet(a).unwrap().hunger, 70);
        assert_eq!(store.pet(b).unwrap().hunger, 50);
    }

    #[test]
    fn adopt_replaces_and_rejects_unknown_sessions() {
        let mut store = SessionStore::default();
        let id = store.open();
        store.adopt(id, Pet::new("Old"));
        store.adopt(id, Pet::new("New"));
        assert_eq!(store.pet(id).unwrap().name, "New");

        let stranger = SessionStore::default().open();
        assert!(!store.adopt(stranger, Pet::new("Ghost")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn release_keeps_session_end_removes_it() {
        let mut store = SessionStore::default();
        let id = store.open();
        store.adopt(id, Pet::new("Mochi"));

        assert_eq!(store.release(id).map(|p| p.name), Some("Mochi".to_string()));
        assert!(store.pet(id).is_none());
        assert_eq!(store.len(), 1);

        store.adopt(id, Pet::new("Again"));
        assert!(store.end(id).is_some());
        assert_eq!(store.len(), 0);
        assert!(store.pet_mut(id).is_none());
    }
}
