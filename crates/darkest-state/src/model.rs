//! The persisted state model.
//!
//! Field names on disk are PascalCase (`RoomId`, `Characters`, `IsOp`,
//! `Potions`, `Name`, ...) so existing state files keep loading.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Potion
// ---------------------------------------------------------------------------

/// A potion a character owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Potion {
    pub name: String,
    /// Eicon id shown next to the potion, without the `[eicon]` tags.
    pub eicon: String,
    pub description: String,
}

impl Potion {
    pub fn new(
        name: impl Into<String>,
        eicon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            eicon: eicon.into(),
            description: description.into(),
        }
    }

    /// Returns `true` if any of the three fields is empty.
    pub fn is_incomplete(&self) -> bool {
        self.name.is_empty() || self.eicon.is_empty() || self.description.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// Everything the bot remembers about one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Character {
    #[serde(default)]
    pub is_op: bool,
    /// Owned potions, oldest first. Older state files write `null` here
    /// for characters that never had one.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub potions: Vec<Potion>,
}

impl Character {
    pub fn operator() -> Self {
        Self {
            is_op: true,
            potions: Vec::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Potion>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Potion>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// PersistedState
// ---------------------------------------------------------------------------

/// The durable part of the bot's state: which room it lives in and what
/// it knows about each character.
///
/// Character names are case-sensitive keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersistedState {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub characters: HashMap<String, Character>,
}

impl PersistedState {
    /// Fresh state with no room and each of `operators` marked as an op.
    pub fn seeded<S: AsRef<str>>(operators: &[S]) -> Self {
        let characters = operators
            .iter()
            .map(|name| (name.as_ref().to_string(), Character::operator()))
            .collect();
        Self {
            room_id: None,
            characters,
        }
    }

    /// Returns `true` if `channel` is the room the bot lives in.
    pub fn is_room(&self, channel: &str) -> bool {
        self.room_id.as_deref() == Some(channel)
    }

    /// Gives `potion` to `character`, creating their record if needed.
    ///
    /// A potion missing any of its fields is refused and `false` is
    /// returned.
    pub fn add_potion(&mut self, character: &str, potion: Potion) -> bool {
        if potion.is_incomplete() {
            tracing::error!(%character, ?potion, "refusing potion with missing data");
            return false;
        }

        self.characters
            .entry(character.to_string())
            .or_default()
            .potions
            .push(potion);
        true
    }

    /// Removes and returns the first potion of `character` whose name
    /// matches `potion_name`, ignoring case.
    pub fn remove_potion(
        &mut self,
        character: &str,
        potion_name: &str,
    ) -> Option<Potion> {
        let record = self.characters.get_mut(character)?;
        let wanted = potion_name.to_lowercase();
        let index = record
            .potions
            .iter()
            .position(|p| p.name.to_lowercase() == wanted)?;
        Some(record.potions.remove(index))
    }

    /// The potions `character` owns; empty if they have no record.
    pub fn potions(&self, character: &str) -> &[Potion] {
        self.characters
            .get(character)
            .map(|c| c.potions.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fizz() -> Potion {
        Potion::new("Fizz", "potion1", "Bubbly.")
    }

    #[test]
    fn test_seeded_marks_operators() {
        let state = PersistedState::seeded(&["Op One", "Op Two"]);
        assert_eq!(state.room_id, None);
        assert_eq!(state.characters.len(), 2);
        assert!(state.characters["Op One"].is_op);
        assert!(state.characters["Op Two"].potions.is_empty());
    }

    #[test]
    fn test_add_potion_creates_character_record() {
        let mut state = PersistedState::default();
        assert!(state.add_potion("Alice", fizz()));
        assert_eq!(state.potions("Alice"), &[fizz()]);
        assert!(!state.characters["Alice"].is_op);
    }

    #[test]
    fn test_add_potion_incomplete_is_refused() {
        let mut state = PersistedState::default();
        assert!(!state.add_potion("Alice", Potion::new("Fizz", "", "Bubbly.")));
        assert!(state.characters.is_empty());
    }

    #[test]
    fn test_remove_potion_ignores_case_and_takes_first_match() {
        let mut state = PersistedState::default();
        state.add_potion("Alice", fizz());
        state.add_potion("Alice", Potion::new("FIZZ", "potion2", "Second."));

        let removed = state.remove_potion("Alice", "fIzZ").unwrap();

        assert_eq!(removed, fizz());
        assert_eq!(state.potions("Alice").len(), 1);
        assert_eq!(state.potions("Alice")[0].eicon, "potion2");
    }

    #[test]
    fn test_remove_potion_unknown_returns_none() {
        let mut state = PersistedState::default();
        assert_eq!(state.remove_potion("Nobody", "Fizz"), None);
        state.add_potion("Alice", fizz());
        assert_eq!(state.remove_potion("Alice", "Sparkle"), None);
        assert_eq!(state.potions("Alice").len(), 1);
    }

    #[test]
    fn test_character_names_are_case_sensitive() {
        let mut state = PersistedState::default();
        state.add_potion("Alice", fizz());
        assert!(state.potions("alice").is_empty());
    }

    #[test]
    fn test_serialized_field_names_are_pascal_case() {
        let mut state = PersistedState::default();
        state.room_id = Some("room1".into());
        state.add_potion("Alice", fizz());

        let json = serde_json::to_string(&state).unwrap();

        assert_eq!(
            json,
            r#"{"RoomId":"room1","Characters":{"Alice":{"IsOp":false,"Potions":[{"Name":"Fizz","Eicon":"potion1","Description":"Bubbly."}]}}}"#
        );
    }

    #[test]
    fn test_deserialize_null_potions_as_empty() {
        let json = r#"{"RoomId":null,"Characters":{"Op":{"IsOp":true,"Potions":null}}}"#;
        let state: PersistedState = serde_json::from_str(json).unwrap();
        assert!(state.characters["Op"].is_op);
        assert!(state.characters["Op"].potions.is_empty());
    }
}
