//! Persistent journal: a title and a free-text body.

use crate::storage::{KeyValueStore, StorageResult};

pub const TITLE_KEY: &str = "journalTitle";
pub const CONTENT_KEY: &str = "journalContent";
pub const DEFAULT_TITLE: &str = "Journal Entry";

/// Journal bound to a store. Edits are written through immediately.
#[derive(Debug)]
pub struct Journal<S> {
    store: S,
    title: String,
    content: String,
}

impl<S: KeyValueStore> Journal<S> {
    /// Load the journal. Missing or empty values fall back to the defaults.
    pub fn load(store: S) -> StorageResult<Self> {
        let title = store
            .get(TITLE_KEY)?
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let content = store
            .get(CONTENT_KEY)?
            .filter(|c| !c.is_empty())
            .unwrap_or_default();
        Ok(Self {
            store,
            title,
            content,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> StorageResult<()> {
        let title = title.into();
        self.store.set(TITLE_KEY, &title)?;
        self.title = title;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> StorageResult<()> {
        let content = content.into();
        self.store.set(CONTENT_KEY, &content)?;
        self.content = content;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_defaults_when_empty() {
        let journal = Journal::load(MemoryStore::new()).unwrap();
        assert_eq!(journal.title(), "Journal Entry");
        assert_eq!(journal.content(), "");
    }

    #[test]
    fn test_edits_written_through() {
        let store = Arc::new(MemoryStore::new());
        let mut journal = Journal::load(Arc::clone(&store)).unwrap();
        journal.set_title("Moodboard notes").unwrap();
        journal.set_content("warm palette\nmore texture").unwrap();

        assert_eq!(store.get(TITLE_KEY).unwrap().as_deref(), Some("Moodboard notes"));

        let reloaded = Journal::load(store).unwrap();
        assert_eq!(reloaded.title(), "Moodboard notes");
        assert_eq!(reloaded.content(), "warm palette\nmore texture");
    }

    #[test]
    fn test_empty_title_falls_back_to_default() {
        let store = Arc::new(MemoryStore::new());
        let mut journal = Journal::load(Arc::clone(&store)).unwrap();
        journal.set_title("").unwrap();
        assert_eq!(journal.title(), "");
        assert_eq!(Journal::load(store).unwrap().title(), DEFAULT_TITLE);
    }
}
