use chrono::{DateTime, Utc};

/// Local, user-editable copy of a backend record.
///
/// `content` may run ahead of what the backend holds; `last_saved_at` only
/// moves when a write has been confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableDocument<T> {
    content: T,
    last_saved_at: Option<DateTime<Utc>>,
    /// Most recent write confirmed in this session, on the local clock.
    last_confirmed: Option<DateTime<Utc>>,
}

impl<T> EditableDocument<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            last_saved_at: None,
            last_confirmed: None,
        }
    }

    /// A document freshly loaded from the backend, which reports when it was
    /// last written.
    pub fn loaded(content: T, updated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            content,
            last_saved_at: updated_at,
            last_confirmed: None,
        }
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Apply an edit in place and hand back the new content.
    pub fn edit<F>(&mut self, apply: F) -> &T
    where
        F: FnOnce(&mut T),
    {
        apply(&mut self.content);
        &self.content
    }

    pub fn replace(&mut self, content: T) -> &T {
        self.content = content;
        &self.content
    }

    /// Record a confirmed write. A confirmation always replaces the
    /// timestamp reported by the backend on load, whatever its clock said;
    /// only an older local confirmation is ignored.
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        if self.last_confirmed.map_or(true, |prev| at >= prev) {
            self.last_confirmed = Some(at);
            self.last_saved_at = Some(at);
        }
    }
}

impl<T: Default> Default for EditableDocument<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_document_is_unsaved() {
        let doc = EditableDocument::new(String::from("draft"));
        assert_eq!(doc.content(), "draft");
        assert!(doc.last_saved_at().is_none());
    }

    #[test]
    fn test_edit_does_not_touch_saved_timestamp() {
        let saved = Utc::now();
        let mut doc = EditableDocument::loaded(String::from("a"), Some(saved));
        doc.edit(|text| text.push('b'));
        assert_eq!(doc.content(), "ab");
        assert_eq!(doc.last_saved_at(), Some(saved));
    }

    #[test]
    fn test_mark_saved_is_monotonic() {
        let mut doc = EditableDocument::new(0u32);
        let later = Utc::now();
        let earlier = later - Duration::seconds(5);

        doc.mark_saved(later);
        doc.mark_saved(earlier);
        assert_eq!(doc.last_saved_at(), Some(later));
    }

    #[test]
    fn test_confirmed_write_replaces_future_server_timestamp() {
        let server_time = Utc::now() + Duration::days(365 * 70);
        let mut doc = EditableDocument::loaded(String::from("a"), Some(server_time));

        let now = Utc::now();
        doc.mark_saved(now);
        assert_eq!(doc.last_saved_at(), Some(now));
    }
}
