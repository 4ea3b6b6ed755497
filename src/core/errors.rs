use crate::core::naming::humanize;
use serde::Serialize;

/// Field name for errors that belong to the record as a whole.
pub const BASE: &str = "base";

/// Ordered mapping of field name to validation messages.
///
/// Fields keep the order in which they first received a message, and messages
/// keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Errors {
    entries: Vec<(String, Vec<String>)>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    /// Messages recorded for `field`; empty when the field has none.
    pub fn get(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Every (field, message) pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, messages)| {
            messages
                .iter()
                .map(move |message| (name.as_str(), message.as_str()))
        })
    }

    /// Appends every pair from `other`; existing messages are kept.
    pub fn merge_from(&mut self, other: &Errors) {
        for (field, message) in other.iter() {
            self.add(field, message);
        }
    }

    pub fn full_message(field: &str, message: &str) -> String {
        if field == BASE {
            message.to_string()
        } else {
            format!("{} {}", humanize(field), message)
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(field, message)| Self::full_message(field, message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_groups_messages_by_field_in_order() {
        let mut errors = Errors::new();
        errors.add("color", "is too dark");
        errors.add("size", "can't be blank");
        errors.add("color", "is not a primary color");

        assert_eq!(errors.get("color"), ["is too dark", "is not a primary color"]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["color", "size"]);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains("size"));
        assert!(!errors.contains("weight"));
        assert!(errors.get("weight").is_empty());
    }

    #[test]
    fn test_full_messages_humanize_field_names() {
        let mut errors = Errors::new();
        errors.add("first_name", "is too short");
        errors.add_to_base("Balloon has popped");

        assert_eq!(
            errors.full_messages(),
            vec!["First name is too short", "Balloon has popped"]
        );
    }

    #[test]
    fn test_merge_is_additive() {
        let mut own = Errors::new();
        own.add("color", "is too dark");
        let mut other = Errors::new();
        other.add("color", "is too dark");
        other.add("size", "is invalid");

        own.merge_from(&other);

        assert_eq!(own.get("color"), ["is too dark", "is too dark"]);
        assert_eq!(own.get("size"), ["is invalid"]);
    }

    #[test]
    fn test_clear_empties_collection() {
        let mut errors = Errors::new();
        errors.add("color", "is too dark");
        assert!(!errors.is_empty());
        errors.clear();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }
}
