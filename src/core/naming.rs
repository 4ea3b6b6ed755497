use convert_case::{Case, Casing};
use serde::Serialize;
use std::fmt;

/// Naming identity of a model, used for form and routing conventions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelName {
    pub name: String,
    pub singular: String,
    pub plural: String,
    pub element: String,
    pub human: String,
    pub param_key: String,
    pub route_key: String,
    pub i18n_key: String,
}

impl ModelName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let element = name.to_case(Case::Snake);
        let singular = element.clone();
        let plural = pluralize(&singular);
        Self {
            human: humanize(&element),
            param_key: singular.clone(),
            route_key: plural.clone(),
            i18n_key: singular.clone(),
            name,
            singular,
            plural,
            element,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Class-level naming for record types.
pub trait Model {
    fn model_name() -> ModelName;
}

pub(crate) fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// `first_name` -> `First name`
pub fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let ends_with_consonant_y = word.ends_with('y')
        && !word
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c));
    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}
