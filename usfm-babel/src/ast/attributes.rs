use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `key="value"` pair from a word or milestone.
///
/// `key` is canonical (no `x-` prefix, `strongs` already renamed to
/// `strong`); `extended` records whether the source wrote the `x-` prefix so
/// it can be written back the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extended: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            extended: false,
        }
    }

    pub fn extended(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            extended: true,
            ..Self::new(key, value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

/// Ordered attribute list with accessors for the well-known keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.0.push(attribute);
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }

    pub fn lemma(&self) -> Option<String> {
        self.text("lemma")
    }

    pub fn strong(&self) -> Option<String> {
        self.text("strong")
    }

    pub fn morph(&self) -> Option<String> {
        self.text("morph")
    }

    pub fn occurrence(&self) -> Option<String> {
        self.text("occurrence")
    }

    pub fn occurrences(&self) -> Option<String> {
        self.text("occurrences")
    }

    pub fn content_source(&self) -> Option<String> {
        self.text("content-source")
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(attributes: Vec<Attribute>) -> Self {
        Attributes(attributes)
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
