//! Insertion-ordered records of dynamically typed fields.
//!
//! Composed fixtures collect their values and logs in [`Record`]s keyed by the
//! names given at composition time. Typed access goes through [`Record::field`]
//! or, for a whole struct at once, through [`FromRecord`].

use std::any::{Any, type_name};
use std::fmt;

use crate::error::RecordError;

/// A value that can live in a [`Record`]
pub trait FieldValue: Any + fmt::Debug + Send + Sync {
    /// Clone behind the trait object
    fn clone_box(&self) -> Box<dyn FieldValue>;
    /// View as [`Any`] for downcasting
    fn as_any(&self) -> &dyn Any;
    /// Convert into [`Any`] for downcasting by value
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> FieldValue for T
where
    T: Any + fmt::Debug + Clone + Send + Sync,
{
    fn clone_box(&self) -> Box<dyn FieldValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Clone for Box<dyn FieldValue> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// Named, dynamically typed fields in insertion order
#[derive(Clone, Default)]
pub struct Record {
    fields: Vec<(&'static str, Box<dyn FieldValue>)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with<T: FieldValue>(mut self, key: &'static str, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace the field under `key`
    pub fn insert<T: FieldValue>(&mut self, key: &'static str, value: T) {
        let value: Box<dyn FieldValue> = Box::new(value);
        match self.position(key) {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((key, value)),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| *k == key)
    }

    /// Borrow the field under `key` if it exists and has type `T`
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.field(key).ok()
    }

    /// Borrow the field under `key` as a `T`
    pub fn field<T: Any>(&self, key: &str) -> Result<&T, RecordError> {
        let index = self.position(key).ok_or_else(|| missing(key))?;
        let value: &dyn FieldValue = &*self.fields[index].1;
        value
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| mistyped::<T>(key))
    }

    /// Remove the field under `key` and return it as a `T`
    ///
    /// A mistyped field is left in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Result<T, RecordError> {
        let index = self.position(key).ok_or_else(|| missing(key))?;
        if !(*self.fields[index].1).as_any().is::<T>() {
            return Err(mistyped::<T>(key));
        }
        let (_, value) = self.fields.remove(index);
        value
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| mistyped::<T>(key))
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    /// Whether a field named `key` exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn missing(key: &str) -> RecordError {
    RecordError::MissingField {
        key: key.to_string(),
    }
}

fn mistyped<T>(key: &str) -> RecordError {
    RecordError::FieldType {
        key: key.to_string(),
        expected: type_name::<T>(),
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

/// Types that can be built from a [`Record`]
///
/// Usually derived:
///
/// ```rust
/// use spyglass::{FromRecord, Record};
///
/// #[derive(Debug, FromRecord)]
/// struct Pair {
///     left: i32,
///     #[record(rename = "rightHand")]
///     right: String,
/// }
///
/// let record = Record::new().with("left", 1).with("rightHand", "r".to_string());
/// let pair = Pair::from_record(record).unwrap();
/// assert_eq!((pair.left, pair.right.as_str()), (1, "r"));
/// ```
pub trait FromRecord: Sized {
    /// Consume the record, taking each field by key
    fn from_record(record: Record) -> Result<Self, RecordError>;
}

impl FromRecord for Record {
    fn from_record(record: Record) -> Result<Self, RecordError> {
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let record = Record::new().with("n", 3u32).with("s", "x".to_string());
        assert_eq!(record.get::<u32>("n"), Some(&3));
        assert_eq!(record.field::<String>("s").map(String::as_str), Ok("x"));
        assert_eq!(record.get::<i64>("n"), None);
        assert_eq!(
            record.field::<u8>("missing"),
            Err(RecordError::MissingField {
                key: "missing".into()
            })
        );
        assert!(matches!(
            record.field::<i64>("n"),
            Err(RecordError::FieldType { ref key, .. }) if key == "n"
        ));
    }

    #[test]
    fn test_insertion_order_and_replace() {
        let mut record = Record::new().with("b", 1).with("a", 2);
        record.insert("b", 10);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get::<i32>("b"), Some(&10));
        assert_eq!(record.len(), 2);
        assert!(record.contains_key("a") && !record.contains_key("c"));
    }

    #[test]
    fn test_take_removes_only_matching_types() {
        let mut record = Record::new().with("v", vec![1u8, 2]);
        assert!(record.take::<String>("v").is_err());
        assert!(record.contains_key("v"));
        assert_eq!(record.take::<Vec<u8>>("v"), Ok(vec![1, 2]));
        assert!(record.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Record::new().with("s", String::from("a"));
        let mut copy = original.clone();
        copy.insert("s", String::from("b"));
        assert_eq!(original.get::<String>("s").map(String::as_str), Some("a"));
        assert_eq!(copy.get::<String>("s").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_nested_records_and_debug() {
        let inner = Record::new().with("x", 1);
        let outer = Record::new().with("inner", inner);
        assert_eq!(
            outer
                .get::<Record>("inner")
                .and_then(|r| r.get::<i32>("x")),
            Some(&1)
        );
        assert_eq!(format!("{outer:?}"), r#"{"inner": {"x": 1}}"#);
    }
}
