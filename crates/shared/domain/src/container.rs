//! Generic structured record used as the serialization interchange format.
//!
//! A [`DataContainer`] is an ordered map of string keys to [`DataValue`]s. Nested
//! containers are addressed with dotted [`DataQuery`] paths, so
//! `container.get_int("Item.Count")` reads the `Count` field of the `Item` view.
//!
//! Both types are `serde` compatible and map naturally onto JSON objects.

use crate::query::{DataQuery, queries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value stored in a [`DataContainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<DataValue>),
    View(DataContainer),
}

impl DataValue {
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to doubles; the reverse is never implicit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_view(&self) -> Option<&DataContainer> {
        match self {
            Self::View(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for DataValue {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<DataContainer> for DataValue {
    fn from(v: DataContainer) -> Self {
        Self::View(v)
    }
}

/// Ordered, keyed, nested record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContainer {
    entries: BTreeMap<String, DataValue>,
}

impl DataContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`DataContainer::set`].
    #[must_use]
    pub fn with(mut self, path: impl Into<DataQuery>, value: impl Into<DataValue>) -> Self {
        self.set(path, value);
        self
    }

    /// Looks up the value at `path`. Every segment but the last must resolve to a view.
    pub fn get(&self, path: impl Into<DataQuery>) -> Option<&DataValue> {
        let query = path.into();
        let (last, parents) = query.parts().split_last()?;
        let mut current = self;
        for part in parents {
            current = current.entries.get(part)?.as_view()?;
        }
        current.entries.get(last)
    }

    /// Stores `value` at `path`, creating intermediate views as needed.
    ///
    /// A non-view value sitting on an intermediate segment is replaced by an empty
    /// view. An empty path leaves the container untouched.
    pub fn set(&mut self, path: impl Into<DataQuery>, value: impl Into<DataValue>) -> &mut Self {
        let query = path.into();
        let Some((last, parents)) = query.parts().split_last() else {
            return self;
        };
        let mut current = &mut *self;
        for part in parents {
            current = view_slot(current.entries.entry(part.clone()).or_insert_with(|| Self::new().into()));
        }
        current.entries.insert(last.clone(), value.into());
        self
    }

    /// Removes and returns the value at `path`.
    pub fn remove(&mut self, path: impl Into<DataQuery>) -> Option<DataValue> {
        let query = path.into();
        let (last, parents) = query.parts().split_last()?;
        let mut current: &mut Self = self;
        for part in parents {
            current = match current.entries.get_mut(part)? {
                DataValue::View(view) => view,
                _ => return None,
            };
        }
        current.entries.remove(last)
    }

    pub fn contains(&self, path: impl Into<DataQuery>) -> bool {
        self.get(path).is_some()
    }

    pub fn get_bool(&self, path: impl Into<DataQuery>) -> Option<bool> {
        self.get(path).and_then(DataValue::as_bool)
    }

    pub fn get_int(&self, path: impl Into<DataQuery>) -> Option<i64> {
        self.get(path).and_then(DataValue::as_int)
    }

    pub fn get_double(&self, path: impl Into<DataQuery>) -> Option<f64> {
        self.get(path).and_then(DataValue::as_double)
    }

    pub fn get_string(&self, path: impl Into<DataQuery>) -> Option<&str> {
        self.get(path).and_then(DataValue::as_str)
    }

    pub fn get_list(&self, path: impl Into<DataQuery>) -> Option<&[DataValue]> {
        self.get(path).and_then(DataValue::as_list)
    }

    pub fn get_view(&self, path: impl Into<DataQuery>) -> Option<&Self> {
        self.get(path).and_then(DataValue::as_view)
    }

    /// Reads the [`queries::CONTENT_VERSION`] field. Values outside `i32` count as absent.
    #[must_use]
    pub fn content_version(&self) -> Option<i32> {
        self.get_int(queries::CONTENT_VERSION).and_then(|v| i32::try_from(v).ok())
    }

    pub fn set_content_version(&mut self, version: i32) -> &mut Self {
        self.set(queries::CONTENT_VERSION, version)
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn view_slot(slot: &mut DataValue) -> &mut DataContainer {
    if !matches!(slot, DataValue::View(_)) {
        *slot = DataValue::View(DataContainer::new());
    }
    match slot {
        DataValue::View(view) => view,
        _ => unreachable!("slot was just replaced with a view"),
    }
}
