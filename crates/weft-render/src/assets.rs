/* crates/weft-render/src/assets.rs */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An asset reference discovered during rendering: a style, script, or link
/// element waiting to be flushed into the document head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetElement {
  pub props: Value,
  pub children: String,
}

impl AssetElement {
  pub fn new(props: Value, children: impl Into<String>) -> Self {
    Self { props, children: children.into() }
  }

  /// An element with empty props, e.g. an inline style block.
  pub fn inline(children: impl Into<String>) -> Self {
    Self::new(Value::Object(serde_json::Map::new()), children)
  }
}

/// Insertion-ordered set. Rendering order is the order assets must be
/// emitted downstream, so a plain hash set will not do.
#[derive(Debug, Clone)]
pub struct OrderedSet<T: PartialEq> {
  items: Vec<T>,
}

impl<T: PartialEq> OrderedSet<T> {
  pub fn new() -> Self {
    Self { items: Vec::new() }
  }

  /// Insert unless already present. Returns whether the item was added.
  pub fn insert(&mut self, item: T) -> bool {
    if self.items.contains(&item) {
      return false;
    }
    self.items.push(item);
    true
  }

  pub fn contains(&self, item: &T) -> bool {
    self.items.contains(item)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }
}

impl<T: PartialEq> Default for OrderedSet<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut set = Self::new();
    for item in iter {
      set.insert(item);
    }
    set
  }
}
