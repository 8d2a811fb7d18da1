/* crates/weft-render/src/slots.rs */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::BoxFuture;
use crate::errors::RenderError;

/// Renders fixed slot content. Call arguments never reach it.
pub type SlotFn = Arc<dyn Fn() -> BoxFuture<Result<Option<Value>, RenderError>> + Send + Sync>;

/// Renders parametrized slot content with caller-supplied arguments.
pub type SlotArgsFn =
  Arc<dyn Fn(Vec<Value>) -> BoxFuture<Result<Option<Value>, RenderError>> + Send + Sync>;

/// Slot content, classified once at construction.
///
/// Only content that is a single inline expression function honors call
/// arguments; anything else renders unchanged and arguments are dropped.
pub enum SlotContent {
  Static(SlotFn),
  Inline(SlotArgsFn),
}

/// Slot names that would shadow the accessor's own methods.
const RESERVED_SLOT_NAMES: &[&str] = &["has", "render"];

/// Named content-projection accessor for one render-context instantiation.
///
/// Argument-less renders are cached per name for the lifetime of the
/// instance; entries never expire. Argumented renders bypass the cache
/// entirely.
pub struct Slots {
  slots: Option<HashMap<String, SlotContent>>,
  cache: Mutex<HashMap<String, String>>,
}

impl Slots {
  /// Fails when a slot name collides with a reserved accessor property.
  pub fn new(slots: Option<HashMap<String, SlotContent>>) -> Result<Self, RenderError> {
    if let Some(map) = &slots {
      for name in map.keys() {
        if RESERVED_SLOT_NAMES.contains(&name.as_str()) {
          return Err(RenderError::configuration(format!("slot name \"{name}\" is reserved")));
        }
      }
    }
    Ok(Self { slots, cache: Mutex::new(HashMap::new()) })
  }

  pub fn has(&self, name: &str) -> bool {
    self.slots.as_ref().is_some_and(|map| map.contains_key(name))
  }

  /// Render the named slot. `None` when no slot map was supplied or the
  /// name is absent. A render result of JSON `null` passes through as
  /// `None`, never the string "null".
  pub async fn render(&self, name: &str, args: &[Value]) -> Result<Option<String>, RenderError> {
    let Some(map) = &self.slots else {
      return Ok(None);
    };
    let Some(content) = map.get(name) else {
      return Ok(None);
    };

    let cacheable = args.is_empty();
    if cacheable {
      let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
      if let Some(hit) = cache.get(name) {
        return Ok(Some(hit.clone()));
      }
    }

    let rendered = match content {
      SlotContent::Static(render) => render().await?,
      SlotContent::Inline(render) => render(args.to_vec()).await?,
    };
    let text = rendered.and_then(coerce);

    if cacheable && let Some(ref value) = text {
      self
        .cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), value.clone());
    }
    Ok(text)
  }
}

/// String coercion for rendered slot values. `null` is absent content.
fn coerce(value: Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s),
    Value::Bool(b) => Some(b.to_string()),
    Value::Number(n) => Some(n.to_string()),
    other => Some(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use serde_json::json;

  use super::*;

  fn counted_static(counter: Arc<AtomicUsize>, value: Value) -> SlotContent {
    SlotContent::Static(Arc::new(move || {
      let counter = counter.clone();
      let value = value.clone();
      Box::pin(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(value))
      })
    }))
  }

  fn joining_inline(counter: Arc<AtomicUsize>) -> SlotContent {
    SlotContent::Inline(Arc::new(move |args| {
      let counter = counter.clone();
      Box::pin(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
        Ok(Some(Value::String(parts.join(","))))
      })
    }))
  }

  fn single(name: &str, content: SlotContent) -> HashMap<String, SlotContent> {
    let mut map = HashMap::new();
    map.insert(name.to_string(), content);
    map
  }

  #[tokio::test]
  async fn no_slot_map_renders_nothing() {
    let slots = Slots::new(None).unwrap();
    assert!(!slots.has("default"));
    assert_eq!(slots.render("default", &[]).await.unwrap(), None);
  }

  #[tokio::test]
  async fn absent_name_renders_nothing() {
    let counter = Arc::new(AtomicUsize::new(0));
    let slots = Slots::new(Some(single("default", counted_static(counter, json!("hi"))))).unwrap();
    assert!(slots.has("default"));
    assert!(!slots.has("footer"));
    assert_eq!(slots.render("footer", &[]).await.unwrap(), None);
  }

  #[tokio::test]
  async fn argless_render_invokes_content_exactly_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let slots =
      Slots::new(Some(single("default", counted_static(counter.clone(), json!("hello"))))).unwrap();

    let first = slots.render("default", &[]).await.unwrap();
    let second = slots.render("default", &[]).await.unwrap();
    assert_eq!(first.as_deref(), Some("hello"));
    assert_eq!(first, second);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn argumented_call_invokes_inline_and_skips_cache() {
    let counter = Arc::new(AtomicUsize::new(0));
    let slots = Slots::new(Some(single("item", joining_inline(counter.clone())))).unwrap();

    let args = [json!(1), json!(2)];
    assert_eq!(slots.render("item", &args).await.unwrap().as_deref(), Some("1,2"));
    assert_eq!(slots.render("item", &args).await.unwrap().as_deref(), Some("1,2"));
    // No cache consulted or populated: both calls hit the function.
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    // A later argument-less call renders again, then caches.
    assert_eq!(slots.render("item", &[]).await.unwrap().as_deref(), Some(""));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn static_content_drops_arguments() {
    let counter = Arc::new(AtomicUsize::new(0));
    let slots = Slots::new(Some(single("body", counted_static(counter, json!("fixed"))))).unwrap();
    let out = slots.render("body", &[json!(1)]).await.unwrap();
    assert_eq!(out.as_deref(), Some("fixed"));
  }

  #[tokio::test]
  async fn argumented_calls_never_populate_cache() {
    let counter = Arc::new(AtomicUsize::new(0));
    let slots =
      Slots::new(Some(single("body", counted_static(counter.clone(), json!("fixed"))))).unwrap();
    slots.render("body", &[json!(1)]).await.unwrap();
    slots.render("body", &[]).await.unwrap();
    // Second call missed the cache: the argumented call stored nothing.
    assert_eq!(counter.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn reserved_slot_name_is_a_configuration_error() {
    let counter = Arc::new(AtomicUsize::new(0));
    let err = Slots::new(Some(single("render", counted_static(counter.clone(), json!("x")))))
      .err()
      .expect("construction must fail");
    assert!(matches!(err, RenderError::Configuration(_)));
    // Fails before any rendering occurs.
    assert_eq!(counter.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn null_render_result_passes_through() {
    let content = SlotContent::Static(Arc::new(|| Box::pin(async { Ok(Some(Value::Null)) })));
    let slots = Slots::new(Some(single("maybe", content))).unwrap();
    assert_eq!(slots.render("maybe", &[]).await.unwrap(), None);
  }

  #[tokio::test]
  async fn non_string_results_are_coerced() {
    let content = SlotContent::Static(Arc::new(|| Box::pin(async { Ok(Some(json!(42))) })));
    let slots = Slots::new(Some(single("count", content))).unwrap();
    assert_eq!(slots.render("count", &[]).await.unwrap().as_deref(), Some("42"));
  }

  #[tokio::test]
  async fn slot_errors_propagate() {
    let content =
      SlotContent::Static(Arc::new(|| Box::pin(async { Err(RenderError::render("nested boom")) })));
    let slots = Slots::new(Some(single("bad", content))).unwrap();
    let err = slots.render("bad", &[]).await.err().expect("must propagate");
    assert!(matches!(err, RenderError::Render(_)));
  }
}
