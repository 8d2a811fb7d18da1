/* crates/weft-render/src/markdown.rs */

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::BoxFuture;
use crate::errors::RenderError;

/// Invokes a markdown renderer: raw content plus merged options in,
/// rendered HTML out.
pub type MarkdownFn =
  Arc<dyn Fn(String, Value) -> BoxFuture<Result<String, RenderError>> + Send + Sync>;

/// Asynchronous loader that yields the callable on first use.
pub type MarkdownLoadFn =
  Arc<dyn Fn() -> BoxFuture<Result<MarkdownFn, RenderError>> + Send + Sync>;

/// The accepted renderer forms. Anything else is a fatal resolution error.
pub enum MarkdownRenderer {
  /// Module specifier looked up in the registry at call time.
  Specifier(String),
  /// Pending asynchronous module load.
  Pending(MarkdownLoadFn),
  /// Direct callable.
  Callable(MarkdownFn),
}

/// Markdown configuration carried by each render.
pub struct MarkdownConfig {
  pub render: Option<MarkdownRenderer>,
  /// Base options; per-call options are merged over these.
  pub options: Value,
  /// Specifier -> callable table for `MarkdownRenderer::Specifier`.
  pub registry: HashMap<String, MarkdownFn>,
}

impl Default for MarkdownConfig {
  fn default() -> Self {
    Self { render: None, options: Value::Object(serde_json::Map::new()), registry: HashMap::new() }
  }
}

impl MarkdownConfig {
  pub(crate) async fn resolve(&self) -> Result<MarkdownFn, RenderError> {
    match &self.render {
      Some(MarkdownRenderer::Callable(render)) => Ok(render.clone()),
      Some(MarkdownRenderer::Pending(load)) => load().await,
      Some(MarkdownRenderer::Specifier(spec)) => self.registry.get(spec).cloned().ok_or_else(|| {
        RenderError::markdown(format!("no renderer registered for specifier \"{spec}\""))
      }),
      None => Err(RenderError::markdown("unable to resolve a markdown renderer")),
    }
  }
}

/// Shallow merge of option objects; per-call overrides win. Non-object
/// overrides replace the base wholesale, `null` leaves it untouched.
pub(crate) fn merge_options(base: &Value, overrides: &Value) -> Value {
  if overrides.is_null() {
    return base.clone();
  }
  match (base.as_object(), overrides.as_object()) {
    (Some(base_map), Some(override_map)) => {
      let mut merged = base_map.clone();
      for (key, value) in override_map {
        merged.insert(key.clone(), value.clone());
      }
      Value::Object(merged)
    }
    _ => overrides.clone(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn upper_renderer() -> MarkdownFn {
    Arc::new(|content, opts| {
      Box::pin(async move {
        let mode = opts.get("mode").and_then(|v| v.as_str()).unwrap_or("plain");
        Ok(format!("<p data-mode=\"{mode}\">{}</p>", content.to_uppercase()))
      })
    })
  }

  #[tokio::test]
  async fn callable_form_resolves_directly() {
    let config = MarkdownConfig {
      render: Some(MarkdownRenderer::Callable(upper_renderer())),
      ..MarkdownConfig::default()
    };
    let render = config.resolve().await.unwrap();
    assert_eq!(render("hi".to_string(), json!({})).await.unwrap(), "<p data-mode=\"plain\">HI</p>");
  }

  #[tokio::test]
  async fn pending_form_awaits_the_load() {
    let load: MarkdownLoadFn = Arc::new(|| Box::pin(async { Ok(upper_renderer()) }));
    let config =
      MarkdownConfig { render: Some(MarkdownRenderer::Pending(load)), ..MarkdownConfig::default() };
    assert!(config.resolve().await.is_ok());
  }

  #[tokio::test]
  async fn specifier_form_uses_registry() {
    let mut registry = HashMap::new();
    registry.insert("@weft/markdown-remark".to_string(), upper_renderer());
    let config = MarkdownConfig {
      render: Some(MarkdownRenderer::Specifier("@weft/markdown-remark".to_string())),
      options: json!({}),
      registry,
    };
    assert!(config.resolve().await.is_ok());
  }

  #[tokio::test]
  async fn unregistered_specifier_fails() {
    let config = MarkdownConfig {
      render: Some(MarkdownRenderer::Specifier("@weft/missing".to_string())),
      ..MarkdownConfig::default()
    };
    let err = config.resolve().await.err().expect("must fail");
    assert!(matches!(err, RenderError::MarkdownRenderer(_)));
  }

  #[tokio::test]
  async fn unconfigured_renderer_fails() {
    let config = MarkdownConfig::default();
    let err = config.resolve().await.err().expect("must fail");
    assert!(matches!(err, RenderError::MarkdownRenderer(_)));
  }

  #[test]
  fn per_call_options_win() {
    let merged = merge_options(&json!({"mode": "gfm", "smartypants": true}), &json!({"mode": "commonmark"}));
    assert_eq!(merged, json!({"mode": "commonmark", "smartypants": true}));
  }

  #[test]
  fn null_overrides_keep_base() {
    let base = json!({"mode": "gfm"});
    assert_eq!(merge_options(&base, &Value::Null), base);
  }

  #[test]
  fn non_object_overrides_replace() {
    assert_eq!(merge_options(&json!({"a": 1}), &json!("raw")), json!("raw"));
  }
}
