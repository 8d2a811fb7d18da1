/* crates/weft-build/src/types.rs */

// Shared types for the build pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route descriptor produced by the routing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
  pub component: String,
  /// Route pattern source, e.g. `^/blog/([^/]+)/?$`.
  pub pattern: String,
  pub params: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pathname: Option<String>,
}

/// The manifest-embeddable form of a route descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRouteData {
  pub component: String,
  pub pattern: String,
  pub params: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pathname: Option<String>,
}

/// Strip the route descriptor down to its serializable fields.
pub fn serialize_route_data(route: &RouteData) -> SerializedRouteData {
  SerializedRouteData {
    component: route.component.clone(),
    pattern: route.pattern.clone(),
    params: route.params.clone(),
    pathname: route.pathname.clone(),
  }
}

/// Per-route data accumulated by the surrounding build pipeline. The
/// manifest builder only reads it.
#[derive(Debug, Clone)]
pub struct PageBuildData {
  pub component: String,
  pub route: RouteData,
  /// Bundled hoisted-script reference; always emitted first when present.
  pub hoisted_script: Option<String>,
  pub scripts: Vec<String>,
  pub css: Vec<String>,
}

/// Snapshot of build internals consumed by the manifest builder. Page order
/// is the build pipeline's stable processing order.
#[derive(Debug, Clone, Default)]
pub struct BuildInternals {
  pub pages: Vec<PageBuildData>,
  /// Module specifier -> final bundle reference.
  pub entry_modules: BTreeMap<String, String>,
}

impl BuildInternals {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Build-level configuration read by the manifest builder.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub site: Option<String>,
  /// Markdown renderer module reference embedded in the manifest.
  pub markdown_renderer: String,
  pub markdown_options: Value,
}

/// What the configured adapter declares about its server runtime.
#[derive(Debug, Clone)]
pub struct AdapterInfo {
  pub server_entrypoint: String,
  /// Export names to re-export from the entry module. `"default"` is
  /// special-cased into a default re-export.
  pub exports: Option<Vec<String>>,
  /// JSON-serializable value forwarded to the `start` hook.
  pub args: Option<Value>,
  /// Whether the adapter declares a `start` lifecycle hook.
  pub start: bool,
}
