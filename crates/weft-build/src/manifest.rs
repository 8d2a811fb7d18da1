/* crates/weft-build/src/manifest.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{BuildInternals, BuildOptions, SerializedRouteData, serialize_route_data};

/// Reserved specifier for the before-hydration script.
pub const BEFORE_HYDRATION_SCRIPT_ID: &str = "weft:scripts/before-hydration.js";

/// Inert empty module substituted for the before-hydration script. The
/// mapping always points here in the serialized manifest; a real script is
/// wired in by the host at runtime when one exists.
pub const EMPTY_MODULE_URI: &str =
  "data:text/javascript;charset=utf-8,//[no before-hydration script]";

/// One route entry in the serialized manifest. `file` stays empty at build
/// time; the host fills it after final URL assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedRouteInfo {
  pub file: String,
  pub links: Vec<String>,
  pub scripts: Vec<String>,
  pub route_data: SerializedRouteData,
}

/// The deployable manifest consumed by the SSR entry module.
///
/// A partial snapshot by design: `page_map` and `renderers` are always
/// null/empty here and are reconstituted at server start by merging with
/// the bundled page-map module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedManifest {
  pub routes: Vec<SerializedRouteInfo>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub site: Option<String>,
  /// `(renderer module reference, renderer configuration)`.
  pub markdown: (String, Value),
  pub page_map: Option<Value>,
  pub renderers: Vec<Value>,
  pub entry_modules: BTreeMap<String, String>,
}

/// Walk accumulated build data into a serialized manifest. Synchronous and
/// pure over the internals snapshot.
pub fn build_manifest(opts: &BuildOptions, internals: &BuildInternals) -> SerializedManifest {
  let mut routes = Vec::new();
  for page in &internals.pages {
    // Hoisted script always first, then the page's other scripts in order.
    let mut scripts = Vec::new();
    if let Some(hoisted) = &page.hoisted_script {
      scripts.push(hoisted.clone());
    }
    scripts.extend(page.scripts.iter().cloned());

    routes.push(SerializedRouteInfo {
      file: String::new(),
      links: page.css.clone(),
      scripts,
      route_data: serialize_route_data(&page.route),
    });
  }

  let mut entry_modules = internals.entry_modules.clone();
  // Deliberate override, not a merge: the reserved specifier always maps to
  // the inert placeholder even when the input supplied a real value.
  entry_modules.insert(BEFORE_HYDRATION_SCRIPT_ID.to_string(), EMPTY_MODULE_URI.to_string());

  SerializedManifest {
    routes,
    site: opts.site.clone(),
    markdown: (opts.markdown_renderer.clone(), opts.markdown_options.clone()),
    page_map: None,
    renderers: Vec::new(),
    entry_modules,
  }
}
