/* crates/weft-build/src/ssr.rs */

//! SSR entry-module synthesis: a two-phase, build-lifecycle-bound plugin.
//! Phase 1 contributes a virtual root input, phase 2 generates its source
//! against a placeholder manifest token, phase 3 rewrites the emitted chunk
//! with the real serialized manifest.

use anyhow::{Context, Result, anyhow, bail};
use regex::{NoExpand, Regex};

use crate::bundle::{BundlerPlugin, OutputBundle, PluginOrder};
use crate::manifest::SerializedManifest;
use crate::types::AdapterInfo;

/// The virtual build entry registered as an extra root input.
pub const SSR_VIRTUAL_MODULE_ID: &str = "@weft-ssr-virtual-entry";

/// Resolved form of the virtual entry, by bundler convention.
pub(crate) const RESOLVED_SSR_VIRTUAL_MODULE_ID: &str = "\0@weft-ssr-virtual-entry";

/// Virtual module exporting the compiled page map.
pub const PAGES_MODULE_ID: &str = "@weft-pages-virtual-entry";

/// Virtual module exporting the loaded renderer list.
pub const RENDERERS_MODULE_ID: &str = "@weft-renderers-virtual-entry";

/// Sentinel replaced with the serialized manifest after bundling. Chosen to
/// never collide with legitimate module code.
pub const MANIFEST_REPLACE: &str = "@@WEFT_MANIFEST_REPLACE@@";

/// Builds the SSR entry module around the configured adapter and injects
/// the serialized manifest into the emitted bundle.
pub struct SsrPlugin {
  adapter: AdapterInfo,
  manifest: Option<SerializedManifest>,
}

impl SsrPlugin {
  pub fn new(adapter: AdapterInfo) -> Self {
    Self { adapter, manifest: None }
  }

  /// Hand over the manifest once build internals are fully populated.
  /// Must happen before the finalize pass runs.
  pub fn set_manifest(&mut self, manifest: SerializedManifest) {
    self.manifest = Some(manifest);
  }
}

impl BundlerPlugin for SsrPlugin {
  fn name(&self) -> &'static str {
    "weft:build:ssr"
  }

  // The textual rewrite must see final chunk content.
  fn order(&self) -> PluginOrder {
    PluginOrder::Post
  }

  fn inputs(&self) -> Vec<String> {
    vec![SSR_VIRTUAL_MODULE_ID.to_string()]
  }

  fn resolve_id(&self, id: &str) -> Option<String> {
    (id == SSR_VIRTUAL_MODULE_ID).then(|| RESOLVED_SSR_VIRTUAL_MODULE_ID.to_string())
  }

  fn load(&self, id: &str) -> Option<String> {
    (id == RESOLVED_SSR_VIRTUAL_MODULE_ID).then(|| generate_entry(&self.adapter))
  }

  fn finalize(&mut self, bundle: &mut OutputBundle) -> Result<()> {
    let manifest = self
      .manifest
      .as_ref()
      .ok_or_else(|| anyhow!("manifest was not set before the finalize pass"))?;
    inject_manifest(manifest, bundle)
  }
}

/// Synthesize the SSR entry source. The manifest is deserialized from the
/// placeholder token at module evaluation time; the page map and renderer
/// list are merged in from their bundled modules.
fn generate_entry(adapter: &AdapterInfo) -> String {
  let mut out = String::new();
  out.push_str(&format!("import * as adapter from '{}';\n", adapter.server_entrypoint));
  out.push_str(&format!("import {{ pageMap }} from '{PAGES_MODULE_ID}';\n"));
  out.push_str(&format!("import {{ renderers }} from '{RENDERERS_MODULE_ID}';\n"));
  out.push_str("import { deserializeManifest as _deserializeManifest } from 'weft/app';\n");
  out.push_str(&format!(
    "const _manifest = Object.assign(_deserializeManifest('{MANIFEST_REPLACE}'), {{ pageMap, renderers }});\n"
  ));
  let args = adapter.args.as_ref().map_or_else(|| "undefined".to_string(), |v| v.to_string());
  out.push_str(&format!("const _args = {args};\n"));

  if let Some(exports) = &adapter.exports {
    for name in exports {
      if name == "default" {
        out.push_str("const _default = adapter['default'];\n");
        out.push_str("export { _default as default };\n");
      } else {
        out.push_str(&format!("export const {name} = adapter['{name}'];\n"));
      }
    }
  }

  if adapter.start {
    out.push_str("const _start = 'start';\n");
    out.push_str("if (_start in adapter) {\n  adapter[_start](_manifest, _args);\n}\n");
  }

  out
}

/// Substitute the quoted placeholder token in the chunk that compiled the
/// virtual entry with the JSON-serialized manifest, encoded as a JS string
/// literal. A missing chunk or token is a hard error: an uninjected
/// manifest would only surface much later, at server start.
pub fn inject_manifest(manifest: &SerializedManifest, bundle: &mut OutputBundle) -> Result<()> {
  let chunk = bundle.chunk_containing_mut(RESOLVED_SSR_VIRTUAL_MODULE_ID).ok_or_else(|| {
    anyhow!("no output chunk contains the SSR virtual entry; it was dropped or inlined")
  })?;

  let json = serde_json::to_string(manifest).context("serializing manifest")?;
  // Double-encode: the chunk needs a JS string literal whose value is the
  // manifest JSON text.
  let literal = serde_json::to_string(&json).context("encoding manifest literal")?;

  // Permissive quoted-string pattern: the bundler may have rewritten the
  // quote style around the token.
  let pattern = Regex::new(&format!("['\"]{}['\"]", regex::escape(MANIFEST_REPLACE)))
    .context("compiling placeholder pattern")?;
  if !pattern.is_match(&chunk.code) {
    bail!("placeholder token missing from SSR entry chunk {}", chunk.file_name);
  }
  chunk.code = pattern.replace(&chunk.code, NoExpand(&literal)).into_owned();
  Ok(())
}
