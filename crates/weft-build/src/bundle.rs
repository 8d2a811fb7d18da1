/* crates/weft-build/src/bundle.rs */

// Minimal typed model of the bundler's plugin surface: the three hook
// points the build pipeline drives (extra inputs, virtual-module load,
// post-bundle rewrite).

use std::collections::BTreeMap;

use anyhow::{Context, Result};

/// Execution priority relative to other bundle transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginOrder {
  Normal,
  /// Runs after all normal-order transforms; rewrites see final chunk
  /// content.
  Post,
}

/// One emitted output chunk.
#[derive(Debug, Clone)]
pub struct OutputChunk {
  pub file_name: String,
  pub code: String,
  /// Module specifiers compiled into this chunk.
  pub modules: Vec<String>,
}

/// The full set of emitted chunks, keyed by file name.
#[derive(Debug, Default)]
pub struct OutputBundle {
  chunks: BTreeMap<String, OutputChunk>,
}

impl OutputBundle {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, chunk: OutputChunk) {
    self.chunks.insert(chunk.file_name.clone(), chunk);
  }

  pub fn get(&self, file_name: &str) -> Option<&OutputChunk> {
    self.chunks.get(file_name)
  }

  pub fn chunks(&self) -> impl Iterator<Item = &OutputChunk> {
    self.chunks.values()
  }

  /// The chunk whose module list contains `module_id`, if any.
  pub fn chunk_containing_mut(&mut self, module_id: &str) -> Option<&mut OutputChunk> {
    self.chunks.values_mut().find(|chunk| chunk.modules.iter().any(|m| m == module_id))
  }
}

/// A build-lifecycle-bound plugin over the bundler's hook points.
pub trait BundlerPlugin {
  fn name(&self) -> &'static str;

  fn order(&self) -> PluginOrder {
    PluginOrder::Normal
  }

  /// Extra root inputs this plugin contributes.
  fn inputs(&self) -> Vec<String> {
    Vec::new()
  }

  /// Map a virtual specifier this plugin owns to its resolved id.
  fn resolve_id(&self, id: &str) -> Option<String> {
    let _ = id;
    None
  }

  /// Supply source text for a resolved id this plugin owns.
  fn load(&self, id: &str) -> Option<String> {
    let _ = id;
    None
  }

  /// Rewrite emitted chunks after bundling.
  fn finalize(&mut self, bundle: &mut OutputBundle) -> Result<()> {
    let _ = bundle;
    Ok(())
  }
}

/// Run every plugin's finalize pass: normal-order plugins first, then
/// post-order ones, so post rewrites observe final chunk content.
pub fn finalize_bundle(
  plugins: &mut [Box<dyn BundlerPlugin>],
  bundle: &mut OutputBundle,
) -> Result<()> {
  for phase in [PluginOrder::Normal, PluginOrder::Post] {
    for plugin in plugins.iter_mut() {
      if plugin.order() != phase {
        continue;
      }
      let name = plugin.name();
      plugin.finalize(bundle).with_context(|| format!("plugin {name}: finalize failed"))?;
    }
  }
  Ok(())
}
