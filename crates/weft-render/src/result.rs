/* crates/weft-render/src/result.rs */

//! Per-render state: the `RenderResult` accumulator created once per HTTP
//! render, and the `RenderContext` view handed to every template
//! instantiation within that render.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BoxFuture;
use crate::assets::{AssetElement, OrderedSet};
use crate::errors::RenderError;
use crate::logger::{LogSink, Severity};
use crate::markdown::{MarkdownConfig, merge_options};
use crate::slots::{SlotContent, Slots};
use crate::url::{canonical_url, origin_of};

/// Maps a module specifier to its final served URL.
pub type ResolveFn = Arc<dyn Fn(String) -> BoxFuture<Result<String, RenderError>> + Send + Sync>;

/// Descriptor of a loaded framework renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererInfo {
  pub name: String,
  pub server_entrypoint: String,
}

/// Immutable per-render metadata.
#[derive(Debug, Clone)]
pub struct ResultMetadata {
  pub renderers: Vec<RendererInfo>,
  pub pathname: String,
  pub legacy_build: bool,
}

/// The inbound request as seen by page templates. Adapters map their
/// framework-specific request onto this.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub method: String,
  pub url: String,
  pub headers: Vec<(String, String)>,
}

impl PageRequest {
  pub fn get(url: impl Into<String>) -> Self {
    Self { method: "GET".to_string(), url: url.into(), headers: Vec::new() }
  }
}

/// A response produced by a render capability (currently only redirect).
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
  pub status: u16,
  pub headers: Vec<(String, String)>,
}

impl PageResponse {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

/// Inputs for `create_result`, gathered by the surrounding render pipeline.
pub struct CreateResultArgs {
  /// Rendering mode: dynamic server (`true`) or static build (`false`).
  pub ssr: bool,
  pub legacy_build: bool,
  pub logging: Arc<dyn LogSink>,
  pub markdown: MarkdownConfig,
  pub params: HashMap<String, String>,
  pub pathname: String,
  pub renderers: Vec<RendererInfo>,
  pub resolve: ResolveFn,
  /// Site origin override; falls back to the request's own origin.
  pub site: Option<String>,
  /// Preexisting sets carried over from an enclosing render, if any.
  pub scripts: Option<OrderedSet<AssetElement>>,
  pub links: Option<OrderedSet<AssetElement>>,
  pub request: PageRequest,
}

/// Per-render accumulator of discovered assets plus immutable metadata.
///
/// One instance per render, shared by every nested render context through an
/// `Arc` handle. The sets sit behind mutexes only because that handle is
/// `Send`-shared across await points; a render is a single cooperative task
/// and the locks are never contended across renders.
pub struct RenderResult {
  styles: Mutex<OrderedSet<AssetElement>>,
  scripts: Mutex<OrderedSet<AssetElement>>,
  links: Mutex<OrderedSet<AssetElement>>,
  resolver: ResolveFn,
  metadata: ResultMetadata,
  ssr: bool,
  logger: Arc<dyn LogSink>,
  markdown: MarkdownConfig,
  params: HashMap<String, String>,
  site: Option<String>,
  request: PageRequest,
  canonical_url: String,
}

/// Construct the per-render state object. Computes the canonical URL once
/// from the pathname and the site origin override or the request's origin.
pub fn create_result(args: CreateResultArgs) -> Arc<RenderResult> {
  let origin =
    args.site.clone().or_else(|| origin_of(&args.request.url)).unwrap_or_default();
  let canonical = canonical_url(&args.pathname, &origin);

  Arc::new(RenderResult {
    styles: Mutex::new(OrderedSet::new()),
    scripts: Mutex::new(args.scripts.unwrap_or_default()),
    links: Mutex::new(args.links.unwrap_or_default()),
    resolver: args.resolve,
    metadata: ResultMetadata {
      renderers: args.renderers,
      pathname: args.pathname,
      legacy_build: args.legacy_build,
    },
    ssr: args.ssr,
    logger: args.logging,
    markdown: args.markdown,
    params: args.params,
    site: args.site,
    request: args.request,
    canonical_url: canonical,
  })
}

impl RenderResult {
  pub fn metadata(&self) -> &ResultMetadata {
    &self.metadata
  }

  pub fn canonical_url(&self) -> &str {
    &self.canonical_url
  }

  pub fn params(&self) -> &HashMap<String, String> {
    &self.params
  }

  pub fn request(&self) -> &PageRequest {
    &self.request
  }

  pub fn site(&self) -> Option<&str> {
    self.site.as_deref()
  }

  pub fn add_style(&self, element: AssetElement) -> bool {
    self.styles.lock().unwrap_or_else(PoisonError::into_inner).insert(element)
  }

  pub fn add_script(&self, element: AssetElement) -> bool {
    self.scripts.lock().unwrap_or_else(PoisonError::into_inner).insert(element)
  }

  pub fn add_link(&self, element: AssetElement) -> bool {
    self.links.lock().unwrap_or_else(PoisonError::into_inner).insert(element)
  }

  /// Snapshot of the styles discovered so far, in rendering order.
  pub fn styles(&self) -> Vec<AssetElement> {
    self.styles.lock().unwrap_or_else(PoisonError::into_inner).items().to_vec()
  }

  pub fn scripts(&self) -> Vec<AssetElement> {
    self.scripts.lock().unwrap_or_else(PoisonError::into_inner).items().to_vec()
  }

  pub fn links(&self) -> Vec<AssetElement> {
    self.links.lock().unwrap_or_else(PoisonError::into_inner).items().to_vec()
  }

  /// Map a module specifier through the configured resolver.
  pub async fn resolve(&self, specifier: &str) -> Result<String, RenderError> {
    (self.resolver)(specifier.to_string()).await
  }

  /// Build the render context for one template instantiation. Every nested
  /// component gets its own context sharing this result's sets. Fails when
  /// the slot map uses a reserved name, before any rendering occurs.
  pub fn create_context(
    self: &Arc<Self>,
    partial: ContextPartial,
    props: Value,
    slots: Option<HashMap<String, SlotContent>>,
  ) -> Result<RenderContext, RenderError> {
    Ok(RenderContext { result: Arc::clone(self), partial, props, slots: Slots::new(slots)? })
  }
}

/// Top-level pieces shared across all contexts of a render: the generator
/// tag and, for legacy builds, the resolve delegate.
pub struct ContextPartial {
  pub generator: String,
  pub resolve: Option<ResolveFn>,
}

impl Default for ContextPartial {
  fn default() -> Self {
    Self { generator: concat!("weft v", env!("CARGO_PKG_VERSION")).to_string(), resolve: None }
  }
}

/// The per-template-instantiation render API exposed to page and component
/// code. Lifetime: a single render call.
pub struct RenderContext {
  result: Arc<RenderResult>,
  partial: ContextPartial,
  props: Value,
  slots: Slots,
}

impl RenderContext {
  pub fn params(&self) -> &HashMap<String, String> {
    self.result.params()
  }

  pub fn props(&self) -> &Value {
    &self.props
  }

  pub fn request(&self) -> &PageRequest {
    self.result.request()
  }

  pub fn canonical_url(&self) -> &str {
    self.result.canonical_url()
  }

  pub fn site(&self) -> Option<&str> {
    self.result.site()
  }

  pub fn generator(&self) -> &str {
    &self.partial.generator
  }

  pub fn slots(&self) -> &Slots {
    &self.slots
  }

  /// Shared accumulator handle, for rendering internals that push assets.
  pub fn result(&self) -> &Arc<RenderResult> {
    &self.result
  }

  /// Issue a 301 redirect. Only available when the render targets a dynamic
  /// server; the check happens here, at call time.
  pub fn redirect(&self, path: &str) -> Result<PageResponse, RenderError> {
    if !self.result.ssr {
      return Err(RenderError::capability(
        "redirect is only available when building for a dynamic server (SSR)",
      ));
    }
    Ok(PageResponse { status: 301, headers: vec![("Location".to_string(), path.to_string())] })
  }

  /// Deprecated specifier resolution. In legacy builds this delegates to the
  /// configured resolver; otherwise it warns through the logging sink and
  /// returns an empty string, never an error.
  pub async fn resolve(&self, path: &str) -> Result<String, RenderError> {
    if self.result.metadata.legacy_build {
      if let Some(delegate) = &self.partial.resolve {
        return delegate(path.to_string()).await;
      }
      return self.result.resolve(path).await;
    }
    self.result.logger.log(Severity::Warn, "deprecation", &resolve_guidance(path));
    Ok(String::new())
  }

  /// Internal markdown-render hook. Resolves the configured renderer and
  /// merges per-call options over its base configuration.
  #[doc(hidden)]
  pub async fn render_markdown(
    &self,
    content: &str,
    options: &Value,
  ) -> Result<String, RenderError> {
    let render = self.result.markdown.resolve().await?;
    let merged = merge_options(&self.result.markdown.options, options);
    render(content.to_string(), merged).await
  }
}

const STYLESHEET_EXTS: &[&str] = &[".css", ".scss", ".sass", ".less", ".styl"];
const SCRIPT_EXTS: &[&str] = &[".js", ".mjs", ".ts", ".jsx", ".tsx"];

fn resolve_guidance(path: &str) -> String {
  let lower = path.to_ascii_lowercase();
  if STYLESHEET_EXTS.iter().any(|ext| lower.ends_with(ext)) {
    format!(
      "resolve(\"{path}\") is deprecated and returns an empty string. Import the stylesheet from your component instead and weft will inline it for you."
    )
  } else if SCRIPT_EXTS.iter().any(|ext| lower.ends_with(ext)) {
    format!(
      "resolve(\"{path}\") is deprecated and returns an empty string. Import the script from your component or reference it with a plain script tag."
    )
  } else {
    format!(
      "resolve(\"{path}\") is deprecated and returns an empty string. Import the module from your component instead."
    )
  }
}
