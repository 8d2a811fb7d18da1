/* crates/weft-render/src/errors.rs */

use std::fmt;

/// Errors surfaced by the render core.
///
/// `Configuration` and `CapabilityUnavailable` abort the current render;
/// `Render` wraps failures propagated unmodified from slot content, nested
/// rendering, or a resolve delegate.
#[derive(Debug)]
pub enum RenderError {
  /// Invalid render configuration, raised before any rendering occurs.
  Configuration(String),
  /// An SSR-only capability was invoked during a static render.
  CapabilityUnavailable(String),
  /// No usable markdown renderer form was configured.
  MarkdownRenderer(String),
  /// Failure propagated from downstream rendering.
  Render(String),
}

impl RenderError {
  pub fn configuration(msg: impl Into<String>) -> Self {
    Self::Configuration(msg.into())
  }

  pub fn capability(msg: impl Into<String>) -> Self {
    Self::CapabilityUnavailable(msg.into())
  }

  pub fn markdown(msg: impl Into<String>) -> Self {
    Self::MarkdownRenderer(msg.into())
  }

  pub fn render(msg: impl Into<String>) -> Self {
    Self::Render(msg.into())
  }
}

impl fmt::Display for RenderError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
      Self::CapabilityUnavailable(msg) => write!(f, "capability unavailable: {msg}"),
      Self::MarkdownRenderer(msg) => write!(f, "markdown renderer: {msg}"),
      Self::Render(msg) => write!(f, "render failed: {msg}"),
    }
  }
}

impl std::error::Error for RenderError {}
