/* crates/weft-render/src/lib.rs */

pub mod assets;
pub mod errors;
pub mod logger;
pub mod markdown;
pub mod result;
pub mod slots;
pub mod url;

use std::future::Future;
use std::pin::Pin;

/// Boxed future type shared by the async render surfaces.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

// Re-exports for ergonomic use
pub use assets::{AssetElement, OrderedSet};
pub use errors::RenderError;
pub use logger::{LogEntry, LogSink, MemorySink, NullSink, Severity};
pub use markdown::{MarkdownConfig, MarkdownFn, MarkdownLoadFn, MarkdownRenderer};
pub use result::{
  ContextPartial, CreateResultArgs, PageRequest, PageResponse, RenderContext, RenderResult,
  RendererInfo, ResolveFn, ResultMetadata, create_result,
};
pub use slots::{SlotArgsFn, SlotContent, SlotFn, Slots};
pub use url::{canonical_url, origin_of};
