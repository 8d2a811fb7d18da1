/* crates/weft-build/src/lib.rs */

pub mod bundle;
pub mod manifest;
pub mod ssr;
pub mod types;

// Re-exports for ergonomic use
pub use bundle::{BundlerPlugin, OutputBundle, OutputChunk, PluginOrder, finalize_bundle};
pub use manifest::{
  BEFORE_HYDRATION_SCRIPT_ID, EMPTY_MODULE_URI, SerializedManifest, SerializedRouteInfo,
  build_manifest,
};
pub use ssr::{MANIFEST_REPLACE, SSR_VIRTUAL_MODULE_ID, SsrPlugin};
pub use types::{
  AdapterInfo, BuildInternals, BuildOptions, PageBuildData, RouteData, SerializedRouteData,
  serialize_route_data,
};
