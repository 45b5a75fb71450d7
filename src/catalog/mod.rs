//! 插件目录层：清单拉取与语义相似度索引
//!
//! 每次会话从固定地址列表拉取全部清单并重建索引，会话内只读，会话结束即丢弃。

pub mod index;
pub mod loader;
pub mod manifest;

pub use index::PluginIndex;
pub use loader::CatalogLoader;
pub use manifest::{OperationSpec, PluginManifest};
