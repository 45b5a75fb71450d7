//! 工具层：Tool trait、按名查找的工具集、HTTP 操作工具与 Toolkit 解析

pub mod http_op;
pub mod registry;
pub mod resolver;

pub use http_op::HttpOperationTool;
pub use registry::{Tool, ToolSet};
pub use resolver::ToolResolver;
