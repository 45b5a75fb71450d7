//! Nectar - 插件路由智能体
//!
//! 模块划分：
//! - **agent**: Prompt 组装、响应解析、Transcript 与 ReAct 主循环
//! - **catalog**: 插件清单加载与语义相似度索引
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、状态投影、会话编排
//! - **llm**: 补全与嵌入客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **tools**: Tool trait、注册表、HTTP 操作工具与 Toolkit 解析
//! - **ui**: Ratatui TUI 界面（查询输入 + 掩码凭证输入 + 提交）

pub mod agent;
pub mod catalog;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod tools;
pub mod ui;
