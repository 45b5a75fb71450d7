//! Nectar - 插件路由智能体
//!
//! 入口：初始化日志、加载配置、创建会话编排器与 TUI，并运行主循环。

use anyhow::Context;
use nectar::config::{load_config, AppConfig};
use nectar::core::create_app;
use nectar::ui::run_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    nectar::observability::init();

    let cfg = load_config().unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    // 创建编排器：返回命令发送端与状态接收端
    let (cmd_tx, state_rx) = create_app(cfg);

    // 启动 TUI 主循环（消费 state，向 cmd_tx 发送用户指令）
    run_app(state_rx, cmd_tx).await.context("App run failed")?;

    Ok(())
}
