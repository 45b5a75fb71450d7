//! 会话编排器：主控循环
//!
//! 建立 cmd/state 两通道，在后台任务中消费用户命令（Submit/Cancel/Clear/Quit）。
//! 每次 Submit 跑一个完整会话：拉取清单 -> 建索引 -> 展开 Toolkit -> 主循环；
//! 会话运行期间命令通道保持消费，Cancel（Ctrl+C / Esc）随时中止当前会话。
//! 目录与索引每次重建，不跨会话缓存。凭证只存活于 Submit 分支内，
//! 会话结束随消息一起丢弃，绝不写日志或落盘。

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::agent::{AgentSession, PromptAssembler, SessionEvent};
use crate::catalog::{CatalogLoader, PluginIndex};
use crate::config::AppConfig;
use crate::core::state::{HistoryEntry, UiState};
use crate::core::{AgentError, AgentPhase};
use crate::llm::{OpenAiClient, OpenAiEmbedder};
use crate::tools::{HttpOperationTool, ToolResolver};

/// 从 UI 发往编排器的用户命令
#[derive(Debug, Clone)]
pub enum Command {
    /// 提交查询与会话凭证，触发一次完整会话
    Submit { query: String, api_key: String },
    /// 取消当前会话
    Cancel,
    /// 清空历史
    Clear,
    /// 退出应用
    Quit,
}

/// 提交是否就绪：凭证以 sk- 开头且查询非空；不就绪时提交控件呈禁用态，无错误提示
pub fn submission_ready(query: &str, api_key: &str) -> bool {
    !query.trim().is_empty() && api_key.starts_with("sk-")
}

/// 创建应用运行时：返回命令发送端与状态接收端；后台任务消费命令并更新状态
pub fn create_app(cfg: AppConfig) -> (mpsc::UnboundedSender<Command>, watch::Receiver<UiState>) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(UiState::default());

    tokio::spawn(async move {
        let mut history: Vec<HistoryEntry> = Vec::new();

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Submit { query, api_key } => {
                    // 双重把关：UI 已禁用不合规提交，这里同样静默忽略
                    if !submission_ready(&query, &api_key) {
                        continue;
                    }

                    history.push(HistoryEntry::user(query.clone()));
                    let _ = state_tx.send(UiState {
                        phase: AgentPhase::LoadingPlugins,
                        history: history.clone(),
                        active_tool: None,
                        input_locked: true,
                        error_message: None,
                    });

                    // 每次提交一个新 token；会话运行期间继续消费命令，
                    // Cancel 立即中止（丢弃会话 future，含进行中的拉取/调用）
                    let token = CancellationToken::new();
                    let mut quit = false;
                    let result = {
                        let session =
                            run_session(&cfg, &query, &api_key, token.clone(), &state_tx, &history);
                        tokio::pin!(session);
                        loop {
                            tokio::select! {
                                r = &mut session => break r,
                                cmd = cmd_rx.recv() => match cmd {
                                    Some(Command::Cancel) => {
                                        token.cancel();
                                        break Err(AgentError::Cancelled);
                                    }
                                    Some(Command::Quit) | None => {
                                        token.cancel();
                                        quit = true;
                                        break Err(AgentError::Cancelled);
                                    }
                                    // 会话运行中不接受新提交或清空
                                    Some(_) => {}
                                },
                            }
                        }
                    };

                    match result {
                        Ok(answer) => {
                            history.push(HistoryEntry::agent(answer));
                            let _ = state_tx.send(UiState {
                                phase: AgentPhase::Idle,
                                history: history.clone(),
                                active_tool: None,
                                input_locked: false,
                                error_message: None,
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "session failed");
                            let _ = state_tx.send(UiState {
                                phase: AgentPhase::Error,
                                history: history.clone(),
                                active_tool: None,
                                input_locked: false,
                                error_message: Some(e.to_string()),
                            });
                        }
                    }
                    // api_key 随本分支结束被丢弃
                    if quit {
                        break;
                    }
                }
                // 空闲时没有可取消的会话
                Command::Cancel => {}
                Command::Clear => {
                    history.clear();
                    let _ = state_tx.send(UiState::default());
                }
                Command::Quit => break,
            }
        }
    });

    (cmd_tx, state_rx)
}

/// 跑一个完整会话：目录 -> 索引 -> Toolkit -> 循环；任何失败向上传播并终止会话
async fn run_session(
    cfg: &AppConfig,
    query: &str,
    api_key: &str,
    cancel_token: CancellationToken,
    state_tx: &watch::Sender<UiState>,
    history: &[HistoryEntry],
) -> Result<String, AgentError> {
    let loader = CatalogLoader::new(cfg.http.fetch_timeout_secs);
    let manifests = loader.fetch_all(&cfg.plugins.manifest_urls).await?;

    let embedder = Arc::new(OpenAiEmbedder::new(
        cfg.llm.base_url.as_deref(),
        &cfg.retrieval.embedding_model,
        api_key,
    ));
    let index = PluginIndex::build(&manifests, embedder).await?;

    let client = HttpOperationTool::shared_client(cfg.http.tool_timeout_secs);
    let resolver = ToolResolver::new(&manifests, client, cfg.http.max_result_chars);
    let assembler = PromptAssembler::new(index, resolver, cfg.retrieval.top_k);

    let llm = Arc::new(OpenAiClient::new(
        cfg.llm.base_url.as_deref(),
        &cfg.llm.model,
        api_key,
    ));

    // 事件转发：把循环进度投影为 UI 阶段
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let projector = {
        let state_tx = state_tx.clone();
        let history = history.to_vec();
        tokio::spawn(async move {
            while let Some(ev) = event_rx.recv().await {
                let (phase, active_tool) = match ev {
                    SessionEvent::Thinking { .. } => (AgentPhase::Thinking, None),
                    SessionEvent::ToolCall { tool } => (AgentPhase::Acting, Some(tool)),
                    SessionEvent::Observation { .. } => (AgentPhase::Thinking, None),
                };
                let _ = state_tx.send(UiState {
                    phase,
                    history: history.clone(),
                    active_tool,
                    input_locked: true,
                    error_message: None,
                });
            }
        })
    };

    let session =
        AgentSession::new(assembler, llm, cfg.agent.max_iterations, cancel_token)
            .with_event_tx(event_tx);
    let result = session.run(query).await;

    projector.abort();
    result.map(|r| r.answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_ready_requires_sk_prefix() {
        assert!(!submission_ready("hello", "abc"));
        assert!(!submission_ready("hello", ""));
        assert!(!submission_ready("hello", "SK-123"));
        assert!(submission_ready("hello", "sk-123"));
    }

    #[test]
    fn test_submission_ready_requires_query() {
        assert!(!submission_ready("", "sk-123"));
        assert!(!submission_ready("   ", "sk-123"));
    }
}
