//! 主循环
//!
//! Thinking（重选工具 + 组装 prompt + 调用模型）-> Acting（解析输出：终态回答
//! 或执行一个工具并把观察追加进 transcript）-> 回到 Thinking；最多 max_iterations 轮，
//! 超出后软停止并返回最后一次模型输出。解析失败与未知工具都对本次运行致命。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::agent::{parse_completion, AgentStep, PromptAssembler, SessionEvent, Transcript};
use crate::core::AgentError;
use crate::llm::LlmClient;

/// 停止序列：模型写到 Observation 行即停笔，观察由真实工具调用产生
const OBSERVATION_STOP: &str = "\nObservation:";
/// 事件预览最大字符数
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 循环执行结果：最终回答与完整 transcript
#[derive(Debug)]
pub struct RunResult {
    pub answer: String,
    pub transcript: Transcript,
}

/// 一次会话的循环执行器
pub struct AgentSession {
    assembler: PromptAssembler,
    llm: Arc<dyn LlmClient>,
    max_iterations: usize,
    cancel_token: tokio_util::sync::CancellationToken,
    event_tx: Option<UnboundedSender<SessionEvent>>,
}

impl AgentSession {
    pub fn new(
        assembler: PromptAssembler,
        llm: Arc<dyn LlmClient>,
        max_iterations: usize,
        cancel_token: tokio_util::sync::CancellationToken,
    ) -> Self {
        Self {
            assembler,
            llm,
            max_iterations,
            cancel_token,
            event_tx: None,
        }
    }

    /// 设置事件推送通道
    pub fn with_event_tx(mut self, tx: UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, ev: SessionEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(ev);
        }
    }

    /// 对单个用户查询执行循环直至终态回答或迭代上限
    pub async fn run(&self, user_query: &str) -> Result<RunResult, AgentError> {
        let stop = vec![OBSERVATION_STOP.to_string()];
        let mut transcript = Transcript::new();
        let mut last_output = String::new();

        for step in 0..self.max_iterations {
            if self.cancel_token.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            // 工具重选始终用最初的查询，工具集在一次运行内恒定
            let tools = self.assembler.select_tools(user_query).await?;
            let prompt = self.assembler.render(user_query, &transcript, &tools);

            self.send_event(SessionEvent::Thinking { step });
            tracing::debug!(step, tool_count = tools.len(), "thinking");

            let output = self
                .llm
                .complete(&prompt, &stop)
                .await
                .map_err(AgentError::Llm)?;
            last_output = output.clone();

            match parse_completion(&output)? {
                AgentStep::Finish(finish) => {
                    tracing::info!(step, "final answer");
                    return Ok(RunResult {
                        answer: finish.answer,
                        transcript,
                    });
                }
                AgentStep::Action(action) => {
                    // 成员校验先于分发：名字不在本轮工具集内即终止
                    let tool = tools
                        .get(&action.tool)
                        .ok_or_else(|| AgentError::UnknownTool(action.tool.clone()))?;

                    self.send_event(SessionEvent::ToolCall {
                        tool: action.tool.clone(),
                    });

                    // 工具失败不重试：错误文本作为观察写回，交给模型下一轮处置
                    let observation = match tool.invoke(&action.tool_input).await {
                        Ok(result) => result,
                        Err(e) => {
                            tracing::warn!(tool = %action.tool, error = %e, "tool failed");
                            format!("Error: {}", e)
                        }
                    };

                    let preview: String = observation
                        .chars()
                        .take(OBSERVATION_PREVIEW_CHARS)
                        .collect();
                    self.send_event(SessionEvent::Observation {
                        tool: action.tool.clone(),
                        preview,
                    });

                    transcript.push(action, observation);
                }
            }
        }

        // 迭代上限：软停止而非错误，返回最后一次模型输出作为尽力而为的结果
        tracing::info!(max_iterations = self.max_iterations, "iteration cap reached");
        let answer = if last_output.trim().is_empty() {
            "Agent stopped due to iteration limit.".to_string()
        } else {
            last_output.trim().to_string()
        };
        Ok(RunResult { answer, transcript })
    }
}
