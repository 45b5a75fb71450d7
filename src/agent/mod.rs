//! 智能体层：动作类型、响应解析、Prompt 组装、Transcript 与主循环

pub mod action;
pub mod events;
pub mod loop_;
pub mod parser;
pub mod prompt;
pub mod transcript;

pub use action::{AgentAction, AgentFinish, AgentStep};
pub use events::SessionEvent;
pub use loop_::{AgentSession, RunResult};
pub use parser::parse_completion;
pub use prompt::PromptAssembler;
pub use transcript::{Transcript, TranscriptEntry};
