//! 响应解析器
//!
//! 把一次原始补全解释为终态回答或下一步动作。格式刻意脆弱：
//! Prompt 模板已指示模型只输出两种形状之一，任何偏差都是解析失败（携带原文向上传播），
//! 不做自动重试或修复。

use std::sync::OnceLock;

use regex::Regex;

use crate::agent::{AgentAction, AgentFinish, AgentStep};
use crate::core::AgentError;

/// 终态标记；取其最后一次出现之后的文本作为回答
const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Action / Action Input 形状：标记允许数字后缀，动作文本可跨行直到 Input 标记
fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:(.*?)\nAction\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .unwrap()
    })
}

/// 去掉首尾空格后，剥掉一对包裹的双引号（只剥一对）
fn unquote(input: &str) -> &str {
    let trimmed = input.trim_matches(' ');
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// 解析一次补全：Final Answer 优先；其次 Action/Action Input；都不匹配则 Parse 错误
pub fn parse_completion(raw: &str) -> Result<AgentStep, AgentError> {
    if raw.contains(FINAL_ANSWER_MARKER) {
        let answer = raw
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        return Ok(AgentStep::Finish(AgentFinish {
            answer: answer.to_string(),
            log: raw.to_string(),
        }));
    }

    let caps = action_regex()
        .captures(raw)
        .ok_or_else(|| AgentError::Parse(raw.to_string()))?;

    Ok(AgentStep::Action(AgentAction {
        tool: caps[1].trim().to_string(),
        tool_input: unquote(&caps[2]).to_string(),
        log: raw.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_action(raw: &str) -> AgentAction {
        match parse_completion(raw).unwrap() {
            AgentStep::Action(a) => a,
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_takes_text_after_marker() {
        let raw = "Thought: I now know the final answer\nFinal Answer:  Berlin. ";
        match parse_completion(raw).unwrap() {
            AgentStep::Finish(f) => {
                assert_eq!(f.answer, "Berlin.");
                assert_eq!(f.log, raw);
            }
            other => panic!("expected finish, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_uses_last_occurrence() {
        let raw = "Final Answer: draft\nmore thinking\nFinal Answer: real";
        match parse_completion(raw).unwrap() {
            AgentStep::Finish(f) => assert_eq!(f.answer, "real"),
            other => panic!("expected finish, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_wins_over_action_shape() {
        let raw = "Action: x\nAction Input: y\nFinal Answer: done";
        assert!(matches!(
            parse_completion(raw).unwrap(),
            AgentStep::Finish(_)
        ));
    }

    #[test]
    fn test_action_basic() {
        let a = parse_action("Thought: need a tool\nAction: Klarna.search\nAction Input: white shirts");
        assert_eq!(a.tool, "Klarna.search");
        assert_eq!(a.tool_input, "white shirts");
    }

    #[test]
    fn test_action_numeric_suffixes_and_quotes() {
        let a = parse_action("Action 2 : Speak.translate\nAction 2 Input 2:  \"hello world\" ");
        assert_eq!(a.tool, "Speak.translate");
        assert_eq!(a.tool_input, "hello world");
    }

    #[test]
    fn test_action_text_spans_lines_until_input_marker() {
        let a = parse_action("Action: Schools.rank\nstill the action\nAction Input: SF");
        assert_eq!(a.tool, "Schools.rank\nstill the action");
        assert_eq!(a.tool_input, "SF");
    }

    #[test]
    fn test_only_one_quote_pair_stripped() {
        let a = parse_action("Action: t\nAction Input: \"\"double\"\"");
        assert_eq!(a.tool_input, "\"double\"");
    }

    #[test]
    fn test_unparseable_output_is_parse_error() {
        let raw = "I'm not sure what to do next.";
        match parse_completion(raw) {
            Err(AgentError::Parse(text)) => assert_eq!(text, raw),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_action_without_input_is_parse_error() {
        assert!(matches!(
            parse_completion("Action: lonely"),
            Err(AgentError::Parse(_))
        ));
    }
}
