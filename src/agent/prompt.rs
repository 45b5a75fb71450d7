//! Prompt 组装器
//!
//! 每轮循环都重新执行相似度检索挑选插件（始终用最初的用户查询，而非增长中的
//! transcript，因此一次会话内工具集恒定），再把固定指令模板、工具清单与
//! scratchpad 组装成一段补全 prompt。

use crate::agent::Transcript;
use crate::catalog::PluginIndex;
use crate::core::AgentError;
use crate::tools::{ToolResolver, ToolSet};

/// 固定指令模板；占位符在 render 时替换
const PROMPT_TEMPLATE: &str = "\
Answer the following questions as best you can, speaking casual American English. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin! Remember to speak casual American English when giving your final answer.

Question: {input}
{agent_scratchpad}";

/// 组装器：持有本会话的索引与解析器、每轮选取的插件数 k
pub struct PromptAssembler {
    index: PluginIndex,
    resolver: ToolResolver,
    top_k: usize,
}

impl PromptAssembler {
    pub fn new(index: PluginIndex, resolver: ToolResolver, top_k: usize) -> Self {
        Self {
            index,
            resolver,
            top_k,
        }
    }

    /// 用用户查询检索 k 个插件并展开为本轮工具集（检索顺序 + 各插件声明顺序）
    pub async fn select_tools(&self, user_query: &str) -> Result<ToolSet, AgentError> {
        let plugin_names = self.index.query(user_query, self.top_k).await?;
        let mut tools = ToolSet::new();
        for name in &plugin_names {
            tools.extend(self.resolver.resolve(name));
        }
        Ok(tools)
    }

    /// 渲染模板：工具行（"name: description"，换行连接）、工具名（逗号连接）、
    /// 原始查询、以及由 transcript 拼出的 scratchpad
    pub fn render(&self, user_query: &str, transcript: &Transcript, tools: &ToolSet) -> String {
        let tool_lines = tools
            .tool_descriptions()
            .iter()
            .map(|(name, desc)| format!("{}: {}", name, desc))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = tools.tool_names().join(", ");

        let mut scratchpad = String::new();
        for entry in transcript.entries() {
            scratchpad.push_str(&entry.action.log);
            scratchpad.push_str(&format!("\nObservation: {}\nThought: ", entry.observation));
        }

        PROMPT_TEMPLATE
            .replace("{tools}", &tool_lines)
            .replace("{tool_names}", &tool_names)
            .replace("{input}", user_query)
            .replace("{agent_scratchpad}", &scratchpad)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::agent::AgentAction;
    use crate::tools::Tool;

    struct FakeTool(&'static str, &'static str);

    #[async_trait]
    impl Tool for FakeTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        async fn invoke(&self, _input: &str) -> Result<String, String> {
            Ok(String::new())
        }
    }

    fn fake_tools() -> ToolSet {
        let mut tools = ToolSet::new();
        tools.push(Arc::new(FakeTool("Speak.translate", "Translate text")));
        tools.push(Arc::new(FakeTool("Klarna.search", "Search products")));
        tools
    }

    async fn assembler() -> PromptAssembler {
        let manifests = vec![serde_json::from_value(serde_json::json!({
            "name_for_model": "Speak",
            "description_for_model": "Learn languages",
        }))
        .unwrap()];
        let index = PluginIndex::build(&manifests, Arc::new(crate::llm::MockEmbedder))
            .await
            .unwrap();
        let resolver = ToolResolver::new(&manifests, reqwest::Client::new(), 100);
        PromptAssembler::new(index, resolver, 4)
    }

    #[tokio::test]
    async fn test_render_substitutes_all_placeholders() {
        let asm = assembler().await;
        let prompt = asm.render("what shirts can I buy?", &Transcript::new(), &fake_tools());

        assert!(prompt.contains("Speak.translate: Translate text\nKlarna.search: Search products"));
        assert!(prompt.contains("one of [Speak.translate, Klarna.search]"));
        assert!(prompt.contains("Question: what shirts can I buy?\n"));
        assert!(!prompt.contains('{'));
    }

    #[tokio::test]
    async fn test_scratchpad_concatenates_log_and_observation() {
        let asm = assembler().await;
        let mut transcript = Transcript::new();
        transcript.push(
            AgentAction {
                tool: "Klarna.search".into(),
                tool_input: "shirts".into(),
                log: "Thought: search\nAction: Klarna.search\nAction Input: shirts".into(),
            },
            "3 results".to_string(),
        );

        let prompt = asm.render("q", &transcript, &fake_tools());
        assert!(prompt.ends_with(
            "Thought: search\nAction: Klarna.search\nAction Input: shirts\nObservation: 3 results\nThought: "
        ));
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let asm = assembler().await;
        let tools = fake_tools();
        let a = asm.render("q", &Transcript::new(), &tools);
        let b = asm.render("q", &Transcript::new(), &tools);
        assert_eq!(a, b);
    }
}
