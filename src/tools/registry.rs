//! 工具集
//!
//! 所有工具实现 Tool trait（name / description / invoke），ToolSet 保持声明顺序
//! 并支持按名查找；循环在调用前先校验成员资格，绝不按未校验的名字分发。

use std::sync::Arc;

use async_trait::async_trait;

/// 工具 trait：名称、描述（供模型理解）、异步执行（input 为自然语言字符串）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（模型在 Action 行中引用的名字）
    fn name(&self) -> &str;

    /// 工具描述（供模型理解功能）
    fn description(&self) -> &str;

    /// 执行工具；observation 或错误文本
    async fn invoke(&self, input: &str) -> Result<String, String>;
}

/// 本轮可用的工具集：保持加入顺序（prompt 按声明顺序列出），按名线性查找
#[derive(Default, Clone)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn extend(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) {
        self.tools.extend(tools);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// 返回 (name, description) 列表，用于生成 prompt 中的工具段落
    pub fn tool_descriptions(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTool(&'static str);

    #[async_trait]
    impl Tool for FakeTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "fake"
        }

        async fn invoke(&self, input: &str) -> Result<String, String> {
            Ok(format!("{}: {}", self.0, input))
        }
    }

    #[test]
    fn test_order_and_lookup() {
        let mut set = ToolSet::new();
        set.push(Arc::new(FakeTool("b.second")));
        set.push(Arc::new(FakeTool("a.first")));

        // 保持加入顺序，而非字母序
        assert_eq!(set.tool_names(), vec!["b.second", "a.first"]);
        assert!(set.contains("a.first"));
        assert!(set.get("missing").is_none());
    }
}
