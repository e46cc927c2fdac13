//! Non-streaming client for an OpenAI-compatible chat-completions endpoint.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::LlmConfig;
use crate::tools::ToolRegistry;
use crate::types::{ChatMessage, Completion};
use butler_core::{Error, Result};

/// Remote LLM client with single-round tool dispatch.
pub struct LlmClient {
    config: LlmConfig,
    tools: ToolRegistry,
    http: Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig, tools: ToolRegistry) -> Self {
        Self {
            config,
            tools,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send `prompt` to the completions endpoint and return the reply.
    ///
    /// `context` is an optional block of home state appended to the system
    /// prompt. When the reply carries tool calls, each one is dispatched
    /// through the registry and the assembled outputs replace the message
    /// content; there is no re-prompting round.
    pub async fn chat(&self, prompt: &str, context: Option<&str>) -> Result<ChatMessage> {
        let system_prompt = match context {
            Some(ctx) if !ctx.is_empty() => {
                format!("{}\n\nContext:\n{}", self.config.system_prompt, ctx)
            }
            _ => self.config.system_prompt.clone(),
        };

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
            "tools": self.tools.definitions(),
        });

        debug!("requesting completion from {}", self.config.url);
        let mut request = self.http.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Llm(format!(
                "completion request failed with status {}: {}",
                status, text
            )));
        }

        let completion: Completion = serde_json::from_str(&text)?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("completion carried no choices".into()))?;

        if choice.message.tool_calls.is_empty() {
            return Ok(ChatMessage::system(
                choice.message.content.unwrap_or_default(),
            ));
        }

        // Tool round: the assembled outputs replace the message content.
        let mut content = String::new();
        for call in &choice.message.tool_calls {
            let output = self
                .tools
                .dispatch(&call.function.name, &call.function.arguments)
                .await?;
            content.push_str(&output);
            content.push('\n');
        }
        Ok(ChatMessage::system(content))
    }
}
