use serde::Serialize;

use crate::{config::EndpointMode, generation::GenerationParameters};

#[derive(Debug, Serialize)]
pub struct ContentPart<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

/// Request body for the remote inference endpoint.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InferencePayload<'a> {
    Completion {
        model_id: &'a str,
        project_id: &'a str,
        input: &'a str,
        parameters: &'a GenerationParameters,
    },
    Chat {
        model_id: &'a str,
        project_id: &'a str,
        parameters: &'a GenerationParameters,
        messages: Vec<ChatMessage<'a>>,
    },
}

impl<'a> InferencePayload<'a> {
    pub fn shape(
        mode: EndpointMode,
        model_id: &'a str,
        project_id: &'a str,
        prompt: &'a str,
        parameters: &'a GenerationParameters,
    ) -> Self {
        match mode {
            EndpointMode::Generation => InferencePayload::Completion {
                model_id,
                project_id,
                input: prompt,
                parameters,
            },
            EndpointMode::Chat => InferencePayload::Chat {
                model_id,
                project_id,
                parameters,
                messages: vec![ChatMessage {
                    role: "user",
                    content: vec![ContentPart {
                        kind: "text",
                        text: prompt,
                    }],
                }],
            },
        }
    }
}
