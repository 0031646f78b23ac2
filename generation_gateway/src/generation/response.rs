use serde_json::Value;

/// The response shapes the inference endpoints are known to produce, in
/// extraction precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceReply {
    Results {
        generated_text: Option<String>,
        text: Option<String>,
    },
    Output {
        text: String,
    },
    Choices {
        content: String,
    },
    Unrecognized(Value),
}

impl InferenceReply {
    pub fn classify(body: Value) -> Self {
        if let Some(first) = body
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .filter(|first| first.is_object())
        {
            return InferenceReply::Results {
                generated_text: first.get("generated_text").map(as_text),
                text: first.get("text").map(as_text),
            };
        }

        if let Some(text) = body
            .get("output")
            .filter(|output| output.is_object())
            .and_then(|output| output.get("text"))
        {
            return InferenceReply::Output {
                text: as_text(text),
            };
        }

        if let Some(content) = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            return InferenceReply::Choices {
                content: content.to_string(),
            };
        }

        InferenceReply::Unrecognized(body)
    }

    pub fn into_text(self) -> String {
        match self {
            InferenceReply::Results {
                generated_text,
                text,
            } => generated_text
                .filter(|t| !t.is_empty())
                .or(text)
                .unwrap_or_default(),
            InferenceReply::Output { text } => text,
            InferenceReply::Choices { content } => content,
            InferenceReply::Unrecognized(body) => body.to_string(),
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
