mod generator;
mod params;
mod payload;
mod response;
mod types;

pub use generator::Generator;
pub use params::{DecodingMethod, GenerationParameters, sanitize_model_id};
pub use payload::{ChatMessage, ContentPart, InferencePayload};
pub use response::InferenceReply;
pub use types::{GenerationRequest, GenerationResult};
