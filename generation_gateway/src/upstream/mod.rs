mod iam;
mod inference;

pub use iam::{IamClient, IamToken};
pub use inference::InferenceClient;
