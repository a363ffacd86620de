use crate::domain::model::{GenerationOutput, GenerationRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn api_key(&self) -> &str;
    fn model(&self) -> &str;
}

/// A hosted text-generation service. One call, no retries.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput>;
}
