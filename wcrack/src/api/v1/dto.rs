use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Page;
use crate::text::Word;

/// `limit`/`offset` query parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum number of rows. Defaults to 1000.
    pub limit: Option<u32>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<u32>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(
            query.limit.unwrap_or(Page::DEFAULT_LIMIT),
            query.offset.unwrap_or(0),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWordRequest {
    #[validate(length(min = 1, max = 255, message = "value must be 1 to 255 characters"))]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadWordsResponse {
    pub batch_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WordDto {
    pub value: String,
    /// ISO 639-3 code or `unknown`.
    pub language: String,
}

impl From<Word> for WordDto {
    fn from(word: Word) -> Self {
        Self {
            language: word.lang.code().to_string(),
            value: word.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageWordsResponse {
    pub analysis_id: String,
    pub words: Vec<WordDto>,
    pub count: usize,
}
