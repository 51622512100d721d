/*!
 * Token estimation for snapshot output
 *
 * Reports use a cheap bytes / 4 estimate. Exact counts are available for
 * the OpenAI models tiktoken ships encodings for.
 */

use clap::ValueEnum;
use serde::Serialize;
use strum::{Display, EnumIter, EnumProperty};

use crate::error::{ConcatError, Result};

/// Bytes per token assumed by the estimate
pub const BYTES_PER_TOKEN: u64 = 4;

/// Models with a locally available encoding
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, ValueEnum, Serialize, EnumProperty,
)]
pub enum Model {
    #[strum(to_string = "gpt-4", props(model_id = "gpt-4", context_window = 8192))]
    #[value(name = "gpt-4")]
    Gpt4,

    #[strum(
        to_string = "gpt-4-turbo",
        props(model_id = "gpt-4-0125-preview", context_window = 128000)
    )]
    #[value(name = "gpt-4-turbo")]
    Gpt4Turbo,

    #[strum(to_string = "gpt-4o", props(model_id = "gpt-4o", context_window = 128000))]
    #[value(name = "gpt-4o")]
    Gpt4o,

    #[strum(
        to_string = "gpt-3.5-turbo",
        props(model_id = "gpt-3.5-turbo", context_window = 16385)
    )]
    #[value(name = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl Model {
    /// Context window size in tokens
    pub fn context_window(&self) -> usize {
        self.get_int("context_window").unwrap_or(0) as usize
    }

    /// Identifier tiktoken resolves the encoding from
    pub fn model_id(&self) -> &'static str {
        self.get_str("model_id").unwrap_or("gpt-4")
    }
}

/// Rough token count for `bytes` of text
pub fn estimate_tokens(bytes: u64) -> u64 {
    bytes / BYTES_PER_TOKEN
}

/// Exact token count of `text` under the model's encoding
pub fn count_tokens(text: &str, model: Model) -> Result<usize> {
    let encoding = tiktoken_rs::get_bpe_from_model(model.model_id())
        .map_err(|e| ConcatError::Tokenizer(e.to_string()))?;

    Ok(encoding.encode_ordinary(text).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(0), 0);
        assert_eq!(estimate_tokens(3), 0);
        assert_eq!(estimate_tokens(1204), 301);
    }

    #[test]
    fn test_model_properties() {
        assert_eq!(Model::Gpt4o.context_window(), 128000);
        assert_eq!(Model::Gpt4Turbo.model_id(), "gpt-4-0125-preview");
        assert_eq!(Model::Gpt35Turbo.to_string(), "gpt-3.5-turbo");

        for model in Model::iter() {
            assert!(model.context_window() > 0, "{}", model);
        }
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("hello world", Model::Gpt4).unwrap(), 2);
        assert_eq!(count_tokens("", Model::Gpt4o).unwrap(), 0);
    }
}
