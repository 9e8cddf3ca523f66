//! Output translation
//!
//! Responses are produced in English and translated at the presentation
//! edge when the profile asks for another language. Translation never
//! fails a turn: any problem returns the English text behind a marker.

use std::sync::Arc;

use tracing::warn;

use crate::ai::TextGeneration;

const SYSTEM_PROMPT: &str = "You are a professional translator.";

/// Translate `text` into `target_language`.
///
/// English is the identity (case-insensitive, no model call). A missing
/// generation capability or a failed call falls back to the original text
/// prefixed with "(Translation unavailable)" or "(Translation failed)".
pub async fn translate_text(
    generation: Option<&Arc<dyn TextGeneration>>,
    text: &str,
    target_language: &str,
) -> String {
    if target_language.eq_ignore_ascii_case("english") {
        return text.to_string();
    }

    let Some(generation) = generation else {
        return format!("(Translation unavailable) {text}");
    };

    let prompt = format!(
        "Translate the following text into {target_language}. \
         Preserve the original formatting (like markdown for lists or bold text) and tone as much as possible.\n\n\
         TEXT TO TRANSLATE:\n---\n{text}\n---\n\n\
         TRANSLATED TEXT:"
    );

    match generation.generate(SYSTEM_PROMPT, &prompt).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translation failed: {}", e);
            format!("(Translation failed) {text}")
        }
    }
}
