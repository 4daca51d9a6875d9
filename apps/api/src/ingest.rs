//! Content ingestion — resolves an input specifier into raw text.
//!
//! A specifier is tried as an existing local file, then as a remote URL,
//! then taken verbatim as literal text. Read and fetch failures degrade to
//! an empty string; callers must treat empty required input as fatal for
//! the run. No retries here.

use std::path::Path;

use tracing::warn;

pub async fn ingest(source: &str) -> String {
    if source.is_empty() {
        return String::new();
    }

    if Path::new(source).exists() {
        match tokio::fs::read_to_string(source).await {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read file '{source}': {e}");
                String::new()
            }
        }
    } else if source.starts_with("http://") || source.starts_with("https://") {
        match fetch(source).await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to fetch URL '{source}': {e}");
                String::new()
            }
        }
    } else {
        source.to_string()
    }
}

async fn fetch(url: &str) -> Result<String, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    response.text().await
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn existing_file_returns_its_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "expertise lives here").unwrap();

        let content = ingest(file.path().to_str().unwrap()).await;

        assert_eq!(content, "expertise lives here");
    }

    #[tokio::test]
    async fn unreadable_path_that_looks_like_text_is_literal() {
        let source = "Agentic search replaces blue links with AI answers.";
        assert_eq!(ingest(source).await, source);
    }

    #[tokio::test]
    async fn missing_file_path_is_treated_as_literal_text() {
        // A plausible-looking path that does not exist is still just text.
        let source = "notes/expertise_draft.txt";
        assert_eq!(ingest(source).await, source);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        assert_eq!(ingest("").await, "");
    }
}
