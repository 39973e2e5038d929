use anyhow::Result;
use crate::openai::OpenAiClient;
use crate::search::{self, SearchClient, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Whether a first-pass answer should trigger a web search.
///
/// Plain case-sensitive substring match. "I am not sure" or "i don't know"
/// do not trigger; an answer merely quoting one of these phrases does.
pub fn needs_search(response: &str) -> bool {
    response.contains("I don't know") || response.contains("I'm not sure")
}

/// Collapse the search outcome into the text embedded in the follow-up
/// prompt. A provider failure degrades to a placeholder line instead of
/// aborting the turn; the second completion call still fires with it.
pub fn search_results_text(outcome: Result<Vec<SearchResult>>) -> String {
    match outcome {
        Ok(results) => search::format_results(&results),
        Err(e) => format!("Search error: {}", e),
    }
}

/// Build the search-augmented follow-up prompt.
pub fn build_search_prompt(question: &str, results_text: &str) -> String {
    format!(
        "Question: {}\n\nHere are some web search results:\n{}\n\nPlease answer the question using this information.",
        question, results_text
    )
}

/// Run one full conversation turn: ask the model, and if it signals
/// uncertainty, search the web and ask again with the results attached.
///
/// Completion failures on either pass are not handled here; they propagate
/// to the caller and abort the turn.
pub async fn run_turn(
    openai: &OpenAiClient,
    search: &SearchClient,
    model: &str,
    question: &str,
) -> Result<String> {
    let initial_response = openai.query(model, question).await?;

    if !needs_search(&initial_response) {
        return Ok(initial_response);
    }

    let results_text = search_results_text(search.search(question).await);
    let prompt = build_search_prompt(question, &results_text);

    openai.query(model, &prompt).await
}
