//! Turning result text into displayable cards
//!
//! The completion answer is markdown with one field per line. Rendering is
//! kept separate from the client, which returns the text untouched.

/// One displayable block of the answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: Option<String>,
    pub body: String,
}

/// Split result text into paragraphs
///
/// Splits on newlines and drops blank lines. Non-blank lines are returned as
/// they are.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Build one card per paragraph
///
/// `Label: value` lines become titled cards. Leading list markers and bold
/// markers around the label are stripped.
pub fn cards(text: &str) -> Vec<Card> {
    paragraphs(text).into_iter().map(card_for).collect()
}

fn card_for(paragraph: &str) -> Card {
    let stripped = strip_list_marker(paragraph.trim());

    if let Some((label, value)) = stripped.split_once(':') {
        let label = label.trim().trim_matches('*').trim();
        if is_label(label) && !value.starts_with("//") {
            let value = value.trim().trim_start_matches("**").trim();
            return Card {
                title: Some(label.to_string()),
                body: value.to_string(),
            };
        }
    }

    Card {
        title: None,
        body: paragraph.to_string(),
    }
}

fn strip_list_marker(line: &str) -> &str {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .unwrap_or(line)
}

// Labels are short and never end a sentence.
fn is_label(label: &str) -> bool {
    !label.is_empty() && label.len() <= 40 && !label.ends_with('.')
}
