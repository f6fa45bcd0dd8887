//! Prompt template for company research
//!
//! The template asks for nine fixed fields about a single entity. The subject
//! is interpolated once, between a fixed lead-in and the field list.

/// Text preceding the subject
const LEAD_IN: &str = "Research the company ";

/// Field labels requested from the model, in display order
pub const FIELDS: [&str; 9] = [
    "Name",
    "Blurb",
    "Overview",
    "Date founded",
    "Founders & title",
    "Stage",
    "Funding amount",
    "Number of employees",
    "Similar companies/competitors",
];

/// Instruction string wrapping a search subject
#[derive(Debug, Clone)]
pub struct PromptTemplate<'a> {
    subject: &'a str,
}

impl<'a> PromptTemplate<'a> {
    /// Create a template for `subject`
    ///
    /// No validation is applied; an empty subject yields a prompt with a blank
    /// in the entity slot.
    pub fn new(subject: &'a str) -> Self {
        Self { subject }
    }

    /// Render the prompt text
    pub fn render(&self) -> String {
        let mut prompt = String::with_capacity(512 + self.subject.len());
        prompt.push_str(LEAD_IN);
        prompt.push_str(self.subject);
        prompt.push_str(&Self::trailer());
        prompt
    }

    /// Everything after the subject slot
    fn trailer() -> String {
        let mut trailer = String::from(
            " and answer in markdown. Respond with one line per field below, \
             using the label exactly as written followed by a colon. \
             Write \"Unknown\" when a value cannot be found.\n",
        );
        for field in FIELDS {
            trailer.push_str("- ");
            trailer.push_str(field);
            trailer.push_str(":\n");
        }
        trailer
    }
}
