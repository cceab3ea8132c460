//! View models handed to a renderer.
//!
//! A renderer only sees these types; it never reads the navigation state or the graph directly.

use vpref_graph::{EligibilityResult, EligibilityType, Question, ReferenceLink};
use vpref_types::NodeId;

/// Everything needed to display one question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView {
    pub question_id: NodeId,
    pub text: String,
    pub help_text: Option<String>,
    /// Option labels in display (and keyboard) order.
    pub options: Vec<String>,
    /// 1-based position of this question on the current path.
    pub step: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub can_go_back: bool,
}

impl QuestionView {
    pub(crate) fn new(
        question: &Question,
        answered: usize,
        total_steps: usize,
        progress: f64,
    ) -> Self {
        Self {
            question_id: question.id.clone(),
            text: question.text.clone(),
            help_text: question.help_text.clone(),
            options: question.option_labels(),
            step: answered + 1,
            total_steps,
            progress,
            can_go_back: answered > 0,
        }
    }

    pub fn announcement(&self) -> String {
        format!("New question: {}", self.text)
    }
}

/// A titled list shown under a result. Only non-empty sections are produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Reasoning(Vec<String>),
    RequiredDocuments(Vec<String>),
    AdditionalInformation(Vec<String>),
    OfficialResources(Vec<ReferenceLink>),
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Reasoning(_) => "Why",
            Self::RequiredDocuments(_) => "Required Documents",
            Self::AdditionalInformation(_) => "Additional Information",
            Self::OfficialResources(_) => "Official Resources",
        }
    }
}

/// Everything needed to display (or print) a result.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultView {
    pub result: EligibilityResult,
    /// Always 1.0: a displayed result completes the progress bar.
    pub progress: f64,
}

impl ResultView {
    pub(crate) fn new(result: EligibilityResult) -> Self {
        Self {
            result,
            progress: 1.0,
        }
    }

    /// Style tag for the result, identical to the eligibility category tag.
    pub fn style(&self) -> EligibilityType {
        self.result.result_type
    }

    pub fn title(&self) -> &str {
        &self.result.title
    }

    pub fn description(&self) -> &str {
        &self.result.description
    }

    pub fn sections(&self) -> Vec<Section> {
        let result = &self.result;
        let mut sections = Vec::new();
        if !result.reasoning.is_empty() {
            sections.push(Section::Reasoning(result.reasoning.clone()));
        }
        if !result.required_documents.is_empty() {
            sections.push(Section::RequiredDocuments(result.required_documents.clone()));
        }
        if !result.additional_info.is_empty() {
            sections.push(Section::AdditionalInformation(result.additional_info.clone()));
        }
        if !result.links.is_empty() {
            sections.push(Section::OfficialResources(result.links.clone()));
        }
        sections
    }

    pub fn announcement(&self) -> String {
        format!("Result: {}. {}", self.result.title, self.result.description)
    }

    /// Printable plain-text rendering of the result.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.result.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.result.title.chars().count()));
        out.push_str("\n\n");
        out.push_str(&self.result.description);
        out.push('\n');

        for section in self.sections() {
            out.push('\n');
            out.push_str(section.heading());
            out.push('\n');
            match &section {
                Section::Reasoning(lines) => {
                    for line in lines {
                        out.push_str(&format!("  {line}\n"));
                    }
                }
                Section::RequiredDocuments(items) | Section::AdditionalInformation(items) => {
                    for item in items {
                        out.push_str(&format!("  - {item}\n"));
                    }
                }
                Section::OfficialResources(links) => {
                    for link in links {
                        out.push_str(&format!("  - {}: {}\n", link.text, link.url));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_produce_no_sections() {
        let view = ResultView::new(EligibilityResult::new(
            EligibilityType::Info,
            "Title",
            "Description",
        ));
        assert!(view.sections().is_empty());

        let text = view.to_plain_text();
        assert!(!text.contains("Required Documents"));
        assert!(!text.contains("Official Resources"));
        assert!(text.starts_with("Title\n=====\n"));
    }

    #[test]
    fn plain_text_lists_populated_sections_in_order() {
        let mut result = EligibilityResult::new(
            EligibilityType::Eligible5Point,
            "Eligible",
            "You qualify.",
        );
        result.required_documents.push("DD-214".into());
        result.push_link(ReferenceLink::new("https://example.test", "Guide"));
        let view = ResultView::new(result);

        let headings: Vec<_> = view.sections().iter().map(Section::heading).collect();
        assert_eq!(headings, vec!["Required Documents", "Official Resources"]);

        let text = view.to_plain_text();
        assert!(text.contains("  - DD-214\n"));
        assert!(text.contains("  - Guide: https://example.test\n"));
        assert_eq!(view.progress, 1.0);
        assert_eq!(view.announcement(), "Result: Eligible. You qualify.");
    }
}
