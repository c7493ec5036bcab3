//! MCQ summary PDF rendering.
//!
//! Bulk imports generate one PDF per (topic, sub-topic) group: the questions,
//! their options with the correct one marked, and the explanation. The
//! resulting bytes are uploaded to blob storage by the caller.

use crate::db::models::resources::Mcq;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const LINE_HEIGHT_MM: f32 = 6.0;
// Rough character budget per line at 10pt Helvetica on A4
const WRAP_COLUMNS: usize = 90;

/// Render the summary PDF for one sub-topic's MCQs
pub fn render_sub_topic_pdf(topic: &str, sub_topic: &str, mcqs: &[Mcq]) -> anyhow::Result<Vec<u8>> {
    let title = format!("{topic} - {sub_topic}");
    let (doc, first_page, first_layer) = PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH_MM as _), Mm(PAGE_HEIGHT_MM as _), "content");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text(title.as_str(), 14.0, Mm(MARGIN_MM as _), Mm(y as _), &bold);
    y -= LINE_HEIGHT_MM;
    layer.use_text(format!("{} questions", mcqs.len()), 10.0, Mm(MARGIN_MM as _), Mm(y as _), &font);
    y -= 2.0 * LINE_HEIGHT_MM;

    for (number, mcq) in mcqs.iter().enumerate() {
        let mut lines: Vec<(String, bool)> = Vec::new();
        for line in wrap(&format!("{}. {} [{} mark(s)]", number + 1, mcq.question, mcq.marks)) {
            lines.push((line, true));
        }
        for (i, option) in mcq.options.iter().enumerate() {
            let marker = if i == usize::from(mcq.correct_option) { "*" } else { " " };
            let letter = (b'A' + (i % 26) as u8) as char;
            for line in wrap(&format!("  {marker} {letter}. {option}")) {
                lines.push((line, false));
            }
        }
        if !mcq.explanation.is_empty() {
            for line in wrap(&format!("  Explanation: {}", mcq.explanation)) {
                lines.push((line, false));
            }
        }
        lines.push((String::new(), false));

        for (line, is_heading) in lines {
            if y < MARGIN_MM {
                let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH_MM as _), Mm(PAGE_HEIGHT_MM as _), "content");
                layer = doc.get_page(page).get_layer(layer_index);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            if !line.is_empty() {
                let face = if is_heading { &bold } else { &font };
                layer.use_text(line.as_str(), 10.0, Mm(MARGIN_MM as _), Mm(y as _), face);
            }
            y -= LINE_HEIGHT_MM;
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Naive word wrap to the page's character budget
fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > WRAP_COLUMNS {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::resources::Difficulty;
    use chrono::Utc;

    fn mcq(question: &str) -> Mcq {
        Mcq {
            question: question.to_string(),
            options: vec!["one".into(), "two".into(), "three".into(), "four".into()],
            correct_option: 2,
            explanation: "three is correct".to_string(),
            difficulty: Difficulty::Easy,
            marks: 1,
            topic: "Mechanics".to_string(),
            sub_topic: "Kinematics".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_a_parseable_pdf() {
        let mcqs: Vec<Mcq> = (0..3).map(|i| mcq(&format!("Question number {i}?"))).collect();
        let bytes = render_sub_topic_pdf("Mechanics", "Kinematics", &mcqs).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_content_spills_onto_further_pages_without_panicking() {
        let long_question = "A question with considerably more text than fits on a single wrapped line of the page ".repeat(3);
        let mcqs: Vec<Mcq> = (0..80).map(|_| mcq(&long_question)).collect();
        let bytes = render_sub_topic_pdf("Mechanics", "Kinematics", &mcqs).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_respects_the_column_budget() {
        let text = "word ".repeat(50);
        for line in wrap(&text) {
            assert!(line.len() <= WRAP_COLUMNS);
        }
        assert_eq!(wrap(""), vec![String::new()]);
    }
}
