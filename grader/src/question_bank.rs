use crate::models::{ExtractedItem, QuestionBankEntry};

/// Reduces a label such as "Q1", "1)" or "Answer 1" to its ASCII digits.
pub fn normalize_id(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Pairs every question with the first answer whose normalized id matches.
///
/// Questions without an answer are dropped. Output follows question order.
pub fn merge(questions: &[ExtractedItem], answers: &[ExtractedItem]) -> Vec<QuestionBankEntry> {
    let normalized_answers: Vec<(String, &ExtractedItem)> = answers
        .iter()
        .map(|a| (normalize_id(&a.id), a))
        .collect();

    questions
        .iter()
        .filter_map(|question| {
            let key = normalize_id(&question.id);
            normalized_answers
                .iter()
                .find(|(answer_key, _)| *answer_key == key)
                .map(|(_, answer)| QuestionBankEntry {
                    id: question.id.clone(),
                    question: question.text.clone(),
                    model_answer: answer.text.clone(),
                })
        })
        .collect()
}
