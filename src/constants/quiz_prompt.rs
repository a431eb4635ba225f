use crate::models::domain::Difficulty;

pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz generation expert. You MUST respond with ONLY valid JSON.\n\
Do NOT include any explanatory text, code fences, or markdown formatting.\n\
Your response must start with { and end with }.\n\
Follow the exact schema provided in the format instructions.";

pub fn difficulty_rubric(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Target EASY difficulty: recall and comprehension questions about \
             definitions, names, dates and facts stated directly in the article."
        }
        Difficulty::Medium => {
            "Target MEDIUM difficulty: application and analysis questions about \
             relationships between concepts and applying ideas from the article."
        }
        Difficulty::Hard => {
            "Target HARD difficulty: inference, synthesis and evaluation questions \
             whose answers require combining several parts of the article."
        }
    }
}

/// Renders the full user prompt. Pure string construction: identical inputs
/// always produce the identical prompt. `schema_json` is the
/// machine-readable schema rendered once from the data model.
pub fn build_quiz_prompt(
    title: &str,
    article_text: &str,
    num_questions: u8,
    difficulty: Difficulty,
    schema_json: &str,
) -> String {
    format!(
        "Create a multiple-choice quiz from this Wikipedia article.\n\n\
         Article Title: {title}\n\n\
         Article Text:\n{article_text}\n\n\
         REQUIREMENTS:\n\
         1. Generate exactly {num_questions} questions covering key concepts from the article\n\
         2. {rubric}\n\
         3. Each question MUST have:\n\
            - A unique id and a clear, specific question text\n\
            - Exactly 4 options labeled A, B, C, D\n\
            - Each option MUST have non-empty text\n\
            - A correct_label field (A, B, C, or D)\n\
            - A detailed explanation (200+ characters) for why the answer is correct\n\
         4. Include metadata with:\n\
            - title: the article title\n\
            - key_entities: 3-5 main entities/concepts from the article\n\
            - related_topics: 3-5 related topics for further study\n\n\
         CRITICAL: Respond with ONLY the JSON object. No other text.\n\n\
         The JSON object must conform to this schema:\n{schema_json}\n",
        rubric = difficulty_rubric(difficulty),
    )
}
