//! Prompt construction for every gateway call the application makes.
//!
//! Keeping the exact wording in one place makes the call shapes easy to
//! review and lets service tests assert against prompt content without
//! duplicating strings.

/// Prompt for answering a question against the full course text.
pub fn answer_prompt(question: &str, document_text: &str) -> String {
    format!(
        "Answer the given question based on the document provided. Be short and to the point.\n\n\
         ---DOCUMENT---\n\
         {document_text}\n\
         ---END---\n\n\
         Question: {question}"
    )
}

/// Prompt for labeling the question type.
pub fn question_type_prompt(question: &str) -> String {
    format!(
        "Classify the question as Fact, Reasoning or Memory. Just return the label.\nQuestion: {question}"
    )
}

/// Prompt for labeling the question topic.
pub fn topic_prompt(question: &str) -> String {
    format!(
        "Identify the topic of the question from the document provided in 4-5 words. \
         Just return the topic name.\nQuestion: {question}"
    )
}

/// Prompt for rating the student's skill level from the questions they
/// asked, listed one bullet per question in history order.
pub fn skill_level_prompt(questions: &[&str]) -> String {
    let listed = questions
        .iter()
        .map(|question| format!("- {question}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a tutor assessing a student based on the questions they asked.\n\
         Here are the questions:\n\
         {listed}\n\n\
         Based on the complexity, topic depth, and reasoning involved, classify the user's \
         skill level as one of the following:\n\
         Beginner, Intermediate, Advanced.\n\n\
         Return only:\n\
         Level: <Beginner/Intermediate/Advanced>"
    )
}

/// Prompt for generating three follow-up questions from the dominant
/// topic, dominant question type, and rated skill level.
pub fn future_questions_prompt(topic: &str, question_type: &str, skill_level: &str) -> String {
    format!(
        "Based on the above interactions, generate 3 questions which user might ask in future. \
         The questions should be from {topic} and should be {question_type} based. \
         The level of questions should be at par with user level: {skill_level}.\n\
         Return as a list with each question on a new line.\n\
         Do not return any other text."
    )
}
