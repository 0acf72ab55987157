//! Prompt text for each kind of generation

use super::AiBookRequest;

pub fn story(title: &str) -> String {
    format!(
        "Write a creative and engaging story based on the title: \"{}\".\n\
         The story should be suitable for reading in an ebook app.\n\
         Include interesting characters, a clear plot, and a satisfying conclusion.\n\
         Format the story with proper paragraphs and line breaks.\n\
         Make sure the story is at least 500 words long.",
        title
    )
}

pub fn book_content(title: &str, genre: Option<&str>) -> String {
    format!(
        "Write a creative and engaging {} based on the title: \"{}\".\n\
         The story should have proper headings, 5 to 10 of them, that can serve as the story's chapters.\n\
         Use markdown formatting for sections.",
        genre.filter(|g| !g.trim().is_empty()).unwrap_or("story"),
        title
    )
}

pub fn ai_book(request: &AiBookRequest, length: crate::types::BookLength) -> String {
    let mut prompt = format!(
        "Write a {} book (approximately {} words) about \"{}\".\n",
        length.as_str().to_lowercase(),
        length.word_count(),
        request.topic
    );
    if !request.keypoints.is_empty() {
        prompt.push_str(&format!(
            "Include these key points: {}\n",
            request.keypoints.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "Use a {} tone.\n\
         Write in {}.\n\
         Format the content with proper paragraphs and sections.\n\
         Include a table of contents.\n\
         Make sure the content is well-structured and engaging.",
        request.tone.to_lowercase(),
        request.language
    ));
    prompt
}

pub fn section(topic: &str) -> String {
    format!(
        "Generate a detailed and engaging paragraph or short section about \"{}\" for an ebook chapter. \
         Focus on providing informative and easy-to-understand content. \
         Limit the response to approximately 200 words.",
        topic
    )
}
