//! Template-based practice questions and video-search suggestions.
//!
//! Used when no provider supplied these sections, and by the chat adapter
//! when a reply cannot be parsed.

use crate::engine::output::formatter::{join_sentences, related_topics, split_sentences};
use crate::engine::types::{PracticeQuestion, VideoRecommendation};

const VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// Source text and its category tags, when the content came from a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    pub text: String,
    pub categories: Vec<String>,
}

/// Always three questions, in a stable order. With context, answers are
/// taken from the leading sentences and the category tags; slots the text
/// cannot fill fall back to the generic answer.
pub fn synthesize_questions(topic: &str, context: Option<&SourceContext>) -> Vec<PracticeQuestion> {
    let Some(context) = context else {
        return template_questions(topic);
    };

    let sentences = split_sentences(&context.text);
    let leading = |from: usize, to: usize| {
        let to = to.min(sentences.len());
        (from < to).then(|| join_sentences(&sentences[from..to]))
    };
    let generic = template_questions(topic);

    let related = related_topics(&context.categories, 3);
    let relation = if related.is_empty() {
        generic[2].answer.clone()
    } else {
        format!(
            "Based on the categories and content, {} connects to various related fields including {}.",
            topic,
            related.join(", ")
        )
    };

    vec![
        PracticeQuestion {
            question: format!("What is {} and why is it important?", topic),
            answer: leading(0, 2).unwrap_or_else(|| generic[0].answer.clone()),
        },
        PracticeQuestion {
            question: format!("What are the main concepts related to {}?", topic),
            answer: leading(2, 4).unwrap_or_else(|| generic[1].answer.clone()),
        },
        PracticeQuestion {
            question: format!("How does {} relate to other fields or subjects?", topic),
            answer: relation,
        },
    ]
}

fn template_questions(topic: &str) -> Vec<PracticeQuestion> {
    vec![
        PracticeQuestion {
            question: format!("What are the fundamental principles of {}?", topic),
            answer: format!("The fundamental principles of {} include understanding core concepts, practical applications, and systematic approaches to problem-solving. These principles form the foundation for advanced learning in this field.", topic),
        },
        PracticeQuestion {
            question: format!("How can you apply {} in real-world scenarios?", topic),
            answer: format!("You can apply {} by identifying relevant patterns, using systematic approaches, and adapting concepts to specific situations. Real-world application helps reinforce theoretical knowledge and demonstrates practical value.", topic),
        },
        PracticeQuestion {
            question: format!("What are the most common challenges when learning {}?", topic),
            answer: "Common challenges include grasping abstract concepts, connecting theory to practice, maintaining consistent study habits, and overcoming initial complexity. These challenges are normal and can be overcome with proper strategies.".to_string(),
        },
    ]
}

/// Three search links. Durations are fixed placeholders, not real metadata.
pub fn synthesize_videos(topic: &str) -> Vec<VideoRecommendation> {
    [
        (
            format!("Complete {} Tutorial for Beginners", topic),
            "tutorial",
            "15:30",
            format!("A comprehensive introduction to {} fundamentals", topic),
        ),
        (
            format!("{} Advanced Concepts Explained", topic),
            "advanced",
            "22:15",
            format!("Deep dive into advanced {} concepts", topic),
        ),
        (
            format!("{} Practice Problems and Solutions", topic),
            "practice problems",
            "18:45",
            format!("Hands-on practice with {} examples", topic),
        ),
    ]
    .into_iter()
    .map(|(title, qualifier, duration, description)| VideoRecommendation {
        title,
        url: search_url(topic, qualifier),
        duration: duration.to_string(),
        description,
    })
    .collect()
}

fn search_url(topic: &str, qualifier: &str) -> String {
    format!(
        "{}{}",
        VIDEO_SEARCH_URL,
        urlencoding::encode(&format!("{} {}", topic, qualifier))
    )
}
