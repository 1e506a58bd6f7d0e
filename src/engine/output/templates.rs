//! Re-usable text skeletons.

use super::sections::Section;
use crate::engine::types::GenerationOptions;

pub fn intro_line(topic: &str, sourced: bool) -> String {
    if sourced {
        format!(
            "Here's a comprehensive study guide for {} based on reliable sources:",
            topic
        )
    } else {
        format!("Here's a comprehensive study guide for {}:", topic)
    }
}

pub fn study_tips(source_name: Option<&str>) -> String {
    let first = match source_name {
        Some(name) => format!("- Read the full {} article for complete information", name),
        None => "- Look for a complete reference on the topic for full details".to_string(),
    };
    format!(
        "{}\n{}\n- Focus on understanding the main concepts first\n- Look up related topics mentioned in the material\n- Practice explaining the concepts in your own words",
        Section::StudyTips.marker(),
        first
    )
}

pub fn source_footer(name: &str, title: &str, url: &str) -> String {
    format!(
        "{}\nThis information is sourced from {}: [{}]({})\n\n*Note: This is a summary. For complete and detailed information, please refer to the original {} article.*",
        Section::Source.marker(),
        name,
        title,
        url,
        name
    )
}

/// Synthetic summary used when no provider produced anything usable.
pub fn demo_summary(topic: &str) -> String {
    format!(
        r#"{intro}

{overview}
{topic} is a subject worth studying step by step. This guide walks through its core ideas, where it came from, and how it is used.

{key}
- **Core Principle 1**: Understanding the fundamental concepts of {topic}
- **Core Principle 2**: Application of {topic} in real-world scenarios
- **Core Principle 3**: Advanced techniques and methodologies

{history}
{topic} has evolved over time, with significant developments in understanding and application. The field continues to grow and adapt to new challenges and discoveries.

## Real-world Applications
{topic} is applied in various industries and everyday situations. Understanding these applications helps reinforce theoretical knowledge and shows the practical value of learning this subject.

## Important Points to Remember
1. Always start with the basics before moving to complex topics
2. Practice regularly to reinforce your understanding
3. Connect theoretical knowledge with practical applications
4. Review and revise periodically to maintain retention

{tips}
- Create mind maps to visualize connections between concepts
- Use the Feynman Technique: explain concepts in simple terms
- Practice with real examples and case studies
- Form study groups to discuss and clarify doubts

{mistakes}
- Rushing through topics without proper understanding
- Memorizing without comprehension
- Ignoring practical applications
- Not reviewing regularly

{related}
{topic} connects to various other subjects and fields. Understanding these relationships helps build a comprehensive knowledge base."#,
        intro = intro_line(topic, false),
        overview = Section::Overview.marker(),
        key = Section::KeyConcepts.marker(),
        history = Section::HistoricalContext.marker(),
        tips = Section::StudyTips.marker(),
        mistakes = Section::CommonMistakes.marker(),
        related = Section::RelatedTopics.marker(),
        topic = topic,
    )
}

pub fn generative_prompt(topic: &str) -> String {
    format!(
        "Create a study guide for {}. Include key concepts, applications, and learning tips.",
        topic
    )
}

pub fn chat_system_prompt() -> &'static str {
    "You are an expert educational content creator. Create comprehensive study guides with summaries, practice questions, and learning tips. Always respond with valid JSON."
}

/// The reply is parsed by `try_parse_structured_document`; sections the
/// caller opted out of are explicitly not requested.
pub fn chat_user_prompt(topic: &str, options: GenerationOptions) -> String {
    let questions = if options.include_practice_questions {
        "3-5 practice questions with detailed answers"
    } else {
        "No practice questions"
    };
    let videos = if options.include_videos {
        "3 video recommendations"
    } else {
        "No video recommendations"
    };
    format!(
        r###"Create a comprehensive study guide for "{topic}".

Please structure the response as a JSON object with the following format:
{{
  "topic": "{topic}",
  "summary": "Detailed study guide content with markdown formatting...",
  "practiceQuestions": [
    {{
      "question": "Question text here",
      "answer": "Detailed answer here"
    }}
  ],
  "videoRecommendations": [
    {{
      "title": "Video title",
      "url": "https://www.youtube.com/watch?v=example",
      "duration": "15:30",
      "description": "Brief description of the video"
    }}
  ]
}}

Include:
- A comprehensive summary using "## " section headings: Overview, Key Concepts, Important Details, Study Tips, Common Mistakes to Avoid
- {questions}
- {videos}

Make the content educational, engaging, and suitable for students."###,
        topic = topic,
        questions = questions,
        videos = videos,
    )
}
