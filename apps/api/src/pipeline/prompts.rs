// All LLM prompt constants for the content pipeline. Templates carry
// `{placeholder}` markers replaced at the call site.

pub const ANALYST_SYSTEM: &str = "You are an expert analyst.";

pub const EXPERTISE_PROMPT_TEMPLATE: &str =
    "Analyze this expertise and extract thesis, key insights, and data:\n{expertise}";

pub const LINGUIST_SYSTEM: &str = "You are a linguistic expert.";

pub const TONE_PROMPT_TEMPLATE: &str =
    "Analyze this writing style. Describe sentence structure, vocabulary, and personality:\n{tone}";

pub const STRATEGIST_SYSTEM: &str = "You are a content strategist.";

/// Outline planning prompt. The JSON shape below is the `Outline` contract.
pub const OUTLINE_PROMPT_TEMPLATE: &str = r#"Create a detailed outline for a 2500-word guide based on:
Expertise: {expertise}
Research/Context: {research}
Target Audience: B2B Decision Makers

Return ONLY a JSON object with this structure:
{
    "title": "Title",
    "intro_hook": "Hook description",
    "sections": [
        {"title": "Section 1 Title", "key_points": ["point 1", "point 2"]}
    ],
    "conclusion_theme": "Theme"
}"#;

pub const WRITER_SYSTEM: &str = "You are a professional writer.";

pub const INTRO_PROMPT_TEMPLATE: &str =
    "Write a 300-word introduction for '{title}'. Hook: {hook}. Tone: {tone}";

pub const SECTION_PROMPT_TEMPLATE: &str = r#"Write Section {number}: '{title}'.
Key points:
{key_points}
Tone: {tone}
Context: {expertise}
Length: 500 words. Include examples."#;

pub const CONCLUSION_PROMPT_TEMPLATE: &str =
    "Write a conclusion for '{title}'. Theme: {theme}. Tone: {tone}";

pub const LINKEDIN_SYSTEM: &str = "You are a LinkedIn expert.";

pub const LINKEDIN_PROMPT_TEMPLATE: &str = r#"Write LinkedIn Post #{number} based on this expertise: {expertise}
Tone: {tone}
Format: Short paragraphs, line breaks.
Focus: {focus}
Include: Hook, Value, CTA."#;

pub const EMAIL_SYSTEM: &str = "You are an email marketing expert.";

pub const EMAIL_PROMPT_TEMPLATE: &str = r#"Write Nurture Email #{number} based on this expertise: {expertise}
Tone: {tone}
Goal: {goal}
Include: Subject line options."#;

pub const VISUAL_SYSTEM: &str = "You are a visual design expert. Return only JSON.";

pub const VISUAL_PROMPT_TEMPLATE: &str = r#"You are a world-class visual designer and creative director.
Analyze the following LinkedIn post and generate 3 DISTINCT visual concepts that would capture attention.

LinkedIn Post:
"{post_text}"

For EACH concept, provide:
1. A Title (e.g., "The Contrarian Chart").
2. A Rationale (Why this works for this post).
3. A High-End Image Generation Prompt (for Midjourney/DALL-E) that is detailed and artistic.
4. A simplified SVG representation of the concept (using 800x800 viewBox).
   - The SVG should be modern, clean, and professional (dark mode compatible).
   - Brand colors: Blue (#00A3FF), Black (#050505), White (#FFFFFF), Grey (#333333).
   - Font: sans-serif.

Return ONLY a JSON array of objects. Format:
[
    {
        "title": "...",
        "rationale": "...",
        "image_prompt": "...",
        "svg_code": "<svg>...</svg>"
    }
]"#;
