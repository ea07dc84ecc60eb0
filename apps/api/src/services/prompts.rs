// Prompt templates for the three interview service calls.
// Placeholders are substituted with `str::replace` before sending.

/// Identity extraction. Replace `{resume_text}`.
pub const IDENTITY_PROMPT_TEMPLATE: &str = r#"Extract the full name, email address, and phone number from the following resume text.

Return a JSON object in exactly this format:
{"name": "...", "email": "...", "phone": "..."}

If a field is not found, its value MUST be null. Do not guess.

Resume Text:
---
{resume_text}
---"#;

/// Question generation. No placeholders.
pub const QUESTIONS_PROMPT: &str = r#"Generate a set of 6 interview questions for a Full Stack (React/Node.js) developer role.

The questions must be structured as follows: 2 easy, 2 medium, and 2 hard, in that order.
Return a JSON array of objects in exactly this format:
[{"question": "...", "difficulty": "Easy", "time": 20}, ...]

The "difficulty" property must be one of "Easy", "Medium", "Hard".
The "time" property must be exactly 20 for Easy, 60 for Medium, and 120 for Hard questions."#;

/// Transcript evaluation. Replace `{transcript}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert technical interviewer for a Full Stack (React/Node.js) developer role.
Analyze the following interview transcript.

Provide a final integer score out of 100, considering the correctness, clarity, and depth of the answers.
Then write a concise 3-4 sentence summary of the candidate's performance, highlighting strengths and weaknesses.

Return a JSON object in exactly this format:
{"score": 0, "summary": "..."}

Transcript:
---
{transcript}
---"#;

/// Shown in the transcript in place of a blank answer.
pub const NO_ANSWER: &str = "No answer provided.";
