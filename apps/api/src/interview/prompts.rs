// All LLM prompt constants for the Interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Primary question-generation prompt. Replace `{skills}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate 5 technical interview questions for a candidate with expertise in: {skills}

Requirements:
1. Each question should be specific to the candidate's skills
2. Include a mix of:
   - Practical problem-solving
   - System design
   - Technical concepts
   - Best practices
3. Questions should be challenging but answerable
4. Format each question with difficulty level in square brackets

Example format:
1. [Difficulty: Medium] Question about skill...
2. [Difficulty: Hard] Technical scenario question...

Please generate questions now."#;

/// Shorter practice-question prompt (3 to 5 questions). Replace `{skills}`.
pub const PRACTICE_PROMPT_TEMPLATE: &str = r#"Generate 3-5 technical interview questions for the following technologies:
{skills}

Requirements:
1. Questions should be challenging but appropriate for an interview
2. Mix of theoretical and practical questions
3. Include at least one problem-solving question
4. Format each question as a numbered line starting with its difficulty level in square brackets, e.g. "1. [Easy] ..." (Easy/Medium/Hard)"#;

/// Answer-evaluation prompt. Replace: {question}, {answer}, {tone_instruction}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate the following technical interview response:

Question: {question}

Candidate's Answer: {answer}

Please provide a constructive evaluation considering:
1. Technical accuracy
2. Completeness of the answer
3. Problem-solving approach
4. Communication clarity

Format your evaluation with these section headers, each on its own line:
Strengths:
Areas for improvement:
Overall assessment:

Use "* " bullet points under the first two sections.

{tone_instruction}"#;
