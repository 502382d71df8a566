// Prompt templates for the four strategies.
// Each template carries a single `{jd_text}` slot filled by `build_prompt`.

use crate::experiment::strategy::Strategy;

/// Job description used when none is supplied on the command line.
pub const DEFAULT_JOB_DESCRIPTION: &str = "
Senior Backend Engineer
Required Skills: Python, FastAPI, PostgreSQL, MongoDB, REST API design
Experience: 5+ years
";

/// Zero-shot: direct task instruction, no examples or reasoning steps.
pub const ZERO_SHOT_TEMPLATE: &str = "Generate 5 technical interview questions for this job:

{jd_text}

Generate diverse questions covering technical skills, problem-solving, and system design.";

/// Few-shot: instruction plus exactly two worked examples.
pub const FEW_SHOT_TEMPLATE: &str = r#"Generate 5 technical interview questions for this job:

{jd_text}

Here are examples of good questions:

Example 1:
Question: "Explain the difference between synchronous and asynchronous programming in Python."
Type: Technical
Difficulty: Mid

Example 2:
Question: "How would you design a REST API for a high-traffic e-commerce platform?"
Type: System Design
Difficulty: Senior

Now generate 5 similar questions for the job above."#;

/// Chain-of-thought: a three-step reasoning scaffold before the request.
pub const CHAIN_OF_THOUGHT_TEMPLATE: &str = "Generate 5 technical interview questions for this job:

{jd_text}

Before generating questions, think step-by-step:
1. What are the key skills required?
2. What experience level is needed?
3. What question types would be most revealing?

Then generate 5 questions based on your analysis.";

/// Structured: a literal two-question XML example the model must mimic exactly.
pub const STRUCTURED_TEMPLATE: &str = "Generate 5 technical interview questions for this job:

{jd_text}

You MUST respond in this EXACT XML format:

<questions>
  <question>
    <id>1</id>
    <text>What is the time complexity of binary search?</text>
    <type>technical</type>
    <difficulty>mid</difficulty>
    <category>algorithms</category>
  </question>
  <question>
    <id>2</id>
    <text>Describe your experience with microservices architecture</text>
    <type>behavioral</type>
    <difficulty>senior</difficulty>
    <category>system_design</category>
  </question>
</questions>

Generate 5 questions following this XML structure EXACTLY.";

pub fn template_for(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::ZeroShot => ZERO_SHOT_TEMPLATE,
        Strategy::FewShot => FEW_SHOT_TEMPLATE,
        Strategy::ChainOfThought => CHAIN_OF_THOUGHT_TEMPLATE,
        Strategy::Structured => STRUCTURED_TEMPLATE,
    }
}

/// Builds the prompt for `strategy` around `job_description`. Pure; any string
/// is accepted, including an empty one.
pub fn build_prompt(strategy: Strategy, job_description: &str) -> String {
    template_for(strategy).replace("{jd_text}", job_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        for strategy in Strategy::ALL {
            let a = build_prompt(strategy, DEFAULT_JOB_DESCRIPTION);
            let b = build_prompt(strategy, DEFAULT_JOB_DESCRIPTION);
            assert_eq!(a, b, "{strategy} prompt changed between calls");
        }
    }

    #[test]
    fn test_every_prompt_embeds_job_description() {
        for strategy in Strategy::ALL {
            let prompt = build_prompt(strategy, "Staff Rust Engineer");
            assert!(prompt.starts_with("Generate 5 technical interview questions for this job:"));
            assert!(prompt.contains("Staff Rust Engineer"));
            assert!(!prompt.contains("{jd_text}"));
        }
    }

    #[test]
    fn test_empty_job_description_leaves_empty_slot() {
        let prompt = build_prompt(Strategy::ZeroShot, "");
        assert_eq!(
            prompt,
            "Generate 5 technical interview questions for this job:\n\n\n\n\
             Generate diverse questions covering technical skills, problem-solving, and system design."
        );
    }

    #[test]
    fn test_few_shot_has_exactly_two_examples() {
        let prompt = build_prompt(Strategy::FewShot, DEFAULT_JOB_DESCRIPTION);
        assert_eq!(prompt.matches("Question: \"").count(), 2);
        assert!(prompt.contains("Example 2:"));
        assert!(!prompt.contains("Example 3:"));
    }

    #[test]
    fn test_chain_of_thought_has_three_step_scaffold() {
        let prompt = build_prompt(Strategy::ChainOfThought, DEFAULT_JOB_DESCRIPTION);
        let steps = prompt.find("think step-by-step").unwrap();
        let request = prompt.find("Then generate 5 questions").unwrap();
        assert!(steps < request);
        for step in ["1. ", "2. ", "3. "] {
            assert!(prompt.contains(step));
        }
        assert!(!prompt.contains("4. "));
    }

    #[test]
    fn test_structured_example_has_two_questions() {
        let prompt = build_prompt(Strategy::Structured, DEFAULT_JOB_DESCRIPTION);
        assert_eq!(prompt.matches("<question>").count(), 2);
        assert!(prompt.contains("<questions>") && prompt.contains("</questions>"));
    }

    #[test]
    fn test_placeholder_in_job_description_is_not_expanded() {
        let prompt = build_prompt(Strategy::ZeroShot, "literal {jd_text}");
        assert_eq!(prompt.matches("{jd_text}").count(), 1);
    }
}
