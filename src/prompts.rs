//! Instruction payloads sent with every analysis request.

/// System instruction for the content-analysis call.
///
/// Job-invariant: the same payload goes out with every chunk of a job, and
/// its size is what the budget calculator subtracts from the context window.
/// The JSON contract here is exactly what the reconciler merges.
pub const ANALYSIS_INSTRUCTION: &str = r#"<purpose>
    You are an expert at analyzing content to determine the optimal podcast format based on content characteristics.
    You follow the instructions perfectly to evaluate content and select the best-suited podcast format.
</purpose>

<instructions>
    <instruction>Evaluate the content based on key factors: content complexity level, number of distinct viewpoints present, technical depth of material, natural conversation potential.</instruction>
    <instruction>Consider available podcast formats: host_expert: Traditional interview format, two_experts: Dialogue between different perspectives, panel: Multi-expert discussion.</instruction>
    <instruction>Identify the content segments worth covering, the technical terms a listener needs defined, and the questions that can drive discussion.</instruction>
    <instruction>Format output as JSON: { "format": "chosen_format", "reasoning": "detailed explanation", "segments": ["topic1", "topic2"], "technical_terms": [{ "term": "name", "definition": "clear explanation" }], "discussion_points": ["question1", "question2"] }</instruction>
    <instruction>Ensure reasoning addresses why the format best fits the content, how it handles the complexity, and how it maintains engagement.</instruction>
</instructions>"#;
