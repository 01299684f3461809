//! Prompt assembly for the sustainability assistant.

use verda_footprint::FootprintResult;

use crate::types::ChatTurn;

/// Fixed persona instruction appended to every system prompt.
pub const PERSONA_PROMPT: &str = "\
You are Verda, a friendly, encouraging, and knowledgeable sustainability assistant.
Always provide practical sustainability suggestions that are easy to adopt,
while keeping a supportive and positive tone. Prefer actionable steps over theory.
Reasoning: medium
";

/// Build the per-request system prompt.
///
/// A narrative block embedding the estimate and its equivalents, followed by
/// the persona instruction. Built fresh for every request.
pub fn build_system_prompt(footprint: &FootprintResult) -> String {
    format!(
        "This user's estimated weekly footprint is **{:.1} kg CO2**.\n\
         That's roughly planting {} trees \u{1F333} or taking {} short flights \u{2708}\u{FE0F}.\n\
         Breakdown includes transportation and food choices.\n\
         Your job is to give practical, friendly suggestions to lower this footprint.\n\
         {}",
        footprint.total_kg, footprint.trees, footprint.flights, PERSONA_PROMPT
    )
}

/// Render one raw text blob for backends that take a single prompt string.
///
/// History turns become role-tagged lines; the trailing `ASSISTANT:` cue
/// leaves the model positioned to produce the next reply.
pub fn render_transcript(system_prompt: &str, history: &[ChatTurn], message: &str) -> String {
    let mut transcript = String::with_capacity(system_prompt.len() + message.len() + 64);
    transcript.push_str(system_prompt);
    transcript.push('\n');
    for turn in history {
        transcript.push_str(turn.role.tag());
        transcript.push_str(": ");
        transcript.push_str(&turn.content);
        transcript.push('\n');
    }
    transcript.push_str("USER: ");
    transcript.push_str(message);
    transcript.push_str("\nASSISTANT:");
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use verda_footprint::{estimate, ActivityInput};

    fn car_only_footprint() -> FootprintResult {
        estimate(&ActivityInput {
            car_km: 100.0,
            ..ActivityInput::default()
        })
    }

    #[test]
    fn test_system_prompt_embeds_estimate() {
        let prompt = build_system_prompt(&car_only_footprint());
        assert!(prompt.contains("**230.0 kg CO2**"));
        assert!(prompt.contains("planting 11 trees"));
        assert!(prompt.contains("taking 0 short flights"));
        assert!(prompt.ends_with(PERSONA_PROMPT));
    }

    #[test]
    fn test_system_prompt_mentions_persona() {
        let prompt = build_system_prompt(&car_only_footprint());
        assert!(prompt.contains("You are Verda"));
    }

    #[test]
    fn test_transcript_renders_role_tags_in_order() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello!")];
        let transcript = render_transcript("SYSTEM PROMPT", &history, "what next?");
        assert_eq!(
            transcript,
            "SYSTEM PROMPT\nUSER: hi\nASSISTANT: hello!\nUSER: what next?\nASSISTANT:"
        );
    }

    #[test]
    fn test_transcript_with_empty_history() {
        let transcript = render_transcript("S", &[], "hello");
        assert_eq!(transcript, "S\nUSER: hello\nASSISTANT:");
    }
}
