use rand::Rng;
use rand::seq::SliceRandom;

const GREETING: &str = "Hello! I'm Gemini, your AI assistant. How can I help you today?";
const WEATHER: &str = "I'd be happy to help with weather information! However, I don't have access to real-time weather data in this demo. You can check your local weather service for current conditions.";
const CODING: &str = "I'd love to help you with coding! Whether you need help with debugging, learning new concepts, or writing code, feel free to ask me specific questions.";
const IMAGES: &str = "I can see you mentioned images! I can help analyze and discuss images you share with me. Feel free to upload an image using the image button.";

pub const GENERIC_REPLIES: [&str; 5] = [
    "That's an interesting point! Can you tell me more about what you're thinking?",
    "I understand what you're saying. Here's my perspective on that...",
    "Thanks for sharing that with me. Let me help you explore this further.",
    "That's a great question! Let me break this down for you.",
    "I appreciate you bringing this up. Here's what I think about it...",
];

/// Canned reply for a keyword, checked in priority order.
fn keyword_reply(prompt: &str) -> Option<&'static str> {
    let lower = prompt.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if has(&["hello", "hi"]) {
        Some(GREETING)
    } else if has(&["weather"]) {
        Some(WEATHER)
    } else if has(&["code", "programming"]) {
        Some(CODING)
    } else if has(&["image", "photo"]) {
        Some(IMAGES)
    } else {
        None
    }
}

pub fn compose_reply<R: Rng + ?Sized>(prompt: &str, rng: &mut R) -> String {
    keyword_reply(prompt)
        .or_else(|| GENERIC_REPLIES.choose(rng).copied())
        .unwrap_or(GENERIC_REPLIES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn keywords_pick_canned_replies() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(compose_reply("Hello there", &mut rng), GREETING);
        assert_eq!(compose_reply("What's the WEATHER like?", &mut rng), WEATHER);
        assert_eq!(compose_reply("help with programming", &mut rng), CODING);
        assert_eq!(compose_reply("look at my photo", &mut rng), IMAGES);
    }

    #[test]
    fn greeting_wins_over_later_keywords() {
        // "hi" is a plain substring match, so "this" counts as a greeting too.
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(compose_reply("hi, can you read my code?", &mut rng), GREETING);
        assert_eq!(compose_reply("this weather", &mut rng), GREETING);
    }

    #[test]
    fn fallback_is_one_of_the_generic_replies() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let reply = compose_reply("tell me about rust", &mut rng);
            assert!(GENERIC_REPLIES.contains(&reply.as_str()));
        }
    }
}
