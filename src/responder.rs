use rand::seq::SliceRandom;
use rand::Rng;

pub const CRISIS_REPLY: &str = "I'm very concerned about what you've shared. Your safety is the top priority. Please reach out to a crisis helpline immediately: National Suicide Prevention Lifeline at 988 or contact emergency services at 911. You can also reach out to Soulklinic's emergency support. You don't have to go through this alone.";

pub const SERVICES_REPLY: &str = "Soulklinic offers comprehensive mental health services including: Individual Therapy, Group Therapy, Psychiatric Consultations, Crisis Intervention, Telepsychiatry Sessions, Cognitive Behavioral Therapy (CBT), Depression & Anxiety Treatment, Trauma-Informed Care, and 24/7 AI Support through MindMate. We also provide specialized programs for PTSD, addiction recovery, and family counseling. Would you like to schedule an appointment or learn more about any specific service?";

pub const ANXIETY_REPLY: &str = "I understand you're experiencing anxiety, which can be very overwhelming. Try the 4-7-8 breathing technique: breathe in for 4 counts, hold for 7, exhale for 8. This can help activate your body's relaxation response. Would you like me to guide you through some other grounding techniques, or would you prefer to discuss what's contributing to your anxiety?";

pub const DEPRESSION_REPLY: &str = "I hear that you're going through a difficult time. Depression can make everything feel overwhelming and exhausting. Remember that these feelings, while very real and valid, are temporary. Small steps can make a difference - even getting some sunlight or taking a short walk can help. Have you been able to maintain any daily routines, or would you like suggestions for gentle self-care activities?";

pub const STRESS_REPLY: &str = "Stress can really take a toll on both your mental and physical wellbeing. It sounds like you're dealing with a lot right now. Let's work on breaking things down into manageable pieces. What feels like the most pressing concern you're facing? Sometimes talking through priorities can help reduce that overwhelming feeling.";

/// Generic supportive replies used when no category matches.
pub const FALLBACK_REPLIES: [&str; 5] = [
    "Thank you for sharing that with me. It takes courage to open up about how you're feeling. I'm here to listen and support you through this.",
    "I appreciate you trusting me with your thoughts. Your mental health matters, and taking time to check in with yourself is an important step.",
    "It sounds like you have a lot on your mind. I'm here to help you work through these feelings at your own pace.",
    "I want you to know that your feelings are valid and you're not alone in this journey. Let's explore what might be most helpful for you right now.",
    "Taking the step to reach out shows real strength. I'm here to provide support and guidance as you navigate these challenges.",
];

pub const SAFETY_SUFFIX: &str = "If you feel you need immediate professional support, please don't hesitate to contact Soulklinic directly or speak with a mental health professional.";

struct Category {
    keywords: &'static [&'static str],
    reply: &'static str,
}

// Checked in order; crisis terms always come first so that an utterance
// containing both a crisis term and any other keyword gets the crisis reply.
const CATEGORIES: [Category; 5] = [
    Category {
        keywords: &["suicide", "hurt myself", "end it all"],
        reply: CRISIS_REPLY,
    },
    Category {
        keywords: &["services", "what do you offer"],
        reply: SERVICES_REPLY,
    },
    Category {
        keywords: &["anxious", "anxiety", "panic", "worried"],
        reply: ANXIETY_REPLY,
    },
    Category {
        keywords: &["depressed", "sad", "hopeless", "empty"],
        reply: DEPRESSION_REPLY,
    },
    Category {
        keywords: &["stress", "overwhelmed", "pressure"],
        reply: STRESS_REPLY,
    },
];

/// Pick the reply for a user utterance. Matching is raw substring matching
/// over the lower-cased input (no word boundaries), first category wins.
/// Unmatched input draws one of the generic supportive replies from `rng`.
pub fn select_reply<R: Rng>(utterance: &str, rng: &mut R) -> String {
    let lowered = utterance.to_lowercase();

    for category in &CATEGORIES {
        if category.keywords.iter().any(|k| lowered.contains(k)) {
            return category.reply.to_string();
        }
    }

    let supportive = FALLBACK_REPLIES
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_REPLIES[0]);
    format!("{} {}", supportive, SAFETY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_crisis_terms_match() {
        for text in [
            "I've been thinking about suicide",
            "sometimes I want to hurt myself",
            "I just want to end it all",
        ] {
            assert_eq!(select_reply(text, &mut rng()), CRISIS_REPLY);
        }
    }

    #[test]
    fn test_crisis_wins_over_every_other_category() {
        // "services" alone would match the services category; the crisis
        // term must still dominate.
        let text = "what services do you offer? lately I want to hurt myself";
        assert_eq!(select_reply(text, &mut rng()), CRISIS_REPLY);

        let text = "I'm anxious and stressed and thinking about suicide";
        assert_eq!(select_reply(text, &mut rng()), CRISIS_REPLY);
    }

    #[test]
    fn test_services_inquiry() {
        assert_eq!(
            select_reply("What services do you offer?", &mut rng()),
            SERVICES_REPLY
        );
    }

    #[test]
    fn test_anxiety_terms() {
        assert_eq!(
            select_reply("I feel anxious about work", &mut rng()),
            ANXIETY_REPLY
        );
        assert_eq!(
            select_reply("my ANXIETY is bad today", &mut rng()),
            ANXIETY_REPLY
        );
        assert_eq!(
            select_reply("I had a panic attack", &mut rng()),
            ANXIETY_REPLY
        );
    }

    #[test]
    fn test_depression_terms() {
        assert_eq!(select_reply("I feel so hopeless", &mut rng()), DEPRESSION_REPLY);
    }

    #[test]
    fn test_stress_terms() {
        assert_eq!(
            select_reply("the pressure at school is too much", &mut rng()),
            STRESS_REPLY
        );
    }

    #[test]
    fn test_earlier_category_wins_without_crisis() {
        // Matches both services ("services") and anxiety ("worried");
        // services is checked first.
        let text = "I'm worried about the cost of your services";
        assert_eq!(select_reply(text, &mut rng()), SERVICES_REPLY);
    }

    #[test]
    fn test_substring_matching_has_no_word_boundaries() {
        // "sad" inside "sadly" still matches; this mirrors the keyword
        // table's substring semantics.
        assert_eq!(select_reply("sadly it rained", &mut rng()), DEPRESSION_REPLY);
    }

    #[test]
    fn test_fallback_draws_from_pool_with_suffix() {
        let reply = select_reply("hello there", &mut rng());
        let supportive = reply
            .strip_suffix(SAFETY_SUFFIX)
            .expect("fallback reply must end with the safety suffix")
            .trim_end();
        assert!(FALLBACK_REPLIES.contains(&supportive));
    }

    #[test]
    fn test_fallback_is_deterministic_under_seeded_rng() {
        let first = select_reply("hello there", &mut StdRng::seed_from_u64(42));
        let second = select_reply("hello there", &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
