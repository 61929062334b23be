//! Speech quality metrics derived from transcript text.
//!
//! Scenario-independent. `pace_wpm` assumes a fixed nominal two-minute call;
//! the 150/80 wpm recommendation thresholds were tuned against that estimate,
//! so it stays even when real timestamps are available.

use serde::{Deserialize, Serialize};

/// Single-word fillers counted as hesitations
pub const FILLER_WORDS: &[&str] = &["um", "uh", "er", "ah", "like"];

/// Canonical emergency phrases, in report order
pub const KEY_PHRASES: &[&str] = &[
    "stay calm",
    "apply pressure",
    "do not move",
    "help is on the way",
    "ambulance is coming",
    "keep breathing",
    "cpr",
    "recovery position",
    "what is your location",
    "what is your address",
];

/// Nominal call length behind the pace estimate
pub const NOMINAL_CALL_MINUTES: usize = 2;

const LOCATION_PHRASES: &[&str] = &["what is your location", "what is your address"];
const HELP_COMING_PHRASES: &[&str] = &["help is on the way", "ambulance is coming"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    pub clarity_score: u8,
    pub pace_wpm: u32,
    pub hesitations: u32,
    pub key_phrases_used: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Analyze a raw transcript. Pure function of the input string.
///
/// Filler words are counted per whitespace token after trimming surrounding
/// ASCII punctuation and lower-casing, so "Um," and "UH." both count.
/// "you know" counts once per adjacent token pair.
pub fn analyze_speech_metrics(transcript: &str) -> SpeechAnalysis {
    let words: Vec<String> = transcript
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
        .collect();
    let word_count = words.len();

    let hesitations = count_hesitations(&words);

    let lower = transcript.to_lowercase();
    let key_phrases_used: Vec<String> = KEY_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| p.to_string())
        .collect();

    // Half rounds up
    let pace_wpm = ((word_count + NOMINAL_CALL_MINUTES / 2) / NOMINAL_CALL_MINUTES) as u32;

    let clarity = 100 - hesitations as i64 * 5 + key_phrases_used.len() as i64 * 8;
    let clarity_score = clarity.clamp(0, 100) as u8;

    let recommendations = recommend(hesitations, pace_wpm, &key_phrases_used);

    SpeechAnalysis {
        clarity_score,
        pace_wpm,
        hesitations,
        key_phrases_used,
        recommendations,
    }
}

fn count_hesitations(words: &[String]) -> u32 {
    let single = words.iter().filter(|w| FILLER_WORDS.contains(&w.as_str())).count();
    let you_know = words.windows(2).filter(|pair| pair[0] == "you" && pair[1] == "know").count();
    (single + you_know) as u32
}

fn recommend(hesitations: u32, pace_wpm: u32, used: &[String]) -> Vec<String> {
    let has_any = |phrases: &[&str]| used.iter().any(|u| phrases.contains(&u.as_str()));
    let mut recs = Vec::new();

    if hesitations > 5 {
        recs.push("Reduce filler words (um, uh) to sound more confident".to_string());
    }
    if pace_wpm > 150 {
        recs.push("Slow down your speech — clarity is critical in emergencies".to_string());
    }
    if pace_wpm < 80 {
        recs.push("Speak more efficiently — time is critical in emergencies".to_string());
    }
    if !has_any(LOCATION_PHRASES) {
        recs.push("Always confirm the caller's exact location early in the call".to_string());
    }
    if !has_any(HELP_COMING_PHRASES) {
        recs.push(
            "Always confirm that emergency services are en route to reassure the caller".to_string(),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript() {
        let analysis = analyze_speech_metrics("");
        assert_eq!(analysis.pace_wpm, 0);
        assert_eq!(analysis.hesitations, 0);
        assert_eq!(analysis.clarity_score, 100);
        // Too slow, no location, no help-coming
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[test]
    fn test_fillers_ignore_punctuation_and_case() {
        let analysis = analyze_speech_metrics("Um, okay. UH where... like, you know, here");
        assert_eq!(analysis.hesitations, 4);
        assert_eq!(analyze_speech_metrics("Um, uh. like,").hesitations, 3);
    }

    #[test]
    fn test_pace_rounds_half_up() {
        let analysis = analyze_speech_metrics("one two three");
        assert_eq!(analysis.pace_wpm, 2);
    }

    #[test]
    fn test_key_phrases_in_catalog_order() {
        let analysis = analyze_speech_metrics("Do CPR now. Stay calm. What is your address?");
        assert_eq!(analysis.key_phrases_used, vec!["stay calm", "cpr", "what is your address"]);
        assert!(!analysis
            .recommendations
            .iter()
            .any(|r| r.contains("exact location")));
    }

    #[test]
    fn test_clarity_clamped_low() {
        let transcript = "um ".repeat(30);
        let analysis = analyze_speech_metrics(&transcript);
        assert_eq!(analysis.hesitations, 30);
        assert_eq!(analysis.clarity_score, 0);
        assert!(analysis.recommendations[0].contains("filler"));
    }

    #[test]
    fn test_fast_pace_recommendation() {
        let transcript = "word ".repeat(320);
        let analysis = analyze_speech_metrics(&transcript);
        assert_eq!(analysis.pace_wpm, 160);
        assert!(analysis
            .recommendations
            .contains(&"Slow down your speech — clarity is critical in emergencies".to_string()));
    }
}
