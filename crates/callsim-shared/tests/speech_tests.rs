//! Tests for the speech metrics analyzer.

use callsim_shared::analyze_speech_metrics;

fn transcript_of(words: usize, fillers: usize, phrases: &[&str]) -> String {
    let mut parts: Vec<String> = phrases.iter().map(|p| p.to_string()).collect();
    let phrase_words: usize = phrases.iter().map(|p| p.split_whitespace().count()).sum();
    parts.extend(std::iter::repeat("um".to_string()).take(fillers));
    parts.extend(std::iter::repeat("word".to_string()).take(words - fillers - phrase_words));
    parts.join(" ")
}

#[test]
fn test_metrics_for_slow_hesitant_call() {
    let transcript = transcript_of(120, 6, &["stay calm", "cpr"]);
    assert_eq!(transcript.split_whitespace().count(), 120);

    let analysis = analyze_speech_metrics(&transcript);
    assert_eq!(analysis.pace_wpm, 60);
    assert_eq!(analysis.hesitations, 6);
    assert_eq!(analysis.key_phrases_used, vec!["stay calm", "cpr"]);
    assert_eq!(analysis.clarity_score, 86);
    assert_eq!(analysis.recommendations.len(), 4);
    assert!(analysis.recommendations[0].contains("filler"));
    assert!(analysis.recommendations[1].starts_with("Speak more efficiently"));
}

#[test]
fn test_metrics_for_confident_call() {
    let transcript = transcript_of(
        200,
        0,
        &["what is your location", "help is on the way", "apply pressure", "stay calm"],
    );
    let analysis = analyze_speech_metrics(&transcript);
    assert_eq!(analysis.pace_wpm, 100);
    assert_eq!(analysis.hesitations, 0);
    assert_eq!(analysis.clarity_score, 100);
    assert!(analysis.recommendations.is_empty());
}

#[test]
fn test_metrics_are_deterministic() {
    let transcript = "OPERATOR: um what is your address\nCALLER: uh 12 main street";
    assert_eq!(analyze_speech_metrics(transcript), analyze_speech_metrics(transcript));
}
