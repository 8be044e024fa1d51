use argument_miner::{
    analyze, analyze_with_rng, extract_sources, find_contradictions, find_supporting_evidence,
    identify_main_thesis, tokenize_sentences, Argument, ArgumentKind, Span, EXTERNAL_SOURCE_NOTE,
    NO_THESIS, RESEARCH_STUDY_NOTE,
};
use rand::rngs::mock::StepRng;

/// Jitter of exactly zero.
fn no_jitter() -> StepRng {
    StepRng::new(0, 0)
}

/// Jitter just below the top of its range.
fn max_jitter() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn sentences(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn argument(text: &str, kind: ArgumentKind, confidence: u32) -> Argument {
    Argument {
        id: "arg_0".to_string(),
        kind,
        text: text.to_string(),
        confidence,
        position: Span { start: 0, end: 0 },
        sources: vec![],
    }
}

#[test]
fn splits_on_terminal_punctuation_followed_by_whitespace() {
    let got = tokenize_sentences("Cats are great. Therefore, everyone should own one.");
    assert_eq!(got, vec!["Cats are great.", "Therefore, everyone should own one."]);

    let got = tokenize_sentences("Really?  Yes!\n\nOkay.");
    assert_eq!(got, vec!["Really?", "Yes!", "Okay."]);
}

#[test]
fn tokenizer_keeps_known_limitations() {
    // No split without trailing whitespace, and abbreviations split.
    assert_eq!(tokenize_sentences("Pi is 3.14 exactly."), vec!["Pi is 3.14 exactly."]);
    assert_eq!(
        tokenize_sentences("Dr. Smith arrived."),
        vec!["Dr.", "Smith arrived."]
    );
}

#[test]
fn tokenizer_drops_blank_pieces() {
    assert!(tokenize_sentences("").is_empty());
    assert!(tokenize_sentences("   \n\t ").is_empty());
    assert_eq!(tokenize_sentences("  trailing text  "), vec!["trailing text"]);
}

#[test]
fn empty_text_falls_back_to_defaults() {
    let result = analyze("");
    assert_eq!(result.statistics.total_sentences, 0);
    assert_eq!(result.statistics.argumentative_sentences, 0);
    assert_eq!(result.statistics.neutral_sentences, 0);
    assert_eq!(result.statistics.average_confidence, 0.0);
    assert!(result.arguments.is_empty());
    assert!(result.claims.is_empty());
    assert_eq!(result.main_thesis, NO_THESIS);
    assert!(result.id.starts_with("analysis_"));
}

#[test]
fn conclusion_sentence_is_retained_and_becomes_thesis() {
    let text = "Cats are great. Therefore, everyone should own one.";
    let result = analyze_with_rng(text, &mut no_jitter());

    assert_eq!(result.statistics.total_sentences, 2);
    assert_eq!(result.arguments.len(), 1);
    let arg = &result.arguments[0];
    assert_eq!(arg.id, "arg_1");
    assert_eq!(arg.kind, ArgumentKind::Conclusion);
    // marker 30 + conclusion 35 + comma 10
    assert_eq!(arg.confidence, 75);
    assert_eq!(arg.position, Span { start: 16, end: 51 });
    assert_eq!(result.main_thesis, "Therefore, everyone should own one.");
    assert_eq!(result.statistics.neutral_sentences, 1);
    assert_eq!(result.statistics.average_confidence, 75.0);
}

#[test]
fn conclusion_overrides_evidence_kind_but_keeps_both_bonuses() {
    let text = "According to the report, we should therefore act.";
    let result = analyze_with_rng(text, &mut no_jitter());

    assert_eq!(result.arguments.len(), 1);
    let arg = &result.arguments[0];
    assert_eq!(arg.kind, ArgumentKind::Conclusion);
    assert_eq!(arg.confidence, 95, "30 + 40 + 35 + 10 is clamped to 95");
    assert_eq!(arg.sources, vec![EXTERNAL_SOURCE_NOTE.to_string()]);
}

#[test]
fn evidence_sentence_depends_on_jitter_at_the_threshold() {
    let text = "Research shows that sleep matters.";

    let low = analyze_with_rng(text, &mut no_jitter());
    assert!(low.arguments.is_empty(), "a bare 40 is not above the threshold");
    assert_eq!(low.statistics.neutral_sentences, 1);

    let high = analyze_with_rng(text, &mut max_jitter());
    assert_eq!(high.arguments.len(), 1);
    assert_eq!(high.arguments[0].kind, ArgumentKind::Evidence);
    assert_eq!(high.arguments[0].confidence, 60);
    assert_eq!(
        high.arguments[0].sources,
        vec![RESEARCH_STUDY_NOTE.to_string()]
    );
}

#[test]
fn positions_assume_a_single_separator() {
    let text = "Thus, one.  Thus, two.";
    let result = analyze_with_rng(text, &mut no_jitter());

    assert_eq!(result.arguments.len(), 2);
    assert_eq!(result.arguments[0].position, Span { start: 0, end: 10 });
    // The real start is 12; the running offset only advances by length + 1.
    assert_eq!(result.arguments[1].position, Span { start: 11, end: 21 });
}

#[test]
fn argument_confidence_never_exceeds_95() {
    let text = "According to recent data, research shows that we must therefore, as a result, \
                act quickly; consequently the plan changes.";
    let result = analyze_with_rng(text, &mut max_jitter());
    assert_eq!(result.arguments.len(), 1);
    assert_eq!(result.arguments[0].confidence, 95);
}

#[test]
fn claim_confidence_is_not_clamped() {
    let text = "It is clear that all people must do better.";
    let result = analyze_with_rng(text, &mut max_jitter());

    assert_eq!(result.claims.len(), 1);
    let claim = &result.claims[0];
    assert_eq!(claim.id, "claim_0");
    // 40 + 25 + 20 + jitter just under 15
    assert_eq!(claim.confidence, 100);
}

#[test]
fn first_person_claim_markers_never_score() {
    let result = analyze_with_rng("I believe cats are nice.", &mut max_jitter());
    assert!(result.claims.is_empty(), "only jitter remains: {:?}", result.claims);

    // Strong and comparative bonuses still count: 25 + 20 + jitter.
    let result = analyze_with_rng("I believe all people must do better.", &mut max_jitter());
    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].confidence, 60);
}

#[test]
fn weak_claims_are_dropped() {
    let result = analyze_with_rng("Everyone should own one.", &mut no_jitter());
    assert!(result.claims.is_empty(), "strong language alone scores 25");

    let result = analyze_with_rng("Everyone should own one.", &mut max_jitter());
    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].confidence, 40);
}

#[test]
fn links_supporting_evidence_by_overlap_and_marker() {
    let text = "Remote work will make teams more productive. \
                According to a survey, remote work will make teams more productive. \
                Remote work will make teams more productive in winter.";
    let result = analyze_with_rng(text, &mut no_jitter());

    let claim = result
        .claims
        .iter()
        .find(|c| c.text == "Remote work will make teams more productive.")
        .expect("claim present");
    assert_eq!(
        claim.evidence,
        vec!["According to a survey, remote work will make teams more productive."]
    );
}

#[test]
fn evidence_is_capped_at_three_in_text_order() {
    let claim = "Teams will ship more features.";
    let all = sentences(&[
        claim,
        "According to data, teams will ship more features.",
        "Research shows teams will ship more features.",
        "Survey results say teams will ship more features.",
        "Experts believe teams will ship more features.",
    ]);
    let evidence = find_supporting_evidence(claim, &all);
    assert_eq!(evidence, all[1..4].to_vec());
}

#[test]
fn evidence_requires_an_evidence_marker() {
    let claim = "Teams will ship more features.";
    let all = sentences(&[claim, "Teams will ship more features soon."]);
    assert!(find_supporting_evidence(claim, &all).is_empty());
}

#[test]
fn contradiction_needs_negation_and_three_shared_tokens() {
    let claim = "All students must read more books.";
    let text = format!(
        "{claim} Students must not read more books at night. Students are not readers."
    );
    let result = analyze_with_rng(&text, &mut no_jitter());

    let found = result
        .claims
        .iter()
        .find(|c| c.text == claim)
        .expect("claim present");
    assert_eq!(
        found.contradictions,
        vec!["Students must not read more books at night."]
    );
}

#[test]
fn contradictions_are_capped_at_two() {
    let claim = "Students must read more books.";
    let all = sentences(&[
        claim,
        "Students must not read more books.",
        "But students must read more books.",
        "No, students must read more books.",
    ]);
    let contradictions = find_contradictions(claim, &all);
    assert_eq!(contradictions, all[1..3].to_vec());
}

#[test]
fn duplicate_sentences_exclude_each_other() {
    let repeated = "According to the survey, teams will do more work.";
    let text = format!("{repeated} {repeated}");
    let result = analyze_with_rng(&text, &mut no_jitter());

    assert_eq!(result.claims.len(), 2);
    for claim in &result.claims {
        assert!(claim.evidence.is_empty());
        assert!(claim.contradictions.is_empty());
    }
}

#[test]
fn extracts_urls_and_source_notes() {
    let sources = extract_sources("According to https://example.org/report, the study found gains.");
    assert_eq!(
        sources,
        vec![
            "https://example.org/report,".to_string(),
            EXTERNAL_SOURCE_NOTE.to_string(),
            RESEARCH_STUDY_NOTE.to_string(),
        ]
    );
    assert!(extract_sources("Plain words only.").is_empty());
}

#[test]
fn thesis_prefers_highest_conclusion() {
    let args = vec![
        argument("Low conclusion.", ArgumentKind::Conclusion, 70),
        argument("Strong premise.", ArgumentKind::Premise, 93),
        argument("High conclusion.", ArgumentKind::Conclusion, 90),
    ];
    let thesis = identify_main_thesis(&sentences(&["First."]), &args);
    assert_eq!(thesis, "High conclusion.");
}

#[test]
fn thesis_ties_go_to_the_earlier_conclusion() {
    let args = vec![
        argument("Earlier.", ArgumentKind::Conclusion, 80),
        argument("Later.", ArgumentKind::Conclusion, 80),
    ];
    assert_eq!(identify_main_thesis(&[], &args), "Earlier.");
}

#[test]
fn thesis_falls_back_to_strong_argument_then_first_sentence() {
    let args = vec![
        argument("Weak.", ArgumentKind::Premise, 60),
        argument("Strong.", ArgumentKind::Evidence, 76),
        argument("Stronger.", ArgumentKind::Evidence, 90),
    ];
    assert_eq!(identify_main_thesis(&sentences(&["First."]), &args), "Strong.");

    let weak = vec![argument("Weak.", ArgumentKind::Premise, 75)];
    assert_eq!(identify_main_thesis(&sentences(&["First."]), &weak), "First.");
    assert_eq!(identify_main_thesis(&[], &[]), NO_THESIS);
}

#[test]
fn json_output_uses_camel_case_shape() {
    let result = analyze_with_rng("Thus, we win.", &mut no_jitter());
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("mainThesis").is_some());
    assert!(json.get("timestamp").is_some());
    let stats = &json["statistics"];
    for key in [
        "totalSentences",
        "argumentativeSentences",
        "neutralSentences",
        "averageConfidence",
    ] {
        assert!(stats.get(key).is_some(), "missing {key}");
    }
    let arg = &json["arguments"][0];
    assert_eq!(arg["type"], "conclusion");
    assert_eq!(arg["position"]["start"], 0);
    assert_eq!(arg["position"]["end"], 13);
    assert!(json["claims"].is_array());
}
