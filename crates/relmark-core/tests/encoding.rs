use relmark_core::{
    BuilderConfig, EntityInput, FeatureBuilder, HfSubwordTokenizer, LabelVocabulary,
    MarkerRegistry, MarkingScheme, RawExample, RelmarkError, SubwordTokenizer, TruncationPolicy,
};

const TOKENIZER: &str = include_str!("fixtures/tokenizer.json");

fn tokenizer() -> HfSubwordTokenizer {
    HfSubwordTokenizer::from_json(TOKENIZER).unwrap()
}

fn builder(scheme: MarkingScheme, max_length: usize) -> FeatureBuilder<HfSubwordTokenizer> {
    let config = BuilderConfig::new()
        .with_scheme(scheme)
        .with_max_length(max_length);
    FeatureBuilder::new(tokenizer(), LabelVocabulary::tacred(), &config).unwrap()
}

fn bill_gates(relation: &str) -> RawExample {
    RawExample {
        id: Some("bill-gates".into()),
        tokens: ["Bill", "Gates", "founded", "Microsoft"]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        subject_start: 0,
        subject_end: 1,
        object_start: 3,
        object_end: 3,
        subject_type: "PERSON".into(),
        object_type: "ORG".into(),
        relation: relation.into(),
    }
}

fn longer_sentence() -> RawExample {
    RawExample {
        id: None,
        tokens: "Steve Jobs and Bill Gates founded a new startup in Seattle"
            .split(' ')
            .map(String::from)
            .collect(),
        subject_start: 3,
        subject_end: 4,
        object_start: 10,
        object_end: 10,
        subject_type: "PERSON".into(),
        object_type: "CITY".into(),
        relation: "per:cities_of_residence".into(),
    }
}

fn ids(tokenizer: &HfSubwordTokenizer, tokens: &[&str]) -> Vec<u32> {
    let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    tokenizer.to_ids(&tokens).unwrap()
}

#[test]
fn mask_and_ids_have_equal_length_for_every_scheme() {
    for scheme in MarkingScheme::ALL {
        for max_length in [2, 5, 9, 512] {
            let encoder = BuilderConfig::new()
                .with_scheme(scheme)
                .with_max_length(max_length)
                .with_truncation(TruncationPolicy::Keep)
                .encoder()
                .unwrap();
            let mut tokenizer = tokenizer();
            let mut registry = MarkerRegistry::new();
            for example in [bill_gates("org:founded_by"), longer_sentence()] {
                let input = EntityInput {
                    tokens: &example.tokens,
                    subject: example.subject_span(),
                    object: example.object_span(),
                    subject_type: &example.subject_type,
                    object_type: &example.object_type,
                };
                let encoded = encoder
                    .encode(&mut tokenizer, &mut registry, &input)
                    .unwrap();
                assert_eq!(
                    encoded.entity_mask.len(),
                    encoded.input_ids.len(),
                    "{scheme} max_length={max_length}"
                );
                assert!(encoded.input_ids.len() <= max_length);
            }
        }
    }
}

#[test]
fn positions_lie_inside_input_ids_when_spans_survive() {
    for scheme in MarkingScheme::ALL {
        let mut builder = builder(scheme, 512);
        for example in [bill_gates("org:founded_by"), longer_sentence()] {
            let feature = builder.build_one(&example).unwrap();
            assert!(feature.subject_position < feature.input_ids.len(), "{scheme}");
            assert!(feature.object_position < feature.input_ids.len(), "{scheme}");
            assert_eq!(feature.entity_mask[0], 0, "{scheme}");
        }
    }
}

#[test]
fn entity_marker_positions_point_at_start_markers() {
    let mut builder = builder(MarkingScheme::EntityMarker, 512);
    for example in [bill_gates("org:founded_by"), longer_sentence()] {
        let feature = builder.build_one(&example).unwrap();
        let tokenizer = builder.tokenizer();

        assert_eq!(
            Some(feature.input_ids[feature.subject_position]),
            tokenizer.token_to_id("[E1]")
        );
        assert_eq!(
            Some(feature.input_ids[feature.object_position]),
            tokenizer.token_to_id("[E2]")
        );
        assert_eq!(feature.entity_mask[feature.subject_position], 0);
        assert_eq!(feature.entity_mask[feature.object_position], 0);
    }
}

#[test]
fn entity_marker_punct_wraps_mentions_with_punctuation() {
    let mut builder = builder(MarkingScheme::EntityMarkerPunct, 512);
    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = builder.tokenizer();

    // @ Bill Gates @ founded # Microsoft #
    let expected = ids(
        tokenizer,
        &[
            "[CLS]", "@", "Bill", "Gates", "@", "found", "##ed", "#", "Micro", "##soft", "#",
            "[SEP]",
        ],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 7);
    assert_eq!(feature.label, 25);

    // Opening and closing marks are 0, mention subwords are 1.
    assert_eq!(feature.entity_mask, vec![0, 0, 1, 1, 0, 0, 0, 0, 1, 1, 0, 0]);
}

#[test]
fn padding_in_tokenizer_json_does_not_leak_into_features() {
    let padded = TOKENIZER.replacen(
        "\"padding\": null",
        r#""padding": {"strategy": {"Fixed": 8}, "direction": "Right", "pad_to_multiple_of": null, "pad_id": 0, "pad_type_id": 0, "pad_token": "[PAD]"}"#,
        1,
    );
    let config = BuilderConfig::new()
        .with_scheme(MarkingScheme::EntityMarkerPunct)
        .with_max_length(512);
    let tokenizer = HfSubwordTokenizer::from_json(&padded).unwrap();
    let mut builder = FeatureBuilder::new(tokenizer, LabelVocabulary::tacred(), &config).unwrap();

    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    assert_eq!(feature.input_ids.len(), 12);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 7);
    let pad = builder.tokenizer().token_to_id("[PAD]").unwrap();
    assert!(!feature.input_ids.contains(&pad));
}

#[test]
fn entity_mask_collapses_mentions_to_type_placeholders() {
    let mut wrapped = builder(MarkingScheme::EntityMarkerPunct, 512);
    let wrapped = wrapped.build_one(&bill_gates("org:founded_by")).unwrap();

    let mut masked = builder(MarkingScheme::EntityMask, 512);
    let feature = masked.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = masked.tokenizer();

    let expected = ids(
        tokenizer,
        &["[CLS]", "[SUBJ-PERSON]", "found", "##ed", "[OBJ-ORG]", "[SEP]"],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 4);
    assert_eq!(feature.entity_mask, vec![0; 6]);
    assert!(feature.input_ids.len() < wrapped.input_ids.len());

    let registered: Vec<&str> = masked.registry().iter().collect();
    assert_eq!(registered, vec!["[SUBJ-PERSON]", "[OBJ-ORG]"]);
}

#[test]
fn typed_entity_marker_uses_role_and_type() {
    let mut builder = builder(MarkingScheme::TypedEntityMarker, 512);
    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = builder.tokenizer();

    let expected = ids(
        tokenizer,
        &[
            "[CLS]",
            "[SUBJ-PERSON]",
            "Bill",
            "Gates",
            "[/SUBJ-PERSON]",
            "found",
            "##ed",
            "[OBJ-ORG]",
            "Micro",
            "##soft",
            "[/OBJ-ORG]",
            "[SEP]",
        ],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 7);
    assert_eq!(builder.registry().len(), 4);
}

#[test]
fn typed_entity_marker_punct_splices_type_subwords() {
    let mut builder = builder(MarkingScheme::TypedEntityMarkerPunct, 512);
    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = builder.tokenizer();

    let expected = ids(
        tokenizer,
        &[
            "[CLS]", "@", "*", "person", "*", "Bill", "Gates", "@", "found", "##ed", "#", "^",
            "org", "^", "Micro", "##soft", "#", "[SEP]",
        ],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 10);
    // Only the first subword of a start token is forced to 0.
    assert_eq!(
        feature.entity_mask,
        vec![0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0]
    );
    assert!(builder.registry().is_empty());
}

#[test]
fn entity_single_token_keeps_only_first_mention_token() {
    let mut builder = builder(MarkingScheme::EntitySingleToken, 512);
    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = builder.tokenizer();

    let expected = ids(
        tokenizer,
        &["[CLS]", "@", "Bill", "@", "found", "##ed", "#", "Micro", "#", "[SEP]"],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.subject_position, 1);
    assert_eq!(feature.object_position, 6);
    assert_eq!(feature.entity_mask, vec![0, 0, 1, 1, 0, 0, 0, 1, 0, 0]);
}

#[test]
fn unknown_label_excludes_only_that_example() {
    let mut builder = builder(MarkingScheme::EntityMarker, 512);
    let examples = vec![
        bill_gates("org:founded_by"),
        bill_gates("org:invented_by"),
        longer_sentence(),
    ];

    let report = builder.build(&examples).unwrap();
    assert_eq!(report.features.len(), 2);
    assert_eq!(report.features[0].label, 25);
    assert_eq!(report.features[1].label, 8);

    assert_eq!(report.skipped.len(), 1);
    let skipped = &report.skipped[0];
    assert_eq!(skipped.index, 1);
    assert_eq!(skipped.id.as_deref(), Some("bill-gates"));
    assert!(matches!(&skipped.error, RelmarkError::UnknownLabel { label } if label == "org:invented_by"));
}

#[test]
fn truncation_cuts_trailing_subwords() {
    // 7 subwords survive: @ Bill Gates @ found ##ed #
    let mut builder = builder(MarkingScheme::EntityMarkerPunct, 9);
    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    let tokenizer = builder.tokenizer();

    let expected = ids(
        tokenizer,
        &["[CLS]", "@", "Bill", "Gates", "@", "found", "##ed", "#", "[SEP]"],
    );
    assert_eq!(feature.input_ids, expected);
    assert_eq!(feature.entity_mask, vec![0, 0, 1, 1, 0, 0, 0, 0, 0]);
    assert_eq!(feature.object_position, 7);
}

#[test]
fn entity_after_cut_is_rejected_by_default() {
    let mut builder = builder(MarkingScheme::EntityMarkerPunct, 8);
    let report = builder
        .build(&[bill_gates("org:founded_by"), longer_sentence()])
        .unwrap();

    assert!(report.features.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|s| matches!(s.error, RelmarkError::EntityTruncated { .. })));
}

#[test]
fn entity_after_cut_is_kept_when_configured() {
    let config = BuilderConfig::new()
        .with_scheme(MarkingScheme::EntityMarkerPunct)
        .with_max_length(8)
        .with_truncation(TruncationPolicy::Keep);
    let mut builder = FeatureBuilder::new(tokenizer(), LabelVocabulary::tacred(), &config).unwrap();

    let feature = builder.build_one(&bill_gates("org:founded_by")).unwrap();
    assert_eq!(feature.input_ids.len(), 8);
    assert_eq!(feature.entity_mask.len(), 8);
    assert_eq!(feature.subject_position, 1);
    // The object marker was cut away; its position is reported unchecked.
    assert_eq!(feature.object_position, 7);
    assert_eq!(
        feature.input_ids[7],
        builder.tokenizer().token_to_id("[SEP]").unwrap()
    );
}

#[test]
fn invalid_scheme_name_is_a_configuration_error() {
    let err = "entity_highlight".parse::<MarkingScheme>().unwrap_err();
    assert!(matches!(err, RelmarkError::InvalidScheme(_)));
    assert!(!err.is_per_example());
}
