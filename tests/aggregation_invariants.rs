use oversight_import::{
    AggregationPolicy, CaseAggregator, ComplaintField, FieldValue, NarrativeComposer,
    NormalizedComplaintRecord, RawComplaintRecord,
};

const FILES: [&str; 3] = ["2021OPA-0100", "2021OPA-0200", "2020OPA-0042"];
const DATES: [&str; 2] = ["2021-05-01", "05/02/2021 12:00:00 AM"];

fn reports(count: usize) -> Vec<NormalizedComplaintRecord> {
    (0..count)
        .map(|i| NormalizedComplaintRecord {
            report: RawComplaintRecord {
                badge_number: Some(format!("{}", 100 + i % 4)),
                file_number: Some(FILES[i % FILES.len()].to_string()),
                occurrence_date: Some(DATES[(i / FILES.len()) % DATES.len()].to_string()),
                precinct: Some(format!("P{}", i % 5)),
                allegation: (i % 3 != 0).then(|| format!("Allegation {i}")),
                disposition: Some("Sustained".to_string()),
                finding: (i % 2 == 0).then(|| "Sustained".to_string()),
                unique_report_id: Some(format!("u-{i}")),
                ..RawComplaintRecord::default()
            },
            internal_id: format!("{}", i % 4),
            display_name: (i % 4 != 3).then(|| format!("Officer {}", i % 4)),
        })
        .collect()
}

#[test]
fn list_fields_match_sub_report_count() {
    let policy = AggregationPolicy::default();
    let input = reports(40);
    let out = CaseAggregator::new(&policy).aggregate(&input).unwrap();
    assert_eq!(out.cases.len(), FILES.len() * DATES.len());
    assert_eq!(
        out.cases.iter().map(|c| c.sub_report_count).sum::<usize>(),
        input.len()
    );
    for case in &out.cases {
        assert!(case.lists_are_aligned());
        for field in policy.list_fields() {
            match case.fields.get(&field) {
                Some(FieldValue::List(values)) => assert_eq!(values.len(), case.sub_report_count),
                other => panic!("{} folded as {other:?}", field.as_str()),
            }
        }
    }
}

#[test]
fn positions_refer_to_the_same_sub_report() {
    let policy = AggregationPolicy::default();
    let input = reports(25);
    let out = CaseAggregator::new(&policy).aggregate(&input).unwrap();
    for case in &out.cases {
        let ids = case.values(ComplaintField::UniqueId);
        let officers = case.values(ComplaintField::OfficerId);
        let allegations = case.values(ComplaintField::Allegation);
        for idx in 0..case.sub_report_count {
            let source = input
                .iter()
                .find(|r| r.report.unique_report_id.as_deref() == ids[idx])
                .unwrap();
            assert_eq!(officers[idx], Some(source.internal_id.as_str()));
            assert_eq!(allegations[idx], source.report.allegation.as_deref());
        }
    }
}

#[test]
fn reaggregating_flattened_cases_is_idempotent() {
    let policy = AggregationPolicy::default();
    let aggregator = CaseAggregator::new(&policy);
    let first = aggregator.aggregate(&reports(30)).unwrap();
    let flattened: Vec<_> = first.cases.iter().flat_map(|case| case.flatten()).collect();
    let second = aggregator.aggregate(&flattened).unwrap();
    assert_eq!(first.cases, second.cases);
}

#[test]
fn narrative_has_one_block_per_sub_report() {
    let policy = AggregationPolicy::default();
    let out = CaseAggregator::new(&policy).aggregate(&reports(17)).unwrap();
    let composer = NarrativeComposer::new("https://example.org/legend");
    for case in &out.cases {
        let narrative = composer.compose(case);
        let blocks = narrative.description.matches("<h4>Allegation ").count();
        assert_eq!(blocks, case.sub_report_count);
        if case.sub_report_count > 1 {
            let last = format!("<h4>Allegation {} ", case.sub_report_count);
            assert!(narrative.description.contains(&last));
        }
        assert_eq!(narrative.description.matches("<i>Legend</i>").count(), 1);
    }
}
