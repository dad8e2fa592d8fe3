mod common;

use std::path::Path;

use common::TestWorkspace;
use csv_semantics::{
    classify::{Classifier, ClassifierOptions, DEFAULT_THRESHOLD, classify_sample},
    io_utils,
    reference::ReferenceData,
    scoring::{SemanticType, score_company, score_country, score_date, score_phone},
    table::Table,
};
use encoding_rs::UTF_8;
use proptest::prelude::*;

fn read_contacts(workspace: &TestWorkspace) -> Table {
    let path = workspace.write("contacts.csv", &common::contacts_csv());
    let delimiter = io_utils::resolve_input_delimiter(&path, None);
    Table::read(&path, delimiter, UTF_8).expect("read contacts")
}

fn label_of(classifier: &Classifier, table: &Table, column: &str, data_dir: &Path) -> SemanticType {
    let values = table.require_column(column).expect("column");
    classifier
        .classify_column(values, data_dir)
        .expect("classify")
        .label
}

#[test]
fn contacts_columns_get_expected_labels() {
    let workspace = TestWorkspace::with_reference_data();
    let table = read_contacts(&workspace);
    let classifier = Classifier::default();
    let dir = workspace.path();

    assert_eq!(label_of(&classifier, &table, "phone", dir), SemanticType::PhoneNumber);
    assert_eq!(label_of(&classifier, &table, "company", dir), SemanticType::CompanyName);
    assert_eq!(label_of(&classifier, &table, "country", dir), SemanticType::Country);
    assert_eq!(label_of(&classifier, &table, "signed_on", dir), SemanticType::Date);
    assert_eq!(label_of(&classifier, &table, "notes", dir), SemanticType::Other);
    assert_eq!(label_of(&classifier, &table, "id", dir), SemanticType::Other);
    assert_eq!(classifier.cache().len(), 1);
}

#[test]
fn missing_reference_data_silences_lookup_scorers() {
    let workspace = TestWorkspace::new();
    let table = read_contacts(&workspace);
    let classifier = Classifier::default();
    let values = table.require_column("country").expect("column");
    let result = classifier
        .classify_column(values, workspace.path())
        .expect("classify");
    assert_eq!(result.scores.country, 0.0);
    assert_eq!(result.scores.company_name, 0.0);
    assert_eq!(result.label, SemanticType::Other);
}

#[test]
fn subsampled_columns_classify_reproducibly() {
    let workspace = TestWorkspace::with_reference_data();
    let mut values = (0..1500)
        .map(|i| format!("+1415555{i:04}"))
        .collect::<Vec<_>>();
    values.extend((0..1500).map(|i| format!("note {i}")));
    let classifier = Classifier::new(ClassifierOptions {
        sample_size: 200,
        seed: 7,
        ..ClassifierOptions::default()
    });
    let first = classifier
        .classify_column(&values, workspace.path())
        .expect("classify");
    let second = classifier
        .classify_column(&values, workspace.path())
        .expect("classify");
    assert_eq!(first, second);
    assert!(first.scores.phone_number > 0.0 && first.scores.phone_number < 1.0);
}

#[test]
fn empty_column_scores_zero_everywhere() {
    let workspace = TestWorkspace::with_reference_data();
    let classifier = Classifier::default();
    let values = vec![String::new(); 10];
    let result = classifier
        .classify_column(&values, workspace.path())
        .expect("classify");
    assert_eq!(result.label, SemanticType::Other);
    assert_eq!(result.scores.other, 1.0);
    for ty in SemanticType::SCORED {
        assert_eq!(result.scores.get(ty), 0.0);
    }
}

fn reference() -> ReferenceData {
    ReferenceData {
        countries: ["france", "germany"].iter().map(|c| c.to_string()).collect(),
        legal_suffixes: vec!["pvt ltd".into(), "gmbh".into(), "ltd".into()],
    }
}

proptest! {
    #[test]
    fn scores_stay_within_unit_interval(values in proptest::collection::vec(".{0,30}", 0..40)) {
        let reference = reference();
        for score in [
            score_phone(&values),
            score_date(&values),
            score_country(&values, &reference.countries),
            score_company(&values, &reference.legal_suffixes),
        ] {
            prop_assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn other_flag_matches_label(values in proptest::collection::vec("[A-Za-z0-9 +]{0,16}", 0..20)) {
        let result = classify_sample(&values, &reference(), DEFAULT_THRESHOLD);
        let expected = if result.label == SemanticType::Other { 1.0 } else { 0.0 };
        prop_assert_eq!(result.scores.other, expected);
        if result.label != SemanticType::Other {
            prop_assert!(result.scores.get(result.label) >= DEFAULT_THRESHOLD);
        }
    }
}
