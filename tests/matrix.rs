use std::fs;

use tempfile::tempdir;
use topicena::{
    data::DocumentRecord,
    error::PipelineError,
    network::{format_network, NetworkMatrix},
    nlp::{TopicAssignment, TopicCatalogue, TopicDescriptor, OUTLIER_TOPIC},
};

fn records(n: usize) -> Vec<DocumentRecord> {
    (0..n)
        .map(|i| {
            let condition = if i % 2 == 0 { "A" } else { "B" };
            DocumentRecord::new(format!("u{}", i + 1), condition, format!("reflection {i}"))
        })
        .collect()
}

fn scenario_a() -> (Vec<DocumentRecord>, TopicAssignment) {
    let mut catalogue = TopicCatalogue::new();
    catalogue.insert(0, TopicDescriptor::new("python_list_data", 2));
    catalogue.insert(OUTLIER_TOPIC, TopicDescriptor::new("-1_the_and_of", 3));
    let assignment = TopicAssignment {
        topic_ids: vec![0, -1, 0, -1, -1],
        catalogue,
    };
    (records(5), assignment)
}

#[test]
fn outlier_column_is_dropped() {
    let (mut docs, assignment) = scenario_a();
    let (_, matrix) = format_network(&mut docs, &assignment).unwrap();

    insta::assert_debug_snapshot!(matrix.column_names(), @r###"
    [
        "UserName",
        "Condition",
        "Topic_0_python_list_data",
    ]
    "###);
    assert_eq!(matrix.topics[0].values, vec![1, 0, 1, 0, 0]);
    assert_eq!(matrix.row_sums(), vec![1, 0, 1, 0, 0]);
    assert_eq!(docs[1].topic_label.as_deref(), Some("Topic_minus_1_the_and_of"));
}

#[test]
fn written_matrix_has_integer_codes_and_no_text() {
    let (mut docs, assignment) = scenario_a();
    let (_, matrix) = format_network(&mut docs, &assignment).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("processed/topic_matrix.csv");
    matrix.write_csv(&path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, vec!["UserName", "Condition", "Topic_0_python_list_data"]);
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], vec!["u1", "A", "1"]);
    assert_eq!(rows[1], vec!["u2", "B", "0"]);
    assert_eq!(rows[4], vec!["u5", "A", "0"]);
}

#[test]
fn one_code_per_clustered_row_and_unused_topics_skipped() {
    let mut catalogue = TopicCatalogue::new();
    for (id, name) in [(-1, "-1_noise"), (0, "0_lists"), (1, "1_loops"), (2, "2_dicts"), (3, "3_unused")] {
        catalogue.insert(id, TopicDescriptor::new(name, 1));
    }
    let assignment = TopicAssignment {
        topic_ids: vec![2, 0, 1, -1, 0, 2],
        catalogue,
    };
    let mut docs = records(6);
    let (_, matrix) = format_network(&mut docs, &assignment).unwrap();

    let labels: Vec<&str> = matrix.topics.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Topic_0_lists", "Topic_1_loops", "Topic_2_dicts"]);
    assert_eq!(matrix.row_sums(), vec![1, 1, 1, 0, 1, 1]);
    assert_eq!(
        matrix.user_names,
        vec!["u1", "u2", "u3", "u4", "u5", "u6"]
    );
}

#[test]
fn uncatalogued_topic_yields_empty_row() {
    let mut catalogue = TopicCatalogue::new();
    catalogue.insert(0, TopicDescriptor::new("0_lists", 1));
    let assignment = TopicAssignment {
        topic_ids: vec![0, 7],
        catalogue,
    };
    let mut docs = records(2);
    let (_, matrix) = format_network(&mut docs, &assignment).unwrap();
    assert_eq!(matrix.row_sums(), vec![1, 0]);
    assert_eq!(docs[1].topic_id, Some(7));
    assert_eq!(docs[1].topic_label, None);
}

#[test]
fn no_outlier_column_is_a_noop() {
    let mut catalogue = TopicCatalogue::new();
    catalogue.insert(0, TopicDescriptor::new("0_lists", 2));
    let assignment = TopicAssignment {
        topic_ids: vec![0, 0],
        catalogue,
    };
    let mut docs = records(2);
    let (labels, matrix) = format_network(&mut docs, &assignment).unwrap();
    assert_eq!(matrix.topics.len(), 1);
    assert_eq!(NetworkMatrix::from_records(&docs, &labels), matrix);
}

#[test]
fn mismatched_assignment_length_is_rejected() {
    let assignment = TopicAssignment {
        topic_ids: vec![0],
        catalogue: TopicCatalogue::new(),
    };
    let mut docs = records(2);
    assert!(matches!(
        format_network(&mut docs, &assignment),
        Err(PipelineError::Clustering(_))
    ));
}

#[test]
fn reformatting_is_byte_identical() {
    let dir = tempdir().unwrap();
    let mut outputs = Vec::new();
    for run in 0..2 {
        let (mut docs, assignment) = scenario_a();
        let (_, matrix) = format_network(&mut docs, &assignment).unwrap();
        let path = dir.path().join(format!("run{run}.csv"));
        matrix.write_csv(&path).unwrap();
        outputs.push(fs::read(&path).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}
