use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;
use topicena::{
    data::{load_documents, loader::MISSING_TEXT},
    error::PipelineError,
};

fn write_csv(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("reflections.csv");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn missing_text_cells_become_placeholder() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "UserName,Condition,text,Extra\n\
         u1,A,I used a python list,x\n\
         u2,B,,y\n\
         u3,A,NA,z\n\
         u4,B\n\
         u5,A,\" NA \",w\n",
    );
    let records = load_documents(&path).unwrap();
    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "I used a python list",
            MISSING_TEXT,
            MISSING_TEXT,
            MISSING_TEXT,
            " NA "
        ]
    );
    assert_eq!(records[3].condition, "B");
    assert!(records.iter().all(|r| r.topic_id.is_none()));
}

#[test]
fn rows_keep_file_order() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "text,UserName,Condition\nc,zoe,T\na,adam,C\nb,mia,T\n",
    );
    let users: Vec<String> = load_documents(&path)
        .unwrap()
        .into_iter()
        .map(|r| r.user_name)
        .collect();
    assert_eq!(users, vec!["zoe", "adam", "mia"]);
}

#[test]
fn missing_text_column_lists_required_and_found() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "UserName,Condition,reflection\nu1,A,hello\n");
    match load_documents(&path) {
        Err(PipelineError::Schema { required, found }) => {
            assert_eq!(required, vec!["UserName", "Condition", "text"]);
            assert_eq!(found, vec!["UserName", "Condition", "reflection"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn absent_file_is_input_not_found() {
    let dir = tempdir().unwrap();
    let err = load_documents(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, PipelineError::InputNotFound { .. }));
    assert!(err.to_string().contains("nope.csv"));
}
