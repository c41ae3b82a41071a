use nmq::services::{AnswerStore, JsonFileAnswerStore};
use nmq::wizard::{Answer, AnswerRecord, QuestionKey};

fn records() -> Vec<AnswerRecord> {
    vec![
        AnswerRecord {
            index: 0,
            question_key: QuestionKey::PrimaryUsecase,
            answer: Answer::from("internet_gateway"),
            answer2: Answer::default(),
        },
        AnswerRecord {
            index: 2,
            question_key: QuestionKey::InternetGateway,
            answer: Answer::from("n1"),
            answer2: Answer::from(vec!["n2", "n3"]),
        },
    ]
}

#[tokio::test]
async fn test_file_store_round_trips_per_network() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAnswerStore::new(dir.path().join("answers.json"));

    assert!(store.load("home").await.unwrap().is_none());

    store.persist("home", &records()).await.unwrap();
    store.persist("lab", &records()[..1]).await.unwrap();

    let home = store.load("home").await.unwrap().unwrap();
    assert_eq!(home.answers, records());
    let lab = store.load("lab").await.unwrap().unwrap();
    assert_eq!(lab.answers.len(), 1);
}

#[tokio::test]
async fn test_file_store_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.json");
    let store = JsonFileAnswerStore::new(&path);
    store.persist("home", &records()).await.unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &raw["home"];
    assert!(entry["saved_at"].as_str().unwrap().ends_with('Z'));
    assert_eq!(entry["answers"][0]["question_key"], "primary_usecase");
    assert_eq!(entry["answers"][1]["answer2"], serde_json::json!(["n2", "n3"]));
}

#[tokio::test]
async fn test_file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileAnswerStore::new(&path);
    assert!(store.load("home").await.is_err());
    assert!(store.persist("home", &records()).await.is_err());
}
