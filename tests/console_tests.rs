mod common;

use std::io::Cursor;

use nmq::console::{Console, ConsoleOutcome};
use nmq::services::MemoryAnswerStore;
use nmq::wizard::TourType;

use common::{mesh, session, session_for, Call, MockApi};

fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    yansi::disable();
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).without_spinner()
}

#[tokio::test]
async fn test_console_runs_internet_gateway_setup() {
    let api = MockApi::new(mesh());
    let store = MemoryAnswerStore::new();
    let mut s = session_for("home");

    // usecase by value, keep the preset network, gateway then members by number, confirm review
    let mut c = console("internet_gateway\n\nlaptop\n1\n\n");
    let outcome = c.run(&mut s, &api, &store).await.unwrap();

    match outcome {
        ConsoleOutcome::Completed {
            network_id, tour_type, ..
        } => {
            assert_eq!(network_id, "home");
            assert_eq!(tour_type, Some(TourType::InternetGateway));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    // Member choices leave out the gateway, so "1" is the next node in the list
    assert_eq!(api.mutations(), vec![Call::CreateInternetGateway {
        node: "n1".into(),
        network: "home".into(),
        members: vec!["n2".into()],
    }]);
    assert_eq!(store.persist_count(), 1);

    let out = String::from_utf8(c.into_output()).unwrap();
    assert!(out.contains("Review your choices"));
    assert!(out.contains("Quick setup completed"));
}

#[tokio::test]
async fn test_console_reprompts_after_errors() {
    let api = MockApi::new(mesh());
    let store = MemoryAnswerStore::new();
    let mut s = session();

    // Empty answer, unknown option, then quit
    let mut c = console("\n7\nq\n");
    let outcome = c.run(&mut s, &api, &store).await.unwrap();
    assert_eq!(outcome, ConsoleOutcome::Cancelled);

    let out = String::from_utf8(c.into_output()).unwrap();
    assert!(out.contains("Please select an answer"));
    assert!(out.contains("7 is not one of the listed options"));
    assert_eq!(store.persist_count(), 0);
}

#[tokio::test]
async fn test_console_goes_back_and_cancels_at_end_of_input() {
    let api = MockApi::new(mesh());
    let store = MemoryAnswerStore::new();
    let mut s = session();

    let mut c = console("1\nb\n");
    let outcome = c.run(&mut s, &api, &store).await.unwrap();
    assert_eq!(outcome, ConsoleOutcome::Cancelled);
    assert!(api.mutations().is_empty());
    assert_eq!(s.index(), 0);
    assert!(s.answers().is_empty());
}
