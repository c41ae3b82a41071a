mod common;

use std::collections::HashSet;

use nmq::wizard::paths::{resolve_path, PIVOT_RULES};
use nmq::wizard::{Answer, Catalog, CatalogError, PathId, Question, QuestionKey, QuestionType, TourType};

use common::session;

#[test]
fn test_sequences_follow_path_tables() {
    let catalog = Catalog::standard().unwrap();
    for path in PathId::ALL {
        let keys: Vec<QuestionKey> = catalog.sequence(path).iter().map(|q| q.key).collect();
        assert_eq!(keys, path.keys(), "sequence for {:?}", path);

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "{:?} repeats a question", path);
    }
}

#[test]
fn test_sequence_is_independent_of_catalog_order() {
    let mut questions = Catalog::standard().unwrap().questions().to_vec();
    questions.reverse();
    let reversed = Catalog::new(questions).unwrap();
    let keys: Vec<QuestionKey> = reversed
        .sequence(PathId::WithEgressOurRac)
        .iter()
        .map(|q| q.key)
        .collect();
    assert_eq!(keys, PathId::WithEgressOurRac.keys());
}

#[test]
fn test_catalog_rejects_missing_question() {
    let questions: Vec<Question> = Catalog::standard()
        .unwrap()
        .questions()
        .iter()
        .filter(|q| q.key != QuestionKey::Hosts)
        .cloned()
        .collect();
    let err = Catalog::new(questions).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::MissingQuestion {
            key: QuestionKey::Hosts,
            ..
        }
    ));
}

#[test]
fn test_catalog_rejects_duplicate_question() {
    let mut questions = Catalog::standard().unwrap().questions().to_vec();
    questions.push(Question::new(QuestionKey::Router, QuestionType::DoubleSelect, "Again?"));
    assert_eq!(
        Catalog::new(questions).unwrap_err(),
        CatalogError::DuplicateQuestion(QuestionKey::Router)
    );
}

#[test]
fn test_pivot_keys_keep_their_position() {
    for rule in PIVOT_RULES {
        let target = rule.to.position(rule.key);
        assert!(target.is_some(), "{:?} missing from {:?}", rule.key, rule.to);
        for from in rule.from {
            assert_eq!(from.position(rule.key), target, "{:?}: {:?} -> {:?}", rule.key, from, rule.to);
        }
    }
}

#[test]
fn test_resolve_path_table() {
    use QuestionKey::*;
    let cases = [
        (PathId::Start, PrimaryUsecase, "remote_access", Some(PathId::RemoteAccess)),
        (PathId::Start, PrimaryUsecase, "internet_gateway", Some(PathId::InternetGateway)),
        (PathId::Start, PrimaryUsecase, "connect_to_site", Some(PathId::ConnectToSite)),
        (PathId::WithEgressOurRac, PrimaryUsecase, "connect_to_site", Some(PathId::ConnectToSite)),
        (PathId::RemoteAccess, Usecase, "specific_machines", Some(PathId::RemoteAccessSpecificMachines)),
        (PathId::RemoteAccess, Usecase, "entire_network", Some(PathId::RemoteAccessWithEgress)),
        (PathId::RemoteAccessSpecificMachines, Users, "our_rac", Some(PathId::SpecificMachinesOurRac)),
        (PathId::SpecificMachinesOurRac, Users, "vpn_config", Some(PathId::SpecificMachinesVpnConfig)),
        (PathId::RemoteAccessWithEgress, Users, "our_rac", Some(PathId::WithEgressOurRac)),
        (PathId::WithEgressOurRac, Users, "vpn_config", Some(PathId::WithEgressVpnConfig)),
        (PathId::ConnectToSite, ConnectToSite, "router", Some(PathId::ConnectToSiteRouter)),
        (PathId::ConnectToSiteRouter, ConnectToSite, "route_via_netclient", Some(PathId::ConnectToSiteNetclient)),
        (PathId::ConnectToSite, ConnectToSite, "carrier_pigeon", None),
        (PathId::Start, PrimaryUsecase, "", None),
    ];
    for (current, key, answer, expected) in cases {
        assert_eq!(resolve_path(current, key, answer), expected, "{:?} {:?}={}", current, key, answer);
    }
}

#[test]
fn test_tour_types_for_terminal_paths() {
    assert_eq!(
        PathId::SpecificMachinesOurRac.tour_type(),
        Some(TourType::RemoteAccessSpecificMachinesOurRac)
    );
    assert_eq!(PathId::ConnectToSiteNetclient.tour_type().unwrap().as_str(), "connecttosite_netclient");
    assert_eq!(PathId::RemoteAccess.tour_type(), None);
    assert!(!PathId::ConnectToSiteNetclient.nat_enabled());
    assert!(PathId::WithEgressVpnConfig.nat_enabled());
}

#[test]
fn test_unanswered_semantics() {
    let mut radio = Question::new(QuestionKey::Users, QuestionType::Radio, "How?");
    assert!(radio.is_unanswered());
    radio.selected_answer = Answer::from("   ");
    assert!(radio.is_unanswered());
    radio.selected_answer = Answer::from("our_rac");
    assert!(!radio.is_unanswered());

    let mut list = Question::new(QuestionKey::GatewayUsers, QuestionType::Select, "Who?");
    list.selected_answer = Answer::List(Vec::new());
    assert!(list.is_unanswered());
    list.selected_answer = Answer::from(vec!["alice"]);
    assert!(!list.is_unanswered());

    let mut double = Question::new(QuestionKey::Router, QuestionType::DoubleSelect, "Where?");
    double.selected_answer = Answer::from("gw1");
    assert!(double.is_unanswered());
    double.selected_answer2 = Answer::from(vec!["192.168.0.0/24"]);
    assert!(!double.is_unanswered());

    let review = Question::new(QuestionKey::Review, QuestionType::Review, "Review");
    assert!(!review.is_unanswered());
}

#[test]
fn test_pivot_answer_switches_path_without_moving() {
    let mut s = session();
    assert_eq!(s.path(), PathId::Start);
    assert_eq!(s.sequence_keys(), vec![QuestionKey::PrimaryUsecase]);
    assert!(s.is_last());

    s.record_answer("remote_access", false);
    assert_eq!(s.path(), PathId::RemoteAccess);
    assert_eq!(s.index(), 0);
    assert_eq!(s.current_question().selected_answer, Answer::from("remote_access"));
    assert!(!s.is_last());

    s.record_answer("internet_gateway", false);
    assert_eq!(s.path(), PathId::InternetGateway);
    assert_eq!(s.tour_type(), Some(TourType::InternetGateway));
    assert_eq!(s.sequence_keys(), PathId::InternetGateway.keys());
}

#[test]
fn test_rerecording_replaces_log_entry() {
    let mut s = session();
    s.record_answer("remote_access", false);
    s.record_answer("connect_to_site", false);
    s.record_answer("remote_access", false);

    let records: Vec<_> = s
        .answers()
        .iter()
        .filter(|r| r.question_key == QuestionKey::PrimaryUsecase)
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, Answer::from("remote_access"));
    assert_eq!(records[0].index, 0);
}

