use super::catalog::Catalog;
use super::models::{Answer, AnswerRecord, QuestionKey, ReviewLine};
use crate::models::ResourceSnapshot;

/// Display strings for the fixed answer tokens.
const ANSWER_LABELS: &[(&str, &str)] = &[
    ("remote_access", "Remote access"),
    ("internet_gateway", "Internet gateway"),
    ("connect_to_site", "Connect to a site"),
    ("specific_machines", "Specific machines"),
    ("entire_network", "The entire network"),
    ("our_rac", "Remote Access Client (RAC)"),
    ("vpn_config", "VPN config file"),
    ("router", "Through a router"),
    ("route_via_netclient", "Route via a netclient host"),
];

pub fn answer_label(token: &str) -> Option<&'static str> {
    ANSWER_LABELS.iter().find(|(t, _)| *t == token).map(|(_, label)| *label)
}

/// Best display name for a stored value: resource names for ids, fixed labels
/// for tokens, and the raw value when nothing matches.
fn display_value(key: QuestionKey, value: &str, snapshot: &ResourceSnapshot) -> String {
    match key {
        QuestionKey::Networks => snapshot
            .network(value)
            .map(|n| n.net_id.clone())
            .unwrap_or_else(|| value.to_string()),
        QuestionKey::RemoteAccessGateways
        | QuestionKey::Egress
        | QuestionKey::InternetGateway
        | QuestionKey::Router
        | QuestionKey::Hosts => snapshot
            .node(value)
            .map(|n| n.display_name().to_string())
            .unwrap_or_else(|| value.to_string()),
        QuestionKey::GatewayUsers => snapshot
            .user(value)
            .map(|u| u.user_name.clone())
            .unwrap_or_else(|| value.to_string()),
        _ => answer_label(value).map(str::to_string).unwrap_or_else(|| value.to_string()),
    }
}

fn display_answer(key: QuestionKey, answer: &Answer, snapshot: &ResourceSnapshot) -> String {
    answer
        .to_list()
        .iter()
        .map(|v| display_value(key, v, snapshot))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Second answers hold node ids for internet gateways and plain ranges for routers.
fn display_answer2(key: QuestionKey, answer: &Answer, snapshot: &ResourceSnapshot) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    let key = match key {
        QuestionKey::InternetGateway => QuestionKey::Hosts,
        _ => QuestionKey::Ranges,
    };
    Some(display_answer(key, answer, snapshot))
}

/// Read-only transcript of the answer log, ordered by question index.
/// The review question's own entry is left out.
pub fn compile_review(records: &[AnswerRecord], catalog: &Catalog, snapshot: &ResourceSnapshot) -> Vec<ReviewLine> {
    let mut lines: Vec<ReviewLine> = records
        .iter()
        .filter(|r| r.question_key != QuestionKey::Review)
        .map(|r| ReviewLine {
            index: r.index,
            question_key: r.question_key,
            prompt: catalog
                .question(r.question_key)
                .map(|q| q.prompt.clone())
                .unwrap_or_else(|| r.question_key.to_string()),
            answer: display_answer(r.question_key, &r.answer, snapshot),
            answer2: display_answer2(r.question_key, &r.answer2, snapshot),
        })
        .collect();
    lines.sort_by_key(|l| l.index);
    lines
}
