use serde::{Deserialize, Serialize};
use std::fmt;

/// Every question the quick-setup wizard can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    PrimaryUsecase,
    Usecase,
    Networks,
    RemoteAccessGateways,
    Users,
    GatewayUsers,
    Egress,
    Ranges,
    InternetGateway,
    ConnectToSite,
    Router,
    Hosts,
    Review,
}

impl QuestionKey {
    pub const ALL: [QuestionKey; 13] = [
        QuestionKey::PrimaryUsecase,
        QuestionKey::Usecase,
        QuestionKey::Networks,
        QuestionKey::RemoteAccessGateways,
        QuestionKey::Users,
        QuestionKey::GatewayUsers,
        QuestionKey::Egress,
        QuestionKey::Ranges,
        QuestionKey::InternetGateway,
        QuestionKey::ConnectToSite,
        QuestionKey::Router,
        QuestionKey::Hosts,
        QuestionKey::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKey::PrimaryUsecase => "primary_usecase",
            QuestionKey::Usecase => "usecase",
            QuestionKey::Networks => "networks",
            QuestionKey::RemoteAccessGateways => "remote_access_gateways",
            QuestionKey::Users => "users",
            QuestionKey::GatewayUsers => "gateway_users",
            QuestionKey::Egress => "egress",
            QuestionKey::Ranges => "ranges",
            QuestionKey::InternetGateway => "internet_gateway",
            QuestionKey::ConnectToSite => "connect_to_site",
            QuestionKey::Router => "router",
            QuestionKey::Hosts => "hosts",
            QuestionKey::Review => "review",
        }
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input affordance of a question; decides how "answered" is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Radio,
    Select,
    DoubleSelect,
    Ranges,
    HostSelect,
    Review,
}

/// A recorded answer: a single token/id or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    List(Vec<String>),
}

impl Default for Answer {
    fn default() -> Self {
        Answer::Text(String::new())
    }
}

impl Answer {
    /// Empty string or empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.trim().is_empty(),
            Answer::List(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            Answer::List(v) if v.len() == 1 => Some(v[0].trim()),
            _ => None,
        }
    }

    /// Values as a list; a single text answer becomes a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Answer::Text(s) if s.trim().is_empty() => Vec::new(),
            Answer::Text(s) => vec![s.trim().to_string()],
            Answer::List(v) => v.iter().map(|s| s.trim().to_string()).collect(),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<Vec<String>> for Answer {
    fn from(v: Vec<String>) -> Self {
        Answer::List(v)
    }
}

impl From<Vec<&str>> for Answer {
    fn from(v: Vec<&str>) -> Self {
        Answer::List(v.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub key: QuestionKey,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: String,
    #[serde(default)]
    pub description: String,
    /// Fixed choice tokens for radio questions
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub selected_answer: Answer,
    #[serde(default)]
    pub selected_answer2: Answer,
}

impl Question {
    pub fn new(key: QuestionKey, kind: QuestionType, prompt: &str) -> Self {
        Self {
            key,
            kind,
            prompt: prompt.to_string(),
            description: String::new(),
            answers: Vec::new(),
            selected_answer: Answer::default(),
            selected_answer2: Answer::default(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_answers(mut self, answers: &[&str]) -> Self {
        self.answers = answers.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Double-select questions need both answers; review never blocks.
    pub fn is_unanswered(&self) -> bool {
        match self.kind {
            QuestionType::Review => false,
            QuestionType::DoubleSelect => self.selected_answer.is_empty() || self.selected_answer2.is_empty(),
            _ => self.selected_answer.is_empty(),
        }
    }

    pub fn clear_answers(&mut self) {
        self.selected_answer = Answer::default();
        self.selected_answer2 = Answer::default();
    }
}

/// One entry of the answer log. At most one exists per question key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub index: usize,
    pub question_key: QuestionKey,
    pub answer: Answer,
    #[serde(default)]
    pub answer2: Answer,
}

/// Tag handed to the post-wizard guided tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourType {
    #[serde(rename = "remoteaccess_specificmachines_our_rac")]
    RemoteAccessSpecificMachinesOurRac,
    #[serde(rename = "remoteaccess_specificmachines_vpnconfig")]
    RemoteAccessSpecificMachinesVpnConfig,
    #[serde(rename = "remoteaccess_withegress_our_rac")]
    RemoteAccessWithEgressOurRac,
    #[serde(rename = "remoteaccess_withegress_vpnconfig")]
    RemoteAccessWithEgressVpnConfig,
    #[serde(rename = "internetgateway")]
    InternetGateway,
    #[serde(rename = "connecttosite_router")]
    ConnectToSiteRouter,
    #[serde(rename = "connecttosite_netclient")]
    ConnectToSiteNetclient,
}

impl TourType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourType::RemoteAccessSpecificMachinesOurRac => "remoteaccess_specificmachines_our_rac",
            TourType::RemoteAccessSpecificMachinesVpnConfig => "remoteaccess_specificmachines_vpnconfig",
            TourType::RemoteAccessWithEgressOurRac => "remoteaccess_withegress_our_rac",
            TourType::RemoteAccessWithEgressVpnConfig => "remoteaccess_withegress_vpnconfig",
            TourType::InternetGateway => "internetgateway",
            TourType::ConnectToSiteRouter => "connecttosite_router",
            TourType::ConnectToSiteNetclient => "connecttosite_netclient",
        }
    }
}

/// A selectable option for the current question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// One line of the review transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewLine {
    pub index: usize,
    pub question_key: QuestionKey,
    pub prompt: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub key: QuestionKey,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: String,
    pub description: String,
    pub choices: Vec<Choice>,
    pub choices2: Vec<Choice>,
    pub selected_answer: Answer,
    pub selected_answer2: Answer,
}

/// Serializable picture of a session, as served to front ends.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub path: &'static str,
    pub index: usize,
    pub total: usize,
    pub question: QuestionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_type: Option<TourType>,
}
