use std::collections::HashSet;

use super::error::CatalogError;
use super::models::{Question, QuestionKey, QuestionType};
use super::paths::{PathId, PIVOT_RULES};

/// Master list of every question, independent of any path.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog and check the path tables against it.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let catalog = Self { questions };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The questions shipped with the console.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard_questions())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, key: QuestionKey) -> Option<&Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    /// Catalog filtered to the path's keys, ordered as the path lists them.
    pub fn sequence(&self, path: PathId) -> Vec<Question> {
        let keys = path.keys();
        let mut sequence: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| keys.contains(&q.key))
            .cloned()
            .collect();
        sequence.sort_by_key(|q| keys.iter().position(|k| *k == q.key));
        sequence
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(q.key) {
                return Err(CatalogError::DuplicateQuestion(q.key));
            }
        }

        for path in PathId::ALL {
            let keys = path.keys();
            if keys.is_empty() {
                return Err(CatalogError::EmptyPath(path));
            }
            let mut in_path = HashSet::new();
            for key in keys {
                if !in_path.insert(*key) {
                    return Err(CatalogError::DuplicateKey { path, key: *key });
                }
                if !seen.contains(key) {
                    return Err(CatalogError::MissingQuestion { path, key: *key });
                }
            }
        }

        for rule in PIVOT_RULES {
            let target = rule.to.position(rule.key);
            let sources: Vec<PathId> = if rule.from.is_empty() {
                PathId::ALL.iter().copied().filter(|p| p.position(rule.key).is_some()).collect()
            } else {
                rule.from.to_vec()
            };
            for from in sources {
                if target.is_none() || from.position(rule.key) != target {
                    return Err(CatalogError::MisalignedPivot {
                        key: rule.key,
                        from,
                        to: rule.to,
                    });
                }
            }
        }
        Ok(())
    }
}

fn standard_questions() -> Vec<Question> {
    use QuestionKey::*;
    vec![
        Question::new(PrimaryUsecase, QuestionType::Radio, "What would you like to set up?")
            .with_description("Pick the scenario that best matches what you want your network to do.")
            .with_answers(&["remote_access", "internet_gateway", "connect_to_site"]),
        Question::new(Usecase, QuestionType::Radio, "What should remote users be able to reach?")
            .with_answers(&["specific_machines", "entire_network"]),
        Question::new(Networks, QuestionType::Select, "Which network should this apply to?"),
        Question::new(RemoteAccessGateways, QuestionType::Select, "Which node should act as the remote access gateway?")
            .with_description("Users connect to the network through this node."),
        Question::new(Users, QuestionType::Radio, "How will users connect?")
            .with_answers(&["our_rac", "vpn_config"]),
        Question::new(GatewayUsers, QuestionType::Select, "Which users may connect through this gateway?"),
        Question::new(Egress, QuestionType::Select, "Which node should route traffic to the outside ranges?"),
        Question::new(Ranges, QuestionType::Ranges, "Which address ranges should be reachable?")
            .with_description("Enter ranges in CIDR notation, e.g. 192.168.1.0/24."),
        Question::new(InternetGateway, QuestionType::DoubleSelect, "Which node is the internet gateway, and which nodes use it?"),
        Question::new(ConnectToSite, QuestionType::Radio, "How is the site connected?")
            .with_answers(&["router", "route_via_netclient"]),
        Question::new(Router, QuestionType::DoubleSelect, "Which gateway does the router connect through, and which ranges sit behind it?"),
        Question::new(Hosts, QuestionType::HostSelect, "Which hosts should reach the site?"),
        Question::new(Review, QuestionType::Review, "Review your choices"),
    ]
}
