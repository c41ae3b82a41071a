use std::sync::Arc;

use super::catalog::Catalog;
use super::effects::{side_effect_for, EffectScope, RemoteMirror, Selection, SideEffectOutcome};
use super::error::WizardError;
use super::models::{
    Answer, AnswerRecord, Choice, Question, QuestionKey, QuestionType, QuestionView, ReviewLine, TourType, WizardView,
};
use super::paths::{is_pivot, resolve_path, PathId};
use super::review::{answer_label, compile_review};
use crate::api::NetworkApi;
use crate::models::ResourceSnapshot;
use crate::services::answer_store::AnswerStore;

/// Result of a successful [`WizardSession::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Moved { index: usize },
    /// The last question was passed; answers were saved and the session reset.
    Completed {
        network_id: String,
        tour_type: Option<TourType>,
        answers: Vec<AnswerRecord>,
    },
}

/// State of one run through the quick-setup wizard.
pub struct WizardSession {
    catalog: Arc<Catalog>,
    snapshot: ResourceSnapshot,
    preset_network: Option<String>,
    path: PathId,
    sequence: Vec<Question>,
    index: usize,
    log: Vec<AnswerRecord>,
    selection: Selection,
    mirror: RemoteMirror,
    tour_type: Option<TourType>,
}

impl WizardSession {
    /// Start a session. With `network_id` the wizard works against that
    /// network and pre-answers the network question.
    pub fn new(catalog: Arc<Catalog>, snapshot: ResourceSnapshot, network_id: Option<String>) -> Self {
        let preset_network = network_id.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let sequence = catalog.sequence(PathId::Start);
        let mut session = Self {
            catalog,
            snapshot,
            preset_network,
            path: PathId::Start,
            sequence,
            index: 0,
            log: Vec::new(),
            selection: Selection::default(),
            mirror: RemoteMirror::default(),
            tour_type: None,
        };
        session.reset();
        session
    }

    pub fn path(&self) -> PathId {
        self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sequence(&self) -> &[Question] {
        &self.sequence
    }

    pub fn sequence_keys(&self) -> Vec<QuestionKey> {
        self.sequence.iter().map(|q| q.key).collect()
    }

    pub fn current_question(&self) -> &Question {
        &self.sequence[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.sequence.len()
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.log
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mirror(&self) -> &RemoteMirror {
        &self.mirror
    }

    pub fn tour_type(&self) -> Option<TourType> {
        self.tour_type
    }

    pub fn snapshot(&self) -> &ResourceSnapshot {
        &self.snapshot
    }

    /// Swap in freshly loaded resources; the caller refreshes between steps.
    pub fn refresh_snapshot(&mut self, snapshot: ResourceSnapshot) {
        self.snapshot = snapshot;
    }

    /// Record an answer for the current question, replacing any earlier one.
    /// Changing the answer to a pivot question may switch the active path.
    pub fn record_answer(&mut self, value: impl Into<Answer>, is_second: bool) {
        let value = value.into();
        let key = self.current_question().key;
        let prior = self
            .log
            .iter()
            .position(|r| r.question_key == key)
            .map(|i| self.log.remove(i));
        let unchanged = !is_second && prior.as_ref().is_some_and(|p| p.answer == value);

        let record = if is_second {
            let first = prior
                .map(|p| p.answer)
                .unwrap_or_else(|| self.current_question().selected_answer.clone());
            AnswerRecord {
                index: self.index,
                question_key: key,
                answer: first,
                answer2: value.clone(),
            }
        } else {
            AnswerRecord {
                index: self.index,
                question_key: key,
                answer: value.clone(),
                answer2: Answer::default(),
            }
        };
        self.log.push(record);
        if key == QuestionKey::Ranges {
            self.selection.ranges_node = self.selection.egress_id.clone();
        }

        let current = &mut self.sequence[self.index];
        if is_second {
            current.selected_answer2 = value;
        } else {
            current.selected_answer = value;
            current.selected_answer2 = Answer::default();
        }

        if !is_second && !unchanged {
            self.follow_pivot();
        }
    }

    /// Re-select the path from the current question's answer when it is a pivot.
    fn follow_pivot(&mut self) {
        let question = self.current_question();
        if !is_pivot(question.key) {
            return;
        }
        let answer = question.selected_answer.as_text().unwrap_or_default();
        if let Some(next) = resolve_path(self.path, question.key, answer) {
            if next != self.path {
                self.switch_path(next);
            }
        }
    }

    fn switch_path(&mut self, next: PathId) {
        let mut sequence = self.catalog.sequence(next);
        // Pivot keys sit at the same index on both paths (checked by the catalog)
        if let Some(slot) = sequence.get_mut(self.index) {
            let current = &self.sequence[self.index];
            slot.selected_answer = current.selected_answer.clone();
            slot.selected_answer2 = current.selected_answer2.clone();
        }
        tracing::info!(from = self.path.as_str(), to = next.as_str(), "Wizard path changed");
        self.sequence = sequence;
        self.path = next;
        self.tour_type = next.tour_type();
    }

    /// Validate the current answer, run its side effects and move on.
    ///
    /// On error nothing about the navigation state changes, so the operator can
    /// correct the answer and try again.
    pub async fn advance<A: NetworkApi, S: AnswerStore>(
        &mut self,
        api: &A,
        store: &S,
    ) -> Result<AdvanceOutcome, WizardError> {
        let question = self.current_question().clone();
        if question.is_unanswered() {
            tracing::warn!(question = %question.key, "Advance blocked: question unanswered");
            return Err(WizardError::Unanswered);
        }

        if let Some(effect) = side_effect_for(question.key) {
            let mut selection = self.selection.clone();
            let mut scope = EffectScope {
                question: &question,
                path: self.path,
                snapshot: &self.snapshot,
                log: &self.log,
                selection: &mut selection,
                mirror: &mut self.mirror,
            };
            let outcome = match effect.run(&mut scope, api).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(question = %question.key, error = %e, "Advance failed");
                    return Err(e);
                }
            };
            self.selection = selection;
            self.apply_outcome(outcome);
        }

        if self.is_last() {
            return self.complete(store).await;
        }

        self.index += 1;
        self.seed_current();
        // A restored pivot answer may lead somewhere else after an earlier change
        self.follow_pivot();
        tracing::debug!(index = self.index, question = %self.current_question().key, "Wizard advanced");
        Ok(AdvanceOutcome::Moved { index: self.index })
    }

    /// Step back one question. Never touches the server.
    pub fn retreat(&mut self) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.seed_current();
    }

    /// Abandon the session without saving anything.
    pub fn cancel(&mut self) {
        tracing::info!(path = self.path.as_str(), "Wizard cancelled");
        self.reset();
    }

    /// Transcript of the answers on the active path.
    pub fn review(&self) -> Vec<ReviewLine> {
        compile_review(&self.active_answers(), &self.catalog, &self.snapshot)
    }

    /// Choices for the first answer of the current question.
    pub fn choices(&self) -> Vec<Choice> {
        let question = self.current_question();
        match question.key {
            QuestionKey::Networks => self
                .snapshot
                .networks
                .iter()
                .map(|n| Choice {
                    value: n.net_id.clone(),
                    label: n.net_id.clone(),
                })
                .collect(),
            QuestionKey::RemoteAccessGateways
            | QuestionKey::Egress
            | QuestionKey::InternetGateway
            | QuestionKey::Router
            | QuestionKey::Hosts => self.node_choices(None),
            QuestionKey::GatewayUsers => self
                .snapshot
                .users
                .iter()
                .map(|u| Choice {
                    value: u.user_name.clone(),
                    label: u.user_name.clone(),
                })
                .collect(),
            _ if question.kind == QuestionType::Radio => question
                .answers
                .iter()
                .map(|a| Choice {
                    value: a.clone(),
                    label: answer_label(a).unwrap_or(a.as_str()).to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Choices for the second answer; only internet gateway members are picked
    /// from a list, router ranges are typed in.
    pub fn choices2(&self) -> Vec<Choice> {
        let question = self.current_question();
        match question.key {
            QuestionKey::InternetGateway => self.node_choices(question.selected_answer.as_text()),
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> WizardView {
        let question = self.current_question();
        WizardView {
            path: self.path.as_str(),
            index: self.index,
            total: self.sequence.len(),
            question: QuestionView {
                key: question.key,
                kind: question.kind,
                prompt: question.prompt.clone(),
                description: question.description.clone(),
                choices: self.choices(),
                choices2: self.choices2(),
                selected_answer: question.selected_answer.clone(),
                selected_answer2: question.selected_answer2.clone(),
            },
            tour_type: self.tour_type,
        }
    }

    fn node_choices(&self, exclude: Option<&str>) -> Vec<Choice> {
        let Some(network) = self.selection.network_id.as_deref().or(self.preset_network.as_deref()) else {
            return Vec::new();
        };
        self.snapshot
            .nodes_in(network)
            .filter(|n| Some(n.id.as_str()) != exclude)
            .map(|n| Choice {
                value: n.id.clone(),
                label: n.display_name().to_string(),
            })
            .collect()
    }

    fn apply_outcome(&mut self, outcome: SideEffectOutcome) {
        match outcome {
            SideEffectOutcome::ClearRanges => {
                self.log.retain(|r| r.question_key != QuestionKey::Ranges);
            }
            SideEffectOutcome::PrefillRanges(ranges) => {
                let index = self
                    .sequence
                    .iter()
                    .position(|q| q.key == QuestionKey::Ranges)
                    .unwrap_or(self.index + 1);
                self.log.retain(|r| r.question_key != QuestionKey::Ranges);
                self.log.push(AnswerRecord {
                    index,
                    question_key: QuestionKey::Ranges,
                    answer: Answer::List(ranges),
                    answer2: Answer::default(),
                });
            }
            SideEffectOutcome::Recorded | SideEffectOutcome::Applied { .. } => {}
        }
    }

    /// Restore the current question's answers from the log. A preset network
    /// answers the network question and is logged like any other answer.
    fn seed_current(&mut self) {
        let index = self.index;
        let key = self.current_question().key;
        let record = self.log.iter().find(|r| r.question_key == key).cloned();
        let current = &mut self.sequence[index];
        match record {
            Some(r) => {
                current.selected_answer = r.answer;
                current.selected_answer2 = r.answer2;
            }
            None => {
                current.clear_answers();
                if let (QuestionKey::Networks, Some(net)) = (key, self.preset_network.clone()) {
                    current.selected_answer = Answer::Text(net.clone());
                    self.log.push(AnswerRecord {
                        index,
                        question_key: key,
                        answer: Answer::Text(net),
                        answer2: Answer::default(),
                    });
                }
            }
        }
    }

    /// Log entries for keys on the active path, in question order, without review.
    fn active_answers(&self) -> Vec<AnswerRecord> {
        let keys = self.path.keys();
        let mut records: Vec<AnswerRecord> = self
            .log
            .iter()
            .filter(|r| r.question_key != QuestionKey::Review && keys.contains(&r.question_key))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.index);
        records
    }

    async fn complete<S: AnswerStore>(&mut self, store: &S) -> Result<AdvanceOutcome, WizardError> {
        let network_id = self
            .selection
            .network_id
            .clone()
            .or_else(|| self.preset_network.clone())
            .ok_or(WizardError::MissingNetwork)?;
        let answers = self.active_answers();
        store.persist(&network_id, &answers).await?;
        let tour_type = self.tour_type;
        tracing::info!(network = %network_id, path = self.path.as_str(), answers = answers.len(), "Quick setup completed");
        self.reset();
        Ok(AdvanceOutcome::Completed {
            network_id,
            tour_type,
            answers,
        })
    }

    fn reset(&mut self) {
        self.path = PathId::Start;
        self.sequence = self.catalog.sequence(PathId::Start);
        self.index = 0;
        self.log.clear();
        self.selection = Selection {
            network_id: self.preset_network.clone(),
            ..Selection::default()
        };
        self.mirror = RemoteMirror::default();
        self.tour_type = None;
    }
}
