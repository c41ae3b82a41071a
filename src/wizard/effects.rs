//! Remote side effects performed when the operator moves past a question.
//!
//! Each question key maps to at most one [`SideEffect`] through
//! [`SIDE_EFFECTS`]. Handlers share one shape: they read the current question
//! and context from an [`EffectScope`], may call the [`NetworkApi`], and
//! report a [`SideEffectOutcome`].

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::error::WizardError;
use super::models::{AnswerRecord, Question, QuestionKey};
use super::paths::PathId;
use crate::api::{EgressRequest, ExternalClientRequest, IngressRequest, InternetGatewayRequest, NetworkApi};
use crate::models::{Network, ResourceSnapshot};
use crate::utils::cidr::Cidr;

/// Resources the operator has picked so far. Only committed when the
/// handler for a step succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub network_id: Option<String>,
    pub ingress_id: Option<String>,
    pub egress_id: Option<String>,
    /// Egress node the recorded ranges belong to
    pub ranges_node: Option<String>,
    pub internet_gateway_id: Option<String>,
    pub router_id: Option<String>,
    pub external_client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterClient {
    pub client_id: String,
    pub ranges: Vec<String>,
}

/// What this session has changed on the server. Updated call by call, so it
/// stays accurate even when a step fails halfway.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemoteMirror {
    pub ingress_nodes: BTreeSet<String>,
    /// Egress gateways created here, with the ranges they were given
    pub egress_nodes: BTreeMap<String, Vec<String>>,
    pub removed_egress: BTreeSet<String>,
    pub internet_gateways: BTreeSet<String>,
    pub external_clients: BTreeMap<String, RouterClient>,
    /// Users attached to `gateway_users_node`
    pub gateway_users: BTreeSet<String>,
    pub gateway_users_node: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffectOutcome {
    /// Only local bookkeeping changed
    Recorded,
    /// Remote calls were issued
    Applied { calls: usize },
    /// The ranges answer no longer applies to the chosen egress node
    ClearRanges,
    /// Start the ranges answer from the node's existing egress ranges
    PrefillRanges(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    ResolveNetwork,
    EnsureRemoteAccessGateway,
    SelectEgress,
    ApplyEgressRanges,
    EnsureInternetGateway,
    ConnectRouter,
    SyncGatewayUsers,
}

pub const SIDE_EFFECTS: &[(QuestionKey, SideEffect)] = &[
    (QuestionKey::Networks, SideEffect::ResolveNetwork),
    (QuestionKey::RemoteAccessGateways, SideEffect::EnsureRemoteAccessGateway),
    (QuestionKey::Egress, SideEffect::SelectEgress),
    (QuestionKey::Ranges, SideEffect::ApplyEgressRanges),
    (QuestionKey::InternetGateway, SideEffect::EnsureInternetGateway),
    (QuestionKey::Router, SideEffect::ConnectRouter),
    (QuestionKey::GatewayUsers, SideEffect::SyncGatewayUsers),
];

pub fn side_effect_for(key: QuestionKey) -> Option<SideEffect> {
    SIDE_EFFECTS.iter().find(|(k, _)| *k == key).map(|(_, e)| *e)
}

pub struct EffectScope<'a> {
    pub question: &'a Question,
    pub path: PathId,
    pub snapshot: &'a ResourceSnapshot,
    pub log: &'a [AnswerRecord],
    pub selection: &'a mut Selection,
    pub mirror: &'a mut RemoteMirror,
}

impl SideEffect {
    pub async fn run<A: NetworkApi>(self, scope: &mut EffectScope<'_>, api: &A) -> Result<SideEffectOutcome, WizardError> {
        match self {
            SideEffect::ResolveNetwork => resolve_network(scope, api).await,
            SideEffect::EnsureRemoteAccessGateway => ensure_remote_access_gateway(scope, api).await,
            SideEffect::SelectEgress => select_egress(scope, api).await,
            SideEffect::ApplyEgressRanges => apply_egress_ranges(scope, api).await,
            SideEffect::EnsureInternetGateway => ensure_internet_gateway(scope, api).await,
            SideEffect::ConnectRouter => connect_router(scope, api).await,
            SideEffect::SyncGatewayUsers => sync_gateway_users(scope, api).await,
        }
    }
}

fn first_answer(question: &Question) -> Result<String, WizardError> {
    question
        .selected_answer
        .as_text()
        .map(str::to_string)
        .ok_or(WizardError::Unanswered)
}

fn network_id(scope: &EffectScope<'_>) -> Result<String, WizardError> {
    scope.selection.network_id.clone().ok_or(WizardError::MissingNetwork)
}

fn is_ingress(scope: &EffectScope<'_>, node_id: &str) -> bool {
    scope.mirror.ingress_nodes.contains(node_id)
        || scope.snapshot.node(node_id).map(|n| n.is_ingress_gateway).unwrap_or(false)
}

fn is_egress(scope: &EffectScope<'_>, node_id: &str) -> bool {
    if scope.mirror.egress_nodes.contains_key(node_id) {
        return true;
    }
    !scope.mirror.removed_egress.contains(node_id)
        && scope.snapshot.node(node_id).map(|n| n.is_egress_gateway).unwrap_or(false)
}

/// Check a list of ranges: non-empty, every entry valid CIDR, none inside the
/// network's own address space.
///
/// ```
/// use nmq::models::Network;
/// use nmq::wizard::effects::validate_ranges;
///
/// let net = Network { net_id: "home".into(), address_range: "10.101.0.0/16".into(), ..Default::default() };
/// assert!(validate_ranges(&["192.168.0.0/24".to_string()], Some(&net)).is_ok());
/// assert!(validate_ranges(&["10.101.4.0/24".to_string()], Some(&net)).is_err());
/// assert!(validate_ranges(&[String::new()], Some(&net)).is_err());
/// ```
pub fn validate_ranges(ranges: &[String], network: Option<&Network>) -> Result<Vec<String>, WizardError> {
    if ranges.is_empty() || ranges.iter().any(|r| r.trim().is_empty()) {
        return Err(WizardError::NoRanges);
    }
    let reserved: Vec<(String, Cidr)> = network
        .map(|n| {
            n.reserved_ranges()
                .into_iter()
                .filter_map(|r| r.parse::<Cidr>().ok().map(|c| (r.to_string(), c)))
                .collect()
        })
        .unwrap_or_default();

    let mut cleaned = Vec::with_capacity(ranges.len());
    for raw in ranges {
        let range = raw.trim();
        let cidr: Cidr = range.parse()?;
        if let Some((text, _)) = reserved.iter().find(|(_, r)| r.overlaps(&cidr)) {
            return Err(WizardError::RangeOverlapsNetwork {
                range: range.to_string(),
                reserved: text.clone(),
            });
        }
        if !cleaned.iter().any(|c: &String| c == range) {
            cleaned.push(range.to_string());
        }
    }
    Ok(cleaned)
}

async fn resolve_network<A: NetworkApi>(scope: &mut EffectScope<'_>, _api: &A) -> Result<SideEffectOutcome, WizardError> {
    let net_id = first_answer(scope.question)?;
    if scope.snapshot.network(&net_id).is_none() {
        return Err(WizardError::UnknownNetwork(net_id));
    }
    tracing::info!(network = %net_id, "Network selected");
    scope.selection.network_id = Some(net_id);
    Ok(SideEffectOutcome::Recorded)
}

async fn ensure_remote_access_gateway<A: NetworkApi>(
    scope: &mut EffectScope<'_>,
    api: &A,
) -> Result<SideEffectOutcome, WizardError> {
    let node_id = first_answer(scope.question)?;
    let network = network_id(scope)?;
    let mut calls = 0;

    if !is_ingress(scope, &node_id) {
        let body = IngressRequest::default();
        api.create_ingress_node(&node_id, &network, &body)
            .await
            .map_err(WizardError::remote("create the remote access gateway"))?;
        calls += 1;
        scope.mirror.ingress_nodes.insert(node_id.clone());
        tracing::info!(node = %node_id, network = %network, "Created remote access gateway");
    }

    let attached = api
        .get_ingress_users(&node_id)
        .await
        .map_err(WizardError::remote("load the gateway's users"))?;
    calls += 1;
    scope.mirror.gateway_users = attached.users.into_iter().map(|u| u.user_name).collect();
    scope.mirror.gateway_users_node = Some(node_id.clone());
    scope.selection.ingress_id = Some(node_id);
    Ok(SideEffectOutcome::Applied { calls })
}

async fn select_egress<A: NetworkApi>(scope: &mut EffectScope<'_>, _api: &A) -> Result<SideEffectOutcome, WizardError> {
    let node_id = first_answer(scope.question)?;
    let ranges_recorded = scope.log.iter().any(|r| r.question_key == QuestionKey::Ranges);

    let existing: Option<Vec<String>> = scope
        .mirror
        .egress_nodes
        .get(&node_id)
        .cloned()
        .or_else(|| {
            scope
                .snapshot
                .node(&node_id)
                .filter(|n| n.is_egress_gateway && !scope.mirror.removed_egress.contains(&n.id))
                .map(|n| n.egress_gateway_ranges.clone())
        })
        .filter(|r| !r.is_empty());

    let outcome = if ranges_recorded && scope.selection.ranges_node.as_deref() == Some(node_id.as_str()) {
        SideEffectOutcome::Recorded
    } else if let Some(ranges) = existing {
        scope.selection.ranges_node = Some(node_id.clone());
        SideEffectOutcome::PrefillRanges(ranges)
    } else {
        scope.selection.ranges_node = None;
        SideEffectOutcome::ClearRanges
    };
    tracing::info!(node = %node_id, "Egress node selected");
    scope.selection.egress_id = Some(node_id);
    Ok(outcome)
}

async fn apply_egress_ranges<A: NetworkApi>(scope: &mut EffectScope<'_>, api: &A) -> Result<SideEffectOutcome, WizardError> {
    let network = network_id(scope)?;
    let node_id = scope
        .selection
        .egress_id
        .clone()
        .ok_or(WizardError::MissingSelection(QuestionKey::Egress))?;
    let ranges = validate_ranges(&scope.question.selected_answer.to_list(), scope.snapshot.network(&network))?;

    if scope.mirror.egress_nodes.get(&node_id) == Some(&ranges) {
        scope.selection.ranges_node = Some(node_id);
        return Ok(SideEffectOutcome::Recorded);
    }

    let mut calls = 0;
    if is_egress(scope, &node_id) {
        api.delete_egress_node(&node_id, &network)
            .await
            .map_err(WizardError::remote("remove the existing egress gateway"))?;
        calls += 1;
        scope.mirror.egress_nodes.remove(&node_id);
        scope.mirror.removed_egress.insert(node_id.clone());
    }

    let body = EgressRequest {
        nat_enabled: if scope.path.nat_enabled() { "yes" } else { "no" }.to_string(),
        ranges: ranges.clone(),
    };
    api.create_egress_node(&node_id, &network, &body)
        .await
        .map_err(WizardError::remote("create the egress gateway"))?;
    calls += 1;
    tracing::info!(node = %node_id, network = %network, nat = %body.nat_enabled, ?ranges, "Created egress gateway");
    scope.mirror.removed_egress.remove(&node_id);
    scope.mirror.egress_nodes.insert(node_id.clone(), ranges);
    scope.selection.ranges_node = Some(node_id);
    Ok(SideEffectOutcome::Applied { calls })
}

async fn ensure_internet_gateway<A: NetworkApi>(
    scope: &mut EffectScope<'_>,
    api: &A,
) -> Result<SideEffectOutcome, WizardError> {
    let node_id = first_answer(scope.question)?;
    let network = network_id(scope)?;
    let members = scope.question.selected_answer2.to_list();
    if members.iter().any(|m| *m == node_id) {
        return Err(WizardError::GatewayInOwnMembers);
    }

    let already = scope.mirror.internet_gateways.contains(&node_id)
        || scope.snapshot.node(&node_id).map(|n| n.is_internet_gateway).unwrap_or(false);
    let mut calls = 0;
    if !already {
        let body = InternetGatewayRequest { member_node_ids: members };
        api.create_internet_gateway(&node_id, &network, &body)
            .await
            .map_err(WizardError::remote("create the internet gateway"))?;
        calls += 1;
        scope.mirror.internet_gateways.insert(node_id.clone());
        tracing::info!(node = %node_id, network = %network, members = body.member_node_ids.len(), "Created internet gateway");
    }
    scope.selection.internet_gateway_id = Some(node_id);
    Ok(if calls == 0 { SideEffectOutcome::Recorded } else { SideEffectOutcome::Applied { calls } })
}

async fn connect_router<A: NetworkApi>(scope: &mut EffectScope<'_>, api: &A) -> Result<SideEffectOutcome, WizardError> {
    let node_id = first_answer(scope.question)?;
    let network = network_id(scope)?;
    let ranges = validate_ranges(&scope.question.selected_answer2.to_list(), scope.snapshot.network(&network))?;
    let mut calls = 0;

    if !is_ingress(scope, &node_id) {
        api.create_ingress_node(&node_id, &network, &IngressRequest::default())
            .await
            .map_err(WizardError::remote("create the remote access gateway"))?;
        calls += 1;
        scope.mirror.ingress_nodes.insert(node_id.clone());
        tracing::info!(node = %node_id, network = %network, "Created remote access gateway for router");
    }

    let reusable = scope
        .mirror
        .external_clients
        .get(&node_id)
        .filter(|c| c.ranges == ranges)
        .map(|c| c.client_id.clone());
    let client_id = match reusable {
        Some(id) => id,
        None => {
            let body = ExternalClientRequest {
                extra_allowed_ips: Some(ranges.clone()),
                ..Default::default()
            };
            let client = api
                .create_external_client(&node_id, &network, &body)
                .await
                .map_err(WizardError::remote("create the router's client config"))?;
            calls += 1;
            tracing::info!(node = %node_id, client = %client.client_id, "Created external client for router");
            scope.mirror.external_clients.insert(
                node_id.clone(),
                RouterClient {
                    client_id: client.client_id.clone(),
                    ranges,
                },
            );
            client.client_id
        }
    };

    scope.selection.router_id = Some(node_id);
    scope.selection.external_client_id = Some(client_id);
    Ok(if calls == 0 { SideEffectOutcome::Recorded } else { SideEffectOutcome::Applied { calls } })
}

async fn sync_gateway_users<A: NetworkApi>(scope: &mut EffectScope<'_>, api: &A) -> Result<SideEffectOutcome, WizardError> {
    let node_id = scope
        .selection
        .ingress_id
        .clone()
        .ok_or(WizardError::MissingSelection(QuestionKey::RemoteAccessGateways))?;

    if scope.mirror.gateway_users_node.as_deref() != Some(node_id.as_str()) {
        let attached = api
            .get_ingress_users(&node_id)
            .await
            .map_err(WizardError::remote("load the gateway's users"))?;
        scope.mirror.gateway_users = attached.users.into_iter().map(|u| u.user_name).collect();
        scope.mirror.gateway_users_node = Some(node_id.clone());
    }

    let mut wanted: Vec<String> = Vec::new();
    for user in scope.question.selected_answer.to_list() {
        if !user.is_empty() && !wanted.contains(&user) {
            wanted.push(user);
        }
    }
    let removals: Vec<String> = scope
        .mirror
        .gateway_users
        .iter()
        .filter(|u| !wanted.contains(*u))
        .cloned()
        .collect();
    let additions: Vec<String> = wanted
        .iter()
        .filter(|u| !scope.mirror.gateway_users.contains(*u))
        .cloned()
        .collect();

    let mut calls = 0;
    for user_name in removals {
        api.remove_user_from_ingress(&user_name, &node_id)
            .await
            .map_err(|source| WizardError::BatchFailed {
                operation: "remove",
                user_name: user_name.clone(),
                source,
            })?;
        calls += 1;
        tracing::info!(user = %user_name, node = %node_id, "Removed user from gateway");
        scope.mirror.gateway_users.remove(&user_name);
    }
    for user_name in additions {
        api.attach_user_to_ingress(&user_name, &node_id)
            .await
            .map_err(|source| WizardError::BatchFailed {
                operation: "attach",
                user_name: user_name.clone(),
                source,
            })?;
        calls += 1;
        tracing::info!(user = %user_name, node = %node_id, "Attached user to gateway");
        scope.mirror.gateway_users.insert(user_name);
    }

    Ok(if calls == 0 { SideEffectOutcome::Recorded } else { SideEffectOutcome::Applied { calls } })
}
