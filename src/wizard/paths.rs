//! Branching tables for the quick-setup wizard.
//!
//! Two declarative tables drive sequencing: [`PIVOT_RULES`] maps a pivot
//! answer (given on a particular path) to the next path, and [`PathId::keys`]
//! maps a path to its ordered question keys. Both are checked against the
//! catalog by [`super::catalog::Catalog::new`].

use super::models::{QuestionKey, TourType};
use QuestionKey::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathId {
    Start,
    RemoteAccess,
    RemoteAccessSpecificMachines,
    RemoteAccessWithEgress,
    SpecificMachinesOurRac,
    SpecificMachinesVpnConfig,
    WithEgressOurRac,
    WithEgressVpnConfig,
    InternetGateway,
    ConnectToSite,
    ConnectToSiteRouter,
    ConnectToSiteNetclient,
}

impl PathId {
    pub const ALL: [PathId; 12] = [
        PathId::Start,
        PathId::RemoteAccess,
        PathId::RemoteAccessSpecificMachines,
        PathId::RemoteAccessWithEgress,
        PathId::SpecificMachinesOurRac,
        PathId::SpecificMachinesVpnConfig,
        PathId::WithEgressOurRac,
        PathId::WithEgressVpnConfig,
        PathId::InternetGateway,
        PathId::ConnectToSite,
        PathId::ConnectToSiteRouter,
        PathId::ConnectToSiteNetclient,
    ];

    pub fn keys(&self) -> &'static [QuestionKey] {
        match self {
            PathId::Start => &[PrimaryUsecase],
            PathId::RemoteAccess => &[PrimaryUsecase, Usecase],
            PathId::RemoteAccessSpecificMachines => {
                &[PrimaryUsecase, Usecase, Networks, RemoteAccessGateways, Users]
            }
            PathId::RemoteAccessWithEgress => {
                &[PrimaryUsecase, Usecase, Networks, RemoteAccessGateways, Egress, Ranges, Users]
            }
            PathId::SpecificMachinesOurRac => {
                &[PrimaryUsecase, Usecase, Networks, RemoteAccessGateways, Users, GatewayUsers, Review]
            }
            PathId::SpecificMachinesVpnConfig => {
                &[PrimaryUsecase, Usecase, Networks, RemoteAccessGateways, Users, Review]
            }
            PathId::WithEgressOurRac => &[
                PrimaryUsecase,
                Usecase,
                Networks,
                RemoteAccessGateways,
                Egress,
                Ranges,
                Users,
                GatewayUsers,
                Review,
            ],
            PathId::WithEgressVpnConfig => &[
                PrimaryUsecase,
                Usecase,
                Networks,
                RemoteAccessGateways,
                Egress,
                Ranges,
                Users,
                Review,
            ],
            PathId::InternetGateway => &[PrimaryUsecase, Networks, InternetGateway, Review],
            PathId::ConnectToSite => &[PrimaryUsecase, ConnectToSite],
            PathId::ConnectToSiteRouter => &[PrimaryUsecase, ConnectToSite, Networks, Router, Review],
            PathId::ConnectToSiteNetclient => {
                &[PrimaryUsecase, ConnectToSite, Networks, Egress, Ranges, Hosts, Review]
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathId::Start => "start",
            PathId::RemoteAccess => "remote_access",
            PathId::RemoteAccessSpecificMachines => "remote_access_specific_machines",
            PathId::RemoteAccessWithEgress => "remote_access_with_egress",
            PathId::SpecificMachinesOurRac => "remote_access_specific_machines_our_rac",
            PathId::SpecificMachinesVpnConfig => "remote_access_specific_machines_vpn_config",
            PathId::WithEgressOurRac => "remote_access_with_egress_our_rac",
            PathId::WithEgressVpnConfig => "remote_access_with_egress_vpn_config",
            PathId::InternetGateway => "internet_gateway",
            PathId::ConnectToSite => "connect_to_site",
            PathId::ConnectToSiteRouter => "connect_to_site_router",
            PathId::ConnectToSiteNetclient => "connect_to_site_netclient",
        }
    }

    pub fn tour_type(&self) -> Option<TourType> {
        match self {
            PathId::SpecificMachinesOurRac => Some(TourType::RemoteAccessSpecificMachinesOurRac),
            PathId::SpecificMachinesVpnConfig => Some(TourType::RemoteAccessSpecificMachinesVpnConfig),
            PathId::WithEgressOurRac => Some(TourType::RemoteAccessWithEgressOurRac),
            PathId::WithEgressVpnConfig => Some(TourType::RemoteAccessWithEgressVpnConfig),
            PathId::InternetGateway => Some(TourType::InternetGateway),
            PathId::ConnectToSiteRouter => Some(TourType::ConnectToSiteRouter),
            PathId::ConnectToSiteNetclient => Some(TourType::ConnectToSiteNetclient),
            _ => None,
        }
    }

    /// Egress created on this path keeps NAT off.
    pub fn nat_enabled(&self) -> bool {
        !matches!(self, PathId::ConnectToSiteNetclient)
    }

    pub fn position(&self, key: QuestionKey) -> Option<usize> {
        self.keys().iter().position(|k| *k == key)
    }
}

/// Which answers a rule reacts to.
#[derive(Debug, Clone, Copy)]
pub enum AnswerMatch {
    Exactly(&'static str),
    /// Any non-empty answer not claimed by an earlier rule
    Otherwise,
}

impl AnswerMatch {
    fn matches(&self, answer: &str) -> bool {
        match self {
            AnswerMatch::Exactly(expected) => *expected == answer,
            AnswerMatch::Otherwise => !answer.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PivotRule {
    pub key: QuestionKey,
    pub answer: AnswerMatch,
    /// Paths on which the rule applies; empty means any
    pub from: &'static [PathId],
    pub to: PathId,
}

const REMOTE_ACCESS_FAMILY: &[PathId] = &[
    PathId::RemoteAccess,
    PathId::RemoteAccessSpecificMachines,
    PathId::RemoteAccessWithEgress,
    PathId::SpecificMachinesOurRac,
    PathId::SpecificMachinesVpnConfig,
    PathId::WithEgressOurRac,
    PathId::WithEgressVpnConfig,
];

const SPECIFIC_MACHINES_FAMILY: &[PathId] = &[
    PathId::RemoteAccessSpecificMachines,
    PathId::SpecificMachinesOurRac,
    PathId::SpecificMachinesVpnConfig,
];

const WITH_EGRESS_FAMILY: &[PathId] = &[
    PathId::RemoteAccessWithEgress,
    PathId::WithEgressOurRac,
    PathId::WithEgressVpnConfig,
];

const CONNECT_TO_SITE_FAMILY: &[PathId] = &[
    PathId::ConnectToSite,
    PathId::ConnectToSiteRouter,
    PathId::ConnectToSiteNetclient,
];

/// Rules are tried in order; the first match wins.
pub const PIVOT_RULES: &[PivotRule] = &[
    PivotRule { key: PrimaryUsecase, answer: AnswerMatch::Exactly("remote_access"), from: &[], to: PathId::RemoteAccess },
    PivotRule { key: PrimaryUsecase, answer: AnswerMatch::Exactly("internet_gateway"), from: &[], to: PathId::InternetGateway },
    PivotRule { key: PrimaryUsecase, answer: AnswerMatch::Exactly("connect_to_site"), from: &[], to: PathId::ConnectToSite },
    PivotRule { key: Usecase, answer: AnswerMatch::Exactly("specific_machines"), from: REMOTE_ACCESS_FAMILY, to: PathId::RemoteAccessSpecificMachines },
    PivotRule { key: Usecase, answer: AnswerMatch::Otherwise, from: REMOTE_ACCESS_FAMILY, to: PathId::RemoteAccessWithEgress },
    PivotRule { key: Users, answer: AnswerMatch::Exactly("our_rac"), from: SPECIFIC_MACHINES_FAMILY, to: PathId::SpecificMachinesOurRac },
    PivotRule { key: Users, answer: AnswerMatch::Otherwise, from: SPECIFIC_MACHINES_FAMILY, to: PathId::SpecificMachinesVpnConfig },
    PivotRule { key: Users, answer: AnswerMatch::Exactly("our_rac"), from: WITH_EGRESS_FAMILY, to: PathId::WithEgressOurRac },
    PivotRule { key: Users, answer: AnswerMatch::Otherwise, from: WITH_EGRESS_FAMILY, to: PathId::WithEgressVpnConfig },
    PivotRule { key: ConnectToSite, answer: AnswerMatch::Exactly("router"), from: CONNECT_TO_SITE_FAMILY, to: PathId::ConnectToSiteRouter },
    PivotRule { key: ConnectToSite, answer: AnswerMatch::Exactly("route_via_netclient"), from: CONNECT_TO_SITE_FAMILY, to: PathId::ConnectToSiteNetclient },
];

pub fn is_pivot(key: QuestionKey) -> bool {
    PIVOT_RULES.iter().any(|r| r.key == key)
}

/// Path to follow after `key` is answered with `answer` while on `current`.
///
/// ```
/// use nmq::wizard::paths::{resolve_path, PathId};
/// use nmq::wizard::QuestionKey;
///
/// let next = resolve_path(PathId::RemoteAccess, QuestionKey::Usecase, "entire_network");
/// assert_eq!(next, Some(PathId::RemoteAccessWithEgress));
/// assert_eq!(resolve_path(PathId::Start, QuestionKey::Usecase, "specific_machines"), None);
/// ```
pub fn resolve_path(current: PathId, key: QuestionKey, answer: &str) -> Option<PathId> {
    let answer = answer.trim();
    PIVOT_RULES
        .iter()
        .find(|r| {
            r.key == key
                && (r.from.is_empty() || r.from.contains(&current))
                && r.answer.matches(answer)
        })
        .map(|r| r.to)
}
