use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CidrError {
    #[error("'{0}' is missing a /prefix")]
    MissingPrefix(String),
    #[error("'{range}' is not a valid range: {reason}")]
    Invalid { range: String, reason: String },
}

/// An IPv4 or IPv6 range in `address/prefix` notation. The prefix is
/// required; a bare address is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr(IpNetwork);

impl Cidr {
    pub fn addr(&self) -> IpAddr {
        self.0.ip()
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    pub fn network(&self) -> IpNetwork {
        self.0
    }

    /// Two ranges overlap when either one contains the other's network address.
    ///
    /// ```
    /// use nmq::utils::cidr::Cidr;
    /// let a: Cidr = "10.0.0.0/8".parse().unwrap();
    /// let b: Cidr = "10.20.0.0/16".parse().unwrap();
    /// let c: Cidr = "192.168.1.0/24".parse().unwrap();
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.0.contains(other.0.network()) || other.0.contains(self.0.network())
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        if !s.contains('/') {
            return Err(CidrError::MissingPrefix(s.to_string()));
        }
        s.parse::<IpNetwork>().map(Cidr).map_err(|e| CidrError::Invalid {
            range: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
