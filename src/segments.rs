//! Segments
//!
//! Every "is this a store or a restaurant" decision in the crate goes through
//! these two enums; nothing compares segment strings directly.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown segment name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown segment: {0}")]
pub struct UnknownSegment(pub String);

/// Customer segment that buys from the catalog and owns pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Retail store buyer, priced through payment-term tables.
    Loja,

    /// Restaurant buyer, always priced at base price.
    Restaurante,
}

impl Segment {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Segment::Loja => "Loja",
            Segment::Restaurante => "Restaurante",
        }
    }

    /// Wire name (`loja` / `restaurante`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Loja => "loja",
            Segment::Restaurante => "restaurante",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = UnknownSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loja" => Ok(Segment::Loja),
            "restaurante" => Ok(Segment::Restaurante),
            other => Err(UnknownSegment(other.to_string())),
        }
    }
}

/// Segment attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserSegment {
    /// Catalog manager; never buys.
    Admin,

    /// Retail store buyer.
    Loja,

    /// Restaurant buyer.
    Restaurante,
}

impl UserSegment {
    /// The buying segment for this user, if any.
    #[must_use]
    pub fn buyer(self) -> Option<Segment> {
        match self {
            UserSegment::Admin => None,
            UserSegment::Loja => Some(Segment::Loja),
            UserSegment::Restaurante => Some(Segment::Restaurante),
        }
    }

    /// Whether this user may act within the given segment's area.
    ///
    /// Admins may act as any segment; buyers only as their own.
    #[must_use]
    pub fn can_act_as(self, segment: Segment) -> bool {
        match self {
            UserSegment::Admin => true,
            UserSegment::Loja | UserSegment::Restaurante => self.buyer() == Some(segment),
        }
    }

    /// Whether this user may manage the catalog.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, UserSegment::Admin)
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UserSegment::Admin => "Administrador",
            UserSegment::Loja => Segment::Loja.label(),
            UserSegment::Restaurante => Segment::Restaurante.label(),
        }
    }
}

impl From<Segment> for UserSegment {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Loja => UserSegment::Loja,
            Segment::Restaurante => UserSegment::Restaurante,
        }
    }
}

impl FromStr for UserSegment {
    type Err = UnknownSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("admin") {
            return Ok(UserSegment::Admin);
        }

        s.parse::<Segment>().map(UserSegment::from)
    }
}
