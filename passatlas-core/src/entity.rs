use std::collections::BTreeSet;

use geo::Coord;
use thiserror::Error;

/// Open/closed state of an entity, driven by the seasonal status at the
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The pass or road is currently open.
    Open,
    /// The pass or road is currently closed.
    Closed,
}

impl Status {
    /// Return the status as a lowercase `&str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("unknown status '{s}'")),
        }
    }
}

/// Broad kind of a catalog entity; drives legend-category membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A mountain pass road.
    Pass,
    /// An ordinary road worth driving.
    Road,
    /// A multi-stop tour.
    Tour,
    /// A scenic spot without route character.
    Scenic,
}

impl Kind {
    /// Return the kind as a lowercase `&str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Road => "road",
            Self::Tour => "tour",
            Self::Scenic => "scenic",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "road" => Ok(Self::Road),
            "tour" => Ok(Self::Tour),
            "scenic" => Ok(Self::Scenic),
            _ => Err(format!("unknown kind '{s}'")),
        }
    }
}

/// One of the coarse map-display buckets an entity falls into.
///
/// The bucket is derived from [`Kind`] and [`Status`]: an open pass maps to
/// `Open`, a closed pass to `Closed`, roads to `Route`, tours to `Tour`, and
/// scenic spots to `Poi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendCategory {
    /// Open passes.
    Open,
    /// Closed passes.
    Closed,
    /// Roads.
    Route,
    /// Tours.
    Tour,
    /// Scenic spots.
    Poi,
}

impl LegendCategory {
    /// Return the category as a lowercase `&str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Route => "route",
            Self::Tour => "tour",
            Self::Poi => "poi",
        }
    }
}

impl std::fmt::Display for LegendCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated ordinal difficulty in the inclusive range 1–3.
///
/// # Examples
/// ```
/// use passatlas_core::Level;
///
/// let level = Level::new(2)?;
/// assert_eq!(level.get(), 2);
/// assert!(Level::new(4).is_err());
/// # Ok::<(), passatlas_core::LevelError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

/// Errors returned by [`Level::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The value fell outside the supported 1–3 range.
    #[error("level must be between 1 and 3, got {0}")]
    OutOfRange(u8),
}

impl Level {
    /// Validates and constructs a [`Level`].
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if (1..=3).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError::OutOfRange(value))
        }
    }

    /// Return the ordinal value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geolocated catalog entity: a pass, road, tour, or scenic spot.
///
/// Entities are immutable snapshots fetched from the repository; the engine
/// only ever reads them. Track coordinates are WGS84 with `x = longitude`
/// and `y = latitude`.
///
/// # Examples
/// ```
/// use passatlas_core::{Entity, Kind, LegendCategory, Status};
///
/// let entity = Entity {
///     id: 1,
///     name: "Stelvio".into(),
///     status: Status::Open,
///     kind: Kind::Pass,
///     track: Vec::new(),
///     countries: ["IT".to_owned()].into(),
///     canton: None,
///     region: None,
///     level: None,
///     opens: None,
///     closes: None,
/// };
/// assert_eq!(entity.legend_category(), LegendCategory::Open);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Unique identifier, stable across sessions.
    pub id: u64,
    /// Display name; the primary search key.
    pub name: String,
    /// Current open/closed status.
    pub status: Status,
    /// Broad entity kind.
    pub kind: Kind,
    /// Route geometry; empty for entities without one.
    pub track: Vec<Coord<f64>>,
    /// ISO 3166-1 alpha-2 codes of the countries the entity crosses.
    pub countries: BTreeSet<String>,
    /// Swiss canton, when known.
    pub canton: Option<String>,
    /// Broader region, when known.
    pub region: Option<String>,
    /// Ordinal difficulty, when rated.
    pub level: Option<Level>,
    /// Seasonal opening date, carried verbatim for display.
    pub opens: Option<String>,
    /// Seasonal closing date, carried verbatim for display.
    pub closes: Option<String>,
}

impl Entity {
    /// Return the legend bucket this entity is displayed under.
    pub fn legend_category(&self) -> LegendCategory {
        match (self.kind, self.status) {
            (Kind::Pass, Status::Open) => LegendCategory::Open,
            (Kind::Pass, Status::Closed) => LegendCategory::Closed,
            (Kind::Road, _) => LegendCategory::Route,
            (Kind::Tour, _) => LegendCategory::Tour,
            (Kind::Scenic, _) => LegendCategory::Poi,
        }
    }
}

/// Normalize a comma-delimited country string into a set of ISO codes.
///
/// Tokens are trimmed and upper-cased; anything that is not exactly two
/// ASCII letters is dropped.
///
/// # Examples
/// ```
/// use passatlas_core::parse_countries;
///
/// let set = parse_countries("ch, it ,x, Switzerland");
/// assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["CH", "IT"]);
/// ```
pub fn parse_countries(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|token| token.trim().to_ascii_uppercase())
        .filter(|code| code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()))
        .collect()
}
