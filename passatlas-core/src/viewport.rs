//! Viewport-fit commands derived from entity geometry.
//!
//! The controller is a one-way command source for the map consumer: it never
//! mutates filter or favorite state, and calling it twice with the same
//! entity yields the same region.

use geo::{Coord, Rect};

use crate::entity::Entity;

/// Fixed zoom level used when recentring on a chosen place candidate.
pub const PLACE_ZOOM: u8 = 14;

/// Pixel padding applied around a fitted bounding region.
pub const FIT_PADDING_PX: u32 = 50;

/// A fire-and-forget command for the map consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Fit the viewport to a bounding region with padding.
    FitBounds {
        /// Minimal region covering the requested geometry.
        bounds: Rect<f64>,
        /// Pixel padding around the region.
        padding_px: u32,
    },
    /// Recentre the viewport on a point at a fixed zoom.
    SetView {
        /// New viewport centre.
        center: Coord<f64>,
        /// Zoom level to apply.
        zoom: u8,
    },
}

/// Issues viewport-fit requests for selected entities, gated by the
/// user-controlled auto-zoom toggle.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use passatlas_core::{MapCommand, PLACE_ZOOM, ViewportController};
///
/// let location = Coord { x: 8.4, y: 46.6 };
/// assert_eq!(
///     ViewportController::focus_place(location),
///     MapCommand::SetView { center: location, zoom: PLACE_ZOOM },
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ViewportController {
    auto_zoom: bool,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self { auto_zoom: true }
    }
}

impl ViewportController {
    /// Create a controller with an explicit auto-zoom setting.
    pub fn new(auto_zoom: bool) -> Self {
        Self { auto_zoom }
    }

    /// Whether auto-zoom is currently enabled.
    pub fn auto_zoom(&self) -> bool {
        self.auto_zoom
    }

    /// Enable or disable auto-zoom.
    pub fn set_auto_zoom(&mut self, enabled: bool) {
        self.auto_zoom = enabled;
    }

    /// Request a fit to the entity's track.
    ///
    /// Returns `None` when auto-zoom is disabled or the entity has no
    /// geometry; otherwise the minimal bounding region over the track with
    /// the standard padding.
    pub fn fit_entity(&self, entity: &Entity) -> Option<MapCommand> {
        if !self.auto_zoom {
            return None;
        }
        track_bounds(&entity.track).map(|bounds| MapCommand::FitBounds {
            bounds,
            padding_px: FIT_PADDING_PX,
        })
    }

    /// Recentre on a place candidate's location at the fixed place zoom.
    ///
    /// Unlike [`Self::fit_entity`], this is not gated by auto-zoom: choosing
    /// a place always moves the map.
    pub fn focus_place(location: Coord<f64>) -> MapCommand {
        MapCommand::SetView {
            center: location,
            zoom: PLACE_ZOOM,
        }
    }
}

/// Minimal axis-aligned bounding region covering a track.
///
/// Non-finite coordinates are skipped; `None` when no finite coordinate
/// remains.
pub fn track_bounds(track: &[Coord<f64>]) -> Option<Rect<f64>> {
    let mut bounds: Option<(Coord<f64>, Coord<f64>)> = None;
    for coord in track {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (*coord, *coord),
            Some((min, max)) => (
                Coord {
                    x: min.x.min(coord.x),
                    y: min.y.min(coord.y),
                },
                Coord {
                    x: max.x.max(coord.x),
                    y: max.y.max(coord.y),
                },
            ),
        });
    }
    bounds.map(|(min, max)| Rect::new(min, max))
}
