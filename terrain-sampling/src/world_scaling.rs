/// World-space extent of the active map and the render scale ratios derived from it
use std::sync::{Arc, PoisonError, RwLock};

use constants::render_settings::{GAME_SIZE_LIMIT, UNCALIBRATED_RATIO};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TerrainError};

/// Extent of a map in kilometres (X east, Y north/south, Z height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldSize {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Reject zero, negative and non-finite spans.
    pub fn validate(self) -> Result<Self> {
        if is_positive_span(self.x) && is_positive_span(self.y) && is_positive_span(self.z) {
            Ok(self)
        } else {
            Err(TerrainError::InvalidWorldSize {
                x: self.x,
                y: self.y,
                z: self.z,
            })
        }
    }
}

impl From<[f64; 3]> for WorldSize {
    fn from(size: [f64; 3]) -> Self {
        Self::new(size[0], size[1], size[2])
    }
}

fn is_positive_span(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Scale ratios between kilometres and game units for one active map.
///
/// The planar ratio fits the map inside the game bounding box while keeping
/// its aspect ratio: the axis that hits its limit first maps onto it exactly.
/// Height has its own ratio so relief can be exaggerated independently.
/// Values are only ever built whole, so the four ratios always agree with
/// `world_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldScaling {
    world_size: WorldSize,
    game_size_limit: [f64; 3],
    world_to_game: f64,
    world_to_game_height: f64,
    game_to_world: f64,
    game_to_world_height: f64,
    calibrated: bool,
}

impl Default for WorldScaling {
    fn default() -> Self {
        Self::uncalibrated_unchecked(GAME_SIZE_LIMIT)
    }
}

impl WorldScaling {
    /// Scaling before any map is selected: all ratios are 1.0.
    pub fn uncalibrated(game_size_limit: [f64; 3]) -> Result<Self> {
        validate_limits(game_size_limit)?;
        Ok(Self::uncalibrated_unchecked(game_size_limit))
    }

    fn uncalibrated_unchecked(game_size_limit: [f64; 3]) -> Self {
        Self {
            world_size: WorldSize::from(game_size_limit),
            game_size_limit,
            world_to_game: UNCALIBRATED_RATIO,
            world_to_game_height: UNCALIBRATED_RATIO,
            game_to_world: UNCALIBRATED_RATIO,
            game_to_world_height: UNCALIBRATED_RATIO,
            calibrated: false,
        }
    }

    /// Derive all ratios for a map of `world_size` km.
    pub fn new(world_size: WorldSize, game_size_limit: [f64; 3]) -> Result<Self> {
        let world_size = world_size.validate()?;
        validate_limits(game_size_limit)?;

        let world_to_game = (game_size_limit[0] / world_size.x).min(game_size_limit[1] / world_size.y);
        let world_to_game_height = game_size_limit[2] / world_size.z;

        Ok(Self {
            world_size,
            game_size_limit,
            world_to_game,
            world_to_game_height,
            game_to_world: 1.0 / world_to_game,
            game_to_world_height: 1.0 / world_to_game_height,
            calibrated: true,
        })
    }

    /// Same game bounding box, new world span.
    pub fn updated(&self, size_x: f64, size_y: f64, size_z: f64) -> Result<Self> {
        Self::new(WorldSize::new(size_x, size_y, size_z), self.game_size_limit)
    }

    pub fn world_size(&self) -> WorldSize {
        self.world_size
    }

    pub fn game_size_limit(&self) -> [f64; 3] {
        self.game_size_limit
    }

    pub fn world_to_game(&self) -> f64 {
        self.world_to_game
    }

    pub fn world_to_game_height(&self) -> f64 {
        self.world_to_game_height
    }

    pub fn game_to_world(&self) -> f64 {
        self.game_to_world
    }

    pub fn game_to_world_height(&self) -> f64 {
        self.game_to_world_height
    }

    /// False until a map's world size has been applied; ratios are placeholders.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Planar kilometres to game units.
    pub fn to_game(&self, world: f64) -> f64 {
        world * self.world_to_game
    }

    /// Planar game units to kilometres.
    pub fn to_world(&self, game: f64) -> f64 {
        game * self.game_to_world
    }

    pub fn height_to_game(&self, world_z: f64) -> f64 {
        world_z * self.world_to_game_height
    }

    pub fn height_to_world(&self, game_z: f64) -> f64 {
        game_z * self.game_to_world_height
    }

    /// Size of the active map in game units.
    pub fn game_extent(&self) -> [f64; 3] {
        [
            self.to_game(self.world_size.x),
            self.to_game(self.world_size.y),
            self.height_to_game(self.world_size.z),
        ]
    }
}

fn validate_limits(limits: [f64; 3]) -> Result<()> {
    if limits.iter().all(|&limit| is_positive_span(limit)) {
        Ok(())
    } else {
        Err(TerrainError::InvalidGameLimit {
            x: limits[0],
            y: limits[1],
            z: limits[2],
        })
    }
}

/// A published scaling together with the number of updates that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingSnapshot {
    pub version: u64,
    pub scaling: WorldScaling,
}

/// Process-wide scaling for hosts that share it across threads.
///
/// Readers take an `Arc` of the current snapshot and keep using it for as long
/// as they like; an update builds the complete replacement first and swaps the
/// pointer under the write lock, so no reader can observe a half-updated set
/// of ratios.
#[derive(Debug, Clone)]
pub struct SharedWorldScaling {
    current: Arc<RwLock<Arc<ScalingSnapshot>>>,
}

impl Default for SharedWorldScaling {
    fn default() -> Self {
        Self::new(WorldScaling::default())
    }
}

impl SharedWorldScaling {
    pub fn new(initial: WorldScaling) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(ScalingSnapshot {
                version: 0,
                scaling: initial,
            }))),
        }
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ScalingSnapshot> {
        // The guarded value is a single pointer, so a poisoned lock still holds a whole snapshot.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn scaling(&self) -> WorldScaling {
        self.snapshot().scaling
    }

    /// Replace the active world span and every derived ratio in one step.
    pub fn update_world_scaling(
        &self,
        size_x: f64,
        size_y: f64,
        size_z: f64,
    ) -> Result<Arc<ScalingSnapshot>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let scaling = current.scaling.updated(size_x, size_y, size_z)?;
        let next = Arc::new(ScalingSnapshot {
            version: current.version + 1,
            scaling,
        });
        *current = Arc::clone(&next);
        drop(current);

        info!(
            version = next.version,
            size_x,
            size_y,
            size_z,
            world_to_game = scaling.world_to_game(),
            world_to_game_height = scaling.world_to_game_height(),
            "world scaling updated"
        );
        Ok(next)
    }
}
