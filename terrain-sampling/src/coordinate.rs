/// Planar coordinates and elevation points in world (km) and game units
use constants::coordinate_system::{from_render_frame, to_render_frame};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::world_scaling::WorldScaling;

/// A 2D map position. Stored in kilometres; game units are derived on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub world_x: f64,
    pub world_y: f64,
}

impl Coordinate {
    pub fn from_world(world_x: f64, world_y: f64) -> Self {
        Self { world_x, world_y }
    }

    pub fn from_game(game_x: f64, game_y: f64, scaling: &WorldScaling) -> Self {
        Self {
            world_x: scaling.to_world(game_x),
            world_y: scaling.to_world(game_y),
        }
    }

    pub fn game_x(&self, scaling: &WorldScaling) -> f64 {
        scaling.to_game(self.world_x)
    }

    pub fn game_y(&self, scaling: &WorldScaling) -> f64 {
        scaling.to_game(self.world_y)
    }

    pub fn set_game_x(&mut self, game_x: f64, scaling: &WorldScaling) {
        self.world_x = scaling.to_world(game_x);
    }

    pub fn set_game_y(&mut self, game_y: f64, scaling: &WorldScaling) {
        self.world_y = scaling.to_world(game_y);
    }

    /// Lift onto the terrain at the given height (km).
    pub fn with_height(self, world_z: f64) -> Point {
        Point::from_world(self.world_x, self.world_y, world_z)
    }
}

impl From<Point> for Coordinate {
    fn from(point: Point) -> Self {
        Self::from_world(point.world_x, point.world_y)
    }
}

/// A terrain point: planar coordinate plus height, all in kilometres.
///
/// Height converts with the scaling's height ratio, not the planar one. In
/// the render frame height is the up axis: render position is
/// `(game_x, game_z, game_y)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub world_x: f64,
    pub world_y: f64,
    pub world_z: f64,
}

impl Point {
    pub fn from_world(world_x: f64, world_y: f64, world_z: f64) -> Self {
        Self {
            world_x,
            world_y,
            world_z,
        }
    }

    pub fn from_game(game_x: f64, game_y: f64, game_z: f64, scaling: &WorldScaling) -> Self {
        Self {
            world_x: scaling.to_world(game_x),
            world_y: scaling.to_world(game_y),
            world_z: scaling.height_to_world(game_z),
        }
    }

    /// Rebuild a point from a render-frame position.
    pub fn from_render(render: [f64; 3], scaling: &WorldScaling) -> Self {
        let (game_x, game_y, game_z) = from_render_frame(render);
        Self::from_game(game_x, game_y, game_z, scaling)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::from(*self)
    }

    pub fn game_x(&self, scaling: &WorldScaling) -> f64 {
        scaling.to_game(self.world_x)
    }

    pub fn game_y(&self, scaling: &WorldScaling) -> f64 {
        scaling.to_game(self.world_y)
    }

    pub fn game_z(&self, scaling: &WorldScaling) -> f64 {
        scaling.height_to_game(self.world_z)
    }

    pub fn set_game_x(&mut self, game_x: f64, scaling: &WorldScaling) {
        self.world_x = scaling.to_world(game_x);
    }

    pub fn set_game_y(&mut self, game_y: f64, scaling: &WorldScaling) {
        self.world_y = scaling.to_world(game_y);
    }

    pub fn set_game_z(&mut self, game_z: f64, scaling: &WorldScaling) {
        self.world_z = scaling.height_to_world(game_z);
    }

    /// Scene placement position `[x, up, depth]` in game units.
    pub fn render_position(&self, scaling: &WorldScaling) -> [f64; 3] {
        to_render_frame(
            self.game_x(scaling),
            self.game_y(scaling),
            self.game_z(scaling),
        )
    }
}

/// A coordinate assembled field by field, e.g. from loosely typed input.
///
/// Unlike [`Coordinate`] and [`Point`], fields may be missing; reading one
/// before it was set is a construction bug and fails with
/// [`TerrainError::UninitializedCoordinate`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoordinateBuilder {
    world_x: Option<f64>,
    world_y: Option<f64>,
    world_z: Option<f64>,
}

impl CoordinateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_world_x(&mut self, world_x: f64) -> &mut Self {
        self.world_x = Some(world_x);
        self
    }

    pub fn set_world_y(&mut self, world_y: f64) -> &mut Self {
        self.world_y = Some(world_y);
        self
    }

    pub fn set_world_z(&mut self, world_z: f64) -> &mut Self {
        self.world_z = Some(world_z);
        self
    }

    pub fn set_game_x(&mut self, game_x: f64, scaling: &WorldScaling) -> &mut Self {
        self.set_world_x(scaling.to_world(game_x))
    }

    pub fn set_game_y(&mut self, game_y: f64, scaling: &WorldScaling) -> &mut Self {
        self.set_world_y(scaling.to_world(game_y))
    }

    pub fn set_game_z(&mut self, game_z: f64, scaling: &WorldScaling) -> &mut Self {
        self.set_world_z(scaling.height_to_world(game_z))
    }

    pub fn world_x(&self) -> Result<f64> {
        require(self.world_x, "world_x")
    }

    pub fn world_y(&self) -> Result<f64> {
        require(self.world_y, "world_y")
    }

    pub fn world_z(&self) -> Result<f64> {
        require(self.world_z, "world_z")
    }

    pub fn game_x(&self, scaling: &WorldScaling) -> Result<f64> {
        self.world_x().map(|x| scaling.to_game(x))
    }

    pub fn game_y(&self, scaling: &WorldScaling) -> Result<f64> {
        self.world_y().map(|y| scaling.to_game(y))
    }

    pub fn game_z(&self, scaling: &WorldScaling) -> Result<f64> {
        self.world_z().map(|z| scaling.height_to_game(z))
    }

    pub fn coordinate(&self) -> Result<Coordinate> {
        Ok(Coordinate::from_world(self.world_x()?, self.world_y()?))
    }

    pub fn point(&self) -> Result<Point> {
        Ok(Point::from_world(
            self.world_x()?,
            self.world_y()?,
            self.world_z()?,
        ))
    }
}

fn require(value: Option<f64>, field: &'static str) -> Result<f64> {
    value.ok_or(TerrainError::UninitializedCoordinate { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_scaling::WorldSize;
    use proptest::prelude::*;

    fn scaling() -> WorldScaling {
        WorldScaling::new(WorldSize::new(25.0, 12.5, 1.5), [10.0, 10.0, 3.0]).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn game_units_follow_planar_ratio() {
        let scaling = scaling();
        let coordinate = Coordinate::from_world(12.5, 5.0);
        assert!(close(coordinate.game_x(&scaling), 5.0));
        assert!(close(coordinate.game_y(&scaling), 2.0));
    }

    #[test]
    fn setting_game_value_updates_world_value() {
        let scaling = scaling();
        let mut coordinate = Coordinate::default();
        coordinate.set_game_x(4.0, &scaling);
        assert!(close(coordinate.world_x, 10.0));
        assert!(close(coordinate.game_x(&scaling), 4.0));
    }

    #[test]
    fn height_uses_its_own_ratio() {
        let scaling = scaling();
        let point = Point::from_world(25.0, 12.5, 0.75);
        assert!(close(point.game_x(&scaling), 10.0));
        assert!(close(point.game_z(&scaling), 1.5));
    }

    #[test]
    fn render_position_puts_height_up() {
        let scaling = scaling();
        let point = Point::from_world(5.0, 10.0, 0.5);
        let render = point.render_position(&scaling);
        assert!(close(render[0], 2.0));
        assert!(close(render[1], 1.0));
        assert!(close(render[2], 4.0));

        let back = Point::from_render(render, &scaling);
        assert!(close(back.world_y, 10.0));
        assert!(close(back.world_z, 0.5));
    }

    #[test]
    fn builder_reports_missing_field() {
        let mut builder = CoordinateBuilder::new();
        assert!(matches!(
            builder.world_x(),
            Err(TerrainError::UninitializedCoordinate { field: "world_x" })
        ));

        builder.set_world_x(1.0).set_world_y(2.0);
        assert_eq!(builder.coordinate().unwrap(), Coordinate::from_world(1.0, 2.0));
        assert!(matches!(
            builder.point(),
            Err(TerrainError::UninitializedCoordinate { field: "world_z" })
        ));
    }

    #[test]
    fn builder_accepts_game_units() {
        let scaling = scaling();
        let mut builder = CoordinateBuilder::new();
        builder
            .set_game_x(2.0, &scaling)
            .set_game_y(1.0, &scaling)
            .set_game_z(3.0, &scaling);
        let point = builder.point().unwrap();
        assert!(close(point.world_x, 5.0));
        assert!(close(point.world_y, 2.5));
        assert!(close(point.world_z, 1.5));
        assert!(close(builder.game_z(&scaling).unwrap(), 3.0));
    }

    proptest! {
        #[test]
        fn world_game_world_round_trip(
            x in -1.0e4f64..1.0e4,
            z in -10.0f64..10.0,
            size in 0.1f64..500.0,
        ) {
            let scaling = WorldScaling::new(WorldSize::new(size, size * 0.7, 2.0), [10.0, 10.0, 3.0]).unwrap();
            let point = Point::from_world(x, x * 0.5, z);
            let back = Point::from_game(
                point.game_x(&scaling),
                point.game_y(&scaling),
                point.game_z(&scaling),
                &scaling,
            );
            prop_assert!(close(back.world_x, x));
            prop_assert!(close(back.world_y, x * 0.5));
            prop_assert!(close(back.world_z, z));
        }

        #[test]
        fn game_world_game_round_trip(gx in -20.0f64..20.0, size in 0.1f64..500.0) {
            let scaling = WorldScaling::new(WorldSize::new(size, size, 1.0), [10.0, 10.0, 3.0]).unwrap();
            let coordinate = Coordinate::from_game(gx, -gx, &scaling);
            prop_assert!(close(coordinate.game_x(&scaling), gx));
            prop_assert!(close(coordinate.game_y(&scaling), -gx));
        }
    }
}
