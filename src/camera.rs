use serde::{Deserialize, Serialize};

/// Horizontal extent of a level, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelBounds {
    /// Smallest x the camera centre may take
    pub left_stop: f32,
    /// World x of the map's end marker
    pub map_end: f32,
    /// Fixed camera y
    pub bottom_reference: f32,
}

/// Camera and map-edge tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub left_stop: f32,
    /// The camera stops this far before `map_end`
    pub stop_offset: f32,
    /// Smallest x the player may reach
    pub player_left_margin: f32,
    /// The player stops this far before `map_end`
    pub player_right_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            left_stop: 8.0,
            stop_offset: 8.0,
            player_left_margin: 0.5,
            player_right_margin: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn bounds(&self, map_end: f32, bottom_reference: f32) -> LevelBounds {
        LevelBounds {
            left_stop: self.left_stop,
            map_end,
            bottom_reference,
        }
    }

    /// Keep `x` inside the playable strip of a map ending at `map_end`.
    ///
    /// On maps too short for both margins only the left margin applies.
    pub fn clamp_player_x(&self, x: f32, map_end: f32) -> f32 {
        let mut x = x.max(self.player_left_margin);
        let right = map_end - self.player_right_margin;
        if right > self.player_left_margin {
            x = x.min(right);
        }
        x
    }
}

/// Centre of the view in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Track `target_x` horizontally inside `bounds`; y stays on the bottom reference.
    ///
    /// The left stop is applied before the right one, so on a map shorter
    /// than the view the right stop wins.
    pub fn follow(&mut self, target_x: f32, bounds: &LevelBounds, stop_offset: f32) {
        let mut x = target_x;
        if x < bounds.left_stop {
            x = bounds.left_stop;
        }
        let right_stop = bounds.map_end - stop_offset;
        if x > right_stop {
            x = right_stop;
        }
        self.x = x;
        self.y = bounds.bottom_reference;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> LevelBounds {
        LevelBounds {
            left_stop: 8.0,
            map_end: 40.0,
            bottom_reference: 3.5,
        }
    }

    #[test]
    fn test_follow_inside_bounds() {
        let mut camera = Camera::default();
        camera.follow(20.0, &bounds(), 8.0);

        assert_eq!(camera, Camera::new(20.0, 3.5));
    }

    #[test]
    fn test_follow_clamps_to_stops() {
        let mut camera = Camera::default();

        camera.follow(2.0, &bounds(), 8.0);
        assert_eq!(camera.x, 8.0);

        camera.follow(39.0, &bounds(), 8.0);
        assert_eq!(camera.x, 32.0);
    }

    #[test]
    fn test_short_map_prefers_right_stop() {
        let short = LevelBounds {
            map_end: 12.0,
            ..bounds()
        };
        let mut camera = Camera::default();
        camera.follow(1.0, &short, 8.0);

        assert_eq!(camera.x, 4.0);
    }

    #[test]
    fn test_player_clamp() {
        let config = CameraConfig::default();

        assert_eq!(config.clamp_player_x(-3.0, 40.0), 0.5);
        assert_eq!(config.clamp_player_x(39.5, 40.0), 39.0);
        assert_eq!(config.clamp_player_x(12.0, 40.0), 12.0);
        // Degenerate map: no right margin
        assert_eq!(config.clamp_player_x(3.0, 1.0), 3.0);
    }
}
