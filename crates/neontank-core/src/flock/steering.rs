//! Small vector helpers and the vitality ramp used by the controller.

/// Plain 2D vector. The flock is small enough that a math crate would be
/// overkill; these are the handful of operations steering needs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }

    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }

    pub fn scale(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    pub fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or zero when the input is degenerate.
    pub fn norm(self) -> Vec2 {
        let l = self.len();
        if l <= 1e-9 {
            Vec2::ZERO
        } else {
            self.scale(1.0 / l)
        }
    }

    /// Cap magnitude at `max`, preserving direction.
    pub fn limit(self, max: f64) -> Vec2 {
        let l = self.len();
        if l > max {
            self.scale(max / l)
        } else {
            self
        }
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Derived [0, 1] factor from fish health driving steering intensity.
/// Inert below the floor, then a squared ramp so behavior accelerates
/// toward full health.
pub fn vitality(health: f64, floor: f64, span: f64) -> f64 {
    let raw = ((health - floor) / span).clamp(0.0, 1.0);
    raw * raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vitality_is_inert_at_or_below_floor() {
        assert_eq!(vitality(60.0, 60.0, 40.0), 0.0);
        assert_eq!(vitality(10.0, 60.0, 40.0), 0.0);
        assert_eq!(vitality(0.0, 60.0, 40.0), 0.0);
    }

    #[test]
    fn vitality_ramps_nonlinearly_to_one() {
        assert!((vitality(80.0, 60.0, 40.0) - 0.25).abs() < 1e-12);
        assert!((vitality(100.0, 60.0, 40.0) - 1.0).abs() < 1e-12);
        assert!((vitality(140.0, 60.0, 40.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn norm_of_zero_is_zero() {
        assert_eq!(Vec2::ZERO.norm(), Vec2::ZERO);
    }

    #[test]
    fn limit_caps_magnitude() {
        let v = Vec2::new(3.0, 4.0).limit(2.5);
        assert!((v.len() - 2.5).abs() < 1e-12);
        let w = Vec2::new(1.0, 0.0).limit(2.5);
        assert_eq!(w, Vec2::new(1.0, 0.0));
    }
}
