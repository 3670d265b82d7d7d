use std::fmt;

/// A planar `(longitude, latitude)` pair in degrees, in the order GeoJSON
/// stores positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Coordinate {
    fn from(coord: (f64, f64)) -> Self {
        Coordinate {
            x: coord.0,
            y: coord.1,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }
    }

    pub fn lng(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Cross product of the vector self x rhs
    pub fn cross(&self, rhs: Coordinate) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }
}
