use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A latitude/longitude pair in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// True if both components are finite and within the usual ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn to_point(self) -> Point {
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        let (sin_lng, cos_lng) = self.lng.to_radians().sin_cos();
        Point {
            x: cos_lat * cos_lng,
            y: cos_lat * sin_lng,
            z: sin_lat,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat, self.lng)
    }
}

/// A point on the unit sphere, as a 3-vector.
///
/// Points produced by [`LatLng::to_point`] are unit length; intermediate
/// results of the vector arithmetic need not be.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<LatLng> for Point {
    fn from(ll: LatLng) -> Self {
        ll.to_point()
    }
}

impl From<Point> for LatLng {
    fn from(p: Point) -> Self {
        p.to_lat_lng()
    }
}

impl Point {
    pub const NORTH_POLE: Point = Point {
        x: 0.,
        y: 0.,
        z: 1.,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    pub fn from_degrees(lat: f64, lng: f64) -> Self {
        LatLng::new(lat, lng).to_point()
    }

    pub fn to_lat_lng(&self) -> LatLng {
        let lat = self.z.atan2((self.x * self.x + self.y * self.y).sqrt());
        let lng = self.y.atan2(self.x);
        LatLng {
            lat: lat.to_degrees(),
            lng: lng.to_degrees(),
        }
    }

    pub fn dot(&self, rhs: Point) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(&self, rhs: Point) -> Point {
        Point {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    pub fn norm(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Returns the unit vector in the same direction, or `self` if it is zero.
    pub fn normalize(&self) -> Point {
        let n = self.norm();
        if n == 0. {
            *self
        } else {
            *self * (1. / n)
        }
    }

    /// Angle between the two vectors, in radians.
    pub fn angle(&self, rhs: Point) -> f64 {
        self.cross(rhs).norm().atan2(self.dot(rhs))
    }

    /// The signed volume of the parallelepiped (a, b, c). Positive when c is
    /// to the left of the great circle a -> b.
    pub fn triple(a: Point, b: Point, c: Point) -> f64 {
        a.cross(b).dot(c)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Point {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Point {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
