use crate::Coordinate;

/// An axis-aligned box in (longitude, latitude) degrees.
///
/// Boxes never wrap: something that crosses the antimeridian is given the
/// full longitude range instead.
#[derive(Copy, Clone, Debug)]
pub struct Rectangle {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

pub trait HasEnvelope {
    fn envelope(&self) -> Rectangle;
}

impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() {
            other.is_empty()
        } else {
            self.x_min == other.x_min
                && self.y_min == other.y_min
                && self.x_max == other.x_max
                && self.y_max == other.y_max
        }
    }
}

impl Rectangle {
    pub fn new(p1: Coordinate, p2: Coordinate) -> Self {
        Rectangle {
            x_min: p1.x.min(p2.x),
            y_min: p1.y.min(p2.y),
            x_max: p1.x.max(p2.x),
            y_max: p1.y.max(p2.y),
        }
    }

    pub fn new_empty() -> Self {
        Rectangle {
            x_min: f64::NAN,
            y_min: f64::NAN,
            x_max: f64::NAN,
            y_max: f64::NAN,
        }
    }

    /// A box spanning every longitude between the two latitudes.
    pub fn latitude_band(y_min: f64, y_max: f64) -> Self {
        Rectangle {
            x_min: -180.,
            y_min,
            x_max: 180.,
            y_max,
        }
    }

    pub fn of(rects: &[Rectangle]) -> Self {
        rects.iter().fold(Rectangle::new_empty(), |mut s, r| {
            s.expand(*r);
            s
        })
    }

    pub fn is_empty(&self) -> bool {
        self.x_min.is_nan() || self.y_min.is_nan() || self.x_max.is_nan() || self.y_max.is_nan()
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            x: (self.x_max + self.x_min) / 2.,
            y: (self.y_max + self.y_min) / 2.,
        }
    }

    pub fn intersects(&self, other: Rectangle) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }

    pub fn expand(&mut self, other: Rectangle) {
        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Grow the box by `margin` degrees on every side.
    pub fn padded(&self, margin: f64) -> Rectangle {
        Rectangle {
            x_min: self.x_min - margin,
            y_min: self.y_min - margin,
            x_max: self.x_max + margin,
            y_max: self.y_max + margin,
        }
    }

    /// The same box shifted east by `degrees` of longitude.
    pub fn shifted(&self, degrees: f64) -> Rectangle {
        Rectangle {
            x_min: self.x_min + degrees,
            y_min: self.y_min,
            x_max: self.x_max + degrees,
            y_max: self.y_max,
        }
    }

    /// The query boxes that cover `rect` once longitudes are wrapped at the
    /// antimeridian: `rect` itself, plus a copy shifted by 360 degrees for any
    /// side that pokes past +/-180.
    pub fn wrapped(rect: Rectangle) -> Vec<Rectangle> {
        let mut rects = vec![rect];
        if rect.x_min < -180. {
            rects.push(rect.shifted(360.));
        }
        if rect.x_max > 180. {
            rects.push(rect.shifted(-360.));
        }
        rects
    }
}
