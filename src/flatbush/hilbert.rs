use crate::{Coordinate, Rectangle};

const HILBERT_MAX: f64 = ((1 << 16) - 1) as f64;

/// Maps box centers onto a 16-bit Hilbert curve so that loops which are near
/// each other on the map end up near each other in the packed tree.
pub struct Hilbert {
    lng: Axis,
    lat: Axis,
}

/// Affine map from one side of the extent onto `[0, HILBERT_MAX]`.
struct Axis {
    min: f64,
    scale: f64,
}

impl Axis {
    fn new(min: f64, max: f64) -> Self {
        // A flat or empty extent puts everything at the origin.
        if max > min {
            Axis {
                min,
                scale: HILBERT_MAX / (max - min),
            }
        } else {
            Axis { min: 0., scale: 0. }
        }
    }

    fn quantize(&self, v: f64) -> u32 {
        let scaled = self.scale * (v - self.min);
        scaled.floor().max(0.).min(HILBERT_MAX) as u32
    }
}

impl Hilbert {
    pub fn new(extent: Rectangle) -> Self {
        Hilbert {
            lng: Axis::new(extent.x_min, extent.x_max),
            lat: Axis::new(extent.y_min, extent.y_max),
        }
    }

    /// Returns the hilbert index of position in the (lng, lat) extent.
    ///
    /// Positions outside of the extent are clamped onto its edge.
    pub fn hilbert(&self, position: Coordinate) -> u32 {
        Self::hilbert_normalized(self.lng.quantize(position.x), self.lat.quantize(position.y))
    }

    /**
     * Fast Hilbert curve algorithm by http://threadlocalmutex.com/
     * Ported from C++ https://github.com/rawrunprotected/hilbert_curves (public domain)
     */
    #[allow(non_snake_case)]
    #[allow(clippy::many_single_char_names)]
    pub fn hilbert_normalized(x: u32, y: u32) -> u32 {
        let mut a = x ^ y;
        let mut b = 0xFFFF ^ a;
        let mut c = 0xFFFF ^ (x | y);
        let mut d = x & (y ^ 0xFFFF);

        let mut A = a | (b >> 1);
        let mut B = (a >> 1) ^ a;
        let mut C = ((c >> 1) ^ (b & (d >> 1))) ^ c;
        let mut D = ((a & (c >> 1)) ^ (d >> 1)) ^ d;

        a = A;
        b = B;
        c = C;
        d = D;
        A = (a & (a >> 2)) ^ (b & (b >> 2));
        B = (a & (b >> 2)) ^ (b & ((a ^ b) >> 2));
        C ^= (a & (c >> 2)) ^ (b & (d >> 2));
        D ^= (b & (c >> 2)) ^ ((a ^ b) & (d >> 2));

        a = A;
        b = B;
        c = C;
        d = D;
        A = (a & (a >> 4)) ^ (b & (b >> 4));
        B = (a & (b >> 4)) ^ (b & ((a ^ b) >> 4));
        C ^= (a & (c >> 4)) ^ (b & (d >> 4));
        D ^= (b & (c >> 4)) ^ ((a ^ b) & (d >> 4));

        a = A;
        b = B;
        c = C;
        d = D;
        C ^= (a & (c >> 8)) ^ (b & (d >> 8));
        D ^= (b & (c >> 8)) ^ ((a ^ b) & (d >> 8));

        a = C ^ (C >> 1);
        b = D ^ (D >> 1);

        let mut i0 = x ^ y;
        let mut i1 = b | (0xFFFF ^ (i0 | a));

        i0 = (i0 | (i0 << 8)) & 0x00FF_00FF;
        i0 = (i0 | (i0 << 4)) & 0x0F0F_0F0F;
        i0 = (i0 | (i0 << 2)) & 0x3333_3333;
        i0 = (i0 | (i0 << 1)) & 0x5555_5555;

        i1 = (i1 | (i1 << 8)) & 0x00FF_00FF;
        i1 = (i1 | (i1 << 4)) & 0x0F0F_0F0F;
        i1 = (i1 | (i1 << 2)) & 0x3333_3333;
        i1 = (i1 | (i1 << 1)) & 0x5555_5555;

        (i1 << 1) | i0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized() {
        let h = Hilbert::hilbert_normalized(12345, 67890);
        assert_eq!(h, 99_289_669);
    }

    #[test]
    fn hilbert_from_position() {
        let h = Hilbert::new(Rectangle::new((-10., 40.).into(), (10., 60.).into()));
        // A quarter of the way east and half way north quantizes to
        // (16383, 32767).
        assert_eq!(h.hilbert(Coordinate::new(-5., 50.)), 805_306_368);
        assert_eq!(h.hilbert(Coordinate::new(-10., 40.)), 0);
    }

    #[test]
    fn hilbert_with_flat_extent() {
        // Every loop on one meridian.
        let h = Hilbert::new(Rectangle::new((5., 0.).into(), (5., 10.).into()));
        assert_eq!(h.hilbert(Coordinate::new(5., 0.)), 0);
        assert_eq!(
            h.hilbert(Coordinate::new(5., 10.)),
            Hilbert::hilbert_normalized(0, 65535)
        );
        let h = Hilbert::new(Rectangle::new_empty());
        assert_eq!(h.hilbert(Coordinate::new(2.2, 48.8)), 0);
    }

    #[test]
    fn hilbert_clamps_outside_positions() {
        let h = Hilbert::new(Rectangle::new((-180., -90.).into(), (180., 90.).into()));
        let corner = h.hilbert(Coordinate::new(180., 90.));
        assert_eq!(h.hilbert(Coordinate::new(190., 95.)), corner);
        assert_eq!(
            h.hilbert(Coordinate::new(-200., -100.)),
            h.hilbert(Coordinate::new(-180., -90.))
        );
    }

    #[test]
    fn hilbert_ordering() {
        // The first-order curve visits the quadrants SW, NW, NE, SE.
        let h = Hilbert::new(Rectangle::new((0., 0.).into(), (4., 4.).into()));
        let hi0 = h.hilbert(Coordinate::new(0., 0.));
        let hi1 = h.hilbert(Coordinate::new(1., 1.));
        let hi2 = h.hilbert(Coordinate::new(1., 3.));
        let hi3 = h.hilbert(Coordinate::new(3., 3.));
        let hi4 = h.hilbert(Coordinate::new(3., 1.));
        assert!(hi0 < hi1);
        assert!(hi1 < hi2);
        assert!(hi2 < hi3);
        assert!(hi3 < hi4);
    }
}
