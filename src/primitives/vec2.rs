//! Offsets and directions in screen space.

use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A displacement in the plane. Screen y points down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// `x1 * y2 - y1 * x2`. Positive when `other` turns clockwise from `self`
    /// on screen.
    #[inline]
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector in the same direction; `None` for (near) zero vectors.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        (mag > F::epsilon()).then(|| self / mag)
    }

    /// `(-y, x)`: a quarter turn clockwise on screen.
    #[inline]
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// `(y, -x)`: the direction glyph tops point to for a text baseline
    /// running along `self`.
    #[inline]
    pub fn up_normal(self) -> Self {
        -self.perpendicular()
    }

    /// Angle from the +x axis in radians, in `(-pi, pi]`.
    #[inline]
    pub fn angle(self) -> F {
        self.y.atan2(self.x)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<F: Float> $trait for Vec2<F> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

macro_rules! scalar {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<F: Float> $trait<F> for Vec2<F> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: F) -> Self {
                Self::new(self.x $op rhs, self.y $op rhs)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);
scalar!(Mul, mul, *);
scalar!(Div, div, /);

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_sign_on_screen() {
        let east: Vec2<f64> = Vec2::new(2.0, 0.0);
        let south = Vec2::new(0.0, 3.0);
        assert_eq!(east.dot(south), 0.0);
        // South is a clockwise turn from east when y points down.
        assert_eq!(east.cross(south), 6.0);
        assert_eq!(south.cross(east), -6.0);
    }

    #[test]
    fn test_normalize() {
        let n = Vec2::new(0.0_f64, -4.0).normalize().unwrap();
        assert_relative_eq!(n.y, -1.0, epsilon = 1e-12);
        assert!(Vec2::<f64>::default().normalize().is_none());
    }

    #[test]
    fn test_normals_of_a_baseline() {
        let along: Vec2<f64> = Vec2::new(1.0, 0.0);
        assert_eq!(along.up_normal(), Vec2::new(0.0, -1.0));
        assert_eq!(along.perpendicular(), Vec2::new(0.0, 1.0));

        let v = Vec2::new(3.0, -1.5);
        assert_eq!(v.dot(v.up_normal()), 0.0);
    }

    #[test]
    fn test_operators() {
        let a: Vec2<f64> = Vec2::new(1.0, 2.0);
        let b = Vec2::new(0.5, -1.0);
        assert_eq!(a + b, Vec2::new(1.5, 1.0));
        assert_eq!(a - b, Vec2::new(0.5, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(a / 2.0, Vec2::new(0.5, 1.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_angle() {
        assert_relative_eq!(Vec2::new(0.0_f64, 1.0).angle(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(Vec2::new(-1.0_f64, 0.0).angle(), std::f64::consts::PI);
    }
}
