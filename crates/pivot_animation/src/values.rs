//! Animatable value types
//!
//! Linear interpolation for scalars, geometry and view properties.

use pivot_core::{Point, Rect, Size, ViewProperty};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::new(
            self.width.lerp(&other.width, t),
            self.height.lerp(&other.height, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.width.approx_eq(&other.width, epsilon) && self.height.approx_eq(&other.height, epsilon)
    }
}

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect {
            origin: self.origin.lerp(&other.origin, t),
            size: self.size.lerp(&other.size, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.origin.approx_eq(&other.origin, epsilon) && self.size.approx_eq(&other.size, epsilon)
    }
}

impl Interpolate for ViewProperty {
    /// Interpolate two values of the same property; mismatched kinds snap to
    /// `other`
    fn lerp(&self, other: &Self, t: f32) -> Self {
        match (self, other) {
            (ViewProperty::Frame(a), ViewProperty::Frame(b)) => ViewProperty::Frame(a.lerp(b, t)),
            (ViewProperty::Opacity(a), ViewProperty::Opacity(b)) => {
                ViewProperty::Opacity(a.lerp(b, t))
            }
            (ViewProperty::RotationY(a), ViewProperty::RotationY(b)) => {
                ViewProperty::RotationY(a.lerp(b, t))
            }
            _ => *other,
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        match (self, other) {
            (ViewProperty::Frame(a), ViewProperty::Frame(b)) => a.approx_eq(b, epsilon),
            (ViewProperty::Opacity(a), ViewProperty::Opacity(b))
            | (ViewProperty::RotationY(a), ViewProperty::RotationY(b)) => a.approx_eq(b, epsilon),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_rect_interpolation() {
        let from = Rect::new(320.0, 0.0, 320.0, 480.0);
        let to = Rect::new(0.0, 0.0, 320.0, 480.0);
        let mid = from.lerp(&to, 0.5);
        assert!(mid.approx_eq(&Rect::new(160.0, 0.0, 320.0, 480.0), 1e-4));
    }

    #[test]
    fn test_property_interpolation() {
        let mid = ViewProperty::Opacity(0.0).lerp(&ViewProperty::Opacity(1.0), 0.25);
        assert!(mid.approx_eq(&ViewProperty::Opacity(0.25), 1e-6));

        // different properties never blend
        let snapped = ViewProperty::Opacity(0.0).lerp(&ViewProperty::RotationY(90.0), 0.5);
        assert_eq!(snapped, ViewProperty::RotationY(90.0));
    }
}
