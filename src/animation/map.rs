use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b`; `t` is in `[0, 1]` for all callers in this crate.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl<A: Lerp, B: Lerp> Lerp for (A, B) {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (A::lerp(&a.0, &b.0, t), B::lerp(&a.1, &b.1, t))
    }
}

impl<A: Lerp, B: Lerp, C: Lerp> Lerp for (A, B, C) {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (
            A::lerp(&a.0, &b.0, t),
            B::lerp(&a.1, &b.1, t),
            C::lerp(&a.2, &b.2, t),
        )
    }
}

/// Input sub-range of a progress scalar.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    /// Input mapped to the first output.
    pub start: f64,
    /// Input mapped to the last output.
    pub end: f64,
}

impl Domain {
    /// Domain `[start, end]`.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The full progress range `[0, 1]`.
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Clamp `value` into the domain and rescale it to `[0, 1]`.
    ///
    /// A zero-width domain is a step at `start`. NaN maps to 0.
    pub fn normalize(self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        let span = self.end - self.start;
        if span == 0.0 {
            return if value >= self.start { 1.0 } else { 0.0 };
        }
        ((value - self.start) / span).clamp(0.0, 1.0)
    }

    /// Signed width of the domain.
    pub fn width(self) -> f64 {
        self.end - self.start
    }

    fn validate(self) -> ScrollFxResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ScrollFxError::validation("domain bounds must be finite"));
        }
        Ok(())
    }
}

/// Map `value` through `domain` onto the segment `from..to`.
pub fn map_range<T: Lerp>(value: f64, domain: Domain, from: &T, to: &T) -> T {
    T::lerp(from, to, domain.normalize(value))
}

/// Map `value` through `domain` onto evenly spaced output stops.
///
/// Returns `None` when `stops` is empty.
pub fn map_stops<T: Lerp + Clone>(value: f64, domain: Domain, stops: &[T]) -> Option<T> {
    let (first, rest) = stops.split_first()?;
    if rest.is_empty() {
        return Some(first.clone());
    }
    let segments = stops.len() - 1;
    let pos = domain.normalize(value) * segments as f64;
    let seg = (pos.floor() as usize).min(segments - 1);
    let local = pos - seg as f64;
    Some(T::lerp(&stops[seg], &stops[seg + 1], local))
}

/// A stored domain plus output stops, sampled with a fresh value on every recomputation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RangeMapping<T> {
    domain: Domain,
    stops: Vec<T>, // at least one
}

impl<T: Lerp + Clone> RangeMapping<T> {
    /// Create a validated mapping; `stops` must be non-empty.
    pub fn new(domain: Domain, stops: Vec<T>) -> ScrollFxResult<Self> {
        domain.validate()?;
        if stops.is_empty() {
            return Err(ScrollFxError::validation(
                "range mapping needs at least one output stop",
            ));
        }
        Ok(Self { domain, stops })
    }

    /// Two-stop mapping `domain -> [from, to]`.
    pub fn pair(domain: Domain, from: T, to: T) -> ScrollFxResult<Self> {
        Self::new(domain, vec![from, to])
    }

    /// Input domain.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Evaluate the mapping for `value`.
    pub fn sample(&self, value: f64) -> T {
        map_stops(value, self.domain, &self.stops).unwrap_or_else(|| self.stops[0].clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/map.rs"]
mod tests;
