//! Geometry types shared by the occlusion walker and the scroll predicate.
//!
//! All coordinates live in one shared space (the root's coordinate space).
//! Malformed rectangles are never an error: [`Rect::sanitized`] clamps them to
//! an empty rectangle that still exists but never hit-tests.

/// A position in the shared coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Width and height of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// True unless both dimensions are strictly positive (NaN counts as empty).
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle, origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Build from left, top, right and bottom edges.
    #[inline]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// The empty rectangle at the origin, used for clamped bounds.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Check if the rectangle is empty (zero, negative or NaN size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Returns this rectangle, or [`Rect::ZERO`] if any component is non-finite
    /// or the size is negative.
    pub fn sanitized(&self) -> Rect {
        if self.is_malformed() { Rect::ZERO } else { *self }
    }

    /// Whether any component is non-finite or the size is negative.
    ///
    /// A zero-area rectangle is empty but not malformed.
    pub fn is_malformed(&self) -> bool {
        let finite = self.origin.is_finite()
            && self.size.width.is_finite()
            && self.size.height.is_finite();
        !finite || self.size.width < 0.0 || self.size.height < 0.0
    }

    /// Hit test.
    ///
    /// The right and bottom edges are exclusive, so an empty rectangle never
    /// contains anything.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Overlap of two rectangles, or `None` when they share no area.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::from_ltrb(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::from_ltrb(left, top, right, bottom)
    }

    /// Subtract `other` from this rectangle, pushing the remaining pieces.
    ///
    /// Produces at most four non-overlapping pieces: full-width bands above and
    /// below the overlap, then the left and right remainders beside it.
    fn subtract_into(&self, other: &Rect, out: &mut Vec<Rect>) {
        let Some(hole) = self.intersect(other) else {
            out.push(*self);
            return;
        };

        if hole.top() > self.top() {
            out.push(Rect::from_ltrb(self.left(), self.top(), self.right(), hole.top()));
        }
        if hole.bottom() < self.bottom() {
            out.push(Rect::from_ltrb(self.left(), hole.bottom(), self.right(), self.bottom()));
        }
        if hole.left() > self.left() {
            out.push(Rect::from_ltrb(self.left(), hole.top(), hole.left(), hole.bottom()));
        }
        if hole.right() < self.right() {
            out.push(Rect::from_ltrb(hole.right(), hole.top(), self.right(), hole.bottom()));
        }
    }
}

/// A set of non-overlapping rectangles.
///
/// Only what the occlusion walker needs: intersection with a rectangle,
/// subtraction of a rectangle, and the bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A region covering a single rectangle (empty if the rectangle is).
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.set(rect);
        region
    }

    /// Replace the contents of this region with `rect`, reusing storage.
    pub fn set(&mut self, rect: Rect) {
        self.rects.clear();
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// Whether the region covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up the region.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Bounding box of the region, or [`Rect::ZERO`] when empty.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.rects.iter();
        match iter.next() {
            Some(first) => iter.fold(*first, |acc, r| acc.union(r)),
            None => Rect::ZERO,
        }
    }

    /// Intersect `rect` with this region and store the result in `out`.
    ///
    /// Returns `true` if the result is non-empty.
    pub fn intersect_rect_into(&self, rect: &Rect, out: &mut Region) -> bool {
        out.rects.clear();
        out.rects
            .extend(self.rects.iter().filter_map(|r| r.intersect(rect)));
        !out.is_empty()
    }

    /// Remove `rect` from this region.
    pub fn subtract(&mut self, rect: &Rect) {
        if rect.is_empty() || self.rects.is_empty() {
            return;
        }
        let previous = std::mem::take(&mut self.rects);
        for r in &previous {
            r.subtract_into(rect, &mut self.rects);
        }
    }
}
