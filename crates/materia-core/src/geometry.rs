#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn origin(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.w,
            height: self.h,
        }
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    /// Converts a point from the coordinate space this rect lives in into
    /// the rect's own local space.
    pub fn to_local(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: p.x - self.x,
            y: p.y - self.y,
        }
    }
}

/// Scale + translate transform applied around the center of the rect it is
/// attached to, the way layer transforms behave on most retained-mode hosts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Maps `source` exactly onto `destination`: scales by the size ratio and
    /// moves the center of one onto the center of the other.
    pub fn between(source: Rect, destination: Rect) -> Self {
        let sx = if source.w > 0.0 { destination.w / source.w } else { 1.0 };
        let sy = if source.h > 0.0 { destination.h / source.h } else { 1.0 };
        Self {
            translate_x: destination.mid_x() - source.mid_x(),
            translate_y: destination.mid_y() - source.mid_y(),
            scale_x: sx,
            scale_y: sy,
        }
    }

    /// Uniform scale that puts the top-left corner of the scaled `start` box
    /// on `target`.
    ///
    /// `dx = -w * (1 - s) / 2 - (start.x - target.x)`, same for `dy`.
    pub fn scale_onto(start: Rect, target: Vec2, scale: f32) -> Self {
        if scale == 1.0 && start.origin() == target {
            return Self::identity();
        }
        Self {
            translate_x: -start.w * (1.0 - scale) / 2.0 - (start.x - target.x),
            translate_y: -start.h * (1.0 - scale) / 2.0 - (start.y - target.y),
            scale_x: scale,
            scale_y: scale,
        }
    }

    /// Where `r` ends up on screen once this transform is attached to it.
    pub fn apply_to_rect(&self, r: Rect) -> Rect {
        let w = r.w * self.scale_x;
        let h = r.h * self.scale_y;
        let cx = r.mid_x() + self.translate_x;
        let cy = r.mid_y() + self.translate_y;
        Rect {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }
}
