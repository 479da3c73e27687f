//! Time-based interpolation for label, line and highlight transitions.
//!
//! Nothing here schedules frames. A widget retargets its values when its
//! state changes; the host calls the widget's `advance()` every frame, which
//! calls [`AnimatedValue::update`] until it reports completion.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::{Color, Transform};

/// Source of "now" for animations on this thread.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

thread_local! {
    static CLOCK: RefCell<Option<Rc<dyn Clock>>> = const { RefCell::new(None) };
}

/// The installed clock's time, or the real time when none is installed.
pub fn now() -> Instant {
    CLOCK
        .with(|c| c.borrow().as_ref().map(|c| c.now()))
        .unwrap_or_else(Instant::now)
}

/// Replace this thread's clock.
pub fn set_clock(clock: impl Clock) {
    CLOCK.with(|c| *c.borrow_mut() = Some(Rc::new(clock)));
}

/// Manually driven clock. Clones share one instant.
#[derive(Clone)]
pub struct TestClock {
    at: Rc<Cell<Instant>>,
}

impl TestClock {
    pub fn new(start: Instant) -> Self {
        Self {
            at: Rc::new(Cell::new(start)),
        }
    }

    /// A clock starting at the real "now", installed for this thread.
    pub fn install() -> Self {
        let clock = Self::new(Instant::now());
        set_clock(clock.clone());
        clock
    }

    pub fn advance(&self, by: Duration) {
        self.at.set(self.at.get() + by);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.at.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `0..=1` onto the curve.
    pub fn interpolate(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut if t < 0.5 => 2.0 * t * t,
            Easing::EaseInOut => -1.0 + (4.0 - 2.0 * t) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn linear(duration: Duration) -> Self {
        Self::tween(duration, Easing::Linear)
    }

    /// Zero-length: retargeting jumps straight to the target.
    pub fn instant() -> Self {
        Self::tween(Duration::ZERO, Easing::Linear)
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

fn mix_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32).interpolate(&(to as f32), t).round().clamp(0.0, 255.0) as u8
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Color(
            mix_channel(self.0, other.0, t),
            mix_channel(self.1, other.1, t),
            mix_channel(self.2, other.2, t),
            mix_channel(self.3, other.3, t),
        )
    }
}

impl Interpolate for Transform {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Transform {
            translate_x: self.translate_x.interpolate(&other.translate_x, t),
            translate_y: self.translate_y.interpolate(&other.translate_y, t),
            scale_x: self.scale_x.interpolate(&other.scale_x, t),
            scale_y: self.scale_y.interpolate(&other.scale_y, t),
        }
    }
}

/// A value moving toward a target along an [`AnimationSpec`].
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    from: T,
    target: T,
    spec: AnimationSpec,
    started_at: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            from: initial.clone(),
            target: initial,
            spec,
            started_at: None,
        }
    }

    /// Head for `target`, starting from wherever the value is right now.
    pub fn set_target(&mut self, target: T) {
        self.update();
        if self.spec.is_instant() {
            self.snap_to(target);
            return;
        }
        self.from = self.current.clone();
        self.target = target;
        self.started_at = Some(now());
    }

    pub fn animate_to(&mut self, target: T, spec: AnimationSpec) {
        self.spec = spec;
        self.set_target(target);
    }

    pub fn snap_to(&mut self, value: T) {
        self.current = value.clone();
        self.from = value.clone();
        self.target = value;
        self.started_at = None;
    }

    /// Recompute the current value; `false` once settled.
    pub fn update(&mut self) -> bool {
        let Some(started_at) = self.started_at else {
            return false;
        };
        let elapsed = now().saturating_duration_since(started_at);
        if elapsed >= self.spec.duration {
            self.current = self.target.clone();
            self.started_at = None;
            return false;
        }
        let t = elapsed.as_secs_f32() / self.spec.duration.as_secs_f32();
        self.current = self.from.interpolate(&self.target, self.spec.easing.interpolate(t));
        true
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.started_at.is_some()
    }
}
