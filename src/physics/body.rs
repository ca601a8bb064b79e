use crate::math::Vec2;

/// Per-sub-step displacement below which a damped body is considered at rest.
pub const REST_SPEED: f32 = 1e-4;

/*
Verlet Bodies
=============

A body stores where it is and where it was one sub-step ago. Velocity is
never stored; it is the difference of the two:

    velocity (per sub-step) = position_current - position_previous

Integration moves the body by that difference plus the accumulated
acceleration scaled by the squared step:

    next = current + (current - previous) + acceleration * dt²
    previous = current
    current = next

Changing velocity therefore means moving `position_previous`. Damping,
collision impulses and wall bounces all go through `set_velocity`, which keeps
`position_current` fixed and rewrites `position_previous` behind it.

Teleporting a body (grid snap, collision push-out) goes through `translate`,
which moves both positions together so no velocity is injected.
*/

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBody {
    position_current: Vec2,
    position_previous: Vec2,
    acceleration: Vec2,
}

impl ParticleBody {
    /// A body at rest at `position`.
    pub fn new(position: Vec2) -> Self {
        Self {
            position_current: position,
            position_previous: position,
            acceleration: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position_current
    }

    #[inline]
    pub fn previous_position(&self) -> Vec2 {
        self.position_previous
    }

    /// Displacement over the last sub-step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position_current - self.position_previous
    }

    #[inline]
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    #[inline]
    pub fn accelerate(&mut self, acceleration: Vec2) {
        self.acceleration += acceleration;
    }

    /// Advance one sub-step and clear the accumulator.
    pub fn integrate(&mut self, dt: f32) {
        let displacement = self.velocity();
        let next = self.position_current + displacement + self.acceleration * (dt * dt);
        self.position_previous = self.position_current;
        self.position_current = next;
        self.acceleration = Vec2::ZERO;
    }

    /// Replace the implicit velocity, keeping the current position.
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.position_previous = self.position_current - velocity;
    }

    /// Scale the implicit velocity by `1 - damping`.
    ///
    /// Velocities that fall below `REST_SPEED` snap to zero; otherwise float
    /// rounding of `position_previous` can leave a body creeping by one ulp
    /// per step forever.
    #[inline]
    pub fn damp(&mut self, damping: f32) {
        let retained = (1.0 - damping).clamp(0.0, 1.0);
        let velocity = self.velocity() * retained;
        if velocity.length_squared() < REST_SPEED * REST_SPEED {
            self.position_previous = self.position_current;
        } else {
            self.set_velocity(velocity);
        }
    }

    /// Shift both positions, preserving velocity.
    #[inline]
    pub fn translate(&mut self, offset: Vec2) {
        self.position_current += offset;
        self.position_previous += offset;
    }

    /// Place the body at `position` at rest.
    pub fn teleport(&mut self, position: Vec2) {
        self.position_current = position;
        self.position_previous = position;
        self.acceleration = Vec2::ZERO;
    }
}
