use tracing::{debug, info, warn};

use crate::{
    error::{SynthError, SynthResult},
    graph::node::{NodeId, NodeKind},
    math::Vec2,
    physics::{body::ParticleBody, config::PhysicsConfig},
    MAX_NODES,
};

/*
Physics World
=============

The world owns every body in a fixed-capacity arena. A `NodeId` is the index
of the arena slot, so the physics body and the signal node that share an id
never need pointers to each other.

One visual frame (`tick(dt)`) is split into `substeps` equal sub-steps. Each
sub-step runs, in order:

    1. integrate     Verlet step, acceleration consumed
    2. drag          selected body pulled toward the pointer
    3. damping       implicit velocity scaled down
    4. collisions    pairwise push-out + restitution impulse
    5. bounds        walls, if configured

Drag
----

The selected body accelerates toward the pointer like a stiff spring:

    a += (pointer - position) * drag_force        if distance > dead_zone

Inside the dead zone no force is applied and damping lets the body settle
instead of buzzing around the cursor.

Collisions
----------

Every pair closer than one diameter is separated along the axis between
their centers, each body taking half of the overlap:

      A ●──────● B        overlap = diameter - distance
      ←─ ½ ─┤  ├─ ½ ─→

With bounds configured, a body's share is capped by how far it can travel
along the push before leaving the wall inset, and the partner takes the rest.
A body pressed against a wall is therefore immovable within the pair, and the
bounds pass that follows has nothing to undo. Only when neither body has
room (a pair wedged into a corner) is the remainder split evenly again.

The push moves current and previous positions together, so separation alone
does not add energy. Then, if the resolved velocities still approach along
the axis, an impulse flips that component and scales it by `restitution`.
Pairs already moving apart are left alone.

Coincident centers have no axis; they are separated along +X.

This is O(n²) over all live pairs per sub-step. At tens of nodes that is a
few thousand distance checks per frame, which is the ceiling this world is
built for.
*/

/// A body and the kind of signal node riding on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub body: ParticleBody,
    pub kind: NodeKind,
}

pub struct PhysicsWorld {
    config: PhysicsConfig,
    entities: Vec<Option<Entity>>,
    capacity: usize,
    selected: Option<NodeId>,
    pointer: Option<Vec2>,
    // Indices of occupied slots, rebuilt each sub-step.
    live: Vec<usize>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_capacity(config, MAX_NODES)
    }

    pub fn with_capacity(config: PhysicsConfig, capacity: usize) -> Self {
        Self {
            config,
            entities: Vec::with_capacity(capacity),
            capacity,
            selected: None,
            pointer: None,
            live: Vec::with_capacity(capacity),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entities.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Place a new body at rest in the lowest free slot.
    pub fn spawn(&mut self, position: Vec2, kind: NodeKind) -> SynthResult<NodeId> {
        let entity = Entity {
            body: ParticleBody::new(position),
            kind,
        };

        let index = match self.entities.iter().position(Option::is_none) {
            Some(index) => {
                self.entities[index] = Some(entity);
                index
            }
            None if self.entities.len() < self.capacity => {
                self.entities.push(Some(entity));
                self.entities.len() - 1
            }
            None => {
                warn!(capacity = self.capacity, "cannot spawn: world is full");
                return Err(SynthError::CapacityExhausted {
                    capacity: self.capacity,
                });
            }
        };

        let id = NodeId::from_index(index);
        info!(%id, ?kind, x = position.x, y = position.y, "spawned body");
        Ok(id)
    }

    /// Free the slot of `id`. Clears the selection if it pointed at `id`.
    pub fn remove(&mut self, id: NodeId) -> Option<Entity> {
        let removed = self.entities.get_mut(id.index())?.take();
        if removed.is_some() {
            if self.selected == Some(id) {
                self.selected = None;
            }
            info!(%id, "removed body");
        }
        removed
    }

    pub fn get(&self, id: NodeId) -> Option<&Entity> {
        self.entities.get(id.index())?.as_ref()
    }

    pub fn body(&self, id: NodeId) -> Option<&ParticleBody> {
        self.get(id).map(|entity| &entity.body)
    }

    pub fn body_mut(&mut self, id: NodeId) -> Option<&mut ParticleBody> {
        self.entities
            .get_mut(id.index())?
            .as_mut()
            .map(|entity| &mut entity.body)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|entity| entity.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|e| (NodeId::from_index(index), e)))
    }

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Body whose center is nearest `point`, if within one radius of it.
    pub fn body_at(&self, point: Vec2) -> Option<NodeId> {
        let radius = self.config.radius();
        self.iter()
            .map(|(id, entity)| (id, entity.body.position().distance(point)))
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Select the body under `pointer`.
    ///
    /// An existing selection is kept until `clear_selection`, so a drag never
    /// slides onto a neighbour the pointer happens to cross.
    pub fn set_selection(&mut self, pointer: Vec2) -> Option<NodeId> {
        if self.selected.is_some() {
            return self.selected;
        }
        self.selected = self.body_at(pointer);
        if let Some(id) = self.selected {
            debug!(%id, "selected body");
        }
        self.selected
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn clear_selection(&mut self) -> Option<NodeId> {
        self.selected.take()
    }

    /// Quantize the body's position to the body-diameter grid, at rest.
    ///
    /// With bounds configured the result stays inside the wall inset: a grid
    /// point that would land past a wall is replaced by the nearest one on
    /// the inner side. If no grid point fits on an axis the clamped position
    /// is used for it.
    pub fn snap_to_grid(&mut self, id: NodeId) -> Option<Vec2> {
        let step = self.config.body_diameter;
        let inset = self.inset();
        let body = self.body_mut(id)?;
        let position = body.position();
        let snapped = match inset {
            Some((lo, hi)) => Vec2::new(
                snap_axis(position.x, step, lo.x, hi.x),
                snap_axis(position.y, step, lo.y, hi.y),
            ),
            None => position.quantize(step),
        };
        body.teleport(snapped);
        Some(snapped)
    }

    /// Rectangle a body center may occupy, if bounds are configured.
    fn inset(&self) -> Option<(Vec2, Vec2)> {
        let bounds = self.config.bounds?;
        let radius = self.config.radius();
        Some((
            bounds.min + Vec2::new(radius, radius),
            bounds.max - Vec2::new(radius, radius),
        ))
    }

    /// Advance one visual frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / substeps as f32;

        for _ in 0..substeps {
            self.collect_live();
            self.integrate(sub_dt);
            self.apply_drag();
            self.apply_damping();
            self.resolve_collisions();
            self.apply_bounds();
        }
    }

    fn collect_live(&mut self) {
        self.live.clear();
        self.live.extend(
            self.entities
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.as_ref().map(|_| index)),
        );
    }

    fn integrate(&mut self, sub_dt: f32) {
        for entity in self.entities.iter_mut().flatten() {
            entity.body.integrate(sub_dt);
        }
    }

    fn apply_drag(&mut self) {
        let (Some(id), Some(pointer)) = (self.selected, self.pointer) else {
            return;
        };
        let drag_force = self.config.drag_force;
        let dead_zone = self.config.dead_zone;
        let Some(body) = self.body_mut(id) else {
            return;
        };

        let offset = pointer - body.position();
        if offset.length() > dead_zone {
            body.accelerate(offset * drag_force);
        }
    }

    fn apply_damping(&mut self) {
        let damping = self.config.damping;
        for entity in self.entities.iter_mut().flatten() {
            entity.body.damp(damping);
        }
    }

    fn resolve_collisions(&mut self) {
        if self.live.len() < 2 {
            return;
        }
        let diameter = self.config.body_diameter;
        let restitution = self.config.restitution;
        let inset = self.inset();

        for a in 0..self.live.len() {
            for b in (a + 1)..self.live.len() {
                let (i, j) = (self.live[a], self.live[b]);
                if let Some((first, second)) = pair_mut(&mut self.entities, i, j) {
                    resolve_pair(&mut first.body, &mut second.body, diameter, restitution, inset);
                }
            }
        }
    }

    fn apply_bounds(&mut self) {
        let Some((lo, hi)) = self.inset() else {
            return;
        };
        let restitution = self.config.restitution;

        for entity in self.entities.iter_mut().flatten() {
            let body = &mut entity.body;
            if lo.x <= hi.x {
                let x = body.position().x;
                if x < lo.x || x > hi.x {
                    let wall = x.clamp(lo.x, hi.x);
                    body.translate(Vec2::new(wall - x, 0.0));
                    let v = body.velocity();
                    let into_wall = (x < lo.x && v.x < 0.0) || (x > hi.x && v.x > 0.0);
                    if into_wall {
                        body.set_velocity(Vec2::new(-v.x * restitution, v.y));
                    }
                }
            }
            if lo.y <= hi.y {
                let y = body.position().y;
                if y < lo.y || y > hi.y {
                    let wall = y.clamp(lo.y, hi.y);
                    body.translate(Vec2::new(0.0, wall - y));
                    let v = body.velocity();
                    let into_wall = (y < lo.y && v.y < 0.0) || (y > hi.y && v.y > 0.0);
                    if into_wall {
                        body.set_velocity(Vec2::new(v.x, -v.y * restitution));
                    }
                }
            }
        }
    }
}

/// Separate two overlapping bodies and bounce them if they still approach.
fn resolve_pair(
    a: &mut ParticleBody,
    b: &mut ParticleBody,
    diameter: f32,
    restitution: f32,
    inset: Option<(Vec2, Vec2)>,
) {
    let delta = b.position() - a.position();
    let distance_sq = delta.length_squared();
    if distance_sq >= diameter * diameter {
        return;
    }

    let distance = distance_sq.sqrt();
    let axis = delta.normalize_or(Vec2::X);
    let overlap = diameter - distance;
    let (room_a, room_b) = match inset {
        Some((lo, hi)) => (room(a.position(), -axis, lo, hi), room(b.position(), axis, lo, hi)),
        None => (f32::INFINITY, f32::INFINITY),
    };

    let half = overlap * 0.5;
    let mut share_a = half.min(room_a);
    let share_b = (overlap - share_a).min(room_b);
    share_a = (overlap - share_b).min(room_a);
    let leftover = (overlap - share_a - share_b).max(0.0) * 0.5;
    a.translate(-axis * (share_a + leftover));
    b.translate(axis * (share_b + leftover));

    let approach = (b.velocity() - a.velocity()).dot(axis);
    if approach > 0.0 {
        return;
    }
    // Equal masses: each body takes half of the velocity change.
    let impulse = axis * (-(1.0 + restitution) * approach * 0.5);
    a.set_velocity(a.velocity() - impulse);
    b.set_velocity(b.velocity() + impulse);
}

/// Distance `position` can travel along `direction` before leaving `[lo, hi]`.
fn room(position: Vec2, direction: Vec2, lo: Vec2, hi: Vec2) -> f32 {
    room_on_axis(position.x, direction.x, lo.x, hi.x)
        .min(room_on_axis(position.y, direction.y, lo.y, hi.y))
}

fn room_on_axis(at: f32, direction: f32, lo: f32, hi: f32) -> f32 {
    const PARALLEL: f32 = 1e-6;
    if lo > hi {
        // Axis too narrow for a body; bounds leave it alone.
        f32::INFINITY
    } else if direction > PARALLEL {
        ((hi - at) / direction).max(0.0)
    } else if direction < -PARALLEL {
        ((lo - at) / direction).max(0.0)
    } else {
        f32::INFINITY
    }
}

/// Nearest multiple of `step` inside `[lo, hi]`, falling back to the clamp.
fn snap_axis(at: f32, step: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return if step > 0.0 { (at / step).round() * step } else { at };
    }
    let clamped = at.clamp(lo, hi);
    if step <= 0.0 {
        return clamped;
    }
    let mut snapped = (clamped / step).round() * step;
    if snapped > hi {
        snapped = (hi / step).floor() * step;
    } else if snapped < lo {
        snapped = (lo / step).ceil() * step;
    }
    if (lo..=hi).contains(&snapped) {
        snapped
    } else {
        clamped
    }
}

fn pair_mut(entities: &mut [Option<Entity>], i: usize, j: usize) -> Option<(&mut Entity, &mut Entity)> {
    debug_assert!(i < j);
    let (head, tail) = entities.split_at_mut(j);
    match (head[i].as_mut(), tail[0].as_mut()) {
        (Some(first), Some(second)) => Some((first, second)),
        _ => None,
    }
}
