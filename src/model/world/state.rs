use crate::model::assets::SpeciesRuntime;
use crate::model::world::{AgentSnapshot, World};
use glam::Vec3;
use shoal_data::{
    Heading, Identity, Position, Rig, SpeciesId, SpeciesProfile, Steering, SwimBox, Velocity,
    Visual, Wiggle,
};

type SnapshotComponents<'a> = (
    &'a Identity,
    &'a Position,
    &'a Velocity,
    &'a Heading,
    &'a Steering,
    &'a Visual,
    &'a Wiggle,
    Option<&'a Rig>,
);

fn snapshot_of(species: &[SpeciesProfile], row: SnapshotComponents) -> AgentSnapshot {
    let (identity, pos, vel, heading, steering, visual, wiggle, rig) = row;
    AgentSnapshot {
        id: identity.id,
        species: identity.species,
        species_key: species
            .get(identity.species)
            .map(|s| s.key.clone())
            .unwrap_or_default(),
        position: pos.0,
        velocity: vel.0,
        heading: heading.0,
        target: steering.target,
        speed_min: steering.speed_min,
        speed_max: steering.speed_max,
        visible: visual.visible,
        wiggle_phase: wiggle.phase,
        wiggle_disabled: wiggle.disabled,
        skinned: rig.is_some(),
    }
}

/// Read-only window onto a [`World`]; no way to mutate through it.
pub struct WorldView<'a> {
    world: &'a World,
}

impl<'a> WorldView<'a> {
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.world.time
    }

    #[must_use]
    pub fn observer(&self) -> Vec3 {
        self.world.observer
    }

    #[must_use]
    pub fn swim_box(&self) -> &'a SwimBox {
        &self.world.swim_box
    }

    #[must_use]
    pub fn species(&self) -> &'a [SpeciesProfile] {
        &self.world.config.species
    }

    #[must_use]
    pub fn runtime(&self, species: SpeciesId) -> Option<&'a SpeciesRuntime> {
        self.world.runtimes.get(species)
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.world.population()
    }

    #[must_use]
    pub fn population_of(&self, species: SpeciesId) -> usize {
        self.world
            .ecs
            .query::<&Identity>()
            .iter()
            .filter(|(_, identity)| identity.species == species)
            .count()
    }

    #[must_use]
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        self.world.snapshots()
    }
}

impl World {
    #[must_use]
    pub fn view(&self) -> WorldView<'_> {
        WorldView { world: self }
    }

    /// Every live agent, ordered by id.
    #[must_use]
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        let mut query = self.ecs.query::<SnapshotComponents>();
        let mut out: Vec<AgentSnapshot> = query
            .iter()
            .map(|(_, row)| snapshot_of(&self.config.species, row))
            .collect();
        out.sort_by_key(|s| s.id);
        out
    }

    #[must_use]
    pub fn agent(&self, handle: hecs::Entity) -> Option<AgentSnapshot> {
        let mut query = self.ecs.query_one::<SnapshotComponents>(handle).ok()?;
        let row = query.get()?;
        Some(snapshot_of(&self.config.species, row))
    }

    /// Live agent handles, ordered by agent id.
    #[must_use]
    pub fn handles(&self) -> Vec<hecs::Entity> {
        let mut rows: Vec<_> = self
            .ecs
            .query::<&Identity>()
            .iter()
            .map(|(handle, identity)| (identity.id, handle))
            .collect();
        rows.sort_by_key(|row| row.0);
        rows.into_iter().map(|(_, handle)| handle).collect()
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.ecs.query::<&Identity>().iter().count()
    }

    #[must_use]
    pub fn swim_box(&self) -> &SwimBox {
        &self.swim_box
    }

    #[must_use]
    pub fn species(&self) -> &[SpeciesProfile] {
        &self.config.species
    }
}
