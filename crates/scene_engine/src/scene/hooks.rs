//! Lifecycle phases, registered callbacks and attachable behaviors
//!
//! Every entity runs four phases: Preload, Ready, Update and Draw. Per
//! entity, a phase runs the behaviors ordered before the owner, then the
//! owner's own hook, then registered callbacks, then the behaviors ordered
//! after the owner. Preload is the exception: children are preloaded right
//! after the own hook, before callbacks, so a subtree is fully preloaded
//! before its root's callbacks observe it.

use crate::scene::{EntityId, SceneResult, World};

/// Lifecycle phase cascaded through the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Runs before an entity becomes reachable from its new parent
    Preload,
    /// Runs when an entity enters a tree that is already live
    Ready,
    /// Runs once per tick
    Update,
    /// Runs once per tick after update
    Draw,
}

/// Callback registered for the Preload or Ready phase
pub type LifecycleHook = Box<dyn FnMut(&mut World, EntityId) -> SceneResult>;

/// Callback registered for the Update or Draw phase; receives `dt` in seconds
pub type FrameHook = Box<dyn FnMut(&mut World, EntityId, f32) -> SceneResult>;

/// Per-phase callback lists, kept in registration order
#[derive(Default)]
pub(crate) struct PhaseHooks {
    pub(crate) preload: Vec<LifecycleHook>,
    pub(crate) ready: Vec<LifecycleHook>,
    pub(crate) update: Vec<FrameHook>,
    pub(crate) draw: Vec<FrameHook>,
}

impl PhaseHooks {
    pub(crate) fn lifecycle_mut(&mut self, phase: Phase) -> &mut Vec<LifecycleHook> {
        match phase {
            Phase::Preload => &mut self.preload,
            _ => &mut self.ready,
        }
    }

    pub(crate) fn frame_mut(&mut self, phase: Phase) -> &mut Vec<FrameHook> {
        match phase {
            Phase::Draw => &mut self.draw,
            _ => &mut self.update,
        }
    }
}

/// Where a behavior runs relative to its owner's own hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookOrder {
    /// Run before the owner's own hook
    #[default]
    BeforeOwner,
    /// Run after the owner's registered callbacks
    AfterOwner,
}

/// Reusable capability attached to an entity
///
/// All phase methods default to doing nothing, so a behavior only
/// implements the phases it cares about.
pub trait Behavior {
    /// Ordering relative to the owner's own hook
    fn order(&self) -> HookOrder {
        HookOrder::BeforeOwner
    }

    /// Preload phase; an error aborts the attach of the owner's subtree
    fn preload(&mut self, _world: &mut World, _owner: EntityId) -> SceneResult {
        Ok(())
    }

    /// Ready phase
    fn ready(&mut self, _world: &mut World, _owner: EntityId) -> SceneResult {
        Ok(())
    }

    /// Update phase
    fn update(&mut self, _world: &mut World, _owner: EntityId, _dt: f32) -> SceneResult {
        Ok(())
    }

    /// Draw phase
    fn draw(&mut self, _world: &mut World, _owner: EntityId, _dt: f32) -> SceneResult {
        Ok(())
    }
}
