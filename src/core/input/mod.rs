//=========================================================================
// Input System
//=========================================================================
//
// Turns batches of raw key events into simulation commands.
//
// Responsibilities:
// - Track held keys so only key-down edges count
// - Resolve each edge through the rebindable CommandMapper
// - Preserve event order across batches
//
// This system is owned and updated by the CoreSystemsOrchestrator on the
// logic thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod command;
pub mod command_mapper;
pub mod event;
pub mod key_tracker;

//=== Public API ==========================================================

pub use command::Command;
pub use command_mapper::CommandMapper;
pub use event::{InputEvent, KeyCode};
pub use key_tracker::KeyTracker;

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== InputSystem =========================================================

/// Owns key state and bindings; produces commands in event order.
#[derive(Debug, Default)]
pub struct InputSystem {
    tracker: KeyTracker,
    mapper: CommandMapper,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates a system with the default bindings.
    pub fn new() -> Self {
        Self::with_mapper(CommandMapper::with_defaults())
    }

    pub fn with_mapper(mapper: CommandMapper) -> Self {
        Self {
            tracker: KeyTracker::new(),
            mapper,
        }
    }

    //--- update() ---------------------------------------------------------

    /// Consumes this frame's input batches and returns the commands they
    /// produced, oldest first.
    pub fn update(&mut self, input_batches: &mut Vec<Vec<InputEvent>>) -> Vec<Command> {
        let mut commands = Vec::new();

        for batch in input_batches.drain(..) {
            for key in self.tracker.process_events(&batch) {
                match self.mapper.map_key(*key) {
                    Some(command) => commands.push(command),
                    None => trace!(target: "input", "Unbound key {:?}", key),
                }
            }
        }

        if !commands.is_empty() {
            trace!(target: "input", "Commands this frame: {:?}", commands);
        }
        commands
    }

    /// Treats every held key as released.
    pub fn release_all(&mut self) {
        debug!(target: "input", "Releasing all held keys");
        self.tracker.reset();
    }

    //--- Accessors --------------------------------------------------------

    pub fn mapper(&self) -> &CommandMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut CommandMapper {
        &mut self.mapper
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.tracker.is_key_down(key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn key_press_produces_bound_command() {
        let mut system = InputSystem::new();

        let mut batches = vec![vec![key_down(KeyCode::Space)]];
        assert_eq!(system.update(&mut batches), vec![Command::Jump]);
        assert!(batches.is_empty(), "batches are drained");
        assert!(system.is_key_down(KeyCode::Space));
    }

    #[test]
    fn held_key_fires_once_across_frames() {
        let mut system = InputSystem::new();

        let mut first = vec![vec![key_down(KeyCode::KeyD)]];
        let mut repeat = vec![vec![key_down(KeyCode::KeyD)], vec![key_down(KeyCode::KeyD)]];

        assert_eq!(system.update(&mut first), vec![Command::Speed]);
        assert!(system.update(&mut repeat).is_empty());
    }

    #[test]
    fn order_is_preserved_across_batches() {
        let mut system = InputSystem::new();

        let mut batches = vec![
            vec![key_down(KeyCode::KeyD), key_up(KeyCode::KeyD)],
            vec![key_down(KeyCode::KeyD), key_down(KeyCode::KeyS)],
        ];

        assert_eq!(
            system.update(&mut batches),
            vec![Command::Speed, Command::Speed, Command::Slow]
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut system = InputSystem::new();
        let mut batches = vec![vec![key_down(KeyCode::KeyQ), key_down(KeyCode::Unidentified)]];
        assert!(system.update(&mut batches).is_empty());
    }

    #[test]
    fn release_all_allows_new_edge() {
        let mut system = InputSystem::new();
        let mut first = vec![vec![key_down(KeyCode::Space)]];
        system.update(&mut first);

        system.release_all();

        let mut again = vec![vec![key_down(KeyCode::Space)]];
        assert_eq!(system.update(&mut again), vec![Command::Jump]);
    }

    #[test]
    fn rebinding_takes_effect() {
        let mut system = InputSystem::new();
        system.mapper_mut().bind(KeyCode::ArrowUp, Command::Lift);

        let mut batches = vec![vec![key_down(KeyCode::ArrowUp)]];
        assert_eq!(system.update(&mut batches), vec![Command::Lift]);
    }
}
