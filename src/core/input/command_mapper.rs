//=========================================================================
// Command Mapper
//=========================================================================
//
// Maps keys to commands via a rebindable lookup table.
//
// Architecture:
//   KeyCode → HashMap → Command
//
// Several keys may map to the same command; a key maps to at most one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::command::Command;
use super::event::KeyCode;

//=== CommandMapper =======================================================

/// Key → command bindings.
#[derive(Debug, Clone)]
pub struct CommandMapper {
    bindings: HashMap<KeyCode, Command>,
}

impl CommandMapper {
    /// Creates a mapper with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Creates a mapper with the default layout:
    /// `S` slow, `D` speed, `W` lift, `Space` jump.
    pub fn with_defaults() -> Self {
        let mut mapper = Self::empty();
        mapper.bind(KeyCode::KeyS, Command::Slow);
        mapper.bind(KeyCode::KeyD, Command::Speed);
        mapper.bind(KeyCode::KeyW, Command::Lift);
        mapper.bind(KeyCode::Space, Command::Jump);
        mapper
    }

    //--- Binding API ------------------------------------------------------

    /// Binds `key` to `command`, returning the command it replaced.
    pub fn bind(&mut self, key: KeyCode, command: Command) -> Option<Command> {
        let previous = self.bindings.insert(key, command);
        debug!(target: "input", "Bound {:?} -> {:?} (was {:?})", key, command, previous);
        previous
    }

    //--- Lookup -----------------------------------------------------------

    pub fn map_key(&self, key: KeyCode) -> Option<Command> {
        self.bindings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for CommandMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Defaults
    //=====================================================================

    #[test]
    fn default_layout() {
        let mapper = CommandMapper::default();

        assert_eq!(mapper.map_key(KeyCode::KeyS), Some(Command::Slow));
        assert_eq!(mapper.map_key(KeyCode::KeyD), Some(Command::Speed));
        assert_eq!(mapper.map_key(KeyCode::KeyW), Some(Command::Lift));
        assert_eq!(mapper.map_key(KeyCode::Space), Some(Command::Jump));
        assert_eq!(mapper.len(), 4);
    }

    #[test]
    fn unknown_key_maps_to_nothing() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.map_key(KeyCode::KeyQ), None);
        assert_eq!(mapper.map_key(KeyCode::Unidentified), None);
    }

    //=====================================================================
    // Rebinding
    //=====================================================================

    #[test]
    fn bind_replaces_previous_command() {
        let mut mapper = CommandMapper::default();

        let previous = mapper.bind(KeyCode::Space, Command::Lift);

        assert_eq!(previous, Some(Command::Jump));
        assert_eq!(mapper.map_key(KeyCode::Space), Some(Command::Lift));
    }

    #[test]
    fn several_keys_can_share_a_command() {
        let mut mapper = CommandMapper::default();
        mapper.bind(KeyCode::ArrowUp, Command::Jump);

        assert_eq!(mapper.map_key(KeyCode::ArrowUp), Some(Command::Jump));
        assert_eq!(mapper.map_key(KeyCode::Space), Some(Command::Jump));
        assert_eq!(mapper.len(), 5);
    }

    #[test]
    fn empty_mapper_maps_nothing() {
        let mapper = CommandMapper::empty();

        assert!(mapper.is_empty());
        assert_eq!(mapper.map_key(KeyCode::Space), None);
    }
}
