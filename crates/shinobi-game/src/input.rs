//! Input system with action-based mapping
//!
//! Turns raw key events into a per-frame snapshot of held actions and
//! down-edges. Controllers only ever see the snapshot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Hold to block (S by default)
    Defend,
    /// Move left (Left arrow by default)
    MoveLeft,
    /// Move right (Right arrow by default)
    MoveRight,
    /// Run modifier (either Shift by default)
    Run,
    /// Jump (Space by default)
    Jump,
    /// Fast melee attack (Z by default)
    AttackFast,
    /// Strong melee attack (X by default)
    AttackStrong,
    /// Special melee attack (C by default)
    AttackSpecial,
    /// Ranged attack (A by default)
    Shoot,
}

impl InputAction {
    pub const ALL: [InputAction; 9] = [
        InputAction::Defend,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Run,
        InputAction::Jump,
        InputAction::AttackFast,
        InputAction::AttackStrong,
        InputAction::AttackSpecial,
        InputAction::Shoot,
    ];
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that went from released to pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Mark an action pressed. Only the first press while released is a down-edge.
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.clear_frame();
    }
}

/// Maps physical keys to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, InputAction>,
    /// Reverse lookup: action to all keys
    reverse: HashMap<InputAction, Vec<KeyCode>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        };

        // Stance and movement
        bindings.bind(KeyCode::KeyS, InputAction::Defend);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Run);
        bindings.bind(KeyCode::ShiftRight, InputAction::Run);
        bindings.bind(KeyCode::Space, InputAction::Jump);

        // Combat
        bindings.bind(KeyCode::KeyZ, InputAction::AttackFast);
        bindings.bind(KeyCode::KeyX, InputAction::AttackStrong);
        bindings.bind(KeyCode::KeyC, InputAction::AttackSpecial);
        bindings.bind(KeyCode::KeyA, InputAction::Shoot);

        bindings
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action, replacing whatever the key was bound to before
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.unbind(key);
        self.bindings.insert(key, action);
        self.reverse.entry(action).or_default().push(key);
    }

    pub fn unbind(&mut self, key: KeyCode) {
        if let Some(action) = self.bindings.remove(&key) {
            if let Some(keys) = self.reverse.get_mut(&action) {
                keys.retain(|k| *k != key);
            }
        }
    }

    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to an action
    pub fn keys_for(&self, action: InputAction) -> &[KeyCode] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Input handler that processes raw key events and updates state
#[derive(Debug, Default)]
pub struct InputHandler {
    pub state: InputState,
    pub bindings: InputBindings,
    /// Physical keys currently down, so two keys on one action release correctly
    pressed_keys: HashSet<KeyCode>,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event. OS key-repeat presses never produce a second down-edge.
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        let PhysicalKey::Code(key_code) = physical_key else {
            return;
        };
        let Some(action) = self.bindings.get_key_action(key_code) else {
            return;
        };

        match element_state {
            ElementState::Pressed => {
                self.pressed_keys.insert(key_code);
                self.state.press(action);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
                let still_held = self
                    .bindings
                    .keys_for(action)
                    .iter()
                    .any(|k| self.pressed_keys.contains(k));
                if !still_held {
                    self.state.release(action);
                }
            }
        }
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(bindings.get_key_action(KeyCode::KeyS), Some(InputAction::Defend));
        assert_eq!(bindings.get_key_action(KeyCode::Space), Some(InputAction::Jump));
        assert_eq!(bindings.get_key_action(KeyCode::KeyA), Some(InputAction::Shoot));
        assert_eq!(bindings.keys_for(InputAction::Run).len(), 2);
    }

    #[test]
    fn test_rebind_replaces_old_action() {
        let mut bindings = InputBindings::default();
        bindings.bind(KeyCode::KeyZ, InputAction::Shoot);
        assert_eq!(bindings.get_key_action(KeyCode::KeyZ), Some(InputAction::Shoot));
        assert!(bindings.keys_for(InputAction::AttackFast).is_empty());
    }

    #[test]
    fn test_input_state() {
        let mut state = InputState::new();
        state.press(InputAction::MoveRight);
        state.press(InputAction::Jump);

        assert!(state.is_held(InputAction::MoveRight));
        assert!(state.is_just_pressed(InputAction::Jump));
        assert!(!state.is_held(InputAction::Run));

        state.clear_frame();
        assert!(state.is_held(InputAction::MoveRight));
        assert!(!state.is_just_pressed(InputAction::Jump));
    }

    #[test]
    fn test_key_repeat_is_single_edge() {
        let mut handler = InputHandler::new();
        let space = PhysicalKey::Code(KeyCode::Space);

        handler.handle_keyboard(space, ElementState::Pressed);
        assert!(handler.state.is_just_pressed(InputAction::Jump));
        handler.end_frame();

        handler.handle_keyboard(space, ElementState::Pressed);
        assert!(!handler.state.is_just_pressed(InputAction::Jump));
        assert!(handler.state.is_held(InputAction::Jump));

        handler.handle_keyboard(space, ElementState::Released);
        handler.end_frame();
        handler.handle_keyboard(space, ElementState::Pressed);
        assert!(handler.state.is_just_pressed(InputAction::Jump));
    }

    #[test]
    fn test_press_and_release_same_frame_still_edges() {
        let mut handler = InputHandler::new();
        let z = PhysicalKey::Code(KeyCode::KeyZ);
        handler.handle_keyboard(z, ElementState::Pressed);
        handler.handle_keyboard(z, ElementState::Released);
        assert!(handler.state.is_just_pressed(InputAction::AttackFast));
        assert!(!handler.state.is_held(InputAction::AttackFast));
    }

    #[test]
    fn test_both_shift_keys_hold_run() {
        let mut handler = InputHandler::new();
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::ShiftLeft), ElementState::Pressed);
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::ShiftRight), ElementState::Pressed);
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::ShiftLeft), ElementState::Released);
        assert!(handler.state.is_held(InputAction::Run));
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::ShiftRight), ElementState::Released);
        assert!(!handler.state.is_held(InputAction::Run));
    }
}
