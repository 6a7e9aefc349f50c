//! Keyboard and mouse state fed by the host window's event queue

use std::collections::HashSet;

use glam::Vec2;

/// Keys the games respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Q,
    R,
}

/// One window-system event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer position in playfield pixels
    MouseMove(Vec2),
    /// Window close
    Quit,
}

/// Held keys plus this tick's edges
#[derive(Debug, Default, Clone)]
pub struct ManualInput {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
    mouse: Option<Vec2>,
    quit: bool,
}

impl ManualInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                // Ignore auto-repeat
                if self.held.insert(key) {
                    self.pressed.insert(key);
                }
            }
            InputEvent::KeyUp(key) => {
                if self.held.remove(&key) {
                    self.released.insert(key);
                }
            }
            InputEvent::MouseMove(pos) => self.mouse = Some(pos),
            InputEvent::Quit => self.quit = true,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Either key is held
    pub fn any_held(&self, a: Key, b: Key) -> bool {
        self.is_held(a) || self.is_held(b)
    }

    /// Key went down this tick
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Key came up this tick
    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Last pointer position, if the pointer ever moved
    pub fn mouse(&self) -> Option<Vec2> {
        self.mouse
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Clear one-shot edges after a tick has consumed them
    pub fn end_tick(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}
