use super::types::Side;

/// What a key means to the game, independent of the physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Up,
    Down,
    /// Forward nudge and ability key in play.
    Confirm,
    /// Backward nudge and passive key in play.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    pub side: Side,
    pub role: KeyRole,
}

impl LogicalKey {
    pub const fn new(side: Side, role: KeyRole) -> Self {
        Self { side, role }
    }

    fn bit(self) -> u8 {
        let role = match self.role {
            KeyRole::Up => 0,
            KeyRole::Down => 1,
            KeyRole::Confirm => 2,
            KeyRole::Cancel => 3,
        };
        1 << (self.side.index() * 4 + role)
    }

    pub fn is_movement(self) -> bool {
        matches!(self.role, KeyRole::Up | KeyRole::Down)
    }

    /// D for P1, the right arrow for P2. Readies a player in the menu.
    pub fn points_right(self) -> bool {
        matches!(
            (self.side, self.role),
            (Side::Left, KeyRole::Confirm) | (Side::Right, KeyRole::Cancel)
        )
    }
}

/// Discrete input delivered to the tick, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(LogicalKey),
    Resize { width: f32, height: f32 },
}

/// Keys currently held down, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn press(&mut self, key: LogicalKey) {
        self.0 |= key.bit();
    }

    pub fn with(mut self, key: LogicalKey) -> Self {
        self.press(key);
        self
    }

    pub fn is_held(&self, key: LogicalKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn role_held(&self, side: Side, role: KeyRole) -> bool {
        self.is_held(LogicalKey::new(side, role))
    }

    /// -1 up, +1 down, 0 for none or both.
    pub fn vertical_dir(&self, side: Side) -> f32 {
        let up = if self.role_held(side, KeyRole::Up) { -1.0 } else { 0.0 };
        let down = if self.role_held(side, KeyRole::Down) { 1.0 } else { 0.0 };
        up + down
    }
}
