//! Backend-neutral keys.
//!
//! Windowing backends report keys with their own native codes. A [`KeyTable`] maps the closed set
//! of [`Key`] symbols to those codes, so that effects can compare incoming codes against
//! `K::code(Key::Space)` without knowing which backend runs them.

use std::fmt;

/// Key symbols known to every backend.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Key {
  Escape,
  Space,
  Enter,
  PageUp,
  PageDown,
  A,
  B,
  C,
  D,
  E,
  F,
  G,
  H,
  I,
  J,
  K,
  L,
  M,
  N,
  O,
  P,
  Q,
  R,
  S,
  T,
  U,
  V,
  W,
  X,
  Y,
  Z,
}

impl Key {
  /// Every key symbol.
  pub const ALL: [Key; 31] = [
    Key::Escape,
    Key::Space,
    Key::Enter,
    Key::PageUp,
    Key::PageDown,
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
  ];

  /// Symbolic name of the key, such as `"ESCAPE"`, `"PAGE_UP"` or `"A"`.
  pub fn name(self) -> &'static str {
    match self {
      Key::Escape => "ESCAPE",
      Key::Space => "SPACE",
      Key::Enter => "ENTER",
      Key::PageUp => "PAGE_UP",
      Key::PageDown => "PAGE_DOWN",
      Key::A => "A",
      Key::B => "B",
      Key::C => "C",
      Key::D => "D",
      Key::E => "E",
      Key::F => "F",
      Key::G => "G",
      Key::H => "H",
      Key::I => "I",
      Key::J => "J",
      Key::K => "K",
      Key::L => "L",
      Key::M => "M",
      Key::N => "N",
      Key::O => "O",
      Key::P => "P",
      Key::Q => "Q",
      Key::R => "R",
      Key::S => "S",
      Key::T => "T",
      Key::U => "U",
      Key::V => "V",
      Key::W => "W",
      Key::X => "X",
      Key::Y => "Y",
      Key::Z => "Z",
    }
  }

  /// Parse a symbolic name back, case-insensitively.
  pub fn from_name(name: &str) -> Option<Self> {
    Key::ALL
      .iter()
      .copied()
      .find(|key| key.name().eq_ignore_ascii_case(name))
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.write_str(self.name())
  }
}

/// Key actions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
  /// The key went down.
  Press,
  /// The key went up.
  Release,
}

/// Static mapping between [`Key`] symbols and a backend’s native codes.
///
/// Implementors only provide [`KeyTable::code`] and the action constants; reverse lookups are
/// derived from them.
pub trait KeyTable {
  /// Native code of a key press.
  const ACTION_PRESS: i32;

  /// Native code of a key release.
  const ACTION_RELEASE: i32;

  /// Native code of a key.
  fn code(key: Key) -> i32;

  /// Key symbol of a native code, if it’s one of the known symbols.
  fn key(code: i32) -> Option<Key> {
    Key::ALL.iter().copied().find(|&key| Self::code(key) == code)
  }

  /// Action of a native action code.
  fn action(action: i32) -> Option<Action> {
    if action == Self::ACTION_PRESS {
      Some(Action::Press)
    } else if action == Self::ACTION_RELEASE {
      Some(Action::Release)
    } else {
      None
    }
  }
}

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Modifiers {
  /// Either shift key.
  pub shift: bool,
  /// Either control key.
  pub control: bool,
  /// Either alt key.
  pub alt: bool,
}

/// A key event, in native codes.
///
/// Codes are the backend’s own; translate them with the backend’s [`KeyTable`] or
/// [`KeyEvent::key`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct KeyEvent {
  /// Native key code.
  pub code: i32,
  /// Native action code.
  pub action: i32,
  /// Held modifiers. Backends currently don’t report them.
  pub modifiers: Option<Modifiers>,
}

impl KeyEvent {
  /// Key symbol, according to a key table.
  pub fn key<K>(&self) -> Option<Key>
  where
    K: KeyTable,
  {
    K::key(self.code)
  }

  /// Action, according to a key table.
  pub fn action<K>(&self) -> Option<Action>
  where
    K: KeyTable,
  {
    K::action(self.action)
  }

  /// Is this the press of `key`?
  pub fn is_press<K>(&self, key: Key) -> bool
  where
    K: KeyTable,
  {
    self.code == K::code(key) && self.action == K::ACTION_PRESS
  }
}
