use std::fmt;

/// IR value kinds a temporary can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
  /// 32-bit integer.
  Word,
}

impl ValueType {
  /// Base-type letter used in assignments and signatures.
  pub fn suffix(self) -> char {
    match self {
      Self::Word => 'w',
    }
  }
}

impl fmt::Display for ValueType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.suffix())
  }
}
