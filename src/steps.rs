use std::fmt;

use tracing::debug;

/// Ordered, human-readable derivation trace produced by one solve call.
///
/// Steps can only be appended; every recorded step is also emitted as a
/// `debug` tracing event under the `inkmath::steps` target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Steps(Vec<String>);

impl Steps {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, step: impl Into<String>) {
    let step = step.into();
    debug!(target: "inkmath::steps", "{}", step);
    self.0.push(step);
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  /// Case-insensitive search over all recorded steps.
  pub fn mentions(&self, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    self.0.iter().any(|s| s.to_lowercase().contains(&needle))
  }
}

impl fmt::Display for Steps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, step) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{}. {}", i + 1, step)?;
    }
    Ok(())
  }
}
