use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultsmithError>;

#[derive(Error, Debug)]
pub enum VaultsmithError {
  #[error("Invalid value for '{field}': {reason}")]
  InvalidInput { field: String, reason: String },

  #[error("'{field}' is zero and cannot be used as a divisor")]
  ZeroDenominator { field: String },

  #[error("View history is empty")]
  EmptyViewHistory,

  #[error("No metrics available for channel '{channel}'")]
  UnknownChannel { channel: String },

  #[error("Invalid configuration: {reason}")]
  InvalidConfig { reason: String },

  #[error("Failed to compile search pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl VaultsmithError {
  pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::InvalidInput { field: field.into(), reason: reason.into() }
  }

  pub fn zero_denominator(field: impl Into<String>) -> Self {
    Self::ZeroDenominator { field: field.into() }
  }

  pub fn unknown_channel(channel: impl Into<String>) -> Self {
    Self::UnknownChannel { channel: channel.into() }
  }

  pub fn invalid_config(reason: impl Into<String>) -> Self {
    Self::InvalidConfig { reason: reason.into() }
  }
}

/// Reject NaN and infinities before they reach a formula
pub fn ensure_finite(field: &str, value: f64) -> Result<f64> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(VaultsmithError::invalid_input(field, format!("expected a finite number, got {value}")))
  }
}

pub fn ensure_non_negative(field: &str, value: f64) -> Result<f64> {
  let value = ensure_finite(field, value)?;
  if value < 0.0 {
    return Err(VaultsmithError::invalid_input(field, format!("must not be negative, got {value}")));
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_messages_name_the_field() {
    let err = VaultsmithError::invalid_input("cost_per_mille", "must be positive");
    assert_eq!(err.to_string(), "Invalid value for 'cost_per_mille': must be positive");

    let err = VaultsmithError::zero_denominator("subscriber_count");
    assert!(err.to_string().contains("subscriber_count"));
  }

  #[test]
  fn test_ensure_finite() {
    assert_eq!(ensure_finite("x", 1.5).unwrap(), 1.5);
    assert!(ensure_finite("x", f64::NAN).is_err());
    assert!(ensure_finite("x", f64::INFINITY).is_err());
  }

  #[test]
  fn test_ensure_non_negative() {
    assert_eq!(ensure_non_negative("x", 0.0).unwrap(), 0.0);
    assert!(matches!(
      ensure_non_negative("principal", -1.0),
      Err(VaultsmithError::InvalidInput { ref field, .. }) if field == "principal"
    ));
  }
}
