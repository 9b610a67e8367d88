//! # Message envelope.
//!
//! [`Envelope`] pairs a frequency with the published payload. One envelope is built per
//! publish and shared (`Arc`) by every subscriber the publish fans out to; it is dropped
//! once the last handler is done with it.
//!
//! Frequencies are matched exactly. The empty string is a legal frequency.

/// Immutable `(frequency, payload)` pair delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<P> {
    frequency: String,
    payload: P,
}

impl<P> Envelope<P> {
    /// Creates a new envelope. No validation is performed on the frequency.
    pub fn new(frequency: impl Into<String>, payload: P) -> Self {
        Self {
            frequency: frequency.into(),
            payload,
        }
    }

    /// Frequency the envelope was published on.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Published payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes the envelope and returns its parts.
    pub fn into_parts(self) -> (String, P) {
        (self.frequency, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frequency_is_distinct() {
        let empty = Envelope::new("", 1u8);
        let named = Envelope::new("a", 1u8);

        assert_eq!(empty.frequency(), "");
        assert_ne!(empty, named);
    }

    #[test]
    fn test_into_parts() {
        let env = Envelope::new("event1", vec![1, 2, 3]);
        assert_eq!(env.payload(), &vec![1, 2, 3]);

        let (freq, payload) = env.into_parts();
        assert_eq!(freq, "event1");
        assert_eq!(payload.len(), 3);
    }
}
