//! Runtime values the server negotiates and that are never saved.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Byte limit for chat text until the server announces `chat_max`.
pub const DEFAULT_MAX_CHAT_BYTES: usize = 4096;

/// Values set from server `VAR` messages and read by the send path.
///
/// There's one writer (the `VAR` handler) and a few readers (the send
/// loop on every cycle, reply builders), so each field is its own atomic
/// instead of sitting behind the state gate.
#[derive(Debug)]
pub struct TransientState {
    max_chat_bytes: AtomicUsize,
    /// `f64` seconds stored as raw bits. Always a valid, non-negative
    /// duration; setters reject anything else.
    send_delay_bits: AtomicU64,
}

impl TransientState {
    pub fn new() -> Self {
        Self {
            max_chat_bytes: AtomicUsize::new(DEFAULT_MAX_CHAT_BYTES),
            send_delay_bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Largest outbound chat message, in UTF-8 bytes.
    pub fn max_chat_bytes(&self) -> usize {
        self.max_chat_bytes.load(Ordering::Relaxed)
    }

    pub fn set_max_chat_bytes(&self, bytes: usize) {
        self.max_chat_bytes.store(bytes, Ordering::Relaxed);
    }

    /// Server-announced minimum gap between sent commands.
    pub fn send_delay(&self) -> Duration {
        let secs = f64::from_bits(self.send_delay_bits.load(Ordering::Relaxed));
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }

    /// Sets the send delay from a number of seconds.
    ///
    /// Returns the stored delay, or `None` (leaving the old value) when
    /// `secs` is negative, NaN, or too large to be a [`Duration`].
    pub fn set_send_delay_secs(&self, secs: f64) -> Option<Duration> {
        let delay = Duration::try_from_secs_f64(secs).ok()?;
        self.send_delay_bits.store(secs.to_bits(), Ordering::Relaxed);
        Some(delay)
    }
}

impl Default for TransientState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_defaults() {
        let transient = TransientState::new();
        assert_eq!(transient.max_chat_bytes(), 4096);
        assert_eq!(transient.send_delay(), Duration::ZERO);
    }

    #[test]
    fn test_set_max_chat_bytes_is_visible() {
        let transient = TransientState::new();
        transient.set_max_chat_bytes(50_000);
        assert_eq!(transient.max_chat_bytes(), 50_000);
    }

    #[test]
    fn test_set_send_delay_secs_fractional() {
        let transient = TransientState::new();
        let stored = transient.set_send_delay_secs(0.5);
        assert_eq!(stored, Some(Duration::from_millis(500)));
        assert_eq!(transient.send_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_set_send_delay_secs_invalid_keeps_old_value() {
        let transient = TransientState::new();
        transient.set_send_delay_secs(2.0);

        assert_eq!(transient.set_send_delay_secs(-1.0), None);
        assert_eq!(transient.set_send_delay_secs(f64::NAN), None);
        assert_eq!(transient.set_send_delay_secs(f64::INFINITY), None);

        assert_eq!(transient.send_delay(), Duration::from_secs(2));
    }
}
