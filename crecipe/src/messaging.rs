use crecipe_core::PlayerRef;

/// Delivers chat messages to players. Sending must not block.
pub trait MessageSink: Send + Sync {
    fn send(&self, player: &PlayerRef, message: &str);
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn send(&self, player: &PlayerRef, message: &str) {
        log::info!("[-> {player}] {message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Keeps every message for inspection.
    #[derive(Default)]
    pub struct RecordingSink {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        pub fn messages(&self) -> Vec<(String, String)> {
            self.sent.lock().clone()
        }
    }

    impl MessageSink for RecordingSink {
        fn send(&self, player: &PlayerRef, message: &str) {
            self.sent
                .lock()
                .push((player.name.clone(), message.to_string()));
        }
    }
}
