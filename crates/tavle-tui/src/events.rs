use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tavle_domain::Snapshot;
use tokio::sync::mpsc;

/// Events driving the board controller. Snapshot loads complete off the UI
/// loop and arrive here alongside input.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    SnapshotLoaded(Result<Snapshot, String>),
}

pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    shutdown_tx: mpsc::UnboundedSender<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();

        let input_tx = tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(16)) => {
                        if event::poll(Duration::from_millis(0)).unwrap_or(false) {
                            if let Ok(CrosstermEvent::Key(key)) = event::read() {
                                if input_tx.send(Event::Key(key)).is_err() {
                                    break;
                                }
                            }
                        } else if input_tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            tx,
            rx,
            shutdown_tx,
        }
    }

    /// Sender for background tasks (snapshot loads) to report back through.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
