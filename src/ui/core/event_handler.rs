use crossterm::event::{poll, Event, KeyEvent, KeyEventKind};
use tokio::time::Duration;

/// Polls the terminal without blocking the runtime.
///
/// When no input is pending the handler yields for one tick so background
/// completions and notifications get drained between key presses.
pub struct EventHandler {
    tick: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_tick(Duration::from_millis(50))
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self { tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub async fn next_event(&mut self) -> anyhow::Result<EventType> {
        if poll(Duration::from_millis(0))? {
            return Ok(match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => EventType::Key(key),
                Event::Resize(w, h) => EventType::Resize(w, h),
                _ => EventType::Other,
            });
        }

        tokio::time::sleep(self.tick).await;
        Ok(EventType::Tick)
    }
}

#[derive(Debug, Clone)]
pub enum EventType {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Other,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
