//! Event bus for queueing page events between frames

use crate::event::PageEvent;

/// Queue of host events, drained by the page at the start of each tick
pub struct EventBus {
    events: Vec<PageEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Queue an event. A pointer move or resize directly after one of the same
    /// kind replaces it, since only the latest position or size matters.
    pub fn push(&mut self, event: PageEvent) {
        let supersedes = matches!(
            (self.events.last(), &event),
            (Some(PageEvent::PointerMoved { .. }), PageEvent::PointerMoved { .. })
                | (Some(PageEvent::Resized { .. }), PageEvent::Resized { .. })
        );
        if supersedes {
            self.events.pop();
        }
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(PageEvent::VisibilityChanged { visible: false });
        bus.push(PageEvent::Resized {
            width: 960.0,
            height: 540.0,
        });

        assert_eq!(bus.len(), 2);

        let events = bus.drain();
        assert_eq!(events[0], PageEvent::VisibilityChanged { visible: false });
        assert!(bus.is_empty());
    }

    #[test]
    fn test_consecutive_moves_coalesce() {
        let mut bus = EventBus::new();
        bus.push(PageEvent::PointerMoved { x: 1.0, y: 1.0 });
        bus.push(PageEvent::PointerMoved { x: 2.0, y: 3.0 });
        bus.push(PageEvent::PointerLeft);
        bus.push(PageEvent::PointerMoved { x: 4.0, y: 4.0 });
        assert_eq!(
            bus.drain(),
            vec![
                PageEvent::PointerMoved { x: 2.0, y: 3.0 },
                PageEvent::PointerLeft,
                PageEvent::PointerMoved { x: 4.0, y: 4.0 },
            ]
        );
    }

    #[test]
    fn test_resizes_keep_only_the_latest() {
        let mut bus = EventBus::new();
        bus.push(PageEvent::Resized {
            width: 800.0,
            height: 600.0,
        });
        bus.push(PageEvent::Resized {
            width: 1024.0,
            height: 768.0,
        });
        assert_eq!(bus.len(), 1);
        assert_eq!(
            bus.drain()[0],
            PageEvent::Resized {
                width: 1024.0,
                height: 768.0
            }
        );
    }

    #[test]
    fn test_drain_clears() {
        let mut bus = EventBus::new();
        bus.push(PageEvent::Teardown);

        let _ = bus.drain();
        assert!(bus.drain().is_empty());
    }
}
