//! Screen overlays with fixed lifetimes
//!
//! Flashes, shock waves and notifications are DOM elements layered over the
//! canvas. Their lifetimes are tracked here so the page code only has to
//! apply the transitions `advance` reports. None of this feeds back into
//! the simulation.

use crate::consts::*;

/// Overlay kinds
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    /// Bright disc at an impact
    Flash,
    /// Expanding ring at an impact
    ShockWave,
    /// Slide-in banner
    Notification { title: String, text: String },
}

impl OverlayKind {
    /// CSS class of the overlay element
    pub fn css_class(&self) -> &'static str {
        match self {
            OverlayKind::Flash => "impact-flash",
            OverlayKind::ShockWave => "shock-wave",
            OverlayKind::Notification { .. } => "notification",
        }
    }

    /// Child elements of a notification as (class, text) pairs
    pub fn notification_parts(&self) -> Option<[(&'static str, &str); 2]> {
        match self {
            OverlayKind::Notification { title, text } => Some([
                ("notification-title", title.as_str()),
                ("notification-text", text.as_str()),
            ]),
            _ => None,
        }
    }
}

/// Box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A live overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: u32,
    pub kind: OverlayKind,
    pub rect: Option<OverlayRect>,
    pub created_ms: f64,
    revealed: bool,
    dismissed: bool,
}

impl Overlay {
    /// Time at which the element is removed
    pub fn expires_ms(&self) -> f64 {
        self.created_ms
            + match self.kind {
                OverlayKind::Flash => FLASH_MS,
                OverlayKind::ShockWave => SHOCK_WAVE_MS,
                OverlayKind::Notification { .. } => NOTIFICATION_REMOVE_MS,
            }
    }

    pub fn element_id(&self) -> String {
        element_id(self.id)
    }
}

/// DOM id for the element of overlay `id`
pub fn element_id(id: u32) -> String {
    format!("overlay-{id}")
}

/// Lifecycle step the page should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    /// Notification becomes visible
    Reveal(u32),
    /// Notification starts sliding out
    Dismiss(u32),
    /// Element is removed
    Remove(u32),
}

/// All live overlays, oldest first
#[derive(Debug, Default)]
pub struct OverlayBoard {
    live: Vec<Overlay>,
    next_id: u32,
}

impl OverlayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: OverlayKind, rect: Option<OverlayRect>, now_ms: f64) -> &Overlay {
        self.next_id += 1;
        self.live.push(Overlay {
            id: self.next_id,
            kind,
            rect,
            created_ms: now_ms,
            revealed: false,
            dismissed: false,
        });
        &self.live[self.live.len() - 1]
    }

    /// Flash covering a `2·size` box centred on (x, y)
    pub fn flash(&mut self, x: f32, y: f32, size: f32, now_ms: f64) -> &Overlay {
        let rect = OverlayRect {
            left: x - size,
            top: y - size,
            width: size * 2.0,
            height: size * 2.0,
        };
        self.push(OverlayKind::Flash, Some(rect), now_ms)
    }

    /// Shock wave starting from a `size` box centred on (x, y)
    pub fn shock_wave(&mut self, x: f32, y: f32, size: f32, now_ms: f64) -> &Overlay {
        let rect = OverlayRect {
            left: x - size * 0.5,
            top: y - size * 0.5,
            width: size,
            height: size,
        };
        self.push(OverlayKind::ShockWave, Some(rect), now_ms)
    }

    pub fn notify(&mut self, title: &str, text: &str, now_ms: f64) -> &Overlay {
        let kind = OverlayKind::Notification {
            title: title.to_string(),
            text: text.to_string(),
        };
        self.push(kind, None, now_ms)
    }

    /// Collect the transitions due at `now_ms` and drop expired overlays
    pub fn advance(&mut self, now_ms: f64) -> Vec<OverlayTransition> {
        let mut transitions = Vec::new();

        for overlay in &mut self.live {
            if !matches!(overlay.kind, OverlayKind::Notification { .. }) {
                continue;
            }
            let age = now_ms - overlay.created_ms;
            if !overlay.revealed && age >= NOTIFICATION_REVEAL_MS {
                overlay.revealed = true;
                transitions.push(OverlayTransition::Reveal(overlay.id));
            }
            if !overlay.dismissed && age >= NOTIFICATION_DISMISS_MS {
                overlay.dismissed = true;
                transitions.push(OverlayTransition::Dismiss(overlay.id));
            }
        }

        self.live.retain(|overlay| {
            if now_ms >= overlay.expires_ms() {
                transitions.push(OverlayTransition::Remove(overlay.id));
                false
            } else {
                true
            }
        });

        transitions
    }

    /// Drop every flash and shock wave; notifications run their course.
    /// Returns the ids of the dropped overlays.
    pub fn clear_effects(&mut self) -> Vec<u32> {
        let mut cleared = Vec::new();
        self.live.retain(|overlay| {
            if matches!(overlay.kind, OverlayKind::Notification { .. }) {
                true
            } else {
                cleared.push(overlay.id);
                false
            }
        });
        cleared
    }

    pub fn live(&self) -> &[Overlay] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_and_shock_wave_geometry() {
        let mut board = OverlayBoard::new();
        let flash = board.flash(300.0, 480.0, 40.0, 0.0).rect.unwrap();
        assert_eq!(
            flash,
            OverlayRect {
                left: 260.0,
                top: 440.0,
                width: 80.0,
                height: 80.0
            }
        );
        let wave = board.shock_wave(300.0, 480.0, 40.0, 0.0).rect.unwrap();
        assert_eq!(wave.left, 280.0);
        assert_eq!(wave.width, 40.0);
    }

    #[test]
    fn test_effects_expire_on_schedule() {
        let mut board = OverlayBoard::new();
        let flash = board.flash(0.0, 0.0, 10.0, 1000.0).id;
        let wave = board.shock_wave(0.0, 0.0, 10.0, 1000.0).id;

        assert!(board.advance(1799.0).is_empty());
        assert_eq!(board.advance(1800.0), vec![OverlayTransition::Remove(flash)]);
        assert!(board.advance(2499.0).is_empty());
        assert_eq!(board.advance(2500.0), vec![OverlayTransition::Remove(wave)]);
        assert!(board.is_empty());
    }

    #[test]
    fn test_notification_lifecycle() {
        let mut board = OverlayBoard::new();
        let overlay = board.notify("Reset", "All effects cleared", 0.0);
        let id = overlay.id;
        assert_eq!(overlay.element_id(), element_id(id));
        assert!(overlay.rect.is_none());

        assert!(board.advance(50.0).is_empty());
        assert_eq!(board.advance(100.0), vec![OverlayTransition::Reveal(id)]);
        assert!(board.advance(2000.0).is_empty());
        assert_eq!(board.advance(3000.0), vec![OverlayTransition::Dismiss(id)]);
        assert_eq!(board.advance(3500.0), vec![OverlayTransition::Remove(id)]);
    }

    #[test]
    fn test_element_markup() {
        let mut board = OverlayBoard::new();
        assert_eq!(board.flash(0.0, 0.0, 1.0, 0.0).kind.css_class(), "impact-flash");
        assert_eq!(board.shock_wave(0.0, 0.0, 1.0, 0.0).kind.css_class(), "shock-wave");
        assert!(OverlayKind::Flash.notification_parts().is_none());

        let note = board.notify("Stopped", "Meteor fall stopped", 0.0);
        assert_eq!(note.kind.css_class(), "notification");
        assert_eq!(
            note.kind.notification_parts(),
            Some([
                ("notification-title", "Stopped"),
                ("notification-text", "Meteor fall stopped")
            ])
        );
    }

    #[test]
    fn test_late_frame_reports_all_due_transitions() {
        let mut board = OverlayBoard::new();
        let id = board.notify("a", "b", 0.0).id;
        assert_eq!(
            board.advance(4000.0),
            vec![
                OverlayTransition::Reveal(id),
                OverlayTransition::Dismiss(id),
                OverlayTransition::Remove(id)
            ]
        );
    }

    #[test]
    fn test_clear_effects_keeps_notifications() {
        let mut board = OverlayBoard::new();
        let flash = board.flash(0.0, 0.0, 10.0, 0.0).id;
        let wave = board.shock_wave(0.0, 0.0, 10.0, 0.0).id;
        board.notify("Reset", "", 0.0);

        assert_eq!(board.clear_effects(), vec![flash, wave]);
        assert_eq!(board.len(), 1);
    }
}
