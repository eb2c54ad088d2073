// presentation.rs - on-screen title/artist text and its fade

use crate::catalog::Catalog;
use crate::tween::{Easing, Transition};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Presentation {
    index: Option<usize>,
    title: String,
    artist: String,
    opacity: f32,
    target_opacity: f32,
    /// Opacity change per second while easing toward `target_opacity`.
    opacity_rate: f32,
    fade: Option<Transition>,
}

impl Presentation {
    pub fn new(text_transition: Duration) -> Self {
        let secs = text_transition.as_secs_f32();
        Self {
            index: None,
            title: String::new(),
            artist: String::new(),
            opacity: 1.0,
            target_opacity: 1.0,
            opacity_rate: if secs > 0.0 { 1.0 / secs } else { f32::INFINITY },
            fade: None,
        }
    }

    #[cfg(test)]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[cfg(test)]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Shows the entry at `index`; returns true when the text changed.
    pub fn show(&mut self, index: Option<usize>, catalog: &Catalog) -> bool {
        let entry = index.and_then(|i| catalog.get(i));
        let (title, artist) = match entry {
            Some(e) => (e.title.as_str(), e.artist.as_str()),
            None => ("", ""),
        };
        let changed = self.index != index || self.title != title || self.artist != artist;
        if changed {
            self.index = index;
            self.title = title.to_owned();
            self.artist = artist.to_owned();
        }
        changed
    }

    /// Hides the text at once for the length of a navigation transition.
    pub fn begin_fade(&mut self, now: Instant, duration: Duration) {
        self.opacity = 0.0;
        self.target_opacity = 0.0;
        self.fade = Some(Transition::new(now, duration, Easing::Linear));
    }

    /// Advances the fade; once the transition ends the text is refreshed to
    /// `settled_index` and faded back in.
    pub fn update(&mut self, now: Instant, dt: Duration, settled_index: Option<usize>, catalog: &Catalog) {
        if let Some(fade) = self.fade {
            if fade.is_finished(now) {
                self.fade = None;
                self.show(settled_index, catalog);
                self.target_opacity = 1.0;
            }
        }

        let step = self.opacity_rate * dt.as_secs_f32();
        if self.opacity < self.target_opacity {
            self.opacity = (self.opacity + step).min(self.target_opacity);
        } else if self.opacity > self.target_opacity {
            self.opacity = (self.opacity - step).max(self.target_opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn show_reports_changes_only() {
        let catalog = Catalog::builtin();
        let mut p = Presentation::new(Duration::from_millis(500));
        assert!(p.show(Some(0), &catalog));
        assert_eq!(p.title(), "I IN THE OTHER");
        assert!(!p.show(Some(0), &catalog));
        assert!(p.show(Some(3), &catalog));
        assert_eq!(p.title(), "The-barriers");
        assert_eq!(p.artist(), "Aida Muluneh");
    }

    #[test]
    fn empty_index_blanks_text() {
        let catalog = Catalog::new(Vec::new());
        let mut p = Presentation::new(Duration::from_millis(500));
        p.show(None, &catalog);
        assert_eq!(p.title(), "");
        assert_eq!(p.index(), None);
    }

    #[test]
    fn fade_out_then_refresh_and_fade_in() {
        let catalog = Catalog::builtin();
        let mut p = Presentation::new(Duration::from_millis(500));
        p.show(Some(0), &catalog);

        let t0 = Instant::now();
        p.begin_fade(t0, Duration::from_millis(1500));

        assert_eq!(p.opacity(), 0.0);

        let mut now = t0;
        for _ in 0..40 {
            now += FRAME;
            p.update(now, FRAME, Some(2), &catalog);
        }
        // 640 ms in: still hidden, text not yet swapped
        assert_eq!(p.opacity(), 0.0);
        assert!(p.is_fading());
        assert_eq!(p.index(), Some(0));

        now = t0 + Duration::from_millis(1500);
        p.update(now, FRAME, Some(2), &catalog);
        assert!(!p.is_fading());
        assert_eq!(p.title(), "THE DEW AT DAWN");

        for _ in 0..40 {
            now += FRAME;
            p.update(now, FRAME, Some(2), &catalog);
        }
        assert_eq!(p.opacity(), 1.0);
    }

    #[test]
    fn text_swapped_mid_fade_is_never_visible() {
        let catalog = Catalog::builtin();
        let mut p = Presentation::new(Duration::from_millis(500));
        p.show(Some(0), &catalog);

        let t0 = Instant::now();
        p.begin_fade(t0, Duration::from_millis(1500));
        p.update(t0 + FRAME, FRAME, Some(1), &catalog);
        p.show(Some(1), &catalog);
        assert_eq!(p.opacity(), 0.0);
    }

    #[test]
    fn zero_transition_snaps_opacity() {
        let mut p = Presentation::new(Duration::ZERO);
        let t0 = Instant::now();
        p.begin_fade(t0, Duration::from_millis(100));
        p.update(t0, FRAME, None, &Catalog::builtin());
        assert_eq!(p.opacity(), 0.0);
    }
}
