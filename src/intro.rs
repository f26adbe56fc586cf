//! Landing-screen animation: the title starts centered, docks into the
//! top-left logo slot, then the game gallery fades in.

use std::time::Duration;

use crate::engine::{Fired, Scheduler};

pub const DOCK_MS: u64 = 2500;
pub const GALLERY_MS: u64 = 3000;

#[derive(Clone, Copy, Debug)]
enum IntroEvent {
    Dock,
    ShowGallery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroStage {
    Centered,
    Docked,
    Gallery,
}

pub struct Intro {
    stage: IntroStage,
    scheduler: Scheduler<IntroEvent>,
}

impl Intro {
    pub fn new(skip: bool) -> Self {
        let mut intro = Self {
            stage: IntroStage::Centered,
            scheduler: Scheduler::new(),
        };
        if skip {
            intro.skip();
        } else {
            intro.play();
        }
        intro
    }

    /// Restart the animation from the centered title.
    pub fn play(&mut self) {
        self.scheduler.reset();
        self.stage = IntroStage::Centered;
        self.scheduler.after(DOCK_MS, IntroEvent::Dock);
        self.scheduler.after(GALLERY_MS, IntroEvent::ShowGallery);
    }

    pub fn skip(&mut self) {
        if self.stage != IntroStage::Gallery {
            tracing::debug!(at_ms = self.scheduler.now_ms(), "intro skipped");
        }
        self.stage = IntroStage::Gallery;
        self.scheduler.stop();
    }

    pub fn update(&mut self, dt: Duration) {
        self.scheduler.advance_by(dt);
        while let Some(fired) = self.scheduler.pop_due() {
            self.on_timer(fired);
        }
    }

    fn on_timer(&mut self, fired: Fired<IntroEvent>) {
        if !self.scheduler.is_current(&fired) {
            return;
        }
        match fired.event {
            IntroEvent::Dock => self.stage = IntroStage::Docked,
            IntroEvent::ShowGallery => {
                self.stage = IntroStage::Gallery;
                self.scheduler.stop();
            }
        }
    }

    pub fn stage(&self) -> IntroStage {
        self.stage
    }

    pub fn is_playing(&self) -> bool {
        self.stage != IntroStage::Gallery
    }

    pub fn title_docked(&self) -> bool {
        self.stage != IntroStage::Centered
    }

    pub fn gallery_visible(&self) -> bool {
        self.stage == IntroStage::Gallery
    }
}
