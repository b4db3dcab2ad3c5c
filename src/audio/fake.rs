//! In-memory `Player` used by tests. Every call is recorded on a shared
//! `FakeState` the test keeps a handle to.

use std::cell::RefCell;
use std::rc::Rc;

use super::player::Player;
use super::types::PlayerEvent;

#[derive(Debug)]
pub(crate) struct FakeState {
    pub source: Option<String>,
    pub source_loads: usize,
    pub playing: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub seeks: Vec<f64>,
    pub pending: Vec<PlayerEvent>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            source: None,
            source_loads: 0,
            playing: false,
            play_calls: 0,
            pause_calls: 0,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            seeks: Vec::new(),
            pending: Vec::new(),
        }
    }
}

pub(crate) struct FakePlayer {
    state: Rc<RefCell<FakeState>>,
}

impl FakePlayer {
    pub(crate) fn new() -> (Self, Rc<RefCell<FakeState>>) {
        let state = Rc::new(RefCell::new(FakeState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl Player for FakePlayer {
    fn set_source(&mut self, locator: &str) {
        let mut s = self.state.borrow_mut();
        s.source = Some(locator.to_string());
        s.source_loads += 1;
        s.playing = false;
        s.current_time = 0.0;
    }

    fn play(&mut self) {
        let mut s = self.state.borrow_mut();
        s.play_calls += 1;
        s.playing = true;
    }

    fn pause(&mut self) {
        let mut s = self.state.borrow_mut();
        s.pause_calls += 1;
        s.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut s = self.state.borrow_mut();
        s.current_time = secs;
        s.seeks.push(secs);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume;
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.state.borrow_mut().pending)
    }
}
