//! Terminal presentation for the quiz engine.
//!
//! Pure adapter: everything rendered here is read from the public
//! attempt-state API; no quiz logic lives in this layer.

mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::engine::{AttemptPhase, AttemptState};

pub fn render(frame: &mut Frame, state: &AttemptState, upcoming_questions: usize, scroll: usize) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match state.phase() {
        AttemptPhase::NotStarted => welcome::render(frame, area, upcoming_questions),
        AttemptPhase::InProgress => quiz::render(frame, area, state),
        AttemptPhase::Completed => result::render(frame, area, state, scroll),
    }
}
