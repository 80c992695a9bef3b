/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Quizdeck.
 *
 * Quizdeck is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Quizdeck is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Quizdeck.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Widget, Frame, Terminal};

use crate::{QuizdeckError, UiError};

///Owns the terminal for as long as a mode is on screen. Dropping it leaves
///the alternate screen and restores cooked mode, also while unwinding.
pub struct TerminalWrapper {
    #[allow(unused)]
    screen: HiddenCursor,
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl TerminalWrapper {
    pub fn new() -> Result<TerminalWrapper, std::io::Error> {
        let raw_mode = RawMode::enable()?;
        let alt_screen = AltScreen::enter(raw_mode)?;
        let screen = HiddenCursor::hide(alt_screen)?;
        let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

        Ok(TerminalWrapper { screen, terminal })
    }

    pub fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame)) -> Result<(), QuizdeckError> {
        self.terminal.draw(draw_fn).map_err(UiError::IoError)?;
        Ok(())
    }

    pub fn render_widget(&mut self, widget: impl Widget) -> Result<(), QuizdeckError> {
        self.draw(|frame| frame.render_widget(widget, frame.area()))
    }
}

static LOCKED: AtomicBool = AtomicBool::new(false);

struct Lock;

impl Lock {
    fn acquire() -> Lock {
        assert!(
            !LOCKED.swap(true, Ordering::SeqCst),
            "Terminal is already being used, cannot lock"
        );
        Lock
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        assert!(
            LOCKED.swap(false, Ordering::SeqCst),
            "Terminal is not being used, cannot unlock"
        );
    }
}

#[repr(transparent)]
struct RawMode(Lock);

impl RawMode {
    fn enable() -> Result<RawMode, std::io::Error> {
        let lock = Lock::acquire();
        enable_raw_mode()?;
        Ok(RawMode(lock))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

#[repr(transparent)]
struct AltScreen(RawMode);

impl AltScreen {
    fn enter(raw_mode: RawMode) -> Result<Self, std::io::Error> {
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        Ok(Self(raw_mode))
    }
}

impl Drop for AltScreen {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

#[repr(transparent)]
struct HiddenCursor(AltScreen);

impl HiddenCursor {
    fn hide(alt_screen: AltScreen) -> Result<Self, std::io::Error> {
        execute!(std::io::stdout(), Hide)?;
        Ok(Self(alt_screen))
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), Show);
    }
}
