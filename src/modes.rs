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

use ratatui::style::Color;

pub(crate) mod ai_flashcards;
pub(crate) mod flashcards;
pub(crate) mod quiz;
mod status;

const COLOR_CORRECT: Color = Color::Green;
const COLOR_INCORRECT: Color = Color::Red;
const COLOR_HINT: Color = Color::DarkGray;

#[cfg(test)]
fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
