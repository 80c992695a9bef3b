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

use quizdeck::{BestScore, Outcome};

fn main() {
    let result = quizdeck::run();
    match result {
        Ok(Outcome::Quiz {
            name,
            score,
            finished,
            best,
        }) => {
            println!(
                "{name}, you got {} correct out of {} ({:.2}%)",
                score.correct,
                score.total,
                score.percent()
            );
            match best {
                Some(BestScore { new_best: true, .. }) => println!("New best score!"),
                Some(BestScore { score: best, .. }) => println!("Best score: {best}"),
                None if !finished && score.total > 0 => println!("Quiz ended early."),
                None => {}
            }
            if finished && score.correct == score.total && score.total > 0 {
                println!("Well done!");
            }
        }
        Ok(Outcome::Flashcards { name, review }) => {
            println!(
                "{name}, you reviewed {} of {} flashcards",
                review.reviewed, review.total
            );
        }
        Ok(Outcome::Cancelled) => println!("No flashcards were generated."),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
