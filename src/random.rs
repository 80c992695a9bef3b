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

use rand::Rng;

pub(crate) trait RemoveRandom {
    type Item;

    ///Removes and returns a uniformly random item. When more than one item
    ///remains, `excluded` is never picked.
    fn remove_random_except(
        &mut self,
        excluded: Option<&Self::Item>,
        rng: &mut impl Rng,
    ) -> Option<Self::Item>;
}

impl<T: PartialEq> RemoveRandom for Vec<T> {
    type Item = T;

    fn remove_random_except(&mut self, excluded: Option<&T>, rng: &mut impl Rng) -> Option<T> {
        match self.len() {
            0 => None,
            1 => Some(self.swap_remove(0)),
            len => {
                //NOTE: The excluded item is parked at the end, outside the
                //drawn range
                let bound = match excluded.and_then(|ex| self.iter().position(|item| item == ex)) {
                    Some(position) => {
                        self.swap(position, len - 1);
                        len - 1
                    }
                    None => len,
                };

                Some(self.swap_remove(rng.gen_range(0..bound)))
            }
        }
    }
}
