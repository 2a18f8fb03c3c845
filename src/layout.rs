use std::ops::Range;

use crate::color::{Color, BLACK};
use crate::strip::Strip;

/// A remapping view over a strip: excludes dead pixels, optionally mirrors
/// writes onto both halves, optionally reverses the logical direction.
///
/// `Layout` implements [`Strip`] itself, so layouts stack on top of each
/// other and shows render through them without knowing the difference.
///
/// Dead pixel placement: positive `dead` puts the zone at the start of a
/// plain strip (logical indices shift up) and in the middle of a mirrored
/// one; negative `dead` puts it at the end of a plain strip and splits it
/// across both edges of a mirrored one. Dead pixels are blacked out at
/// construction and are unreachable through logical indices afterwards.
pub struct Layout {
    strip: Box<dyn Strip>,
    dead: i32,
    mirror: bool,
    reverse: bool,
    length: usize,
}

impl Layout {
    pub fn new(
        strip: Box<dyn Strip>,
        dead: i32,
        mirror: bool,
        reverse: bool,
    ) -> Result<Layout, String> {
        let physical = strip.len();
        let dead_count = dead.unsigned_abs() as usize;

        if dead_count > physical {
            return Err(format!(
                "{} dead LEDs do not fit a strip of {}",
                dead_count, physical
            ));
        }
        if mirror && (physical - dead_count) % 2 != 0 {
            return Err(format!(
                "{} live LEDs cannot be mirrored evenly",
                physical - dead_count
            ));
        }
        if mirror && dead < 0 && dead_count % 2 != 0 {
            return Err(format!(
                "{} dead LEDs cannot be split across both edges",
                dead_count
            ));
        }

        let length = (physical - dead_count) / if mirror { 2 } else { 1 };
        let mut layout = Layout {
            strip,
            dead,
            mirror,
            reverse,
            length,
        };
        layout.clear_dead_ranges();
        Ok(layout)
    }

    fn dead_ranges(&self) -> Vec<Range<usize>> {
        let physical = self.strip.len();
        let dead_count = self.dead.unsigned_abs() as usize;

        if dead_count == 0 {
            return Vec::new();
        }

        match (self.mirror, self.dead > 0) {
            (false, true) => vec![0..dead_count],
            (false, false) => vec![physical - dead_count..physical],
            (true, true) => vec![self.length..self.length + dead_count],
            (true, false) => vec![
                0..dead_count / 2,
                physical - dead_count / 2..physical,
            ],
        }
    }

    /// Dead pixels must never keep stray color from before this layout
    /// existed.
    fn clear_dead_ranges(&mut self) {
        for range in self.dead_ranges() {
            for index in range {
                self.strip.set(index, BLACK);
            }
        }
    }

    /// Map a logical index to the physical index of its primary pixel.
    /// Panics on out-of-range input: a show writing outside `0..len()`
    /// is broken, not something to clamp quietly.
    fn real_index(&self, index: usize) -> usize {
        assert!(
            index < self.length,
            "logical index {} out of range 0..{}",
            index,
            self.length
        );

        let flipped = if self.reverse {
            self.length - index - 1
        } else {
            index
        };

        if !self.mirror && self.dead > 0 {
            flipped + self.dead as usize
        } else if self.mirror && self.dead < 0 {
            flipped + self.dead.unsigned_abs() as usize / 2
        } else {
            flipped
        }
    }
}

impl Strip for Layout {
    fn len(&self) -> usize {
        self.length
    }

    fn get(&self, index: usize) -> Color {
        self.strip.get(self.real_index(index))
    }

    fn set(&mut self, index: usize, color: Color) {
        let physical = self.real_index(index);
        self.strip.set(physical, color);
        if self.mirror {
            // Counterpart is derived from the already resolved physical
            // index, never from a second pass through the remapping.
            self.strip.set(self.strip.len() - physical - 1, color);
        }
    }

    fn fill(&mut self, color: Color) {
        self.strip.fill(color);
    }

    fn show(&mut self) {
        self.strip.show();
    }
}
