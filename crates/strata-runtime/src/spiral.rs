use strata_world::ChunkCoord;

/// Outward square spiral over `(2r + 1)^2` cells around a center.
///
/// Ring 0 is the center; ring `k` walks its `8k` perimeter cells. Every cell
/// of the square is yielded exactly once, nearer rings first. The iterator
/// is the resumable cursor the streamer keeps across yields.
#[derive(Clone, Debug)]
pub struct Spiral {
    center: ChunkCoord,
    radius: i32,
    ring: i32,
    step: i32,
}

impl Spiral {
    pub fn new(center: ChunkCoord, radius: i32) -> Self {
        Self {
            center,
            radius: radius.max(0),
            ring: 0,
            step: 0,
        }
    }

    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    pub fn cell_count(radius: i32) -> usize {
        let side = 2 * radius.max(0) as usize + 1;
        side * side
    }

    fn ring_offset(k: i32, i: i32) -> (i32, i32) {
        if i < 2 * k + 1 {
            (-k + i, -k)
        } else if i < 4 * k + 1 {
            (k, -k + 1 + (i - (2 * k + 1)))
        } else if i < 6 * k + 1 {
            (k - 1 - (i - (4 * k + 1)), k)
        } else {
            (-k, k - 1 - (i - (6 * k + 1)))
        }
    }
}

impl Iterator for Spiral {
    type Item = ChunkCoord;

    fn next(&mut self) -> Option<ChunkCoord> {
        if self.ring > self.radius {
            return None;
        }
        if self.ring == 0 {
            self.ring = 1;
            self.step = 0;
            return Some(self.center);
        }
        let k = self.ring;
        let (dx, dz) = Self::ring_offset(k, self.step);
        self.step += 1;
        if self.step == 8 * k {
            self.ring += 1;
            self.step = 0;
        }
        Some(self.center.offset(dx, dz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn visits_every_cell_once_in_ring_order() {
        for r in 0..6 {
            let center = ChunkCoord::new(3, -7);
            let cells: Vec<ChunkCoord> = Spiral::new(center, r).collect();
            assert_eq!(cells.len(), Spiral::cell_count(r));
            let unique: HashSet<ChunkCoord> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len());
            let mut last = 0;
            for c in &cells {
                let d = c.chebyshev_distance(center);
                assert!(d <= r);
                assert!(d >= last);
                last = d;
            }
            assert_eq!(cells[0], center);
        }
    }

    #[test]
    fn negative_radius_is_just_the_center() {
        let cells: Vec<ChunkCoord> = Spiral::new(ChunkCoord::new(0, 0), -3).collect();
        assert_eq!(cells, vec![ChunkCoord::new(0, 0)]);
    }
}
