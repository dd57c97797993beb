use arrayvec::ArrayVec;

use crate::error::{ConfigError, ConfigResult};

// ===== Capacity limits =====

pub const MAX_DIMENSIONS: usize = 14;
pub const MAX_SIDE_LENGTH: usize = 100;
/// 3^9, the largest preset board.
pub const MAX_TOTAL_SQUARES: usize = 19_683;
pub const MAX_MOVES_PER_TURN: usize = 10;

/// One component per board dimension.
pub type Coordinate = ArrayVec<i32, MAX_DIMENSIONS>;

/// Adds `delta` to `coord[dim]`.
///
/// Off-board results wrap to the opposite edge when `wrapping` is set and
/// fail otherwise, leaving `coord` unchanged.
#[inline]
pub fn step(coord: &mut Coordinate, dim: usize, delta: i32, wrapping: bool, extent: i32) -> bool {
    let next = coord[dim] + delta;
    if (0..extent).contains(&next) {
        coord[dim] = next;
        true
    } else if wrapping {
        coord[dim] = next.rem_euclid(extent);
        true
    } else {
        false
    }
}

/// Shape of the board and the per-dimension flags that matter for movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    extents: ArrayVec<i32, MAX_DIMENSIONS>,
    place_values: ArrayVec<usize, MAX_DIMENSIONS>,
    wrapping: ArrayVec<bool, MAX_DIMENSIONS>,
    forward: ArrayVec<bool, MAX_DIMENSIONS>,
    len: usize,
}

impl Geometry {
    pub fn new(shape: &[usize], forward: &[bool], wrapping: &[bool]) -> ConfigResult<Self> {
        let dimensions = shape.len();
        if dimensions == 0 {
            return Err(ConfigError::NoDimensions);
        }
        if dimensions > MAX_DIMENSIONS {
            return Err(ConfigError::TooManyDimensions { count: dimensions });
        }
        for (name, found) in [("forward_dimensions", forward.len()), ("wrapping", wrapping.len())] {
            if found != dimensions {
                return Err(ConfigError::FlagLengthMismatch {
                    name,
                    expected: dimensions,
                    found,
                });
            }
        }

        let mut extents = ArrayVec::new();
        let mut place_values = ArrayVec::new();
        let mut len = 1usize;
        for (dimension, &extent) in shape.iter().enumerate() {
            if !(1..=MAX_SIDE_LENGTH).contains(&extent) {
                return Err(ConfigError::ExtentOutOfRange { dimension, extent });
            }
            place_values.push(len);
            extents.push(extent as i32);
            len = len.saturating_mul(extent);
            if len > MAX_TOTAL_SQUARES {
                return Err(ConfigError::TooManySquares {
                    total: shape.iter().fold(1usize, |acc, e| acc.saturating_mul(*e)),
                });
            }
        }

        Ok(Geometry {
            extents,
            place_values,
            wrapping: wrapping.iter().copied().collect(),
            forward: forward.iter().copied().collect(),
            len,
        })
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.extents.len()
    }

    /// Total number of squares, holes included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn extent(&self, dim: usize) -> i32 {
        self.extents[dim]
    }

    #[inline]
    pub fn is_forward(&self, dim: usize) -> bool {
        self.forward[dim]
    }

    #[inline]
    pub fn wraps(&self, dim: usize) -> bool {
        self.wrapping[dim]
    }

    pub fn index_to_coord(&self, index: usize) -> Coordinate {
        debug_assert!(index < self.len);
        let mut coord = Coordinate::new();
        let mut rest = index;
        for &extent in &self.extents {
            let extent = extent as usize;
            coord.push((rest % extent) as i32);
            rest /= extent;
        }
        coord
    }

    pub fn coord_to_index(&self, coord: &Coordinate) -> usize {
        debug_assert!(self.contains(coord));
        coord
            .iter()
            .zip(&self.place_values)
            .map(|(c, place)| *c as usize * place)
            .sum()
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.len() == self.dimensions()
            && coord
                .iter()
                .zip(&self.extents)
                .all(|(c, extent)| (0..*extent).contains(c))
    }

    #[inline]
    pub fn step(&self, coord: &mut Coordinate, dim: usize, delta: i32) -> bool {
        step(coord, dim, delta, self.wrapping[dim], self.extents[dim])
    }

    /// Applies every `(dim, delta)` in order. On failure `coord` is restored.
    pub fn step_many(&self, coord: &mut Coordinate, steps: &[(usize, i32)]) -> bool {
        let saved = coord.clone();
        for &(dim, delta) in steps {
            if !self.step(coord, dim, delta) {
                *coord = saved;
                return false;
            }
        }
        true
    }

    /// Index reached from `index` by `steps`, if every step is legal.
    pub fn offset(&self, index: usize, steps: &[(usize, i32)]) -> Option<usize> {
        let mut coord = self.index_to_coord(index);
        self.step_many(&mut coord, steps)
            .then(|| self.coord_to_index(&coord))
    }

    /// Unordered pairs `(a, b)` with `a < b`.
    pub fn dimension_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.dimensions();
        (0..n).flat_map(move |a| (a + 1..n).map(move |b| (a, b)))
    }

    /// Ordered pairs of distinct dimensions.
    pub fn ordered_dimension_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.dimensions();
        (0..n).flat_map(move |a| (0..n).filter(move |b| *b != a).map(move |b| (a, b)))
    }
}
