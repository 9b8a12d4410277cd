use super::Identity;

/// A point vector with its identity elements stripped out.
///
/// `infinity_at` keeps one flag per original position, so the original
/// vector can be rebuilt with [`CompactedPoints::expand`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactedPoints<P> {
    dense: Vec<P>,
    infinity_at: Vec<bool>,
    infinity_count: u64,
}

impl<P> CompactedPoints<P> {
    /// Non-identity points, in their original relative order.
    pub fn dense(&self) -> &[P] {
        &self.dense
    }

    /// `true` at every original position that held the identity.
    pub fn infinity_at(&self) -> &[bool] {
        &self.infinity_at
    }

    pub fn infinity_count(&self) -> u64 {
        self.infinity_count
    }

    /// Original index of the first identity element, if any.
    pub fn first_infinity(&self) -> Option<usize> {
        self.infinity_at.iter().position(|&at_infinity| at_infinity)
    }
}

impl<P: Identity + Clone> CompactedPoints<P> {
    /// Re-inserts the identity at every marked position.
    pub fn expand(&self) -> Vec<P> {
        let mut dense = self.dense.iter().cloned();
        self.infinity_at
            .iter()
            .map(|&at_infinity| {
                if at_infinity {
                    P::identity()
                } else {
                    // dense holds exactly one entry per unmarked position
                    dense.next().unwrap_or_else(P::identity)
                }
            })
            .collect()
    }
}

/// Removes identity elements from `points` in a single left-to-right pass.
pub fn compact_points<P: Identity + Clone>(points: &[P]) -> CompactedPoints<P> {
    let mut infinity_at = vec![false; points.len()];
    let mut dense = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        if point.is_identity() {
            infinity_at[i] = true;
            continue;
        }
        dense.push(point.clone());
    }
    let infinity_count = (points.len() - dense.len()) as u64;
    CompactedPoints { dense, infinity_at, infinity_count }
}
