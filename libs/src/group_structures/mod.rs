use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ec::AffineRepr;

mod compact;

pub use compact::*;

pub type G1Affine = ark_bls12_381::G1Affine;
pub type G2Affine = ark_bls12_381::G2Affine;

/// A group element with a distinguished identity ("point at infinity").
pub trait Identity: Sized {
    fn identity() -> Self;
    fn is_identity(&self) -> bool;
}

// Covers both G1 and G2 of every short Weierstrass curve, so the two
// instantiations of the compactor cannot drift apart.
impl<P: SWCurveConfig> Identity for Affine<P> {
    fn identity() -> Self {
        <Self as AffineRepr>::zero()
    }

    fn is_identity(&self) -> bool {
        <Self as AffineRepr>::is_zero(self)
    }
}
