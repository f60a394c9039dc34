use rand::{Rng, seq::SliceRandom};

use crate::types::{PlaylistSnapshot, ShuffledOrder};

/// Returns the snapshot's track ids in a uniformly random order.
pub fn shuffle(snapshot: &PlaylistSnapshot) -> ShuffledOrder {
    shuffle_with(snapshot, &mut rand::rng())
}

/// Same as [`shuffle`] with a caller supplied random source.
///
/// `SliceRandom::shuffle` is a Fisher-Yates shuffle, so every ordering is
/// equally likely. Snapshots of zero or one track come back unchanged.
pub fn shuffle_with<R: Rng + ?Sized>(snapshot: &PlaylistSnapshot, rng: &mut R) -> ShuffledOrder {
    let mut track_ids = snapshot.track_ids();
    track_ids.shuffle(rng);
    ShuffledOrder::new(track_ids)
}
