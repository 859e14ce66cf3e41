use std::ops::Range;

use crate::{error::ShuffleError, spotify::RemoteLibrary, types::TrackRef};

/// Consecutive index ranges `[size*i, size*i + size)` covering `0..len`.
pub fn batch_ranges(len: usize, size: usize) -> impl Iterator<Item = Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(move |start| start..(start + size).min(len))
}

/// Appends `tracks` to a playlist in order, one batch at a time.
///
/// Batches are sent strictly one after another. The first failure stops the
/// write; batches already sent stay in the playlist. `on_batch` receives the
/// number of tracks written so far after each batch. Returns the number of
/// batches written.
pub async fn write_batches<L, F>(
    library: &L,
    playlist_id: &str,
    tracks: &[TrackRef],
    batch_size: usize,
    mut on_batch: F,
) -> Result<usize, ShuffleError>
where
    L: RemoteLibrary + ?Sized,
    F: FnMut(usize, usize),
{
    let mut written = 0;

    for (batch, range) in batch_ranges(tracks.len(), batch_size).enumerate() {
        let end = range.end;
        library
            .add_items(playlist_id, &tracks[range])
            .await
            .map_err(|source| ShuffleError::Write {
                playlist_id: playlist_id.to_string(),
                batch,
                source,
            })?;

        written += 1;
        on_batch(end, tracks.len());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::testing::{ScriptedLibrary, track_refs};

    #[test]
    fn ranges_partition_the_sequence() {
        let ranges: Vec<_> = batch_ranges(237, 100).collect();
        assert_eq!(ranges, vec![0..100, 100..200, 200..237]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_batch() {
        let ranges: Vec<_> = batch_ranges(200, 100).collect();
        assert_eq!(ranges, vec![0..100, 100..200]);
        assert_eq!(batch_ranges(0, 100).count(), 0);
    }

    #[tokio::test]
    async fn writes_batches_in_order() {
        let library = ScriptedLibrary::with_pages(&[0]);
        let tracks = track_refs(237);
        let mut progress = Vec::new();

        let batches = write_batches(&library, "dest", &tracks, 100, |done, total| {
            progress.push((done, total))
        })
        .await
        .unwrap();

        assert_eq!(batches, 3);
        assert_eq!(library.batch_sizes(), vec![100, 100, 37]);
        assert_eq!(library.written_tracks(), tracks);
        assert_eq!(progress, vec![(100, 237), (200, 237), (237, 237)]);
    }

    #[tokio::test]
    async fn failed_batch_stops_remaining_writes() {
        let library = ScriptedLibrary::with_pages(&[0]).fail_batch_at(1);
        let tracks = track_refs(237);

        let err = write_batches(&library, "dest", &tracks, 100, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, ShuffleError::Write { batch: 1, .. }));
        // the first batch stays, nothing after the failure is attempted
        assert_eq!(library.batch_sizes(), vec![100]);
        assert_eq!(library.add_calls(), 2);
    }
}
