use crate::{error::ApiError, spotify::RemoteLibrary, types::TrackRef};

/// Reads every track reference of a playlist, in playlist order.
///
/// Pages are requested at `page_size` until the API answers with a page that
/// has no items at all. A page whose items are all local files or removed
/// tracks yields no references but does not end the fetch. The total reported
/// by the API is never consulted. `on_page` receives the running count of
/// references after every page but the terminating one.
pub async fn fetch_all_tracks<L, F>(
    library: &L,
    playlist_id: &str,
    page_size: usize,
    mut on_page: F,
) -> Result<Vec<TrackRef>, ApiError>
where
    L: RemoteLibrary + ?Sized,
    F: FnMut(usize),
{
    let mut tracks = Vec::new();
    let mut offset = 0;

    loop {
        let page = library
            .list_playlist_items(playlist_id, offset, page_size)
            .await?;
        if page.is_end() {
            break;
        }

        tracks.extend(page.tracks);
        offset += page_size;
        on_page(tracks.len());
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::testing::ScriptedLibrary;

    #[tokio::test]
    async fn stops_at_first_empty_page() {
        let library = ScriptedLibrary::with_pages(&[100, 100, 37, 0]);
        let mut seen = Vec::new();

        let tracks = fetch_all_tracks(&library, "src", 100, |count| seen.push(count))
            .await
            .unwrap();

        assert_eq!(tracks.len(), 237);
        assert_eq!(seen, vec![100, 200, 237]);
        assert_eq!(library.page_requests(), vec![0, 100, 200, 300]);
    }

    #[tokio::test]
    async fn preserves_page_order() {
        let library = ScriptedLibrary::with_pages(&[3, 2, 0]);

        let tracks = fetch_all_tracks(&library, "src", 100, |_| {})
            .await
            .unwrap();

        assert_eq!(tracks, library.source_tracks());
    }

    #[tokio::test]
    async fn short_page_does_not_end_fetch() {
        // a page shorter than the limit is not treated as the last one
        let library = ScriptedLibrary::with_pages(&[40, 100, 0]);

        let tracks = fetch_all_tracks(&library, "src", 100, |_| {})
            .await
            .unwrap();

        assert_eq!(tracks.len(), 140);
    }

    #[tokio::test]
    async fn page_without_addable_tracks_does_not_end_fetch() {
        // first page holds nothing but local files
        let library = ScriptedLibrary::with_pages(&[0, 50, 0]).with_unaddable(0, 100);
        let mut seen = Vec::new();

        let tracks = fetch_all_tracks(&library, "src", 100, |count| seen.push(count))
            .await
            .unwrap();

        assert_eq!(tracks.len(), 50);
        assert_eq!(tracks, library.source_tracks());
        assert_eq!(seen, vec![0, 50]);
        assert_eq!(library.page_requests(), vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn page_failure_is_propagated() {
        let library = ScriptedLibrary::with_pages(&[100, 100, 0]).fail_page_at(100);

        let err = fetch_all_tracks(&library, "src", 100, |_| {})
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
    }
}
