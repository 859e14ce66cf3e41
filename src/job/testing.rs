//! Scripted [`RemoteLibrary`] used by the unit tests of this module.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::ApiError,
    spotify::{PAGE_LIMIT, RemoteLibrary},
    types::{CoverImage, CreatedPlaylist, PlaylistSnapshot, TrackPage, TrackRef},
};

pub(crate) fn track_refs(n: usize) -> Vec<TrackRef> {
    (0..n)
        .map(|i| TrackRef::new(format!("spotify:track:{:06}", i)))
        .collect()
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "scripted failure".to_string(),
    }
}

#[derive(Default)]
struct Recorded {
    page_requests: Vec<usize>,
    created: Vec<(String, String, bool)>,
    uploads: Vec<String>,
    add_calls: usize,
    batches: Vec<Vec<TrackRef>>,
    image_fetches: usize,
}

pub(crate) struct ScriptedLibrary {
    pages: Vec<TrackPage>,
    cover: Option<CoverImage>,
    image: Vec<u8>,
    fail_get: bool,
    fail_page_at: Option<usize>,
    fail_create: bool,
    fail_image: bool,
    fail_upload: bool,
    fail_batch_at: Option<usize>,
    recorded: Mutex<Recorded>,
}

impl ScriptedLibrary {
    /// Source playlist served as pages of the given sizes, in order.
    pub(crate) fn with_pages(sizes: &[usize]) -> Self {
        let mut next = 0;
        let pages = sizes
            .iter()
            .map(|&size| {
                let tracks = (next..next + size)
                    .map(|i| TrackRef::new(format!("spotify:track:{:06}", i)))
                    .collect();
                next += size;
                TrackPage {
                    tracks,
                    raw_len: size,
                }
            })
            .collect();

        Self {
            pages,
            cover: None,
            image: vec![0xFF, 0xD8, 0xFF, 0xE0],
            fail_get: false,
            fail_page_at: None,
            fail_create: false,
            fail_image: false,
            fail_upload: false,
            fail_batch_at: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Adds `count` items without an addable reference (local files) to the
    /// page at `index`.
    pub(crate) fn with_unaddable(mut self, index: usize, count: usize) -> Self {
        if let Some(page) = self.pages.get_mut(index) {
            page.raw_len += count;
        }
        self
    }

    pub(crate) fn with_cover(mut self, cover: CoverImage) -> Self {
        self.cover = Some(cover);
        self
    }

    pub(crate) fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = bytes;
        self
    }

    pub(crate) fn fail_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub(crate) fn fail_page_at(mut self, offset: usize) -> Self {
        self.fail_page_at = Some(offset);
        self
    }

    pub(crate) fn fail_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(crate) fn fail_image(mut self) -> Self {
        self.fail_image = true;
        self
    }

    pub(crate) fn fail_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub(crate) fn fail_batch_at(mut self, batch: usize) -> Self {
        self.fail_batch_at = Some(batch);
        self
    }

    pub(crate) fn source_tracks(&self) -> Vec<TrackRef> {
        self.pages
            .iter()
            .flat_map(|page| page.tracks.iter().cloned())
            .collect()
    }

    pub(crate) fn page_requests(&self) -> Vec<usize> {
        self.recorded.lock().unwrap().page_requests.clone()
    }

    pub(crate) fn created(&self) -> Vec<(String, String, bool)> {
        self.recorded.lock().unwrap().created.clone()
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.recorded.lock().unwrap().uploads.clone()
    }

    pub(crate) fn image_fetches(&self) -> usize {
        self.recorded.lock().unwrap().image_fetches
    }

    pub(crate) fn add_calls(&self) -> usize {
        self.recorded.lock().unwrap().add_calls
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.recorded
            .lock()
            .unwrap()
            .batches
            .iter()
            .map(|b| b.len())
            .collect()
    }

    pub(crate) fn written_tracks(&self) -> Vec<TrackRef> {
        self.recorded
            .lock()
            .unwrap()
            .batches
            .iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RemoteLibrary for ScriptedLibrary {
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistSnapshot, ApiError> {
        if self.fail_get {
            return Err(ApiError::Status {
                status: 404,
                message: "Not found.".to_string(),
            });
        }

        Ok(PlaylistSnapshot {
            id: playlist_id.to_string(),
            name: "Road Trip".to_string(),
            description: "songs for the car".to_string(),
            owner_id: "owner".to_string(),
            tracks: Vec::new(),
            cover: self.cover.clone(),
        })
    }

    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        offset: usize,
        _limit: usize,
    ) -> Result<TrackPage, ApiError> {
        self.recorded.lock().unwrap().page_requests.push(offset);
        if self.fail_page_at == Some(offset) {
            return Err(server_error());
        }

        Ok(self
            .pages
            .get(offset / PAGE_LIMIT)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_user_id(&self) -> Result<String, ApiError> {
        Ok("listener".to_string())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatedPlaylist, ApiError> {
        if self.fail_create {
            return Err(server_error());
        }

        let mut recorded = self.recorded.lock().unwrap();
        recorded
            .created
            .push((name.to_string(), description.to_string(), public));
        Ok(CreatedPlaylist {
            id: format!("dest{}", recorded.created.len()),
            share_url: Some("https://open.spotify.com/playlist/dest".to_string()),
        })
    }

    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
        self.recorded.lock().unwrap().image_fetches += 1;
        if self.fail_image {
            return Err(server_error());
        }
        Ok(self.image.clone())
    }

    async fn upload_cover_image(
        &self,
        _playlist_id: &str,
        base64_jpeg: &str,
    ) -> Result<(), ApiError> {
        if self.fail_upload {
            return Err(server_error());
        }
        self.recorded
            .lock()
            .unwrap()
            .uploads
            .push(base64_jpeg.to_string());
        Ok(())
    }

    async fn add_items(&self, _playlist_id: &str, tracks: &[TrackRef]) -> Result<(), ApiError> {
        let mut recorded = self.recorded.lock().unwrap();
        let batch = recorded.add_calls;
        recorded.add_calls += 1;
        if self.fail_batch_at == Some(batch) {
            return Err(server_error());
        }
        recorded.batches.push(tracks.to_vec());
        Ok(())
    }
}
