use crate::{
    error::ImageCloneError,
    spotify::{COVER_UPLOAD_LIMIT, RemoteLibrary},
    types::CoverImage,
    utils,
};

/// Copies a cover image onto a playlist.
///
/// URLs are downloaded first; raw bytes are uploaded as they are. The payload
/// is base64 encoded and checked against the upload limit before sending.
pub async fn clone_cover<L>(
    library: &L,
    playlist_id: &str,
    cover: &CoverImage,
) -> Result<usize, ImageCloneError>
where
    L: RemoteLibrary + ?Sized,
{
    let bytes = match cover {
        CoverImage::Url(url) => library
            .fetch_image(url)
            .await
            .map_err(ImageCloneError::Download)?,
        CoverImage::Bytes(bytes) => bytes.clone(),
    };

    let encoded = utils::encode_cover_image(&bytes);
    if encoded.len() > COVER_UPLOAD_LIMIT {
        return Err(ImageCloneError::TooLarge {
            size: encoded.len(),
            limit: COVER_UPLOAD_LIMIT,
        });
    }

    library
        .upload_cover_image(playlist_id, &encoded)
        .await
        .map_err(ImageCloneError::Upload)?;

    Ok(bytes.len())
}
