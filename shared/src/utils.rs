use futures_util::TryStreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Follows a line-delimited JSON watch endpoint, handing each decoded event to `handle_event`.
/// Returns once the stream ends or the request fails.
pub async fn watch_stream<T, F>(client: &Client, url: &str, mut handle_event: F)
where
    T: DeserializeOwned,
    F: FnMut(T) + Send + 'static,
{
    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let byte_stream = resp.bytes_stream().map_err(std::io::Error::other);
            let mut lines = BufReader::new(StreamReader::new(byte_stream)).lines();

            tracing::debug!(%url, "Started watching stream");

            while let Ok(Some(line)) = lines.next_line().await {
                match serde_json::from_str::<T>(&line) {
                    Ok(event) => handle_event(event),
                    Err(e) => tracing::warn!(%line, error=%e, "Failed to deserialize watch event"),
                }
            }

            tracing::warn!(%url, "Watch stream ended");
        }
        Ok(resp) => tracing::error!(status=%resp.status(), %url, "Watch request failed: HTTP"),
        Err(err) => tracing::error!(error=%err, %url, "Watch request error"),
    }
}
