use crate::artist_list::{ArtistList, Outcome, validate_name};
use crate::errors::ArtistsError;
use crate::metrics_defs::{STORE_CONFLICTS, STORE_WRITES};
use content_store::{ContentStore, VersionToken};
use shared::counter;
use std::sync::Arc;

/// List returned by a mutating operation, with what happened to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation {
    pub artists: ArtistList,
    pub outcome: Outcome,
}

/// List, add and remove over the artist file in the content store.
///
/// Each operation reads the file fresh; mutating operations write back at
/// most once per attempt, conditioned on the version they read. No state is
/// kept between calls.
pub struct ArtistService {
    store: Arc<dyn ContentStore>,
    file_path: String,
    conflict_retries: u32,
}

impl ArtistService {
    pub fn new<P: Into<String>>(store: Arc<dyn ContentStore>, file_path: P) -> Self {
        ArtistService {
            store,
            file_path: file_path.into(),
            conflict_retries: 0,
        }
    }

    /// Re-read and re-apply a mutation up to `retries` times when the write
    /// loses a race. Zero surfaces every conflict as an error.
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    pub fn check_ready(&self) -> Result<(), ArtistsError> {
        Ok(self.store.check_ready()?)
    }

    async fn read_list(&self) -> Result<(ArtistList, VersionToken), ArtistsError> {
        let content = self.store.read(&self.file_path).await?;
        let artists = ArtistList::parse(&content.text)?;
        Ok((artists, content.version))
    }

    pub async fn list(&self) -> Result<ArtistList, ArtistsError> {
        let (artists, _) = self.read_list().await?;
        Ok(artists)
    }

    pub async fn add(&self, name: &str) -> Result<Mutation, ArtistsError> {
        let name = validate_name(name)?;
        self.read_modify_write(|artists| artists.add(name)).await
    }

    pub async fn remove(&self, name: &str) -> Result<Mutation, ArtistsError> {
        let name = validate_name(name)?;
        self.read_modify_write(|artists| Ok(artists.remove(name))).await
    }

    async fn read_modify_write<F>(&self, mutate: F) -> Result<Mutation, ArtistsError>
    where
        F: Fn(&mut ArtistList) -> Result<Outcome, ArtistsError>,
    {
        let mut attempt = 0;

        loop {
            let (mut artists, version) = self.read_list().await?;
            let outcome = mutate(&mut artists)?;

            let Some(message) = outcome.commit_message() else {
                return Ok(Mutation { artists, outcome });
            };

            let text = artists.to_stored_text()?;
            match self
                .store
                .write(&self.file_path, &text, &version, &message)
                .await
            {
                Ok(()) => {
                    counter!(STORE_WRITES, "outcome" => outcome.as_str()).increment(1);
                    tracing::info!(
                        path = %self.file_path,
                        version = %version,
                        message = %message,
                        "Artist list updated"
                    );
                    return Ok(Mutation { artists, outcome });
                }
                Err(e) if e.is_conflict() => {
                    counter!(STORE_CONFLICTS).increment(1);
                    if attempt >= self.conflict_retries {
                        tracing::warn!(
                            path = %self.file_path,
                            version = %version,
                            "Artist list changed since it was read; giving up"
                        );
                        return Err(e.into());
                    }
                    attempt += 1;
                    tracing::warn!(
                        path = %self.file_path,
                        version = %version,
                        attempt,
                        "Artist list changed since it was read; retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
