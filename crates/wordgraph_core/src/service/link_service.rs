//! Link use-case service.
//!
//! # Responsibility
//! - Create (upsert), read, update and delete labeled Links.
//!
//! # Invariants
//! - `create_link` is idempotent per unordered pair: repeated or reversed
//!   calls return the same Link id and never store a duplicate.
//! - Missing words on create are `BadInput`; on lookup they are `NotFound`.
//! - Passing the same word twice is `BadInput` on create and delete.
//! - `delete_link` is authorized against both words' owners; a denial is
//!   reported as `NotFound`.

use crate::auth::{authorize, is_allowed};
use crate::context::CallContext;
use crate::model::link::{Link, LinkFields, LinkId};
use crate::model::word::WordId;
use crate::repo::link_repo::{LinkRepository, LinkUpsert};
use crate::repo::word_repo::WordRepository;
use crate::repo::RepoError;
use crate::service::{observe, ServiceError, ServiceResult};
use log::{debug, Level};

/// Link service facade over repository implementations.
pub struct LinkService<L: LinkRepository, W: WordRepository> {
    links: L,
    words: W,
}

impl<L: LinkRepository, W: WordRepository> LinkService<L, W> {
    pub fn new(links: L, words: W) -> Self {
        Self { links, words }
    }

    /// Creates the Link for `{word1, word2}` or updates the existing one in place.
    ///
    /// New Links are owned by the caller; an existing Link keeps its owner.
    pub fn create_link(
        &self,
        ctx: &CallContext,
        word1: WordId,
        word2: WordId,
        fields: &LinkFields,
    ) -> ServiceResult<LinkUpsert> {
        observe("link_create", Level::Info, || {
            ctx.checkpoint()?;
            if word1 == word2 {
                return Err(ServiceError::bad_input("a word cannot be linked to itself"));
            }
            fields.validate()?;
            let upsert = self
                .links
                .upsert_link(word1, word2, &ctx.profile().id, fields)
                .map_err(|err| match err {
                    RepoError::WordNotFound(id) => {
                        ServiceError::bad_input(format!("word {id} does not exist"))
                    }
                    other => other.into(),
                })?;
            debug!(
                "event=link_create module=service link_id={} created={}",
                upsert.link.id, upsert.created
            );
            Ok(upsert)
        })
    }

    /// Replaces the editable fields of a Link.
    pub fn update_link(
        &self,
        ctx: &CallContext,
        id: LinkId,
        fields: &LinkFields,
    ) -> ServiceResult<Link> {
        observe("link_update", Level::Info, || {
            ctx.checkpoint()?;
            fields.validate()?;
            let link = self.get_link(ctx, id)?;
            authorize(ctx.profile(), &link.owner_id)?;
            Ok(self.links.update_link(id, fields)?)
        })
    }

    /// Removes the Link and every adjacency edge between two words.
    pub fn delete_link(&self, ctx: &CallContext, word1: WordId, word2: WordId) -> ServiceResult<()> {
        observe("link_delete", Level::Info, || {
            ctx.checkpoint()?;
            if word1 == word2 {
                return Err(ServiceError::bad_input("a word has no link to itself"));
            }
            let words = self.words.find_by_ids(&[word1, word2])?;
            let permitted = words.len() == 2
                && words
                    .iter()
                    .all(|word| is_allowed(ctx.profile(), &word.owner_id));
            if !permitted {
                return Err(ServiceError::not_found(format!(
                    "link between {word1} and {word2}"
                )));
            }

            let removal = self.links.delete_link_by_pair(word1, word2)?;
            debug!(
                "event=link_delete module=service link_removed={} edges_removed={}",
                removal.link_removed, removal.edges_removed
            );
            Ok(())
        })
    }

    pub fn get_link(&self, ctx: &CallContext, id: LinkId) -> ServiceResult<Link> {
        ctx.checkpoint()?;
        self.links
            .find_link_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(format!("link {id}")))
    }

    /// Pair lookup; argument order does not matter.
    pub fn get_link_by_words(
        &self,
        ctx: &CallContext,
        word1: WordId,
        word2: WordId,
    ) -> ServiceResult<Link> {
        ctx.checkpoint()?;
        for id in [word1, word2] {
            if self.words.find_by_id(id)?.is_none() {
                return Err(ServiceError::not_found(format!("word {id}")));
            }
        }
        self.links
            .find_link_by_pair(word1, word2)?
            .ok_or_else(|| ServiceError::not_found(format!("link between {word1} and {word2}")))
    }
}
