//! Picks which feed item the reader sees next and records their votes.
//!
//! The item on screen is the most recently shown item without a vote. A vote
//! settles that item and advances to the best-scoring unseen item; a request
//! without a vote just returns the item already on screen.

use std::cmp::Ordering;
use std::sync::RwLock;

use diesel::{Connection, SqliteConnection};

use crate::{
    classifier::NaiveBayesClassifier,
    errors::{AppError, AppResult},
    models::feed_item::FeedItem,
};

pub struct Reader {
    classifier: RwLock<NaiveBayesClassifier>,
}

impl Reader {
    pub fn new(classifier: NaiveBayesClassifier) -> Self {
        Reader {
            classifier: RwLock::new(classifier),
        }
    }

    /// Build a reader whose classifier has learned every stored vote.
    pub fn load(conn: &mut SqliteConnection, min_training_votes: usize) -> AppResult<Self> {
        let voted = FeedItem::voted(conn)?;
        let mut classifier = NaiveBayesClassifier::new(min_training_votes);
        classifier.train(
            voted
                .iter()
                .filter_map(|item| item.liked.map(|liked| (item.document_text(), liked))),
        );
        log::info!(
            "Classifier trained on {} votes (ready: {})",
            classifier.votes(),
            classifier.is_ready()
        );
        Ok(Reader::new(classifier))
    }

    /// The item currently on screen, if any.
    pub fn current(&self, conn: &mut SqliteConnection) -> AppResult<Option<FeedItem>> {
        Ok(FeedItem::current(conn)?)
    }

    /// Apply `vote` to the item on screen and return the item to show next.
    ///
    /// `None` means there is nothing left to read.
    pub fn next(&self, conn: &mut SqliteConnection, vote: Option<bool>) -> AppResult<Option<FeedItem>> {
        let now = chrono::Utc::now().timestamp() as i32;

        let (voted, next) = conn.transaction::<_, AppError, _>(|conn| {
            let current = FeedItem::current(conn)?;

            let voted = match (vote, current) {
                (None, Some(current)) => return Ok((None, Some(current))),
                (Some(liked), Some(current)) => {
                    let voted = FeedItem::record_vote(conn, current.id, liked, now)?;
                    log::info!("Recorded vote liked={} for item {}", liked, voted.id);
                    Some(voted)
                }
                (Some(liked), None) => {
                    log::info!("Ignoring vote liked={} with no item on screen", liked);
                    None
                }
                (None, None) => None,
            };

            let Some(best) = self.pick_next(conn)? else {
                log::info!("No unseen items left");
                return Ok((voted, None));
            };
            Ok((voted, Some(FeedItem::mark_shown(conn, best.id, now)?)))
        })?;

        // only learn votes that were committed
        if let Some(voted) = voted {
            if let Some(liked) = voted.liked {
                self.classifier
                    .write()
                    .map_err(|_| AppError::InternalError)?
                    .learn(&voted.document_text(), liked);
            }
        }
        Ok(next)
    }

    fn pick_next(&self, conn: &mut SqliteConnection) -> AppResult<Option<FeedItem>> {
        let candidates = FeedItem::unseen(conn)?;
        let classifier = self.classifier.read().map_err(|_| AppError::InternalError)?;

        let best = candidates
            .into_iter()
            .map(|item| (classifier.score(&item.document_text()), item))
            .max_by(|(score_a, a), (score_b, b)| {
                score_a
                    .partial_cmp(score_b)
                    .unwrap_or(Ordering::Equal)
                    .then(a.pub_date.cmp(&b.pub_date))
                    .then(b.id.cmp(&a.id))
            });

        if let Some((score, item)) = &best {
            log::debug!("Next item {} scored {:.3}", item.id, score);
        }
        Ok(best.map(|(_, item)| item))
    }
}
