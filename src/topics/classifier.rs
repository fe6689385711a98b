// TopicClassifier — topic extraction and topic comparison over one session.
//
// Neither operation can fail from the caller's point of view:
//
// - extract_topic races the model against a deadline. On timeout, error, or
//   a blank answer the item's title (first 50 characters) becomes its topic.
// - topics_equivalent settles clear cases lexically (auto-accept above 0.8,
//   auto-reject below 0.2) and only asks the model about the middle band.
//   Any failure there means "not equivalent": splitting two related pages
//   is cheaper for the user than merging two unrelated ones.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::similarity;
use super::traits::ClassifierSession;
use crate::content::item::ContentItem;
use crate::grouping::cluster::EquivalenceJudge;

/// Lexical score above which two topics are the same without asking the model.
pub const AUTO_ACCEPT_THRESHOLD: f64 = 0.8;
/// Lexical score below which two topics differ without asking the model.
pub const AUTO_REJECT_THRESHOLD: f64 = 0.2;
/// Deadline for a single topic extraction.
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(10);
/// Characters of the title kept when it stands in for a topic.
pub const FALLBACK_TOPIC_CHARS: usize = 50;
/// Characters of body text included in the extraction prompt.
const PROMPT_TEXT_CHARS: usize = 300;

/// Topic operations bound to a single borrowed session.
///
/// The session stays owned by the grouping engine; this wrapper only borrows
/// it for the run, so it can never outlive or release it.
pub struct TopicClassifier<'a> {
    session: &'a dyn ClassifierSession,
    extraction_timeout: Duration,
}

impl<'a> TopicClassifier<'a> {
    pub fn new(session: &'a dyn ClassifierSession, extraction_timeout: Duration) -> Self {
        Self {
            session,
            extraction_timeout,
        }
    }

    /// Ask the model for a short, specific topic for this item.
    ///
    /// Always returns a usable topic. When the deadline passes, the pending
    /// request is dropped and its eventual answer ignored; the session itself
    /// stays open for the next item.
    pub async fn extract_topic(&self, item: &ContentItem) -> String {
        let prompt = topic_prompt(item);

        match tokio::time::timeout(self.extraction_timeout, self.session.prompt(&prompt)).await {
            Ok(Ok(answer)) => {
                let topic = answer.trim();
                if topic.is_empty() {
                    warn!(title = item.title, "Model returned an empty topic, using title");
                    return fallback_topic(item);
                }
                debug!(
                    title = crate::output::truncate_chars(&item.title, 40),
                    topic = topic,
                    "Extracted topic"
                );
                topic.to_string()
            }
            Ok(Err(e)) => {
                warn!(title = item.title, error = %e, "Topic extraction failed, using title");
                fallback_topic(item)
            }
            Err(_) => {
                warn!(
                    title = item.title,
                    timeout_ms = self.extraction_timeout.as_millis() as u64,
                    "Topic extraction timed out, using title"
                );
                fallback_topic(item)
            }
        }
    }

    /// Decide whether two topics describe the same specific subject.
    ///
    /// No deadline is applied to the model call here; a slow answer stalls
    /// the caller for as long as the backend takes.
    pub async fn topics_equivalent(&self, topic_a: &str, topic_b: &str) -> bool {
        let lexical = similarity::score(topic_a, topic_b);
        if lexical > AUTO_ACCEPT_THRESHOLD {
            return true;
        }
        if lexical < AUTO_REJECT_THRESHOLD {
            return false;
        }

        match self.session.prompt(&equivalence_prompt(topic_a, topic_b)).await {
            Ok(answer) => {
                let same = answer.trim().to_uppercase().contains("YES");
                debug!(topic_a, topic_b, lexical, same, "Judged topic equivalence");
                same
            }
            Err(e) => {
                warn!(topic_a, topic_b, error = %e, "Similarity judgment failed, keeping topics apart");
                false
            }
        }
    }
}

#[async_trait]
impl<'a> EquivalenceJudge for TopicClassifier<'a> {
    async fn equivalent(&self, topic_a: &str, topic_b: &str) -> bool {
        self.topics_equivalent(topic_a, topic_b).await
    }
}

/// The topic used when the model can't provide one: the title, cut to 50 characters.
pub fn fallback_topic(item: &ContentItem) -> String {
    item.title.chars().take(FALLBACK_TOPIC_CHARS).collect()
}

/// Build the topic extraction prompt for an item.
pub fn topic_prompt(item: &ContentItem) -> String {
    let headings = if item.headings.trim().is_empty() {
        "None"
    } else {
        item.headings.trim()
    };
    let text: String = item.text.chars().take(PROMPT_TEXT_CHARS).collect();

    format!(
        "In 3-5 words, what is the SPECIFIC topic of this webpage? Be precise.\n\n\
         Title: {}\n\
         Headings: {}\n\
         Content: {}\n\n\
         Topic:",
        item.title, headings, text
    )
}

/// Build the yes/no prompt asking whether two topics match.
pub fn equivalence_prompt(topic_a: &str, topic_b: &str) -> String {
    format!(
        "Are these two topics about the same specific subject? Answer only YES or NO.\n\n\
         Topic 1: {topic_a}\n\
         Topic 2: {topic_b}\n\n\
         Answer:"
    )
}
