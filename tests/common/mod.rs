// Shared test doubles: a scripted classifier that counts what it's asked.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use tabweave::content::item::{ContentItem, Handle};
use tabweave::topics::traits::{Availability, Classifier, ClassifierSession, SessionConfig};

/// How the mock answers a topic prompt for a given page title.
#[derive(Clone)]
pub enum TopicReply {
    Topic(String),
    Fail,
    /// Never answers; only a deadline gets the caller out
    Hang,
}

/// How the mock answers yes/no equivalence prompts.
#[derive(Clone, Copy)]
pub enum JudgeReply {
    Yes,
    No,
    Fail,
}

#[derive(Default)]
pub struct Counters {
    pub topic_prompts: AtomicUsize,
    pub judge_prompts: AtomicUsize,
    pub sessions_created: AtomicUsize,
    pub sessions_destroyed: AtomicUsize,
    pub availability_checks: AtomicUsize,
    /// Config passed to each `create` call, in order
    pub session_configs: Mutex<Vec<SessionConfig>>,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<SessionConfig> {
        self.session_configs.lock().unwrap().clone()
    }
}

pub struct MockClassifier {
    pub availability: Availability,
    pub create_fails: bool,
    pub topics: HashMap<String, TopicReply>,
    pub judge: JudgeReply,
    pub counters: Arc<Counters>,
}

impl MockClassifier {
    pub fn available() -> Self {
        Self {
            availability: Availability::Available,
            create_fails: false,
            topics: HashMap::new(),
            judge: JudgeReply::No,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_availability(availability: Availability) -> Self {
        Self {
            availability,
            ..Self::available()
        }
    }

    pub fn topic(mut self, title: &str, reply: TopicReply) -> Self {
        self.topics.insert(title.to_string(), reply);
        self
    }

    pub fn judge(mut self, reply: JudgeReply) -> Self {
        self.judge = reply;
        self
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn availability(&self) -> Availability {
        self.counters.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.availability
    }

    async fn create(&self, config: &SessionConfig) -> Result<Box<dyn ClassifierSession>> {
        self.counters.session_configs.lock().unwrap().push(config.clone());
        if self.create_fails {
            anyhow::bail!("model crashed while loading");
        }
        self.counters.sessions_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            topics: self.topics.clone(),
            judge: self.judge,
            counters: self.counters.clone(),
        }))
    }
}

struct MockSession {
    topics: HashMap<String, TopicReply>,
    judge: JudgeReply,
    counters: Arc<Counters>,
}

#[async_trait]
impl ClassifierSession for MockSession {
    async fn prompt(&self, text: &str) -> Result<String> {
        if text.starts_with("In 3-5 words") {
            self.counters.topic_prompts.fetch_add(1, Ordering::SeqCst);
            let title = text
                .lines()
                .find_map(|l| l.strip_prefix("Title: "))
                .unwrap_or_default();
            return match self.topics.get(title) {
                Some(TopicReply::Topic(t)) => Ok(format!("  {t}\n")),
                Some(TopicReply::Fail) => anyhow::bail!("generation failed"),
                Some(TopicReply::Hang) => std::future::pending().await,
                None => Ok(title.to_string()),
            };
        }

        self.counters.judge_prompts.fetch_add(1, Ordering::SeqCst);
        match self.judge {
            JudgeReply::Yes => Ok("Yes.".to_string()),
            JudgeReply::No => Ok("NO".to_string()),
            JudgeReply::Fail => anyhow::bail!("judgment failed"),
        }
    }

    fn destroy(&self) {
        self.counters.sessions_destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn page(id: u64, title: &str, url: &str) -> ContentItem {
    ContentItem::new(Handle(id), title, "", format!("About {title}"), url)
}

pub fn handles(items: &[ContentItem]) -> Vec<Handle> {
    items.iter().map(|i| i.handle).collect()
}
