use std::fmt;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;

use crate::error::Result;
use crate::filter::MatchRuleSet;
use crate::model::Labels;
use crate::serializer::{JsonSerializer, SerializationFormat, Serializer};
use crate::topic::{TopicTemplate, DEFAULT_TOPIC};

/// Everything a serialize call needs: admission rules, topic template and
/// the record serializer. Built once per configuration change and only read
/// afterwards.
pub struct Config {
    rules: MatchRuleSet,
    topic: Option<TopicTemplate>,
    serializer: Arc<dyn Serializer>,
}

impl Config {
    pub fn new(
        rules: MatchRuleSet,
        topic: Option<TopicTemplate>,
        serializer: Arc<dyn Serializer>,
    ) -> Self {
        Self {
            rules,
            topic,
            serializer,
        }
    }

    /// Blank texts leave the corresponding part unconfigured. Records are
    /// plain JSON until another serializer is set.
    pub fn from_text(rules: Option<&str>, topic: Option<&str>) -> Result<Self> {
        let rules = match rules.filter(|s| !s.trim().is_empty()) {
            Some(text) => MatchRuleSet::parse(text)?,
            None => MatchRuleSet::disabled(),
        };

        let topic = match topic.filter(|s| !s.trim().is_empty()) {
            Some(text) => Some(TopicTemplate::compile(text)?),
            None => None,
        };

        Ok(Self::new(rules, topic, Arc::new(JsonSerializer::new())))
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn rules(&self) -> &MatchRuleSet {
        &self.rules
    }

    pub fn topic(&self) -> Option<&TopicTemplate> {
        self.topic.as_ref()
    }

    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    pub fn admits(&self, name: &str, labels: &Labels) -> bool {
        self.rules.filter(name, labels)
    }

    pub fn topic_for(&self, labels: &Labels) -> Result<String> {
        match &self.topic {
            Some(template) => template.evaluate(labels),
            None => Ok(DEFAULT_TOPIC.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            MatchRuleSet::disabled(),
            None,
            Arc::new(JsonSerializer::new()),
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("rules", &self.rules)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

/// The active configuration, replaceable while readers keep using
/// whatever snapshot they loaded.
#[derive(Debug)]
pub struct SharedConfig {
    current: ArcSwap<Config>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    pub fn load(&self) -> Arc<Config> {
        self.current.load_full()
    }

    pub fn store(&self, config: Config) {
        self.current.store(Arc::new(config));
    }

    /// Compiles rules, topic template and, if a format is given, the
    /// serializer, then makes them current in one swap. Without a format
    /// the current serializer is kept. On error the previous configuration
    /// stays active.
    pub fn reconfigure(
        &self,
        rules: Option<&str>,
        topic: Option<&str>,
        format: Option<(SerializationFormat, &Path)>,
    ) -> Result<()> {
        let serializer: Arc<dyn Serializer> = match format {
            Some((format, schema)) => Arc::from(format.serializer(schema)?),
            None => Arc::clone(self.load().serializer()),
        };
        let config = Config::from_text(rules, topic)?.with_serializer(serializer);

        debug!(
            "Swapping configuration: {} rule(s), topic template {:?}, format {:?}",
            config.rules.len(),
            config.topic.as_ref().map(|t| t.source()),
            format.map(|(f, _)| f.to_string())
        );
        self.store(config);
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
