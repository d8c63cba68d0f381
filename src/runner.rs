use std::io::{Read, Write};
use std::sync::Arc;

use log::{info, warn};

use crate::cliopt::CliOpt;
use crate::error::Result;
use crate::model::WriteRequest;
use crate::pipeline::{serialize, Config, SharedConfig, TopicRecords};

// stdin | file
//   -> WriteRequest (JSON)
//     -> Filter -> Topic -> Serializer
//       -> TopicRecords
//         -> "topic\trecord" lines
//           -> stdout

pub struct Runner {
    config: SharedConfig,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self {
            config: SharedConfig::new(config),
        }
    }

    pub fn from_opt(opt: &CliOpt) -> Result<Self> {
        let serializer = Arc::from(opt.format.serializer(&opt.schema)?);
        let config = Config::from_text(opt.matches.as_deref(), opt.topic.as_deref())?
            .with_serializer(serializer);

        info!(
            "Serializing as {}, topic template {:?}, {} rule(s)",
            opt.format,
            config.topic().map(|t| t.source()),
            config.rules().len()
        );

        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Serializes one write request and writes its records. Nothing is
    /// written when serialization fails. Returns the number of records.
    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> Result<usize> {
        let request: WriteRequest =
            serde_json::from_reader(input).map_err(|e| ("couldn't decode write request", e))?;

        let config = self.config.load();
        let records = serialize(config.serializer().as_ref(), &config, &request).map_err(|e| {
            warn!(
                "Serialization failed, discarding {} topic(s) of partial output: {}",
                e.partial().len(),
                e
            );
            e
        })?;

        let mut writer = RecordWriter::new(output);
        writer.write_all(&records)
    }
}

struct RecordWriter<W> {
    inner: W,
    delim: u8,
}

impl<W: Write> RecordWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            delim: b'\n',
        }
    }

    fn write(&mut self, topic: &str, record: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(topic.as_bytes())?;
        self.inner.write_all(b"\t")?;
        self.inner.write_all(record)?;
        self.inner.write_all(&[self.delim])
    }

    fn write_all(&mut self, records: &TopicRecords) -> Result<usize> {
        let mut count = 0;
        for (topic, records) in records {
            for record in records {
                self.write(topic, record)
                    .map_err(|e| ("couldn't write record", e))?;
                count += 1;
            }
        }
        self.inner.flush().map_err(|e| ("couldn't flush output", e))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const REQUEST: &str = r#"{
        "timeseries": [
            {
                "labels": [{"name": "__name__", "value": "up"}, {"name": "job", "value": "api"}],
                "samples": [{"value": 1, "timestamp": 0}, {"value": "NaN", "timestamp": 1000}]
            },
            {
                "labels": [{"name": "__name__", "value": "up"}],
                "samples": [{"value": 0, "timestamp": 0}]
            }
        ]
    }"#;

    fn runner(rules: Option<&str>, topic: Option<&str>) -> Runner {
        Runner::new(Config::from_text(rules, topic).expect("valid config expected"))
    }

    #[test]
    fn test_run() -> Result<()> {
        let mut output = Vec::new();
        let count = runner(Some(r#"up{job="api"}"#), None).run(REQUEST.as_bytes(), &mut output)?;

        assert_eq!(2, count);
        assert_eq!(
            concat!(
                "metrics\t{\"value\":\"1\",\"timestamp\":\"1970-01-01T00:00:00Z\",\"name\":\"up\",\"labels\":{\"__name__\":\"up\",\"job\":\"api\"}}\n",
                "metrics\t{\"value\":\"NaN\",\"timestamp\":\"1970-01-01T00:00:01Z\",\"name\":\"up\",\"labels\":{\"__name__\":\"up\",\"job\":\"api\"}}\n",
            ),
            String::from_utf8_lossy(&output)
        );
        Ok(())
    }

    #[test]
    fn test_run_failure_writes_nothing() {
        let mut output = Vec::new();
        let err = runner(None, Some(r#"{{ index . "job" }}"#))
            .run(REQUEST.as_bytes(), &mut output)
            .unwrap_err();

        assert_eq!(ErrorKind::MissingLabel, err.kind());
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_reconfigured() -> Result<()> {
        let runner = runner(None, None);
        runner.config().reconfigure(None, Some("prom"), None)?;

        let mut output = Vec::new();
        assert_eq!(3, runner.run(REQUEST.as_bytes(), &mut output)?);
        assert!(String::from_utf8_lossy(&output)
            .lines()
            .all(|line| line.starts_with("prom\t")));
        Ok(())
    }

    #[test]
    fn test_malformed_request() {
        let err = runner(None, None)
            .run(&b"{\"timeseries\": 42}"[..], Vec::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("couldn't decode write request"));
    }
}
