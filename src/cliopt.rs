use std::path::PathBuf;

use structopt::StructOpt;

use crate::serializer::SerializationFormat;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "promkafka",
    about = "Turn Prometheus remote-write requests into per-topic records"
)]
pub struct CliOpt {
    /// Topic template, e.g. 'prom-{{ index . "job" }}'. Defaults to "metrics".
    #[structopt(long = "topic", short = "t", env = "KAFKA_TOPIC")]
    pub topic: Option<String>,

    /// Admission rules, e.g. "['up{job=\"api\"}', 'errors']". No rules admit everything.
    #[structopt(long = "match", short = "m", env = "MATCH")]
    pub matches: Option<String>,

    /// Record format: json or avro-json.
    #[structopt(
        long = "format",
        short = "f",
        env = "SERIALIZATION_FORMAT",
        default_value = "json"
    )]
    pub format: SerializationFormat,

    /// Avro schema used by the avro-json format.
    #[structopt(
        long = "schema",
        env = "AVRO_SCHEMA_PATH",
        default_value = "schemas/metric.avsc",
        parse(from_os_str)
    )]
    pub schema: PathBuf,

    #[structopt(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// JSON-encoded write request. Read from stdin when omitted.
    #[structopt(parse(from_os_str))]
    pub input: Option<PathBuf>,
}
