mod avro;
mod json;
mod serializer;

pub use avro::AvroJsonSerializer;
pub use json::JsonSerializer;
pub use serializer::{SerializationFormat, Serializer};
