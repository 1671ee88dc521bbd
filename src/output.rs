//! Handing the data model over to a renderer.
//!
//! A renderer receives the data of a run as a single JSON object: all
//! members of [RoaData] plus the `version` of this crate.

use std::io;

use serde_derive::Serialize;

use crate::query::RoaData;

/// The version string made available to renderers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//------------ RenderContext -------------------------------------------------

#[derive(Clone, Copy, Debug, Serialize)]
pub struct RenderContext<'a> {
    version: &'a str,
    #[serde(flatten)]
    data: &'a RoaData,
}

impl<'a> RenderContext<'a> {
    pub fn new(data: &'a RoaData) -> Self {
        Self::with_version(data, VERSION)
    }

    pub fn with_version(data: &'a RoaData, version: &'a str) -> Self {
        Self { version, data }
    }

    pub fn version(&self) -> &str {
        self.version
    }

    pub fn data(&self) -> &RoaData {
        self.data
    }

    /// Converts the context into a JSON value, e.g. for a template engine.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Writes the compact JSON representation to a writer.
    pub fn to_writer(&self, writer: impl io::Write) -> Result<(), io::Error> {
        serde_json::to_writer(writer, self).map_err(Into::into)
    }

    /// Writes the pretty-printed JSON representation to a writer.
    pub fn to_writer_pretty(
        &self,
        writer: impl io::Write,
    ) -> Result<(), io::Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Into::into)
    }
}
