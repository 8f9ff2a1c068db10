//! This module provides the `SupervisorBuilder` for constructing a
//! `Supervisor`.

use std::sync::Arc;

use crate::{
    config::AppConfig,
    notification::PushSink,
    persistence::{ThresholdFile, ThresholdStore},
    providers::QuoteSource,
};

use super::{Supervisor, SupervisorError};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    threshold: Option<Arc<ThresholdStore>>,
    threshold_file: Option<ThresholdFile>,
    quote_source: Option<Arc<dyn QuoteSource>>,
    push_sink: Option<Arc<dyn PushSink>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the rehydrated threshold store for the `Supervisor`.
    pub fn threshold_store(mut self, threshold: Arc<ThresholdStore>) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the durable threshold storage for the `Supervisor`.
    pub fn threshold_file(mut self, threshold_file: ThresholdFile) -> Self {
        self.threshold_file = Some(threshold_file);
        self
    }

    /// Sets the external quote source for the `Supervisor`.
    pub fn quote_source(mut self, quote_source: Arc<dyn QuoteSource>) -> Self {
        self.quote_source = Some(quote_source);
        self
    }

    /// Sets the external push sink for the `Supervisor`.
    pub fn push_sink(mut self, push_sink: Arc<dyn PushSink>) -> Self {
        self.push_sink = Some(push_sink);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let threshold = self.threshold.ok_or(SupervisorError::MissingThresholdStore)?;
        let threshold_file = self.threshold_file.ok_or(SupervisorError::MissingThresholdFile)?;
        let quote_source = self.quote_source.ok_or(SupervisorError::MissingQuoteSource)?;
        let push_sink = self.push_sink.ok_or(SupervisorError::MissingPushSink)?;

        Ok(Supervisor::new(config, threshold, threshold_file, quote_source, push_sink))
    }
}
