//! Step execution.
//!
//! A [`Runner`] drives cases through the pipeline: resolve placeholders, send,
//! check the status code, assert a body value, capture values for later steps.
//! All steps of a run share one [`VariableStore`]; nothing else carries state
//! from one step to the next.
//!
//! Steps run strictly in source order. A failing step does not stop the run,
//! but values it would have captured are missing for the steps after it.

pub mod report;

pub use report::{StepReport, StepStatus, SuiteReport};

use crate::assertion::{assert_classified_value, assert_status_code, AssertionError};
use crate::cases::{open_case_source, prepare_request, CaseError, CaseRecord, CaseSource};
use crate::config::{HarnessConfig, HostConfig};
use crate::executor::{ExecutionConfig, Transport};
use crate::models::HttpResponse;
use crate::response::classify;
use crate::variables::{apply_captures, parse_capture_directives, VariableStore};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Prefix of the store key under which a successful response body is cached.
pub const RESPONSE_CACHE_PREFIX: &str = "response_";

/// Behaviour switches taken from the harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Keep decoded bodies of responses below 400 as `response_<title>`.
    pub cache_responses: bool,
    /// Write each step's outcome back into its case source.
    pub write_results: bool,
    pub result_column: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cache_responses: false,
            write_results: false,
            result_column: "result".to_string(),
        }
    }
}

impl From<&HarnessConfig> for RunOptions {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            cache_responses: config.cache_responses,
            write_results: config.write_results,
            result_column: config.result_column.clone(),
        }
    }
}

/// Executes cases against a transport, carrying captured values between them.
pub struct Runner<T: Transport> {
    transport: T,
    store: VariableStore,
    hosts: HostConfig,
    execution: ExecutionConfig,
    options: RunOptions,
}

impl<T: Transport> Runner<T> {
    /// Creates a runner with an empty store and default options.
    pub fn new(transport: T, hosts: HostConfig, execution: ExecutionConfig) -> Self {
        Self {
            transport,
            store: VariableStore::new(),
            hosts,
            execution,
            options: RunOptions::default(),
        }
    }

    /// Creates a runner from the harness configuration, loading its host file.
    pub fn from_config(transport: T, config: &HarnessConfig) -> Self {
        let hosts = HostConfig::load(&config.hosts_file);
        Self::new(transport, hosts, ExecutionConfig::new(config.timeout))
            .with_options(RunOptions::from(config))
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Mutable access to the store, e.g. to seed variables before a run.
    pub fn store_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }

    pub fn hosts(&self) -> &HostConfig {
        &self.hosts
    }

    /// Runs one case.
    ///
    /// Never returns an error: every problem is folded into the report's
    /// status so the caller can move on to the next case.
    pub fn run_case(&mut self, case: &CaseRecord) -> StepReport {
        let label = case.label();

        if case.skip {
            info!(case = %label, "skipped");
            return StepReport::new(label, StepStatus::Skipped);
        }

        let started = Instant::now();
        let mut report = StepReport::new(label, StepStatus::Passed);
        report.status = self.execute(case, &mut report);
        report.duration = started.elapsed();

        match &report.status {
            StepStatus::Passed => info!(case = %report.label, "passed"),
            StepStatus::Failed(reason) => info!(case = %report.label, reason = %reason, "failed"),
            StepStatus::Errored(reason) => warn!(case = %report.label, reason = %reason, "errored"),
            StepStatus::Skipped => {}
        }

        report
    }

    fn execute(&mut self, case: &CaseRecord, report: &mut StepReport) -> StepStatus {
        let request = match prepare_request(case, &self.store, &self.hosts) {
            Ok(request) => request,
            Err(e) => return StepStatus::Errored(e.to_string()),
        };

        let response = match self.transport.send(&request, &self.execution) {
            Ok(_) if case.expect_failure => {
                return StepStatus::Failed("request succeeded but was expected to fail".to_string());
            }
            Ok(response) => response,
            Err(e) if case.expect_failure => {
                info!(case = %report.label, error = %e, "request failed as expected");
                return StepStatus::Passed;
            }
            Err(e) => return StepStatus::Errored(e.to_string()),
        };
        report.status_code = Some(response.status_code);

        match self.check(case, &response, report) {
            Ok(()) => StepStatus::Passed,
            Err(e) if e.is_failure() => StepStatus::Failed(e.to_string()),
            Err(e) => StepStatus::Errored(e.to_string()),
        }
    }

    fn check(
        &mut self,
        case: &CaseRecord,
        response: &HttpResponse,
        report: &mut StepReport,
    ) -> Result<(), AssertionError> {
        if let Some(expected) = case.expected_status {
            assert_status_code(response, expected)?;
        }

        let body = classify(response);

        if !case.assert_exp.is_empty() {
            assert_classified_value(&body, &case.assert_exp, &case.expected_value)?;
        }

        let directives = parse_capture_directives(&case.extract);
        apply_captures(&directives, &body, &mut self.store)?;
        report.captured = directives.into_iter().map(|d| d.variable_name).collect();

        if self.options.cache_responses && response.status_code < 400 {
            let key = format!("{}{}", RESPONSE_CACHE_PREFIX, case.title);
            self.store.set(key, body.to_value());
        }

        Ok(())
    }

    /// Runs every record of `source` in order.
    ///
    /// With `write_results` set, each outcome is written into the result
    /// column; a failed write is logged and does not affect the step.
    pub fn run_source(&mut self, source: &mut dyn CaseSource) -> SuiteReport {
        let mut suite = SuiteReport::new(source.name());
        let records = source.records().to_vec();
        info!(source = %suite.source, cases = records.len(), "running case source");

        for (row, case) in records.iter().enumerate() {
            let report = self.run_case(case);

            if self.options.write_results {
                let column = self.options.result_column.clone();
                if let Err(e) = source.write_result(row, &column, report.status.result_text()) {
                    warn!(row, error = %e, "failed to write step result");
                }
            }

            suite.steps.push(report);
        }

        suite.finished_at = Utc::now();
        info!("{}", suite);
        suite
    }

    /// Opens a case file and runs it.
    pub fn run_file(&mut self, path: &Path) -> Result<SuiteReport, CaseError> {
        let mut source = open_case_source(path)?;
        Ok(self.run_source(source.as_mut()))
    }

    /// Clears every captured value.
    pub fn teardown(&mut self) {
        self.store.clear();
    }
}
