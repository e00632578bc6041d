//! Concurrent evaluation of test cases against one provider model

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::error::panic_message;
use super::{
    CallAdapter, EvaluationError, FailureReason, ModelOutput, RunId, RunReport, RunStatus, Verdict,
};
use crate::domain::llm::LlmRequest;
use crate::domain::test_case::TestCase;

/// Instruction sent as the system message of every request
pub const DEFAULT_SYSTEM_MESSAGE: &str = "YOU MUST CALL A FUNCTION NO MATTER WHAT.\n\
NEVER ASK A USER TO SPECIFY / CLARIFY ANYTHING.\n\
ALWAYS CALL A FUNCTION.";

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub concurrency: usize,
    pub system_message: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// How long in-flight calls may run after cancellation
    pub cancel_grace: Duration,
}

/// Upper bound on concurrent provider calls
pub const MAX_CONCURRENCY: usize = 1024;

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(EvaluationError::configuration(format!(
                "concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY, self.concurrency
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            temperature: None,
            max_tokens: None,
            cancel_grace: Duration::from_secs(10),
        }
    }
}

enum Event {
    Verdict { index: usize, verdict: Verdict },
    Fatal { index: usize, verdict: Verdict, reason: String },
    Defect(EvaluationError),
}

#[derive(Default)]
struct Collected {
    verdicts: Vec<(usize, Verdict)>,
    abort_reason: Option<String>,
    defect: Option<EvaluationError>,
}

/// Single writer for all verdicts of a run
async fn collect(mut rx: mpsc::Receiver<Event>) -> Collected {
    let mut collected = Collected::default();

    while let Some(event) = rx.recv().await {
        match event {
            Event::Verdict { index, verdict } => collected.verdicts.push((index, verdict)),
            Event::Fatal {
                index,
                verdict,
                reason,
            } => {
                collected.verdicts.push((index, verdict));
                collected.abort_reason.get_or_insert(reason);
            }
            Event::Defect(defect) => {
                collected.defect.get_or_insert(defect);
            }
        }
    }

    collected
}

/// Decide the verdict for one model output
///
/// Checks run in order: a call was made, every call targets the expected
/// function, every call carries the target argument, every value is a
/// string, every value satisfies the checker.
pub fn judge(case: &TestCase, output: &ModelOutput) -> Verdict {
    let id = case.id().clone();
    let kind = case.checker_kind();

    let calls = match output {
        ModelOutput::NoCall { content } => {
            let verdict = Verdict::fail(id, kind, FailureReason::NoFunctionCall);
            return match content {
                Some(text) if !text.is_empty() => verdict.with_detail(text.clone()),
                _ => verdict,
            };
        }
        ModelOutput::Calls { calls } => calls,
    };

    let expected = &case.function_schema().name;
    if let Some(wrong) = calls.iter().find(|c| &c.function_name != expected) {
        return Verdict::fail(id, kind, FailureReason::WrongFunction).with_detail(format!(
            "called '{}' instead of '{}'",
            wrong.function_name, expected
        ));
    }

    let target = case.target_argument();
    if calls.iter().any(|c| c.argument(target).is_none()) {
        return Verdict::fail(id, kind, FailureReason::ArgumentMissing)
            .with_detail(format!("argument '{}' not provided", target));
    }

    let mut values = Vec::with_capacity(calls.len());
    for call in calls {
        match call.argument(target) {
            Some(Value::String(value)) => values.push(value.as_str()),
            Some(other) => {
                return Verdict::fail(id, kind, FailureReason::NonStringArgument)
                    .with_raw_value(other.to_string());
            }
            None => {
                return Verdict::fail(id, kind, FailureReason::ArgumentMissing);
            }
        }
    }

    match values.iter().find(|value| !case.checker().check(value)) {
        Some(bad) => Verdict::fail(id, kind, FailureReason::FormatViolation).with_raw_value(*bad),
        None => Verdict::pass(id, kind, values.first().copied().unwrap_or_default()),
    }
}

/// Runs test cases through a CallAdapter and collects verdicts
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    adapter: Arc<CallAdapter>,
    config: EngineConfig,
}

impl EvaluationEngine {
    pub fn new(adapter: CallAdapter, config: EngineConfig) -> Self {
        Self {
            adapter: Arc::new(adapter),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn build_request(&self, case: &TestCase) -> LlmRequest {
        let mut builder = LlmRequest::builder();
        if !self.config.system_message.is_empty() {
            builder = builder.system(&self.config.system_message);
        }

        builder
            .user(case.prompt_text())
            .tool(case.function_schema().clone())
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
    }

    pub async fn run(&self, test_cases: Vec<Arc<TestCase>>) -> Result<RunReport, EvaluationError> {
        self.run_with_cancel(test_cases, CancellationToken::new())
            .await
    }

    /// Evaluate every case, stopping early on `cancel` or a fatal provider error
    pub async fn run_with_cancel(
        &self,
        test_cases: Vec<Arc<TestCase>>,
        cancel: CancellationToken,
    ) -> Result<RunReport, EvaluationError> {
        self.config.validate()?;

        let started_at = Utc::now();
        let total_cases = test_cases.len();
        let provider = self.adapter.provider_name().to_string();
        let model = self.adapter.model().to_string();

        info!(
            provider = %provider,
            model = %model,
            cases = total_cases,
            concurrency = self.config.concurrency,
            "Starting evaluation run"
        );

        let run_token = cancel.child_token();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let (tx, rx) = mpsc::channel(self.config.concurrency * 2);
        let collector = tokio::spawn(collect(rx));
        let mut tasks = JoinSet::new();

        for (index, case) in test_cases.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = run_token.cancelled() => {
                    info!(dispatched = index, "Dispatch stopped");
                    break;
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let span = info_span!(
                "test_case",
                test_case_id = %case.id(),
                checker_kind = %case.checker_kind()
            );
            let request = self.build_request(&case);
            let adapter = self.adapter.clone();
            let token = run_token.clone();
            let tx = tx.clone();

            tasks.spawn(
                async move {
                    let _permit = permit;
                    if let Some(event) = evaluate_case(index, &case, &adapter, request, &token).await
                    {
                        let _ = tx.send(event).await;
                    }
                }
                .instrument(span),
            );
        }
        drop(tx);

        let join_failure = self.join_all(&mut tasks, &run_token).await;

        let collected = collector
            .await
            .map_err(|e| EvaluationError::task_failed(e.to_string()))?;

        if let Some(defect) = collected.defect.or(join_failure) {
            error!(error = %defect, "Evaluation run failed");
            return Err(defect);
        }

        let mut verdicts = collected.verdicts;
        verdicts.sort_by_key(|(index, _)| *index);
        let verdicts: Vec<Verdict> = verdicts.into_iter().map(|(_, v)| v).collect();

        let status = if let Some(reason) = collected.abort_reason {
            RunStatus::Aborted { reason }
        } else if verdicts.len() == total_cases {
            RunStatus::Completed
        } else if cancel.is_cancelled() {
            RunStatus::Cancelled
        } else {
            RunStatus::Aborted {
                reason: format!(
                    "{} cases produced no verdict",
                    total_cases - verdicts.len()
                ),
            }
        };

        info!(
            status = %status,
            verdicts = verdicts.len(),
            cases = total_cases,
            "Evaluation run finished"
        );

        Ok(RunReport {
            id: RunId::generate(started_at, &provider, &model),
            provider,
            model,
            started_at,
            finished_at: Utc::now(),
            status,
            total_cases,
            verdicts,
        })
    }

    /// Wait for all tasks, abandoning in-flight ones once the grace period
    /// after cancellation runs out
    async fn join_all(
        &self,
        tasks: &mut JoinSet<()>,
        run_token: &CancellationToken,
    ) -> Option<EvaluationError> {
        enum Step {
            Joined(Option<Result<(), JoinError>>),
            Cancelled,
            GraceExpired,
        }

        let mut failure = None;
        let mut deadline: Option<Instant> = None;

        loop {
            if deadline.is_none() && run_token.is_cancelled() {
                deadline = Some(Instant::now() + self.config.cancel_grace);
            }

            let step = match deadline {
                Some(deadline) => tokio::select! {
                    joined = tasks.join_next() => Step::Joined(joined),
                    _ = tokio::time::sleep_until(deadline) => Step::GraceExpired,
                },
                None => tokio::select! {
                    joined = tasks.join_next() => Step::Joined(joined),
                    _ = run_token.cancelled() => Step::Cancelled,
                },
            };

            match step {
                Step::Joined(None) => break,
                Step::Joined(Some(result)) => {
                    if let Some(err) = join_error(result) {
                        run_token.cancel();
                        failure.get_or_insert(err);
                    }
                }
                Step::Cancelled => continue,
                Step::GraceExpired => {
                    warn!(in_flight = tasks.len(), "Abandoning in-flight calls");
                    tasks.abort_all();
                    while let Some(result) = tasks.join_next().await {
                        if let Some(err) = join_error(result) {
                            failure.get_or_insert(err);
                        }
                    }
                    break;
                }
            }
        }

        failure
    }
}

fn join_error(result: Result<(), JoinError>) -> Option<EvaluationError> {
    match result {
        Ok(()) => None,
        Err(e) if e.is_panic() => Some(EvaluationError::task_failed(panic_message(
            e.into_panic().as_ref(),
        ))),
        Err(_) => None,
    }
}

async fn evaluate_case(
    index: usize,
    case: &TestCase,
    adapter: &CallAdapter,
    request: LlmRequest,
    token: &CancellationToken,
) -> Option<Event> {
    let outcome = match adapter.call(request, token).await {
        Ok(outcome) => outcome,
        Err(interrupted) => {
            debug!(attempts = interrupted.attempts, "Interrupted by cancellation");
            return None;
        }
    };

    let event = match outcome.output {
        Ok(output) => match panic::catch_unwind(AssertUnwindSafe(|| judge(case, &output))) {
            Ok(verdict) => {
                debug!(passed = verdict.passed, reason = ?verdict.failure_reason, "Judged");
                Event::Verdict {
                    index,
                    verdict: verdict.with_timing(outcome.attempts, outcome.latency_ms),
                }
            }
            Err(payload) => {
                token.cancel();
                Event::Defect(EvaluationError::checker_defect(
                    case.id().as_str(),
                    panic_message(payload.as_ref()),
                ))
            }
        },
        Err(err) => {
            let verdict = Verdict::fail(
                case.id().clone(),
                case.checker_kind(),
                FailureReason::ProviderError,
            )
            .with_detail(err.to_string())
            .with_timing(outcome.attempts, outcome.latency_ms);

            if err.is_fatal() {
                error!(error = %err, "Fatal provider error, aborting run");
                token.cancel();
                Event::Fatal {
                    index,
                    verdict,
                    reason: err.to_string(),
                }
            } else {
                warn!(error = %err, attempts = outcome.attempts, "Provider error");
                Event::Verdict { index, verdict }
            }
        }
    };

    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checker::{BoundChecker, CheckerKind, FormatChecker};
    use crate::domain::evaluation::{
        FunctionCall, ProviderErrorPolicy, ResultAggregator, RetryPolicy,
    };
    use crate::domain::llm::{
        FunctionSchema, LlmResponse, MockLlmProvider, ProviderError, ToolCall,
    };
    use crate::domain::test_case::TestCaseId;
    use serde_json::{json, Map};

    fn schema() -> FunctionSchema {
        FunctionSchema::new(
            "send_message",
            "Send a chat message",
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}, "chat_id": {"type": "integer"}},
                "required": ["text"]
            }),
        )
    }

    fn case(index: usize, kind: CheckerKind, params: Value) -> Arc<TestCase> {
        Arc::new(
            TestCase::new(
                TestCaseId::new(format!("messages.json#{}", index)).unwrap(),
                kind,
                params,
                format!("Send message number {}", index),
                schema(),
                Some("text"),
            )
            .unwrap(),
        )
    }

    fn lowercase_case(index: usize) -> Arc<TestCase> {
        case(index, CheckerKind::AllLowercase, json!({}))
    }

    fn call(name: &str, args: Value) -> ModelOutput {
        let arguments = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ModelOutput::Calls {
            calls: vec![FunctionCall::new(name, arguments)],
        }
    }

    fn reply(text: &str) -> LlmResponse {
        LlmResponse::new("r", "m")
            .with_tool_call(ToolCall::new("send_message", json!({ "text": text })))
    }

    fn engine(provider: Arc<MockLlmProvider>, concurrency: usize) -> EvaluationEngine {
        let adapter = CallAdapter::new(provider, "mock-model")
            .with_retry(RetryPolicy::new(2).with_initial_delay(1).with_max_delay(5))
            .with_timeout(Duration::from_secs(5));
        EvaluationEngine::new(
            adapter,
            EngineConfig {
                concurrency,
                cancel_grace: Duration::from_millis(50),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_judge_no_call() {
        let verdict = judge(
            &lowercase_case(0),
            &ModelOutput::NoCall {
                content: Some("Which chat?".to_string()),
            },
        );
        assert!(!verdict.passed);
        assert_eq!(verdict.failure_reason, Some(FailureReason::NoFunctionCall));
        assert!(!verdict.function_called);
        assert_eq!(verdict.detail.as_deref(), Some("Which chat?"));
    }

    #[test]
    fn test_judge_wrong_function() {
        let verdict = judge(&lowercase_case(0), &call("send_email", json!({"text": "hi"})));
        assert_eq!(verdict.failure_reason, Some(FailureReason::WrongFunction));
        assert!(verdict.function_called);
    }

    #[test]
    fn test_judge_argument_missing() {
        let verdict = judge(&lowercase_case(0), &call("send_message", json!({"chat_id": 1})));
        assert_eq!(verdict.failure_reason, Some(FailureReason::ArgumentMissing));
        assert!(!verdict.argument_provided);
    }

    #[test]
    fn test_judge_non_string_argument() {
        let verdict = judge(&lowercase_case(0), &call("send_message", json!({"text": ["a"]})));
        assert_eq!(verdict.failure_reason, Some(FailureReason::NonStringArgument));
        assert_eq!(verdict.raw_value.as_deref(), Some("[\"a\"]"));
    }

    #[test]
    fn test_judge_format_violation_and_pass() {
        let case = lowercase_case(0);

        let bad = judge(&case, &call("send_message", json!({"text": "Hello"})));
        assert_eq!(bad.failure_reason, Some(FailureReason::FormatViolation));
        assert_eq!(bad.raw_value.as_deref(), Some("Hello"));
        assert!(bad.argument_provided);

        let good = judge(&case, &call("send_message", json!({"text": "hello"})));
        assert!(good.passed);
        assert_eq!(good.failure_reason, None);
    }

    #[test]
    fn test_judge_every_call_must_pass() {
        let case = lowercase_case(0);
        let output = ModelOutput::Calls {
            calls: vec![
                FunctionCall::new("send_message", json!({"text": "fine"}).as_object().cloned().unwrap()),
                FunctionCall::new("send_message", json!({"text": "NOT"}).as_object().cloned().unwrap()),
            ],
        };

        let verdict = judge(&case, &output);
        assert_eq!(verdict.failure_reason, Some(FailureReason::FormatViolation));
        assert_eq!(verdict.raw_value.as_deref(), Some("NOT"));
    }

    #[test]
    fn test_judge_missing_checked_before_type() {
        let case = lowercase_case(0);
        let output = ModelOutput::Calls {
            calls: vec![
                FunctionCall::new("send_message", json!({"text": 5}).as_object().cloned().unwrap()),
                FunctionCall::new("send_message", Map::new()),
            ],
        };

        assert_eq!(
            judge(&case, &output).failure_reason,
            Some(FailureReason::ArgumentMissing)
        );
    }

    #[tokio::test]
    async fn test_run_completed_in_dataset_order() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_handler(|request| {
            let prompt = request.conversation().next().map(|m| m.content.clone()).unwrap_or_default();
            if prompt.ends_with('1') {
                Ok(reply("UPPER"))
            } else {
                Ok(reply("lower"))
            }
        }));

        let cases: Vec<_> = (0..5).map(lowercase_case).collect();
        let report = engine(provider, 3).run(cases).await.unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.total_cases, 5);
        let ids: Vec<_> = report.verdicts.iter().map(|v| v.test_case_id.to_string()).collect();
        assert_eq!(
            ids,
            (0..5).map(|i| format!("messages.json#{}", i)).collect::<Vec<_>>()
        );
        assert!(!report.verdicts[1].passed);
        assert_eq!(report.verdicts.iter().filter(|v| v.passed).count(), 4);
        assert!(report.id.as_str().ends_with("_mock_mock-model"));
    }

    #[tokio::test]
    async fn test_request_carries_system_message_and_tool() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_handler(|request| {
            assert_eq!(request.system_message(), Some(DEFAULT_SYSTEM_MESSAGE));
            assert_eq!(request.tools.len(), 1);
            assert_eq!(request.tools[0].name, "send_message");
            Ok(reply("ok"))
        }));

        let report = engine(provider, 1).run(vec![lowercase_case(0)]).await.unwrap();
        assert!(report.verdicts[0].passed);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_yields_provider_error() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_handler(|_| Err(ProviderError::server("mock", 502, "bad gateway"))),
        );

        let report = engine(provider.clone(), 2).run(vec![lowercase_case(0)]).await.unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        let verdict = &report.verdicts[0];
        assert_eq!(verdict.failure_reason, Some(FailureReason::ProviderError));
        assert_eq!(verdict.attempts, 3);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_provider_errors_leave_the_pass_rate_denominator() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_handler(|request| {
            let prompt = request.conversation().next().map(|m| m.content.clone()).unwrap_or_default();
            if prompt.ends_with('1') {
                Err(ProviderError::server("mock", 503, "unavailable"))
            } else {
                Ok(reply("ok"))
            }
        }));

        let cases: Vec<_> = (0..3).map(lowercase_case).collect();
        let report = engine(provider, 2).run(cases).await.unwrap();
        assert_eq!(
            report.verdicts[1].failure_reason,
            Some(FailureReason::ProviderError)
        );

        let table = ResultAggregator::new(ProviderErrorPolicy::Exclude).aggregate(&report);
        let row = table.row(CheckerKind::AllLowercase).unwrap();
        assert_eq!(row.total, 3);
        assert_eq!(row.evaluated, 2);
        assert_eq!(row.excluded, 1);
        assert_eq!(row.pass_rate, Some(1.0));
        assert_eq!(table.provider_errors, 1);

        let table = ResultAggregator::new(ProviderErrorPolicy::CountAsFailure).aggregate(&report);
        let row = table.row(CheckerKind::AllLowercase).unwrap();
        assert_eq!(row.evaluated, 3);
        assert_eq!(row.passed, 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_aborts_run() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_handler(|_| Err(ProviderError::authentication("mock", "invalid api key"))),
        );

        let cases: Vec<_> = (0..20).map(lowercase_case).collect();
        let report = engine(provider.clone(), 1).run(cases).await.unwrap();

        assert!(matches!(report.status, RunStatus::Aborted { .. }));
        assert!(report.verdicts.len() < 20);
        assert!(provider.calls() < 20);
    }

    #[tokio::test]
    async fn test_concurrency_limit_respected() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(reply("ok"))
                .with_delay(Duration::from_millis(20)),
        );

        let cases: Vec<_> = (0..12).map(lowercase_case).collect();
        let report = engine(provider.clone(), 3).run(cases).await.unwrap();

        assert_eq!(report.verdicts.len(), 12);
        assert!(provider.max_in_flight() <= 3);
        assert!(provider.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_cancellation_returns_partial_report() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(reply("ok"))
                .with_delay(Duration::from_millis(30)),
        );

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(45)).await;
            canceller.cancel();
        });

        let cases: Vec<_> = (0..50).map(lowercase_case).collect();
        let report = engine(provider, 1).run_with_cancel(cases, cancel).await.unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert!(!report.verdicts.is_empty());
        assert!(report.verdicts.len() < 50);
        assert!(report.is_partial());
    }

    #[tokio::test]
    async fn test_grace_period_abandons_slow_calls() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(reply("ok"))
                .with_delay(Duration::from_secs(30)),
        );

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let report = engine(provider, 2)
            .run_with_cancel(vec![lowercase_case(0), lowercase_case(1)], cancel)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert!(report.verdicts.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(reply("ok")));
        let result = engine(provider, 0).run(vec![lowercase_case(0)]).await;
        assert!(matches!(result, Err(EvaluationError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_oversized_concurrency_rejected() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(reply("ok")));
        let result = engine(provider, usize::MAX).run(vec![lowercase_case(0)]).await;
        assert!(matches!(result, Err(EvaluationError::Configuration { .. })));
    }

    #[derive(Debug)]
    struct PanickingChecker;

    impl FormatChecker for PanickingChecker {
        fn kind(&self) -> CheckerKind {
            CheckerKind::AllLowercase
        }

        fn check(&self, _value: &str) -> bool {
            panic!("index out of bounds")
        }

        fn description(&self) -> String {
            "always panics".to_string()
        }
    }

    #[tokio::test]
    async fn test_checker_panic_fails_run() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(reply("ok")));
        let broken = Arc::new(
            TestCase::clone(&lowercase_case(1))
                .with_checker(BoundChecker::new(json!({}), Arc::new(PanickingChecker))),
        );

        let result = engine(provider, 2)
            .run(vec![lowercase_case(0), broken, lowercase_case(2)])
            .await;

        assert!(matches!(result, Err(EvaluationError::CheckerDefect { .. })));
    }

    #[tokio::test]
    async fn test_empty_run() {
        let provider = Arc::new(MockLlmProvider::new("mock"));
        let report = engine(provider, 2).run(Vec::new()).await.unwrap();
        assert_eq!(report.status, RunStatus::Completed);
        assert!(report.verdicts.is_empty());
    }
}
