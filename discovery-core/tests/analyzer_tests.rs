// discovery-core/tests/analyzer_tests.rs
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use discovery_core::models::{PainPoint, Workaround};
use discovery_core::{
    audit, AnalysisMode, AnalysisRequest, AnalyzeOptions, AsyncExtractor, AuditLog,
    BlockingExtractor, CacheKey, CacheStore, DiscoveryError, Extractor, FileCacheStore,
    Guidelines, InsightRecord, InterviewAnalyzer, PiiCategory, Transcriber, Transcript,
    DEFAULT_GUIDELINES_YAML,
};

/// Records every sanitized text it receives and replies with a fixed record.
#[derive(Default)]
struct Stub {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    reply: InsightRecord,
}

impl Stub {
    fn replying(reply: InsightRecord) -> Arc<Self> {
        Arc::new(Self {
            reply,
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, text: &str) -> InsightRecord {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        self.reply.clone()
    }
}

#[async_trait]
impl AsyncExtractor for Stub {
    async fn extract(&self, sanitized_text: &str, _: &str) -> anyhow::Result<InsightRecord> {
        Ok(self.record(sanitized_text))
    }
}

impl BlockingExtractor for Stub {
    fn extract(&self, sanitized_text: &str, _: &str) -> anyhow::Result<InsightRecord> {
        Ok(self.record(sanitized_text))
    }
}

fn clean_record() -> InsightRecord {
    InsightRecord {
        pain_points: vec![PainPoint {
            description: "Month-end reconciliation is manual".into(),
            impact: "Most of a day each month".into(),
            quote: "It takes me most of a day.".into(),
        }],
        ..Default::default()
    }
}

fn leaking_record() -> InsightRecord {
    InsightRecord {
        workarounds: vec![Workaround {
            what_they_do: "Emails the export to a colleague".into(),
            why_needed: "No shared view".into(),
            cost: "Delays".into(),
            quote: "I just send it to jane@example.com".into(),
        }],
        ..Default::default()
    }
}

fn revised_record() -> InsightRecord {
    InsightRecord {
        pain_points: vec![PainPoint {
            description: "Approvals stall at quarter end".into(),
            impact: "Invoices wait a week".into(),
            quote: "Nothing moves until the director signs.".into(),
        }],
        ..Default::default()
    }
}

/// Default guidelines with variant paths resolved under `base`.
fn guidelines_in(base: &Path) -> Arc<Guidelines> {
    let interviews = base.join("data/interviews");
    std::fs::create_dir_all(&interviews).unwrap();
    std::fs::write(
        interviews.join("sanitized.txt"),
        "Interviewer: How do you close the month?\nParticipant: I export to a spreadsheet.",
    )
    .unwrap();
    std::fs::write(
        interviews.join("sensitive.txt"),
        "Participant: Email me at maria@corp.example or call 555-201-7788.",
    )
    .unwrap();
    Arc::new(Guidelines::from_yaml_str(DEFAULT_GUIDELINES_YAML, base).unwrap())
}

fn analyzer(base: &Path, stub: &Arc<Stub>) -> InterviewAnalyzer {
    InterviewAnalyzer::new(
        guidelines_in(base),
        Extractor::Suspending(stub.clone()),
        Arc::new(FileCacheStore::new(base.join("cache"))),
    )
    .unwrap()
}

const LIVE_STEPS: [&str; 6] = [
    "Reading transcript",
    "Auditing PII",
    "Redacting PII",
    "Extracting insights",
    "Validating output",
    "Done",
];

#[tokio::test]
async fn test_end_to_end_contact_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let text = "Contact John Doe at john@example.com or 555-123-4567";

    let report = audit(text, &analyzer.guidelines().ruleset);
    assert_eq!(report.count(PiiCategory::Email), 1);
    assert_eq!(report.count(PiiCategory::Phone), 1);

    let insights = analyzer.analyze(text, AnalyzeOptions::default()).await.unwrap();
    assert_eq!(insights, clean_record());

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].contains("john@example.com"));
    assert!(!seen[0].contains("555-123-4567"));
    assert!(seen[0].contains("[EMAIL]"));
    assert!(seen[0].contains("[PHONE]"));
}

#[tokio::test]
async fn test_extractor_never_sees_any_category() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let text = "Maria Lopez (EMP-204518) pays from DE89 3704 0044 0532 0130 00 \
                with key sk-live-4f8a9b2c7d1e6f3a0b5c and mail MARIA@CORP.EXAMPLE.";

    analyzer
        .analyze(text, AnalyzeOptions { audit: false, validate: true })
        .await
        .unwrap();

    let seen = stub.seen.lock().unwrap();
    for literal in ["Maria Lopez", "EMP-204518", "DE89", "sk-live", "MARIA@CORP.EXAMPLE"] {
        assert!(!seen[0].contains(literal), "{} leaked: {}", literal, seen[0]);
    }
}

#[test_log::test(tokio::test)]
async fn test_pii_in_output_is_blocked() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(leaking_record());
    let analyzer = analyzer(dir.path(), &stub);

    let err = analyzer
        .analyze("No PII in here.", AnalyzeOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_policy_block());
    assert!(matches!(err, DiscoveryError::PiiValidation(ref c) if c == &vec![PiiCategory::Email]));
}

#[tokio::test]
async fn test_blocked_record_is_never_cached() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(leaking_record());
    let analyzer = analyzer(dir.path(), &stub);

    let request = AnalysisRequest::new("sanitized", AnalysisMode::Auto);
    assert!(analyzer.run(&request).await.is_err());
    let err = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Cached))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::NotCached { .. }));
}

#[tokio::test]
async fn test_unvalidated_result_is_not_served_to_validated_request() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(leaking_record());
    let analyzer = analyzer(dir.path(), &stub);
    let transcript = analyzer.guidelines().variants.load("sanitized").unwrap();

    let unchecked = analyzer
        .run_transcript(
            &transcript,
            AnalysisMode::Live,
            AnalyzeOptions { audit: true, validate: false },
        )
        .await
        .unwrap();
    assert_eq!(unchecked.insights, leaking_record());

    let err = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Cached))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::NotCached { .. }));

    let err = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Auto))
        .await
        .unwrap_err();
    assert!(err.is_policy_block());
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_validation_disabled_returns_record() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(leaking_record());
    let analyzer = analyzer(dir.path(), &stub);

    let options = AnalyzeOptions { audit: true, validate: false };
    let insights = analyzer.analyze("text", options).await.unwrap();
    assert_eq!(insights, leaking_record());
}

#[tokio::test]
async fn test_cached_mode_miss_does_not_extract() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);

    let err = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Cached))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::NotCached { ref variant_id, .. } if variant_id == "sanitized"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_auto_mode_runs_live_then_serves_cache() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let request = AnalysisRequest::new("sanitized", AnalysisMode::Auto);

    let first = analyzer.run(&request).await.unwrap();
    assert!(!first.cached);
    assert_eq!(first.steps, LIVE_STEPS);
    assert!(first.run_id.starts_with("sanitized-"));

    let second = analyzer.run(&request).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.steps, ["Loading cached insights", "Rendering", "Done"]);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.insights, first.insights);
    assert_eq!(stub.calls(), 1);

    let cached = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Cached))
        .await
        .unwrap();
    assert!(cached.cached);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_live_mode_always_extracts() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let request = AnalysisRequest::new("sanitized", AnalysisMode::Live);

    assert!(!analyzer.run(&request).await.unwrap().cached);
    assert!(!analyzer.run(&request).await.unwrap().cached);
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_live_mode_overwrites_populated_entry() {
    let dir = tempfile::tempdir().unwrap();
    let guidelines = guidelines_in(dir.path());
    let cache = Arc::new(FileCacheStore::new(dir.path().join("cache")));
    let transcript = guidelines.variants.load("sanitized").unwrap();
    let key = CacheKey::fingerprint("sanitized", &guidelines.fingerprint, &transcript.text);
    cache.put(&key, &clean_record()).await.unwrap();

    let stub = Stub::replying(revised_record());
    let analyzer = InterviewAnalyzer::new(
        guidelines,
        Extractor::Suspending(stub.clone()),
        cache.clone(),
    )
    .unwrap();

    let response = analyzer
        .run(&AnalysisRequest::new("sanitized", AnalysisMode::Live))
        .await
        .unwrap();
    assert!(!response.cached);
    assert_eq!(response.insights, revised_record());
    assert_eq!(stub.calls(), 1);

    let entry = cache.get(&key).await.unwrap().unwrap();
    assert_eq!(entry.insights, revised_record());
}

#[tokio::test]
async fn test_optional_stages_omitted_from_steps() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let transcript = Transcript::new("Plain text.", "adhoc");

    let response = analyzer
        .run_transcript(
            &transcript,
            AnalysisMode::Live,
            AnalyzeOptions { audit: false, validate: false },
        )
        .await
        .unwrap();
    assert_eq!(
        response.steps,
        ["Reading transcript", "Redacting PII", "Extracting insights", "Done"]
    );
}

#[tokio::test]
async fn test_changed_transcript_misses_cache() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);

    let before = Transcript::new("First version.", "sanitized");
    let after = Transcript::new("Second version.", "sanitized");
    analyzer
        .run_transcript(&before, AnalysisMode::Auto, AnalyzeOptions::default())
        .await
        .unwrap();
    let response = analyzer
        .run_transcript(&after, AnalysisMode::Auto, AnalyzeOptions::default())
        .await
        .unwrap();
    assert!(!response.cached);
    assert_eq!(stub.calls(), 2);
}

#[test_log::test(tokio::test)]
async fn test_unwritable_cache_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let stub = Stub::replying(clean_record());
    let analyzer = InterviewAnalyzer::new(
        guidelines_in(dir.path()),
        Extractor::Suspending(stub.clone()),
        Arc::new(FileCacheStore::new(&blocker)),
    )
    .unwrap();

    let request = AnalysisRequest::new("sanitized", AnalysisMode::Auto);
    let first = analyzer.run(&request).await.unwrap();
    let second = analyzer.run(&request).await.unwrap();
    assert!(!first.cached);
    assert!(!second.cached);
    assert_eq!(stub.calls(), 2);
}

#[test_log::test(tokio::test)]
async fn test_corrupt_cache_file_falls_through_to_live() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join("sanitized_cache.json"), b"{ not json").unwrap();

    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let request = AnalysisRequest::new("sanitized", AnalysisMode::Auto);

    let first = analyzer.run(&request).await.unwrap();
    assert!(!first.cached);
    assert_eq!(stub.calls(), 1);

    let second = analyzer.run(&request).await.unwrap();
    assert!(second.cached);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_unknown_variant_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);

    let err = analyzer
        .run(&AnalysisRequest::new("raw", AnalysisMode::Live))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::UnknownInput(_)));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_blocking_extractor_runs_off_executor() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = InterviewAnalyzer::new(
        guidelines_in(dir.path()),
        Extractor::Blocking(stub.clone()),
        Arc::new(FileCacheStore::new(dir.path().join("cache"))),
    )
    .unwrap();

    let response = analyzer
        .run(&AnalysisRequest::new("sensitive", AnalysisMode::Live))
        .await
        .unwrap();
    assert_eq!(response.insights, clean_record());
    let seen = stub.seen.lock().unwrap();
    assert!(!seen[0].contains("maria@corp.example"));
    assert!(!seen[0].contains("555-201-7788"));
}

#[test_log::test(tokio::test)]
async fn test_unwritable_audit_log_aborts_before_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub).with_audit_log(AuditLog::new(dir.path()));

    let err = analyzer
        .analyze("Call 555-123-4567", AnalyzeOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Audit(_)));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_audit_log_records_counts_only() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("audit.jsonl");
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub).with_audit_log(AuditLog::new(&log_path));

    analyzer
        .analyze("Call 555-123-4567", AnalyzeOptions::default())
        .await
        .unwrap();
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("\"phone\":1"));
    assert!(!contents.contains("555-123-4567"));
}

#[tokio::test]
async fn test_concurrent_requests_share_one_analyzer() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = Arc::new(analyzer(dir.path(), &stub));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move {
                let variant = if i % 2 == 0 { "sanitized" } else { "sensitive" };
                analyzer
                    .run(&AnalysisRequest::new(variant, AnalysisMode::Live))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().insights, clean_record());
    }
    assert_eq!(stub.calls(), 8);
}

struct FixedTranscriber;

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _: Vec<u8>, _: &str, _: Option<&str>) -> anyhow::Result<String> {
        Ok("Reach me at sam@example.org after the call.".to_string())
    }
}

#[tokio::test]
async fn test_audio_analysis_saves_raw_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("call.mp3");
    std::fs::write(&audio, b"ID3").unwrap();
    let saved = dir.path().join("call.txt");

    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub).with_transcriber(Arc::new(FixedTranscriber));
    analyzer
        .analyze_audio_file(&audio, Some("en"), AnalyzeOptions::default(), Some(&saved))
        .await
        .unwrap();

    assert!(std::fs::read_to_string(&saved).unwrap().contains("sam@example.org"));
    assert!(!stub.seen.lock().unwrap()[0].contains("sam@example.org"));
}

#[tokio::test]
async fn test_audio_without_transcriber_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let err = analyzer
        .analyze_audio_file(Path::new("call.mp3"), None, AnalyzeOptions::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Config(_)));
}

#[tokio::test]
async fn test_missing_transcript_file() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Stub::replying(clean_record());
    let analyzer = analyzer(dir.path(), &stub);
    let err = analyzer
        .analyze_file(&dir.path().join("absent.txt"), AnalyzeOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::UnknownInput(_)));
}
