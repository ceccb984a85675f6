//! End-to-end behaviour of the diagnostics service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kodi_diagnostics::{
    Diagnostic, DiagnosticsConfig, DiagnosticsService, EngineLoader, LoadError, Severity,
};
use rstest::rstest;

fn service() -> DiagnosticsService<kodi_diagnostics::BuiltinEngineLoader> {
    DiagnosticsService::builtin(DiagnosticsConfig::default())
}

/// The bundled engine, but slow to load and counting loads.
struct SlowBuiltin {
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl EngineLoader for SlowBuiltin {
    type Engine = kodi_script::Engine;

    async fn load(&self) -> Result<Self::Engine, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(kodi_script::Engine::new())
    }
}

struct Broken;

#[async_trait]
impl EngineLoader for Broken {
    type Engine = kodi_script::Engine;

    async fn load(&self) -> Result<Self::Engine, LoadError> {
        Err(LoadError::Unavailable("cannot import engine".into()))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn undefined_variable_on_second_line() {
    let found = service().produce_diagnostics("let x = 1\nprint(y)").await;
    assert_eq!(found, vec![Diagnostic::warning(2, 7, "Undefined variable 'y'")]);
}

#[tokio::test]
async fn unterminated_expression_gives_one_error() {
    let found = service().produce_diagnostics("let x = (1 + ").await;
    let errors: Vec<_> = found.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert_eq!(found[0].severity, Severity::Error);
}

#[tokio::test]
async fn comment_marker_inside_a_string() {
    let found = service()
        .produce_diagnostics("print(\"// not a comment\") // real comment")
        .await;
    assert!(found.is_empty(), "{found:?}");
}

#[tokio::test]
async fn engine_load_failure_yields_empty_list() {
    let service = DiagnosticsService::new(Broken, DiagnosticsConfig::default());
    assert!(service.produce_diagnostics("let = (").await.is_empty());
    assert!(service.produce_diagnostics("print(y)").await.is_empty());
}

#[tokio::test]
async fn syntax_error_position_comes_from_the_message() {
    let found = service().produce_diagnostics("let a = 1\nlet b = )").await;
    assert_eq!(found[0], Diagnostic::error(2, 9, "Unexpected token ')'"));
}

#[tokio::test]
async fn syntax_and_lint_both_report() {
    let found = service().produce_diagnostics("print(missing)\nlet = 2").await;
    assert_eq!(found.len(), 2);
    assert!(found[0].is_error());
    assert_eq!(found[1], Diagnostic::warning(1, 7, "Undefined variable 'missing'"));
}

// ============================================================================
// Properties
// ============================================================================

#[rstest]
#[case::empty("")]
#[case::declared("let x = 1\nprint(x)")]
#[case::function("let add = fn(a, b) {\n  return a + b\n}\nprint(add(1, 2))")]
#[case::null_safety("let user = {}\nlet city = user?.address?.city ?? \"n/a\"")]
#[case::control_flow("let n = 3\nwhile (n > 0) {\n  n = n - 1\n}\nif (n == 0) { print(\"done\") } else { print(n) }")]
#[case::natives("let s = upper(trim(\"  hi  \"))\nprint(json({ v: s }))")]
#[tokio::test]
async fn valid_sources_have_no_errors(#[case] source: &str) {
    let found = service().produce_diagnostics(source).await;
    assert!(found.iter().all(|d| d.severity == Severity::Warning), "{found:?}");
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let service = service();
    let text = "print(a, b)\nlet c = (";
    let first = service.produce_diagnostics(text).await;
    let second = service.produce_diagnostics(text).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn repeated_name_reported_once_at_first_use() {
    let found = service()
        .produce_diagnostics("let a = 1\nprint(a + ghost)\nprint(ghost)\nghost")
        .await;
    assert_eq!(found, vec![Diagnostic::warning(2, 11, "Undefined variable 'ghost'")]);
}

#[tokio::test]
async fn declaration_after_use_suppresses_warning() {
    let found = service().produce_diagnostics("print(later)\nlet later = 1").await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn property_access_and_calls_are_not_reported() {
    let found = service()
        .produce_diagnostics("let foo = {}\nprint(foo.bar)\nbaz()")
        .await;
    assert!(found.is_empty(), "{found:?}");
}

#[tokio::test]
async fn warnings_follow_source_order() {
    let found = service().produce_diagnostics("print(b)\nprint(a)\nprint(c, b)").await;
    let positions: Vec<_> = found.iter().map(|d| (d.line, d.column)).collect();
    assert_eq!(positions, vec![(1, 7), (2, 7), (3, 7)]);
}

// ============================================================================
// Engine loading
// ============================================================================

#[tokio::test]
async fn concurrent_first_validations_load_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let service = DiagnosticsService::new(
        SlowBuiltin {
            loads: loads.clone(),
        },
        DiagnosticsConfig::default(),
    );

    let (a, b) = tokio::join!(
        service.produce_diagnostics("print(x)"),
        service.produce_diagnostics("print(y)")
    );
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    service.produce_diagnostics("print(z)").await;
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Publication
// ============================================================================

#[tokio::test]
async fn last_validation_wins() {
    let service = DiagnosticsService::new(
        SlowBuiltin {
            loads: Arc::new(AtomicUsize::new(0)),
        },
        DiagnosticsConfig::default(),
    );

    let (older, newer) = tokio::join!(
        service.validate("main", "print(old)"),
        service.validate("main", "print(new)")
    );
    assert_eq!(older, None);
    let newer = newer.expect("newest result is kept");
    assert_eq!(newer, vec![Diagnostic::warning(1, 7, "Undefined variable 'new'")]);
    assert_eq!(service.published("main").await, newer);
}

#[tokio::test]
async fn clear_discards_in_flight_validation() {
    let service = DiagnosticsService::new(
        SlowBuiltin {
            loads: Arc::new(AtomicUsize::new(0)),
        },
        DiagnosticsConfig::default(),
    );

    let (validated, ()) = tokio::join!(
        service.validate("main", "print(x)"),
        service.clear_diagnostics("main")
    );
    assert_eq!(validated, None);
    assert!(service.published("main").await.is_empty());
}

#[tokio::test]
async fn wire_shape_of_a_published_list() {
    let service = service();
    let published = service.validate("main", "print(y)").await.expect("current");
    let json = serde_json::to_value(&published).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!([
            {"line": 1, "column": 7, "message": "Undefined variable 'y'", "severity": "warning"}
        ])
    );
}
